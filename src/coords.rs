//! Screen space to model space conversion.
//!
//! Two canvases exist: the whole-cabinet canvas and the partition-detail
//! canvas. Both map a pointer sample with the same formula, they only differ
//! in how their scale factor is derived.

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Display rectangle of a mounted canvas, in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// `(screen - origin.top_left) / scale`.
pub fn to_model(screen: Point, origin: Rect, scale: f64) -> Point {
    let top_left = origin.top_left();
    Point {
        x: (screen.x - top_left.x) / scale,
        y: (screen.y - top_left.y) / scale,
    }
}

/// Scale of the whole-cabinet canvas: never magnifies, shrinks wide cabinets
/// to fit `canvas_width`.
pub fn cabinet_scale(cabinet_width: f64, canvas_width: f64) -> f64 {
    fit_scale(cabinet_width, canvas_width)
}

/// Scale of the detail canvas. With nothing selected the partition is assumed
/// to be exactly `detail_width` wide.
pub fn detail_scale(selected_width: Option<f64>, detail_width: f64) -> f64 {
    fit_scale(selected_width.unwrap_or(detail_width), detail_width)
}

fn fit_scale(content: f64, available: f64) -> f64 {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(content) || !usable(available) {
        return 1.0;
    }
    (available / content).min(1.0)
}

/// A canvas that may or may not be mounted by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasMapper {
    origin: Option<Rect>,
}

impl CanvasMapper {
    pub fn mounted(origin: Rect) -> Self {
        Self {
            origin: Some(origin),
        }
    }

    pub fn unmounted() -> Self {
        Self { origin: None }
    }

    pub fn is_mounted(&self) -> bool {
        self.origin.is_some()
    }

    pub fn mount(&mut self, origin: Rect) {
        self.origin = Some(origin);
    }

    pub fn unmount(&mut self) {
        self.origin = None;
    }

    /// Map a screen sample into model space. An unmounted canvas maps every
    /// sample to the origin.
    pub fn map(&self, screen: Point, scale: f64) -> Point {
        match self.origin {
            Some(origin) => to_model(screen, origin, scale),
            None => Point::ORIGIN,
        }
    }
}
