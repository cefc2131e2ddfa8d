use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Limits: size constants the layout engine enforces
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Limits {
    pub min_partition_width: f64,
    pub partition_reserve: f64,
    pub min_shelf_height: f64,
    pub max_shelf_height: f64,
    pub default_shelf_height: f64,
    pub min_cabinet_width: f64,
    pub max_cabinet_width: f64,
    pub min_cabinet_height: f64,
    pub max_cabinet_height: f64,
    /// Width of the spacer between two subdivisions; also their minimum width.
    pub slat_width: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_partition_width: 50.0,
            partition_reserve: 100.0,
            min_shelf_height: 50.0,
            max_shelf_height: 200.0,
            default_shelf_height: 120.0,
            min_cabinet_width: 400.0,
            max_cabinet_width: 1200.0,
            min_cabinet_height: 300.0,
            max_cabinet_height: 1000.0,
            slat_width: 12.0,
        }
    }
}

// ---------------------------------------------------------------------------
// View: canvas sizes used to derive display scale factors
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    pub canvas_width: f64,
    pub detail_width: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            canvas_width: 600.0,
            detail_width: 400.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Drag
// ---------------------------------------------------------------------------

/// How pointer motion turns into resize deltas during a drag session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchoring {
    /// Each move applies the motion since the previous move.
    #[default]
    Incremental,
    /// Each move applies the total motion since pointer-down.
    Fixed,
}

impl Anchoring {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "incremental" => Some(Self::Incremental),
            "fixed" | "absolute" => Some(Self::Fixed),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragConfig {
    pub anchoring: Anchoring,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub limits: Limits,
    pub view: ViewConfig,
    pub drag: DragConfig,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cabinet-designer").join("config.toml"))
    }

    /// Load the user config, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("invalid config at {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut config = Self::default();

        if let Some(l) = raw.limits {
            let defaults = Limits::default();
            let limits = &mut config.limits;
            if let Some(v) = l.min_partition_width {
                limits.min_partition_width = v;
            }
            if let Some(v) = l.partition_reserve {
                limits.partition_reserve = v;
            }
            if let Some(v) = l.min_shelf_height {
                limits.min_shelf_height = v;
            }
            if let Some(v) = l.max_shelf_height {
                limits.max_shelf_height = v;
            }
            if let Some(v) = l.default_shelf_height {
                limits.default_shelf_height = v;
            }
            if let Some(v) = l.min_cabinet_width {
                limits.min_cabinet_width = v;
            }
            if let Some(v) = l.max_cabinet_width {
                limits.max_cabinet_width = v;
            }
            if let Some(v) = l.min_cabinet_height {
                limits.min_cabinet_height = v;
            }
            if let Some(v) = l.max_cabinet_height {
                limits.max_cabinet_height = v;
            }
            if let Some(v) = l.slat_width {
                limits.slat_width = v;
            }

            if !positive(limits.min_partition_width) || !non_negative(limits.partition_reserve) {
                log::warn!("limits: partition bounds must be positive, using defaults");
                limits.min_partition_width = defaults.min_partition_width;
                limits.partition_reserve = defaults.partition_reserve;
            }
            if !ordered(limits.min_shelf_height, limits.max_shelf_height)
                || !(limits.min_shelf_height..=limits.max_shelf_height)
                    .contains(&limits.default_shelf_height)
            {
                log::warn!("limits: shelf heights are inconsistent, using defaults");
                limits.min_shelf_height = defaults.min_shelf_height;
                limits.max_shelf_height = defaults.max_shelf_height;
                limits.default_shelf_height = defaults.default_shelf_height;
            }
            if !ordered(limits.min_cabinet_width, limits.max_cabinet_width) {
                log::warn!("limits: cabinet widths are inconsistent, using defaults");
                limits.min_cabinet_width = defaults.min_cabinet_width;
                limits.max_cabinet_width = defaults.max_cabinet_width;
            }
            if !ordered(limits.min_cabinet_height, limits.max_cabinet_height) {
                log::warn!("limits: cabinet heights are inconsistent, using defaults");
                limits.min_cabinet_height = defaults.min_cabinet_height;
                limits.max_cabinet_height = defaults.max_cabinet_height;
            }
            if !positive(limits.slat_width) {
                log::warn!("limits: slat_width must be positive, using default");
                limits.slat_width = defaults.slat_width;
            }
        }

        if let Some(v) = raw.view {
            if let Some(w) = v.canvas_width.filter(|w| positive(*w)) {
                config.view.canvas_width = w;
            }
            if let Some(w) = v.detail_width.filter(|w| positive(*w)) {
                config.view.detail_width = w;
            }
        }

        if let Some(d) = raw.drag {
            if let Some(name) = d.anchoring {
                match Anchoring::from_name(&name) {
                    Some(a) => config.drag.anchoring = a,
                    None => log::warn!("drag: unknown anchoring '{}', keeping default", name),
                }
            }
        }

        config
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn ordered(min: f64, max: f64) -> bool {
    positive(min) && positive(max) && min <= max
}

// ---------------------------------------------------------------------------
// Raw TOML structs (all-optional for merge)
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
struct RawConfig {
    limits: Option<RawLimits>,
    view: Option<RawView>,
    drag: Option<RawDrag>,
}

#[derive(Deserialize, Default)]
struct RawLimits {
    min_partition_width: Option<f64>,
    partition_reserve: Option<f64>,
    min_shelf_height: Option<f64>,
    max_shelf_height: Option<f64>,
    default_shelf_height: Option<f64>,
    min_cabinet_width: Option<f64>,
    max_cabinet_width: Option<f64>,
    min_cabinet_height: Option<f64>,
    max_cabinet_height: Option<f64>,
    slat_width: Option<f64>,
}

#[derive(Deserialize, Default)]
struct RawView {
    canvas_width: Option<f64>,
    detail_width: Option<f64>,
}

#[derive(Deserialize, Default)]
struct RawDrag {
    anchoring: Option<String>,
}
