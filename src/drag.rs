//! Drag session state.
//!
//! A session starts on pointer-down over a resizable edge and lasts until
//! pointer-up, wherever that happens. While it is active the host's global
//! pointer listeners are held through a `CaptureGuard`, so ending the session
//! on any path releases them.

use std::fmt;
use std::rc::Rc;

use crate::config::Anchoring;
use crate::coords::Point;
use crate::layout::{PartitionId, ShelfId};

/// Host hook for installing and removing global pointer listeners.
pub trait PointerCapture {
    fn acquire(&self);
    fn release(&self);
}

/// Capture for hosts that deliver pointer events globally anyway.
#[derive(Debug, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn acquire(&self) {}
    fn release(&self) {}
}

/// Holds an acquired capture and releases it when dropped.
pub struct CaptureGuard {
    capture: Rc<dyn PointerCapture>,
}

impl CaptureGuard {
    pub fn acquire(capture: Rc<dyn PointerCapture>) -> Self {
        capture.acquire();
        Self { capture }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.capture.release();
    }
}

impl fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CaptureGuard")
    }
}

/// The edge being dragged. Subdivision drags always act on the selected
/// partition, which is recorded when the drag starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    ShelfEdge {
        shelf_id: ShelfId,
    },
    PartitionEdge {
        shelf_id: ShelfId,
        partition_id: PartitionId,
    },
    SubdivisionEdge {
        partition_id: PartitionId,
        index: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    DraggingShelf,
    DraggingPartition,
    DraggingSubdivision,
}

impl DragTarget {
    pub fn phase(&self) -> DragPhase {
        match self {
            DragTarget::ShelfEdge { .. } => DragPhase::DraggingShelf,
            DragTarget::PartitionEdge { .. } => DragPhase::DraggingPartition,
            DragTarget::SubdivisionEdge { .. } => DragPhase::DraggingSubdivision,
        }
    }
}

/// Motion to apply to the resize engine for one pointer sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragStep {
    pub target: DragTarget,
    pub delta: Point,
}

#[derive(Debug)]
struct ActiveDrag {
    target: DragTarget,
    anchor: Point,
    last: Point,
    _capture: CaptureGuard,
}

#[derive(Debug, Default)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.active
            .as_ref()
            .map_or(DragPhase::Idle, |a| a.target.phase())
    }

    pub fn target(&self) -> Option<DragTarget> {
        self.active.as_ref().map(|a| a.target)
    }

    /// Model-space point where the session started.
    pub fn anchor(&self) -> Option<Point> {
        self.active.as_ref().map(|a| a.anchor)
    }

    /// Start a session at `anchor`. A session already in progress is ended
    /// first, releasing its capture before the new one is acquired.
    pub fn begin(&mut self, target: DragTarget, anchor: Point, capture: Rc<dyn PointerCapture>) {
        self.end();
        log::trace!("drag start {:?} at ({}, {})", target, anchor.x, anchor.y);
        self.active = Some(ActiveDrag {
            target,
            anchor,
            last: anchor,
            _capture: CaptureGuard::acquire(capture),
        });
    }

    /// Turn a model-space pointer sample into a resize step. `None` while idle.
    pub fn step(&mut self, current: Point, anchoring: Anchoring) -> Option<DragStep> {
        let active = self.active.as_mut()?;
        let reference = match anchoring {
            Anchoring::Incremental => active.last,
            Anchoring::Fixed => active.anchor,
        };
        active.last = current;
        Some(DragStep {
            target: active.target,
            delta: Point::new(current.x - reference.x, current.y - reference.y),
        })
    }

    /// End the session, if any. Returns whether one was active.
    pub fn end(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                log::trace!("drag end {:?}", active.target);
                true
            }
            None => false,
        }
    }
}
