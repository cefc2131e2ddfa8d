use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::coords::Rect;

/// Input from the host, one pointer sample or command at a time.
///
/// Shelves and partitions are addressed by position in the current tree,
/// so a recorded session can be replayed against a fresh cabinet whose ids
/// differ. Pointer coordinates are in screen space.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DesignEvent {
    MountCanvas {
        origin: Rect,
    },
    MountDetail {
        origin: Rect,
    },
    UnmountDetail,
    ShelfEdgeDown {
        shelf: usize,
        x: f64,
        y: f64,
    },
    PartitionEdgeDown {
        shelf: usize,
        partition: usize,
        x: f64,
        y: f64,
    },
    SubdivisionEdgeDown {
        index: usize,
        x: f64,
        y: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp,
    /// Double-click on a shelf: split the partition under the pointer.
    DoubleClick {
        shelf: usize,
        x: f64,
        y: f64,
    },
    AddShelf,
    RemoveShelf {
        shelf: usize,
    },
    RemovePartition {
        shelf: usize,
        partition: usize,
    },
    Select {
        shelf: usize,
        partition: usize,
    },
    ClearSelection,
    Subdivide {
        count: usize,
    },
    ClearSubdivisions,
    SetWidth {
        width: f64,
    },
    SetHeight {
        height: f64,
    },
    ResetHeights,
}

/// Parse a script of JSON events, one per line. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_script(text: &str) -> anyhow::Result<Vec<DesignEvent>> {
    let mut events = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line)
            .with_context(|| format!("invalid event on line {}", n + 1))?;
        events.push(event);
    }
    Ok(events)
}

pub fn read_script(path: &Path) -> anyhow::Result<Vec<DesignEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_script(&text).with_context(|| format!("in {}", path.display()))
}
