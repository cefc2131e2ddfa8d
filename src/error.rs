use thiserror::Error;

use crate::layout::{PartitionId, ShelfId};

/// Reasons an edit was refused. The tree an edit was applied to stays valid;
/// callers simply keep it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejected {
    #[error("shelf {0} not found")]
    UnknownShelf(ShelfId),
    #[error("partition {0} not found")]
    UnknownPartition(PartitionId),
    #[error("subdivision {0} not found")]
    UnknownSubdivision(usize),
    #[error("the last element of a row has no right neighbour to trade size with")]
    NoRightNeighbor,
    #[error("neighbour would drop to {width} (floor {floor})")]
    NeighborFloor { width: f64, floor: f64 },
    #[error("subdivision would need {requested} but only {available} is free")]
    SubdivisionOverflow { requested: f64, available: f64 },
    #[error("subdivisions no longer fit into a width of {0}")]
    SubdivisionFloor(f64),
    #[error("a shelf always keeps at least one partition")]
    LastPartition,
    #[error("partition of width {width} is too narrow to split (needs {needed})")]
    TooNarrowToSplit { width: f64, needed: f64 },
    #[error("subdivision count must be at least 1")]
    NoSubdivisions,
    #[error("shelf {0} cannot shrink to the requested cabinet width")]
    CabinetTooNarrow(ShelfId),
    #[error("input is not a finite number")]
    NonFinite,
}

/// Structural problems found by `Cabinet::check`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("shelf {shelf}: partitions sum to {sum}, cabinet is {width} wide")]
    Conservation { shelf: ShelfId, sum: f64, width: f64 },
    #[error("shelf {0} has no partitions")]
    EmptyShelf(ShelfId),
    #[error("partition {id} is {width} wide (floor {floor})")]
    PartitionFloor { id: PartitionId, width: f64, floor: f64 },
    #[error("shelf {id} is {height} high (allowed {min}..={max})")]
    ShelfHeight { id: ShelfId, height: f64, min: f64, max: f64 },
    #[error("partition {id} has a subdivision of {width} (floor {floor})")]
    SubdivisionFloor { id: PartitionId, width: f64, floor: f64 },
    #[error("partition {id}: subdivisions occupy {occupied} of {width}")]
    SubdivisionOverflow { id: PartitionId, occupied: f64, width: f64 },
    #[error("duplicate id {0}")]
    DuplicateId(uuid::Uuid),
}
