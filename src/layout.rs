use std::collections::HashSet;
use std::fmt;

use crate::config::Limits;
use crate::error::Violation;

pub type ShelfId = uuid::Uuid;
pub type PartitionId = uuid::Uuid;

/// Tolerance used when checking sums of widths built from fractional deltas.
const SUM_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub min_partition_width: f64,
    /// A single partition never grows past `cabinet.width - partition_reserve`.
    pub partition_reserve: f64,
    pub min_shelf_height: f64,
    pub max_shelf_height: f64,
    pub default_shelf_height: f64,
    pub min_cabinet_width: f64,
    pub max_cabinet_width: f64,
    pub min_cabinet_height: f64,
    pub max_cabinet_height: f64,
    pub slat_width: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from(&Limits::default())
    }
}

impl From<&Limits> for LayoutParams {
    fn from(l: &Limits) -> Self {
        Self {
            min_partition_width: l.min_partition_width,
            partition_reserve: l.partition_reserve,
            min_shelf_height: l.min_shelf_height,
            max_shelf_height: l.max_shelf_height,
            default_shelf_height: l.default_shelf_height,
            min_cabinet_width: l.min_cabinet_width,
            max_cabinet_width: l.max_cabinet_width,
            min_cabinet_height: l.min_cabinet_height,
            max_cabinet_height: l.max_cabinet_height,
            slat_width: l.slat_width,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    pub id: PartitionId,
    pub width: f64,
    /// Bare widths, separated by slats that are not modelled.
    pub subdivisions: Vec<f64>,
}

impl Partition {
    pub fn new(width: f64) -> Self {
        Self::with_id(PartitionId::new_v4(), width)
    }

    pub fn with_id(id: PartitionId, width: f64) -> Self {
        Self {
            id,
            width,
            subdivisions: Vec::new(),
        }
    }

    /// Width taken by the subdivisions plus the slats between them.
    pub fn occupied_width(&self, slat_width: f64) -> f64 {
        occupied_width(&self.subdivisions, slat_width)
    }
}

pub(crate) fn occupied_width(subdivisions: &[f64], slat_width: f64) -> f64 {
    if subdivisions.is_empty() {
        return 0.0;
    }
    subdivisions.iter().sum::<f64>() + (subdivisions.len() - 1) as f64 * slat_width
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shelf {
    pub id: ShelfId,
    pub height: f64,
    pub partitions: Vec<Partition>,
}

impl Shelf {
    /// A shelf with one partition spanning the whole cabinet.
    pub fn new(height: f64, cabinet_width: f64) -> Self {
        Self {
            id: ShelfId::new_v4(),
            height,
            partitions: vec![Partition::new(cabinet_width)],
        }
    }

    pub fn with_partitions(height: f64, widths: &[f64]) -> Self {
        Self {
            id: ShelfId::new_v4(),
            height,
            partitions: widths.iter().map(|w| Partition::new(*w)).collect(),
        }
    }

    pub fn partition_index(&self, id: PartitionId) -> Option<usize> {
        self.partitions.iter().position(|p| p.id == id)
    }

    /// Left edge of the partition at `index`: the sum of all widths before it.
    pub fn partition_offset(&self, index: usize) -> f64 {
        self.partitions.iter().take(index).map(|p| p.width).sum()
    }

    /// Index of the partition whose span `[offset, offset + width)` contains `x`.
    pub fn partition_at(&self, x: f64) -> Option<usize> {
        let mut offset = 0.0;
        for (i, p) in self.partitions.iter().enumerate() {
            if x >= offset && x < offset + p.width {
                return Some(i);
            }
            offset += p.width;
        }
        None
    }

    pub fn total_width(&self) -> f64 {
        self.partitions.iter().map(|p| p.width).sum()
    }

    pub fn partition_ids(&self) -> Vec<PartitionId> {
        self.partitions.iter().map(|p| p.id).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cabinet {
    pub width: f64,
    pub height: f64,
    pub shelves: Vec<Shelf>,
}

impl Cabinet {
    pub fn with_shelves(width: f64, height: f64, shelves: Vec<Shelf>) -> Self {
        Self {
            width,
            height,
            shelves,
        }
    }

    pub fn shelf(&self, id: ShelfId) -> Option<&Shelf> {
        self.shelves.iter().find(|s| s.id == id)
    }

    pub fn shelf_index(&self, id: ShelfId) -> Option<usize> {
        self.shelves.iter().position(|s| s.id == id)
    }

    /// Locate a partition anywhere in the cabinet.
    pub fn find_partition(&self, id: PartitionId) -> Option<(&Shelf, &Partition)> {
        self.shelves.iter().find_map(|shelf| {
            shelf
                .partitions
                .iter()
                .find(|p| p.id == id)
                .map(|p| (shelf, p))
        })
    }

    pub fn contains_partition(&self, id: PartitionId) -> bool {
        self.find_partition(id).is_some()
    }

    pub(crate) fn shelf_mut(&mut self, id: ShelfId) -> Option<&mut Shelf> {
        self.shelves.iter_mut().find(|s| s.id == id)
    }

    pub(crate) fn partition_mut(&mut self, id: PartitionId) -> Option<&mut Partition> {
        self.shelves
            .iter_mut()
            .flat_map(|s| s.partitions.iter_mut())
            .find(|p| p.id == id)
    }

    pub fn shelf_ids(&self) -> Vec<ShelfId> {
        self.shelves.iter().map(|s| s.id).collect()
    }

    /// All partition ids, shelf by shelf, left to right.
    pub fn partition_ids(&self) -> Vec<PartitionId> {
        self.shelves.iter().flat_map(|s| s.partition_ids()).collect()
    }

    /// Verify every structural invariant of the tree, returning the first
    /// violation found.
    pub fn check(&self, params: &LayoutParams) -> Result<(), Violation> {
        let mut seen = HashSet::new();
        for shelf in &self.shelves {
            if !seen.insert(shelf.id) {
                return Err(Violation::DuplicateId(shelf.id));
            }
            if shelf.partitions.is_empty() {
                return Err(Violation::EmptyShelf(shelf.id));
            }
            if shelf.height < params.min_shelf_height || shelf.height > params.max_shelf_height {
                return Err(Violation::ShelfHeight {
                    id: shelf.id,
                    height: shelf.height,
                    min: params.min_shelf_height,
                    max: params.max_shelf_height,
                });
            }
            let sum = shelf.total_width();
            if (sum - self.width).abs() > SUM_EPSILON * self.width.max(1.0) {
                return Err(Violation::Conservation {
                    shelf: shelf.id,
                    sum,
                    width: self.width,
                });
            }
            for p in &shelf.partitions {
                if !seen.insert(p.id) {
                    return Err(Violation::DuplicateId(p.id));
                }
                if p.width < params.min_partition_width {
                    return Err(Violation::PartitionFloor {
                        id: p.id,
                        width: p.width,
                        floor: params.min_partition_width,
                    });
                }
                if let Some(w) = p.subdivisions.iter().find(|w| **w < params.slat_width) {
                    return Err(Violation::SubdivisionFloor {
                        id: p.id,
                        width: *w,
                        floor: params.slat_width,
                    });
                }
                let occupied = p.occupied_width(params.slat_width);
                if occupied > p.width + SUM_EPSILON {
                    return Err(Violation::SubdivisionOverflow {
                        id: p.id,
                        occupied,
                        width: p.width,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Cabinet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cabinet {}x{}", self.width, self.height)?;
        for (i, shelf) in self.shelves.iter().enumerate() {
            let cells: Vec<String> = shelf
                .partitions
                .iter()
                .map(|p| {
                    if p.subdivisions.is_empty() {
                        format!("{}", p.width)
                    } else {
                        let subs: Vec<String> =
                            p.subdivisions.iter().map(|w| w.to_string()).collect();
                        format!("{} ({})", p.width, subs.join(" : "))
                    }
                })
                .collect();
            writeln!(f, "  shelf {} h={}: [{}]", i, shelf.height, cells.join(" | "))?;
        }
        Ok(())
    }
}
