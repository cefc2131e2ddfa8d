//! Drag-resize algorithms.
//!
//! Every function takes the current tree and returns a new one; on `Err` the
//! caller keeps the tree it already has. Size is only ever traded between an
//! element and its right neighbour, so row totals never change.

use crate::error::Rejected;
use crate::layout::{occupied_width, Cabinet, LayoutParams, PartitionId, ShelfId};

fn finite(delta: f64) -> Result<f64, Rejected> {
    if delta.is_finite() {
        Ok(delta)
    } else {
        Err(Rejected::NonFinite)
    }
}

/// Change one shelf's height by `delta_y`, clamped to the shelf height range.
pub fn resize_shelf(
    cabinet: &Cabinet,
    shelf_id: ShelfId,
    delta_y: f64,
    params: &LayoutParams,
) -> Result<Cabinet, Rejected> {
    let delta_y = finite(delta_y)?;
    let mut next = cabinet.clone();
    let shelf = next
        .shelf_mut(shelf_id)
        .ok_or(Rejected::UnknownShelf(shelf_id))?;
    shelf.height = (shelf.height + delta_y).clamp(params.min_shelf_height, params.max_shelf_height);
    Ok(next)
}

/// Move the right edge of a partition by `delta_x`, trading width with its
/// right neighbour. The move stalls (is rejected) when the neighbour would
/// fall below the partition floor.
pub fn resize_partition(
    cabinet: &Cabinet,
    shelf_id: ShelfId,
    partition_id: PartitionId,
    delta_x: f64,
    params: &LayoutParams,
) -> Result<Cabinet, Rejected> {
    let delta_x = finite(delta_x)?;
    let mut next = cabinet.clone();
    let cabinet_width = next.width;
    let shelf = next
        .shelf_mut(shelf_id)
        .ok_or(Rejected::UnknownShelf(shelf_id))?;
    let index = shelf
        .partition_index(partition_id)
        .ok_or(Rejected::UnknownPartition(partition_id))?;
    if index + 1 >= shelf.partitions.len() {
        return Err(Rejected::NoRightNeighbor);
    }

    let floor = params.min_partition_width;
    let ceiling = (cabinet_width - params.partition_reserve).max(floor);
    let old_width = shelf.partitions[index].width;
    let new_width = (old_width + delta_x).clamp(floor, ceiling);
    let width_diff = new_width - old_width;

    let neighbor_width = shelf.partitions[index + 1].width - width_diff;
    if neighbor_width < floor {
        return Err(Rejected::NeighborFloor {
            width: neighbor_width,
            floor,
        });
    }

    let left_subs = refit_subdivisions(
        &shelf.partitions[index].subdivisions,
        new_width,
        params.slat_width,
    )
    .ok_or(Rejected::SubdivisionFloor(new_width))?;
    let right_subs = refit_subdivisions(
        &shelf.partitions[index + 1].subdivisions,
        neighbor_width,
        params.slat_width,
    )
    .ok_or(Rejected::SubdivisionFloor(neighbor_width))?;

    let left = &mut shelf.partitions[index];
    left.width = new_width;
    left.subdivisions = left_subs;
    let right = &mut shelf.partitions[index + 1];
    right.width = neighbor_width;
    right.subdivisions = right_subs;
    Ok(next)
}

/// Move boundary `index` inside a partition's subdivisions by `delta_x`,
/// trading width with subdivision `index + 1`.
pub fn resize_subdivision(
    cabinet: &Cabinet,
    partition_id: PartitionId,
    index: usize,
    delta_x: f64,
    params: &LayoutParams,
) -> Result<Cabinet, Rejected> {
    let delta_x = finite(delta_x)?;
    let slat = params.slat_width;
    let mut next = cabinet.clone();
    let partition = next
        .partition_mut(partition_id)
        .ok_or(Rejected::UnknownPartition(partition_id))?;
    let subs = &mut partition.subdivisions;
    if index >= subs.len() {
        return Err(Rejected::UnknownSubdivision(index));
    }
    if index + 1 >= subs.len() {
        return Err(Rejected::NoRightNeighbor);
    }

    let new_width = (subs[index] + delta_x).max(slat);
    let max_total = partition.width - (subs.len() - 1) as f64 * slat;
    let others: f64 = subs
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, w)| *w)
        .sum();
    let available = max_total - others;
    if new_width > available {
        return Err(Rejected::SubdivisionOverflow {
            requested: new_width,
            available,
        });
    }

    let width_diff = new_width - subs[index];
    let neighbor_width = subs[index + 1] - width_diff;
    if neighbor_width < slat {
        return Err(Rejected::NeighborFloor {
            width: neighbor_width,
            floor: slat,
        });
    }
    subs[index] = new_width;
    subs[index + 1] = neighbor_width;
    Ok(next)
}

/// Make subdivisions fit into `width`. Overflow is taken from the rightmost
/// subdivisions first, none of them going below `slat_width`. Slack is left
/// alone. `None` when they cannot fit at all.
pub(crate) fn refit_subdivisions(
    subdivisions: &[f64],
    width: f64,
    slat_width: f64,
) -> Option<Vec<f64>> {
    let mut subs = subdivisions.to_vec();
    let mut overflow = occupied_width(&subs, slat_width) - width;
    if overflow <= 0.0 {
        return Some(subs);
    }
    for w in subs.iter_mut().rev() {
        let take = overflow.min(*w - slat_width).max(0.0);
        *w -= take;
        overflow -= take;
        if overflow <= 0.0 {
            return Some(subs);
        }
    }
    None
}
