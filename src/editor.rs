//! Structural edits: adding and removing shelves and partitions, subdividing
//! partitions, and changing the cabinet's outer size.
//!
//! Like the resize engine, every edit returns a new tree and never touches the
//! one it was given.

use crate::error::Rejected;
use crate::layout::{Cabinet, LayoutParams, Partition, PartitionId, Shelf, ShelfId};
use crate::resize::refit_subdivisions;

/// Append a shelf of default height holding one full-width partition.
pub fn add_shelf(cabinet: &Cabinet, params: &LayoutParams) -> (Cabinet, ShelfId) {
    let mut next = cabinet.clone();
    let shelf = Shelf::new(params.default_shelf_height, cabinet.width);
    let id = shelf.id;
    next.shelves.push(shelf);
    (next, id)
}

/// Drop a shelf and everything in it. Other shelves are independent in
/// height, so nothing is redistributed.
pub fn remove_shelf(cabinet: &Cabinet, shelf_id: ShelfId) -> Result<Cabinet, Rejected> {
    let index = cabinet
        .shelf_index(shelf_id)
        .ok_or(Rejected::UnknownShelf(shelf_id))?;
    let mut next = cabinet.clone();
    next.shelves.remove(index);
    Ok(next)
}

/// Split the partition under `click_x` (model space, measured from the shelf's
/// left edge) into two. Clicks outside every partition split the first one.
///
/// The left half keeps the original id; the right half gets a fresh id and is
/// inserted right after it. The left width is clamped so both halves respect
/// the floor, and the right width is always the exact remainder.
pub fn add_partition(
    cabinet: &Cabinet,
    shelf_id: ShelfId,
    click_x: f64,
    params: &LayoutParams,
) -> Result<(Cabinet, PartitionId), Rejected> {
    if !click_x.is_finite() {
        return Err(Rejected::NonFinite);
    }
    let mut next = cabinet.clone();
    let shelf = next
        .shelf_mut(shelf_id)
        .ok_or(Rejected::UnknownShelf(shelf_id))?;
    if shelf.partitions.is_empty() {
        return Err(Rejected::LastPartition);
    }

    let index = shelf.partition_at(click_x).unwrap_or(0);
    let floor = params.min_partition_width;
    let original = shelf.partitions[index].width;
    if original < 2.0 * floor {
        return Err(Rejected::TooNarrowToSplit {
            width: original,
            needed: 2.0 * floor,
        });
    }

    let relative_x = click_x - shelf.partition_offset(index);
    let left_width = relative_x.clamp(floor, original - floor);
    let right_width = original - left_width;

    let target = &mut shelf.partitions[index];
    target.subdivisions =
        match refit_subdivisions(&target.subdivisions, left_width, params.slat_width) {
            Some(subs) => subs,
            None => {
                log::debug!("split of {} dropped subdivisions that no longer fit", target.id);
                Vec::new()
            }
        };
    target.width = left_width;

    let added = Partition::new(right_width);
    let id = added.id;
    shelf.partitions.insert(index + 1, added);
    Ok((next, id))
}

/// Remove a partition, donating its width to the next partition, or to the
/// previous one when it was the last. A shelf never loses its only partition.
pub fn remove_partition(
    cabinet: &Cabinet,
    shelf_id: ShelfId,
    partition_id: PartitionId,
) -> Result<Cabinet, Rejected> {
    let mut next = cabinet.clone();
    let shelf = next
        .shelf_mut(shelf_id)
        .ok_or(Rejected::UnknownShelf(shelf_id))?;
    if shelf.partitions.len() <= 1 {
        return Err(Rejected::LastPartition);
    }
    let index = shelf
        .partition_index(partition_id)
        .ok_or(Rejected::UnknownPartition(partition_id))?;

    let removed = shelf.partitions.remove(index);
    let receiver = if index < shelf.partitions.len() {
        index
    } else {
        index - 1
    };
    shelf.partitions[receiver].width += removed.width;
    Ok(next)
}

/// Replace a partition's subdivisions with `count` equal ones separated by
/// slats.
pub fn subdivide_partition(
    cabinet: &Cabinet,
    partition_id: PartitionId,
    count: usize,
    params: &LayoutParams,
) -> Result<Cabinet, Rejected> {
    if count == 0 {
        return Err(Rejected::NoSubdivisions);
    }
    let slat = params.slat_width;
    let mut next = cabinet.clone();
    let partition = next
        .partition_mut(partition_id)
        .ok_or(Rejected::UnknownPartition(partition_id))?;

    let each = (partition.width - (count - 1) as f64 * slat) / count as f64;
    if each < slat {
        return Err(Rejected::SubdivisionFloor(partition.width));
    }
    partition.subdivisions = vec![each; count];
    Ok(next)
}

pub fn clear_subdivisions(
    cabinet: &Cabinet,
    partition_id: PartitionId,
) -> Result<Cabinet, Rejected> {
    let mut next = cabinet.clone();
    let partition = next
        .partition_mut(partition_id)
        .ok_or(Rejected::UnknownPartition(partition_id))?;
    partition.subdivisions.clear();
    Ok(next)
}

/// Change the cabinet width (clamped to the configured range) and resize
/// every shelf's partitions to match. Growth goes to the last partition;
/// shrinking is taken from the rightmost partitions down to the floor.
pub fn set_cabinet_width(
    cabinet: &Cabinet,
    width: f64,
    params: &LayoutParams,
) -> Result<Cabinet, Rejected> {
    if !width.is_finite() {
        return Err(Rejected::NonFinite);
    }
    let width = width.clamp(params.min_cabinet_width, params.max_cabinet_width);
    let delta = width - cabinet.width;
    let mut next = cabinet.clone();
    next.width = width;

    for shelf in &mut next.shelves {
        if delta >= 0.0 {
            if let Some(last) = shelf.partitions.last_mut() {
                last.width += delta;
            }
            continue;
        }
        let mut shortfall = -delta;
        for p in shelf.partitions.iter_mut().rev() {
            let take = shortfall.min(p.width - params.min_partition_width).max(0.0);
            if take > 0.0 {
                p.width -= take;
                p.subdivisions = refit_subdivisions(&p.subdivisions, p.width, params.slat_width)
                    .ok_or(Rejected::CabinetTooNarrow(shelf.id))?;
                shortfall -= take;
            }
            if shortfall <= 0.0 {
                break;
            }
        }
        if shortfall > 0.0 {
            return Err(Rejected::CabinetTooNarrow(shelf.id));
        }
    }
    Ok(next)
}

pub fn set_cabinet_height(
    cabinet: &Cabinet,
    height: f64,
    params: &LayoutParams,
) -> Result<Cabinet, Rejected> {
    if !height.is_finite() {
        return Err(Rejected::NonFinite);
    }
    let mut next = cabinet.clone();
    next.height = height.clamp(params.min_cabinet_height, params.max_cabinet_height);
    Ok(next)
}

/// Put every shelf back at the default height.
pub fn reset_shelf_heights(cabinet: &Cabinet, params: &LayoutParams) -> Cabinet {
    let mut next = cabinet.clone();
    for shelf in &mut next.shelves {
        shelf.height = params.default_shelf_height;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_shelf(widths: &[f64]) -> Cabinet {
        let width = widths.iter().sum();
        Cabinet::with_shelves(width, 600.0, vec![Shelf::with_partitions(120.0, widths)])
    }

    fn widths(shelf: &Shelf) -> Vec<f64> {
        shelf.partitions.iter().map(|p| p.width).collect()
    }

    #[test]
    fn test_add_shelf_appends_full_width_shelf() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[400.0, 400.0]);
        let (next, id) = add_shelf(&cabinet, &params);
        assert_eq!(next.shelves.len(), 2);
        let shelf = next.shelf(id).unwrap();
        assert_eq!(shelf.height, 120.0);
        assert_eq!(widths(shelf), vec![800.0]);
        assert_eq!(next.shelves[1].id, id);
        assert!(!cabinet.partition_ids().contains(&shelf.partitions[0].id));
        assert_eq!(next.check(&params), Ok(()));
    }

    #[test]
    fn test_remove_shelf() {
        let params = LayoutParams::default();
        let (cabinet, id) = add_shelf(&single_shelf(&[800.0]), &params);
        let next = remove_shelf(&cabinet, id).unwrap();
        assert_eq!(next.shelves.len(), 1);
        assert_eq!(next.width, cabinet.width);
        assert_eq!(next.height, cabinet.height);
        assert_eq!(remove_shelf(&next, id), Err(Rejected::UnknownShelf(id)));
    }

    #[test]
    fn test_add_partition_splits_at_click() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[800.0]);
        let shelf_id = cabinet.shelves[0].id;
        let original = cabinet.shelves[0].partitions[0].id;

        let (next, added) = add_partition(&cabinet, shelf_id, 300.0, &params).unwrap();
        let shelf = next.shelf(shelf_id).unwrap();
        assert_eq!(widths(shelf), vec![300.0, 500.0]);
        assert_eq!(shelf.partition_ids(), vec![original, added]);
    }

    #[test]
    fn test_add_partition_in_later_partition() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[266.0, 266.0, 268.0]);
        let shelf_id = cabinet.shelves[0].id;
        let before = cabinet.shelves[0].partition_ids();

        let (next, added) = add_partition(&cabinet, shelf_id, 632.0, &params).unwrap();
        let shelf = next.shelf(shelf_id).unwrap();
        assert_eq!(widths(shelf), vec![266.0, 266.0, 100.0, 168.0]);
        assert_eq!(
            shelf.partition_ids(),
            vec![before[0], before[1], before[2], added]
        );
    }

    #[test]
    fn test_add_partition_near_edges_keeps_floor_and_total() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[800.0]);
        let shelf_id = cabinet.shelves[0].id;

        let (left, _) = add_partition(&cabinet, shelf_id, 10.0, &params).unwrap();
        assert_eq!(widths(&left.shelves[0]), vec![50.0, 750.0]);

        let (right, _) = add_partition(&cabinet, shelf_id, 790.0, &params).unwrap();
        assert_eq!(widths(&right.shelves[0]), vec![750.0, 50.0]);
    }

    #[test]
    fn test_add_partition_outside_defaults_to_first() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[400.0, 400.0]);
        let shelf_id = cabinet.shelves[0].id;

        let (next, _) = add_partition(&cabinet, shelf_id, 950.0, &params).unwrap();
        // Relative click is past the first partition, so the left half is clamped
        assert_eq!(widths(&next.shelves[0]), vec![350.0, 50.0, 400.0]);
    }

    #[test]
    fn test_add_partition_too_narrow() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[80.0, 720.0]);
        let shelf_id = cabinet.shelves[0].id;
        assert_eq!(
            add_partition(&cabinet, shelf_id, 40.0, &params).map(|_| ()),
            Err(Rejected::TooNarrowToSplit {
                width: 80.0,
                needed: 100.0
            })
        );
    }

    #[test]
    fn test_add_partition_refits_subdivisions() {
        let params = LayoutParams::default();
        let mut cabinet = single_shelf(&[800.0]);
        cabinet.shelves[0].partitions[0].subdivisions = vec![394.0, 394.0];
        let shelf_id = cabinet.shelves[0].id;

        let (next, _) = add_partition(&cabinet, shelf_id, 500.0, &params).unwrap();
        assert_eq!(next.shelves[0].partitions[0].subdivisions, vec![394.0, 94.0]);
        assert!(next.shelves[0].partitions[1].subdivisions.is_empty());

        cabinet.shelves[0].partitions[0].subdivisions = vec![258.0, 258.0, 260.0];
        // Three subdivisions need 60, the left half only gets 50
        let (dropped, _) = add_partition(&cabinet, shelf_id, 20.0, &params).unwrap();
        assert!(dropped.shelves[0].partitions[0].subdivisions.is_empty());
        assert_eq!(dropped.check(&params), Ok(()));
    }

    #[test]
    fn test_remove_partition_donates_to_next() {
        let cabinet = single_shelf(&[266.0, 266.0, 268.0]);
        let shelf_id = cabinet.shelves[0].id;
        let ids = cabinet.shelves[0].partition_ids();

        let next = remove_partition(&cabinet, shelf_id, ids[1]).unwrap();
        assert_eq!(widths(&next.shelves[0]), vec![266.0, 534.0]);
        assert_eq!(next.shelves[0].partition_ids(), vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_remove_last_partition_donates_to_previous() {
        let cabinet = single_shelf(&[266.0, 266.0, 268.0]);
        let shelf_id = cabinet.shelves[0].id;
        let ids = cabinet.shelves[0].partition_ids();

        let next = remove_partition(&cabinet, shelf_id, ids[2]).unwrap();
        assert_eq!(widths(&next.shelves[0]), vec![266.0, 534.0]);
    }

    #[test]
    fn test_remove_only_partition_refused() {
        let cabinet = single_shelf(&[800.0]);
        let shelf_id = cabinet.shelves[0].id;
        let id = cabinet.shelves[0].partitions[0].id;
        assert_eq!(
            remove_partition(&cabinet, shelf_id, id),
            Err(Rejected::LastPartition)
        );
    }

    #[test]
    fn test_remove_unknown_partition() {
        let cabinet = single_shelf(&[400.0, 400.0]);
        let shelf_id = cabinet.shelves[0].id;
        let missing = PartitionId::new_v4();
        assert_eq!(
            remove_partition(&cabinet, shelf_id, missing),
            Err(Rejected::UnknownPartition(missing))
        );
    }

    #[test]
    fn test_subdivide_even() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[400.0, 400.0]);
        let id = cabinet.shelves[0].partitions[0].id;

        let next = subdivide_partition(&cabinet, id, 3, &params).unwrap();
        let p = &next.shelves[0].partitions[0];
        assert_eq!(p.subdivisions, vec![376.0 / 3.0; 3]);
        assert!((p.occupied_width(params.slat_width) - 400.0).abs() < 1e-9);

        assert_eq!(
            subdivide_partition(&cabinet, id, 0, &params),
            Err(Rejected::NoSubdivisions)
        );
        assert_eq!(
            subdivide_partition(&cabinet, id, 20, &params),
            Err(Rejected::SubdivisionFloor(400.0))
        );

        let cleared = clear_subdivisions(&next, id).unwrap();
        assert!(cleared.shelves[0].partitions[0].subdivisions.is_empty());
    }

    #[test]
    fn test_set_cabinet_width_grows_last_partition() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[400.0, 400.0]);
        let next = set_cabinet_width(&cabinet, 1000.0, &params).unwrap();
        assert_eq!(next.width, 1000.0);
        assert_eq!(widths(&next.shelves[0]), vec![400.0, 600.0]);

        let capped = set_cabinet_width(&cabinet, 5000.0, &params).unwrap();
        assert_eq!(capped.width, 1200.0);
        assert_eq!(capped.check(&params), Ok(()));
    }

    #[test]
    fn test_set_cabinet_width_shrinks_from_the_right() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[400.0, 100.0, 300.0]);
        let next = set_cabinet_width(&cabinet, 500.0, &params).unwrap();
        assert_eq!(widths(&next.shelves[0]), vec![400.0, 50.0, 50.0]);
        assert_eq!(next.check(&params), Ok(()));
    }

    #[test]
    fn test_set_cabinet_width_too_many_partitions() {
        let params = LayoutParams::default();
        let cabinet = single_shelf(&[50.0; 10]);
        let id = cabinet.shelves[0].id;
        assert_eq!(
            set_cabinet_width(&cabinet, 400.0, &params),
            Err(Rejected::CabinetTooNarrow(id))
        );
    }

    #[test]
    fn test_set_cabinet_height_and_reset_heights() {
        let params = LayoutParams::default();
        let mut cabinet = single_shelf(&[800.0]);
        cabinet.shelves[0].height = 180.0;

        let next = set_cabinet_height(&cabinet, 100.0, &params).unwrap();
        assert_eq!(next.height, 300.0);
        assert_eq!(next.shelves[0].height, 180.0);

        let reset = reset_shelf_heights(&next, &params);
        assert_eq!(reset.shelves[0].height, 120.0);
    }
}
