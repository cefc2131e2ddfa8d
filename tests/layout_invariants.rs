//! Property-based invariant tests for the layout engine.
//!
//! Random sequences of edits are applied to a preset cabinet. After every
//! step the following must hold:
//!
//! 1. Each shelf's partition widths sum to the cabinet width
//! 2. Partitions, shelves and subdivisions stay within their limits
//! 3. Resizing never changes which ids exist or their order
//! 4. Splitting keeps the left id and adds exactly one fresh id
//! 5. Removing a partition removes exactly that id
//! 6. A drag session always releases its pointer capture

use std::cell::Cell;
use std::rc::Rc;

use cabinet_designer::coords::{Point, Rect};
use cabinet_designer::drag::PointerCapture;
use cabinet_designer::presets::Preset;
use cabinet_designer::{editor, resize};
use cabinet_designer::{Cabinet, Config, Designer, LayoutParams};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    ResizeShelf(usize, i32),
    ResizePartition(usize, usize, i32),
    ResizeSubdivision(usize, usize, usize, i32),
    AddShelf,
    RemoveShelf(usize),
    AddPartition(usize, i32),
    RemovePartition(usize, usize),
    Subdivide(usize, usize, usize),
    SetWidth(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8, -300i32..300).prop_map(|(s, d)| Op::ResizeShelf(s, d)),
        (0usize..8, 0usize..8, -900i32..900).prop_map(|(s, p, d)| Op::ResizePartition(s, p, d)),
        (0usize..8, 0usize..8, 0usize..6, -300i32..300)
            .prop_map(|(s, p, i, d)| Op::ResizeSubdivision(s, p, i, d)),
        Just(Op::AddShelf),
        (0usize..8).prop_map(Op::RemoveShelf),
        (0usize..8, -100i32..1300).prop_map(|(s, x)| Op::AddPartition(s, x)),
        (0usize..8, 0usize..8).prop_map(|(s, p)| Op::RemovePartition(s, p)),
        (0usize..8, 0usize..8, 0usize..6).prop_map(|(s, p, n)| Op::Subdivide(s, p, n)),
        (200i32..1400).prop_map(Op::SetWidth),
    ]
}

fn preset_strategy() -> impl Strategy<Value = Preset> {
    prop_oneof![
        Just(Preset::Classic),
        Just(Preset::Single),
        (1usize..5, 1usize..8).prop_map(|(shelves, partitions)| Preset::Even {
            shelves,
            partitions
        }),
    ]
}

/// Resolve a positional shelf reference, wrapping around.
fn shelf_at(cabinet: &Cabinet, s: usize) -> Option<usize> {
    (!cabinet.shelves.is_empty()).then(|| s % cabinet.shelves.len())
}

/// Apply one op; `Ok(None)` means the op had nothing to act on.
fn apply(
    cabinet: &Cabinet,
    op: &Op,
    params: &LayoutParams,
) -> Result<Option<Cabinet>, cabinet_designer::Rejected> {
    let shelf = |s: usize| shelf_at(cabinet, s).map(|i| &cabinet.shelves[i]);
    let partition = |s: usize, p: usize| {
        shelf(s).map(|sh| (sh.id, &sh.partitions[p % sh.partitions.len()]))
    };

    let next = match *op {
        Op::ResizeShelf(s, d) => match shelf(s) {
            Some(sh) => resize::resize_shelf(cabinet, sh.id, d as f64, params)?,
            None => return Ok(None),
        },
        Op::ResizePartition(s, p, d) => match partition(s, p) {
            Some((sid, part)) => {
                resize::resize_partition(cabinet, sid, part.id, d as f64, params)?
            }
            None => return Ok(None),
        },
        Op::ResizeSubdivision(s, p, i, d) => match partition(s, p) {
            Some((_, part)) => resize::resize_subdivision(cabinet, part.id, i, d as f64, params)?,
            None => return Ok(None),
        },
        Op::AddShelf => editor::add_shelf(cabinet, params).0,
        Op::RemoveShelf(s) => match shelf(s) {
            Some(sh) => editor::remove_shelf(cabinet, sh.id)?,
            None => return Ok(None),
        },
        Op::AddPartition(s, x) => match shelf(s) {
            Some(sh) => editor::add_partition(cabinet, sh.id, x as f64, params)?.0,
            None => return Ok(None),
        },
        Op::RemovePartition(s, p) => match partition(s, p) {
            Some((sid, part)) => editor::remove_partition(cabinet, sid, part.id)?,
            None => return Ok(None),
        },
        Op::Subdivide(s, p, n) => match partition(s, p) {
            Some((_, part)) => editor::subdivide_partition(cabinet, part.id, n, params)?,
            None => return Ok(None),
        },
        Op::SetWidth(w) => editor::set_cabinet_width(cabinet, w as f64, params)?,
    };
    Ok(Some(next))
}

// ═══════════════════════════════════════════════════════════════════════
// 1-2. Every reachable tree is valid
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_reachable_tree_is_valid(
        preset in preset_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let params = LayoutParams::default();
        let mut cabinet = preset.build(&params);
        prop_assert_eq!(cabinet.check(&params), Ok(()));

        for op in &ops {
            if let Ok(Some(next)) = apply(&cabinet, op, &params) {
                prop_assert_eq!(
                    next.check(&params),
                    Ok(()),
                    "{:?} broke the tree:\n{}", op, next
                );
                cabinet = next;
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Resizing keeps ids and order
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_keeps_ids(
        partitions in 2usize..8,
        index in 0usize..8,
        delta in -900i32..900,
    ) {
        let params = LayoutParams::default();
        let cabinet = Preset::Even { shelves: 1, partitions }.build(&params);
        let shelf = &cabinet.shelves[0];
        let target = shelf.partitions[index % shelf.partitions.len()].id;

        if let Ok(next) = resize::resize_partition(&cabinet, shelf.id, target, delta as f64, &params) {
            prop_assert_eq!(next.partition_ids(), cabinet.partition_ids());
            prop_assert_eq!(next.shelf_ids(), cabinet.shelf_ids());
        }
    }

    #[test]
    fn partition_width_bounded_by_reserve(
        delta in 0i32..2000,
    ) {
        let params = LayoutParams::default();
        let cabinet = Preset::Even { shelves: 1, partitions: 2 }.build(&params);
        let shelf = &cabinet.shelves[0];
        let first = shelf.partitions[0].id;

        let next = resize::resize_partition(&cabinet, shelf.id, first, delta as f64, &params)
            .unwrap();
        let width = next.shelves[0].partitions[0].width;
        prop_assert!(width <= cabinet.width - params.partition_reserve);
        prop_assert!(next.shelves[0].partitions[1].width >= params.min_partition_width);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4-5. Split and remove touch exactly one id
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn split_adds_one_fresh_id(
        partitions in 1usize..6,
        x in -100i32..1000,
    ) {
        let params = LayoutParams::default();
        let cabinet = Preset::Even { shelves: 1, partitions }.build(&params);
        let shelf_id = cabinet.shelves[0].id;
        let before = cabinet.partition_ids();

        if let Ok((next, added)) = editor::add_partition(&cabinet, shelf_id, x as f64, &params) {
            let after = next.partition_ids();
            prop_assert_eq!(after.len(), before.len() + 1);
            prop_assert!(!before.contains(&added));
            let pos = after.iter().position(|id| *id == added).unwrap();
            prop_assert!(pos >= 1);
            // Every old id survives, in order
            let mut old: Vec<_> = after.clone();
            old.remove(pos);
            prop_assert_eq!(old, before);
        }
    }

    #[test]
    fn remove_drops_exactly_one_id(
        partitions in 1usize..8,
        index in 0usize..8,
    ) {
        let params = LayoutParams::default();
        let cabinet = Preset::Even { shelves: 1, partitions }.build(&params);
        let shelf = &cabinet.shelves[0];
        let target = shelf.partitions[index % shelf.partitions.len()].id;

        match editor::remove_partition(&cabinet, shelf.id, target) {
            Ok(next) => {
                let mut expected = cabinet.partition_ids();
                expected.retain(|id| *id != target);
                prop_assert_eq!(next.partition_ids(), expected);
                prop_assert_eq!(next.shelves[0].total_width(), cabinet.width);
            }
            Err(_) => {
                prop_assert_eq!(shelf.partitions.len(), 1);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Drag sessions always release their capture
// ═══════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Counting {
    acquired: Cell<u32>,
    released: Cell<u32>,
}

impl PointerCapture for Counting {
    fn acquire(&self) {
        self.acquired.set(self.acquired.get() + 1);
    }
    fn release(&self) {
        self.released.set(self.released.get() + 1);
    }
}

proptest! {
    #[test]
    fn drag_releases_capture_and_keeps_tree_valid(
        path in prop::collection::vec((-200i32..1000, -200i32..800), 0..40),
        origin_x in 0i32..200,
    ) {
        let capture = Rc::new(Counting::default());
        let config = Config::default();
        let params = LayoutParams::from(&config.limits);
        let mut designer = Designer::new(Preset::Classic.build(&params), &config)
            .unwrap()
            .with_capture(capture.clone());
        designer.mount_cabinet_canvas(Rect::new(origin_x as f64, 0.0, 600.0, 450.0));

        let shelf = designer.cabinet().shelves[1].id;
        let first = designer.cabinet().shelves[1].partitions[0].id;
        prop_assert!(designer.pointer_down_partition_edge(shelf, first, Point::new(200.0, 100.0)));

        for (x, y) in path {
            designer.pointer_move(Point::new(x as f64, y as f64));
            prop_assert_eq!(designer.cabinet().check(designer.params()), Ok(()));
        }
        designer.pointer_up();
        prop_assert_eq!(capture.acquired.get(), 1);
        prop_assert_eq!(capture.released.get(), 1);
    }
}
