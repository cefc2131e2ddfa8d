use std::rc::Rc;

use crate::config::{Anchoring, Config, ViewConfig};
use crate::coords::{self, CanvasMapper, Point, Rect};
use crate::drag::{DragPhase, DragSession, DragTarget, NoCapture, PointerCapture};
use crate::editor;
use crate::error::{Rejected, Violation};
use crate::event::DesignEvent;
use crate::layout::{Cabinet, LayoutParams, Partition, PartitionId, ShelfId};
use crate::resize;

/// The highlighted partition. Refers into the tree by id only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub shelf_id: ShelfId,
    pub partition_id: PartitionId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hover {
    Shelf(ShelfId),
    Partition(PartitionId),
}

/// Owns the current cabinet and the UI state derived from it.
///
/// Every edit replaces the cabinet with a new tree. Edits the engine refuses
/// leave the current tree in place and are only logged, so the tree held here
/// is always valid.
pub struct Designer {
    cabinet: Cabinet,
    params: LayoutParams,
    view: ViewConfig,
    anchoring: Anchoring,
    selection: Option<Selection>,
    hovered: Option<Hover>,
    drag: DragSession,
    cabinet_canvas: CanvasMapper,
    detail_canvas: CanvasMapper,
    capture: Rc<dyn PointerCapture>,
}

impl Designer {
    /// Start designing `cabinet`, which must satisfy the configured limits.
    pub fn new(cabinet: Cabinet, config: &Config) -> Result<Self, Violation> {
        let params = LayoutParams::from(&config.limits);
        cabinet.check(&params)?;
        Ok(Self {
            cabinet,
            params,
            view: config.view.clone(),
            anchoring: config.drag.anchoring,
            selection: None,
            hovered: None,
            drag: DragSession::new(),
            cabinet_canvas: CanvasMapper::mounted(Rect::default()),
            detail_canvas: CanvasMapper::unmounted(),
            capture: Rc::new(NoCapture),
        })
    }

    /// Use the host's pointer capture for drag sessions.
    pub fn with_capture(mut self, capture: Rc<dyn PointerCapture>) -> Self {
        self.capture = capture;
        self
    }

    pub fn cabinet(&self) -> &Cabinet {
        &self.cabinet
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn selected_partition(&self) -> Option<&Partition> {
        let sel = self.selection?;
        self.cabinet.find_partition(sel.partition_id).map(|(_, p)| p)
    }

    pub fn hovered(&self) -> Option<Hover> {
        self.hovered
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    pub fn drag_anchor(&self) -> Option<Point> {
        self.drag.anchor()
    }

    pub fn cabinet_scale(&self) -> f64 {
        coords::cabinet_scale(self.cabinet.width, self.view.canvas_width)
    }

    pub fn detail_scale(&self) -> f64 {
        coords::detail_scale(
            self.selected_partition().map(|p| p.width),
            self.view.detail_width,
        )
    }

    // --- canvases -----------------------------------------------------------

    pub fn mount_cabinet_canvas(&mut self, origin: Rect) {
        self.cabinet_canvas.mount(origin);
    }

    pub fn mount_detail_canvas(&mut self, origin: Rect) {
        self.detail_canvas.mount(origin);
    }

    /// Closing the detail view also ends a subdivision drag.
    pub fn unmount_detail_canvas(&mut self) {
        self.detail_canvas.unmount();
        if self.drag.phase() == DragPhase::DraggingSubdivision {
            self.drag.end();
        }
    }

    pub fn cabinet_point(&self, screen: Point) -> Point {
        self.cabinet_canvas.map(screen, self.cabinet_scale())
    }

    pub fn detail_point(&self, screen: Point) -> Point {
        self.detail_canvas.map(screen, self.detail_scale())
    }

    // --- drag sessions ------------------------------------------------------

    /// Pointer-down on a shelf's bottom edge.
    pub fn pointer_down_shelf_edge(&mut self, shelf_id: ShelfId, screen: Point) -> bool {
        if self.cabinet.shelf(shelf_id).is_none() {
            log::debug!("drag refused: {}", Rejected::UnknownShelf(shelf_id));
            return false;
        }
        let anchor = self.cabinet_point(screen);
        self.drag.begin(
            DragTarget::ShelfEdge { shelf_id },
            anchor,
            self.capture.clone(),
        );
        true
    }

    /// Pointer-down on a partition's right edge. The last partition of a shelf
    /// has no draggable edge.
    pub fn pointer_down_partition_edge(
        &mut self,
        shelf_id: ShelfId,
        partition_id: PartitionId,
        screen: Point,
    ) -> bool {
        let Some(shelf) = self.cabinet.shelf(shelf_id) else {
            log::debug!("drag refused: {}", Rejected::UnknownShelf(shelf_id));
            return false;
        };
        match shelf.partition_index(partition_id) {
            Some(i) if i + 1 < shelf.partitions.len() => {}
            Some(_) => {
                log::debug!("drag refused: {}", Rejected::NoRightNeighbor);
                return false;
            }
            None => {
                log::debug!("drag refused: {}", Rejected::UnknownPartition(partition_id));
                return false;
            }
        }
        let anchor = self.cabinet_point(screen);
        self.drag.begin(
            DragTarget::PartitionEdge {
                shelf_id,
                partition_id,
            },
            anchor,
            self.capture.clone(),
        );
        true
    }

    /// Pointer-down on boundary `index` in the detail view of the selected
    /// partition.
    pub fn pointer_down_subdivision_edge(&mut self, index: usize, screen: Point) -> bool {
        if !self.detail_canvas.is_mounted() {
            log::debug!("drag refused: detail view is not open");
            return false;
        }
        let Some(partition) = self.selected_partition() else {
            log::debug!("drag refused: no partition selected");
            return false;
        };
        if index + 1 >= partition.subdivisions.len() {
            log::debug!("drag refused: {}", Rejected::NoRightNeighbor);
            return false;
        }
        let partition_id = partition.id;
        let anchor = self.detail_point(screen);
        self.drag.begin(
            DragTarget::SubdivisionEdge {
                partition_id,
                index,
            },
            anchor,
            self.capture.clone(),
        );
        true
    }

    /// Feed a pointer sample to the active drag. Returns whether the tree
    /// changed.
    pub fn pointer_move(&mut self, screen: Point) -> bool {
        let Some(target) = self.drag.target() else {
            return false;
        };
        let current = match target {
            DragTarget::SubdivisionEdge { .. } => {
                if !self.detail_canvas.is_mounted() {
                    self.drag.end();
                    return false;
                }
                if self.end_detached_subdivision_drag() {
                    return false;
                }
                self.detail_point(screen)
            }
            _ => self.cabinet_point(screen),
        };
        let Some(step) = self.drag.step(current, self.anchoring) else {
            return false;
        };

        let result = match step.target {
            DragTarget::ShelfEdge { shelf_id } => {
                resize::resize_shelf(&self.cabinet, shelf_id, step.delta.y, &self.params)
            }
            DragTarget::PartitionEdge {
                shelf_id,
                partition_id,
            } => resize::resize_partition(
                &self.cabinet,
                shelf_id,
                partition_id,
                step.delta.x,
                &self.params,
            ),
            DragTarget::SubdivisionEdge {
                partition_id,
                index,
            } => resize::resize_subdivision(
                &self.cabinet,
                partition_id,
                index,
                step.delta.x,
                &self.params,
            ),
        };
        self.commit("drag", result)
    }

    /// Pointer released anywhere: the session ends unconditionally.
    pub fn pointer_up(&mut self) {
        self.drag.end();
    }

    // --- structural edits ---------------------------------------------------

    pub fn add_shelf(&mut self) -> ShelfId {
        let (next, id) = editor::add_shelf(&self.cabinet, &self.params);
        self.commit("add shelf", Ok(next));
        id
    }

    pub fn remove_shelf(&mut self, shelf_id: ShelfId) -> bool {
        let result = editor::remove_shelf(&self.cabinet, shelf_id);
        self.commit("remove shelf", result)
    }

    /// Split the partition of `shelf_id` under model-space `x`.
    pub fn add_partition(&mut self, shelf_id: ShelfId, x: f64) -> Option<PartitionId> {
        match editor::add_partition(&self.cabinet, shelf_id, x, &self.params) {
            Ok((next, id)) => {
                self.commit("add partition", Ok(next));
                Some(id)
            }
            Err(e) => {
                self.commit("add partition", Err(e));
                None
            }
        }
    }

    /// Split at a screen-space point on the cabinet canvas (double-click).
    pub fn add_partition_at(&mut self, shelf_id: ShelfId, screen: Point) -> Option<PartitionId> {
        let x = self.cabinet_point(screen).x;
        self.add_partition(shelf_id, x)
    }

    pub fn remove_partition(&mut self, shelf_id: ShelfId, partition_id: PartitionId) -> bool {
        let result = editor::remove_partition(&self.cabinet, shelf_id, partition_id);
        self.commit("remove partition", result)
    }

    /// Highlight a partition. Does not touch the tree.
    pub fn select_partition(&mut self, partition_id: PartitionId, shelf_id: ShelfId) -> bool {
        let exists = self
            .cabinet
            .shelf(shelf_id)
            .is_some_and(|s| s.partition_index(partition_id).is_some());
        if !exists {
            log::debug!("select refused: {}", Rejected::UnknownPartition(partition_id));
            return false;
        }
        self.selection = Some(Selection {
            shelf_id,
            partition_id,
        });
        self.end_detached_subdivision_drag();
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.end_detached_subdivision_drag();
    }

    pub fn set_hover(&mut self, hover: Option<Hover>) {
        self.hovered = hover;
    }

    pub fn subdivide_selected(&mut self, count: usize) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let result =
            editor::subdivide_partition(&self.cabinet, sel.partition_id, count, &self.params);
        self.commit("subdivide", result)
    }

    pub fn clear_selected_subdivisions(&mut self) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        let result = editor::clear_subdivisions(&self.cabinet, sel.partition_id);
        self.commit("clear subdivisions", result)
    }

    pub fn set_cabinet_width(&mut self, width: f64) -> bool {
        let result = editor::set_cabinet_width(&self.cabinet, width, &self.params);
        self.commit("set width", result)
    }

    pub fn set_cabinet_height(&mut self, height: f64) -> bool {
        let result = editor::set_cabinet_height(&self.cabinet, height, &self.params);
        self.commit("set height", result)
    }

    pub fn reset_shelf_heights(&mut self) -> bool {
        let next = editor::reset_shelf_heights(&self.cabinet, &self.params);
        self.commit("reset heights", Ok(next))
    }

    // --- host events --------------------------------------------------------

    /// Apply one host event, resolving positional references against the
    /// current tree. Returns whether the tree changed.
    pub fn handle_event(&mut self, event: &DesignEvent) -> bool {
        match *event {
            DesignEvent::MountCanvas { origin } => {
                self.mount_cabinet_canvas(origin);
                false
            }
            DesignEvent::MountDetail { origin } => {
                self.mount_detail_canvas(origin);
                false
            }
            DesignEvent::UnmountDetail => {
                self.unmount_detail_canvas();
                false
            }
            DesignEvent::ShelfEdgeDown { shelf, x, y } => {
                if let Some(shelf_id) = self.shelf_at(shelf) {
                    self.pointer_down_shelf_edge(shelf_id, Point::new(x, y));
                }
                false
            }
            DesignEvent::PartitionEdgeDown {
                shelf,
                partition,
                x,
                y,
            } => {
                if let Some((shelf_id, partition_id)) = self.partition_at(shelf, partition) {
                    self.pointer_down_partition_edge(shelf_id, partition_id, Point::new(x, y));
                }
                false
            }
            DesignEvent::SubdivisionEdgeDown { index, x, y } => {
                self.pointer_down_subdivision_edge(index, Point::new(x, y));
                false
            }
            DesignEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            DesignEvent::PointerUp => {
                self.pointer_up();
                false
            }
            DesignEvent::DoubleClick { shelf, x, y } => match self.shelf_at(shelf) {
                Some(shelf_id) => self.add_partition_at(shelf_id, Point::new(x, y)).is_some(),
                None => false,
            },
            DesignEvent::AddShelf => {
                self.add_shelf();
                true
            }
            DesignEvent::RemoveShelf { shelf } => match self.shelf_at(shelf) {
                Some(shelf_id) => self.remove_shelf(shelf_id),
                None => false,
            },
            DesignEvent::RemovePartition { shelf, partition } => {
                match self.partition_at(shelf, partition) {
                    Some((shelf_id, partition_id)) => self.remove_partition(shelf_id, partition_id),
                    None => false,
                }
            }
            DesignEvent::Select { shelf, partition } => {
                if let Some((shelf_id, partition_id)) = self.partition_at(shelf, partition) {
                    self.select_partition(partition_id, shelf_id);
                }
                false
            }
            DesignEvent::ClearSelection => {
                self.clear_selection();
                false
            }
            DesignEvent::Subdivide { count } => self.subdivide_selected(count),
            DesignEvent::ClearSubdivisions => self.clear_selected_subdivisions(),
            DesignEvent::SetWidth { width } => self.set_cabinet_width(width),
            DesignEvent::SetHeight { height } => self.set_cabinet_height(height),
            DesignEvent::ResetHeights => self.reset_shelf_heights(),
        }
    }

    fn shelf_at(&self, index: usize) -> Option<ShelfId> {
        let id = self.cabinet.shelves.get(index).map(|s| s.id);
        if id.is_none() {
            log::warn!("event refers to missing shelf #{}", index);
        }
        id
    }

    fn partition_at(&self, shelf: usize, partition: usize) -> Option<(ShelfId, PartitionId)> {
        let found = self
            .cabinet
            .shelves
            .get(shelf)
            .and_then(|s| s.partitions.get(partition).map(|p| (s.id, p.id)));
        if found.is_none() {
            log::warn!("event refers to missing partition #{} of shelf #{}", partition, shelf);
        }
        found
    }

    // --- internals ----------------------------------------------------------

    /// Install `result` as the current tree, or log why it was refused.
    fn commit(&mut self, what: &str, result: Result<Cabinet, Rejected>) -> bool {
        match result {
            Ok(next) => {
                if let Err(v) = next.check(&self.params) {
                    log::warn!("{} refused, it would break the layout: {}", what, v);
                    return false;
                }
                let changed = next != self.cabinet;
                self.cabinet = next;
                self.prune_references();
                if changed {
                    log::trace!("{} applied", what);
                }
                changed
            }
            Err(reason) => {
                log::debug!("{} refused: {}", what, reason);
                false
            }
        }
    }

    /// A subdivision drag acts on the selected partition only. End it once
    /// the selection moves elsewhere; returns whether it was ended.
    fn end_detached_subdivision_drag(&mut self) -> bool {
        let Some(DragTarget::SubdivisionEdge { partition_id, .. }) = self.drag.target() else {
            return false;
        };
        if self.selection.is_some_and(|sel| sel.partition_id == partition_id) {
            return false;
        }
        log::debug!("subdivision drag on {} ended, no longer selected", partition_id);
        self.drag.end()
    }

    /// Forget selection and hover targets that no longer exist.
    fn prune_references(&mut self) {
        if let Some(sel) = self.selection {
            let alive = self
                .cabinet
                .shelf(sel.shelf_id)
                .is_some_and(|s| s.partition_index(sel.partition_id).is_some());
            if !alive {
                log::debug!("selection cleared, partition {} is gone", sel.partition_id);
                self.selection = None;
                self.end_detached_subdivision_drag();
            }
        }
        let hover_alive = match self.hovered {
            Some(Hover::Shelf(id)) => self.cabinet.shelf(id).is_some(),
            Some(Hover::Partition(id)) => self.cabinet.contains_partition(id),
            None => true,
        };
        if !hover_alive {
            self.hovered = None;
        }
    }
}
