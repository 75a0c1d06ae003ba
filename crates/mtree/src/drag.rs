use gpui::{Bounds, Pixels, Point, point};

use crate::config::MTreeConfig;
use crate::frames::{FrameMap, FrameRegistry};
use crate::geometry::{BoundsExt as _, DropEdge, ScrollDirection};
use crate::model::ItemId;
use crate::store::TreeStore;

/// What kind of row a drag was started from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Group,
    Node,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    DraggingGroup,
    DraggingNode,
}

/// The row a drop would currently land against, and on which edge.
#[derive(Clone, Debug, PartialEq)]
pub enum DropTarget {
    Group { id: ItemId, edge: DropEdge },
    Node { id: ItemId, edge: DropEdge },
}

impl DropTarget {
    pub fn id(&self) -> &ItemId {
        match self {
            Self::Group { id, .. } | Self::Node { id, .. } => id,
        }
    }

    pub fn edge(&self) -> DropEdge {
        match self {
            Self::Group { edge, .. } | Self::Node { edge, .. } => *edge,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct DragSession {
    dragging_id: Option<ItemId>,
    kind: Option<DragKind>,
    start_location: Point<Pixels>,
    translation: Point<Pixels>,
    location: Option<Point<Pixels>>,
    scroll_start_offset: Pixels,
}

/// Tracks the dragged row and resolves what the pointer is over.
///
/// Hover queries are recomputed on demand from the session, the [`TreeStore`] and the
/// [`FrameRegistry`]; nothing derived is cached. Registry entries whose identity is no longer in
/// the store are skipped.
#[derive(Clone, Debug)]
pub struct DragController {
    group_height: Pixels,
    node_height: Pixels,
    session: DragSession,
}

impl DragController {
    pub fn new(config: &MTreeConfig) -> Self {
        Self {
            group_height: config.group_height,
            node_height: config.node_height,
            session: DragSession::default(),
        }
    }

    pub(crate) fn set_config(&mut self, config: &MTreeConfig) {
        self.group_height = config.group_height;
        self.node_height = config.node_height;
    }

    /// Start dragging `id`. Restarting with the id already being dragged keeps the session.
    pub fn begin(
        &mut self,
        id: ItemId,
        kind: DragKind,
        location: Point<Pixels>,
        scroll_offset: Pixels,
    ) {
        if self.session.dragging_id.as_ref() == Some(&id) {
            return;
        }
        self.session = DragSession {
            dragging_id: Some(id),
            kind: Some(kind),
            start_location: location,
            translation: Point::default(),
            location: Some(location),
            scroll_start_offset: scroll_offset,
        };
    }

    /// Feed a pointer position. Ignored while idle.
    pub fn update(&mut self, location: Point<Pixels>) {
        if self.session.dragging_id.is_none() {
            return;
        }
        self.session.translation = location - self.session.start_location;
        self.session.location = Some(location);
    }

    /// Finish (or cancel) the drag, returning the id that was being dragged.
    pub fn end(&mut self) -> Option<ItemId> {
        std::mem::take(&mut self.session).dragging_id
    }

    pub fn is_active(&self) -> bool {
        self.session.dragging_id.is_some()
    }

    pub fn dragging_id(&self) -> Option<&ItemId> {
        self.session.dragging_id.as_ref()
    }

    pub fn translation(&self) -> Point<Pixels> {
        self.session.translation
    }

    pub fn location(&self) -> Option<Point<Pixels>> {
        self.session.location
    }

    pub fn scroll_start_offset(&self) -> Pixels {
        self.session.scroll_start_offset
    }

    /// Fixed by the kind passed to [`Self::begin`], so it holds even after the dragged row is
    /// removed from the store.
    pub fn phase(&self) -> DragPhase {
        match self.session.kind {
            None => DragPhase::Idle,
            Some(DragKind::Group) => DragPhase::DraggingGroup,
            Some(DragKind::Node) => DragPhase::DraggingNode,
        }
    }

    pub fn is_dragging_group(&self) -> bool {
        self.phase() == DragPhase::DraggingGroup
    }

    /// The first registered group containing the pointer, while a group is dragged.
    pub fn hovered_group<G, N>(
        &self,
        store: &TreeStore<G, N>,
        frames: &FrameRegistry,
    ) -> Option<ItemId> {
        let location = self.session.location?;
        if self.phase() != DragPhase::DraggingGroup {
            return None;
        }
        frames
            .groups()
            .containing(location)
            .find(|(id, _)| store.contains_group(id))
            .map(|(id, _)| id.clone())
    }

    /// The deepest-indented node containing the pointer, while a node is dragged.
    pub fn hovered_node<G, N>(
        &self,
        store: &TreeStore<G, N>,
        frames: &FrameRegistry,
    ) -> Option<ItemId> {
        let location = self.session.location?;
        if self.phase() != DragPhase::DraggingNode {
            return None;
        }
        deepest_node_at(frames.nodes(), location, store)
    }

    /// The hover target together with the edge the pointer is closer to.
    ///
    /// A dragged node that is over no node falls back to the group containing the pointer, so a
    /// node can be dropped into an empty group.
    pub fn drop_target<G, N>(
        &self,
        store: &TreeStore<G, N>,
        frames: &FrameRegistry,
    ) -> Option<DropTarget> {
        let location = self.session.location?;
        match self.phase() {
            DragPhase::Idle => None,
            DragPhase::DraggingGroup => {
                let id = self.hovered_group(store, frames)?;
                let edge = frames.group(&id)?.drop_edge(location);
                Some(DropTarget::Group { id, edge })
            }
            DragPhase::DraggingNode => match self.hovered_node(store, frames) {
                Some(id) => {
                    let edge = frames.node(&id)?.drop_edge(location);
                    Some(DropTarget::Node { id, edge })
                }
                None => {
                    let (id, frame) = frames
                        .groups()
                        .containing(location)
                        .find(|(id, _)| store.contains_group(id))?;
                    Some(DropTarget::Group {
                        id: id.clone(),
                        edge: frame.drop_edge(location),
                    })
                }
            },
        }
    }

    /// The row one row-height beyond `at` in `direction`, used to pick what to reveal next when
    /// auto-scrolling. Nodes are probed first, then groups.
    pub fn scroll_anchor<G, N>(
        &self,
        direction: ScrollDirection,
        at: Point<Pixels>,
        store: &TreeStore<G, N>,
        frames: &FrameRegistry,
    ) -> Option<ItemId> {
        let sign: f32 = match direction {
            ScrollDirection::Up => -1.,
            ScrollDirection::Down => 1.,
        };
        let node_probe = point(at.x, at.y + self.node_height * sign);
        let group_probe = point(at.x, at.y + self.group_height * sign);

        deepest_node_at(frames.nodes(), node_probe, store).or_else(|| {
            frames
                .groups()
                .containing(group_probe)
                .find(|(id, _)| store.contains_group(id))
                .map(|(id, _)| id.clone())
        })
    }

    /// Where the floating preview of a row registered at `frame` should be drawn: the frame moved
    /// by the drag translation, compensated for any scrolling since the drag started.
    pub fn preview_bounds(
        &self,
        frame: Bounds<Pixels>,
        current_scroll_offset: Pixels,
    ) -> Bounds<Pixels> {
        let translation = self.session.translation;
        let scroll_shift = self.session.scroll_start_offset - current_scroll_offset;
        let shift = point(translation.x, translation.y + scroll_shift);
        Bounds::new(frame.origin + shift, frame.size)
    }
}

/// Among the live nodes whose frame contains `at`, the one with the greatest horizontal origin.
/// Ties go to the earliest registration.
fn deepest_node_at<G, N>(
    frames: &FrameMap,
    at: Point<Pixels>,
    store: &TreeStore<G, N>,
) -> Option<ItemId> {
    frames
        .containing(at)
        .filter(|(id, _)| store.contains_node(id))
        .fold(None, |best: Option<(&ItemId, &Bounds<Pixels>)>, candidate| match best {
            Some(best) if best.1.origin.x >= candidate.1.origin.x => Some(best),
            _ => Some(candidate),
        })
        .map(|(id, _)| id.clone())
}
