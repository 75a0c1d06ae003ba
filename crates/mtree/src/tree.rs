use std::{collections::HashSet, rc::Rc};

use gpui::{
    AnyElement, App, AppContext as _, Bounds, Component, Context, DragMoveEvent, ElementId,
    Entity, EntityId, InteractiveElement as _, IntoElement, ParentElement as _, Pixels, Point,
    Render, RenderOnce, ScrollHandle, StatefulInteractiveElement as _, StyleRefinement, Styled,
    WeakEntity, Window, canvas, div, point, prelude::FluentBuilder as _, px, size,
};
use gpui_component::{ActiveTheme as _, StyledExt as _};

use crate::config::MTreeConfig;
use crate::drag::{DragController, DragKind, DragPhase, DropTarget};
use crate::frames::FrameRegistry;
use crate::geometry::{BoundsExt as _, DropEdge, ScrollDirection, reveal_offset};
use crate::model::{Group, ItemId, Node};
use crate::store::TreeStore;

const INDICATOR_THICKNESS: Pixels = px(2.);

type GroupRenderer<G> =
    Rc<dyn Fn(Option<&Group<G>>, MTreeRowState, &mut Window, &mut App) -> AnyElement>;
type NodeRenderer<N> =
    Rc<dyn Fn(Option<&Node<N>>, MTreeRowState, &mut Window, &mut App) -> AnyElement>;
type DropHandler = Rc<dyn Fn(&MTreeDrop, &mut Window, &mut App)>;

/// Create an [`MTree`].
pub fn mtree<G, N, RG, RN, EG, EN>(
    state: &Entity<MTreeState<G, N>>,
    render_group: RG,
    render_node: RN,
) -> MTree<G, N>
where
    G: 'static,
    N: 'static,
    RG: Fn(Option<&Group<G>>, MTreeRowState, &mut Window, &mut App) -> EG + 'static,
    RN: Fn(Option<&Node<N>>, MTreeRowState, &mut Window, &mut App) -> EN + 'static,
    EG: IntoElement,
    EN: IntoElement,
{
    MTree::new(state, render_group, render_node)
}

#[derive(Clone)]
struct MTreeDrag {
    tree_id: EntityId,
    item_id: ItemId,
    kind: DragKind,
}

/// gpui requires a drag view; the visible preview is drawn by the tree itself.
struct DragGhost;

impl Render for DragGhost {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        div()
    }
}

/// What a row callback needs to know about the row it renders.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MTreeRowState {
    /// The row is part of the floating drag preview.
    pub dragging: bool,
    /// The row's entity is the one being dragged; this is the copy left in the tree.
    pub lifted: bool,
    /// Set on the current drop target, on the edge the drop would land against.
    pub drop_edge: Option<DropEdge>,
    /// Nesting level. Groups and top-level nodes are at depth 0.
    pub depth: usize,
    /// The row has children, whether or not they are currently shown.
    pub has_children: bool,
}

/// Snapshot handed to the drop handler when a drag is released over the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct MTreeDrop {
    pub dragged: ItemId,
    pub phase: DragPhase,
    pub target: Option<DropTarget>,
}

/// State for a tree of groups and nodes with drag-and-drop.
pub struct MTreeState<G, N> {
    store: TreeStore<G, N>,
    frames: FrameRegistry,
    drag: DragController,
    config: MTreeConfig,
    scroll_handle: ScrollHandle,
    viewport_bounds: Option<Bounds<Pixels>>,
    render_group: GroupRenderer<G>,
    render_node: NodeRenderer<N>,
    on_drop: Option<DropHandler>,
}

impl<G: 'static, N: 'static> Default for MTreeState<G, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: 'static, N: 'static> MTreeState<G, N> {
    pub fn new() -> Self {
        let config = MTreeConfig::default();
        Self {
            store: TreeStore::new(),
            frames: FrameRegistry::new(),
            drag: DragController::new(&config),
            config,
            scroll_handle: ScrollHandle::new(),
            viewport_bounds: None,
            render_group: Rc::new(|_, _, _, _| div().into_any_element()),
            render_node: Rc::new(|_, _, _, _| div().into_any_element()),
            on_drop: None,
        }
    }

    pub fn config(mut self, config: MTreeConfig) -> Self {
        self.drag.set_config(&config);
        self.config = config;
        self
    }

    pub fn group_height(self, height: Pixels) -> Self {
        let config = self.config.group_height(height);
        self.config(config)
    }

    pub fn node_height(self, height: Pixels) -> Self {
        let config = self.config.node_height(height);
        self.config(config)
    }

    /// Indentation applied per nesting level below a top-level node.
    pub fn child_indent(self, indent: Pixels) -> Self {
        let config = self.config.child_indent(indent);
        self.config(config)
    }

    pub fn groups(mut self, groups: impl Into<Vec<Group<G>>>) -> Self {
        self.store.set_groups(groups);
        self
    }

    pub fn nodes(mut self, nodes: impl Into<Vec<Node<N>>>) -> Self {
        self.store.set_nodes(nodes);
        self
    }

    pub fn store(&self) -> &TreeStore<G, N> {
        &self.store
    }

    pub fn frames(&self) -> &FrameRegistry {
        &self.frames
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn tree_config(&self) -> &MTreeConfig {
        &self.config
    }

    /// Current vertical scroll offset of the tree content.
    pub fn scroll_offset(&self) -> Pixels {
        self.scroll_handle.offset().y
    }

    pub fn set_groups(&mut self, groups: impl Into<Vec<Group<G>>>, cx: &mut Context<Self>) {
        self.store.set_groups(groups);
        tracing::debug!(message = "mtree.set_groups", count = self.store.groups().len());
        cx.notify();
    }

    pub fn set_nodes(&mut self, nodes: impl Into<Vec<Node<N>>>, cx: &mut Context<Self>) {
        self.store.set_nodes(nodes);
        tracing::debug!(message = "mtree.set_nodes", count = self.store.nodes().len());
        cx.notify();
    }

    pub fn toggle_group_expanded(&mut self, id: &ItemId, cx: &mut Context<Self>) {
        if self.store.toggle_group_expanded(id) {
            cx.notify();
        }
    }

    pub fn toggle_node_expanded(&mut self, id: &ItemId, cx: &mut Context<Self>) {
        if self.store.toggle_node_expanded(id) {
            cx.notify();
        }
    }

    pub fn delete_group(&mut self, id: &ItemId, cx: &mut Context<Self>) {
        if self.store.delete_group(id) {
            tracing::debug!(message = "mtree.delete_group", id = %id);
            cx.notify();
        }
    }

    /// Remove one node. Its descendants are kept but no longer reachable.
    pub fn delete_node(&mut self, id: &ItemId, cx: &mut Context<Self>) {
        if self.store.delete_node(id) {
            tracing::debug!(message = "mtree.delete_node", id = %id);
            cx.notify();
        }
    }

    pub fn delete_node_subtree(&mut self, id: &ItemId, cx: &mut Context<Self>) {
        let removed = self.store.delete_node_subtree(id);
        if removed > 0 {
            tracing::debug!(message = "mtree.delete_node_subtree", id = %id, removed);
            cx.notify();
        }
    }

    pub fn move_node(
        &mut self,
        id: &ItemId,
        group_id: Option<ItemId>,
        before: Option<&ItemId>,
        after: Option<&ItemId>,
        cx: &mut Context<Self>,
    ) {
        if self.store.move_node(id, group_id, before, after) {
            tracing::debug!(
                message = "mtree.move_node",
                id = %id,
                before = ?before,
                after = ?after
            );
            cx.notify();
        }
    }

    pub fn move_group(
        &mut self,
        id: &ItemId,
        before: Option<&ItemId>,
        after: Option<&ItemId>,
        cx: &mut Context<Self>,
    ) {
        if self.store.move_group(id, before, after) {
            tracing::debug!(
                message = "mtree.move_group",
                id = %id,
                before = ?before,
                after = ?after
            );
            cx.notify();
        }
    }

    pub fn set_node_parent(
        &mut self,
        id: &ItemId,
        parent_node_id: Option<ItemId>,
        cx: &mut Context<Self>,
    ) {
        if self.store.set_node_parent(id, parent_node_id) {
            cx.notify();
        }
    }

    /// Commit a drop with the default policy. Returns whether the store changed.
    ///
    /// See [`apply_drop`] for the rules.
    pub fn apply_drop(&mut self, drop: &MTreeDrop, cx: &mut Context<Self>) -> bool {
        let changed = apply_drop(&mut self.store, drop);
        if changed {
            tracing::debug!(
                message = "mtree.apply_drop",
                dragged = %drop.dragged,
                target = ?drop.target
            );
            cx.notify();
        }
        changed
    }

    fn on_drag_start(&mut self, drag: &MTreeDrag, window: &mut Window, cx: &mut Context<Self>) {
        let scroll_offset = self.scroll_offset();
        self.drag.begin(
            drag.item_id.clone(),
            drag.kind,
            window.mouse_position(),
            scroll_offset,
        );
        tracing::debug!(
            message = "mtree.drag_begin",
            id = %drag.item_id,
            phase = ?self.drag.phase(),
            scroll_offset = f32::from(scroll_offset)
        );
        cx.notify();
    }

    fn on_drag_move(
        &mut self,
        event: &DragMoveEvent<MTreeDrag>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !cx.has_active_drag() || !self.drag.is_active() {
            return;
        }
        let tree_id = event.drag(cx).tree_id;
        if tree_id != cx.entity_id() {
            return;
        }

        let previous = self.drag.drop_target(&self.store, &self.frames);
        let location = event.event.position;
        self.drag.update(location);
        self.auto_scroll(location);

        let target = self.drag.drop_target(&self.store, &self.frames);
        if target != previous {
            tracing::trace!(message = "mtree.hover", target = ?target);
        }
        cx.notify();
    }

    fn on_drop(&mut self, drag: &MTreeDrag, window: &mut Window, cx: &mut Context<Self>) {
        if drag.tree_id != cx.entity_id() {
            return;
        }

        self.drag.update(window.mouse_position());
        let phase = self.drag.phase();
        let target = self.drag.drop_target(&self.store, &self.frames);
        let Some(dragged) = self.drag.end() else {
            return;
        };
        tracing::debug!(message = "mtree.drop", dragged = %dragged, target = ?target);

        if let Some(on_drop) = self.on_drop.clone() {
            let drop = MTreeDrop {
                dragged,
                phase,
                target,
            };
            window.defer(cx, move |window, cx| on_drop(&drop, window, cx));
        }
        cx.notify();
    }

    /// Scroll the next row into view while the pointer is near the top or bottom edge.
    fn auto_scroll(&mut self, location: Point<Pixels>) -> bool {
        let Some(viewport) = self.viewport_bounds else {
            return false;
        };
        let direction = if viewport.is_point_close_to_top(location) {
            ScrollDirection::Up
        } else if viewport.is_point_close_to_bottom(location) {
            ScrollDirection::Down
        } else {
            return false;
        };

        let Some(anchor) = self
            .drag
            .scroll_anchor(direction, location, &self.store, &self.frames)
        else {
            return false;
        };
        let Some(frame) = self.frames.frame(&anchor) else {
            return false;
        };

        let offset = self.scroll_handle.offset();
        let max_offset_y = self.scroll_handle.max_offset().height;
        let next_y = reveal_offset(offset.y, max_offset_y, viewport, frame, direction);
        if next_y == offset.y {
            return false;
        }

        tracing::trace!(
            message = "mtree.auto_scroll",
            anchor = %anchor,
            direction = ?direction,
            from = f32::from(offset.y),
            to = f32::from(next_y)
        );
        self.scroll_handle.set_offset(point(offset.x, next_y));
        true
    }

    fn register_frame(&mut self, kind: FrameKind, id: ItemId, bounds: Bounds<Pixels>) -> bool {
        match kind {
            FrameKind::Group => self.frames.register_group(id, bounds),
            FrameKind::Node => self.frames.register_node(id, bounds),
        }
    }

    fn set_viewport_bounds(&mut self, bounds: Bounds<Pixels>) -> bool {
        if self.viewport_bounds == Some(bounds) {
            return false;
        }
        self.viewport_bounds = Some(bounds);
        true
    }

    /// Identities of every row the next render will draw.
    fn visible_ids(&self) -> HashSet<ItemId> {
        let mut visible = HashSet::new();
        for group in self.store.list_groups() {
            visible.insert(group.id.clone());
            if group.expanded {
                self.collect_visible_nodes(Some(&group.id), None, &mut visible);
            }
        }
        visible
    }

    // Cycles never contain a top-level node, so they are unreachable from this walk.
    fn collect_visible_nodes(
        &self,
        group_id: Option<&ItemId>,
        parent_node_id: Option<&ItemId>,
        visible: &mut HashSet<ItemId>,
    ) {
        for node in self.store.list_children(group_id, parent_node_id) {
            visible.insert(node.id.clone());
            if node.expanded {
                self.collect_visible_nodes(group_id, Some(&node.id), visible);
            }
        }
    }

    fn reset_if_drag_cancelled(&mut self, cx: &App) {
        if self.drag.is_active() && !cx.has_active_drag() {
            if let Some(id) = self.drag.end() {
                tracing::debug!(message = "mtree.drag_cancel", id = %id);
            }
        }
    }
}

/// Commit `drop` into `store` with the default policy:
///
/// - a group dropped on a group moves before it (top edge) or after it (bottom edge);
/// - a node dropped on a node becomes its sibling, before or after it, adopting its group and
///   parent; drops onto the node's own subtree are refused;
/// - a node dropped on a group becomes its first (top edge) or last (bottom edge) top-level node.
pub fn apply_drop<G, N>(store: &mut TreeStore<G, N>, drop: &MTreeDrop) -> bool {
    let dragged = &drop.dragged;
    let Some(target) = drop.target.as_ref() else {
        return false;
    };
    if target.id() == dragged {
        return false;
    }

    match (drop.phase, target) {
        (DragPhase::DraggingGroup, DropTarget::Group { id, edge }) => match edge {
            DropEdge::Top => store.move_group(dragged, Some(id), None),
            DropEdge::Bottom => store.move_group(dragged, None, Some(id)),
        },
        (DragPhase::DraggingNode, DropTarget::Node { id, edge }) => {
            let Some(target) = store.node(id) else {
                return false;
            };
            let group_id = target.group_id.clone();
            let parent_node_id = target.parent_node_id.clone();
            if !store.set_node_parent(dragged, parent_node_id) {
                return false;
            }
            match edge {
                DropEdge::Top => store.move_node(dragged, group_id, Some(id), None),
                DropEdge::Bottom => store.move_node(dragged, group_id, None, Some(id)),
            }
        }
        (DragPhase::DraggingNode, DropTarget::Group { id, edge }) => {
            if !store.contains_group(id) || !store.set_node_parent(dragged, None) {
                return false;
            }
            let siblings: Vec<ItemId> = store
                .list_children(Some(id), None)
                .into_iter()
                .filter(|node| node.id != *dragged)
                .map(|node| node.id.clone())
                .collect();
            match edge {
                DropEdge::Top => store.move_node(dragged, Some(id.clone()), siblings.first(), None),
                DropEdge::Bottom => {
                    store.move_node(dragged, Some(id.clone()), None, siblings.last())
                }
            }
        }
        _ => false,
    }
}

/// Bounds of the drop line for `target`, flush to the chosen edge of its `frame`. Node lines are
/// inset by `indent` on the left.
pub fn indicator_bounds(
    target: &DropTarget,
    frame: Bounds<Pixels>,
    indent: Pixels,
) -> Bounds<Pixels> {
    let y = match target.edge() {
        DropEdge::Top => frame.top(),
        DropEdge::Bottom => frame.bottom(),
    };
    let inset = match target {
        DropTarget::Group { .. } => px(0.),
        DropTarget::Node { .. } => indent.min(frame.size.width),
    };
    Bounds::new(
        point(frame.left() + inset, y - INDICATOR_THICKNESS / 2.),
        size(frame.size.width - inset, INDICATOR_THICKNESS),
    )
}

#[derive(Clone, Copy)]
enum FrameKind {
    Group,
    Node,
}

/// Invisible element that reports its parent's bounds to the registry after layout.
fn frame_probe<G: 'static, N: 'static>(
    state: WeakEntity<MTreeState<G, N>>,
    kind: FrameKind,
    id: ItemId,
) -> impl IntoElement {
    canvas(
        move |bounds, _window, cx| {
            cx.defer(move |cx| {
                state
                    .update(cx, |state, cx| {
                        if state.register_frame(kind, id, bounds) {
                            cx.notify();
                        }
                    })
                    .ok();
            });
        },
        |_, _, _, _| {},
    )
    .absolute()
    .top_0()
    .left_0()
    .right_0()
    .bottom_0()
}

/// Builds the row hierarchy for one render pass.
struct RowBuilder<'a, G: 'static, N: 'static> {
    store: &'a TreeStore<G, N>,
    config: MTreeConfig,
    state: Entity<MTreeState<G, N>>,
    tree_id: EntityId,
    dragging_id: Option<&'a ItemId>,
    translation: Point<Pixels>,
    drop_target: Option<&'a DropTarget>,
    render_group: &'a GroupRenderer<G>,
    render_node: &'a NodeRenderer<N>,
}

impl<G: 'static, N: 'static> RowBuilder<'_, G, N> {
    fn row_state(
        &self,
        id: &ItemId,
        preview: bool,
        depth: usize,
        has_children: bool,
    ) -> MTreeRowState {
        let drop_edge = if preview {
            None
        } else {
            self.drop_target
                .filter(|target| target.id() == id)
                .map(|target| target.edge())
        };
        MTreeRowState {
            dragging: preview,
            lifted: !preview && self.dragging_id == Some(id),
            drop_edge,
            depth,
            has_children,
        }
    }

    fn drag_source<E>(&self, row: E, id: &ItemId, kind: DragKind) -> E
    where
        E: gpui::StatefulInteractiveElement,
    {
        let state = self.state.clone();
        let value = MTreeDrag {
            tree_id: self.tree_id,
            item_id: id.clone(),
            kind,
        };
        row.on_drag(value, move |drag, _cursor_offset, window, cx| {
            state.update(cx, |state, cx| state.on_drag_start(drag, window, cx));
            cx.new(|_| DragGhost)
        })
    }

    fn group_block(
        &self,
        group: &Group<G>,
        preview: bool,
        window: &mut Window,
        cx: &mut App,
    ) -> AnyElement {
        let has_children = self.store.group_has_children(Some(&group.id));
        let row_state = self.row_state(&group.id, preview, 0, has_children);
        let header = div()
            .id(ElementId::Name(format!("mtree-group-{}", group.id).into()))
            .w_full()
            .min_h(self.config.group_height)
            .when(row_state.lifted, |this| {
                this.relative()
                    .left(self.translation.x)
                    .top(self.translation.y)
            })
            .child((self.render_group)(Some(group), row_state, window, cx));
        let header = if preview {
            header.into_any_element()
        } else {
            self.drag_source(header, &group.id, DragKind::Group).into_any_element()
        };

        let mut block = div().relative().flex().flex_col().w_full().child(header);
        if group.expanded {
            for node in self.store.list_children(Some(&group.id), None) {
                block = block.child(self.node_block(node, 0, preview, window, cx));
            }
        }
        block
            .when(!preview, |this| {
                this.child(frame_probe(
                    self.state.downgrade(),
                    FrameKind::Group,
                    group.id.clone(),
                ))
            })
            .into_any_element()
    }

    fn node_block(
        &self,
        node: &Node<N>,
        depth: usize,
        preview: bool,
        window: &mut Window,
        cx: &mut App,
    ) -> AnyElement {
        let has_children = self.store.node_has_children(&node.id);
        let row_state = self.row_state(&node.id, preview, depth, has_children);
        let header = div()
            .id(ElementId::Name(format!("mtree-node-{}", node.id).into()))
            .w_full()
            .min_h(self.config.node_height)
            .when(row_state.lifted, |this| {
                this.relative()
                    .left(self.translation.x)
                    .top(self.translation.y)
            })
            .child((self.render_node)(Some(node), row_state, window, cx));
        let header = if preview {
            header.into_any_element()
        } else {
            self.drag_source(header, &node.id, DragKind::Node).into_any_element()
        };

        let mut block = div().relative().flex().flex_col().w_full().child(header);
        if node.expanded {
            let children = self
                .store
                .list_children(node.group_id.as_ref(), Some(&node.id));
            if !children.is_empty() {
                let mut nested = div().flex().flex_col().w_full().pl(self.config.child_indent);
                for child in children {
                    nested = nested.child(self.node_block(child, depth + 1, preview, window, cx));
                }
                block = block.child(nested);
            }
        }
        block
            .when(!preview, |this| {
                this.child(frame_probe(
                    self.state.downgrade(),
                    FrameKind::Node,
                    node.id.clone(),
                ))
            })
            .into_any_element()
    }

    /// The floating copy of the dragged row. Falls back to the row callback with `None` when the
    /// dragged entity has vanished from the store.
    fn preview(
        &self,
        id: &ItemId,
        phase: DragPhase,
        window: &mut Window,
        cx: &mut App,
    ) -> AnyElement {
        let row_state = MTreeRowState {
            dragging: true,
            ..Default::default()
        };
        match preview_row(self.store, id, phase) {
            None => div().into_any_element(),
            Some(PreviewRow::Group(Some(group))) => self.group_block(group, true, window, cx),
            Some(PreviewRow::Group(None)) => (self.render_group)(None, row_state, window, cx),
            Some(PreviewRow::Node(Some(node))) => self.node_block(node, 0, true, window, cx),
            Some(PreviewRow::Node(None)) => (self.render_node)(None, row_state, window, cx),
        }
    }
}

/// The row the floating preview shows, looked up by the drag phase. `None` inside a variant means
/// the dragged entity is gone from the store.
#[derive(Debug)]
enum PreviewRow<'a, G, N> {
    Group(Option<&'a Group<G>>),
    Node(Option<&'a Node<N>>),
}

fn preview_row<'a, G, N>(
    store: &'a TreeStore<G, N>,
    id: &ItemId,
    phase: DragPhase,
) -> Option<PreviewRow<'a, G, N>> {
    match phase {
        DragPhase::Idle => None,
        DragPhase::DraggingGroup => Some(PreviewRow::Group(store.group(id))),
        DragPhase::DraggingNode => Some(PreviewRow::Node(store.node(id))),
    }
}

impl<G: 'static, N: 'static> Render for MTreeState<G, N> {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.reset_if_drag_cancelled(cx);

        let visible = self.visible_ids();
        let dragging_id = self.drag.dragging_id().cloned();
        self.frames
            .retain(|id| visible.contains(id) || dragging_id.as_ref() == Some(id));

        let phase = self.drag.phase();
        let drop_target = self.drag.drop_target(&self.store, &self.frames);
        let viewport = self.viewport_bounds.unwrap_or_default();
        let scroll_offset = self.scroll_offset();
        let indicator_color = cx.theme().drag_border;

        let builder = RowBuilder {
            store: &self.store,
            config: self.config,
            state: cx.entity(),
            tree_id: cx.entity_id(),
            dragging_id: dragging_id.as_ref(),
            translation: self.drag.translation(),
            drop_target: drop_target.as_ref(),
            render_group: &self.render_group,
            render_node: &self.render_node,
        };

        let mut rows = Vec::new();
        for group in self.store.list_groups() {
            rows.push(builder.group_block(group, false, window, cx));
        }

        let indicator = drop_target.as_ref().and_then(|target| {
            let frame = self.frames.frame(target.id())?;
            let line = indicator_bounds(target, frame, self.config.child_indent);
            Some(
                div()
                    .absolute()
                    .left(line.left() - viewport.left())
                    .top(line.top() - viewport.top())
                    .w(line.size.width)
                    .h(line.size.height)
                    .rounded(INDICATOR_THICKNESS)
                    .bg(indicator_color),
            )
        });

        let preview = dragging_id.as_ref().and_then(|id| {
            let frame = self.frames.frame(id)?;
            let bounds = self.drag.preview_bounds(frame, scroll_offset);
            let content = builder.preview(id, phase, window, cx);
            Some(
                div()
                    .absolute()
                    .left(bounds.left() - viewport.left())
                    .top(bounds.top() - viewport.top())
                    .w(bounds.size.width)
                    .h(bounds.size.height)
                    .child(content),
            )
        });

        let state = cx.entity().downgrade();
        div()
            .id("mtree-state")
            .size_full()
            .relative()
            .child(
                canvas(
                    move |bounds, _window, cx| {
                        cx.defer(move |cx| {
                            state
                                .update(cx, |state, cx| {
                                    if state.set_viewport_bounds(bounds) {
                                        cx.notify();
                                    }
                                })
                                .ok();
                        });
                    },
                    |_, _, _, _| {},
                )
                .absolute()
                .top_0()
                .left_0()
                .right_0()
                .bottom_0(),
            )
            .child(
                div()
                    .id("mtree-scroll")
                    .size_full()
                    .overflow_y_scroll()
                    .track_scroll(&self.scroll_handle)
                    .child(div().flex().flex_col().w_full().children(rows)),
            )
            .on_drag_move::<MTreeDrag>(cx.listener(Self::on_drag_move))
            .on_drop::<MTreeDrag>(cx.listener(Self::on_drop))
            .when_some(indicator, |this, indicator| this.child(indicator))
            .when_some(preview, |this, preview| this.child(preview))
    }
}

/// A tree view of groups and nested nodes with drag-and-drop.
pub struct MTree<G: 'static, N: 'static> {
    id: ElementId,
    state: Entity<MTreeState<G, N>>,
    style: StyleRefinement,
    render_group: GroupRenderer<G>,
    render_node: NodeRenderer<N>,
    on_drop: Option<DropHandler>,
}

impl<G: 'static, N: 'static> MTree<G, N> {
    pub fn new<RG, RN, EG, EN>(
        state: &Entity<MTreeState<G, N>>,
        render_group: RG,
        render_node: RN,
    ) -> Self
    where
        RG: Fn(Option<&Group<G>>, MTreeRowState, &mut Window, &mut App) -> EG + 'static,
        RN: Fn(Option<&Node<N>>, MTreeRowState, &mut Window, &mut App) -> EN + 'static,
        EG: IntoElement,
        EN: IntoElement,
    {
        Self {
            id: ElementId::Name(format!("mtree-{}", state.entity_id()).into()),
            state: state.clone(),
            style: StyleRefinement::default(),
            render_group: Rc::new(move |group, row_state, window, cx| {
                render_group(group, row_state, window, cx).into_any_element()
            }),
            render_node: Rc::new(move |node, row_state, window, cx| {
                render_node(node, row_state, window, cx).into_any_element()
            }),
            on_drop: None,
        }
    }

    /// Called after a drag is released over the tree, outside of any entity update.
    ///
    /// The tree never commits drops itself; use [`MTreeState::apply_drop`] for the default policy.
    pub fn on_drop(
        mut self,
        handler: impl Fn(&MTreeDrop, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_drop = Some(Rc::new(handler));
        self
    }
}

impl<G: 'static, N: 'static> Styled for MTree<G, N> {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl<G: 'static, N: 'static> IntoElement for MTree<G, N> {
    type Element = Component<Self>;

    fn into_element(self) -> Self::Element {
        Component::new(self)
    }
}

impl<G: 'static, N: 'static> RenderOnce for MTree<G, N> {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let Self {
            id,
            state,
            style,
            render_group,
            render_node,
            on_drop,
        } = self;
        state.update(cx, |state, _| {
            state.render_group = render_group;
            state.render_node = render_node;
            state.on_drop = on_drop;
        });

        div()
            .id(id)
            .size_full()
            .child(state)
            .refine_style(&style)
    }
}

#[cfg(test)]
mod tests {
    use gpui::bounds;

    use super::*;

    fn id(s: &'static str) -> ItemId {
        s.into()
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds<Pixels> {
        bounds(point(px(x), px(y)), size(px(w), px(h)))
    }

    fn store() -> TreeStore<(), ()> {
        let mut store = TreeStore::new();
        store.set_groups(vec![
            Group::new("A", (), 1.0),
            Group::new("B", (), 2.0),
            Group::new("C", (), 3.0),
        ]);
        store.set_nodes(vec![
            Node::new("x", (), 1.0).group("A"),
            Node::new("x1", (), 1.0).group("A").parent("x"),
            Node::new("x2", (), 2.0).group("A").parent("x"),
            Node::new("y", (), 1.0).group("B"),
            Node::new("y1", (), 1.0).group("B").parent("y"),
        ]);
        store
    }

    fn drop_of(dragged: &'static str, phase: DragPhase, target: Option<DropTarget>) -> MTreeDrop {
        MTreeDrop {
            dragged: id(dragged),
            phase,
            target,
        }
    }

    fn children(
        store: &TreeStore<(), ()>,
        group: &'static str,
        parent: Option<&'static str>,
    ) -> Vec<String> {
        let parent = parent.map(id);
        store
            .list_children(Some(&id(group)), parent.as_ref())
            .iter()
            .map(|node| node.id.to_string())
            .collect()
    }

    #[test]
    fn group_drop_reorders_groups() {
        let mut store = store();
        let target = DropTarget::Group {
            id: id("A"),
            edge: DropEdge::Top,
        };
        assert!(apply_drop(
            &mut store,
            &drop_of("C", DragPhase::DraggingGroup, Some(target))
        ));
        let order: Vec<_> = store.list_groups().iter().map(|g| g.id.to_string()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn node_drop_moves_next_to_target_across_groups() {
        let mut store = store();
        let target = DropTarget::Node {
            id: id("x1"),
            edge: DropEdge::Bottom,
        };
        assert!(apply_drop(
            &mut store,
            &drop_of("y", DragPhase::DraggingNode, Some(target))
        ));
        assert_eq!(children(&store, "A", Some("x")), vec!["x1", "y", "x2"]);
        assert_eq!(children(&store, "A", Some("y")), vec!["y1"]);
        assert!(children(&store, "B", None).is_empty());
    }

    #[test]
    fn node_drop_into_own_subtree_is_refused() {
        let mut store = store();
        let target = DropTarget::Node {
            id: id("x2"),
            edge: DropEdge::Top,
        };
        assert!(!apply_drop(
            &mut store,
            &drop_of("x", DragPhase::DraggingNode, Some(target))
        ));
        assert_eq!(children(&store, "A", None), vec!["x"]);

        let onto_self = DropTarget::Node {
            id: id("x"),
            edge: DropEdge::Top,
        };
        assert!(!apply_drop(
            &mut store,
            &drop_of("x", DragPhase::DraggingNode, Some(onto_self))
        ));
    }

    #[test]
    fn node_drop_on_group_appends_or_prepends() {
        let mut store = store();
        let bottom = DropTarget::Group {
            id: id("B"),
            edge: DropEdge::Bottom,
        };
        assert!(apply_drop(
            &mut store,
            &drop_of("x2", DragPhase::DraggingNode, Some(bottom))
        ));
        assert_eq!(children(&store, "B", None), vec!["y", "x2"]);

        let top = DropTarget::Group {
            id: id("C"),
            edge: DropEdge::Top,
        };
        assert!(apply_drop(
            &mut store,
            &drop_of("x1", DragPhase::DraggingNode, Some(top))
        ));
        assert_eq!(children(&store, "C", None), vec!["x1"]);
        assert!(children(&store, "A", Some("x")).is_empty());
    }

    #[test]
    fn drops_without_target_or_mismatched_kind_are_ignored() {
        let mut store = store();
        assert!(!apply_drop(&mut store, &drop_of("x", DragPhase::DraggingNode, None)));
        let node_target = DropTarget::Node {
            id: id("y"),
            edge: DropEdge::Top,
        };
        assert!(!apply_drop(
            &mut store,
            &drop_of("A", DragPhase::DraggingGroup, Some(node_target))
        ));
    }

    #[test]
    fn indicator_sits_on_the_chosen_edge() {
        let frame = rect(10., 100., 200., 40.);
        let group_top = DropTarget::Group {
            id: id("A"),
            edge: DropEdge::Top,
        };
        assert_eq!(
            indicator_bounds(&group_top, frame, px(16.)),
            rect(10., 99., 200., 2.)
        );

        let node_bottom = DropTarget::Node {
            id: id("x"),
            edge: DropEdge::Bottom,
        };
        assert_eq!(
            indicator_bounds(&node_bottom, frame, px(16.)),
            rect(26., 139., 184., 2.)
        );
    }

    #[test]
    fn preview_row_follows_phase_and_store() {
        let mut store = store();
        assert!(preview_row(&store, &id("x"), DragPhase::Idle).is_none());
        assert!(matches!(
            preview_row(&store, &id("x"), DragPhase::DraggingNode),
            Some(PreviewRow::Node(Some(node))) if node.id == id("x")
        ));
        assert!(matches!(
            preview_row(&store, &id("B"), DragPhase::DraggingGroup),
            Some(PreviewRow::Group(Some(_)))
        ));

        assert!(store.delete_group(&id("B")));
        assert!(matches!(
            preview_row(&store, &id("B"), DragPhase::DraggingGroup),
            Some(PreviewRow::Group(None))
        ));
        assert!(matches!(
            preview_row(&store, &id("y"), DragPhase::DraggingNode),
            Some(PreviewRow::Node(None))
        ));
    }
}
