use std::path::PathBuf;

use anyhow::Context as _;
use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::ActiveTheme as _;
use gpui_component::{h_flex, v_flex};
use gpui_mtree::{Group, MTreeConfig, MTreeRowState, MTreeState, Node, TreeStore, mtree};
use serde::Deserialize;

const DEMO_DOCUMENT: &str = include_str!("../assets/demo.json");

type DemoTree = MTreeState<String, String>;

/// Groups, nodes and optional layout settings, as loaded from JSON.
#[derive(Debug, Deserialize)]
pub struct TreeDocument {
    #[serde(default)]
    pub config: MTreeConfig,
    pub groups: Vec<Group<String>>,
    #[serde(default)]
    pub nodes: Vec<Node<String>>,
}

/// Read a document from `path`, or the bundled demo when no path is given.
pub fn load_document(path: Option<PathBuf>) -> anyhow::Result<TreeDocument> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => serde_json::from_str(DEMO_DOCUMENT).context("parsing bundled demo document"),
    }
}

pub struct MTreeStory {
    tree: Entity<DemoTree>,
}

impl MTreeStory {
    pub fn view(document: TreeDocument, _window: &mut Window, cx: &mut App) -> Entity<Self> {
        let TreeDocument {
            config,
            groups,
            nodes,
        } = document;
        let tree = cx.new(|_| MTreeState::new().config(config).groups(groups).nodes(nodes));
        cx.new(|cx| {
            cx.observe(&tree, |_, _, cx| cx.notify()).detach();
            Self { tree }
        })
    }
}

impl Render for MTreeStory {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let state = self.tree.read(cx);
        let tree_dump = format_tree(state.store());
        let dragging = state
            .drag()
            .dragging_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        let summary = format!(
            "{} groups, {} nodes. Dragging: {dragging}",
            state.store().groups().len(),
            state.store().nodes().len()
        );

        let group_tree = self.tree.clone();
        let node_tree = self.tree.clone();
        let drop_tree = self.tree.clone();

        v_flex()
            .size_full()
            .p(px(16.))
            .gap_y_3()
            .child(
                v_flex()
                    .gap_y_1()
                    .child(div().text_xl().font_weight(FontWeight::BOLD).child("MTree"))
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child("Tip: drag a group onto another group to reorder groups. Drag a node onto another node to insert it before (upper half) or after (lower half) that node, or onto a group header to move it into that group. Dragging near the top or bottom edge scrolls."),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child(summary),
                    ),
            )
            .child(
                h_flex()
                    .flex_1()
                    .min_h(px(0.))
                    .gap_x_3()
                    .child(
                        div()
                            .w(px(420.))
                            .min_w(px(0.))
                            .h_full()
                            .rounded(px(12.))
                            .border_1()
                            .border_color(theme.border)
                            .bg(theme.background)
                            .overflow_hidden()
                            .child(
                                mtree(
                                    &self.tree,
                                    move |group, row_state, _window, cx| {
                                        render_group_row(&group_tree, group, row_state, cx)
                                    },
                                    move |node, row_state, _window, cx| {
                                        render_node_row(&node_tree, node, row_state, cx)
                                    },
                                )
                                .on_drop(move |drop, _window, cx| {
                                    drop_tree.update(cx, |tree, cx| {
                                        tree.apply_drop(drop, cx);
                                    });
                                }),
                            ),
                    )
                    .child(
                        v_flex()
                            .flex_1()
                            .min_w(px(0.))
                            .h_full()
                            .gap_y_2()
                            .child(
                                div()
                                    .text_sm()
                                    .font_weight(FontWeight::MEDIUM)
                                    .child("Debug (store order)"),
                            )
                            .child(
                                div()
                                    .id("mtree-story-dump")
                                    .flex_1()
                                    .min_h(px(0.))
                                    .overflow_y_scroll()
                                    .rounded(px(12.))
                                    .border_1()
                                    .border_color(theme.border)
                                    .bg(theme.background)
                                    .p(px(12.))
                                    .child(render_tree_dump(tree_dump)),
                            ),
                    ),
            )
    }
}

fn chevron(expanded: bool) -> &'static str {
    if expanded { "▾" } else { "▸" }
}

fn render_group_row(
    tree: &Entity<DemoTree>,
    group: Option<&Group<String>>,
    row_state: MTreeRowState,
    cx: &mut App,
) -> AnyElement {
    let theme = cx.theme();
    let Some(group) = group else {
        return div().into_any_element();
    };

    let toggle_tree = tree.clone();
    let toggle_id = group.id.clone();
    let delete_tree = tree.clone();
    let delete_id = group.id.clone();

    h_flex()
        .w_full()
        .h(px(36.))
        .px_2()
        .gap_x_2()
        .items_center()
        .bg(theme.secondary)
        .border_b_1()
        .border_color(theme.border)
        .font_weight(FontWeight::MEDIUM)
        .when(row_state.lifted, |this| this.opacity(0.4))
        .when(row_state.dragging, |this| this.shadow_md().rounded(px(6.)))
        .when(row_state.drop_edge.is_some(), |this| this.bg(theme.drop_target))
        .child(
            div()
                .id(ElementId::Name(format!("toggle-group-{}", group.id).into()))
                .w(px(16.))
                .text_color(theme.muted_foreground)
                .when(row_state.has_children, |this| {
                    this.child(chevron(group.expanded))
                })
                .on_click(move |_, _window, cx| {
                    toggle_tree.update(cx, |tree, cx| tree.toggle_group_expanded(&toggle_id, cx));
                }),
        )
        .child(div().flex_1().child(group.title.clone()))
        .when(!row_state.dragging, |this| {
            this.child(
                div()
                    .id(ElementId::Name(format!("delete-group-{}", group.id).into()))
                    .px_1()
                    .text_color(theme.muted_foreground)
                    .child("×")
                    .on_click(move |_, _window, cx| {
                        delete_tree.update(cx, |tree, cx| tree.delete_group(&delete_id, cx));
                    }),
            )
        })
        .into_any_element()
}

fn render_node_row(
    tree: &Entity<DemoTree>,
    node: Option<&Node<String>>,
    row_state: MTreeRowState,
    cx: &mut App,
) -> AnyElement {
    let theme = cx.theme();
    let Some(node) = node else {
        return div().into_any_element();
    };

    let toggle_tree = tree.clone();
    let toggle_id = node.id.clone();
    let delete_tree = tree.clone();
    let delete_id = node.id.clone();

    h_flex()
        .w_full()
        .h(px(28.))
        .pl(px(12.))
        .pr_2()
        .gap_x_2()
        .items_center()
        .bg(theme.background)
        .when(row_state.lifted, |this| this.opacity(0.4))
        .when(row_state.dragging, |this| this.shadow_md().rounded(px(6.)))
        .when(row_state.drop_edge.is_some(), |this| this.bg(theme.drop_target))
        .child(
            div()
                .id(ElementId::Name(format!("toggle-node-{}", node.id).into()))
                .w(px(16.))
                .text_color(theme.muted_foreground)
                .when(row_state.has_children, |this| this.child(chevron(node.expanded)))
                .on_click(move |_, _window, cx| {
                    toggle_tree.update(cx, |tree, cx| tree.toggle_node_expanded(&toggle_id, cx));
                }),
        )
        .child(div().flex_1().text_sm().child(node.title.clone()))
        .when(!row_state.dragging, |this| {
            this.child(
                div()
                    .id(ElementId::Name(format!("delete-node-{}", node.id).into()))
                    .px_1()
                    .text_sm()
                    .text_color(theme.muted_foreground)
                    .child("×")
                    .on_click(move |_, _window, cx| {
                        delete_tree.update(cx, |tree, cx| tree.delete_node_subtree(&delete_id, cx));
                    }),
            )
        })
        .into_any_element()
}

fn render_tree_dump(text: String) -> impl IntoElement {
    let lines = text
        .lines()
        .map(|line| div().text_sm().child(line.to_string()));
    v_flex().gap_y_0p5().children(lines)
}

fn format_tree(store: &TreeStore<String, String>) -> String {
    fn walk(
        store: &TreeStore<String, String>,
        group_id: &SharedString,
        parent: Option<&SharedString>,
        depth: usize,
        out: &mut String,
    ) {
        for node in store.list_children(Some(group_id), parent) {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{} ({})\n", node.id, node.position));
            walk(store, group_id, Some(&node.id), depth + 1, out);
        }
    }

    let mut out = String::new();
    for group in store.list_groups() {
        out.push_str(&format!("[{}] ({})\n", group.id, group.position));
        walk(store, &group.id, None, 1, &mut out);
    }
    out
}
