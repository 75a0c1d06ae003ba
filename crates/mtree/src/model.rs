use gpui::SharedString;
use serde::{Deserialize, Serialize};

/// Stable identity of a group or node.
pub type ItemId = SharedString;

fn expanded_by_default() -> bool {
    true
}

/// A top-level container row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group<T> {
    pub id: ItemId,
    pub title: T,
    /// Sort key among groups. Only the relative order matters.
    pub position: f64,
    #[serde(default = "expanded_by_default")]
    pub expanded: bool,
}

impl<T> Group<T> {
    pub fn new(id: impl Into<ItemId>, title: T, position: f64) -> Self {
        Self {
            id: id.into(),
            title,
            position,
            expanded: true,
        }
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

/// A row nested under a group and, optionally, under another node.
///
/// Children store their `group_id` explicitly, so a subtree is expected to carry the group id of
/// its top-level ancestor. The parent relation must form a forest; this is not validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node<T> {
    pub id: ItemId,
    pub title: T,
    /// Sort key among siblings sharing the same group and parent.
    pub position: f64,
    #[serde(default)]
    pub group_id: Option<ItemId>,
    #[serde(default)]
    pub parent_node_id: Option<ItemId>,
    #[serde(default = "expanded_by_default")]
    pub expanded: bool,
}

impl<T> Node<T> {
    pub fn new(id: impl Into<ItemId>, title: T, position: f64) -> Self {
        Self {
            id: id.into(),
            title,
            position,
            group_id: None,
            parent_node_id: None,
            expanded: true,
        }
    }

    pub fn group(mut self, group_id: impl Into<ItemId>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn parent(mut self, parent_node_id: impl Into<ItemId>) -> Self {
        self.parent_node_id = Some(parent_node_id.into());
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Whether this node sits in the `(group_id, parent_node_id)` bucket.
    #[inline]
    pub fn is_in(&self, group_id: Option<&ItemId>, parent_node_id: Option<&ItemId>) -> bool {
        self.group_id.as_ref() == group_id && self.parent_node_id.as_ref() == parent_node_id
    }
}
