use gpui::{Pixels, px};
use serde::{Deserialize, Serialize};

/// Construction parameters for an [`crate::MTreeState`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MTreeConfig {
    /// Height of a group header row.
    pub group_height: Pixels,
    /// Height of a node header row.
    pub node_height: Pixels,
    /// Indentation applied to the children of a node, per nesting level.
    pub child_indent: Pixels,
}

impl Default for MTreeConfig {
    fn default() -> Self {
        Self {
            group_height: px(36.),
            node_height: px(28.),
            child_indent: px(16.),
        }
    }
}

impl MTreeConfig {
    pub fn group_height(mut self, height: Pixels) -> Self {
        self.group_height = height;
        self
    }

    pub fn node_height(mut self, height: Pixels) -> Self {
        self.node_height = height;
        self
    }

    pub fn child_indent(mut self, indent: Pixels) -> Self {
        self.child_indent = indent;
        self
    }
}
