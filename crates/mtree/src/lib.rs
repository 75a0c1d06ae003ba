mod config;
mod drag;
mod frames;
mod geometry;
mod model;
mod store;
mod tree;

pub use config::MTreeConfig;
pub use drag::{DragController, DragKind, DragPhase, DropTarget};
pub use frames::{FrameMap, FrameRegistry};
pub use geometry::{BoundsExt, CLOSE_THRESHOLD, DropEdge, ScrollDirection, reveal_offset};
pub use model::{Group, ItemId, Node};
pub use store::{INSERT_DELTA, TreeStore};
pub use tree::{
    MTree, MTreeDrop, MTreeRowState, MTreeState, apply_drop, indicator_bounds, mtree,
};
