use std::collections::HashMap;

use gpui::{Bounds, Pixels, Point};

use crate::model::ItemId;

/// Last-known window bounds per identity, iterated in first-registration order.
#[derive(Clone, Debug, Default)]
pub struct FrameMap {
    entries: Vec<(ItemId, Bounds<Pixels>)>,
    index: HashMap<ItemId, usize>,
}

impl FrameMap {
    /// Record `bounds` for `id`, returning whether the stored value changed.
    pub fn insert(&mut self, id: ItemId, bounds: Bounds<Pixels>) -> bool {
        match self.index.get(&id) {
            Some(&ix) => {
                let slot = &mut self.entries[ix].1;
                if *slot == bounds {
                    return false;
                }
                *slot = bounds;
                true
            }
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, bounds));
                true
            }
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<Bounds<Pixels>> {
        self.index.get(id).map(|&ix| self.entries[ix].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Bounds<Pixels>)> {
        self.entries.iter().map(|(id, bounds)| (id, bounds))
    }

    /// Entries whose bounds contain `point`, in registration order.
    pub fn containing(
        &self,
        point: Point<Pixels>,
    ) -> impl Iterator<Item = (&ItemId, &Bounds<Pixels>)> {
        self.iter().filter(move |(_, bounds)| bounds.contains(&point))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemId) -> bool) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _)| keep(id));
        if self.entries.len() == before {
            return false;
        }
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(ix, (id, _))| (id.clone(), ix))
            .collect();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

/// Live mapping from rendered groups and nodes to their on-screen bounds.
///
/// Written by the renderer after every layout pass, read by the drag controller. Entries of rows
/// that are not rendered any more are pruned by the renderer, so a missing entry is normal.
#[derive(Clone, Debug, Default)]
pub struct FrameRegistry {
    groups: FrameMap,
    nodes: FrameMap,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_group(&mut self, id: ItemId, bounds: Bounds<Pixels>) -> bool {
        self.groups.insert(id, bounds)
    }

    pub fn register_node(&mut self, id: ItemId, bounds: Bounds<Pixels>) -> bool {
        self.nodes.insert(id, bounds)
    }

    pub fn group(&self, id: &ItemId) -> Option<Bounds<Pixels>> {
        self.groups.get(id)
    }

    pub fn node(&self, id: &ItemId) -> Option<Bounds<Pixels>> {
        self.nodes.get(id)
    }

    pub fn groups(&self) -> &FrameMap {
        &self.groups
    }

    pub fn nodes(&self) -> &FrameMap {
        &self.nodes
    }

    /// Bounds of a group or node, groups first.
    pub fn frame(&self, id: &ItemId) -> Option<Bounds<Pixels>> {
        self.group(id).or_else(|| self.node(id))
    }

    /// Drop every entry whose identity `keep` rejects. Returns whether anything was removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemId) -> bool) -> bool {
        let groups = self.groups.retain(&mut keep);
        let nodes = self.nodes.retain(&mut keep);
        groups || nodes
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.nodes.clear();
    }
}
