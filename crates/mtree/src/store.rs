use std::collections::HashSet;

use crate::model::{Group, ItemId, Node};

/// Base step used when positioning a moved item next to a neighbour.
pub const INSERT_DELTA: f64 = 0.1;

/// The in-memory working copy of the tree.
///
/// Groups and nodes are kept in the order the caller supplied them; every listing sorts by
/// `position` with a stable sort, so input order breaks ties.
#[derive(Clone, Debug)]
pub struct TreeStore<G, N> {
    groups: Vec<Group<G>>,
    nodes: Vec<Node<N>>,
}

impl<G, N> Default for TreeStore<G, N> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

impl<G, N> TreeStore<G, N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_groups(&mut self, groups: impl Into<Vec<Group<G>>>) {
        self.groups = groups.into();
    }

    pub fn set_nodes(&mut self, nodes: impl Into<Vec<Node<N>>>) {
        self.nodes = nodes.into();
    }

    pub fn groups(&self) -> &[Group<G>] {
        &self.groups
    }

    pub fn nodes(&self) -> &[Node<N>] {
        &self.nodes
    }

    /// All groups, ascending by position.
    pub fn list_groups(&self) -> Vec<&Group<G>> {
        let mut groups: Vec<_> = self.groups.iter().collect();
        groups.sort_by(|a, b| a.position.total_cmp(&b.position));
        groups
    }

    /// Nodes in the `(group_id, parent_node_id)` bucket, ascending by position.
    ///
    /// `parent_node_id = None` lists the top-level nodes of a group.
    pub fn list_children(
        &self,
        group_id: Option<&ItemId>,
        parent_node_id: Option<&ItemId>,
    ) -> Vec<&Node<N>> {
        let mut nodes: Vec<_> = self
            .nodes
            .iter()
            .filter(|node| node.is_in(group_id, parent_node_id))
            .collect();
        nodes.sort_by(|a, b| a.position.total_cmp(&b.position));
        nodes
    }

    pub fn group(&self, id: &ItemId) -> Option<&Group<G>> {
        self.groups.iter().find(|group| group.id == *id)
    }

    pub fn node(&self, id: &ItemId) -> Option<&Node<N>> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    pub fn contains_group(&self, id: &ItemId) -> bool {
        self.group(id).is_some()
    }

    pub fn contains_node(&self, id: &ItemId) -> bool {
        self.node(id).is_some()
    }

    /// Whether any node belongs to the group, at any depth.
    pub fn group_has_children(&self, group_id: Option<&ItemId>) -> bool {
        self.nodes
            .iter()
            .any(|node| node.group_id.as_ref() == group_id)
    }

    pub fn node_has_children(&self, node_id: &ItemId) -> bool {
        self.nodes
            .iter()
            .any(|node| node.parent_node_id.as_ref() == Some(node_id))
    }

    /// True for top-level nodes and for direct children of top-level nodes.
    pub fn node_is_first_level(&self, node: &Node<N>) -> bool {
        let Some(parent_id) = node.parent_node_id.as_ref() else {
            return true;
        };
        self.node(parent_id)
            .is_none_or(|parent| parent.parent_node_id.is_none())
    }

    pub fn toggle_group_expanded(&mut self, id: &ItemId) -> bool {
        let Some(group) = self.groups.iter_mut().find(|group| group.id == *id) else {
            return false;
        };
        group.expanded = !group.expanded;
        true
    }

    pub fn toggle_node_expanded(&mut self, id: &ItemId) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|node| node.id == *id) else {
            return false;
        };
        node.expanded = !node.expanded;
        true
    }

    pub fn set_group_expanded(&mut self, id: &ItemId, expanded: bool) -> bool {
        let Some(group) = self.groups.iter_mut().find(|group| group.id == *id) else {
            return false;
        };
        let changed = group.expanded != expanded;
        group.expanded = expanded;
        changed
    }

    pub fn set_node_expanded(&mut self, id: &ItemId, expanded: bool) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|node| node.id == *id) else {
            return false;
        };
        let changed = node.expanded != expanded;
        node.expanded = expanded;
        changed
    }

    /// Move a node into `new_group_id`, placed immediately before `before` or, failing that,
    /// immediately after `after`, among that neighbour's siblings.
    ///
    /// When neither neighbour resolves, the position is left untouched and the node goes last
    /// among any siblings it ties with. The node's descendants follow it into the new group.
    /// Returns `false` when `node_id` is unknown.
    pub fn move_node(
        &mut self,
        node_id: &ItemId,
        new_group_id: Option<ItemId>,
        before: Option<&ItemId>,
        after: Option<&ItemId>,
    ) -> bool {
        let Some(index) = self.nodes.iter().position(|node| node.id == *node_id) else {
            return false;
        };

        let anchor = |id: Option<&ItemId>| {
            id.filter(|id| *id != node_id)
                .and_then(|id| self.nodes.iter().position(|node| node.id == *id))
        };
        let target = anchor(before)
            .map(|ix| (ix, Side::Before))
            .or_else(|| anchor(after).map(|ix| (ix, Side::After)));

        match target {
            Some((target, side)) => {
                let group_id = self.nodes[target].group_id.clone();
                let parent_node_id = self.nodes[target].parent_node_id.clone();
                place_next_to(&mut self.nodes, index, target, side, |node| {
                    node.is_in(group_id.as_ref(), parent_node_id.as_ref())
                });
            }
            None => {
                let node = self.nodes.remove(index);
                self.nodes.push(node);
            }
        }
        self.retag_subtree(node_id, new_group_id);
        true
    }

    /// Re-parent a node. The node and its subtree adopt the new parent's group.
    ///
    /// Refuses moves that would create a cycle (the new parent is the node itself or one of its
    /// descendants) and moves under an unknown parent.
    pub fn set_node_parent(&mut self, node_id: &ItemId, parent_node_id: Option<ItemId>) -> bool {
        if !self.contains_node(node_id) {
            return false;
        }

        let group_id = match parent_node_id.as_ref() {
            Some(parent_id) => {
                if parent_id == node_id || self.descendants_of(node_id).contains(parent_id) {
                    return false;
                }
                let Some(parent) = self.node(parent_id) else {
                    return false;
                };
                Some(parent.group_id.clone())
            }
            None => None,
        };

        if let Some(node) = self.nodes.iter_mut().find(|node| node.id == *node_id) {
            node.parent_node_id = parent_node_id;
        }
        if let Some(group_id) = group_id {
            self.retag_subtree(node_id, group_id);
        }
        true
    }

    /// Reorder a group immediately before `before` or, failing that, immediately after `after`.
    pub fn move_group(
        &mut self,
        group_id: &ItemId,
        before: Option<&ItemId>,
        after: Option<&ItemId>,
    ) -> bool {
        let Some(index) = self.groups.iter().position(|group| group.id == *group_id) else {
            return false;
        };

        let anchor = |id: Option<&ItemId>| {
            id.filter(|id| *id != group_id)
                .and_then(|id| self.groups.iter().position(|group| group.id == *id))
        };
        let Some((target, side)) = anchor(before)
            .map(|ix| (ix, Side::Before))
            .or_else(|| anchor(after).map(|ix| (ix, Side::After)))
        else {
            return false;
        };

        place_next_to(&mut self.groups, index, target, side, |_| true);
        true
    }

    /// Remove exactly one node. Its descendants stay in the collection but become unreachable.
    pub fn delete_node(&mut self, node_id: &ItemId) -> bool {
        let Some(index) = self.nodes.iter().position(|node| node.id == *node_id) else {
            return false;
        };
        self.nodes.remove(index);
        true
    }

    /// Remove a node together with all of its descendants. Returns how many nodes were removed.
    pub fn delete_node_subtree(&mut self, node_id: &ItemId) -> usize {
        if !self.contains_node(node_id) {
            return 0;
        }
        let mut doomed = self.descendants_of(node_id);
        doomed.insert(node_id.clone());
        let before = self.nodes.len();
        self.nodes.retain(|node| !doomed.contains(&node.id));
        before - self.nodes.len()
    }

    /// Remove a group, every node tagged with it, and any descendant of those nodes.
    pub fn delete_group(&mut self, group_id: &ItemId) -> bool {
        let mut doomed: HashSet<ItemId> = self
            .nodes
            .iter()
            .filter(|node| node.group_id.as_ref() == Some(group_id))
            .map(|node| node.id.clone())
            .collect();
        let roots: Vec<ItemId> = doomed.iter().cloned().collect();
        for root in &roots {
            doomed.extend(self.descendants_of(root));
        }
        self.nodes.retain(|node| !doomed.contains(&node.id));

        let Some(index) = self.groups.iter().position(|group| group.id == *group_id) else {
            return !doomed.is_empty();
        };
        self.groups.remove(index);
        true
    }

    /// Transitive children of `node_id`, excluding the node itself.
    pub fn descendants_of(&self, node_id: &ItemId) -> HashSet<ItemId> {
        let mut found = HashSet::new();
        let mut frontier = vec![node_id.clone()];
        while let Some(parent_id) = frontier.pop() {
            for node in &self.nodes {
                if node.parent_node_id.as_ref() == Some(&parent_id)
                    && node.id != *node_id
                    && found.insert(node.id.clone())
                {
                    frontier.push(node.id.clone());
                }
            }
        }
        found
    }

    fn retag_subtree(&mut self, node_id: &ItemId, group_id: Option<ItemId>) {
        let mut subtree = self.descendants_of(node_id);
        subtree.insert(node_id.clone());
        for node in self.nodes.iter_mut() {
            if subtree.contains(&node.id) {
                node.group_id = group_id.clone();
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Side {
    Before,
    After,
}

/// Something ordered by a fractional position.
trait Ranked {
    fn position(&self) -> f64;
    fn set_position(&mut self, position: f64);
}

impl<T> Ranked for Group<T> {
    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, position: f64) {
        self.position = position;
    }
}

impl<T> Ranked for Node<T> {
    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, position: f64) {
        self.position = position;
    }
}

/// Place `items[moving]` directly on `side` of `items[target]` in the stable position order of
/// the entries accepted by `in_bucket`.
///
/// The neighbour is the target's actual predecessor or successor in that order. When no position
/// fits strictly between the neighbour and the target (a tie, or a gap too small for `f64`), the
/// moved item takes the target's position and is relocated next to it in `items`, so the stable
/// tie-break orders it correctly.
fn place_next_to<R: Ranked>(
    items: &mut Vec<R>,
    moving: usize,
    target: usize,
    side: Side,
    in_bucket: impl Fn(&R) -> bool,
) {
    let mut bucket: Vec<usize> = (0..items.len())
        .filter(|&ix| ix != moving && in_bucket(&items[ix]))
        .collect();
    bucket.sort_by(|&a, &b| items[a].position().total_cmp(&items[b].position()));

    let target_position = items[target].position();
    let slot = bucket.iter().position(|&ix| ix == target);
    let neighbour = slot
        .and_then(|slot| match side {
            Side::Before => slot.checked_sub(1).map(|prev| bucket[prev]),
            Side::After => bucket.get(slot + 1).copied(),
        })
        .map(|ix| items[ix].position());

    let (position, fits) = match side {
        Side::Before => {
            let position = position_before(target_position, neighbour);
            let fits =
                position < target_position && neighbour.is_none_or(|lower| lower < position);
            (position, fits)
        }
        Side::After => {
            let position = position_after(target_position, neighbour);
            let fits =
                position > target_position && neighbour.is_none_or(|upper| position < upper);
            (position, fits)
        }
    };

    if fits {
        items[moving].set_position(position);
        return;
    }

    let mut item = items.remove(moving);
    item.set_position(target_position);
    let target = if moving < target { target - 1 } else { target };
    match side {
        Side::Before => items.insert(target, item),
        Side::After => items.insert(target + 1, item),
    }
}

/// A position just below `target`. Falls back to the midpoint of the gap once the neighbour below
/// is within [`INSERT_DELTA`], so repeated inserts converge on `target`.
fn position_before(target: f64, lower: Option<f64>) -> f64 {
    match lower {
        Some(lower) if lower >= target - INSERT_DELTA => (lower + target) / 2.,
        _ => target - INSERT_DELTA,
    }
}

fn position_after(target: f64, upper: Option<f64>) -> f64 {
    match upper {
        Some(upper) if upper <= target + INSERT_DELTA => (target + upper) / 2.,
        _ => target + INSERT_DELTA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &'static str) -> ItemId {
        s.into()
    }

    fn ids<T>(nodes: &[&Node<T>]) -> Vec<String> {
        nodes.iter().map(|node| node.id.to_string()).collect()
    }

    fn sample() -> TreeStore<&'static str, &'static str> {
        let mut store = TreeStore::new();
        store.set_groups(vec![
            Group::new("B", "Group B", 2.0),
            Group::new("A", "Group A", 1.0),
        ]);
        store.set_nodes(vec![
            Node::new("x", "X", 1.0).group("A"),
            Node::new("y", "Y", 1.0).group("B"),
            Node::new("a", "a", 1.0).group("A").parent("x"),
            Node::new("b", "b", 2.0).group("A").parent("x"),
            Node::new("c", "c", 1.0).group("A").parent("a"),
        ]);
        store
    }

    #[test]
    fn lists_groups_by_position_with_stable_ties() {
        let mut store: TreeStore<(), ()> = TreeStore::new();
        store.set_groups(vec![
            Group::new("g3", (), 2.0),
            Group::new("g1", (), 1.0),
            Group::new("g2", (), 1.0),
        ]);
        let order: Vec<_> = store.list_groups().iter().map(|g| g.id.clone()).collect();
        assert_eq!(order, vec![id("g1"), id("g2"), id("g3")]);
    }

    #[test]
    fn lists_children_per_bucket() {
        let store = sample();
        assert_eq!(ids(&store.list_children(Some(&id("A")), None)), vec!["x"]);
        assert_eq!(
            ids(&store.list_children(Some(&id("A")), Some(&id("x")))),
            vec!["a", "b"]
        );
        assert_eq!(
            ids(&store.list_children(Some(&id("A")), Some(&id("a")))),
            vec!["c"]
        );
        assert!(store.list_children(None, None).is_empty());
    }

    #[test]
    fn unassigned_nodes_form_their_own_bucket() {
        let mut store = sample();
        let mut nodes = store.nodes().to_vec();
        nodes.push(Node::new("z", "Z", 0.5));
        store.set_nodes(nodes);
        assert_eq!(ids(&store.list_children(None, None)), vec!["z"]);
        assert!(store.group_has_children(None));
    }

    #[test]
    fn move_without_neighbours_keeps_position() {
        let mut store = sample();
        assert!(store.move_node(&id("x"), Some(id("B")), None, None));

        let x = store.node(&id("x")).unwrap();
        assert_eq!(x.group_id, Some(id("B")));
        assert_eq!(x.position, 1.0);
        assert_eq!(ids(&store.list_children(Some(&id("B")), None)), vec!["y", "x"]);
        assert!(store.list_children(Some(&id("A")), None).is_empty());
    }

    #[test]
    fn move_carries_descendants_into_the_new_group() {
        let mut store = sample();
        store.move_node(&id("x"), Some(id("B")), None, None);
        assert_eq!(
            ids(&store.list_children(Some(&id("B")), Some(&id("x")))),
            vec!["a", "b"]
        );
        assert_eq!(store.node(&id("c")).unwrap().group_id, Some(id("B")));
    }

    #[test]
    fn move_before_and_after_neighbours() {
        let mut store = sample();
        store.move_node(&id("b"), Some(id("A")), Some(&id("a")), None);
        assert_eq!(
            ids(&store.list_children(Some(&id("A")), Some(&id("x")))),
            vec!["b", "a"]
        );
        assert_eq!(store.node(&id("b")).unwrap().position, 1.0 - INSERT_DELTA);

        store.move_node(&id("b"), Some(id("A")), None, Some(&id("a")));
        assert_eq!(
            ids(&store.list_children(Some(&id("A")), Some(&id("x")))),
            vec!["a", "b"]
        );
        assert_eq!(store.node(&id("b")).unwrap().position, 1.0 + INSERT_DELTA);
    }

    #[test]
    fn unknown_move_targets_are_ignored() {
        let mut store = sample();
        assert!(!store.move_node(&id("nope"), Some(id("B")), None, None));
        store.move_node(&id("b"), Some(id("A")), Some(&id("nope")), Some(&id("a")));
        assert_eq!(store.node(&id("b")).unwrap().position, 1.0 + INSERT_DELTA);
    }

    #[test]
    fn repeated_inserts_into_one_gap_stay_distinct() {
        let mut store: TreeStore<(), ()> = TreeStore::new();
        let mut nodes = vec![
            Node::new("lo", (), 1.0).group("g"),
            Node::new("hi", (), 2.0).group("g"),
        ];
        for i in 0..40 {
            nodes.push(Node::new(format!("m{i}"), (), 10.0 + i as f64).group("g"));
        }
        store.set_nodes(nodes);

        let mut previous = 1.0;
        for i in 0..40 {
            let moving = ItemId::from(format!("m{i}"));
            store.move_node(&moving, Some(id("g")), Some(&id("hi")), None);
            let position = store.node(&moving).unwrap().position;
            assert!(position > previous, "insert {i} did not advance: {position}");
            assert!(position < 2.0);
            previous = position;

            let order: Vec<_> = store
                .list_children(Some(&id("g")), None)
                .iter()
                .map(|node| node.id.clone())
                .collect();
            let hi = order.iter().position(|n| *n == id("hi")).unwrap();
            assert_eq!(order[hi - 1], moving);
        }
    }

    #[test]
    fn repeated_inserts_after_one_node_stay_distinct() {
        let mut store: TreeStore<(), ()> = TreeStore::new();
        let mut nodes = vec![
            Node::new("lo", (), 1.0).group("g"),
            Node::new("hi", (), 2.0).group("g"),
        ];
        for i in 0..40 {
            nodes.push(Node::new(format!("m{i}"), (), 10.0 + i as f64).group("g"));
        }
        store.set_nodes(nodes);

        let mut previous = 2.0;
        for i in 0..40 {
            let moving = ItemId::from(format!("m{i}"));
            store.move_node(&moving, Some(id("g")), None, Some(&id("lo")));
            let position = store.node(&moving).unwrap().position;
            assert!(position < previous, "insert {i} did not advance: {position}");
            assert!(position > 1.0);
            previous = position;

            let order: Vec<_> = store
                .list_children(Some(&id("g")), None)
                .iter()
                .map(|node| node.id.clone())
                .collect();
            let lo = order.iter().position(|n| *n == id("lo")).unwrap();
            assert_eq!(order[lo + 1], moving);
        }
    }

    fn tied() -> TreeStore<(), ()> {
        let mut store = TreeStore::new();
        store.set_nodes(vec![
            Node::new("p", (), 1.0).group("g"),
            Node::new("b", (), 1.0).group("g"),
            Node::new("q", (), 1.0).group("g"),
            Node::new("n", (), 5.0).group("g"),
        ]);
        store
    }

    #[test]
    fn move_lands_between_tied_siblings() {
        let mut store = tied();
        assert!(store.move_node(&id("n"), Some(id("g")), Some(&id("b")), None));
        assert_eq!(
            ids(&store.list_children(Some(&id("g")), None)),
            vec!["p", "n", "b", "q"]
        );
        assert_eq!(store.node(&id("n")).unwrap().position, 1.0);

        let mut store = tied();
        assert!(store.move_node(&id("n"), Some(id("g")), None, Some(&id("b"))));
        assert_eq!(
            ids(&store.list_children(Some(&id("g")), None)),
            vec!["p", "b", "n", "q"]
        );

        let mut store = tied();
        assert!(store.move_node(&id("p"), Some(id("g")), None, Some(&id("q"))));
        assert_eq!(
            ids(&store.list_children(Some(&id("g")), None)),
            vec!["b", "q", "p", "n"]
        );
    }

    #[test]
    fn move_group_lands_between_tied_groups() {
        let mut store: TreeStore<(), ()> = TreeStore::new();
        store.set_groups(vec![
            Group::new("a", (), 1.0),
            Group::new("b", (), 1.0),
            Group::new("c", (), 3.0),
        ]);
        assert!(store.move_group(&id("c"), Some(&id("b")), None));
        let order: Vec<_> = store.list_groups().iter().map(|g| g.id.to_string()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn reparenting_refuses_cycles() {
        let mut store = sample();
        assert!(!store.set_node_parent(&id("x"), Some(id("c"))));
        assert!(!store.set_node_parent(&id("x"), Some(id("x"))));
        assert!(!store.set_node_parent(&id("x"), Some(id("missing"))));

        assert!(store.set_node_parent(&id("b"), Some(id("y"))));
        let b = store.node(&id("b")).unwrap();
        assert_eq!(b.parent_node_id, Some(id("y")));
        assert_eq!(b.group_id, Some(id("B")));

        assert!(store.set_node_parent(&id("a"), None));
        assert_eq!(
            ids(&store.list_children(Some(&id("A")), None)),
            vec!["x", "a"]
        );
        assert_eq!(
            ids(&store.list_children(Some(&id("A")), Some(&id("a")))),
            vec!["c"]
        );
    }

    #[test]
    fn delete_node_orphans_descendants() {
        let mut store = sample();
        assert!(store.delete_node(&id("a")));
        assert!(store.node(&id("a")).is_none());
        assert!(store.node(&id("c")).is_some());
        assert_eq!(
            ids(&store.list_children(Some(&id("A")), Some(&id("x")))),
            vec!["b"]
        );
        assert!(!store.delete_node(&id("a")));
    }

    #[test]
    fn delete_subtree_cascades() {
        let mut store = sample();
        assert_eq!(store.delete_node_subtree(&id("x")), 4);
        assert_eq!(ids(&store.nodes().iter().collect::<Vec<_>>()), vec!["y"]);
        assert_eq!(store.delete_node_subtree(&id("x")), 0);
    }

    #[test]
    fn delete_group_removes_its_nodes() {
        let mut store = sample();
        assert!(store.delete_group(&id("A")));
        let groups: Vec<_> = store.list_groups().iter().map(|g| g.id.clone()).collect();
        assert_eq!(groups, vec![id("B")]);
        assert_eq!(ids(&store.nodes().iter().collect::<Vec<_>>()), vec!["y"]);
        assert!(store.list_children(Some(&id("A")), None).is_empty());
        assert_eq!(ids(&store.list_children(Some(&id("B")), None)), vec!["y"]);
    }

    #[test]
    fn delete_group_reaches_untagged_descendants() {
        let mut store = sample();
        let mut nodes = store.nodes().to_vec();
        nodes.push(Node::new("z", "z", 1.0).parent("c"));
        store.set_nodes(nodes);
        store.delete_group(&id("A"));
        assert!(store.node(&id("z")).is_none());
    }

    #[test]
    fn toggles_are_noops_for_unknown_ids() {
        let mut store = sample();
        let groups = store.groups().to_vec();
        let nodes = store.nodes().to_vec();
        assert!(!store.toggle_group_expanded(&id("nope")));
        assert!(!store.toggle_node_expanded(&id("nope")));
        assert_eq!(store.groups(), groups.as_slice());
        assert_eq!(store.nodes(), nodes.as_slice());

        assert!(store.toggle_group_expanded(&id("A")));
        assert!(!store.group(&id("A")).unwrap().expanded);
        assert!(store.toggle_node_expanded(&id("x")));
        assert!(!store.node(&id("x")).unwrap().expanded);
        assert!(!store.set_node_expanded(&id("x"), false));
        assert!(store.set_node_expanded(&id("x"), true));
    }

    #[test]
    fn child_predicates() {
        let store = sample();
        assert!(store.group_has_children(Some(&id("A"))));
        assert!(!store.group_has_children(Some(&id("C"))));
        assert!(store.node_has_children(&id("x")));
        assert!(!store.node_has_children(&id("b")));

        assert!(store.node_is_first_level(store.node(&id("x")).unwrap()));
        assert!(store.node_is_first_level(store.node(&id("a")).unwrap()));
        assert!(!store.node_is_first_level(store.node(&id("c")).unwrap()));
    }

    #[test]
    fn move_group_reorders() {
        let mut store = sample();
        assert!(store.move_group(&id("B"), Some(&id("A")), None));
        let order: Vec<_> = store.list_groups().iter().map(|g| g.id.clone()).collect();
        assert_eq!(order, vec![id("B"), id("A")]);

        assert!(store.move_group(&id("B"), None, Some(&id("A"))));
        let order: Vec<_> = store.list_groups().iter().map(|g| g.id.clone()).collect();
        assert_eq!(order, vec![id("A"), id("B")]);

        assert!(!store.move_group(&id("B"), Some(&id("B")), None));
        assert!(!store.move_group(&id("nope"), Some(&id("A")), None));
    }
}
