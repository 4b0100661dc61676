//! Arena-backed binary search tree over relief centers.

use super::types::{Center, CenterId};
use crate::graph::GraphId;
use std::cmp::Ordering;
use std::ops::{Bound, RangeBounds};

/// Stable reference to a tree slot.
///
/// Valid until the next [`CenterIndex::delete`]; deletion may free or
/// recycle any slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

/// Result of [`CenterIndex::delete`].
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// The deleted center's record as it was before deletion.
    pub center: Center,
    /// Set when the in-order successor was promoted into the deleted
    /// center's slot: the slot's unchanged graph ID now carries the
    /// successor's key and location.
    pub promoted: Option<Promotion>,
}

/// Identity now held by a recycled slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    pub graph_id: GraphId,
    pub center_id: CenterId,
    pub location: String,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone)]
struct Node {
    center: Center,
    left: Option<usize>,
    right: Option<usize>,
}

/// Ordered index of relief centers keyed by [`CenterId`].
///
/// Invariant: for every node, keys in the left subtree are strictly smaller
/// and keys in the right subtree are greater or equal. Equal keys are routed
/// right on insert.
///
/// # Examples
///
/// ```
/// use u_relief::centers::{Center, CenterId, CenterIndex, ResourceMap};
/// use u_relief::graph::GraphId;
///
/// let mut index = CenterIndex::new();
/// for (g, id) in [(1, 50), (2, 30), (3, 70)] {
///     index.insert(Center::new(GraphId(g), CenterId(id), "loc", ResourceMap::new()));
/// }
/// let ids: Vec<u32> = index.iter().map(|c| c.center_id.0).collect();
/// assert_eq!(ids, vec![30, 50, 70]);
/// assert!(index.delete(CenterId(50)).is_some());
/// assert!(index.find(CenterId(50)).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CenterIndex {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    root: Option<usize>,
    len: usize,
}

impl CenterIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of centers in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the index holds no centers.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, slot: usize) -> &Node {
        self.slots[slot]
            .as_ref()
            .expect("tree links only point at live slots")
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node {
        self.slots[slot]
            .as_mut()
            .expect("tree links only point at live slots")
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) -> Node {
        let node = self.slots[slot]
            .take()
            .expect("released slot must be live");
        self.free.push(slot);
        node
    }

    /// Points `parent`'s link on `side` at `child`, or the root when there
    /// is no parent.
    fn relink(&mut self, parent: Option<(usize, Side)>, child: Option<usize>) {
        match parent {
            None => self.root = child,
            Some((p, Side::Left)) => self.node_mut(p).left = child,
            Some((p, Side::Right)) => self.node_mut(p).right = child,
        }
    }

    /// Inserts a center. Equal keys go to the right subtree.
    pub fn insert(&mut self, center: Center) {
        let key = center.center_id;
        let slot = self.alloc(Node {
            center,
            left: None,
            right: None,
        });
        self.len += 1;

        let Some(mut current) = self.root else {
            self.root = Some(slot);
            return;
        };
        loop {
            let node = self.node(current);
            let (side, next) = if key < node.center.center_id {
                (Side::Left, node.left)
            } else {
                (Side::Right, node.right)
            };
            match next {
                Some(child) => current = child,
                None => {
                    self.relink(Some((current, side)), Some(slot));
                    return;
                }
            }
        }
    }

    fn find_slot(&self, id: CenterId) -> Option<usize> {
        let mut current = self.root;
        while let Some(slot) = current {
            let node = self.node(slot);
            current = match id.cmp(&node.center.center_id) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(slot),
            };
        }
        None
    }

    /// Looks up a center by ID.
    pub fn find(&self, id: CenterId) -> Option<&Center> {
        self.find_slot(id).map(|slot| &self.node(slot).center)
    }

    /// Looks up a center by ID for mutation.
    pub fn find_mut(&mut self, id: CenterId) -> Option<&mut Center> {
        let slot = self.find_slot(id)?;
        Some(&mut self.node_mut(slot).center)
    }

    /// Returns the center in a slot obtained from [`entries`](Self::entries).
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Center> {
        self.slots
            .get_mut(handle.0)
            .and_then(|slot| slot.as_mut())
            .map(|node| &mut node.center)
    }

    /// Removes the center with the given ID and returns its record.
    ///
    /// - Leaf: the parent's link is cleared.
    /// - One child: the child takes the node's place.
    /// - Two children: the in-order successor's key, location and resources
    ///   are moved into this slot and the successor's slot is unlinked.
    ///   The slot keeps its `graph_id`.
    ///
    /// Returns `None` when no center has that ID.
    pub fn delete(&mut self, id: CenterId) -> Option<Removal> {
        let mut parent = None;
        let mut current = self.root;
        while let Some(slot) = current {
            let node = self.node(slot);
            match id.cmp(&node.center.center_id) {
                Ordering::Less => {
                    parent = Some((slot, Side::Left));
                    current = node.left;
                }
                Ordering::Greater => {
                    parent = Some((slot, Side::Right));
                    current = node.right;
                }
                Ordering::Equal => break,
            }
        }
        let Some(target) = current else {
            tracing::debug!(center_id = %id, "delete: center not found");
            return None;
        };

        let (left, right) = {
            let node = self.node(target);
            (node.left, node.right)
        };
        let (removed, promoted) = match (left, right) {
            (Some(_), Some(right)) => {
                // Successor: left-most node of the right subtree.
                let mut successor_parent = (target, Side::Right);
                let mut successor = right;
                while let Some(next) = self.node(successor).left {
                    successor_parent = (successor, Side::Left);
                    successor = next;
                }
                let successor_right = self.node(successor).right;
                self.relink(Some(successor_parent), successor_right);
                let promoted = self.release(successor).center;

                tracing::debug!(
                    center_id = %id,
                    successor = %promoted.center_id,
                    "delete: promoting in-order successor"
                );
                let node = self.node_mut(target);
                let graph_id = node.center.graph_id;
                let promotion = Promotion {
                    graph_id,
                    center_id: promoted.center_id,
                    location: promoted.location.clone(),
                };
                let removed = std::mem::replace(
                    &mut node.center,
                    Center {
                        graph_id,
                        ..promoted
                    },
                );
                (removed, Some(promotion))
            }
            (child, None) | (None, child) => {
                self.relink(parent, child);
                (self.release(target).center, None)
            }
        };
        self.len -= 1;
        Some(Removal {
            center: removed,
            promoted,
        })
    }

    /// In-order traversal with slot handles.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            index: self,
            stack: Vec::new(),
            next: self.root,
        }
    }

    /// Centers in ascending `center_id` order.
    pub fn iter(&self) -> impl Iterator<Item = &Center> + '_ {
        self.entries().map(|(_, center)| center)
    }

    /// Centers in ascending `center_id` order, collected.
    pub fn inorder(&self) -> Vec<&Center> {
        self.iter().collect()
    }

    /// Centers whose ID falls in `range`, in ascending order.
    ///
    /// Subtrees that cannot hold keys in the range are skipped.
    pub fn range<R: RangeBounds<CenterId>>(&self, range: R) -> Vec<&Center> {
        let mut out = Vec::new();
        self.collect_range(self.root, &range, &mut out);
        out
    }

    fn collect_range<'a, R: RangeBounds<CenterId>>(
        &'a self,
        slot: Option<usize>,
        range: &R,
        out: &mut Vec<&'a Center>,
    ) {
        let Some(slot) = slot else {
            return;
        };
        let node = self.node(slot);
        let key = node.center.center_id;

        let left_reachable = match range.start_bound() {
            Bound::Unbounded => true,
            Bound::Included(start) | Bound::Excluded(start) => *start < key,
        };
        let right_reachable = match range.end_bound() {
            Bound::Unbounded => true,
            Bound::Included(end) => *end >= key,
            Bound::Excluded(end) => *end > key,
        };

        if left_reachable {
            self.collect_range(node.left, range, out);
        }
        if range.contains(&key) {
            out.push(&node.center);
        }
        if right_reachable {
            self.collect_range(node.right, range, out);
        }
    }

    /// Centers holding fewer than `min_categories` resource categories, in
    /// ascending order.
    pub fn under_provisioned(&self, min_categories: usize) -> Vec<&Center> {
        self.iter()
            .filter(|c| c.is_under_provisioned(min_categories))
            .collect()
    }

    /// Height of the tree (0 when empty).
    pub fn height(&self) -> usize {
        fn height_of(index: &CenterIndex, slot: Option<usize>) -> usize {
            match slot {
                None => 0,
                Some(s) => {
                    let node = index.node(s);
                    1 + height_of(index, node.left).max(height_of(index, node.right))
                }
            }
        }
        height_of(self, self.root)
    }
}

/// In-order iterator over a [`CenterIndex`].
pub struct Entries<'a> {
    index: &'a CenterIndex,
    stack: Vec<usize>,
    next: Option<usize>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (NodeHandle, &'a Center);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.next {
            self.stack.push(slot);
            self.next = self.index.node(slot).left;
        }
        let slot = self.stack.pop()?;
        let node = self.index.node(slot);
        self.next = node.right;
        Some((NodeHandle(slot), &node.center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centers::ResourceMap;
    use proptest::prelude::*;

    fn center(graph: u64, id: u32) -> Center {
        let resources: ResourceMap = [("food".to_string(), f64::from(id))].into_iter().collect();
        Center::new(GraphId(graph), CenterId(id), format!("loc-{id}"), resources)
    }

    fn build(ids: &[u32]) -> CenterIndex {
        let mut index = CenterIndex::new();
        for (i, &id) in ids.iter().enumerate() {
            index.insert(center(i as u64 + 1, id));
        }
        index
    }

    fn keys(index: &CenterIndex) -> Vec<u32> {
        index.iter().map(|c| c.center_id.0).collect()
    }

    /// Checks `left < node <= right` over the whole tree and that `len`
    /// matches the number of reachable nodes.
    fn assert_valid(index: &CenterIndex) {
        fn walk(
            index: &CenterIndex,
            slot: Option<usize>,
            low: Option<CenterId>,
            high: Option<CenterId>,
        ) -> usize {
            let Some(slot) = slot else { return 0 };
            let node = index.node(slot);
            let key = node.center.center_id;
            if let Some(low) = low {
                assert!(key >= low, "{key} below lower bound {low}");
            }
            if let Some(high) = high {
                assert!(key < high, "{key} not below upper bound {high}");
            }
            1 + walk(index, node.left, low, Some(key)) + walk(index, node.right, Some(key), high)
        }
        assert_eq!(walk(index, index.root, None, None), index.len());
    }

    #[test]
    fn test_insert_and_find() {
        let index = build(&[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(index.len(), 7);
        for id in [50, 30, 70, 20, 40, 60, 80] {
            assert_eq!(index.find(CenterId(id)).map(|c| c.center_id), Some(CenterId(id)));
        }
        assert!(index.find(CenterId(55)).is_none());
        assert_eq!(keys(&index), vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(index.height(), 3);
    }

    #[test]
    fn test_empty_index() {
        let mut index = CenterIndex::new();
        assert!(index.is_empty());
        assert!(index.inorder().is_empty());
        assert!(index.delete(CenterId(1)).is_none());
        assert_eq!(index.height(), 0);
    }

    #[test]
    fn test_equal_keys_go_right() {
        let mut index = CenterIndex::new();
        index.insert(center(1, 5));
        index.insert(center(2, 5));
        index.insert(center(3, 5));

        let root = index.root.unwrap();
        assert!(index.node(root).left.is_none());
        assert_eq!(index.height(), 3);
        // The first inserted is found first.
        assert_eq!(index.find(CenterId(5)).map(|c| c.graph_id), Some(GraphId(1)));
        assert_valid(&index);
    }

    #[test]
    fn test_delete_leaf() {
        let mut index = build(&[50, 30, 70]);
        let removal = index.delete(CenterId(30)).unwrap();
        assert_eq!(removal.center.center_id, CenterId(30));
        assert!(removal.promoted.is_none());
        assert_eq!(keys(&index), vec![50, 70]);
        assert_valid(&index);
    }

    #[test]
    fn test_delete_single_child() {
        let mut index = build(&[50, 30, 20]);
        index.delete(CenterId(30)).unwrap();
        assert_eq!(keys(&index), vec![20, 50]);
        assert_eq!(index.height(), 2);
        assert_valid(&index);
    }

    #[test]
    fn test_delete_root_with_single_child() {
        let mut index = build(&[50, 70]);
        index.delete(CenterId(50)).unwrap();
        assert_eq!(keys(&index), vec![70]);
        assert_valid(&index);
    }

    #[test]
    fn test_delete_two_children_promotes_successor() {
        // graph ids:  50→1, 30→2, 70→3, 60→4, 80→5, 65→6
        let mut index = build(&[50, 30, 70, 60, 80, 65]);
        let removal = index.delete(CenterId(50)).unwrap();
        assert_eq!(
            removal.promoted,
            Some(Promotion {
                graph_id: GraphId(1),
                center_id: CenterId(60),
                location: "loc-60".into(),
            })
        );
        let removed = removal.center;

        assert_eq!(removed.center_id, CenterId(50));
        assert_eq!(removed.graph_id, GraphId(1));
        assert_eq!(removed.location, "loc-50");
        assert_eq!(keys(&index), vec![30, 60, 65, 70, 80]);
        assert_valid(&index);

        // The root slot now carries 60's key and payload but keeps graph id 1.
        let root = index.node(index.root.unwrap());
        assert_eq!(root.center.center_id, CenterId(60));
        assert_eq!(root.center.graph_id, GraphId(1));
        assert_eq!(root.center.location, "loc-60");
        assert_eq!(root.center.stock("food"), Some(60.0));

        // 60's right child (65) moved up under 70.
        assert_eq!(index.find(CenterId(65)).map(|c| c.graph_id), Some(GraphId(6)));
    }

    #[test]
    fn test_delete_two_children_with_adjacent_successor() {
        let mut index = build(&[50, 30, 70, 80]);
        index.delete(CenterId(50)).unwrap();
        assert_eq!(keys(&index), vec![30, 70, 80]);
        assert_valid(&index);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut index = build(&[50, 30, 70]);
        assert!(index.delete(CenterId(99)).is_none());
        assert_eq!(index.len(), 3);
        assert_eq!(keys(&index), vec![30, 50, 70]);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut index = build(&[50, 30, 70]);
        index.delete(CenterId(30)).unwrap();
        index.insert(center(9, 10));
        assert_eq!(index.slots.len(), 3);
        assert_eq!(keys(&index), vec![10, 50, 70]);
        assert_valid(&index);
    }

    #[test]
    fn test_range_scan() {
        let index = build(&[50, 30, 70, 20, 40, 60, 80]);
        let ids = |v: Vec<&Center>| v.iter().map(|c| c.center_id.0).collect::<Vec<_>>();

        assert_eq!(ids(index.range(CenterId(30)..CenterId(60))), vec![30, 40, 50]);
        assert_eq!(ids(index.range(CenterId(30)..=CenterId(60))), vec![30, 40, 50, 60]);
        assert_eq!(ids(index.range(CenterId(65)..)), vec![70, 80]);
        assert_eq!(ids(index.range(..CenterId(25))), vec![20]);
        assert_eq!(ids(index.range(..)).len(), 7);
        assert!(index.range(CenterId(51)..CenterId(59)).is_empty());
    }

    #[test]
    fn test_under_provisioned() {
        let mut index = build(&[2, 1]);
        if let Some(c) = index.find_mut(CenterId(2)) {
            c.resources.insert("water".into(), 1.0);
            c.resources.insert("tents".into(), 1.0);
        }
        let thin: Vec<u32> = index.under_provisioned(3).iter().map(|c| c.center_id.0).collect();
        assert_eq!(thin, vec![1]);
    }

    #[test]
    fn test_entries_handles_reach_same_center() {
        let mut index = build(&[50, 30, 70]);
        let (handle, _) = index
            .entries()
            .find(|(_, c)| c.center_id == CenterId(70))
            .unwrap();
        index.get_mut(handle).unwrap().location = "moved".into();
        assert_eq!(index.find(CenterId(70)).unwrap().location, "moved");
    }

    proptest! {
        #[test]
        fn prop_insert_then_find(ids in prop::collection::vec(0u32..200, 0..60)) {
            let index = build(&ids);
            prop_assert_eq!(index.len(), ids.len());
            for &id in &ids {
                prop_assert_eq!(index.find(CenterId(id)).map(|c| c.center_id), Some(CenterId(id)));
            }
            let k = keys(&index);
            prop_assert!(k.windows(2).all(|w| w[0] <= w[1]));
            assert_valid(&index);
        }

        #[test]
        fn prop_delete_preserves_order(
            ids in prop::collection::vec(0u32..100, 1..50),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 1..30),
        ) {
            let mut index = build(&ids);
            let mut expected: Vec<u32> = ids.clone();
            expected.sort_unstable();

            for pick in picks {
                if expected.is_empty() {
                    break;
                }
                let victim = expected[pick.index(expected.len())];
                let before = index.len();
                let removed = index.delete(CenterId(victim));
                prop_assert_eq!(removed.map(|r| r.center.center_id), Some(CenterId(victim)));
                prop_assert_eq!(index.len(), before - 1);

                let pos = expected.iter().position(|&k| k == victim).unwrap();
                expected.remove(pos);
                prop_assert_eq!(keys(&index), expected.clone());
                assert_valid(&index);
            }
        }
    }
}
