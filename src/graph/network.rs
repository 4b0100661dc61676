//! Adjacency-list graph with early-exit Dijkstra and BFS.

use super::config::{GraphConfig, UnknownNeighbor};
use super::ids::IdGenerator;
use super::types::{Edge, Entity, GraphId};
use crate::error::ReliefError;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

/// Largest accepted edge distance.
///
/// Keeps path sums finite: at this cap a path needs more than 10^8 hops
/// before it overflows `f64`.
pub const MAX_EDGE_DISTANCE: f64 = 1e300;

/// Undirected weighted graph over registered entities.
///
/// Holds two maps: `graph_id → Entity` for resolving names and locations,
/// and `graph_id → [Edge]` for topology. A node may appear in the
/// adjacency map before its entity is registered (a placeholder created by
/// an edge that referenced it early).
///
/// Parallel edges between the same pair are kept; shortest-path search
/// considers all of them.
#[derive(Debug, Default)]
pub struct LocationGraph {
    config: GraphConfig,
    ids: IdGenerator,
    entities: HashMap<GraphId, Entity>,
    adjacency: HashMap<GraphId, Vec<Edge>>,
}

impl LocationGraph {
    /// Creates an empty graph with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with the given configuration.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Allocates a fresh graph ID for an entity about to be registered.
    pub fn allocate_id(&self) -> GraphId {
        self.ids.next_id()
    }

    /// Registers an entity and its initial edges.
    ///
    /// Each `(neighbor, distance)` pair is added in both directions. The
    /// node's own adjacency entry is created even when `edges` is empty.
    /// Nothing is modified if any edge is invalid.
    pub fn register_node(
        &mut self,
        entity: Entity,
        edges: &[(GraphId, f64)],
    ) -> Result<(), ReliefError> {
        let id = entity.graph_id;
        for &(neighbor, distance) in edges {
            self.check_edge(id, neighbor, distance, true)?;
        }

        self.insert_entity(entity);
        for &(neighbor, distance) in edges {
            self.push_edge(id, neighbor, distance);
        }
        Ok(())
    }

    /// Registers an entity with no edges, replacing any earlier identity
    /// under the same graph ID. Existing edges are kept.
    pub fn insert_entity(&mut self, entity: Entity) {
        let id = entity.graph_id;
        tracing::debug!(
            graph_id = %id,
            name = %entity.name,
            location = %entity.location,
            "registering node"
        );
        self.entities.insert(id, entity);
        self.adjacency.entry(id).or_default();
    }

    /// Replaces the display name and location of a registered entity.
    ///
    /// Returns `false` if no entity is registered under `id`.
    pub fn update_entity(
        &mut self,
        id: GraphId,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.name = name.into();
                entity.location = location.into();
                true
            }
            None => false,
        }
    }

    /// Adds an undirected edge between `from` and `to`.
    pub fn connect(&mut self, from: GraphId, to: GraphId, distance: f64) -> Result<(), ReliefError> {
        if self.config.unknown_neighbor == UnknownNeighbor::Reject
            && !self.adjacency.contains_key(&from)
        {
            return Err(ReliefError::InvalidEdge { from, to });
        }
        self.check_edge(from, to, distance, false)?;
        self.push_edge(from, to, distance);
        Ok(())
    }

    fn check_edge(
        &self,
        from: GraphId,
        to: GraphId,
        distance: f64,
        registering: bool,
    ) -> Result<(), ReliefError> {
        if !(0.0..=MAX_EDGE_DISTANCE).contains(&distance) {
            return Err(ReliefError::InvalidDistance { from, to, distance });
        }
        // A node being registered may list itself.
        let known = self.adjacency.contains_key(&to) || (registering && to == from);
        if !known && self.config.unknown_neighbor == UnknownNeighbor::Reject {
            return Err(ReliefError::InvalidEdge { from, to });
        }
        Ok(())
    }

    fn push_edge(&mut self, from: GraphId, to: GraphId, distance: f64) {
        if !self.adjacency.contains_key(&to) {
            tracing::debug!(graph_id = %to, "creating placeholder node");
        }
        self.adjacency
            .entry(from)
            .or_default()
            .push(Edge { to, distance });
        self.adjacency.entry(to).or_default().push(Edge {
            to: from,
            distance,
        });
        tracing::debug!(from = %from, to = %to, distance, "edge added");
    }

    /// Resolves a graph ID to its registered entity.
    pub fn entity(&self, id: GraphId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns `true` if the node has an adjacency entry (registered or
    /// placeholder).
    pub fn contains(&self, id: GraphId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Outgoing edges of a node, in insertion order. Empty for unknown nodes.
    pub fn neighbors(&self, id: GraphId) -> &[Edge] {
        self.adjacency.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of nodes with an adjacency entry, placeholders included.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of registered entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Shortest travel distance between two nodes.
    ///
    /// Dijkstra over non-negative weights with a binary-heap frontier. The
    /// search returns as soon as `target` is popped, without finishing the
    /// single-source computation. Frontier ties are broken by push order.
    ///
    /// Returns `f64::INFINITY` if either endpoint is unknown or no path exists.
    pub fn shortest_distance(&self, source: GraphId, target: GraphId) -> f64 {
        let search = self.search(source, target);
        tracing::trace!(
            source = %source,
            target = %target,
            distance = search.distance,
            settled = search.settled,
            "shortest distance"
        );
        search.distance
    }

    fn search(&self, source: GraphId, target: GraphId) -> Search {
        if !self.contains(source) || !self.contains(target) {
            return Search::UNREACHABLE;
        }

        let mut tentative: HashMap<GraphId, f64> = HashMap::new();
        let mut settled: HashSet<GraphId> = HashSet::new();
        let mut frontier = BinaryHeap::new();
        let mut seq = 0u64;

        tentative.insert(source, 0.0);
        frontier.push(Frontier {
            distance: 0.0,
            seq,
            node: source,
        });

        while let Some(Frontier { distance, node, .. }) = frontier.pop() {
            if !settled.insert(node) {
                continue; // stale entry
            }
            if node == target {
                return Search {
                    distance,
                    settled: settled.len(),
                };
            }

            for edge in self.neighbors(node) {
                if settled.contains(&edge.to) {
                    continue;
                }
                let candidate = distance + edge.distance;
                let improves = tentative
                    .get(&edge.to)
                    .map_or(true, |&current| candidate < current);
                if improves {
                    tentative.insert(edge.to, candidate);
                    seq += 1;
                    frontier.push(Frontier {
                        distance: candidate,
                        seq,
                        node: edge.to,
                    });
                }
            }
        }

        Search {
            distance: f64::INFINITY,
            settled: settled.len(),
        }
    }

    /// Breadth-first visitation order from `start`.
    ///
    /// Placeholder nodes are traversed but not reported, since they have
    /// no identity to display.
    pub fn breadth_first_order(&self, start: GraphId) -> Result<Vec<&Entity>, ReliefError> {
        if self.adjacency.is_empty() {
            return Err(ReliefError::EmptyNetwork);
        }
        if !self.contains(start) {
            return Err(ReliefError::NodeNotFound(start));
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut order = Vec::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if let Some(entity) = self.entities.get(&current) {
                order.push(entity);
            }
            for edge in self.neighbors(current) {
                if visited.insert(edge.to) {
                    queue.push_back(edge.to);
                }
            }
        }

        Ok(order)
    }
}

/// Outcome of one shortest-path search.
#[derive(Debug, Clone, Copy)]
struct Search {
    distance: f64,
    /// Nodes finalized before the search stopped.
    settled: usize,
}

impl Search {
    const UNREACHABLE: Search = Search {
        distance: f64::INFINITY,
        settled: 0,
    };
}

/// Heap entry ordered so that `BinaryHeap` pops the smallest distance first,
/// then the earliest push.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: f64,
    seq: u64,
    node: GraphId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EntityKind;
    use proptest::prelude::*;

    fn entity(id: u64) -> Entity {
        Entity::new(GraphId(id), format!("Node-{id}"), format!("Loc-{id}"), EntityKind::Center)
    }

    /// Registers nodes 1..=n without edges.
    fn graph_with_nodes(n: u64) -> LocationGraph {
        let mut g = LocationGraph::new();
        for id in 1..=n {
            g.register_node(entity(id), &[]).unwrap();
        }
        g
    }

    #[test]
    fn test_register_adds_reciprocal_edges() {
        let mut g = graph_with_nodes(1);
        g.register_node(entity(2), &[(GraphId(1), 4.0)]).unwrap();

        assert_eq!(g.neighbors(GraphId(1)), &[Edge { to: GraphId(2), distance: 4.0 }]);
        assert_eq!(g.neighbors(GraphId(2)), &[Edge { to: GraphId(1), distance: 4.0 }]);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_unknown_neighbor_becomes_placeholder() {
        let mut g = LocationGraph::new();
        g.register_node(entity(1), &[(GraphId(9), 2.0)]).unwrap();

        assert!(g.contains(GraphId(9)));
        assert!(g.entity(GraphId(9)).is_none());
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.entity_count(), 1);

        // Registering the placeholder later keeps the early edge.
        g.register_node(entity(9), &[]).unwrap();
        assert_eq!(g.entity(GraphId(9)).map(|e| e.name.as_str()), Some("Node-9"));
        assert!((g.shortest_distance(GraphId(1), GraphId(9)) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_reject_policy_refuses_unknown_neighbor() {
        let mut g = LocationGraph::with_config(
            GraphConfig::default().with_unknown_neighbor(UnknownNeighbor::Reject),
        );
        let err = g.register_node(entity(1), &[(GraphId(2), 1.0)]).unwrap_err();
        assert_eq!(
            err,
            ReliefError::InvalidEdge {
                from: GraphId(1),
                to: GraphId(2)
            }
        );
        // Nothing was registered.
        assert!(!g.contains(GraphId(1)));

        g.register_node(entity(1), &[]).unwrap();
        g.register_node(entity(2), &[(GraphId(1), 1.0)]).unwrap();
        assert!(g.connect(GraphId(1), GraphId(3), 1.0).is_err());
        assert!(g.connect(GraphId(3), GraphId(1), 1.0).is_err());
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_negative_distance_rejected() {
        let mut g = graph_with_nodes(2);
        let err = g.connect(GraphId(1), GraphId(2), -1.0).unwrap_err();
        assert!(matches!(err, ReliefError::InvalidDistance { .. }));
        assert!(g.connect(GraphId(1), GraphId(2), f64::NAN).is_err());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_oversized_distance_rejected() {
        let mut g = graph_with_nodes(3);
        let err = g.connect(GraphId(1), GraphId(2), 1e308).unwrap_err();
        assert!(matches!(err, ReliefError::InvalidDistance { .. }));
        assert!(g.connect(GraphId(1), GraphId(2), f64::INFINITY).is_err());

        // Two hops at the cap still sum to a finite distance.
        g.connect(GraphId(1), GraphId(2), MAX_EDGE_DISTANCE).unwrap();
        g.connect(GraphId(2), GraphId(3), MAX_EDGE_DISTANCE).unwrap();
        let d = g.shortest_distance(GraphId(1), GraphId(3));
        assert!(d.is_finite());
        assert!((d - 2e300).abs() <= 2e300 * 1e-12);
    }

    #[test]
    fn test_search_stops_at_target() {
        // 1 --1-- 2, and a 500-node chain hanging off 1 at distance 10+.
        let mut g = graph_with_nodes(2);
        g.connect(GraphId(1), GraphId(2), 1.0).unwrap();
        let mut prev = GraphId(1);
        for id in 3..=502 {
            g.register_node(entity(id), &[(prev, 10.0)]).unwrap();
            prev = GraphId(id);
        }

        let search = g.search(GraphId(1), GraphId(2));
        assert_eq!(search.distance, 1.0);
        assert_eq!(search.settled, 2);

        // The far end of the chain does need the whole chain.
        let far = g.search(GraphId(1), GraphId(502));
        assert_eq!(far.settled, 502);
    }

    #[test]
    fn test_update_entity() {
        let mut g = graph_with_nodes(1);
        assert!(g.update_entity(GraphId(1), "Center-9", "Ridge"));
        let e = g.entity(GraphId(1)).unwrap();
        assert_eq!((e.name.as_str(), e.location.as_str()), ("Center-9", "Ridge"));
        assert!(!g.update_entity(GraphId(7), "x", "y"));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let g = graph_with_nodes(3);
        assert_eq!(g.shortest_distance(GraphId(2), GraphId(2)), 0.0);
    }

    #[test]
    fn test_unknown_or_disconnected_is_infinite() {
        let mut g = graph_with_nodes(4);
        g.connect(GraphId(1), GraphId(2), 1.0).unwrap();
        g.connect(GraphId(3), GraphId(4), 1.0).unwrap();

        assert!(g.shortest_distance(GraphId(1), GraphId(3)).is_infinite());
        assert!(g.shortest_distance(GraphId(1), GraphId(99)).is_infinite());
        assert!(g.shortest_distance(GraphId(99), GraphId(1)).is_infinite());
    }

    #[test]
    fn test_prefers_cheaper_multi_hop_path() {
        // 1 --10-- 2, 1 --3-- 3 --3-- 2
        let mut g = graph_with_nodes(3);
        g.connect(GraphId(1), GraphId(2), 10.0).unwrap();
        g.connect(GraphId(1), GraphId(3), 3.0).unwrap();
        g.connect(GraphId(3), GraphId(2), 3.0).unwrap();

        assert!((g.shortest_distance(GraphId(1), GraphId(2)) - 6.0).abs() < 1e-10);
        assert!((g.shortest_distance(GraphId(2), GraphId(1)) - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_parallel_edges_use_shortest() {
        let mut g = graph_with_nodes(2);
        g.connect(GraphId(1), GraphId(2), 8.0).unwrap();
        g.connect(GraphId(1), GraphId(2), 2.5).unwrap();
        g.connect(GraphId(1), GraphId(2), 5.0).unwrap();

        assert_eq!(g.edge_count(), 3);
        assert!((g.shortest_distance(GraphId(1), GraphId(2)) - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_zero_weight_edges() {
        let mut g = graph_with_nodes(3);
        g.connect(GraphId(1), GraphId(2), 0.0).unwrap();
        g.connect(GraphId(2), GraphId(3), 0.0).unwrap();
        assert_eq!(g.shortest_distance(GraphId(1), GraphId(3)), 0.0);
    }

    #[test]
    fn test_bfs_order() {
        //     1
        //    / \
        //   2   3
        //   |
        //   4
        let mut g = graph_with_nodes(4);
        g.connect(GraphId(1), GraphId(2), 1.0).unwrap();
        g.connect(GraphId(1), GraphId(3), 1.0).unwrap();
        g.connect(GraphId(2), GraphId(4), 1.0).unwrap();

        let order: Vec<GraphId> = g
            .breadth_first_order(GraphId(1))
            .unwrap()
            .iter()
            .map(|e| e.graph_id)
            .collect();
        assert_eq!(order, vec![GraphId(1), GraphId(2), GraphId(3), GraphId(4)]);
    }

    #[test]
    fn test_bfs_skips_placeholders_but_walks_through_them() {
        let mut g = LocationGraph::new();
        g.register_node(entity(1), &[(GraphId(5), 1.0)]).unwrap();
        g.register_node(entity(2), &[]).unwrap();
        g.connect(GraphId(5), GraphId(2), 1.0).unwrap();

        let order: Vec<GraphId> = g
            .breadth_first_order(GraphId(1))
            .unwrap()
            .iter()
            .map(|e| e.graph_id)
            .collect();
        assert_eq!(order, vec![GraphId(1), GraphId(2)]);
    }

    #[test]
    fn test_bfs_errors() {
        let g = LocationGraph::new();
        assert_eq!(g.breadth_first_order(GraphId(1)).unwrap_err(), ReliefError::EmptyNetwork);

        let g = graph_with_nodes(1);
        assert_eq!(
            g.breadth_first_order(GraphId(7)).unwrap_err(),
            ReliefError::NodeNotFound(GraphId(7))
        );
    }

    /// All-pairs reference distances (Floyd-Warshall) over nodes 1..=n.
    fn reference_distances(n: usize, edges: &[(u64, u64, f64)]) -> Vec<Vec<f64>> {
        let mut d = vec![vec![f64::INFINITY; n + 1]; n + 1];
        for (i, row) in d.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        for &(a, b, w) in edges {
            let (a, b) = (a as usize, b as usize);
            d[a][b] = d[a][b].min(w);
            d[b][a] = d[b][a].min(w);
        }
        for k in 1..=n {
            for i in 1..=n {
                for j in 1..=n {
                    if d[i][k] + d[k][j] < d[i][j] {
                        d[i][j] = d[i][k] + d[k][j];
                    }
                }
            }
        }
        d
    }

    proptest! {
        #[test]
        fn prop_dijkstra_matches_reference(
            edges in prop::collection::vec((1u64..=8, 1u64..=8, 0u32..50), 0..24)
        ) {
            let edges: Vec<(u64, u64, f64)> =
                edges.into_iter().map(|(a, b, w)| (a, b, f64::from(w))).collect();
            let mut g = graph_with_nodes(8);
            for &(a, b, w) in &edges {
                g.connect(GraphId(a), GraphId(b), w).unwrap();
            }
            let reference = reference_distances(8, &edges);

            for a in 1..=8u64 {
                for b in 1..=8u64 {
                    let got = g.shortest_distance(GraphId(a), GraphId(b));
                    let want = reference[a as usize][b as usize];
                    if want.is_infinite() {
                        prop_assert!(got.is_infinite());
                    } else {
                        prop_assert!((got - want).abs() < 1e-9);
                    }
                }
            }
        }

        #[test]
        fn prop_distance_is_symmetric(
            edges in prop::collection::vec((1u64..=6, 1u64..=6, 0u32..100), 0..15)
        ) {
            let mut g = graph_with_nodes(6);
            for (a, b, w) in edges {
                g.connect(GraphId(a), GraphId(b), f64::from(w)).unwrap();
            }
            for a in 1..=6u64 {
                for b in 1..=6u64 {
                    let ab = g.shortest_distance(GraphId(a), GraphId(b));
                    let ba = g.shortest_distance(GraphId(b), GraphId(a));
                    prop_assert!(ab == ba || (ab - ba).abs() < 1e-9);
                }
            }
        }
    }
}
