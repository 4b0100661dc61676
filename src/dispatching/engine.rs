//! Nearest-eligible-center dispatch engine.

use super::config::DispatchConfig;
use super::types::{Dispatch, DispatchOutcome};
use crate::centers::{Center, CenterId, CenterIndex, NodeHandle};
use crate::graph::LocationGraph;
use crate::requests::{RequestQueue, Victim};
use rayon::prelude::*;

/// The center chosen to serve a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Slot of the center in the index scanned to produce this candidate.
    pub handle: NodeHandle,
    pub center_id: CenterId,
    pub distance: f64,
}

/// Engine that serves the head of a [`RequestQueue`] from a [`CenterIndex`].
///
/// # Examples
///
/// ```
/// use u_relief::centers::{Center, CenterId, CenterIndex, ResourceMap};
/// use u_relief::dispatching::{DispatchEngine, DispatchOutcome};
/// use u_relief::graph::{Entity, EntityKind, LocationGraph};
/// use u_relief::requests::{Priority, RequestQueue, Victim, VictimId};
///
/// let mut graph = LocationGraph::new();
/// let mut index = CenterIndex::new();
/// let mut queue = RequestQueue::new();
///
/// let c = graph.allocate_id();
/// graph.register_node(Entity::new(c, "Center-1", "Depot", EntityKind::Center), &[]).unwrap();
/// let stock: ResourceMap = [("food".to_string(), 10.0)].into_iter().collect();
/// index.insert(Center::new(c, CenterId(1), "Depot", stock));
///
/// let v = graph.allocate_id();
/// graph.register_node(Entity::new(v, "Victim-7", "Camp", EntityKind::Victim), &[(c, 4.0)]).unwrap();
/// let want: ResourceMap = [("food".to_string(), 6.0)].into_iter().collect();
/// queue.enqueue(Victim::new(v, VictimId(7), "Camp", Priority::CRITICAL, want));
///
/// let outcome = DispatchEngine::new().dispatch_top_priority(&mut queue, &mut index, &graph);
/// let dispatch = outcome.dispatch().unwrap();
/// assert_eq!(dispatch.center_id, CenterId(1));
/// assert_eq!(dispatch.remaining["food"], 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DispatchEngine {
    config: DispatchConfig,
}

impl DispatchEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given configuration.
    pub fn with_config(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Serves the highest-priority pending request.
    ///
    /// The head request is consumed whether or not a center is found.
    pub fn dispatch_top_priority(
        &self,
        queue: &mut RequestQueue,
        index: &mut CenterIndex,
        graph: &LocationGraph,
    ) -> DispatchOutcome {
        let Some(victim) = queue.dequeue() else {
            tracing::debug!("dispatch: no pending requests");
            return DispatchOutcome::NoPendingRequests;
        };

        let Some(candidate) = self.nearest_eligible(&victim, index, graph) else {
            tracing::warn!(
                victim_id = %victim.victim_id,
                priority = %victim.priority,
                "dispatch: no center can satisfy the request, dropping it"
            );
            return DispatchOutcome::NoEligibleCenter {
                victim_id: victim.victim_id,
            };
        };

        let center = index
            .get_mut(candidate.handle)
            .expect("candidate handle comes from a scan of this index");
        center.debit(&victim.request);

        tracing::info!(
            center_id = %center.center_id,
            victim_id = %victim.victim_id,
            distance = candidate.distance,
            "dispatched"
        );

        DispatchOutcome::Dispatched(Dispatch {
            center_id: center.center_id,
            center_graph_id: center.graph_id,
            victim_id: victim.victim_id,
            victim_graph_id: victim.graph_id,
            distance: candidate.distance,
            debited: victim.request,
            remaining: center.resources.clone(),
        })
    }

    /// Finds the closest center that covers the whole request.
    ///
    /// Centers are visited in ascending ID order. A later center only wins
    /// if it is closer by more than `epsilon`, so ties go to the lowest ID.
    /// Centers with no route to the victim are skipped.
    pub fn nearest_eligible(
        &self,
        victim: &Victim,
        index: &CenterIndex,
        graph: &LocationGraph,
    ) -> Option<Candidate> {
        let eligible: Vec<(NodeHandle, &Center)> = index
            .entries()
            .filter(|(_, center)| center.can_satisfy(&victim.request))
            .collect();

        let distance_to = |center: &Center| graph.shortest_distance(center.graph_id, victim.graph_id);
        let distances: Vec<f64> = if self.config.parallel {
            eligible.par_iter().map(|&(_, c)| distance_to(c)).collect()
        } else {
            eligible.iter().map(|&(_, c)| distance_to(c)).collect()
        };

        let unreachable = distances.iter().filter(|d| d.is_infinite()).count();
        if unreachable > 0 {
            tracing::warn!(
                victim_id = %victim.victim_id,
                eligible = eligible.len(),
                unreachable,
                "dispatch: eligible centers without a route to the victim"
            );
        }

        let best = select_nearest(&distances, self.config.epsilon)?;
        let (handle, center) = eligible[best];
        Some(Candidate {
            handle,
            center_id: center.center_id,
            distance: distances[best],
        })
    }
}

/// Index of the smallest finite distance; earlier entries win ties within
/// `epsilon` (clamped to be non-negative).
fn select_nearest(distances: &[f64], epsilon: f64) -> Option<usize> {
    // f64::max ignores NaN, so NaN also becomes 0.
    let epsilon = epsilon.max(0.0);
    let mut best: Option<usize> = None;
    for (i, &d) in distances.iter().enumerate() {
        if !d.is_finite() {
            continue;
        }
        match best {
            Some(b) if d >= distances[b] - epsilon => {}
            _ => best = Some(i),
        }
    }
    best
}
