//! The relief network facade.

use super::config::ReliefConfig;
use crate::centers::{Center, CenterId, CenterIndex, ResourceMap};
use crate::dispatching::{DispatchEngine, DispatchOutcome};
use crate::error::ReliefError;
use crate::graph::{Entity, EntityKind, GraphId, LocationGraph};
use crate::requests::{Priority, RequestQueue, Victim, VictimId};
use std::ops::RangeBounds;

/// In-memory relief network: graph, center index and request queue.
///
/// Every mutation takes `&mut self`, so concurrent callers must share the
/// network behind a lock; a dispatch then runs its eligibility check and
/// debit under that one lock.
///
/// # Examples
///
/// ```
/// use u_relief::centers::{CenterId, ResourceMap};
/// use u_relief::requests::{Priority, VictimId};
/// use u_relief::relief::ReliefNetwork;
///
/// let stock = |pairs: &[(&str, f64)]| -> ResourceMap {
///     pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
/// };
///
/// let mut network = ReliefNetwork::new();
/// let depot = network
///     .try_register_center(CenterId(1), "Depot", stock(&[("food", 10.0), ("water", 10.0), ("medicine", 10.0)]), &[])
///     .unwrap();
/// network
///     .try_register_victim(VictimId(1), "Camp", Priority::CRITICAL, stock(&[("food", 5.0)]), &[(depot, 12.0)])
///     .unwrap();
///
/// let dispatch = network.dispatch_top_priority().into_result().unwrap();
/// assert_eq!(dispatch.center_id, CenterId(1));
/// assert_eq!(network.find_center(CenterId(1)).unwrap().stock("food"), Some(5.0));
/// ```
#[derive(Debug, Default)]
pub struct ReliefNetwork {
    config: ReliefConfig,
    graph: LocationGraph,
    centers: CenterIndex,
    requests: RequestQueue,
    engine: DispatchEngine,
}

impl ReliefNetwork {
    /// Creates an empty network with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ReliefConfig::default())
    }

    /// Creates an empty network with the given configuration.
    pub fn with_config(config: ReliefConfig) -> Self {
        Self {
            graph: LocationGraph::with_config(config.graph.clone()),
            engine: DispatchEngine::with_config(config.dispatch.clone()),
            centers: CenterIndex::new(),
            requests: RequestQueue::new(),
            config,
        }
    }

    pub fn config(&self) -> &ReliefConfig {
        &self.config
    }

    pub fn graph(&self) -> &LocationGraph {
        &self.graph
    }

    pub fn centers(&self) -> &CenterIndex {
        &self.centers
    }

    pub fn requests(&self) -> &RequestQueue {
        &self.requests
    }

    // ---- Registration ----

    /// Indexes a center and adds it to the graph, without validation.
    pub fn register_center(
        &mut self,
        center_id: CenterId,
        location: impl Into<String>,
        resources: ResourceMap,
    ) -> GraphId {
        let center = self.new_center(center_id, location.into(), resources);
        let graph_id = center.graph_id;
        self.graph.insert_entity(center_entity(&center));
        self.centers.insert(center);
        graph_id
    }

    /// Like [`register_center`](Self::register_center), also connecting the
    /// center to `edges`. Nothing is indexed if an edge is refused.
    pub fn register_center_with_edges(
        &mut self,
        center_id: CenterId,
        location: impl Into<String>,
        resources: ResourceMap,
        edges: &[(GraphId, f64)],
    ) -> Result<GraphId, ReliefError> {
        let center = self.new_center(center_id, location.into(), resources);
        let graph_id = center.graph_id;
        self.graph.register_node(center_entity(&center), edges)?;
        self.centers.insert(center);
        Ok(graph_id)
    }

    /// Validates and registers a center.
    ///
    /// Refuses centers with fewer than `min_categories` categories or with
    /// a negative or non-finite quantity.
    pub fn try_register_center(
        &mut self,
        center_id: CenterId,
        location: impl Into<String>,
        resources: ResourceMap,
        edges: &[(GraphId, f64)],
    ) -> Result<GraphId, ReliefError> {
        if resources.len() < self.config.min_categories {
            return Err(ReliefError::TooFewCategories {
                required: self.config.min_categories,
                found: resources.len(),
            });
        }
        check_quantities(&resources)?;
        self.register_center_with_edges(center_id, location, resources, edges)
    }

    fn new_center(&self, center_id: CenterId, location: String, resources: ResourceMap) -> Center {
        Center::new(self.graph.allocate_id(), center_id, location, resources)
    }

    /// Queues a victim request and adds the victim to the graph, without
    /// validation.
    pub fn register_victim(
        &mut self,
        victim_id: VictimId,
        location: impl Into<String>,
        priority: Priority,
        request: ResourceMap,
    ) -> GraphId {
        let victim = self.new_victim(victim_id, location.into(), priority, request);
        let graph_id = victim.graph_id;
        self.graph.insert_entity(victim_entity(&victim));
        self.requests.enqueue(victim);
        graph_id
    }

    /// Like [`register_victim`](Self::register_victim), also connecting the
    /// victim to `edges`. Nothing is queued if an edge is refused.
    pub fn register_victim_with_edges(
        &mut self,
        victim_id: VictimId,
        location: impl Into<String>,
        priority: Priority,
        request: ResourceMap,
        edges: &[(GraphId, f64)],
    ) -> Result<GraphId, ReliefError> {
        let victim = self.new_victim(victim_id, location.into(), priority, request);
        let graph_id = victim.graph_id;
        self.graph.register_node(victim_entity(&victim), edges)?;
        self.requests.enqueue(victim);
        Ok(graph_id)
    }

    /// Validates and registers a victim request.
    ///
    /// Refuses negative or non-finite requested quantities.
    pub fn try_register_victim(
        &mut self,
        victim_id: VictimId,
        location: impl Into<String>,
        priority: Priority,
        request: ResourceMap,
        edges: &[(GraphId, f64)],
    ) -> Result<GraphId, ReliefError> {
        check_quantities(&request)?;
        self.register_victim_with_edges(victim_id, location, priority, request, edges)
    }

    fn new_victim(
        &self,
        victim_id: VictimId,
        location: String,
        priority: Priority,
        request: ResourceMap,
    ) -> Victim {
        Victim::new(self.graph.allocate_id(), victim_id, location, priority, request)
    }

    /// Adds an undirected edge of the given distance.
    pub fn connect(&mut self, from: GraphId, to: GraphId, distance: f64) -> Result<(), ReliefError> {
        self.graph.connect(from, to, distance)
    }

    // ---- Dispatch ----

    /// Serves the highest-priority pending request from the nearest center
    /// that covers all of it.
    pub fn dispatch_top_priority(&mut self) -> DispatchOutcome {
        self.engine
            .dispatch_top_priority(&mut self.requests, &mut self.centers, &self.graph)
    }

    // ---- Centers ----

    pub fn find_center(&self, center_id: CenterId) -> Option<&Center> {
        self.centers.find(center_id)
    }

    /// Removes a center from the index. Returns `false` if there was none.
    ///
    /// The center's graph node and edges stay in place. When the in-order
    /// successor is promoted into the deleted center's slot, the graph
    /// entity for that slot is renamed and relocated to match it.
    pub fn delete_center(&mut self, center_id: CenterId) -> bool {
        let Some(removal) = self.centers.delete(center_id) else {
            return false;
        };
        tracing::debug!(
            center_id = %removal.center.center_id,
            location = %removal.center.location,
            "relief center removed"
        );
        if let Some(promotion) = removal.promoted {
            // The recycled graph node now stands for the promoted center.
            let name = format!("Center-{}", promotion.center_id);
            self.graph
                .update_entity(promotion.graph_id, name, promotion.location);
        }
        true
    }

    /// Sets the stock of one category, adding the category if missing.
    pub fn replenish(
        &mut self,
        center_id: CenterId,
        category: impl Into<String>,
        quantity: f64,
    ) -> Result<(), ReliefError> {
        let category = category.into();
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(ReliefError::InvalidQuantity { category, quantity });
        }
        let center = self
            .centers
            .find_mut(center_id)
            .ok_or(ReliefError::CenterNotFound(center_id))?;
        tracing::debug!(center_id = %center_id, category = %category, quantity, "replenished");
        center.resources.insert(category, quantity);
        Ok(())
    }

    /// Centers in ascending ID order.
    pub fn list_centers_in_order(&self) -> Vec<&Center> {
        self.centers.inorder()
    }

    /// Centers whose ID falls in `range`, in ascending order.
    pub fn centers_in_range<R: RangeBounds<CenterId>>(&self, range: R) -> Vec<&Center> {
        self.centers.range(range)
    }

    /// Centers holding at least `min_categories` categories, in ID order.
    pub fn qualified_centers(&self) -> Vec<&Center> {
        let min = self.config.min_categories;
        self.centers
            .iter()
            .filter(|c| !c.is_under_provisioned(min))
            .collect()
    }

    /// Centers that have fallen below `min_categories` categories, in ID
    /// order. They stay dispatch targets until deleted or topped up.
    pub fn under_provisioned_centers(&self) -> Vec<&Center> {
        self.centers.under_provisioned(self.config.min_categories)
    }

    // ---- Requests and graph ----

    /// Pending requests in service order.
    pub fn list_pending_requests(&self) -> Vec<&Victim> {
        self.requests.iter().collect()
    }

    /// The request the next dispatch will serve.
    pub fn peek_next_request(&self) -> Option<&Victim> {
        self.requests.peek()
    }

    /// Breadth-first visitation order from a graph node.
    pub fn traverse_from(&self, start: GraphId) -> Result<Vec<&Entity>, ReliefError> {
        self.graph.breadth_first_order(start)
    }

    /// Resolves a graph node to its registered identity.
    pub fn entity(&self, graph_id: GraphId) -> Option<&Entity> {
        self.graph.entity(graph_id)
    }
}

fn center_entity(center: &Center) -> Entity {
    Entity::new(center.graph_id, center.name(), center.location.clone(), EntityKind::Center)
}

fn victim_entity(victim: &Victim) -> Entity {
    Entity::new(victim.graph_id, victim.name(), victim.location.clone(), EntityKind::Victim)
}

fn check_quantities(resources: &ResourceMap) -> Result<(), ReliefError> {
    match resources
        .iter()
        .find(|&(_, &qty)| !qty.is_finite() || qty < 0.0)
    {
        Some((category, &quantity)) => Err(ReliefError::InvalidQuantity {
            category: category.clone(),
            quantity,
        }),
        None => Ok(()),
    }
}
