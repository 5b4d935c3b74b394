//! Route type.

use serde::{Deserialize, Serialize};

use super::{NodeId, VehicleClass};

/// An ordered node sequence driven by one vehicle of a given class.
///
/// The sequence includes its endpoints (depot, transfer station, landfill).
/// A route is unpriced when created; it receives its travel cost when it is
/// priced against a problem, which happens automatically when it is added to
/// a [`Solution`](super::Solution). The sequence cannot change afterwards,
/// so a priced cost is never stale.
///
/// # Examples
///
/// ```
/// use u_vrpt::models::{Route, VehicleClass};
///
/// let route = Route::collection(vec![0, 1, 2, 0]);
/// assert_eq!(route.class(), VehicleClass::Collection);
/// assert_eq!(route.len(), 4);
/// assert_eq!(route.first(), Some(0));
/// assert!(route.cost().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    class: VehicleClass,
    nodes: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost: Option<f64>,
}

impl Route {
    /// Creates an unpriced route.
    pub fn new(class: VehicleClass, nodes: Vec<NodeId>) -> Self {
        Self {
            class,
            nodes,
            cost: None,
        }
    }

    /// Creates an unpriced collection route.
    pub fn collection(nodes: Vec<NodeId>) -> Self {
        Self::new(VehicleClass::Collection, nodes)
    }

    /// Creates an unpriced transport route.
    pub fn transport(nodes: Vec<NodeId>) -> Self {
        Self::new(VehicleClass::Transport, nodes)
    }

    /// Vehicle class of this route.
    pub fn class(&self) -> VehicleClass {
        self.class
    }

    /// Node identifiers in visiting order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of nodes, endpoints included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the route has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node, if any.
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Last node, if any.
    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Travel cost, once priced.
    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    /// Records the travel cost (used by the evaluator).
    pub(crate) fn set_cost(&mut self, cost: f64) {
        self.cost = Some(cost);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_empty() {
        let r = Route::transport(Vec::new());
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.class(), VehicleClass::Transport);
        assert!(r.first().is_none());
        assert!(r.last().is_none());
    }

    #[test]
    fn test_route_endpoints() {
        let r = Route::collection(vec![3, 1, 2, 4]);
        assert_eq!(r.first(), Some(3));
        assert_eq!(r.last(), Some(4));
        assert_eq!(r.nodes(), &[3, 1, 2, 4]);
    }

    #[test]
    fn test_route_set_cost() {
        let mut r = Route::collection(vec![0, 1, 0]);
        assert!(r.cost().is_none());
        r.set_cost(6.0);
        assert_eq!(r.cost(), Some(6.0));
    }
}
