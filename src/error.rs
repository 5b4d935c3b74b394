//! Structural errors.
//!
//! These signal malformed input (a bug in the caller or in the instance
//! data), never an infeasible candidate. Feasibility problems are reported
//! as [`Violation`](crate::models::Violation)s instead.

use thiserror::Error;

use crate::models::{NodeId, VehicleClass};

/// An error raised when building an instance or pricing a route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VrptError {
    /// A route references a node the instance does not contain.
    #[error("node {node} does not exist in the problem instance{}", route_suffix(.route_index))]
    UnknownNode {
        /// Index the route would have had in the solution, if known.
        route_index: Option<usize>,
        /// The offending identifier.
        node: NodeId,
    },
    /// Two nodes share an identifier.
    #[error("node identifier {0} is declared more than once")]
    DuplicateNode(NodeId),
    /// A node has a negative or non-finite demand.
    #[error("node {node} has invalid demand {demand}")]
    InvalidDemand {
        /// The offending node.
        node: NodeId,
        /// The rejected value.
        demand: f64,
    },
    /// A travel cost is negative or non-finite.
    #[error("travel cost from {from} to {to} is invalid ({distance})")]
    InvalidDistance {
        /// Origin node.
        from: NodeId,
        /// Destination node.
        to: NodeId,
        /// The rejected value.
        distance: f64,
    },
    /// A fleet capacity is negative or non-finite.
    #[error("{class} fleet has invalid capacity {capacity}")]
    InvalidCapacity {
        /// The fleet class.
        class: VehicleClass,
        /// The rejected value.
        capacity: f64,
    },
    /// A per-route distance limit is negative or non-finite.
    #[error("{class} fleet has invalid maximum route distance {max_distance}")]
    InvalidRouteDistance {
        /// The fleet class.
        class: VehicleClass,
        /// The rejected value.
        max_distance: f64,
    },
    /// The policy's comparison tolerance is negative or non-finite.
    #[error("validation tolerance {0} must be finite and non-negative")]
    InvalidTolerance(f64),
    /// The problem knows both nodes but has no travel cost between them.
    #[error("no travel cost from node {from} to node {to}")]
    MissingArc {
        /// Origin node.
        from: NodeId,
        /// Destination node.
        to: NodeId,
    },
    /// A transfer-station throughput limit is negative or non-finite.
    #[error("node {node} has invalid throughput {throughput}")]
    InvalidThroughput {
        /// The offending node.
        node: NodeId,
        /// The rejected value.
        throughput: f64,
    },
    /// No distances were supplied and not every node has coordinates.
    #[error("travel costs are missing: supply a distance matrix or locate every node")]
    MissingDistances,
    /// The supplied distance matrix does not match the node count.
    #[error("distance matrix has {actual} entries, expected {expected}")]
    DistanceMatrixSize {
        /// `nodes * nodes`.
        expected: usize,
        /// Length of the supplied data.
        actual: usize,
    },
}

impl VrptError {
    /// Attaches the index of the offending route, where the error names one.
    pub(crate) fn at_route(self, idx: usize) -> Self {
        match self {
            VrptError::UnknownNode { node, .. } => VrptError::UnknownNode {
                route_index: Some(idx),
                node,
            },
            other => other,
        }
    }
}

fn route_suffix(route_index: &Option<usize>) -> String {
    match route_index {
        Some(idx) => format!(" (route {idx})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_node_message() {
        let err = VrptError::UnknownNode {
            route_index: Some(2),
            node: 99,
        };
        assert_eq!(
            err.to_string(),
            "node 99 does not exist in the problem instance (route 2)"
        );
        let err = VrptError::UnknownNode {
            route_index: None,
            node: 99,
        };
        assert_eq!(err.to_string(), "node 99 does not exist in the problem instance");
    }

    #[test]
    fn test_capacity_message() {
        let err = VrptError::InvalidCapacity {
            class: VehicleClass::Transport,
            capacity: -1.0,
        };
        assert_eq!(err.to_string(), "transport fleet has invalid capacity -1");
    }

    #[test]
    fn test_limit_messages() {
        let err = VrptError::InvalidRouteDistance {
            class: VehicleClass::Collection,
            max_distance: -5.0,
        };
        assert_eq!(
            err.to_string(),
            "collection fleet has invalid maximum route distance -5"
        );
        assert_eq!(
            VrptError::InvalidTolerance(-1.0).to_string(),
            "validation tolerance -1 must be finite and non-negative"
        );
    }

    #[test]
    fn test_at_route() {
        let err = VrptError::UnknownNode {
            route_index: None,
            node: 7,
        };
        assert_eq!(
            err.at_route(3),
            VrptError::UnknownNode {
                route_index: Some(3),
                node: 7,
            }
        );
        let err = VrptError::MissingArc { from: 1, to: 2 };
        assert_eq!(err.clone().at_route(3), err);
    }
}
