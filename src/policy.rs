//! Validation policy: endpoint typing per vehicle class and load handling.
//!
//! A policy is attached to a [`ProblemInstance`](crate::models::ProblemInstance)
//! when it is built. It derives serde so callers can keep it next to their
//! instance data in any serde format.

use serde::{Deserialize, Serialize};

use crate::models::{NodeKind, VehicleClass};

/// Default tolerance when comparing summed loads against a limit.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Node kinds allowed as the first and last node of a route.
///
/// # Examples
///
/// ```
/// use u_vrpt::models::NodeKind;
/// use u_vrpt::policy::EndpointRule;
///
/// let rule = EndpointRule::new(&[NodeKind::Depot], &[NodeKind::Depot, NodeKind::Landfill]);
/// assert!(rule.allows_start(NodeKind::Depot));
/// assert!(!rule.allows_start(NodeKind::Landfill));
/// assert!(rule.allows_end(NodeKind::Landfill));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRule {
    starts: Vec<NodeKind>,
    ends: Vec<NodeKind>,
}

impl EndpointRule {
    /// Creates a rule from the allowed start and end kinds.
    pub fn new(starts: &[NodeKind], ends: &[NodeKind]) -> Self {
        Self {
            starts: starts.to_vec(),
            ends: ends.to_vec(),
        }
    }

    /// Collection routes anchor at a depot or transfer station.
    pub fn collection() -> Self {
        Self::new(
            &[NodeKind::Depot, NodeKind::TransferStation],
            &[NodeKind::Depot, NodeKind::TransferStation],
        )
    }

    /// Transport routes leave a depot or transfer station and finish at a
    /// landfill or depot.
    pub fn transport() -> Self {
        Self::new(
            &[NodeKind::Depot, NodeKind::TransferStation],
            &[NodeKind::Depot, NodeKind::Landfill],
        )
    }

    /// Returns `true` if a route may start at a node of this kind.
    pub fn allows_start(&self, kind: NodeKind) -> bool {
        self.starts.contains(&kind)
    }

    /// Returns `true` if a route may end at a node of this kind.
    pub fn allows_end(&self, kind: NodeKind) -> bool {
        self.ends.contains(&kind)
    }

    /// Allowed start kinds.
    pub fn starts(&self) -> &[NodeKind] {
        &self.starts
    }

    /// Allowed end kinds.
    pub fn ends(&self) -> &[NodeKind] {
        &self.ends
    }
}

/// Rules applied by the feasibility check on top of the instance data.
///
/// # Examples
///
/// ```
/// use u_vrpt::models::{NodeKind, VehicleClass};
/// use u_vrpt::policy::{EndpointRule, ValidationPolicy};
///
/// let policy = ValidationPolicy::default()
///     .with_unload_at_facilities(true)
///     .with_endpoint_rule(
///         VehicleClass::Collection,
///         EndpointRule::new(&[NodeKind::Depot], &[NodeKind::Depot]),
///     );
/// assert!(policy.unload_at_facilities());
/// assert!(!policy
///     .endpoint_rule(VehicleClass::Collection)
///     .allows_start(NodeKind::TransferStation));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    collection_endpoints: EndpointRule,
    transport_endpoints: EndpointRule,
    unload_at_facilities: bool,
    tolerance: f64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            collection_endpoints: EndpointRule::collection(),
            transport_endpoints: EndpointRule::transport(),
            unload_at_facilities: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ValidationPolicy {
    /// Replaces the endpoint rule of one vehicle class.
    pub fn with_endpoint_rule(mut self, class: VehicleClass, rule: EndpointRule) -> Self {
        match class {
            VehicleClass::Collection => self.collection_endpoints = rule,
            VehicleClass::Transport => self.transport_endpoints = rule,
        }
        self
    }

    /// Lets collection vehicles empty their load at facilities visited
    /// mid-route, so capacity is checked per trip instead of per route.
    pub fn with_unload_at_facilities(mut self, enabled: bool) -> Self {
        self.unload_at_facilities = enabled;
        self
    }

    /// Sets the tolerance used when comparing loads with limits.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Endpoint rule for a vehicle class.
    pub fn endpoint_rule(&self, class: VehicleClass) -> &EndpointRule {
        match class {
            VehicleClass::Collection => &self.collection_endpoints,
            VehicleClass::Transport => &self.transport_endpoints,
        }
    }

    /// Whether collection vehicles unload at intermediate facilities.
    pub fn unload_at_facilities(&self) -> bool {
        self.unload_at_facilities
    }

    /// Comparison tolerance for loads and distances.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
