//! Node and node kind types.

use serde::{Deserialize, Serialize};

/// Identifier of a node within a problem instance.
///
/// Identifiers are unique per instance but need not be dense or zero-based.
pub type NodeId = usize;

/// The role a node plays in the waste-collection network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Vehicle base where routes usually start and end.
    Depot,
    /// A waste-generation zone that must be served exactly once.
    CollectionZone,
    /// Intermediate facility where collected waste is consolidated.
    TransferStation,
    /// Final disposal site.
    Landfill,
}

impl NodeKind {
    /// Returns `true` for transfer stations and landfills, the places where
    /// a vehicle can empty its load.
    pub fn is_facility(&self) -> bool {
        matches!(self, NodeKind::TransferStation | NodeKind::Landfill)
    }
}

/// A node (depot, zone, or facility) in a VRPT instance.
///
/// # Examples
///
/// ```
/// use u_vrpt::models::{Node, NodeKind};
///
/// let depot = Node::depot(0);
/// assert_eq!(depot.kind(), NodeKind::Depot);
/// assert_eq!(depot.demand(), 0.0);
///
/// let zone = Node::zone(1, 5.0).with_location(3.0, 4.0);
/// assert_eq!(zone.kind(), NodeKind::CollectionZone);
/// assert_eq!(zone.demand(), 5.0);
/// assert_eq!(zone.location(), Some((3.0, 4.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    #[serde(default)]
    demand: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    throughput: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<(f64, f64)>,
}

impl Node {
    /// Creates a node of the given kind with the given demand.
    pub fn new(id: NodeId, kind: NodeKind, demand: f64) -> Self {
        Self {
            id,
            kind,
            demand,
            throughput: None,
            location: None,
        }
    }

    /// Creates a depot (demand 0).
    pub fn depot(id: NodeId) -> Self {
        Self::new(id, NodeKind::Depot, 0.0)
    }

    /// Creates a collection zone with the given waste demand.
    pub fn zone(id: NodeId, demand: f64) -> Self {
        Self::new(id, NodeKind::CollectionZone, demand)
    }

    /// Creates a transfer station without a throughput limit.
    pub fn transfer_station(id: NodeId) -> Self {
        Self::new(id, NodeKind::TransferStation, 0.0)
    }

    /// Creates a landfill (demand 0).
    pub fn landfill(id: NodeId) -> Self {
        Self::new(id, NodeKind::Landfill, 0.0)
    }

    /// Sets the maximum load this node accepts from collection routes.
    ///
    /// Only meaningful for transfer stations.
    pub fn with_throughput(mut self, throughput: f64) -> Self {
        self.throughput = Some(throughput);
        self
    }

    /// Sets planar coordinates, used when distances are derived from locations.
    pub fn with_location(mut self, x: f64, y: f64) -> Self {
        self.location = Some((x, y));
        self
    }

    /// Node identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Waste quantity to collect at this node.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Throughput limit, if declared.
    pub fn throughput(&self) -> Option<f64> {
        self.throughput
    }

    /// Coordinates, if known.
    pub fn location(&self) -> Option<(f64, f64)> {
        self.location
    }

    /// Euclidean distance to another node, if both have coordinates.
    pub fn distance_to(&self, other: &Node) -> Option<f64> {
        let (x1, y1) = self.location?;
        let (x2, y2) = other.location?;
        let dx = x1 - x2;
        let dy = y1 - y2;
        Some((dx * dx + dy * dy).sqrt())
    }
}
