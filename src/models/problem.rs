//! VRPT problem trait and the concrete instance type.

use std::collections::HashMap;

use log::debug;

use super::{FleetSpec, Node, NodeId, NodeKind, VehicleClass};
use crate::distance::DistanceMatrix;
use crate::error::VrptError;
use crate::policy::ValidationPolicy;

/// Read-only view of a VRPT instance, as consumed by the solution core.
///
/// A [`Solution`](super::Solution) only ever borrows its problem, so one
/// instance can back many candidate solutions, including solutions owned by
/// different threads.
///
/// # Examples
///
/// ```
/// use u_vrpt::models::{FleetSpec, Node, NodeKind, ProblemInstance, VehicleClass, VrptProblem};
///
/// let problem = ProblemInstance::builder()
///     .node(Node::depot(0))
///     .node(Node::zone(1, 5.0))
///     .distance(0, 1, 3.0)
///     .collection_fleet(FleetSpec::new(10.0))
///     .build()
///     .expect("well-formed instance");
///
/// assert_eq!(problem.node(1).map(|n| n.kind()), Some(NodeKind::CollectionZone));
/// assert_eq!(problem.distance(1, 0), Some(3.0));
/// assert_eq!(problem.distance(0, 7), None);
/// assert_eq!(problem.capacity(VehicleClass::Collection), 10.0);
/// assert_eq!(problem.num_collection_zones(), 1);
/// ```
pub trait VrptProblem: Send + Sync {
    /// All nodes, in declaration order.
    fn nodes(&self) -> &[Node];

    /// Looks up a node by identifier.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Travel cost between two nodes, or `None` if either is unknown.
    fn distance(&self, from: NodeId, to: NodeId) -> Option<f64>;

    /// Fleet parameters of a vehicle class.
    fn fleet(&self, class: VehicleClass) -> &FleetSpec;

    /// Rules the feasibility check applies to this instance.
    fn policy(&self) -> &ValidationPolicy;

    /// Vehicle capacity of a class.
    fn capacity(&self, class: VehicleClass) -> f64 {
        self.fleet(class).capacity()
    }

    /// Number of collection zones that must be covered.
    fn num_collection_zones(&self) -> usize {
        self.nodes()
            .iter()
            .filter(|n| n.kind() == NodeKind::CollectionZone)
            .count()
    }
}

/// An immutable VRPT instance built with [`ProblemBuilder`].
///
/// All demands, capacities, throughputs, route distance limits, travel costs
/// and the policy tolerance are checked to be finite and non-negative at
/// build time.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    name: String,
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    distances: DistanceMatrix,
    collection: FleetSpec,
    transport: FleetSpec,
    policy: ValidationPolicy,
    num_zones: usize,
}

impl ProblemInstance {
    /// Starts building an instance.
    pub fn builder() -> ProblemBuilder {
        ProblemBuilder::default()
    }

    /// Instance name (may be empty).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dense matrix position of a node identifier.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// The underlying travel-cost matrix, indexed by [`index_of`](Self::index_of).
    pub fn distance_matrix(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Identifiers of all collection zones, in declaration order.
    pub fn collection_zones(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.kind() == NodeKind::CollectionZone)
            .map(|n| n.id())
    }

    /// Total demand over all collection zones.
    pub fn total_demand(&self) -> f64 {
        self.nodes
            .iter()
            .filter(|n| n.kind() == NodeKind::CollectionZone)
            .map(|n| n.demand())
            .sum()
    }
}

impl VrptProblem for ProblemInstance {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    fn distance(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        self.distances.cost(i, j)
    }

    fn fleet(&self, class: VehicleClass) -> &FleetSpec {
        match class {
            VehicleClass::Collection => &self.collection,
            VehicleClass::Transport => &self.transport,
        }
    }

    fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    fn num_collection_zones(&self) -> usize {
        self.num_zones
    }
}

/// Builder for [`ProblemInstance`].
///
/// Travel costs come from, in order of precedence: an explicit
/// [`distance_matrix`](Self::distance_matrix); explicit pairwise
/// [`distance`](Self::distance)/[`arc`](Self::arc) entries, which must cover
/// every ordered pair of distinct nodes unless every node has a location, in
/// which case they override the Euclidean defaults.
///
/// Both fleets default to capacity 0 with no limits.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    name: String,
    nodes: Vec<Node>,
    arcs: Vec<(NodeId, NodeId, f64)>,
    matrix: Option<DistanceMatrix>,
    collection: FleetSpec,
    transport: FleetSpec,
    policy: ValidationPolicy,
}

impl Default for ProblemBuilder {
    fn default() -> Self {
        Self {
            name: String::new(),
            nodes: Vec::new(),
            arcs: Vec::new(),
            matrix: None,
            collection: FleetSpec::new(0.0),
            transport: FleetSpec::new(0.0),
            policy: ValidationPolicy::default(),
        }
    }
}

impl ProblemBuilder {
    /// Sets the instance name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a node.
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds several nodes.
    pub fn nodes(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Sets a symmetric travel cost between two nodes.
    pub fn distance(self, a: NodeId, b: NodeId, cost: f64) -> Self {
        self.arc(a, b, cost).arc(b, a, cost)
    }

    /// Sets a one-way travel cost.
    pub fn arc(mut self, from: NodeId, to: NodeId, cost: f64) -> Self {
        self.arcs.push((from, to, cost));
        self
    }

    /// Supplies the whole matrix, indexed by node declaration order.
    pub fn distance_matrix(mut self, matrix: DistanceMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Sets the collection fleet.
    pub fn collection_fleet(mut self, fleet: FleetSpec) -> Self {
        self.collection = fleet;
        self
    }

    /// Sets the transport fleet.
    pub fn transport_fleet(mut self, fleet: FleetSpec) -> Self {
        self.transport = fleet;
        self
    }

    /// Sets the validation policy.
    pub fn policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Checks the data and builds the instance.
    ///
    /// # Errors
    ///
    /// Returns [`VrptError`] on duplicate identifiers, invalid numeric data
    /// (demands, throughputs, capacities, route distance limits, the policy
    /// tolerance, travel costs), arcs referencing unknown nodes, or missing
    /// travel costs.
    pub fn build(self) -> Result<ProblemInstance, VrptError> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if index.insert(node.id(), i).is_some() {
                return Err(VrptError::DuplicateNode(node.id()));
            }
            if !node.demand().is_finite() || node.demand() < 0.0 {
                return Err(VrptError::InvalidDemand {
                    node: node.id(),
                    demand: node.demand(),
                });
            }
            if let Some(t) = node.throughput() {
                if !t.is_finite() || t < 0.0 {
                    return Err(VrptError::InvalidThroughput {
                        node: node.id(),
                        throughput: t,
                    });
                }
            }
        }

        for (class, fleet) in [
            (VehicleClass::Collection, &self.collection),
            (VehicleClass::Transport, &self.transport),
        ] {
            if !fleet.capacity().is_finite() || fleet.capacity() < 0.0 {
                return Err(VrptError::InvalidCapacity {
                    class,
                    capacity: fleet.capacity(),
                });
            }
            if let Some(max_distance) = fleet.max_route_distance() {
                if !max_distance.is_finite() || max_distance < 0.0 {
                    return Err(VrptError::InvalidRouteDistance {
                        class,
                        max_distance,
                    });
                }
            }
        }

        // A NaN tolerance would make every limit comparison pass.
        let tolerance = self.policy.tolerance();
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(VrptError::InvalidTolerance(tolerance));
        }

        let n = self.nodes.len();
        let distances = match self.matrix {
            Some(matrix) => {
                if matrix.size() != n {
                    return Err(VrptError::DistanceMatrixSize {
                        expected: n * n,
                        actual: matrix.size() * matrix.size(),
                    });
                }
                matrix
            }
            None => resolve_arcs(&self.nodes, &index, &self.arcs)?,
        };
        if !distances.is_complete() {
            return Err(VrptError::MissingDistances);
        }
        if let Some((i, j, d)) = distances.first_invalid() {
            return Err(VrptError::InvalidDistance {
                from: self.nodes[i].id(),
                to: self.nodes[j].id(),
                distance: d,
            });
        }

        let num_zones = self
            .nodes
            .iter()
            .filter(|n| n.kind() == NodeKind::CollectionZone)
            .count();

        debug!(
            "built instance '{}': {} nodes, {} collection zones",
            self.name, n, num_zones
        );

        Ok(ProblemInstance {
            name: self.name,
            nodes: self.nodes,
            index,
            distances,
            collection: self.collection,
            transport: self.transport,
            policy: self.policy,
            num_zones,
        })
    }
}

fn resolve_arcs(
    nodes: &[Node],
    index: &HashMap<NodeId, usize>,
    arcs: &[(NodeId, NodeId, f64)],
) -> Result<DistanceMatrix, VrptError> {
    let mut matrix =
        DistanceMatrix::euclidean(nodes).unwrap_or_else(|| DistanceMatrix::new(nodes.len()));
    for &(from, to, cost) in arcs {
        let i = *index.get(&from).ok_or(VrptError::UnknownNode {
            route_index: None,
            node: from,
        })?;
        let j = *index.get(&to).ok_or(VrptError::UnknownNode {
            route_index: None,
            node: to,
        })?;
        matrix.set_cost(i, j, cost);
    }
    Ok(matrix)
}
