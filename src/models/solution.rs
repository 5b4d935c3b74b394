//! Solution container and violation types.

use std::cell::OnceCell;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{NodeId, NodeKind, ProblemInstance, Route, VehicleClass, VrptProblem};
use crate::error::VrptError;
use crate::evaluation::{
    evaluate_routes, ResolvedRoute, RouteEvaluator, SolutionEvaluation, SolutionStatistics,
};

/// A type of constraint violation in a route or solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Collected zone demand, or station stock hauled by a transport
    /// vehicle, exceeds the vehicle capacity.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Load that exceeded capacity (largest trip load when vehicles
        /// unload at facilities).
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// A collection zone is not visited by any collection route.
    ZoneUnserved {
        /// The zone.
        zone: NodeId,
    },
    /// A collection zone is visited more than once.
    ZoneServedMultipleTimes {
        /// The zone.
        zone: NodeId,
        /// Number of visits.
        visits: usize,
    },
    /// The first node's kind is not an allowed start for the route's class.
    InvalidStart {
        /// Route index.
        route_index: usize,
        /// First node.
        node: NodeId,
        /// Its kind.
        kind: NodeKind,
    },
    /// The last node's kind is not an allowed end for the route's class.
    InvalidEnd {
        /// Route index.
        route_index: usize,
        /// Last node.
        node: NodeId,
        /// Its kind.
        kind: NodeKind,
    },
    /// A transport route visits a collection zone.
    ZoneOnTransportRoute {
        /// Route index.
        route_index: usize,
        /// The zone.
        zone: NodeId,
    },
    /// More non-empty routes of a class than vehicles available.
    FleetSizeExceeded {
        /// Vehicle class.
        class: VehicleClass,
        /// Routes of that class.
        routes: usize,
        /// Vehicles available.
        max_vehicles: usize,
    },
    /// Route travel cost exceeds the class's maximum.
    MaxDistanceExceeded {
        /// Route index.
        route_index: usize,
        /// Actual travel cost.
        distance: f64,
        /// Maximum allowed.
        max_distance: f64,
    },
    /// Load delivered to a transfer station exceeds its throughput.
    StationThroughputExceeded {
        /// The station.
        station: NodeId,
        /// Load delivered by collection routes.
        load: f64,
        /// Declared throughput.
        throughput: f64,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationType::CapacityExceeded {
                route_index,
                load,
                capacity,
            } => write!(f, "route {route_index}: load {load} exceeds capacity {capacity}"),
            ViolationType::ZoneUnserved { zone } => write!(f, "zone {zone} is not served"),
            ViolationType::ZoneServedMultipleTimes { zone, visits } => {
                write!(f, "zone {zone} is served {visits} times")
            }
            ViolationType::InvalidStart {
                route_index,
                node,
                kind,
            } => write!(f, "route {route_index}: cannot start at {kind:?} node {node}"),
            ViolationType::InvalidEnd {
                route_index,
                node,
                kind,
            } => write!(f, "route {route_index}: cannot end at {kind:?} node {node}"),
            ViolationType::ZoneOnTransportRoute { route_index, zone } => {
                write!(f, "route {route_index}: transport vehicle visits zone {zone}")
            }
            ViolationType::FleetSizeExceeded {
                class,
                routes,
                max_vehicles,
            } => write!(
                f,
                "{routes} {class} routes exceed the fleet of {max_vehicles} vehicles"
            ),
            ViolationType::MaxDistanceExceeded {
                route_index,
                distance,
                max_distance,
            } => write!(
                f,
                "route {route_index}: distance {distance} exceeds maximum {max_distance}"
            ),
            ViolationType::StationThroughputExceeded {
                station,
                load,
                throughput,
            } => write!(
                f,
                "station {station}: delivered load {load} exceeds throughput {throughput}"
            ),
        }
    }
}

/// A candidate set of routes bound to one problem instance.
///
/// The solution borrows its problem for its whole lifetime and never copies
/// or mutates it. Routes are priced when added, so [`cost`](Self::cost) is
/// always current. Feasibility is evaluated lazily on the first query and
/// cached until the next [`add_route`](Self::add_route).
///
/// A solution is meant to be owned by a single search worker: the cached
/// evaluation makes it `Send` but not `Sync`.
///
/// # Examples
///
/// ```
/// use u_vrpt::models::{FleetSpec, Node, ProblemInstance, Route, Solution};
///
/// let problem = ProblemInstance::builder()
///     .node(Node::depot(0))
///     .node(Node::zone(1, 5.0))
///     .node(Node::zone(2, 7.0))
///     .distance(0, 1, 3.0)
///     .distance(1, 2, 2.0)
///     .distance(2, 0, 4.0)
///     .collection_fleet(FleetSpec::new(12.0))
///     .build()
///     .expect("well-formed instance");
///
/// let mut sol = Solution::new(&problem);
/// sol.add_route(Route::collection(vec![0, 1, 2, 0])).expect("known nodes");
/// assert_eq!(sol.route_count(), 1);
/// assert_eq!(sol.cost(), 9.0);
/// assert!(sol.is_valid());
/// ```
#[derive(Debug)]
pub struct Solution<'p, P: VrptProblem + ?Sized = ProblemInstance> {
    problem: &'p P,
    routes: Vec<Route>,
    // Nodes of each route, looked up when the route was added.
    resolved: Vec<ResolvedRoute<'p>>,
    total_cost: f64,
    evaluation: OnceCell<SolutionEvaluation>,
}

impl<'p, P: VrptProblem + ?Sized> Solution<'p, P> {
    /// Creates an empty solution bound to `problem`.
    pub fn new(problem: &'p P) -> Self {
        Self {
            problem,
            routes: Vec::new(),
            resolved: Vec::new(),
            total_cost: 0.0,
            evaluation: OnceCell::new(),
        }
    }

    /// Builds a solution from a complete route set.
    ///
    /// # Errors
    ///
    /// Returns the first structural error raised by [`add_route`](Self::add_route).
    pub fn from_routes(
        problem: &'p P,
        routes: impl IntoIterator<Item = Route>,
    ) -> Result<Self, VrptError> {
        let mut solution = Self::new(problem);
        for route in routes {
            solution.add_route(route)?;
        }
        Ok(solution)
    }

    /// Prices `route` and appends it.
    ///
    /// No feasibility check is performed here; a solution may hold
    /// infeasible intermediate states.
    ///
    /// # Errors
    ///
    /// Returns [`VrptError::UnknownNode`] if the route references a node the
    /// problem does not contain, or [`VrptError::MissingArc`] if the problem
    /// has no travel cost for one of its legs. The route is not appended in
    /// either case.
    pub fn add_route(&mut self, mut route: Route) -> Result<(), VrptError> {
        let route_index = self.routes.len();
        let resolved = RouteEvaluator::new(self.problem)
            .price_resolved(&mut route)
            .map_err(|err| {
                debug!("rejected route {}: {}", route_index, err);
                err.at_route(route_index)
            })?;

        self.routes.push(route);
        self.resolved.push(resolved);
        self.total_cost = self.routes.iter().filter_map(Route::cost).sum();
        self.evaluation = OnceCell::new();
        Ok(())
    }

    /// The problem this solution is bound to.
    pub fn problem(&self) -> &'p P {
        self.problem
    }

    /// Routes in insertion order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of routes added, including empty and infeasible ones.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Total travel cost over all routes.
    pub fn cost(&self) -> f64 {
        self.total_cost
    }

    /// Returns `true` if every feasibility rule holds.
    pub fn is_valid(&self) -> bool {
        self.evaluation().violations.is_empty()
    }

    /// All violated rules, in route order followed by solution-wide rules.
    pub fn violations(&self) -> &[Violation] {
        &self.evaluation().violations
    }

    /// Diagnostic summary of this solution.
    pub fn statistics(&self) -> SolutionStatistics {
        SolutionStatistics::new(&self.routes, self.total_cost, self.evaluation())
    }

    fn evaluation(&self) -> &SolutionEvaluation {
        self.evaluation
            .get_or_init(|| evaluate_routes(self.problem, &self.routes, &self.resolved))
    }
}

impl<P: VrptProblem + ?Sized> Clone for Solution<'_, P> {
    fn clone(&self) -> Self {
        Self {
            problem: self.problem,
            routes: self.routes.clone(),
            resolved: self.resolved.clone(),
            total_cost: self.total_cost,
            evaluation: self.evaluation.clone(),
        }
    }
}
