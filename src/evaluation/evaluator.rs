//! Route evaluator that computes travel cost, load, and per-route feasibility.

use log::trace;

use crate::error::VrptError;
use crate::models::{Node, NodeId, NodeKind, Route, VehicleClass, Violation, ViolationType, VrptProblem};

/// Per-route outcome of [`RouteEvaluator::check_route`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteReport {
    /// Travel cost of the route.
    pub cost: f64,
    /// Load carried: zone demand collected by a collection route, or the
    /// station stock picked up by a transport route. Pickups depend on the
    /// whole route set and are filled in by [`check_routes`](super::check_routes).
    pub load: f64,
    /// Largest load carried between two unloading points.
    pub peak_load: f64,
    /// Zones served, in visiting order (transport routes serve none).
    pub zones: Vec<NodeId>,
    /// Load handed over at facilities, as `(facility, load)` pairs.
    pub deliveries: Vec<(NodeId, f64)>,
    /// Transfer stations a transport route picks up from, without repeats.
    pub pickups: Vec<NodeId>,
    /// Violations local to this route.
    pub violations: Vec<Violation>,
}

/// A node sequence whose identifiers all exist in the problem, with its
/// travel cost.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedRoute<'a> {
    pub(crate) stops: Vec<&'a Node>,
    pub(crate) cost: f64,
}

/// Evaluates routes against a problem: travel cost, collected load, and the
/// route-local rules (capacity, endpoints, zone service by class, maximum
/// distance).
///
/// # Examples
///
/// ```
/// use u_vrpt::models::{FleetSpec, Node, ProblemInstance, Route};
/// use u_vrpt::evaluation::RouteEvaluator;
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
/// let evaluator = RouteEvaluator::new(&problem);
/// let report = evaluator
///     .check_route(0, &Route::collection(vec![0, 1, 2, 0]))
///     .expect("known nodes");
/// assert_eq!(report.cost, 9.0);
/// assert_eq!(report.load, 12.0);
/// assert!(report.violations.is_empty());
/// ```
pub struct RouteEvaluator<'a, P: VrptProblem + ?Sized> {
    problem: &'a P,
}

impl<'a, P: VrptProblem + ?Sized> RouteEvaluator<'a, P> {
    /// Creates a new evaluator for the given problem.
    pub fn new(problem: &'a P) -> Self {
        Self { problem }
    }

    /// Travel cost of visiting `nodes` in order.
    ///
    /// Zero for sequences with fewer than two nodes.
    ///
    /// # Errors
    ///
    /// Returns [`VrptError::UnknownNode`] for an identifier the problem
    /// does not contain, whatever its travel costs report, and
    /// [`VrptError::MissingArc`] if the problem has no cost for a leg.
    pub fn route_cost(&self, nodes: &[NodeId]) -> Result<f64, VrptError> {
        self.resolve(nodes).map(|r| r.cost)
    }

    /// Computes and records the travel cost of `route`.
    ///
    /// # Errors
    ///
    /// Same as [`route_cost`](Self::route_cost); the route is left unpriced.
    pub fn price(&self, route: &mut Route) -> Result<f64, VrptError> {
        self.price_resolved(route).map(|r| r.cost)
    }

    pub(crate) fn price_resolved(&self, route: &mut Route) -> Result<ResolvedRoute<'a>, VrptError> {
        let resolved = self.resolve(route.nodes())?;
        trace!(
            "priced {} route with {} nodes: {}",
            route.class(),
            route.len(),
            resolved.cost
        );
        route.set_cost(resolved.cost);
        Ok(resolved)
    }

    /// Evaluates `route` as the route at `route_index` of a solution.
    ///
    /// Solution-wide rules (coverage, fleet size, station throughput,
    /// transport pickups) are not checked here.
    ///
    /// # Errors
    ///
    /// Same as [`route_cost`](Self::route_cost).
    pub fn check_route(&self, route_index: usize, route: &Route) -> Result<RouteReport, VrptError> {
        let resolved = self.resolve(route.nodes())?;
        Ok(self.report(route_index, route.class(), &resolved))
    }

    /// Applies the route-local rules to an already resolved route.
    pub(crate) fn report(
        &self,
        route_index: usize,
        class: VehicleClass,
        route: &ResolvedRoute<'_>,
    ) -> RouteReport {
        let policy = self.problem.policy();
        let tolerance = policy.tolerance();
        let unload = class == VehicleClass::Collection && policy.unload_at_facilities();
        let fleet = self.problem.fleet(class);

        let mut report = RouteReport {
            cost: route.cost,
            load: 0.0,
            peak_load: 0.0,
            zones: Vec::new(),
            deliveries: Vec::new(),
            pickups: Vec::new(),
            violations: Vec::new(),
        };
        let mut trip_load = 0.0;

        for (pos, node) in route.stops.iter().enumerate() {
            let id = node.id();
            match (class, node.kind()) {
                (VehicleClass::Transport, NodeKind::CollectionZone) => {
                    report.violations.push(Violation::new(
                        ViolationType::ZoneOnTransportRoute {
                            route_index,
                            zone: id,
                        },
                    ));
                }
                (VehicleClass::Transport, NodeKind::TransferStation) => {
                    if !report.pickups.contains(&id) {
                        report.pickups.push(id);
                    }
                }
                (_, NodeKind::CollectionZone) => {
                    trip_load += node.demand();
                    report.load += node.demand();
                    report.zones.push(id);
                }
                (_, kind) if unload && kind.is_facility() && pos > 0 => {
                    report.peak_load = report.peak_load.max(trip_load);
                    report.deliveries.push((id, trip_load));
                    trip_load = 0.0;
                }
                _ => {}
            }
        }
        report.peak_load = report.peak_load.max(trip_load);

        // Whatever is still on board is handed over where the route ends.
        if let Some(last) = route.stops.last().filter(|_| trip_load > 0.0) {
            if last.kind().is_facility() {
                report.deliveries.push((last.id(), trip_load));
            }
        }

        if report.peak_load > fleet.capacity() + tolerance {
            report.violations.push(Violation::new(ViolationType::CapacityExceeded {
                route_index,
                load: report.peak_load,
                capacity: fleet.capacity(),
            }));
        }

        if let (Some(first), Some(last)) = (route.stops.first(), route.stops.last()) {
            let rule = policy.endpoint_rule(class);
            if !rule.allows_start(first.kind()) {
                report.violations.push(Violation::new(ViolationType::InvalidStart {
                    route_index,
                    node: first.id(),
                    kind: first.kind(),
                }));
            }
            if !rule.allows_end(last.kind()) {
                report.violations.push(Violation::new(ViolationType::InvalidEnd {
                    route_index,
                    node: last.id(),
                    kind: last.kind(),
                }));
            }
        }

        if let Some(max_d) = fleet.max_route_distance() {
            if route.cost > max_d + tolerance {
                report.violations.push(Violation::new(ViolationType::MaxDistanceExceeded {
                    route_index,
                    distance: route.cost,
                    max_distance: max_d,
                }));
            }
        }

        report
    }

    /// Looks up every node, then sums the legs.
    fn resolve(&self, nodes: &[NodeId]) -> Result<ResolvedRoute<'a>, VrptError> {
        let stops = nodes
            .iter()
            .map(|&id| {
                self.problem.node(id).ok_or(VrptError::UnknownNode {
                    route_index: None,
                    node: id,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut cost = 0.0;
        for leg in nodes.windows(2) {
            cost += self
                .problem
                .distance(leg[0], leg[1])
                .ok_or(VrptError::MissingArc {
                    from: leg[0],
                    to: leg[1],
                })?;
        }
        Ok(ResolvedRoute { stops, cost })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FleetSpec, ProblemInstance};
    use crate::policy::ValidationPolicy;

    // Depot 0, zones 1-3, transfer station 4 (throughput 10), landfill 5.
    fn setup(policy: ValidationPolicy) -> ProblemInstance {
        ProblemInstance::builder()
            .node(Node::depot(0).with_location(0.0, 0.0))
            .node(Node::zone(1, 4.0).with_location(3.0, 4.0))
            .node(Node::zone(2, 6.0).with_location(6.0, 8.0))
            .node(Node::zone(3, 5.0).with_location(0.0, 10.0))
            .node(Node::transfer_station(4).with_throughput(10.0).with_location(6.0, 0.0))
            .node(Node::landfill(5).with_location(20.0, 0.0))
            .collection_fleet(FleetSpec::new(10.0))
            .transport_fleet(FleetSpec::new(30.0).with_max_route_distance(45.0))
            .policy(policy)
            .build()
            .expect("valid instance")
    }

    fn kinds(report: &RouteReport) -> Vec<&ViolationType> {
        report.violations.iter().map(|v| &v.kind).collect()
    }

    #[test]
    fn test_route_cost_empty_and_single() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        assert_eq!(eval.route_cost(&[]).expect("empty"), 0.0);
        assert_eq!(eval.route_cost(&[3]).expect("single"), 0.0);
    }

    #[test]
    fn test_route_cost_sums_legs() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        // 0->1 = 5, 1->2 = 5, 2->0 = 10
        let cost = eval.route_cost(&[0, 1, 2, 0]).expect("known nodes");
        assert!((cost - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_route_cost_unknown_node() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        let err = eval.route_cost(&[0, 99, 0]).unwrap_err();
        assert_eq!(
            err,
            VrptError::UnknownNode {
                route_index: None,
                node: 99
            }
        );
        let err = eval.route_cost(&[99]).unwrap_err();
        assert!(matches!(err, VrptError::UnknownNode { node: 99, .. }));
    }

    // Costs are defined for every pair of identifiers, known or not.
    struct LineProblem {
        nodes: Vec<Node>,
        fleet: FleetSpec,
        policy: ValidationPolicy,
        one_way: bool,
    }

    impl LineProblem {
        fn new(one_way: bool) -> Self {
            Self {
                nodes: vec![Node::depot(0), Node::zone(1, 5.0), Node::zone(2, 7.0)],
                fleet: FleetSpec::new(12.0),
                policy: ValidationPolicy::default(),
                one_way,
            }
        }
    }

    impl VrptProblem for LineProblem {
        fn nodes(&self) -> &[Node] {
            &self.nodes
        }

        fn node(&self, id: NodeId) -> Option<&Node> {
            self.nodes.iter().find(|n| n.id() == id)
        }

        fn distance(&self, from: NodeId, to: NodeId) -> Option<f64> {
            if self.one_way && to < from {
                return None;
            }
            Some((from as f64 - to as f64).abs())
        }

        fn fleet(&self, _class: VehicleClass) -> &FleetSpec {
            &self.fleet
        }

        fn policy(&self) -> &ValidationPolicy {
            &self.policy
        }
    }

    #[test]
    fn test_unknown_node_with_total_distance() {
        let p = LineProblem::new(false);
        let eval = RouteEvaluator::new(&p);
        assert_eq!(eval.route_cost(&[0, 1, 2, 0]).expect("known nodes"), 4.0);

        let mut route = Route::collection(vec![0, 99, 0]);
        assert_eq!(
            eval.price(&mut route).unwrap_err(),
            VrptError::UnknownNode {
                route_index: None,
                node: 99
            }
        );
        assert_eq!(route.cost(), None);
        assert!(eval.check_route(0, &route).is_err());
    }

    #[test]
    fn test_route_cost_missing_arc() {
        let p = LineProblem::new(true);
        let eval = RouteEvaluator::new(&p);
        assert_eq!(eval.route_cost(&[0, 1, 2]).expect("forward legs"), 2.0);
        assert_eq!(
            eval.route_cost(&[0, 2, 0]).unwrap_err(),
            VrptError::MissingArc { from: 2, to: 0 }
        );
    }

    #[test]
    fn test_transport_pickups() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        let report = eval
            .check_route(0, &Route::transport(vec![4, 5, 4, 0]))
            .expect("known nodes");
        assert_eq!(report.pickups, vec![4]);
        // The stock a transport route hauls is known only for a whole route set.
        assert_eq!(report.load, 0.0);

        let report = eval
            .check_route(0, &Route::collection(vec![0, 1, 4]))
            .expect("known nodes");
        assert!(report.pickups.is_empty());
    }

    #[test]
    fn test_price_sets_cost() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        let mut route = Route::collection(vec![0, 1, 0]);
        let cost = eval.price(&mut route).expect("known nodes");
        assert!((cost - 10.0).abs() < 1e-10);
        assert_eq!(route.cost(), Some(cost));
    }

    #[test]
    fn test_capacity_boundary() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        // 4 + 6 = 10 == capacity
        let report = eval
            .check_route(0, &Route::collection(vec![0, 1, 2, 0]))
            .expect("known nodes");
        assert!(report.violations.is_empty());
        assert_eq!(report.zones, vec![1, 2]);

        // 4 + 6 + 5 = 15 > 10
        let report = eval
            .check_route(3, &Route::collection(vec![0, 1, 2, 3, 0]))
            .expect("known nodes");
        assert_eq!(
            kinds(&report),
            vec![&ViolationType::CapacityExceeded {
                route_index: 3,
                load: 15.0,
                capacity: 10.0,
            }]
        );
    }

    #[test]
    fn test_invalid_endpoints() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        let report = eval
            .check_route(1, &Route::collection(vec![1, 2, 5]))
            .expect("known nodes");
        assert_eq!(
            kinds(&report),
            vec![
                &ViolationType::InvalidStart {
                    route_index: 1,
                    node: 1,
                    kind: NodeKind::CollectionZone,
                },
                &ViolationType::InvalidEnd {
                    route_index: 1,
                    node: 5,
                    kind: NodeKind::Landfill,
                },
            ]
        );
    }

    #[test]
    fn test_single_node_route_endpoints() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        let report = eval
            .check_route(0, &Route::collection(vec![0]))
            .expect("known node");
        assert!(report.violations.is_empty());
        assert_eq!(report.cost, 0.0);

        let report = eval
            .check_route(0, &Route::collection(vec![2]))
            .expect("known node");
        assert_eq!(report.violations.len(), 2);
    }

    #[test]
    fn test_empty_route_has_no_violations() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        let report = eval
            .check_route(0, &Route::transport(Vec::new()))
            .expect("empty route");
        assert!(report.violations.is_empty());
        assert_eq!(report.cost, 0.0);
    }

    #[test]
    fn test_transport_route() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        // 4 -> 5 = 14, 5 -> 0 = 20
        let report = eval
            .check_route(0, &Route::transport(vec![4, 5, 0]))
            .expect("known nodes");
        assert!(report.violations.is_empty());
        assert_eq!(report.load, 0.0);
        assert!(report.zones.is_empty());
    }

    #[test]
    fn test_transport_route_rejects_zone_and_bad_end() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        let report = eval
            .check_route(2, &Route::transport(vec![0, 1, 4]))
            .expect("known nodes");
        assert_eq!(
            kinds(&report),
            vec![
                &ViolationType::ZoneOnTransportRoute {
                    route_index: 2,
                    zone: 1,
                },
                &ViolationType::InvalidEnd {
                    route_index: 2,
                    node: 4,
                    kind: NodeKind::TransferStation,
                },
            ]
        );
        assert!(report.zones.is_empty());
    }

    #[test]
    fn test_max_route_distance() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        // 0 -> 4 = 6, 4 -> 5 = 14, 5 -> 0 = 20; total 40 <= 45
        let report = eval
            .check_route(0, &Route::transport(vec![0, 4, 5, 0]))
            .expect("known nodes");
        assert!(report.violations.is_empty());

        // 0 -> 4 -> 5 -> 4 -> 5 -> 0 = 6 + 14 + 14 + 14 + 20 = 68 > 45
        let report = eval
            .check_route(0, &Route::transport(vec![0, 4, 5, 4, 5, 0]))
            .expect("known nodes");
        assert!(matches!(
            report.violations[0].kind,
            ViolationType::MaxDistanceExceeded { .. }
        ));
    }

    #[test]
    fn test_delivery_at_route_end() {
        let p = setup(ValidationPolicy::default());
        let eval = RouteEvaluator::new(&p);
        let report = eval
            .check_route(0, &Route::collection(vec![0, 1, 4]))
            .expect("known nodes");
        assert_eq!(report.deliveries, vec![(4, 4.0)]);

        let report = eval
            .check_route(0, &Route::collection(vec![0, 1, 0]))
            .expect("known nodes");
        assert!(report.deliveries.is_empty());
    }

    #[test]
    fn test_unload_at_facilities() {
        let strict = setup(ValidationPolicy::default());
        let relaxed = setup(ValidationPolicy::default().with_unload_at_facilities(true));
        let route = Route::collection(vec![0, 1, 2, 4, 3, 4]);

        // 15 units in one trip is over capacity without unloading.
        let report = RouteEvaluator::new(&strict)
            .check_route(0, &route)
            .expect("known nodes");
        assert_eq!(report.peak_load, 15.0);
        assert_eq!(report.violations.len(), 1);

        // Unloading at station 4 splits it into trips of 10 and 5.
        let report = RouteEvaluator::new(&relaxed)
            .check_route(0, &route)
            .expect("known nodes");
        assert!(report.violations.is_empty());
        assert_eq!(report.load, 15.0);
        assert_eq!(report.peak_load, 10.0);
        assert_eq!(report.deliveries, vec![(4, 10.0), (4, 5.0)]);
    }
}
