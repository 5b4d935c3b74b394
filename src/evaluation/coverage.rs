//! Solution-wide checks: zone coverage, fleet size, station throughput and
//! transport pickups.

use std::collections::HashMap;

use log::debug;

use super::{ResolvedRoute, RouteEvaluator, RouteReport};
use crate::error::VrptError;
use crate::models::{NodeId, NodeKind, Route, VehicleClass, Violation, ViolationType, VrptProblem};

/// Result of a full feasibility pass over a route set.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionEvaluation {
    /// Per-route reports, in route order.
    pub reports: Vec<RouteReport>,
    /// Every violation found: route-local ones first, then solution-wide.
    pub violations: Vec<Violation>,
    /// Demand of the distinct zones served at least once.
    pub demand_served: f64,
}

impl SolutionEvaluation {
    /// Returns `true` if no rule is violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Runs every feasibility rule over `routes`.
///
/// # Errors
///
/// Returns [`VrptError::UnknownNode`] if a route references a node the
/// problem does not contain. No partial evaluation is returned.
///
/// # Examples
///
/// ```
/// use u_vrpt::models::{FleetSpec, Node, ProblemInstance, Route, ViolationType};
/// use u_vrpt::evaluation::check_routes;
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
/// let eval = check_routes(&problem, &[Route::collection(vec![0, 1, 0])])
///     .expect("known nodes");
/// assert!(!eval.is_feasible());
/// assert_eq!(eval.violations[0].kind, ViolationType::ZoneUnserved { zone: 2 });
/// ```
pub fn check_routes<P: VrptProblem + ?Sized>(
    problem: &P,
    routes: &[Route],
) -> Result<SolutionEvaluation, VrptError> {
    let evaluator = RouteEvaluator::new(problem);
    let mut reports = Vec::with_capacity(routes.len());
    for (idx, route) in routes.iter().enumerate() {
        let report = evaluator
            .check_route(idx, route)
            .map_err(|err| err.at_route(idx))?;
        reports.push(report);
    }
    Ok(summarize(problem, routes, reports))
}

/// Evaluates routes whose nodes were resolved when they were added to a
/// [`Solution`](crate::models::Solution). `resolved[i]` belongs to `routes[i]`.
pub(crate) fn evaluate_routes<P: VrptProblem + ?Sized>(
    problem: &P,
    routes: &[Route],
    resolved: &[ResolvedRoute<'_>],
) -> SolutionEvaluation {
    let evaluator = RouteEvaluator::new(problem);
    let reports = routes
        .iter()
        .zip(resolved)
        .enumerate()
        .map(|(idx, (route, stops))| evaluator.report(idx, route.class(), stops))
        .collect();
    summarize(problem, routes, reports)
}

fn summarize<P: VrptProblem + ?Sized>(
    problem: &P,
    routes: &[Route],
    mut reports: Vec<RouteReport>,
) -> SolutionEvaluation {
    let mut violations: Vec<Violation> = reports
        .iter()
        .flat_map(|r| r.violations.iter().cloned())
        .collect();

    let demand_served = check_coverage(problem, &reports, &mut violations);
    check_fleet_size(problem, routes, &mut violations);
    let stock = station_stock(&reports);
    check_throughput(problem, &stock, &mut violations);
    check_transport_loads(problem, &mut reports, &stock, &mut violations);

    debug!(
        "evaluated {} routes: {} violations, demand served {}",
        routes.len(),
        violations.len(),
        demand_served
    );

    SolutionEvaluation {
        reports,
        violations,
        demand_served,
    }
}

fn check_coverage<P: VrptProblem + ?Sized>(
    problem: &P,
    reports: &[RouteReport],
    violations: &mut Vec<Violation>,
) -> f64 {
    let mut visits: HashMap<NodeId, usize> = HashMap::new();
    for zone in reports.iter().flat_map(|r| r.zones.iter()) {
        *visits.entry(*zone).or_insert(0) += 1;
    }

    let mut served = 0.0;
    for node in problem
        .nodes()
        .iter()
        .filter(|n| n.kind() == NodeKind::CollectionZone)
    {
        match visits.get(&node.id()).copied().unwrap_or(0) {
            0 => violations.push(Violation::new(ViolationType::ZoneUnserved {
                zone: node.id(),
            })),
            1 => served += node.demand(),
            n => {
                served += node.demand();
                violations.push(Violation::new(ViolationType::ZoneServedMultipleTimes {
                    zone: node.id(),
                    visits: n,
                }));
            }
        }
    }
    served
}

fn check_fleet_size<P: VrptProblem + ?Sized>(
    problem: &P,
    routes: &[Route],
    violations: &mut Vec<Violation>,
) {
    for class in VehicleClass::ALL {
        let Some(max_vehicles) = problem.fleet(class).max_vehicles() else {
            continue;
        };
        let used = routes
            .iter()
            .filter(|r| r.class() == class && !r.is_empty())
            .count();
        if used > max_vehicles {
            violations.push(Violation::new(ViolationType::FleetSizeExceeded {
                class,
                routes: used,
                max_vehicles,
            }));
        }
    }
}

/// Load delivered to each facility by collection routes.
fn station_stock(reports: &[RouteReport]) -> HashMap<NodeId, f64> {
    let mut delivered: HashMap<NodeId, f64> = HashMap::new();
    for &(facility, load) in reports.iter().flat_map(|r| r.deliveries.iter()) {
        *delivered.entry(facility).or_insert(0.0) += load;
    }
    delivered
}

fn check_throughput<P: VrptProblem + ?Sized>(
    problem: &P,
    stock: &HashMap<NodeId, f64>,
    violations: &mut Vec<Violation>,
) {
    let tolerance = problem.policy().tolerance();
    // Declaration order keeps the report deterministic.
    for node in problem.nodes() {
        let Some(throughput) = node.throughput() else {
            continue;
        };
        let load = stock.get(&node.id()).copied().unwrap_or(0.0);
        if load > throughput + tolerance {
            violations.push(Violation::new(ViolationType::StationThroughputExceeded {
                station: node.id(),
                load,
                throughput,
            }));
        }
    }
}

/// Transport routes haul the stock of the stations they visit. A station's
/// stock is shared evenly among the transport routes that visit it.
fn check_transport_loads<P: VrptProblem + ?Sized>(
    problem: &P,
    reports: &mut [RouteReport],
    stock: &HashMap<NodeId, f64>,
    violations: &mut Vec<Violation>,
) {
    let mut haulers: HashMap<NodeId, usize> = HashMap::new();
    for &station in reports.iter().flat_map(|r| r.pickups.iter()) {
        *haulers.entry(station).or_insert(0) += 1;
    }

    let capacity = problem.capacity(VehicleClass::Transport);
    let tolerance = problem.policy().tolerance();
    for (route_index, report) in reports.iter_mut().enumerate() {
        if report.pickups.is_empty() {
            continue;
        }
        let load: f64 = report
            .pickups
            .iter()
            .map(|s| {
                let share = haulers.get(s).copied().unwrap_or(1) as f64;
                stock.get(s).copied().unwrap_or(0.0) / share
            })
            .sum();
        report.load = load;
        report.peak_load = load;
        if load > capacity + tolerance {
            let violation = Violation::new(ViolationType::CapacityExceeded {
                route_index,
                load,
                capacity,
            });
            report.violations.push(violation.clone());
            violations.push(violation);
        }
    }
}
