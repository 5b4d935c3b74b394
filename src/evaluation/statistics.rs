//! Human-readable solution summary for reporting and diagnostics.

use std::fmt;

use serde::Serialize;

use super::SolutionEvaluation;
use crate::models::{Route, VehicleClass, Violation};

/// Summary of one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStatistics {
    /// Vehicle class.
    pub class: VehicleClass,
    /// Number of nodes, endpoints included.
    pub nodes: usize,
    /// Travel cost.
    pub cost: f64,
    /// Load carried: zone demand, or station stock hauled by a transport route.
    pub load: f64,
}

/// Summary of a solution, as produced by
/// [`Solution::statistics`](crate::models::Solution::statistics).
///
/// The [`Display`](fmt::Display) form is a multi-line report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionStatistics {
    /// Number of routes.
    pub route_count: usize,
    /// Total travel cost.
    pub total_cost: f64,
    /// Demand of the distinct zones served.
    pub total_demand_served: f64,
    /// Per-route summaries, in route order.
    pub routes: Vec<RouteStatistics>,
    /// Whether every feasibility rule holds.
    pub valid: bool,
    /// Violated rules.
    pub violations: Vec<Violation>,
}

impl SolutionStatistics {
    pub(crate) fn new(routes: &[Route], total_cost: f64, eval: &SolutionEvaluation) -> Self {
        let per_route = routes
            .iter()
            .zip(&eval.reports)
            .map(|(route, report)| RouteStatistics {
                class: route.class(),
                nodes: route.len(),
                cost: report.cost,
                load: report.load,
            })
            .collect();

        Self {
            route_count: routes.len(),
            total_cost,
            total_demand_served: eval.demand_served,
            routes: per_route,
            valid: eval.is_feasible(),
            violations: eval.violations.clone(),
        }
    }

    /// Number of routes of a vehicle class.
    pub fn routes_of(&self, class: VehicleClass) -> usize {
        self.routes.iter().filter(|r| r.class == class).count()
    }
}

impl fmt::Display for SolutionStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Routes: {} ({} collection, {} transport)",
            self.route_count,
            self.routes_of(VehicleClass::Collection),
            self.routes_of(VehicleClass::Transport)
        )?;
        writeln!(f, "Total cost: {:.2}", self.total_cost)?;
        writeln!(f, "Demand served: {:.2}", self.total_demand_served)?;
        writeln!(f, "Valid: {}", self.valid)?;
        for (idx, r) in self.routes.iter().enumerate() {
            writeln!(
                f,
                "  route {idx} [{}]: {} nodes, cost {:.2}, load {:.2}",
                r.class, r.nodes, r.cost, r.load
            )?;
        }
        if !self.violations.is_empty() {
            writeln!(f, "Violations:")?;
            for v in &self.violations {
                writeln!(f, "  {v}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{FleetSpec, Node, ProblemInstance, Route, Solution, VehicleClass};

    fn problem() -> ProblemInstance {
        ProblemInstance::builder()
            .node(Node::depot(0))
            .node(Node::zone(1, 5.0))
            .node(Node::zone(2, 7.0))
            .node(Node::landfill(3))
            .distance(0, 1, 3.0)
            .distance(1, 2, 2.0)
            .distance(2, 0, 4.0)
            .distance(0, 3, 10.0)
            .distance(1, 3, 8.0)
            .distance(2, 3, 9.0)
            .collection_fleet(FleetSpec::new(10.0))
            .transport_fleet(FleetSpec::new(40.0))
            .build()
            .expect("valid instance")
    }

    #[test]
    fn test_statistics_fields() {
        let p = problem();
        let mut sol = Solution::new(&p);
        sol.add_route(Route::collection(vec![0, 1, 0]))
            .expect("known nodes");
        sol.add_route(Route::collection(vec![0, 2, 0]))
            .expect("known nodes");
        sol.add_route(Route::transport(vec![0, 3, 0]))
            .expect("known nodes");

        let stats = sol.statistics();
        assert_eq!(stats.route_count, 3);
        assert!((stats.total_cost - 34.0).abs() < 1e-10);
        assert!((stats.total_demand_served - 12.0).abs() < 1e-10);
        assert_eq!(
            stats.routes.iter().map(|r| r.nodes).collect::<Vec<_>>(),
            vec![3, 3, 3]
        );
        assert_eq!(stats.routes_of(VehicleClass::Collection), 2);
        assert_eq!(stats.routes_of(VehicleClass::Transport), 1);
        assert!(stats.valid);
        assert!(stats.violations.is_empty());
    }

    #[test]
    fn test_statistics_report() {
        let p = problem();
        let mut sol = Solution::new(&p);
        sol.add_route(Route::collection(vec![0, 1, 2, 0]))
            .expect("known nodes");

        let report = sol.statistics().to_string();
        assert!(report.starts_with("Routes: 1 (1 collection, 0 transport)\n"));
        assert!(report.contains("Total cost: 9.00"));
        assert!(report.contains("Demand served: 12.00"));
        assert!(report.contains("Valid: false"));
        assert!(report.contains("route 0 [collection]: 4 nodes, cost 9.00, load 12.00"));
        assert!(report.contains("route 0: load 12 exceeds capacity 10"));
    }

    #[test]
    fn test_statistics_serialize() {
        let p = problem();
        let sol = Solution::new(&p);
        let json = serde_json::to_value(sol.statistics()).expect("serializable");
        assert_eq!(json["route_count"], 0);
        assert_eq!(json["valid"], false);
        assert_eq!(json["violations"].as_array().map(|v| v.len()), Some(2));
    }
}
