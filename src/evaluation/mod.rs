//! Costing and feasibility checking.
//!
//! - [`RouteEvaluator`] — travel cost and route-local rules (capacity,
//!   endpoints, zone service by class, maximum distance)
//! - [`check_routes`] — full pass adding coverage, fleet size,
//!   transfer-station throughput, and transport pickups
//! - [`SolutionStatistics`] — diagnostic summary

mod coverage;
mod evaluator;
mod statistics;

pub(crate) use coverage::evaluate_routes;
pub(crate) use evaluator::ResolvedRoute;
pub use coverage::{check_routes, SolutionEvaluation};
pub use evaluator::{RouteEvaluator, RouteReport};
pub use statistics::{RouteStatistics, SolutionStatistics};
