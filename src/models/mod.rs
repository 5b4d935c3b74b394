//! Domain model types for VRPT solutions.
//!
//! Provides the node and fleet types of an instance, the read-only problem
//! interface, routes as ordered node sequences per vehicle class, and the
//! solution container that prices and validates them.

mod fleet;
mod node;
mod problem;
mod route;
mod solution;

pub use fleet::{FleetSpec, VehicleClass};
pub use node::{Node, NodeId, NodeKind};
pub use problem::{ProblemBuilder, ProblemInstance, VrptProblem};
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};
