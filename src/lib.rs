//! # u-vrpt
//!
//! Solution core for waste-collection vehicle routing with transfer stations
//! (VRPT): collection vehicles serve zones and deposit at transfer stations,
//! transport vehicles haul consolidated load on to a landfill or depot.
//!
//! The crate defines what a candidate solution is, how it is costed, and how
//! it is judged feasible. Search algorithms, instance parsers, and
//! visualization live elsewhere and use it through [`models::Solution`].
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Node, FleetSpec, Route, Solution, VrptProblem trait)
//! - [`distance`] — Travel-cost matrix
//! - [`evaluation`] — Route costing, feasibility checking, and statistics
//! - [`policy`] — Endpoint rules and load handling applied by the checks
//! - [`error`] — Structural errors
//!
//! ## Example
//!
//! ```
//! use u_vrpt::models::{FleetSpec, Node, ProblemInstance, Route, Solution};
//!
//! let problem = ProblemInstance::builder()
//!     .node(Node::depot(0))
//!     .node(Node::zone(1, 5.0))
//!     .node(Node::zone(2, 7.0))
//!     .distance(0, 1, 3.0)
//!     .distance(1, 2, 2.0)
//!     .distance(2, 0, 4.0)
//!     .collection_fleet(FleetSpec::new(10.0))
//!     .build()
//!     .expect("well-formed instance");
//!
//! let mut solution = Solution::new(&problem);
//! solution
//!     .add_route(Route::collection(vec![0, 1, 2, 0]))
//!     .expect("known nodes");
//!
//! // 12 units of waste on a vehicle of capacity 10.
//! assert!(!solution.is_valid());
//! assert_eq!(solution.cost(), 9.0);
//! println!("{}", solution.statistics());
//! ```

pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod policy;

pub use error::VrptError;
