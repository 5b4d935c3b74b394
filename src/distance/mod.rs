//! Travel-cost matrices.
//!
//! Provides a dense cost matrix indexed by node position.

mod matrix;

pub use matrix::DistanceMatrix;
