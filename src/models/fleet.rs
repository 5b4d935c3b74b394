//! Vehicle classes and per-class fleet parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fleet a route is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    /// Collection vehicles serve zones and deposit at facilities.
    Collection,
    /// Transport vehicles haul consolidated load from transfer stations.
    Transport,
}

impl VehicleClass {
    /// Both classes, in a fixed order.
    pub const ALL: [VehicleClass; 2] = [VehicleClass::Collection, VehicleClass::Transport];
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleClass::Collection => write!(f, "collection"),
            VehicleClass::Transport => write!(f, "transport"),
        }
    }
}

/// Capacity and limits shared by every vehicle of one class.
///
/// # Examples
///
/// ```
/// use u_vrpt::models::FleetSpec;
///
/// let fleet = FleetSpec::new(12.0).with_max_vehicles(3);
/// assert_eq!(fleet.capacity(), 12.0);
/// assert_eq!(fleet.max_vehicles(), Some(3));
/// assert!(fleet.max_route_distance().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSpec {
    capacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_vehicles: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_route_distance: Option<f64>,
}

impl FleetSpec {
    /// Creates a fleet with the given vehicle capacity and no count or
    /// distance limits.
    pub fn new(capacity: f64) -> Self {
        Self {
            capacity,
            max_vehicles: None,
            max_route_distance: None,
        }
    }

    /// Limits the number of routes of this class.
    pub fn with_max_vehicles(mut self, max: usize) -> Self {
        self.max_vehicles = Some(max);
        self
    }

    /// Limits the travel distance of each route of this class.
    pub fn with_max_route_distance(mut self, max: f64) -> Self {
        self.max_route_distance = Some(max);
        self
    }

    /// Load capacity of one vehicle.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Maximum number of vehicles (routes), if limited.
    pub fn max_vehicles(&self) -> Option<usize> {
        self.max_vehicles
    }

    /// Maximum distance per route, if limited.
    pub fn max_route_distance(&self) -> Option<f64> {
        self.max_route_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_new() {
        let f = FleetSpec::new(200.0);
        assert_eq!(f.capacity(), 200.0);
        assert!(f.max_vehicles().is_none());
        assert!(f.max_route_distance().is_none());
    }

    #[test]
    fn test_fleet_builder() {
        let f = FleetSpec::new(100.0)
            .with_max_vehicles(4)
            .with_max_route_distance(500.0);
        assert_eq!(f.max_vehicles(), Some(4));
        assert_eq!(f.max_route_distance(), Some(500.0));
    }

    #[test]
    fn test_vehicle_class_display() {
        assert_eq!(VehicleClass::Collection.to_string(), "collection");
        assert_eq!(VehicleClass::Transport.to_string(), "transport");
    }
}
