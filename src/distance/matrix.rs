//! Dense travel-cost matrix.

use crate::models::Node;

/// A dense n×n travel-cost matrix stored in row-major order.
///
/// Rows and columns are dense node indices (declaration order in the
/// instance), not node identifiers. Each off-diagonal entry is either a known
/// cost or still missing; the diagonal is always 0. Costs may be asymmetric.
///
/// # Examples
///
/// ```
/// use u_vrpt::models::Node;
/// use u_vrpt::distance::DistanceMatrix;
///
/// let nodes = vec![
///     Node::depot(0).with_location(0.0, 0.0),
///     Node::zone(1, 10.0).with_location(3.0, 4.0),
///     Node::zone(2, 20.0).with_location(6.0, 8.0),
/// ];
/// let dm = DistanceMatrix::euclidean(&nodes).expect("all nodes located");
/// assert_eq!(dm.cost(0, 1), Some(5.0));
/// assert!(dm.is_complete());
///
/// let mut sparse = DistanceMatrix::new(2);
/// assert_eq!(sparse.cost(0, 1), None);
/// sparse.set_cost(0, 1, 4.0);
/// sparse.set_cost(1, 0, 6.0);
/// assert!(sparse.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    costs: Vec<Option<f64>>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix with every off-diagonal cost missing.
    pub fn new(size: usize) -> Self {
        let mut costs = vec![None; size * size];
        for i in 0..size {
            costs[i * size + i] = Some(0.0);
        }
        Self { costs, size }
    }

    /// Straight-line costs between node coordinates.
    ///
    /// Returns `None` if any node has no location.
    pub fn euclidean(nodes: &[Node]) -> Option<Self> {
        let n = nodes.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = nodes[i].distance_to(&nodes[j])?;
                dm.set_cost(i, j, d);
                dm.set_cost(j, i, d);
            }
        }
        Some(dm)
    }

    /// Creates a complete matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self {
            costs: data.into_iter().map(Some).collect(),
            size,
        })
    }

    /// Cost of travelling from index `from` to index `to`, if known.
    ///
    /// Out-of-range indices yield `None`.
    pub fn cost(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.costs[from * self.size + to]
    }

    /// Records the cost of travelling from index `from` to index `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn set_cost(&mut self, from: usize, to: usize, cost: f64) {
        assert!(from < self.size && to < self.size, "index out of bounds");
        self.costs[from * self.size + to] = Some(cost);
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` once every ordered pair has a cost.
    pub fn is_complete(&self) -> bool {
        self.costs.iter().all(Option::is_some)
    }

    /// First known cost, in row-major order, that is negative or not finite.
    pub fn first_invalid(&self) -> Option<(usize, usize, f64)> {
        self.costs.iter().enumerate().find_map(|(k, c)| match *c {
            Some(d) if !d.is_finite() || d < 0.0 => Some((k / self.size, k % self.size, d)),
            _ => None,
        })
    }
}
