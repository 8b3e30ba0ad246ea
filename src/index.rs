use crate::error::Result;
use crate::point::Point;

/// The nearest indexed point found for one query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Source index of the nearest point, `None` if it was synthesized.
    pub index: Option<usize>,
    pub distance: f64,
}

pub trait NearestNeighbor {
    fn nearest(&self, query: &Point) -> Result<Neighbor>;
    fn num_points(&self) -> usize;

    /// Resolves every query independently, preserving input order.
    fn query(&self, queries: &[Point]) -> Result<Vec<Neighbor>> {
        queries.iter().map(|query| self.nearest(query)).collect()
    }
}
