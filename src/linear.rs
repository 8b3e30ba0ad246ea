use crate::distance::euclidean;
use crate::error::{KdError, Result};
use crate::index::{NearestNeighbor, Neighbor};
use crate::point::{common_dimension, Point};

/// Exhaustive nearest neighbor search, the baseline the tree is checked against.
pub struct LinearIndex {
    dimension: Option<usize>,
    data: Vec<Point>,
}

impl LinearIndex {
    pub fn new(data: Vec<Point>) -> Result<Self> {
        let dimension = common_dimension(&data)?;
        Ok(Self { dimension, data })
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.data
    }
}

impl NearestNeighbor for LinearIndex {
    fn nearest(&self, query: &Point) -> Result<Neighbor> {
        let dimension = self.dimension.ok_or(KdError::EmptyIndex)?;
        if query.dimension() != dimension {
            return Err(KdError::DimensionMismatch {
                expected: dimension,
                found: query.dimension(),
            });
        }

        // Keep the first point attaining the minimum distance.
        let mut best = Neighbor {
            index: None,
            distance: f64::INFINITY,
        };
        for point in &self.data {
            let distance = euclidean(point.coords(), query.coords());
            if distance < best.distance {
                best = Neighbor {
                    index: point.source_index(),
                    distance,
                };
            }
        }
        Ok(best)
    }

    fn num_points(&self) -> usize {
        self.data.len()
    }
}
