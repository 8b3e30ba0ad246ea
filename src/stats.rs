use conv::ValueFrom;

use crate::error::{KdError, Result};
use crate::point::Point;

/// Per-dimension distribution parameters of a point set.
#[derive(Clone, Debug)]
pub struct DistributionStats {
    pub min: Point,
    pub max: Point,
    pub range: Point,
    pub mean: Point,
    /// Population variance.
    pub variance: Point,
}

impl DistributionStats {
    pub fn compute(points: &[Point]) -> Result<DistributionStats> {
        let first = points.first().ok_or(KdError::EmptyInput)?;
        let dimension = first.dimension();

        // Calculate min, max and sum of each dimension
        let mut min = first.coords().to_vec();
        let mut max = first.coords().to_vec();
        let mut sum = vec![0.0; dimension];
        for point in points {
            first.check_dimension(point)?;
            for (i, &x) in point.coords().iter().enumerate() {
                min[i] = min[i].min(x);
                max[i] = max[i].max(x);
                sum[i] += x;
            }
        }

        let count = f64::value_from(points.len())
            .map_err(|_| KdError::TooManyPoints(points.len()))?;
        let count = Point::splat(dimension, count);

        let min = Point::unindexed(min);
        let max = Point::unindexed(max);
        let range = max.sub(&min)?;
        let mean = Point::unindexed(sum).div(&count)?;

        // Calculate the variance around the mean
        let mut squared_deviation = vec![0.0; dimension];
        for point in points {
            for (i, &x) in point.coords().iter().enumerate() {
                squared_deviation[i] += (x - mean[i]).powi(2);
            }
        }
        let variance = Point::unindexed(squared_deviation).div(&count)?;

        Ok(DistributionStats {
            min,
            max,
            range,
            mean,
            variance,
        })
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.mean.dimension()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::DistributionStats;
    use crate::error::KdError;
    use crate::point::Point;

    #[test]
    fn known_values() {
        let points = vec![
            Point::new(vec![0.0, 10.0], 0),
            Point::new(vec![2.0, 20.0], 1),
            Point::new(vec![4.0, 60.0], 2),
        ];
        let stats = DistributionStats::compute(&points).unwrap();

        assert_eq!(stats.min.coords(), &[0.0, 10.0]);
        assert_eq!(stats.max.coords(), &[4.0, 60.0]);
        assert_eq!(stats.range.coords(), &[4.0, 50.0]);
        assert_relative_eq!(stats.mean[0], 2.0);
        assert_relative_eq!(stats.mean[1], 30.0);
        assert_relative_eq!(stats.variance[0], 8.0 / 3.0);
        assert_relative_eq!(stats.variance[1], 1400.0 / 3.0);
    }

    #[test]
    fn single_point_has_zero_variance() {
        let stats = DistributionStats::compute(&[Point::new(vec![3.0, -1.0], 0)]).unwrap();
        assert_eq!(stats.mean.coords(), &[3.0, -1.0]);
        assert_eq!(stats.variance.coords(), &[0.0, 0.0]);
        assert_eq!(stats.range.coords(), &[0.0, 0.0]);
    }

    #[test]
    fn bounds_hold_on_random_data() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..20 {
            let n = rng.gen_range(1..200);
            let mut points = Vec::new();
            for i in 0..n {
                let coords = vec![
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(0.0..1.0),
                    rng.gen_range(-1e3..1e3),
                ];
                points.push(Point::new(coords, i));
            }
            let stats = DistributionStats::compute(&points).unwrap();
            for axis in 0..3 {
                assert!(stats.min[axis] <= stats.mean[axis] + 1e-9);
                assert!(stats.mean[axis] <= stats.max[axis] + 1e-9);
                assert!(stats.variance[axis] >= 0.0);
            }
        }
    }

    #[test]
    fn rejects_empty_and_mixed_input() {
        assert!(matches!(
            DistributionStats::compute(&[]),
            Err(KdError::EmptyInput)
        ));

        let mixed = vec![Point::new(vec![0.0, 0.0], 0), Point::new(vec![1.0], 1)];
        assert!(matches!(
            DistributionStats::compute(&mixed),
            Err(KdError::DimensionMismatch { .. })
        ));
    }
}
