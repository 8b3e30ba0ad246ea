use crate::error::{KdError, Result};
use crate::point::Point;

/// Number of histogram buckets spanning the one-sigma window.
pub const HISTOGRAM_BINS: usize = 128;

/// Approximates the median of `points` along `axis` with the binapprox method.
///
/// The histogram covers `[mean - sigma, mean + sigma]`; samples outside that
/// window are clamped into the boundary buckets. The estimate is the center of
/// the bucket holding the median, so the error is at most one bucket width.
pub fn approx_median(points: &[Point], axis: usize, mean: f64, variance: f64) -> Result<f64> {
    let first = points.first().ok_or(KdError::EmptyInput)?;
    if axis >= first.dimension() {
        return Err(KdError::InvalidAxis {
            axis,
            dimension: first.dimension(),
        });
    }

    // Too few samples for histogram statistics
    let sample_count = points.len();
    if sample_count <= 2 {
        return Ok(first[axis]);
    }

    let std_deviation = variance.sqrt();
    let lower_limit = mean - std_deviation;
    let bin_size = (2.0 * std_deviation) / HISTOGRAM_BINS as f64;
    if bin_size <= 0.0 || !bin_size.is_finite() {
        // Every sample sits on the mean.
        return Ok(mean);
    }

    // Build the histogram of the axis coordinates
    let last_bin = (HISTOGRAM_BINS - 1) as f64;
    let mut histogram = [0usize; HISTOGRAM_BINS];
    for point in points {
        let bin = ((point[axis] - lower_limit) / bin_size)
            .round()
            .clamp(0.0, last_bin);
        histogram[bin as usize] += 1;
    }

    // Find the first bucket where the running count passes half the samples
    let half = sample_count / 2;
    let mut lower_half = 0;
    let mut median_bin = HISTOGRAM_BINS - 1;
    for (bin, &count) in histogram.iter().enumerate() {
        lower_half += count;
        if lower_half > half {
            median_bin = bin;
            break;
        }
    }

    Ok(lower_limit + median_bin as f64 * bin_size + bin_size / 2.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{approx_median, HISTOGRAM_BINS};
    use crate::error::KdError;
    use crate::point::Point;
    use crate::stats::DistributionStats;

    fn column(values: &[f64]) -> Vec<Point> {
        values
            .iter()
            .enumerate()
            .map(|(i, &x)| Point::new(vec![x, -x], i))
            .collect()
    }

    #[test]
    fn two_points_return_the_first() {
        let points = column(&[7.0, -3.0]);
        // Mean and variance are ignored on this path.
        assert_eq!(approx_median(&points, 0, 100.0, 25.0).unwrap(), 7.0);
        assert_eq!(approx_median(&points, 1, 0.0, 0.0).unwrap(), -7.0);
        assert_eq!(approx_median(&points[..1], 0, 0.0, 1.0).unwrap(), 7.0);
    }

    #[test]
    fn three_point_example() {
        let points = column(&[0.0, 1.0, 5.0]);
        let stats = DistributionStats::compute(&points).unwrap();
        let median = approx_median(&points, 0, stats.mean[0], stats.variance[0]).unwrap();

        // Bucket 34 of the window around the mean holds the second sample.
        let sigma = stats.variance[0].sqrt();
        let bin_size = 2.0 * sigma / HISTOGRAM_BINS as f64;
        let expected = stats.mean[0] - sigma + 34.0 * bin_size + bin_size / 2.0;
        assert_abs_diff_eq!(median, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(median, 1.0, epsilon = bin_size);
    }

    #[test]
    fn constant_axis_returns_mean() {
        let points = column(&[4.0, 4.0, 4.0, 4.0]);
        assert_eq!(approx_median(&points, 0, 4.0, 0.0).unwrap(), 4.0);
    }

    #[test]
    fn close_to_exact_median_on_uniform_data() {
        let mut rng = StdRng::seed_from_u64(0);
        let values: Vec<f64> = (0..10_001).map(|_| rng.gen_range(0.0..100.0)).collect();
        let points = column(&values);
        let stats = DistributionStats::compute(&points).unwrap();
        let median = approx_median(&points, 0, stats.mean[0], stats.variance[0]).unwrap();

        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        let exact = sorted[sorted.len() / 2];
        let bin_size = 2.0 * stats.variance[0].sqrt() / HISTOGRAM_BINS as f64;
        assert!((median - exact).abs() <= 2.0 * bin_size);
    }

    #[test]
    fn rejects_empty_input_and_bad_axis() {
        assert!(matches!(
            approx_median(&[], 0, 0.0, 1.0),
            Err(KdError::EmptyInput)
        ));
        let points = column(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            approx_median(&points, 2, 0.0, 1.0),
            Err(KdError::InvalidAxis {
                axis: 2,
                dimension: 2
            })
        ));
    }
}
