use std::ops::Index;

use crate::distance::euclidean;
use crate::error::{KdError, Result};

/// A coordinate vector together with its row position in the source dataset.
///
/// Points synthesized by statistics code carry no source index.
#[derive(Clone, Debug)]
pub struct Point {
    coords: Vec<f64>,
    source_index: Option<usize>,
}

#[allow(clippy::should_implement_trait)]
impl Point {
    #[must_use]
    pub fn new(coords: Vec<f64>, source_index: usize) -> Point {
        Point {
            coords,
            source_index: Some(source_index),
        }
    }

    #[must_use]
    pub fn unindexed(coords: Vec<f64>) -> Point {
        Point {
            coords,
            source_index: None,
        }
    }

    /// A point of the given dimension with every coordinate set to `value`.
    #[must_use]
    pub fn splat(dimension: usize, value: f64) -> Point {
        Self::unindexed(vec![value; dimension])
    }

    #[must_use]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    #[must_use]
    pub fn source_index(&self) -> Option<usize> {
        self.source_index
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    pub fn distance(&self, other: &Point) -> Result<f64> {
        self.check_dimension(other)?;
        Ok(euclidean(&self.coords, &other.coords))
    }

    pub fn add(&self, other: &Point) -> Result<Point> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Point) -> Result<Point> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Point) -> Result<Point> {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn div(&self, other: &Point) -> Result<Point> {
        self.zip_with(other, |a, b| a / b)
    }

    pub fn elementwise_min(&self, other: &Point) -> Result<Point> {
        self.zip_with(other, f64::min)
    }

    pub fn elementwise_max(&self, other: &Point) -> Result<Point> {
        self.zip_with(other, f64::max)
    }

    pub(crate) fn check_dimension(&self, other: &Point) -> Result<()> {
        if self.dimension() == other.dimension() {
            Ok(())
        } else {
            Err(KdError::DimensionMismatch {
                expected: self.dimension(),
                found: other.dimension(),
            })
        }
    }

    fn zip_with(&self, other: &Point, op: impl Fn(f64, f64) -> f64) -> Result<Point> {
        self.check_dimension(other)?;
        let coords = self
            .coords
            .iter()
            .zip(other.coords.iter())
            .map(|(&a, &b)| op(a, b))
            .collect();
        Ok(Point::unindexed(coords))
    }
}

/// Dimension shared by every point, `None` for an empty slice.
pub(crate) fn common_dimension(points: &[Point]) -> Result<Option<usize>> {
    let Some(first) = points.first() else {
        return Ok(None);
    };
    if first.dimension() == 0 {
        return Err(KdError::ZeroDimension);
    }
    for point in points {
        first.check_dimension(point)?;
    }
    Ok(Some(first.dimension()))
}

// Equality is positional only, the provenance index is ignored.
impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords
    }
}

impl Index<usize> for Point {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        &self.coords[axis]
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Point::unindexed(coords)
    }
}
