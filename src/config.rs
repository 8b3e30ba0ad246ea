use std::fmt;

use clap::ValueEnum;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::stats::DistributionStats;

/// Rule used to choose the split axis of each node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Round-robin over the axes by node depth.
    Cycle,
    /// Axis with the largest variance.
    #[default]
    Variance,
    /// Axis with the largest extent.
    Range,
}

impl SplitPolicy {
    /// Picks the split axis for a node at `depth`. Ties go to the lowest axis.
    #[must_use]
    pub fn split_axis(self, stats: &DistributionStats, depth: usize) -> usize {
        match self {
            SplitPolicy::Cycle => depth % stats.dimension(),
            SplitPolicy::Variance => first_max(stats.variance.coords()),
            SplitPolicy::Range => first_max(stats.range.coords()),
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplitPolicy::Cycle => "cycle",
            SplitPolicy::Variance => "variance",
            SplitPolicy::Range => "range",
        };
        f.write_str(name)
    }
}

// `max_by_key` keeps the last maximum, so take the first minimum of the negation.
fn first_max(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, &value)| OrderedFloat(-value))
        .map_or(0, |(i, _)| i)
}

/// Options fixed at build time and stored alongside a persisted tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub policy: SplitPolicy,
}

impl BuildConfig {
    #[must_use]
    pub fn new(policy: SplitPolicy) -> Self {
        BuildConfig { policy }
    }
}
