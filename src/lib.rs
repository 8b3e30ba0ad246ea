mod config;
mod distance;
mod error;
mod index;
pub mod io;
mod kdtree;
mod linear;
mod median;
mod node;
pub mod persist;
mod point;
mod stats;

pub use config::{BuildConfig, SplitPolicy};
pub use distance::euclidean;
pub use error::{KdError, Result};
pub use index::{NearestNeighbor, Neighbor};
pub use kdtree::KdTree;
pub use linear::LinearIndex;
pub use median::{approx_median, HISTOGRAM_BINS};
pub use node::KdNode;
pub use point::Point;
pub use stats::DistributionStats;
