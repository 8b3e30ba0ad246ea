use log::{debug, info};
use ordered_float::OrderedFloat;

use crate::config::BuildConfig;
use crate::distance::euclidean;
use crate::error::{KdError, Result};
use crate::index::{NearestNeighbor, Neighbor};
use crate::median::approx_median;
use crate::node::{link, KdNode, Links};
use crate::point::{common_dimension, Point};
use crate::stats::DistributionStats;

/// A KD-tree whose nodes each store one pivot point.
///
/// Split axes follow the configured [`SplitPolicy`](crate::SplitPolicy) and split
/// positions are histogram approximations of the median, so the tree is only
/// roughly balanced. Nearest neighbor queries are nevertheless exact.
#[derive(Debug)]
pub struct KdTree {
    config: BuildConfig,
    dimension: Option<usize>,
    root: Option<Box<KdNode>>,
}

impl KdTree {
    /// Builds a tree over `points`, consuming them into its nodes.
    pub fn build(points: Vec<Point>, config: BuildConfig) -> Result<Self> {
        let dimension = common_dimension(&points)?;
        let num_points = points.len();
        let root = build_nodes(points, config)?;
        let tree = KdTree {
            config,
            dimension,
            root,
        };
        info!(
            "built kd-tree over {num_points} points (policy {}, height {})",
            config.policy,
            tree.height()
        );
        Ok(tree)
    }

    /// Assembles a tree from an already built root, e.g. one read back from disk.
    #[must_use]
    pub fn from_root(
        root: Option<Box<KdNode>>,
        dimension: Option<usize>,
        config: BuildConfig,
    ) -> Self {
        KdTree {
            config,
            dimension,
            root,
        }
    }

    #[must_use]
    pub fn root(&self) -> Option<&KdNode> {
        self.root.as_deref()
    }

    #[must_use]
    pub fn left_subtree(&self) -> Option<&KdNode> {
        self.root()?.left.as_deref()
    }

    #[must_use]
    pub fn right_subtree(&self) -> Option<&KdNode> {
        self.root()?.right.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[must_use]
    pub fn config(&self) -> BuildConfig {
        self.config
    }

    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of nodes, which equals the number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root().map_or(0, KdNode::len)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.root().map_or(0, KdNode::height)
    }
}

impl NearestNeighbor for KdTree {
    fn nearest(&self, query: &Point) -> Result<Neighbor> {
        let root = self.root().ok_or(KdError::EmptyIndex)?;
        if query.dimension() != root.point.dimension() {
            return Err(KdError::DimensionMismatch {
                expected: root.point.dimension(),
                found: query.dimension(),
            });
        }

        let query = query.coords();
        let best = (&root.point, euclidean(root.point.coords(), query));
        let (point, distance) = search(root, query, best);
        Ok(Neighbor {
            index: point.source_index(),
            distance,
        })
    }

    fn num_points(&self) -> usize {
        self.len()
    }
}

// Points still to be placed, the depth they start at and the slot awaiting them.
struct Pending {
    points: Vec<Point>,
    depth: usize,
    parent: Option<(usize, Side)>,
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

// Builds with an explicit work stack, since identical points give one level per point.
fn build_nodes(points: Vec<Point>, config: BuildConfig) -> Result<Option<Box<KdNode>>> {
    let mut nodes: Vec<(KdNode, Links)> = Vec::new();
    let mut work = vec![Pending {
        points,
        depth: 0,
        parent: None,
    }];

    while let Some(Pending {
        points,
        depth,
        parent,
    }) = work.pop()
    {
        if points.is_empty() {
            continue;
        }
        let id = nodes.len();
        if let Some((parent, side)) = parent {
            let links = &mut nodes[parent].1;
            match side {
                Side::Left => links.0 = Some(id),
                Side::Right => links.1 = Some(id),
            }
        }

        let (node, left, right) = split_node(points, depth, config)?;
        nodes.push((node, (None, None)));
        for (points, side) in [(right, Side::Right), (left, Side::Left)] {
            work.push(Pending {
                points,
                depth: depth + 1,
                parent: Some((id, side)),
            });
        }
    }
    Ok(link(nodes))
}

// Picks the pivot of a non-empty point set and splits the rest into half-spaces.
fn split_node(
    mut points: Vec<Point>,
    depth: usize,
    config: BuildConfig,
) -> Result<(KdNode, Vec<Point>, Vec<Point>)> {
    if points.len() == 1 {
        if let Some(point) = points.pop() {
            return Ok((KdNode::leaf(depth, point), Vec::new(), Vec::new()));
        }
    }

    // Dimension-wise parameters of the points under this node
    let stats = DistributionStats::compute(&points)?;
    let split_axis = config.policy.split_axis(&stats, depth);
    let split_position = approx_median(
        &points,
        split_axis,
        stats.mean[split_axis],
        stats.variance[split_axis],
    )?;

    // The pivot is the point closest to the split position, the first one on ties
    let pivot = points
        .iter()
        .enumerate()
        .min_by_key(|(_, point)| OrderedFloat((point[split_axis] - split_position).abs()))
        .map_or(0, |(i, _)| i);
    let point = points.remove(pivot);

    // Split the remaining points into half-spaces
    let (left, right): (Vec<Point>, Vec<Point>) = points
        .into_iter()
        .partition(|point| point[split_axis] < split_position);
    debug!(
        "depth {depth}: axis {split_axis} at {split_position}, {} left / {} right",
        left.len(),
        right.len()
    );

    let node = KdNode {
        depth,
        split_axis,
        split_position,
        point,
        left: None,
        right: None,
    };
    Ok((node, left, right))
}

// Returns the closest point seen in the subtree rooted at `root`, starting from `best`.
//
// A far-side entry carries the distance from the query to its splitting
// hyperplane. It is checked when popped, once the near side is exhausted.
fn search<'a>(root: &'a KdNode, query: &[f64], mut best: (&'a Point, f64)) -> (&'a Point, f64) {
    let mut stack: Vec<(&KdNode, Option<f64>)> = vec![(root, None)];
    while let Some((node, reach)) = stack.pop() {
        // The far side can only hold a closer point if the hyperplane is within reach.
        if reach.is_some_and(|reach| reach >= best.1) {
            continue;
        }

        let distance = euclidean(node.point.coords(), query);
        if distance < best.1 {
            best = (&node.point, distance);
        }
        if node.is_leaf() {
            continue;
        }

        let offset = query[node.split_axis] - node.split_position;
        let (near, far) = if offset < 0.0 {
            (node.left.as_deref(), node.right.as_deref())
        } else {
            (node.right.as_deref(), node.left.as_deref())
        };
        if let Some(far) = far {
            stack.push((far, Some(offset.abs())));
        }
        if let Some(near) = near {
            stack.push((near, None));
        }
    }
    best
}
