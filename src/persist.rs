use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::BuildConfig;
use crate::error::{KdError, Result};
use crate::kdtree::KdTree;
use crate::node::{link, KdNode, Links};
use crate::point::Point;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct PersistedTree {
    version: u32,
    dimension: Option<usize>,
    config: BuildConfig,
    /// Nodes in pre-order: a node, its left subtree, then its right subtree.
    nodes: Vec<PersistedNode>,
}

#[derive(Serialize, Deserialize)]
struct PersistedNode {
    depth: usize,
    split_axis: usize,
    split_position: f64,
    coords: Vec<f64>,
    source_index: Option<usize>,
    has_left: bool,
    has_right: bool,
}

/// Writes `tree` to `path` as JSON, replacing any existing file.
pub fn write_tree(tree: &KdTree, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let document = PersistedTree {
        version: FORMAT_VERSION,
        dimension: tree.dimension(),
        config: tree.config(),
        nodes: flatten(tree),
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &document)?;
    writer.flush()?;
    info!("wrote {} nodes to {}", document.nodes.len(), path.display());
    Ok(())
}

/// Reads a tree previously written by [`write_tree`].
pub fn read_tree(path: impl AsRef<Path>) -> Result<KdTree> {
    let path = path.as_ref();
    let missing = |reason: String| KdError::MissingPersistedTree {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|err| missing(err.to_string()))?;
    let document: PersistedTree =
        serde_json::from_reader(BufReader::new(file)).map_err(|err| missing(err.to_string()))?;
    let tree = restore(document).map_err(missing)?;
    info!("read {} nodes from {}", tree.len(), path.display());
    Ok(tree)
}

fn flatten(tree: &KdTree) -> Vec<PersistedNode> {
    let mut nodes = Vec::with_capacity(tree.len());
    let mut stack: Vec<&KdNode> = tree.root().into_iter().collect();
    while let Some(node) = stack.pop() {
        nodes.push(PersistedNode {
            depth: node.depth,
            split_axis: node.split_axis,
            split_position: node.split_position,
            coords: node.point.coords().to_vec(),
            source_index: node.point.source_index(),
            has_left: node.left.is_some(),
            has_right: node.right.is_some(),
        });
        // Right first so that the left subtree is emitted next.
        stack.extend(node.right.as_deref());
        stack.extend(node.left.as_deref());
    }
    nodes
}

fn restore(document: PersistedTree) -> std::result::Result<KdTree, String> {
    if document.version != FORMAT_VERSION {
        return Err(format!("unsupported format version {}", document.version));
    }
    let Some(dimension) = document.dimension else {
        if !document.nodes.is_empty() {
            return Err("trailing nodes after the last subtree".to_owned());
        }
        return Ok(KdTree::from_root(None, None, document.config));
    };

    let mut nodes: Vec<(KdNode, Links)> = Vec::with_capacity(document.nodes.len());
    // Child slots still waiting for their subtree, innermost last.
    let mut open: Vec<(Option<(usize, bool)>, usize)> = vec![(None, 0)];
    for node in document.nodes {
        let Some((parent, depth)) = open.pop() else {
            return Err("trailing nodes after the last subtree".to_owned());
        };
        if node.depth != depth {
            return Err(format!("node at depth {depth} is labelled {}", node.depth));
        }
        if node.coords.len() != dimension {
            return Err(format!(
                "node at depth {depth} has {} coordinates, expected {dimension}",
                node.coords.len()
            ));
        }
        if node.split_axis >= dimension {
            return Err(format!("split axis {} out of range", node.split_axis));
        }

        let id = nodes.len();
        if let Some((parent, is_left)) = parent {
            let links = &mut nodes[parent].1;
            if is_left {
                links.0 = Some(id);
            } else {
                links.1 = Some(id);
            }
        }
        // Pre-order: the left subtree is read before the right one.
        if node.has_right {
            open.push((Some((id, false)), depth + 1));
        }
        if node.has_left {
            open.push((Some((id, true)), depth + 1));
        }

        let point = match node.source_index {
            Some(index) => Point::new(node.coords, index),
            None => Point::unindexed(node.coords),
        };
        let restored = KdNode {
            depth,
            split_axis: node.split_axis,
            split_position: node.split_position,
            point,
            left: None,
            right: None,
        };
        nodes.push((restored, (None, None)));
    }
    if let Some((_, depth)) = open.pop() {
        return Err(format!("missing node at depth {depth}"));
    }

    Ok(KdTree::from_root(link(nodes), Some(dimension), document.config))
}
