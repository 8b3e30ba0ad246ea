use crate::point::Point;

#[derive(Debug)]
pub struct KdNode {
    pub depth: usize,
    pub split_axis: usize,
    pub split_position: f64,
    pub point: Point,
    pub left: Option<Box<KdNode>>,
    pub right: Option<Box<KdNode>>,
}

impl KdNode {
    #[must_use]
    pub fn leaf(depth: usize, point: Point) -> KdNode {
        let split_axis = depth % point.dimension().max(1);
        let split_position = point.coords().get(split_axis).copied().unwrap_or_default();
        KdNode {
            depth,
            split_axis,
            split_position,
            point,
            left: None,
            right: None,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Number of nodes in this subtree.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }

    /// Number of levels in this subtree, one for a leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            height = height.max(level);
            stack.extend(node.children().map(|child| (child, level + 1)));
        }
        height
    }

    pub fn children(&self) -> impl Iterator<Item = &KdNode> {
        self.left.iter().chain(self.right.iter()).map(|child| &**child)
    }
}

// Chains can be as deep as the point count, so subtrees are torn down from a
// heap stack rather than by recursive drops.
impl Drop for KdNode {
    fn drop(&mut self) {
        let mut stack: Vec<Box<KdNode>> =
            self.left.take().into_iter().chain(self.right.take()).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// Child slots of a node, as positions in a node list.
pub(crate) type Links = (Option<usize>, Option<usize>);

/// Wires a list of childless nodes into a tree rooted at the first entry.
///
/// Every child must appear after its parent in `nodes`.
pub(crate) fn link(nodes: Vec<(KdNode, Links)>) -> Option<Box<KdNode>> {
    let mut links = Vec::with_capacity(nodes.len());
    let mut slots: Vec<Option<Box<KdNode>>> = Vec::with_capacity(nodes.len());
    for (node, (left, right)) in nodes {
        slots.push(Some(Box::new(node)));
        links.push((left, right));
    }

    // Children sit at higher positions, so they are complete before their parent.
    for (i, (left, right)) in links.into_iter().enumerate().rev() {
        let left = left.and_then(|child| slots[child].take());
        let right = right.and_then(|child| slots[child].take());
        if let Some(node) = slots[i].as_mut() {
            node.left = left;
            node.right = right;
        }
    }
    slots.into_iter().next().flatten()
}
