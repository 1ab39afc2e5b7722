//! In-memory B+ tree used as the range (`<`, `>`, `<=`, `>=`) access path
//! for a table column. Values are row indices into the table's row
//! vector, not on-disk record locations — there is no page layer here.

mod error;
mod node;

pub use error::{BPlusTreeError, BPlusTreeResult};
pub use node::{BPlusNode, InternalNode, LeafNode, NodeId};

/// Key type for the B+ tree: columns are coerced to `i64` for ordering.
pub type BPlusKey = i64;

/// Fixed branching factor. Kept small and constant rather than
/// page-sized, since nothing here is laid out on disk.
pub const ORDER: usize = 4;

#[derive(Debug)]
pub struct BPlusTree {
    root: Option<NodeId>,
    order: usize,
    nodes: Vec<Option<BPlusNode>>,
    free_list: Vec<NodeId>,
    first_leaf: Option<NodeId>,
    entry_count: usize,
}

impl BPlusTree {
    pub fn new() -> Self {
        Self::with_order(ORDER)
    }

    pub fn with_order(order: usize) -> Self {
        assert!(order >= 3, "b+tree order must be at least 3");
        Self {
            root: None,
            order,
            nodes: Vec::new(),
            free_list: Vec::new(),
            first_leaf: None,
            entry_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn max_leaf_entries(&self) -> usize {
        self.order - 1
    }

    fn max_internal_children(&self) -> usize {
        self.order
    }

    fn allocate_node(&mut self, node: BPlusNode) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            let id = self.nodes.len();
            self.nodes.push(Some(node));
            id
        }
    }

    fn get_node(&self, id: NodeId) -> Option<&BPlusNode> {
        self.nodes.get(id).and_then(|n| n.as_ref())
    }

    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut BPlusNode> {
        self.nodes.get_mut(id).and_then(|n| n.as_mut())
    }

    fn find_leaf(&self, key: BPlusKey) -> Option<NodeId> {
        let mut current = self.root?;
        loop {
            match self.get_node(current)? {
                BPlusNode::Leaf(_) => return Some(current),
                BPlusNode::Internal(node) => {
                    let idx = node.find_child_index(key);
                    current = node.children[idx];
                }
            }
        }
    }

    fn find_leaf_with_path(&self, key: BPlusKey) -> Option<(NodeId, Vec<(NodeId, usize)>)> {
        let mut current = self.root?;
        let mut path = Vec::new();
        loop {
            match self.get_node(current)? {
                BPlusNode::Leaf(_) => return Some((current, path)),
                BPlusNode::Internal(node) => {
                    let idx = node.find_child_index(key);
                    path.push((current, idx));
                    current = node.children[idx];
                }
            }
        }
    }

    /// Exact search, returning the first matching row index.
    pub fn search(&self, key: BPlusKey) -> Option<usize> {
        let leaf_id = self.find_leaf(key)?;
        self.get_node(leaf_id)?.as_leaf()?.search(key)
    }

    /// All row indices with `lower <= key <= upper`.
    pub fn range_search(&self, lower: BPlusKey, upper: BPlusKey) -> Vec<(BPlusKey, usize)> {
        let mut results = Vec::new();
        if lower > upper {
            return results;
        }
        let Some(leaf_id) = self.find_leaf(lower) else {
            return results;
        };
        let mut current_id = Some(leaf_id);
        while let Some(id) = current_id {
            let Some(leaf) = self.get_node(id).and_then(|n| n.as_leaf()) else {
                break;
            };
            for (i, &k) in leaf.keys.iter().enumerate() {
                if k > upper {
                    return results;
                }
                if k >= lower {
                    results.push((k, leaf.values[i]));
                }
            }
            current_id = leaf.next;
        }
        results
    }

    pub fn insert(&mut self, key: BPlusKey, value: usize) -> BPlusTreeResult<()> {
        if self.root.is_none() {
            let mut leaf = LeafNode::new();
            leaf.insert(key, value);
            let leaf_id = self.allocate_node(BPlusNode::Leaf(leaf));
            self.root = Some(leaf_id);
            self.first_leaf = Some(leaf_id);
            self.entry_count = 1;
            return Ok(());
        }

        let (leaf_id, path) = self
            .find_leaf_with_path(key)
            .ok_or(BPlusTreeError::NodeNotFound(0))?;

        {
            let leaf = self
                .get_node_mut(leaf_id)
                .and_then(|n| n.as_leaf_mut())
                .ok_or(BPlusTreeError::NodeNotFound(leaf_id))?;
            leaf.insert(key, value);
        }
        self.entry_count += 1;

        let leaf_len = self
            .get_node(leaf_id)
            .and_then(|n| n.as_leaf())
            .map(|l| l.len())
            .unwrap_or(0);

        if leaf_len > self.max_leaf_entries() {
            self.split_leaf(leaf_id, path)?;
        } else {
            self.update_ancestor_keys(leaf_id, &path)?;
        }
        Ok(())
    }

    fn split_leaf(&mut self, leaf_id: NodeId, path: Vec<(NodeId, usize)>) -> BPlusTreeResult<()> {
        let (left_max_key, right_max_key, right_id) = {
            let leaf = self
                .get_node_mut(leaf_id)
                .and_then(|n| n.as_leaf_mut())
                .ok_or(BPlusTreeError::NodeNotFound(leaf_id))?;

            let mut right = leaf.split();
            let left_max = leaf.max_key().unwrap_or(0);
            let right_max = right.max_key().unwrap_or(0);

            let right_id = self.allocate_node(BPlusNode::Leaf(LeafNode::new()));
            let leaf = self
                .get_node_mut(leaf_id)
                .and_then(|n| n.as_leaf_mut())
                .ok_or(BPlusTreeError::NodeNotFound(leaf_id))?;
            right.next = leaf.next.take();
            leaf.next = Some(right_id);

            self.nodes[right_id] = Some(BPlusNode::Leaf(right));
            (left_max, right_max, right_id)
        };

        self.insert_into_parent(path, leaf_id, left_max_key, right_id, right_max_key)
    }

    fn insert_into_parent(
        &mut self,
        path: Vec<(NodeId, usize)>,
        left_id: NodeId,
        left_key: BPlusKey,
        right_id: NodeId,
        right_key: BPlusKey,
    ) -> BPlusTreeResult<()> {
        if path.is_empty() {
            let new_root = InternalNode::new(vec![left_key, right_key], vec![left_id, right_id]);
            let new_root_id = self.allocate_node(BPlusNode::Internal(new_root));
            self.root = Some(new_root_id);
            return Ok(());
        }

        let (parent_id, child_idx) = path[path.len() - 1];
        let parent_path = path[..path.len() - 1].to_vec();

        {
            let parent = self
                .get_node_mut(parent_id)
                .and_then(|n| n.as_internal_mut())
                .ok_or(BPlusTreeError::NodeNotFound(parent_id))?;
            parent.keys[child_idx] = left_key;
            parent.keys.insert(child_idx + 1, right_key);
            parent.children.insert(child_idx + 1, right_id);
        }

        let parent_len = self
            .get_node(parent_id)
            .and_then(|n| n.as_internal())
            .map(|n| n.len())
            .unwrap_or(0);

        if parent_len > self.max_internal_children() {
            self.split_internal(parent_id, parent_path)?;
        }
        Ok(())
    }

    fn split_internal(&mut self, node_id: NodeId, path: Vec<(NodeId, usize)>) -> BPlusTreeResult<()> {
        let (left_max_key, right_max_key, right_id) = {
            let node = self
                .get_node_mut(node_id)
                .and_then(|n| n.as_internal_mut())
                .ok_or(BPlusTreeError::NodeNotFound(node_id))?;

            let mid = node.len() / 2;
            let right_keys = node.keys.split_off(mid);
            let right_children = node.children.split_off(mid);
            let left_max = node.keys.last().copied().unwrap_or(0);
            let right_max = *right_keys.last().unwrap_or(&0);

            let right_node = InternalNode::new(right_keys, right_children);
            let right_id = self.allocate_node(BPlusNode::Internal(right_node));
            (left_max, right_max, right_id)
        };

        self.insert_into_parent(path, node_id, left_max_key, right_id, right_max_key)
    }

    fn update_ancestor_keys(
        &mut self,
        node_id: NodeId,
        path: &[(NodeId, usize)],
    ) -> BPlusTreeResult<()> {
        let mut current_node = node_id;
        for &(parent_id, child_idx) in path.iter().rev() {
            let max_key = self
                .get_node(current_node)
                .and_then(|n| n.max_key())
                .ok_or(BPlusTreeError::NodeNotFound(current_node))?;

            let parent = self
                .get_node_mut(parent_id)
                .and_then(|n| n.as_internal_mut())
                .ok_or(BPlusTreeError::NodeNotFound(parent_id))?;

            if parent.keys[child_idx] != max_key {
                parent.keys[child_idx] = max_key;
                current_node = parent_id;
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Drop every entry, returning the tree to its just-created state.
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
        self.free_list.clear();
        self.first_leaf = None;
        self.entry_count = 0;
    }
}

impl Default for BPlusTree {
    fn default() -> Self {
        Self::new()
    }
}
