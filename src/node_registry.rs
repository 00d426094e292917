//! Named region tree with a global name index
//!
//! Nodes live in an arena keyed by [`NodeId`]. Each node records its parent id
//! and its children ids; the name index maps every attached name to its id.
//! Names are unique across the whole tree, not just among siblings, and a
//! node is never moved to another parent once created.

use crate::error::{Result, TimerError};
use crate::unit::TimeUnit;
use std::collections::HashMap;

/// Stable identity of a node in the arena
///
/// Ids are never reused, so a stale id can only miss, never alias a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// The synthetic, unnamed attachment point for top-level regions
    pub const ROOT: NodeId = NodeId(0);
}

/// Label used for the root in diagnostics and report headers
pub const ROOT_LABEL: &str = "root";

/// One named region in the tree
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    unit: TimeUnit,
}

impl Node {
    /// Region name (empty for the root)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent id, `None` only for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ids of the direct children
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Unit the region accumulates its duration in
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena of nodes plus the name -> id index
#[derive(Debug)]
pub struct NodeRegistry {
    nodes: HashMap<NodeId, Node>,
    index: HashMap<String, NodeId>,
    next_id: u64,
}

impl NodeRegistry {
    /// Create a registry holding only the root
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            NodeId::ROOT,
            Node {
                name: String::new(),
                parent: None,
                children: Vec::new(),
                unit: TimeUnit::default(),
            },
        );
        Self {
            nodes,
            index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Locate or create a top-level region
    ///
    /// # Errors
    /// [`TimerError::NameConflict`] if `name` is already registered under a
    /// parent other than the root. The existing node is left untouched.
    pub fn ensure_top_level(&mut self, name: &str, unit: TimeUnit) -> Result<NodeId> {
        self.ensure_under(name, NodeId::ROOT, unit)
    }

    /// Locate or create `name` as a child of `parent_name`
    ///
    /// # Errors
    /// [`TimerError::NotFound`] if `parent_name` is unknown,
    /// [`TimerError::NameConflict`] if `name` already lives under another parent.
    pub fn ensure_child(&mut self, name: &str, parent_name: &str, unit: TimeUnit) -> Result<NodeId> {
        let parent = self.lookup(parent_name)?;
        self.ensure_under(name, parent, unit)
    }

    fn ensure_under(&mut self, name: &str, parent: NodeId, unit: TimeUnit) -> Result<NodeId> {
        if let Some(&id) = self.index.get(name) {
            let registered = self.nodes.get(&id).and_then(Node::parent);
            if registered == Some(parent) {
                return Ok(id);
            }
            return Err(TimerError::NameConflict {
                name: name.to_string(),
                registered_parent: registered
                    .map(|p| self.label(p).to_string())
                    .unwrap_or_else(|| ROOT_LABEL.to_string()),
                requested_parent: self.label(parent).to_string(),
            });
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                name: name.to_string(),
                parent: Some(parent),
                children: Vec::new(),
                unit,
            },
        );
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        self.index.insert(name.to_string(), id);

        tracing::debug!(
            region = name,
            parent = self.label(parent),
            unit = unit.suffix(),
            "created region"
        );
        Ok(id)
    }

    /// Resolve a name to its node id
    pub fn lookup(&self, name: &str) -> Result<NodeId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| TimerError::not_found(name))
    }

    /// Resolve a name to its node
    pub fn get(&self, name: &str) -> Result<&Node> {
        let id = self.lookup(name)?;
        self.node(id).ok_or_else(|| TimerError::not_found(name))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn root(&self) -> &Node {
        // The root is inserted in `new` and never removed
        &self.nodes[&NodeId::ROOT]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of named regions (the root is not counted)
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Names of every attached region, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Detach `name` and drop it together with its whole subtree
    ///
    /// Returns the ids that were removed (the node first, then its
    /// descendants) so the caller can drop state keyed by them.
    pub fn erase(&mut self, name: &str) -> Result<Vec<NodeId>> {
        let id = self.lookup(name)?;

        if let Some(parent) = self.nodes.get(&id).and_then(Node::parent) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&child| child != id);
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                self.index.remove(&node.name);
                stack.extend(node.children.iter().rev().copied());
                removed.push(current);
            }
        }

        tracing::debug!(region = name, removed = removed.len(), "erased region subtree");
        Ok(removed)
    }

    /// Check that the name index and the tree describe the same set of nodes
    ///
    /// Every indexed name must resolve to a node reachable from the root
    /// through its recorded parent chain, and every reachable non-root node
    /// must be indexed under its own name.
    pub fn is_consistent(&self) -> bool {
        let mut reachable = 0usize;
        let mut stack = vec![NodeId::ROOT];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                return false;
            };
            for &child in &node.children {
                match self.nodes.get(&child) {
                    Some(child_node) if child_node.parent == Some(current) => {
                        if self.index.get(&child_node.name) != Some(&child) {
                            return false;
                        }
                        reachable += 1;
                        stack.push(child);
                    }
                    _ => return false,
                }
            }
        }
        reachable == self.index.len() && self.nodes.len() == reachable + 1
    }

    fn label(&self, id: NodeId) -> &str {
        match self.nodes.get(&id) {
            Some(node) if !node.is_root() => &node.name,
            _ => ROOT_LABEL,
        }
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
