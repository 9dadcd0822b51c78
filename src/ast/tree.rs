use super::node::{Node, NodeId, NodeKind};
use crate::errors::{PascalError, PascalResult};
use crate::frontend::token::Token;
use std::fmt;

/// First-child/next-sibling tree stored in an arena.
///
/// Nodes refer to each other by [`NodeId`], so dropping the tree is a flat
/// `Vec` drop and traversal never recurses. The first node added is the root.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add_node(&mut self, kind: NodeKind, expr: Vec<Token>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, kind, expr));
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Appends a token to a node's raw lexeme run (e.g. a trailing separator).
    pub fn push_expr(&mut self, id: NodeId, token: Token) {
        self.nodes[id.0].expr.push(token);
    }

    /// Links `new` (and any siblings already following it) at the end of
    /// `node`'s sibling chain.
    pub fn append_sibling(&mut self, node: NodeId, new: NodeId) -> PascalResult<()> {
        self.ensure_exists(node)?;
        let head = self.nodes[node.0].head;
        let last = self.nodes[head.0].tail;
        self.check_link(last, new)?;
        self.nodes[last.0].next = Some(new);
        self.nodes[new.0].owner = Some(last);
        self.nodes[head.0].tail = self.nodes[new.0].tail;
        let mut cursor = Some(new);
        while let Some(id) = cursor {
            self.nodes[id.0].head = head;
            cursor = self.nodes[id.0].next;
        }
        Ok(())
    }

    /// Sets `new` as `node`'s first child, or appends it to the existing child chain.
    pub fn append_child(&mut self, node: NodeId, new: NodeId) -> PascalResult<()> {
        self.ensure_exists(node)?;
        match self.nodes[node.0].child {
            Some(first) => self.append_sibling(first, new),
            None => {
                self.check_link(node, new)?;
                self.nodes[node.0].child = Some(new);
                self.nodes[new.0].owner = Some(node);
                Ok(())
            }
        }
    }

    fn ensure_exists(&self, id: NodeId) -> PascalResult<()> {
        if id.0 >= self.nodes.len() {
            return Err(PascalError::internal_error(format!("node {} is outside the tree", id.0)));
        }
        Ok(())
    }

    // Every node has at most one owning edge and never owns one of its ancestors.
    // Ancestors are reached by hopping from each chain head to its owner.
    fn check_link(&self, at: NodeId, new: NodeId) -> PascalResult<()> {
        self.ensure_exists(at)?;
        self.ensure_exists(new)?;
        if self.root() == Some(new) || self.nodes[new.0].owner.is_some() {
            return Err(PascalError::internal_error(format!(
                "node {} is already linked into the tree",
                new.0
            )));
        }
        let mut cursor = Some(at);
        while let Some(id) = cursor {
            let head = self.nodes[id.0].head;
            if id == new || head == new {
                return Err(PascalError::internal_error(format!(
                    "linking node {} would create a cycle",
                    new.0
                )));
            }
            cursor = self.nodes[head.0].owner;
        }
        Ok(())
    }

    /// Iterates `id`'s child chain in order.
    pub fn children(&self, id: NodeId) -> Siblings<'_> {
        Siblings {
            tree: self,
            cursor: self.nodes[id.0].child,
        }
    }

    /// Iterates the sibling chain starting at `id` itself.
    pub fn siblings(&self, id: NodeId) -> Siblings<'_> {
        Siblings {
            tree: self,
            cursor: Some(id),
        }
    }
}

pub struct Siblings<'a> {
    tree: &'a SyntaxTree,
    cursor: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.cursor?;
        self.cursor = self.tree.nodes[current.0].next;
        Some(current)
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root() else {
            return Ok(());
        };
        let mut stack = vec![(root, 0usize)];
        while let Some((id, level)) = stack.pop() {
            let node = &self.nodes[id.0];
            write!(f, "{:indent$}[{}", "", node.kind, indent = level * 2)?;
            if !node.expr.is_empty() {
                write!(f, ": ")?;
                for token in &node.expr {
                    write!(f, "{} ", token)?;
                }
            }
            writeln!(f, "]")?;
            if let Some(next) = node.next {
                stack.push((next, level));
            }
            if let Some(child) = node.child {
                stack.push((child, level + 1));
            }
        }
        Ok(())
    }
}
