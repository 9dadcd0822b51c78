use crate::frontend::token::Token;
use std::fmt;

/// Built-in procedures callable from a Pascal-- program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Read,
    Write,
}

impl Builtin {
    /// Resolves a case-folded callee name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "read" => Some(Builtin::Read),
            "write" => Some(Builtin::Write),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Read => "read",
            Builtin::Write => "write",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    ConstSection,
    VarSection,
    MainBlock,
    Declaration,
    If,
    Else,
    Statement,
    Call(Builtin),
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::ConstSection => "CONST_SECTION",
            NodeKind::VarSection => "VAR_SECTION",
            NodeKind::MainBlock => "MAIN_BLOCK",
            NodeKind::Declaration => "DECLARATION",
            NodeKind::If => "IF",
            NodeKind::Else => "ELSE",
            NodeKind::Statement => "STATEMENT",
            NodeKind::Call(_) => "CALL",
        };
        f.write_str(name)
    }
}

/// Index of a node inside its [`SyntaxTree`](super::SyntaxTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub expr: Vec<Token>,
    pub(crate) next: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
    // Node whose `next` or `child` edge points here.
    pub(crate) owner: Option<NodeId>,
    // First node of the sibling chain this node belongs to.
    pub(crate) head: NodeId,
    // Last node of the chain; kept current on chain heads only.
    pub(crate) tail: NodeId,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind, expr: Vec<Token>) -> Self {
        Self {
            kind,
            expr,
            next: None,
            child: None,
            owner: None,
            head: id,
            tail: id,
        }
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn child(&self) -> Option<NodeId> {
        self.child
    }
}
