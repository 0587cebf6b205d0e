//! Node type tags.
//!
//! Names follow ESTree so that selectors written as `"BlockStatement"` or
//! `"VariableDeclaration > Identifier"` read the same as in other linters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! node_types {
    ($($(#[$doc:meta])* $variant:ident,)*) => {
        /// Syntax tree node types.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[non_exhaustive]
        pub enum NodeType {
            $($(#[$doc])* $variant,)*
        }

        impl NodeType {
            /// Every node type, in declaration order.
            pub const ALL: &'static [NodeType] = &[$(NodeType::$variant,)*];

            /// Returns the ESTree name of this node type.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(NodeType::$variant => stringify!($variant),)*
                }
            }

            /// Looks a node type up by its ESTree name.
            pub fn from_name(name: &str) -> Option<NodeType> {
                match name {
                    $(stringify!($variant) => Some(NodeType::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

node_types! {
    /// Root of a script or module.
    Program,

    // Statements
    /// `{ ... }`
    BlockStatement,
    /// `static { ... }` inside a class body.
    StaticBlock,
    ExpressionStatement,
    EmptyStatement,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    ClassDeclaration,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    SwitchStatement,
    SwitchCase,
    LabeledStatement,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,

    // Class members
    ClassBody,
    MethodDefinition,
    PropertyDefinition,

    // Expressions
    FunctionExpression,
    ArrowFunctionExpression,
    ClassExpression,
    CallExpression,
    NewExpression,
    MemberExpression,
    Identifier,
    Literal,
    ArrayExpression,
    ObjectExpression,
    Property,
    AssignmentExpression,
    BinaryExpression,
    LogicalExpression,
    UnaryExpression,
    UpdateExpression,
    ConditionalExpression,
    SequenceExpression,
    ThisExpression,
}

impl NodeType {
    /// Returns true for nodes that introduce a function scope.
    #[inline]
    pub const fn is_function(&self) -> bool {
        matches!(
            self,
            NodeType::FunctionDeclaration
                | NodeType::FunctionExpression
                | NodeType::ArrowFunctionExpression
        )
    }

    /// Returns true for loop statements.
    #[inline]
    pub const fn is_loop(&self) -> bool {
        matches!(
            self,
            NodeType::WhileStatement | NodeType::DoWhileStatement | NodeType::ForStatement
        )
    }

    /// Returns true for `BlockStatement` and `StaticBlock`.
    #[inline]
    pub const fn is_block_like(&self) -> bool {
        matches!(self, NodeType::BlockStatement | NodeType::StaticBlock)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known node type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node type `{0}`")]
pub struct UnknownNodeType(pub String);

impl FromStr for NodeType {
    type Err = UnknownNodeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::from_name(s).ok_or_else(|| UnknownNodeType(s.to_string()))
    }
}
