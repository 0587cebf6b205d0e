//! Node definition.

use serde::Serialize;

use crate::{NodeType, Span};

/// Dense identifier assigned to each node of one tree.
///
/// Parsers number nodes from zero; [`TreeIndex`](crate::TreeIndex) uses the
/// id to look up parents without storing back-pointers in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Returns the id as a vector index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The field of the parent node that holds a child.
///
/// Children are stored in one ordered slice per node; the field tag keeps the
/// grammar role of each child (`test` vs `consequent`, `left` vs `right`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// The root has no parent field.
    #[default]
    None,
    Body,
    Test,
    Consequent,
    Alternate,
    Init,
    Update,
    Id,
    Params,
    Declarations,
    Argument,
    Arguments,
    Callee,
    Object,
    Property,
    Left,
    Right,
    Key,
    Value,
    Elements,
    Properties,
    Expression,
    Expressions,
    Label,
    Block,
    Handler,
    Param,
    Finalizer,
    Discriminant,
    Cases,
    SuperClass,
}

/// `var`, `let` or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    /// Returns the keyword for this declaration kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

/// Kind of a class method definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

/// Cooked value of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue<'a> {
    Number(f64),
    String(&'a str),
    Boolean(bool),
    Null,
}

/// Literal payload: the raw source text plus its cooked value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiteralData<'a> {
    pub raw: &'a str,
    pub value: LiteralValue<'a>,
}

/// Node-specific data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum NodeData<'a> {
    #[default]
    None,
    /// Name of an `Identifier`.
    Identifier(&'a str),
    Literal(LiteralData<'a>),
    /// Kind of a `VariableDeclaration`.
    Declaration(DeclarationKind),
    /// Operator of a binary, logical, unary, update or assignment expression.
    Operator(&'a str),
    Member {
        computed: bool,
    },
    Property {
        computed: bool,
        shorthand: bool,
    },
    Method {
        kind: MethodKind,
        is_static: bool,
    },
    /// Directive text of a prologue `ExpressionStatement` (without quotes).
    Directive(&'a str),
}

/// A node of the syntax tree.
///
/// Nodes are `Copy` and arena-allocated; a node owns its children through a
/// slice in the same arena. There are no parent pointers; use
/// [`TreeIndex`](crate::TreeIndex) for upward navigation.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    /// Identifier, unique within one tree.
    pub id: NodeId,

    /// The type of this node.
    pub node_type: NodeType,

    /// Byte span in the source text.
    pub span: Span,

    /// Which field of the parent holds this node.
    pub field: Field,

    /// Child nodes, in source order.
    pub children: &'a [Node<'a>],

    /// Additional node-specific data.
    pub data: NodeData<'a>,
}

impl<'a> Node<'a> {
    /// Creates a node with children.
    #[inline]
    pub const fn new(id: NodeId, node_type: NodeType, span: Span, children: &'a [Node<'a>]) -> Self {
        Self {
            id,
            node_type,
            span,
            field: Field::None,
            children,
            data: NodeData::None,
        }
    }

    /// Creates a node without children.
    #[inline]
    pub const fn leaf(id: NodeId, node_type: NodeType, span: Span) -> Self {
        Self::new(id, node_type, span, &[])
    }

    /// Sets the parent field tag.
    #[inline]
    pub const fn with_field(mut self, field: Field) -> Self {
        self.field = field;
        self
    }

    /// Sets the node data.
    #[inline]
    pub const fn with_data(mut self, data: NodeData<'a>) -> Self {
        self.data = data;
        self
    }

    /// Returns true if this node has the given type.
    #[inline]
    pub fn is(&self, node_type: NodeType) -> bool {
        self.node_type == node_type
    }

    /// Returns the first child stored in `field`.
    pub fn child(&self, field: Field) -> Option<&'a Node<'a>> {
        self.children.iter().find(|child| child.field == field)
    }

    /// Returns every child stored in `field`, in order.
    pub fn children_in(&self, field: Field) -> impl Iterator<Item = &'a Node<'a>> + use<'a> {
        let children = self.children;
        children.iter().filter(move |child| child.field == field)
    }

    /// Returns the name of an `Identifier`.
    #[inline]
    pub fn name(&self) -> Option<&'a str> {
        match self.data {
            NodeData::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the literal payload of a `Literal`.
    #[inline]
    pub fn literal(&self) -> Option<LiteralData<'a>> {
        match self.data {
            NodeData::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Returns the kind of a `VariableDeclaration`.
    #[inline]
    pub fn declaration_kind(&self) -> Option<DeclarationKind> {
        match self.data {
            NodeData::Declaration(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns the directive text of a prologue statement.
    #[inline]
    pub fn directive(&self) -> Option<&'a str> {
        match self.data {
            NodeData::Directive(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the operator of an operator expression.
    #[inline]
    pub fn operator(&self) -> Option<&'a str> {
        match self.data {
            NodeData::Operator(op) => Some(op),
            _ => None,
        }
    }
}

impl<'a> Serialize for Node<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut len = 2; // type, range
        if self.field != Field::None {
            len += 1;
        }
        if self.data != NodeData::None {
            len += 1;
        }
        if !self.children.is_empty() {
            len += 1;
        }

        let mut state = serializer.serialize_struct("Node", len)?;
        state.serialize_field("type", &self.node_type)?;
        state.serialize_field("range", &[self.span.start, self.span.end])?;

        if self.field != Field::None {
            state.serialize_field("field", &self.field)?;
        }

        match self.data {
            NodeData::None => {}
            NodeData::Identifier(name) => state.serialize_field("name", name)?,
            NodeData::Literal(literal) => state.serialize_field("raw", literal.raw)?,
            NodeData::Declaration(kind) => state.serialize_field("kind", &kind)?,
            NodeData::Operator(op) => state.serialize_field("operator", op)?,
            NodeData::Member { computed } | NodeData::Property { computed, .. } => {
                state.serialize_field("computed", &computed)?
            }
            NodeData::Method { kind, .. } => state.serialize_field("kind", &kind)?,
            NodeData::Directive(text) => state.serialize_field("directive", text)?,
        }

        if !self.children.is_empty() {
            state.serialize_field("children", &self.children)?;
        }

        state.end()
    }
}
