//! Listener keys: node types and a small selector language.
//!
//! Supported forms:
//!
//! - `BlockStatement`: exact node type
//! - `*`: any node
//! - `BlockStatement, StaticBlock`: alternatives
//! - `ClassBody > StaticBlock`: a node whose parent matches
//! - `FunctionDeclaration Identifier`: a node with a matching ancestor
//! - a trailing `:exit` on the whole key fires the listener on exit

use std::fmt;

use loomlint_ast::{Node, NodeType};
use thiserror::Error;

/// Errors from compiling a listener key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),

    #[error("malformed selector `{0}`")]
    Malformed(String),
}

/// A compiled selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Any,
    Type(NodeType),
    /// Matches if any alternative matches.
    Alternatives(Vec<Selector>),
    /// `parent > node`
    Child {
        parent: Box<Selector>,
        node: Box<Selector>,
    },
    /// `ancestor node`
    Descendant {
        ancestor: Box<Selector>,
        node: Box<Selector>,
    },
}

impl Selector {
    /// Compiles a selector without the `:exit` suffix.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        for part in source.split(',') {
            alternatives.push(parse_compound(part, source)?);
        }
        match alternatives.len() {
            0 => Err(SelectorError::Empty),
            1 => Ok(alternatives.remove(0)),
            _ => Ok(Selector::Alternatives(alternatives)),
        }
    }

    /// Tests `node`, whose ancestors (root first, parent last) are
    /// `ancestors`.
    pub fn matches(&self, node: &Node<'_>, ancestors: &[&Node<'_>]) -> bool {
        match self {
            Selector::Any => true,
            Selector::Type(node_type) => node.node_type == *node_type,
            Selector::Alternatives(alternatives) => {
                alternatives.iter().any(|s| s.matches(node, ancestors))
            }
            Selector::Child { parent, node: inner } => {
                let Some((last, rest)) = ancestors.split_last() else {
                    return false;
                };
                inner.matches(node, ancestors) && parent.matches(last, rest)
            }
            Selector::Descendant {
                ancestor,
                node: inner,
            } => {
                inner.matches(node, ancestors)
                    && (0..ancestors.len())
                        .rev()
                        .any(|i| ancestor.matches(ancestors[i], &ancestors[..i]))
            }
        }
    }

    /// Node types this selector can match, or `None` for any type.
    ///
    /// Used to index listeners by type so traversal never evaluates a
    /// selector against a node it cannot match.
    pub fn subject_types(&self) -> Option<Vec<NodeType>> {
        match self {
            Selector::Any => None,
            Selector::Type(node_type) => Some(vec![*node_type]),
            Selector::Alternatives(alternatives) => {
                let mut types = Vec::new();
                for alternative in alternatives {
                    types.extend(alternative.subject_types()?);
                }
                types.sort();
                types.dedup();
                Some(types)
            }
            Selector::Child { node, .. } | Selector::Descendant { node, .. } => {
                node.subject_types()
            }
        }
    }

    /// True if matching needs more than the node itself.
    pub fn needs_ancestors(&self) -> bool {
        match self {
            Selector::Any | Selector::Type(_) => false,
            Selector::Alternatives(alternatives) => alternatives.iter().any(Self::needs_ancestors),
            Selector::Child { .. } | Selector::Descendant { .. } => true,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Any => f.write_str("*"),
            Selector::Type(node_type) => f.write_str(node_type.as_str()),
            Selector::Alternatives(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{alternative}")?;
                }
                Ok(())
            }
            Selector::Child { parent, node } => write!(f, "{parent} > {node}"),
            Selector::Descendant { ancestor, node } => write!(f, "{ancestor} {node}"),
        }
    }
}

/// Parses one comma-free alternative such as `A > B C`.
fn parse_compound(part: &str, whole: &str) -> Result<Selector, SelectorError> {
    let spaced = part.replace('>', " > ");
    let mut words = spaced.split_whitespace();

    let Some(first) = words.next() else {
        return Err(if whole.trim().is_empty() {
            SelectorError::Empty
        } else {
            SelectorError::Malformed(whole.to_string())
        });
    };
    let mut selector = parse_simple(first, whole)?;

    while let Some(word) = words.next() {
        if word == ">" {
            let Some(next) = words.next() else {
                return Err(SelectorError::Malformed(whole.to_string()));
            };
            selector = Selector::Child {
                parent: Box::new(selector),
                node: Box::new(parse_simple(next, whole)?),
            };
        } else {
            selector = Selector::Descendant {
                ancestor: Box::new(selector),
                node: Box::new(parse_simple(word, whole)?),
            };
        }
    }
    Ok(selector)
}

fn parse_simple(word: &str, whole: &str) -> Result<Selector, SelectorError> {
    if word == "*" {
        return Ok(Selector::Any);
    }
    if word == ">" || !word.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SelectorError::Malformed(whole.to_string()));
    }
    NodeType::from_name(word)
        .map(Selector::Type)
        .ok_or_else(|| SelectorError::UnknownNodeType(word.to_string()))
}

/// When a listener fires relative to the node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Exit,
}

/// A compiled listener key: a selector plus its phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerKey {
    pub selector: Selector,
    pub phase: Phase,
}

impl ListenerKey {
    /// Compiles a key such as `"BlockStatement:exit"`.
    pub fn parse(key: &str) -> Result<Self, SelectorError> {
        let trimmed = key.trim();
        let (selector, phase) = match trimmed.strip_suffix(":exit") {
            Some(selector) => (selector, Phase::Exit),
            None => (trimmed, Phase::Enter),
        };
        Ok(Self {
            selector: Selector::parse(selector)?,
            phase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomlint_ast::{AstArena, NodeId, Span};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("BlockStatement", "BlockStatement")]
    #[case("*", "*")]
    #[case("BlockStatement,StaticBlock", "BlockStatement, StaticBlock")]
    #[case("ClassBody>StaticBlock", "ClassBody > StaticBlock")]
    #[case("  Program   BlockStatement ", "Program BlockStatement")]
    #[case("Program > * Identifier", "Program > * Identifier")]
    fn test_parse_round_trips_display(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(Selector::parse(source).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("", SelectorError::Empty)]
    #[case("Blok", SelectorError::UnknownNodeType("Blok".into()))]
    #[case("Program >", SelectorError::Malformed("Program >".into()))]
    #[case("BlockStatement[body]", SelectorError::Malformed("BlockStatement[body]".into()))]
    #[case("BlockStatement,", SelectorError::Malformed("BlockStatement,".into()))]
    fn test_parse_errors(#[case] source: &str, #[case] expected: SelectorError) {
        assert_eq!(Selector::parse(source).unwrap_err(), expected);
    }

    #[test]
    fn test_listener_key_phase() {
        let key = ListenerKey::parse("BlockStatement:exit").unwrap();
        assert_eq!(key.phase, Phase::Exit);
        assert_eq!(key.selector, Selector::Type(NodeType::BlockStatement));

        let key = ListenerKey::parse("BlockStatement, StaticBlock").unwrap();
        assert_eq!(key.phase, Phase::Enter);
    }

    #[test]
    fn test_subject_types() {
        let selector = Selector::parse("StaticBlock, BlockStatement").unwrap();
        assert_eq!(
            selector.subject_types(),
            Some(vec![NodeType::BlockStatement, NodeType::StaticBlock])
        );
        assert_eq!(Selector::parse("Program *").unwrap().subject_types(), None);
        assert_eq!(
            Selector::parse("* > Identifier").unwrap().subject_types(),
            Some(vec![NodeType::Identifier])
        );
    }

    #[test]
    fn test_matches_with_ancestors() {
        let arena = AstArena::new();
        let id = Node::leaf(NodeId(0), NodeType::Identifier, Span::new(6, 7));
        let block = arena.alloc(Node::new(
            NodeId(1),
            NodeType::BlockStatement,
            Span::new(4, 9),
            arena.alloc_slice_copy(&[id]),
        ));
        let program = arena.alloc(Node::new(
            NodeId(2),
            NodeType::Program,
            Span::new(0, 9),
            arena.alloc_slice_copy(&[*block]),
        ));
        let ident = &block.children[0];
        let ancestors = [&*program, &*block];

        let child = Selector::parse("BlockStatement > Identifier").unwrap();
        assert!(child.matches(ident, &ancestors));
        assert!(!Selector::parse("Program > Identifier")
            .unwrap()
            .matches(ident, &ancestors));
        assert!(Selector::parse("Program Identifier")
            .unwrap()
            .matches(ident, &ancestors));
        assert!(Selector::parse("Program > BlockStatement > Identifier")
            .unwrap()
            .matches(ident, &ancestors));
        assert!(!Selector::parse("Identifier > Identifier")
            .unwrap()
            .matches(ident, &ancestors));
        assert!(!child.matches(program, &[]));
        assert!(child.needs_ancestors());
        assert!(!Selector::parse("*").unwrap().needs_ancestors());
    }
}
