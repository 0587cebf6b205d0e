//! no-lone-blocks rule: Disallow unnecessary nested blocks.
//!
//! A block is redundant when it sits directly in a statement list (the
//! program, another block, a class static block or a switch case) without
//! introducing a scope anyone uses.
//!
//! Before ES2015 every such block is reported. From ES2015 on, a block that
//! directly declares `let`, `const`, a class, or a function in strict mode
//! code keeps its bindings local and is left alone.
//!
//! A block that is the only statement of a `case` clause is conventional and
//! never reported.
//!
//! # Examples
//!
//! ```js
//! {}                       // redundantBlock
//! if (foo) { bar(); {} }   // redundantNestedBlock
//! { let x = 1; }           // ok (ES2015+)
//! ```

use loomlint_ast::{DeclarationKind, Field, Node, NodeId, NodeType};
use loomlint_core::{
    ListenerMap, Report, Rule, RuleContext, RuleError, RuleKind, RuleMeta, RuleResult,
};
use serde_json::json;

const MESSAGES: &[(&str, &str)] = &[
    ("redundantBlock", "Block is redundant."),
    ("redundantNestedBlock", "Nested block is redundant."),
];

/// Disallows unnecessary nested blocks.
pub struct NoLoneBlocks {
    meta: RuleMeta,
}

impl NoLoneBlocks {
    pub const NAME: &'static str = "no-lone-blocks";

    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new(Self::NAME, MESSAGES)
                .description("Disallow unnecessary nested blocks")
                .kind(RuleKind::Suggestion)
                .schema(json!([])),
        }
    }
}

impl Default for NoLoneBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoLoneBlocks {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create<'a>(&self, context: &RuleContext<'a>) -> Result<ListenerMap<'a>, RuleError> {
        if !context.language().has_block_scoping() {
            return ListenerMap::stateless()
                .on("BlockStatement", |_, node, context| {
                    if is_lone_block(node, context) {
                        report(node, context)?;
                    }
                    Ok(())
                })
                .build();
        }

        // Stack of lone blocks still open; a block-scoped declaration pops
        // its directly enclosing block.
        ListenerMap::builder(Vec::<NodeId>::new())
            .on("BlockStatement, StaticBlock", |lone, node, context| {
                if is_lone_block(node, context) {
                    lone.push(node.id);
                }
                Ok(())
            })
            .on_exit("BlockStatement", |lone, node, context| {
                if lone.last() == Some(&node.id) {
                    lone.pop();
                    return report(node, context);
                }
                let only_statement = context
                    .parent(node)
                    .is_some_and(|parent| is_block(parent) && parent.children_in(Field::Body).count() == 1);
                if only_statement {
                    report(node, context)?;
                }
                Ok(())
            })
            .on("VariableDeclaration", |lone, node, context| {
                if node.declaration_kind() != Some(DeclarationKind::Var) {
                    mark_scoped(lone, node, context);
                }
                Ok(())
            })
            .on("FunctionDeclaration", |lone, node, context| {
                if context.is_strict(node) {
                    mark_scoped(lone, node, context);
                }
                Ok(())
            })
            .on("ClassDeclaration", |lone, node, context| {
                mark_scoped(lone, node, context);
                Ok(())
            })
            .build()
    }
}

fn is_block(node: &Node<'_>) -> bool {
    matches!(node.node_type, NodeType::BlockStatement | NodeType::StaticBlock)
}

fn is_lone_block(node: &Node<'_>, context: &RuleContext<'_>) -> bool {
    let Some(parent) = context.parent(node) else {
        return false;
    };
    match parent.node_type {
        NodeType::BlockStatement | NodeType::StaticBlock | NodeType::Program => true,
        NodeType::SwitchCase => {
            let mut consequent = parent.children_in(Field::Consequent);
            let sole = matches!(
                (consequent.next(), consequent.next()),
                (Some(first), None) if first.id == node.id
            );
            !sole
        }
        _ => false,
    }
}

/// The declaration needs its enclosing block, so that block is no longer a
/// candidate.
fn mark_scoped(lone: &mut Vec<NodeId>, node: &Node<'_>, context: &RuleContext<'_>) {
    let Some(parent) = context.parent(node) else {
        return;
    };
    if lone.last() == Some(&parent.id) {
        lone.pop();
    }
}

fn report(node: &Node<'_>, context: &mut RuleContext<'_>) -> RuleResult {
    let message_id = if context.parent(node).is_some_and(is_block) {
        "redundantNestedBlock"
    } else {
        "redundantBlock"
    };
    context.report(Report::node(node, message_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomlint_core::LanguageOptions;
    use loomlint_tester::{ExpectedError, InvalidCase, RuleTester, TestCases, ValidCase};
    use std::sync::Arc;

    fn redundant(line: u32) -> ExpectedError {
        ExpectedError::message_id("redundantBlock")
            .node_type(NodeType::BlockStatement)
            .line(line)
    }

    fn nested(line: u32) -> ExpectedError {
        ExpectedError::message_id("redundantNestedBlock")
            .node_type(NodeType::BlockStatement)
            .line(line)
    }

    #[test]
    fn test_reports_whole_block_span() {
        RuleTester::new().ecma(5).run(
            Arc::new(NoLoneBlocks::new()),
            &TestCases::new().invalid([
                InvalidCase::new("{}").error(redundant(1).column(1).end(1, 3)),
                InvalidCase::new("foo();\n  {\n  }").error(redundant(2).column(3).end(3, 4)),
            ]),
        );
    }

    #[test]
    fn test_es5_reports_block_scoped_declarations() {
        RuleTester::new().ecma(5).run(
            Arc::new(NoLoneBlocks::new()),
            &TestCases::new().invalid([
                InvalidCase::new("{ function bar() {} }").error(redundant(1)),
                InvalidCase::new("{ \n{ } }").error(redundant(1)).error(nested(2)),
            ]),
        );
    }

    #[test]
    fn test_strict_function_keeps_block() {
        RuleTester::new().run(
            Arc::new(NoLoneBlocks::new()),
            &TestCases::new().valid([
                ValidCase::new("{ function bar() {} }")
                    .with_language(LanguageOptions::new(2015).module()),
                ValidCase::new("{ function bar() { 'use strict'; } }").ecma(2015),
            ]),
        );
    }

    #[test]
    fn test_messages() {
        let rule = NoLoneBlocks::new();
        assert_eq!(rule.meta().message("redundantBlock"), Some("Block is redundant."));
        assert_eq!(
            rule.meta().message("redundantNestedBlock"),
            Some("Nested block is redundant.")
        );
        assert!(!rule.meta().fixable);
    }
}
