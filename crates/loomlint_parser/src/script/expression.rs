//! Expressions, by descending precedence.

use loomlint_ast::{Field, LiteralData, LiteralValue, Node, NodeData, NodeType, TokenKind};

use super::literal::{numeric_value, string_value};
use super::{Builder, ParseResult, in_field};

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=",
    "||=", "??=",
];

/// Binding power of a binary operator; higher binds tighter.
fn binary_precedence(operator: &str) -> Option<u8> {
    let precedence = match operator {
        "??" => 1,
        "||" => 2,
        "&&" => 3,
        "|" => 4,
        "^" => 5,
        "&" => 6,
        "==" | "!=" | "===" | "!==" => 7,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 8,
        "<<" | ">>" | ">>>" => 9,
        "+" | "-" => 10,
        "*" | "/" | "%" => 11,
        "**" => 12,
        _ => return None,
    };
    Some(precedence)
}

impl<'a> Builder<'a, '_> {
    /// Parses a comma-separated expression.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Node<'a>> {
        let start = self.start();
        let first = self.parse_assignment()?;
        if !self.at(",") {
            return Ok(first);
        }

        let mut expressions = vec![in_field(first, Field::Expressions)];
        while self.eat(",") {
            let next = self.parse_assignment()?;
            expressions.push(in_field(next, Field::Expressions));
        }
        Ok(self.finish_at(NodeType::SequenceExpression, start, expressions))
    }

    pub(super) fn parse_assignment(&mut self) -> ParseResult<Node<'a>> {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> ParseResult<Node<'a>> {
        if self.starts_arrow_function() {
            return self.parse_arrow_function();
        }

        let start = self.start();
        let left = self.parse_conditional()?;

        let Some(token) = self.peek() else {
            return Ok(left);
        };
        if token.kind != TokenKind::Punctuator || !ASSIGNMENT_OPERATORS.contains(&token.value) {
            return Ok(left);
        }
        if !matches!(
            left.node_type,
            NodeType::Identifier | NodeType::MemberExpression
        ) {
            return Err(self.error_at("Invalid left-hand side in assignment", left.span.start));
        }

        self.pos += 1;
        let right = self.parse_assignment()?;
        let children = vec![in_field(left, Field::Left), in_field(right, Field::Right)];
        Ok(self
            .finish_at(NodeType::AssignmentExpression, start, children)
            .with_data(NodeData::Operator(token.value)))
    }

    /// True if the upcoming tokens are `x =>` or `( ... ) =>`.
    fn starts_arrow_function(&self) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        if token.kind == TokenKind::Identifier {
            return self.peek_at(1).is_some_and(|next| next.value == "=>");
        }
        if token.value != "(" || token.kind != TokenKind::Punctuator {
            return false;
        }

        let mut depth = 0usize;
        for (offset, token) in self.tokens[self.pos..].iter().enumerate() {
            if token.kind != TokenKind::Punctuator {
                continue;
            }
            match token.value {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        return self
                            .peek_at(offset + 1)
                            .is_some_and(|next| next.value == "=>");
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn parse_arrow_function(&mut self) -> ParseResult<Node<'a>> {
        let start = self.start();
        let mut children = Vec::new();

        if self.eat("(") {
            while !self.at(")") {
                let param = self.identifier()?;
                children.push(in_field(param, Field::Params));
                if !self.eat(",") {
                    break;
                }
            }
            self.expect(")")?;
        } else {
            let param = self.identifier()?;
            children.push(in_field(param, Field::Params));
        }

        if self.newline_before_current() {
            return Err(self.error_at("Line break before arrow", self.start()));
        }
        self.expect("=>")?;

        let body = if self.at("{") {
            self.parse_function_body()?
        } else {
            self.parse_assignment()?
        };
        children.push(in_field(body, Field::Body));
        Ok(self.finish_at(NodeType::ArrowFunctionExpression, start, children))
    }

    fn parse_conditional(&mut self) -> ParseResult<Node<'a>> {
        let start = self.start();
        let test = self.parse_binary(0)?;
        if !self.eat("?") {
            return Ok(test);
        }

        let consequent = self.parse_assignment()?;
        self.expect(":")?;
        let alternate = self.parse_assignment()?;
        let children = vec![
            in_field(test, Field::Test),
            in_field(consequent, Field::Consequent),
            in_field(alternate, Field::Alternate),
        ];
        Ok(self.finish_at(NodeType::ConditionalExpression, start, children))
    }

    /// Precedence climbing over binary and logical operators.
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Node<'a>> {
        let start = self.start();
        let mut left = self.parse_unary()?;

        while let Some(token) = self.peek() {
            if !matches!(token.kind, TokenKind::Punctuator | TokenKind::Keyword) {
                break;
            }
            let Some(precedence) = binary_precedence(token.value) else {
                break;
            };
            if precedence <= min_precedence {
                break;
            }
            self.pos += 1;

            // `**` is right-associative.
            let next_min = if token.value == "**" {
                precedence - 1
            } else {
                precedence
            };
            let right = self.parse_binary(next_min)?;

            let node_type = if matches!(token.value, "||" | "&&" | "??") {
                NodeType::LogicalExpression
            } else {
                NodeType::BinaryExpression
            };
            let children = vec![in_field(left, Field::Left), in_field(right, Field::Right)];
            left = self
                .finish_at(node_type, start, children)
                .with_data(NodeData::Operator(token.value));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Node<'a>> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected_end());
        };
        let start = token.span.start;

        let is_unary = match token.kind {
            TokenKind::Punctuator => matches!(token.value, "!" | "~" | "+" | "-"),
            TokenKind::Keyword => matches!(token.value, "typeof" | "void" | "delete"),
            _ => false,
        };
        if is_unary {
            self.pos += 1;
            let argument = self.nested(Self::parse_unary)?;
            return Ok(self
                .finish_at(
                    NodeType::UnaryExpression,
                    start,
                    vec![in_field(argument, Field::Argument)],
                )
                .with_data(NodeData::Operator(token.value)));
        }

        if token.kind == TokenKind::Punctuator && matches!(token.value, "++" | "--") {
            self.pos += 1;
            let argument = self.parse_unary()?;
            return Ok(self
                .finish_at(
                    NodeType::UpdateExpression,
                    start,
                    vec![in_field(argument, Field::Argument)],
                )
                .with_data(NodeData::Operator(token.value)));
        }

        let argument = self.parse_left_hand_side()?;
        if (self.at("++") || self.at("--")) && !self.newline_before_current() {
            let operator = self.bump()?;
            return Ok(self
                .finish_at(
                    NodeType::UpdateExpression,
                    start,
                    vec![in_field(argument, Field::Argument)],
                )
                .with_data(NodeData::Operator(operator.value)));
        }
        Ok(argument)
    }

    /// Parses `new`, calls and member accesses.
    pub(super) fn parse_left_hand_side(&mut self) -> ParseResult<Node<'a>> {
        let start = self.start();
        let mut expression = if self.at("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            if self.eat(".") {
                let property = self.parse_property_name()?;
                expression = self.member(start, expression, property, false);
            } else if self.eat("[") {
                let property = self.parse_expression()?;
                self.expect("]")?;
                expression = self.member(start, expression, property, true);
            } else if self.at("(") {
                let mut children = vec![in_field(expression, Field::Callee)];
                self.parse_arguments(&mut children)?;
                expression = self.finish_at(NodeType::CallExpression, start, children);
            } else {
                return Ok(expression);
            }
        }
    }

    fn parse_new(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("new")?.span.start;
        let callee_start = self.start();
        let mut callee = if self.at("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            if self.eat(".") {
                let property = self.parse_property_name()?;
                callee = self.member(callee_start, callee, property, false);
            } else if self.eat("[") {
                let property = self.parse_expression()?;
                self.expect("]")?;
                callee = self.member(callee_start, callee, property, true);
            } else {
                break;
            }
        }

        let mut children = vec![in_field(callee, Field::Callee)];
        if self.at("(") {
            self.parse_arguments(&mut children)?;
        }
        Ok(self.finish_at(NodeType::NewExpression, start, children))
    }

    fn member(
        &mut self,
        start: u32,
        object: Node<'a>,
        property: Node<'a>,
        computed: bool,
    ) -> Node<'a> {
        let children = vec![
            in_field(object, Field::Object),
            in_field(property, Field::Property),
        ];
        self.finish_at(NodeType::MemberExpression, start, children)
            .with_data(NodeData::Member { computed })
    }

    fn parse_arguments(&mut self, children: &mut Vec<Node<'a>>) -> ParseResult<()> {
        self.expect("(")?;
        while !self.at(")") {
            let argument = self.parse_assignment()?;
            children.push(in_field(argument, Field::Arguments));
            if !self.eat(",") {
                break;
            }
        }
        self.expect(")")?;
        Ok(())
    }

    /// Parses an identifier name after `.`; keywords are allowed here.
    fn parse_property_name(&mut self) -> ParseResult<Node<'a>> {
        let token = self.bump()?;
        if !matches!(
            token.kind,
            TokenKind::Identifier | TokenKind::Keyword | TokenKind::Boolean | TokenKind::Null
        ) {
            return Err(self.unexpected(token));
        }
        Ok(self.leaf(NodeType::Identifier, &token, NodeData::Identifier(token.value)))
    }

    /// Parses an object or class member key, returning it with its
    /// `computed` flag.
    pub(super) fn parse_property_key(&mut self) -> ParseResult<(Node<'a>, bool)> {
        if self.eat("[") {
            let key = self.parse_assignment()?;
            self.expect("]")?;
            return Ok((key, true));
        }
        let key = match self.peek() {
            Some(token) if matches!(token.kind, TokenKind::String | TokenKind::Numeric) => {
                self.parse_primary()?
            }
            Some(_) => self.parse_property_name()?,
            None => return Err(self.unexpected_end()),
        };
        Ok((key, false))
    }

    fn parse_primary(&mut self) -> ParseResult<Node<'a>> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected_end());
        };

        match token.kind {
            TokenKind::Identifier => self.identifier(),
            TokenKind::Numeric => {
                self.pos += 1;
                let literal = LiteralData {
                    raw: token.value,
                    value: LiteralValue::Number(numeric_value(token.value)),
                };
                Ok(self.leaf(NodeType::Literal, &token, NodeData::Literal(literal)))
            }
            TokenKind::String => {
                self.pos += 1;
                let cooked = string_value(token.value)
                    .ok_or_else(|| self.error_at("Invalid escape sequence", token.span.start))?;
                let value = match cooked {
                    std::borrow::Cow::Borrowed(text) => text,
                    std::borrow::Cow::Owned(text) => self.arena.alloc_str(&text),
                };
                let literal = LiteralData {
                    raw: token.value,
                    value: LiteralValue::String(value),
                };
                Ok(self.leaf(NodeType::Literal, &token, NodeData::Literal(literal)))
            }
            TokenKind::Boolean | TokenKind::Null => {
                self.pos += 1;
                let value = match token.value {
                    "true" => LiteralValue::Boolean(true),
                    "false" => LiteralValue::Boolean(false),
                    _ => LiteralValue::Null,
                };
                let literal = LiteralData {
                    raw: token.value,
                    value,
                };
                Ok(self.leaf(NodeType::Literal, &token, NodeData::Literal(literal)))
            }
            TokenKind::Keyword => match token.value {
                "this" => {
                    self.pos += 1;
                    Ok(self.leaf(NodeType::ThisExpression, &token, NodeData::None))
                }
                "function" => self.parse_function(NodeType::FunctionExpression),
                "class" => self.parse_class(NodeType::ClassExpression),
                _ => Err(self.unexpected(token)),
            },
            TokenKind::Punctuator => match token.value {
                "(" => {
                    self.pos += 1;
                    let expression = self.parse_expression()?;
                    self.expect(")")?;
                    Ok(expression)
                }
                "[" => self.parse_array(),
                "{" => self.parse_object(),
                _ => Err(self.unexpected(token)),
            },
        }
    }

    fn parse_array(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("[")?.span.start;
        let mut elements = Vec::new();
        while !self.at("]") {
            if self.eat(",") {
                // Elision.
                continue;
            }
            let element = self.parse_assignment()?;
            elements.push(in_field(element, Field::Elements));
            if !self.eat(",") {
                break;
            }
        }
        self.expect("]")?;
        Ok(self.finish_at(NodeType::ArrayExpression, start, elements))
    }

    fn parse_object(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("{")?.span.start;
        let mut properties = Vec::new();
        while !self.at("}") {
            let property = self.parse_object_property()?;
            properties.push(in_field(property, Field::Properties));
            if !self.eat(",") {
                break;
            }
        }
        self.expect("}")?;
        Ok(self.finish_at(NodeType::ObjectExpression, start, properties))
    }

    fn parse_object_property(&mut self) -> ParseResult<Node<'a>> {
        let start = self.start();
        let (key, computed) = self.parse_property_key()?;

        let (value, shorthand) = if self.eat(":") {
            (self.parse_assignment()?, false)
        } else if self.at("(") {
            (self.parse_method_value()?, false)
        } else if !computed && key.node_type == NodeType::Identifier {
            (key, true)
        } else {
            return Err(match self.peek() {
                Some(token) => self.unexpected(token),
                None => self.unexpected_end(),
            });
        };

        let children = if shorthand {
            vec![in_field(key, Field::Value)]
        } else {
            vec![in_field(key, Field::Key), in_field(value, Field::Value)]
        };
        Ok(self
            .finish_at(NodeType::Property, start, children)
            .with_data(NodeData::Property {
                computed,
                shorthand,
            }))
    }
}
