//! Statements, declarations and class bodies.

use loomlint_ast::{
    DeclarationKind, Field, LiteralValue, MethodKind, Node, NodeData, NodeType, Span, TokenKind,
};

use super::{Builder, ParseResult, in_field};

impl<'a> Builder<'a, '_> {
    /// Parses statements until `}` or end of input.
    ///
    /// With `directives` set, leading string-literal statements form the
    /// directive prologue and are tagged with [`NodeData::Directive`].
    pub(super) fn parse_statement_list(&mut self, directives: bool) -> ParseResult<Vec<Node<'a>>> {
        let mut body = Vec::new();
        let mut in_prologue = directives;

        while self.peek().is_some() && !self.at("}") {
            let mut statement = self.parse_statement()?;
            if in_prologue {
                match directive_text(&statement, self.source) {
                    Some(text) => statement = statement.with_data(NodeData::Directive(text)),
                    None => in_prologue = false,
                }
            }
            body.push(in_field(statement, Field::Body));
        }

        Ok(body)
    }

    pub(super) fn parse_statement(&mut self) -> ParseResult<Node<'a>> {
        self.nested(Self::statement)
    }

    fn statement(&mut self) -> ParseResult<Node<'a>> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected_end());
        };

        match (token.kind, token.value) {
            (TokenKind::Punctuator, "{") => self.parse_block(),
            (TokenKind::Punctuator, ";") => {
                self.pos += 1;
                Ok(self.leaf(NodeType::EmptyStatement, &token, NodeData::None))
            }
            (TokenKind::Keyword, "var") => self.parse_variable_statement(DeclarationKind::Var),
            (TokenKind::Keyword, "const") => self.parse_variable_statement(DeclarationKind::Const),
            (TokenKind::Identifier, "let") if self.starts_let_declaration() => {
                self.parse_variable_statement(DeclarationKind::Let)
            }
            (TokenKind::Keyword, "function") => self.parse_function(NodeType::FunctionDeclaration),
            (TokenKind::Identifier, "async")
                if self.peek_at(1).is_some_and(|t| t.value == "function")
                    && !self.newline_before.get(self.pos + 1).copied().unwrap_or(true) =>
            {
                self.parse_function(NodeType::FunctionDeclaration)
            }
            (TokenKind::Keyword, "class") => self.parse_class(NodeType::ClassDeclaration),
            (TokenKind::Keyword, "if") => self.parse_if(),
            (TokenKind::Keyword, "while") => self.parse_while(),
            (TokenKind::Keyword, "do") => self.parse_do_while(),
            (TokenKind::Keyword, "for") => self.parse_for(),
            (TokenKind::Keyword, "switch") => self.parse_switch(),
            (TokenKind::Keyword, "return") => self.parse_return(),
            (TokenKind::Keyword, "break") => self.parse_jump(NodeType::BreakStatement),
            (TokenKind::Keyword, "continue") => self.parse_jump(NodeType::ContinueStatement),
            (TokenKind::Keyword, "throw") => self.parse_throw(),
            (TokenKind::Keyword, "try") => self.parse_try(),
            (TokenKind::Keyword, "debugger" | "with" | "import" | "export") => Err(
                self.error_at(format!("'{}' is not supported", token.value), token.span.start),
            ),
            (TokenKind::Identifier, _) if self.peek_at(1).is_some_and(|t| t.value == ":") => {
                self.parse_labeled()
            }
            _ => self.parse_expression_statement(),
        }
    }

    pub(super) fn parse_block(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("{")?.span.start;
        let body = self.parse_statement_list(false)?;
        self.expect("}")?;
        Ok(self.finish_at(NodeType::BlockStatement, start, body))
    }

    /// Parses a function body block, which has its own directive prologue.
    pub(super) fn parse_function_body(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("{")?.span.start;
        let body = self.parse_statement_list(true)?;
        self.expect("}")?;
        Ok(self.finish_at(NodeType::BlockStatement, start, body))
    }

    fn starts_let_declaration(&self) -> bool {
        self.options.has_block_scoping()
            && self.peek_at(1).is_some_and(|next| {
                next.kind == TokenKind::Identifier || matches!(next.value, "[" | "{")
            })
    }

    fn parse_variable_statement(&mut self, kind: DeclarationKind) -> ParseResult<Node<'a>> {
        let start = self.start();
        let node = self.parse_variable_declaration(kind, start)?;
        self.consume_semicolon()?;
        // The statement includes its semicolon.
        Ok(Node {
            span: Span::new(node.span.start, self.prev_end()),
            ..node
        })
    }

    /// Parses `kind a = 1, b` without a terminator (also used in `for`).
    pub(super) fn parse_variable_declaration(
        &mut self,
        kind: DeclarationKind,
        start: u32,
    ) -> ParseResult<Node<'a>> {
        self.bump()?;
        let mut declarators = Vec::new();
        loop {
            let declarator_start = self.start();
            let id = self.identifier()?;
            let mut children = vec![in_field(id, Field::Id)];
            if self.eat("=") {
                let init = self.parse_assignment()?;
                children.push(in_field(init, Field::Init));
            } else if kind == DeclarationKind::Const {
                return Err(self.error_at("Missing initializer in const declaration", id.span.end));
            }
            let declarator =
                self.finish_at(NodeType::VariableDeclarator, declarator_start, children);
            declarators.push(in_field(declarator, Field::Declarations));
            if !self.eat(",") {
                break;
            }
        }
        Ok(self
            .finish_at(NodeType::VariableDeclaration, start, declarators)
            .with_data(NodeData::Declaration(kind)))
    }

    /// Parses `[async] function [*] [name] (params) { body }`.
    pub(super) fn parse_function(&mut self, node_type: NodeType) -> ParseResult<Node<'a>> {
        let start = self.start();
        if self.at_word("async") {
            self.pos += 1;
        }
        self.expect("function")?;
        self.eat("*");

        let mut children = Vec::new();
        if self.at_kind(TokenKind::Identifier) {
            let id = self.identifier()?;
            children.push(in_field(id, Field::Id));
        } else if node_type == NodeType::FunctionDeclaration {
            return Err(match self.peek() {
                Some(token) => self.unexpected(token),
                None => self.unexpected_end(),
            });
        }
        self.parse_params_and_body(&mut children)?;
        Ok(self.finish_at(node_type, start, children))
    }

    /// Parses `(a, b) { ... }` into `children`.
    pub(super) fn parse_params_and_body(&mut self, children: &mut Vec<Node<'a>>) -> ParseResult<()> {
        self.expect("(")?;
        while !self.at(")") {
            let param = self.identifier()?;
            children.push(in_field(param, Field::Params));
            if !self.eat(",") {
                break;
            }
        }
        self.expect(")")?;
        let body = self.parse_function_body()?;
        children.push(in_field(body, Field::Body));
        Ok(())
    }

    /// Parses a class declaration or expression.
    pub(super) fn parse_class(&mut self, node_type: NodeType) -> ParseResult<Node<'a>> {
        let start = self.expect("class")?.span.start;
        let mut children = Vec::new();

        if self.at_kind(TokenKind::Identifier) {
            let id = self.identifier()?;
            children.push(in_field(id, Field::Id));
        } else if node_type == NodeType::ClassDeclaration {
            return Err(match self.peek() {
                Some(token) => self.unexpected(token),
                None => self.unexpected_end(),
            });
        }

        if self.eat("extends") {
            let super_class = self.parse_left_hand_side()?;
            children.push(in_field(super_class, Field::SuperClass));
        }

        let body = self.parse_class_body()?;
        children.push(in_field(body, Field::Body));
        Ok(self.finish_at(node_type, start, children))
    }

    fn parse_class_body(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("{")?.span.start;
        let mut members = Vec::new();

        while !self.at("}") {
            if self.eat(";") {
                continue;
            }
            let member = self.parse_class_member()?;
            members.push(in_field(member, Field::Body));
        }

        self.expect("}")?;
        Ok(self.finish_at(NodeType::ClassBody, start, members))
    }

    fn parse_class_member(&mut self) -> ParseResult<Node<'a>> {
        let start = self.start();

        let is_static = self.at_word("static") && !self.next_ends_member_name();
        if is_static {
            self.pos += 1;
            if self.at("{") {
                if !self.options.has_static_blocks() {
                    return Err(self.error_at("Class static blocks are not supported", start));
                }
                self.pos += 1;
                let body = self.parse_statement_list(false)?;
                self.expect("}")?;
                return Ok(self.finish_at(NodeType::StaticBlock, start, body));
            }
        }

        let mut kind = MethodKind::Method;
        if (self.at_word("get") || self.at_word("set")) && !self.next_ends_member_name() {
            kind = if self.at_word("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.pos += 1;
        } else if self.at_word("async") && !self.next_ends_member_name() {
            self.pos += 1;
        }

        let (key, computed) = self.parse_property_key()?;
        if !computed && !is_static && key.name() == Some("constructor") {
            kind = MethodKind::Constructor;
        }

        if self.at("(") {
            let value = self.parse_method_value()?;
            let children = vec![in_field(key, Field::Key), in_field(value, Field::Value)];
            return Ok(self
                .finish_at(NodeType::MethodDefinition, start, children)
                .with_data(NodeData::Method { kind, is_static }));
        }

        let mut children = vec![in_field(key, Field::Key)];
        if self.eat("=") {
            let value = self.parse_assignment()?;
            children.push(in_field(value, Field::Value));
        }
        self.consume_semicolon()?;
        Ok(self
            .finish_at(NodeType::PropertyDefinition, start, children)
            .with_data(NodeData::Property {
                computed,
                shorthand: false,
            }))
    }

    /// True if the token after the current one ends a member name, meaning
    /// the current contextual word (`static`, `get`, ...) is the name itself.
    fn next_ends_member_name(&self) -> bool {
        self.peek_at(1)
            .is_none_or(|next| matches!(next.value, "(" | "=" | ";" | "}"))
    }

    /// Parses `(params) { body }` as a `FunctionExpression`.
    pub(super) fn parse_method_value(&mut self) -> ParseResult<Node<'a>> {
        let start = self.start();
        let mut children = Vec::new();
        self.parse_params_and_body(&mut children)?;
        Ok(self.finish_at(NodeType::FunctionExpression, start, children))
    }

    fn parse_if(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("if")?.span.start;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement()?;
        let mut children = vec![
            in_field(test, Field::Test),
            in_field(consequent, Field::Consequent),
        ];
        if self.eat("else") {
            let alternate = self.parse_statement()?;
            children.push(in_field(alternate, Field::Alternate));
        }
        Ok(self.finish_at(NodeType::IfStatement, start, children))
    }

    fn parse_while(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("while")?.span.start;
        let test = self.parse_paren_expression()?;
        let body = self.parse_statement()?;
        let children = vec![in_field(test, Field::Test), in_field(body, Field::Body)];
        Ok(self.finish_at(NodeType::WhileStatement, start, children))
    }

    fn parse_do_while(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("do")?.span.start;
        let body = self.parse_statement()?;
        self.expect("while")?;
        let test = self.parse_paren_expression()?;
        // A semicolon is always inserted after `do ... while (...)`.
        self.eat(";");
        let children = vec![in_field(body, Field::Body), in_field(test, Field::Test)];
        Ok(self.finish_at(NodeType::DoWhileStatement, start, children))
    }

    fn parse_for(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("for")?.span.start;
        self.expect("(")?;
        let mut children = Vec::new();

        if !self.at(";") {
            let init_start = self.start();
            let init = if self.at("var") {
                self.parse_variable_declaration(DeclarationKind::Var, init_start)?
            } else if self.at("const") {
                self.parse_variable_declaration(DeclarationKind::Const, init_start)?
            } else if self.at_word("let") && self.starts_let_declaration() {
                self.parse_variable_declaration(DeclarationKind::Let, init_start)?
            } else {
                self.parse_expression()?
            };
            if self.at("in") || self.at_word("of") {
                return Err(self.error_at("for-in and for-of loops are not supported", start));
            }
            children.push(in_field(init, Field::Init));
        }
        self.expect(";")?;

        if !self.at(";") {
            let test = self.parse_expression()?;
            children.push(in_field(test, Field::Test));
        }
        self.expect(";")?;

        if !self.at(")") {
            let update = self.parse_expression()?;
            children.push(in_field(update, Field::Update));
        }
        self.expect(")")?;

        let body = self.parse_statement()?;
        children.push(in_field(body, Field::Body));
        Ok(self.finish_at(NodeType::ForStatement, start, children))
    }

    fn parse_switch(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("switch")?.span.start;
        let discriminant = self.parse_paren_expression()?;
        let mut children = vec![in_field(discriminant, Field::Discriminant)];

        self.expect("{")?;
        let mut seen_default = false;
        while !self.at("}") {
            let case_start = self.start();
            let mut case_children = Vec::new();
            if self.eat("case") {
                let test = self.parse_expression()?;
                case_children.push(in_field(test, Field::Test));
            } else {
                let token = self.expect("default")?;
                if seen_default {
                    return Err(self.error_at("Multiple default clauses", token.span.start));
                }
                seen_default = true;
            }
            self.expect(":")?;

            while self.peek().is_some() && !self.at("case") && !self.at("default") && !self.at("}")
            {
                let statement = self.parse_statement()?;
                case_children.push(in_field(statement, Field::Consequent));
            }
            let case = self.finish_at(NodeType::SwitchCase, case_start, case_children);
            children.push(in_field(case, Field::Cases));
        }
        self.expect("}")?;

        Ok(self.finish_at(NodeType::SwitchStatement, start, children))
    }

    fn parse_return(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("return")?.span.start;
        let mut children = Vec::new();
        if !self.at(";") && !self.at("}") && self.peek().is_some() && !self.newline_before_current()
        {
            let argument = self.parse_expression()?;
            children.push(in_field(argument, Field::Argument));
        }
        self.consume_semicolon()?;
        Ok(self.finish_at(NodeType::ReturnStatement, start, children))
    }

    fn parse_jump(&mut self, node_type: NodeType) -> ParseResult<Node<'a>> {
        let start = self.bump()?.span.start;
        let mut children = Vec::new();
        if self.at_kind(TokenKind::Identifier) && !self.newline_before_current() {
            let label = self.identifier()?;
            children.push(in_field(label, Field::Label));
        }
        self.consume_semicolon()?;
        Ok(self.finish_at(node_type, start, children))
    }

    fn parse_throw(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("throw")?.span.start;
        if self.newline_before_current() {
            return Err(self.error_at("Illegal newline after throw", self.prev_end()));
        }
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(self.finish_at(
            NodeType::ThrowStatement,
            start,
            vec![in_field(argument, Field::Argument)],
        ))
    }

    fn parse_try(&mut self) -> ParseResult<Node<'a>> {
        let start = self.expect("try")?.span.start;
        let block = self.parse_block()?;
        let mut children = vec![in_field(block, Field::Block)];

        if self.at("catch") {
            let catch_start = self.bump()?.span.start;
            let mut clause = Vec::new();
            if self.eat("(") {
                let param = self.identifier()?;
                clause.push(in_field(param, Field::Param));
                self.expect(")")?;
            }
            let body = self.parse_block()?;
            clause.push(in_field(body, Field::Body));
            let handler = self.finish_at(NodeType::CatchClause, catch_start, clause);
            children.push(in_field(handler, Field::Handler));
        }

        if self.eat("finally") {
            let finalizer = self.parse_block()?;
            children.push(in_field(finalizer, Field::Finalizer));
        }

        if children.len() == 1 {
            return Err(match self.peek() {
                Some(token) => self.error_at("Missing catch or finally after try", token.span.start),
                None => self.unexpected_end(),
            });
        }
        Ok(self.finish_at(NodeType::TryStatement, start, children))
    }

    fn parse_labeled(&mut self) -> ParseResult<Node<'a>> {
        let start = self.start();
        let label = self.identifier()?;
        self.expect(":")?;
        let body = self.parse_statement()?;
        let children = vec![in_field(label, Field::Label), in_field(body, Field::Body)];
        Ok(self.finish_at(NodeType::LabeledStatement, start, children))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Node<'a>> {
        let start = self.start();
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(self.finish_at(
            NodeType::ExpressionStatement,
            start,
            vec![in_field(expression, Field::Expression)],
        ))
    }

    fn parse_paren_expression(&mut self) -> ParseResult<Node<'a>> {
        self.expect("(")?;
        let expression = self.parse_expression()?;
        self.expect(")")?;
        Ok(expression)
    }
}

/// Returns the directive text if `statement` is a bare string literal
/// expression statement.
fn directive_text<'a>(statement: &Node<'a>, source: &'a str) -> Option<&'a str> {
    if statement.node_type != NodeType::ExpressionStatement {
        return None;
    }
    let expression = statement.child(Field::Expression)?;
    let literal = expression.literal()?;
    if !matches!(literal.value, LiteralValue::String(_))
        || expression.span.start != statement.span.start
    {
        return None;
    }
    let raw = source.get(expression.span.range())?;
    raw.get(1..raw.len() - 1)
}
