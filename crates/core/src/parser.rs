use crate::ast::{
    BinaryOp, Expr, ExprId, ExprKind, Function, Item, Parameter, Program, Stmt, UnaryOp,
};
use crate::error::{Diagnostic, Diagnostics};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::types::Type;

/// Recursive-descent parser for Nova.
///
/// Parsing stops at the first diagnostic; the partial tree built up to
/// that point is discarded and the diagnostics are returned instead.
pub struct Parser {
    lexer: Lexer,
    current: Token,
    diagnostics: Diagnostics,
    next_expr_id: u32,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            diagnostics: Diagnostics::new(),
            next_expr_id: 0,
        }
    }

    pub fn parse(mut self) -> Result<Program, Diagnostics> {
        let mut items = Vec::new();
        while !self.check(TokenKind::Eof) && !self.check(TokenKind::Error) {
            if self.check(TokenKind::Function) {
                if let Some(function) = self.parse_function() {
                    items.push(Item::Function(function));
                }
            } else if let Some(stmt) = self.parse_statement() {
                items.push(Item::Statement(stmt));
            }
            if !self.diagnostics.is_empty() {
                break;
            }
        }
        // An error token at the top level never reaches parse_primary,
        // so surface the lexer's message here.
        if self.check(TokenKind::Error) && self.diagnostics.is_empty() {
            let message = self.current.text.clone();
            self.error(message);
        }
        if self.diagnostics.is_empty() {
            Ok(Program { items })
        } else {
            Err(self.diagnostics)
        }
    }

    fn parse_function(&mut self) -> Option<Function> {
        self.consume(TokenKind::Function, "Expected 'function'");
        let return_type = self.parse_type()?;
        if !self.check(TokenKind::Ident) {
            self.error("Expected function name");
            return None;
        }
        let name = self.current.text.clone();
        self.advance();
        self.consume(TokenKind::LeftParen, "Expected '('");
        let mut parameters = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let ty = self.parse_type()?;
                if !self.check(TokenKind::Ident) {
                    self.error("Expected parameter name");
                    return None;
                }
                let param_name = self.current.text.clone();
                self.advance();
                parameters.push(Parameter {
                    ty,
                    name: param_name,
                });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')'");
        self.consume(TokenKind::LeftBrace, "Expected '{'");
        let body = self.parse_block_statements();
        Some(Function {
            return_type,
            name,
            parameters,
            body,
        })
    }

    fn parse_type(&mut self) -> Option<Type> {
        let base = match self.current.kind {
            TokenKind::Int => Type::Int,
            TokenKind::Float => Type::Float,
            TokenKind::String => Type::String,
            TokenKind::Bool => Type::Bool,
            TokenKind::Void => Type::Void,
            _ => {
                self.error("Expected type");
                return None;
            }
        };
        self.advance();
        if self.eat(TokenKind::LeftBracket) {
            if !self.check(TokenKind::IntLiteral) {
                self.error("Expected array size");
                return None;
            }
            let Ok(size) = self.current.text.parse::<usize>() else {
                self.error("Invalid array size");
                return None;
            };
            self.advance();
            self.consume(TokenKind::RightBracket, "Expected ']'");
            return Some(Type::Array {
                element: Box::new(base),
                size,
            });
        }
        Some(base)
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current.kind {
            TokenKind::Int | TokenKind::Float | TokenKind::String | TokenKind::Bool => {
                self.parse_var_declaration()
            }
            TokenKind::LeftBrace => {
                self.advance();
                Some(Stmt::Block(self.parse_block_statements()))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Print => self.parse_print(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Parses statements up to and including the closing brace. The
    /// opening brace has already been consumed by the caller.
    fn parse_block_statements(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            if !self.diagnostics.is_empty() {
                break;
            }
        }
        self.consume(TokenKind::RightBrace, "Expected '}'");
        statements
    }

    fn parse_var_declaration(&mut self) -> Option<Stmt> {
        let ty = self.parse_type()?;
        if !self.check(TokenKind::Ident) {
            self.error("Expected variable name");
            return None;
        }
        let name = self.current.text.clone();
        self.advance();
        let mut initializer = None;
        if self.eat(TokenKind::Assign) {
            initializer = self.parse_expression();
        }
        self.consume(TokenKind::Semicolon, "Expected ';'");
        Some(Stmt::VarDecl {
            ty,
            name,
            initializer,
        })
    }

    fn parse_if(&mut self) -> Option<Stmt> {
        self.consume(TokenKind::If, "Expected 'if'");
        self.consume(TokenKind::LeftParen, "Expected '('");
        let condition = self.parse_expression();
        self.consume(TokenKind::RightParen, "Expected ')'");
        let then_branch = self.parse_statement();
        let mut else_branch = None;
        if self.eat(TokenKind::Else) {
            else_branch = self.parse_statement();
        }
        Some(Stmt::If {
            condition: condition?,
            then_branch: Box::new(then_branch?),
            else_branch: else_branch.map(Box::new),
        })
    }

    fn parse_while(&mut self) -> Option<Stmt> {
        self.consume(TokenKind::While, "Expected 'while'");
        self.consume(TokenKind::LeftParen, "Expected '('");
        let condition = self.parse_expression();
        self.consume(TokenKind::RightParen, "Expected ')'");
        let body = self.parse_statement();
        Some(Stmt::While {
            condition: condition?,
            body: Box::new(body?),
        })
    }

    fn parse_for(&mut self) -> Option<Stmt> {
        self.consume(TokenKind::For, "Expected 'for'");
        self.consume(TokenKind::LeftParen, "Expected '('");
        let init = match self.current.kind {
            TokenKind::Int | TokenKind::Float | TokenKind::String | TokenKind::Bool => {
                self.parse_var_declaration()
            }
            TokenKind::Semicolon => {
                self.advance();
                None
            }
            _ => self.parse_expression_statement(),
        };
        let mut condition = None;
        if !self.check(TokenKind::Semicolon) {
            condition = self.parse_expression();
        }
        self.consume(TokenKind::Semicolon, "Expected ';'");
        let mut update = None;
        if !self.check(TokenKind::RightParen) {
            update = self.parse_expression();
        }
        self.consume(TokenKind::RightParen, "Expected ')'");
        let body = self.parse_statement();
        Some(Stmt::For {
            init: init.map(Box::new),
            condition,
            update,
            body: Box::new(body?),
        })
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        self.consume(TokenKind::Return, "Expected 'return'");
        let mut value = None;
        if !self.check(TokenKind::Semicolon) {
            value = self.parse_expression();
        }
        self.consume(TokenKind::Semicolon, "Expected ';'");
        Some(Stmt::Return(value))
    }

    fn parse_print(&mut self) -> Option<Stmt> {
        self.consume(TokenKind::Print, "Expected 'print'");
        self.consume(TokenKind::LeftParen, "Expected '('");
        let expr = self.parse_expression();
        self.consume(TokenKind::RightParen, "Expected ')'");
        self.consume(TokenKind::Semicolon, "Expected ';'");
        expr.map(Stmt::Print)
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let Some(expr) = self.parse_expression() else {
            // Recover to a statement boundary so the caller stops cleanly.
            while !self.check(TokenKind::Semicolon) && !self.check(TokenKind::Eof) {
                self.advance();
            }
            self.eat(TokenKind::Semicolon);
            return None;
        };
        self.consume(TokenKind::Semicolon, "Expected ';'");
        Some(Stmt::Expression(expr))
    }

    fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Option<Expr> {
        let expr = self.parse_or();
        if self.eat(TokenKind::Assign) {
            // Right-associative: a = b = 1 assigns b first.
            let value = self.parse_assignment();
            return Some(self.make_expr(ExprKind::Assign {
                target: Box::new(expr?),
                value: Box::new(value?),
            }));
        }
        expr
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut expr = self.parse_and()?;
        while self.eat(TokenKind::Or) {
            let right = self.parse_and()?;
            expr = self.binary(BinaryOp::Or, expr, right);
        }
        Some(expr)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut expr = self.parse_equality()?;
        while self.eat(TokenKind::And) {
            let right = self.parse_equality()?;
            expr = self.binary(BinaryOp::And, expr, right);
        }
        Some(expr)
    }

    fn parse_equality(&mut self) -> Option<Expr> {
        let mut expr = self.parse_comparison()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Equal => BinaryOp::Equal,
                TokenKind::NotEqual => BinaryOp::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            expr = self.binary(op, expr, right);
        }
        Some(expr)
    }

    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut expr = self.parse_term()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessEqual,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            expr = self.binary(op, expr, right);
        }
        Some(expr)
    }

    fn parse_term(&mut self) -> Option<Expr> {
        let mut expr = self.parse_factor()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            expr = self.binary(op, expr, right);
        }
        Some(expr)
    }

    fn parse_factor(&mut self) -> Option<Expr> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = self.binary(op, expr, right);
        }
        Some(expr)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        let op = match self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Some(self.make_expr(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        }))
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(TokenKind::LeftParen) {
                let mut args = Vec::new();
                if !self.check(TokenKind::RightParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(TokenKind::RightParen, "Expected ')'");
                if let ExprKind::Variable(name) = &expr.kind {
                    let callee = name.clone();
                    expr = self.make_expr(ExprKind::Call { callee, args });
                } else {
                    self.error("Function call must be on identifier");
                }
            } else if self.eat(TokenKind::LeftBracket) {
                let index = self.parse_expression()?;
                self.consume(TokenKind::RightBracket, "Expected ']'");
                expr = self.make_expr(ExprKind::Index {
                    array: Box::new(expr),
                    index: Box::new(index),
                });
            } else {
                break;
            }
        }
        Some(expr)
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        match self.current.kind {
            TokenKind::IntLiteral => {
                let Ok(value) = self.current.text.parse::<i64>() else {
                    self.error("Invalid integer literal");
                    self.advance();
                    return None;
                };
                self.advance();
                Some(self.make_expr(ExprKind::Int(value)))
            }
            TokenKind::FloatLiteral => {
                let Ok(value) = self.current.text.parse::<f64>() else {
                    self.error("Invalid float literal");
                    self.advance();
                    return None;
                };
                self.advance();
                Some(self.make_expr(ExprKind::Float(value)))
            }
            TokenKind::StringLiteral => {
                let value = self.current.text.clone();
                self.advance();
                Some(self.make_expr(ExprKind::Str(value)))
            }
            TokenKind::True => {
                self.advance();
                Some(self.make_expr(ExprKind::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Some(self.make_expr(ExprKind::Bool(false)))
            }
            TokenKind::Ident => {
                let name = self.current.text.clone();
                self.advance();
                Some(self.make_expr(ExprKind::Variable(name)))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression();
                self.consume(TokenKind::RightParen, "Expected ')'");
                expr
            }
            TokenKind::Error => {
                // The lexer packs its message into the token text.
                let message = self.current.text.clone();
                self.error(message);
                self.advance();
                None
            }
            _ => {
                self.error("Expected expression");
                self.advance();
                None
            }
        }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            self.error(message);
            false
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.report(Diagnostic::at(
            message,
            self.current.line,
            self.current.column,
        ));
    }

    fn make_expr(&mut self, kind: ExprKind) -> Expr {
        let id = ExprId(self.next_expr_id);
        self.next_expr_id += 1;
        Expr { id, kind }
    }

    fn binary(&mut self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        self.make_expr(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}
