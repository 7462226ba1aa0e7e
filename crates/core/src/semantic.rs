use std::collections::HashMap;

use crate::ast::{BinaryOp, Expr, ExprId, ExprKind, Function, Item, Program, Stmt, UnaryOp};
use crate::error::{Diagnostic, Diagnostics};
use crate::symbol_table::{Symbol, SymbolTable};
use crate::types::Type;

/// What the analyzer proved about a program, keyed by expression id.
#[derive(Debug, Default)]
pub struct Analysis {
    expr_types: HashMap<ExprId, Type>,
}

impl Analysis {
    /// The type of an expression. Ids the analyzer never saw come back
    /// as [`Type::Error`].
    pub fn type_of(&self, id: ExprId) -> Type {
        self.expr_types.get(&id).cloned().unwrap_or(Type::Error)
    }

    fn record(&mut self, id: ExprId, ty: Type) {
        self.expr_types.insert(id, ty);
    }
}

/// Type checker for Nova programs.
///
/// Unlike the parser, analysis keeps going after a problem so one run
/// reports everything it can; failed sub-expressions get [`Type::Error`]
/// and take part in later checks like any other type.
pub struct Analyzer {
    table: SymbolTable,
    current_return_type: Option<Type>,
    diagnostics: Diagnostics,
    analysis: Analysis,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            current_return_type: None,
            diagnostics: Diagnostics::new(),
            analysis: Analysis::default(),
        }
    }

    pub fn analyze(mut self, program: &Program) -> Result<Analysis, Diagnostics> {
        for item in &program.items {
            match item {
                Item::Function(function) => self.check_function(function),
                Item::Statement(stmt) => self.check_stmt(stmt),
            }
        }
        if self.diagnostics.is_empty() {
            Ok(self.analysis)
        } else {
            Err(self.diagnostics)
        }
    }

    fn check_function(&mut self, function: &Function) {
        if self.table.is_defined_in_current_scope(&function.name) {
            self.error(format!("Function '{}' already defined", function.name));
            return;
        }
        // Defined before the body is checked, so recursion resolves.
        let params = function.parameters.iter().map(|p| p.ty.clone()).collect();
        self.table.define(
            function.name.clone(),
            Symbol {
                ty: Type::Function {
                    params,
                    ret: Box::new(function.return_type.clone()),
                },
                is_function: true,
            },
        );

        self.table.enter_scope();
        self.current_return_type = Some(function.return_type.clone());
        for parameter in &function.parameters {
            self.table.define(
                parameter.name.clone(),
                Symbol {
                    ty: parameter.ty.clone(),
                    is_function: false,
                },
            );
        }
        // The body is a scope of its own, so locals may shadow parameters.
        self.table.enter_scope();
        for stmt in &function.body {
            self.check_stmt(stmt);
        }
        self.table.exit_scope();
        self.current_return_type = None;
        self.table.exit_scope();
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl {
                ty,
                name,
                initializer,
            } => {
                if self.table.is_defined_in_current_scope(name) {
                    self.error(format!("Variable '{name}' already defined in this scope"));
                    return;
                }
                if let Some(initializer) = initializer {
                    let value_ty = self.check_expr(initializer);
                    if !ty.accepts(&value_ty) {
                        self.error("Type mismatch in variable initialization");
                    }
                }
                self.table.define(
                    name.clone(),
                    Symbol {
                        ty: ty.clone(),
                        is_function: false,
                    },
                );
            }
            Stmt::Block(statements) => {
                self.table.enter_scope();
                for stmt in statements {
                    self.check_stmt(stmt);
                }
                self.table.exit_scope();
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.check_expr(condition) != Type::Bool {
                    self.error("If condition must be boolean");
                }
                self.check_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                if self.check_expr(condition) != Type::Bool {
                    self.error("While condition must be boolean");
                }
                self.check_stmt(body);
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                self.table.enter_scope();
                if let Some(init) = init {
                    self.check_stmt(init);
                }
                if let Some(condition) = condition {
                    if self.check_expr(condition) != Type::Bool {
                        self.error("For condition must be boolean");
                    }
                }
                if let Some(update) = update {
                    self.check_expr(update);
                }
                self.check_stmt(body);
                self.table.exit_scope();
            }
            Stmt::Return(value) => {
                let Some(return_type) = self.current_return_type.clone() else {
                    self.error("Return statement outside function");
                    return;
                };
                match value {
                    Some(value) => {
                        let value_ty = self.check_expr(value);
                        if !return_type.accepts(&value_ty) {
                            self.error("Return type mismatch");
                        }
                    }
                    None => {
                        if return_type != Type::Void {
                            self.error("Non-void function must return a value");
                        }
                    }
                }
            }
            Stmt::Print(expr) => {
                let ty = self.check_expr(expr);
                if !matches!(ty, Type::Int | Type::Float | Type::String | Type::Bool) {
                    self.error(format!("Cannot print value of type {ty}"));
                }
            }
            Stmt::Expression(expr) => {
                self.check_expr(expr);
            }
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> Type {
        let ty = match &expr.kind {
            ExprKind::Int(_) => Type::Int,
            ExprKind::Float(_) => Type::Float,
            ExprKind::Str(_) => Type::String,
            ExprKind::Bool(_) => Type::Bool,
            ExprKind::Variable(name) => match self.table.resolve(name) {
                Some(symbol) => symbol.ty.clone(),
                None => {
                    self.error(format!("Undefined variable: {name}"));
                    Type::Error
                }
            },
            ExprKind::Index { array, index } => {
                let array_ty = self.check_expr(array);
                let index_ty = self.check_expr(index);
                match array_ty {
                    Type::Array { element, .. } => {
                        if index_ty != Type::Int {
                            self.error("Array index must be integer");
                        }
                        *element
                    }
                    _ => {
                        self.error("Array access on non-array type");
                        Type::Error
                    }
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left_ty = self.check_expr(left);
                let right_ty = self.check_expr(right);
                self.check_binary_op(*op, &left_ty, &right_ty)
            }
            ExprKind::Unary { op, operand } => {
                let operand_ty = self.check_expr(operand);
                match op {
                    UnaryOp::Neg => {
                        if operand_ty.is_numeric() {
                            operand_ty
                        } else {
                            self.error("Numeric operand required for unary -");
                            Type::Error
                        }
                    }
                    UnaryOp::Not => {
                        if operand_ty == Type::Bool {
                            Type::Bool
                        } else {
                            self.error("Boolean operand required for !");
                            Type::Error
                        }
                    }
                }
            }
            ExprKind::Call { callee, args } => self.check_call(callee, args),
            ExprKind::Assign { target, value } => {
                if !matches!(target.kind, ExprKind::Variable(_) | ExprKind::Index { .. }) {
                    self.error("Invalid assignment target");
                }
                let target_ty = self.check_expr(target);
                let value_ty = self.check_expr(value);
                if target_ty.accepts(&value_ty) {
                    target_ty
                } else {
                    self.error("Type mismatch in assignment");
                    Type::Error
                }
            }
        };
        self.analysis.record(expr.id, ty.clone());
        ty
    }

    fn check_binary_op(&mut self, op: BinaryOp, left: &Type, right: &Type) -> Type {
        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                if !left.is_numeric() || !right.is_numeric() {
                    self.error(format!("Numeric operands required for {op}"));
                    return Type::Error;
                }
                if *left == Type::Float || *right == Type::Float {
                    Type::Float
                } else {
                    Type::Int
                }
            }
            BinaryOp::Mod => {
                if *left != Type::Int || *right != Type::Int {
                    self.error("Integer operands required for %");
                    return Type::Error;
                }
                Type::Int
            }
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::Less
            | BinaryOp::LessEqual
            | BinaryOp::Greater
            | BinaryOp::GreaterEqual => {
                // Mixed int/float comparisons are fine; anything else
                // needs equal types on both sides.
                if !(left.is_numeric() && right.is_numeric()) && left != right {
                    self.error("Type mismatch in comparison");
                    return Type::Error;
                }
                Type::Bool
            }
            BinaryOp::And | BinaryOp::Or => {
                if *left != Type::Bool || *right != Type::Bool {
                    self.error(format!("Boolean operands required for {op}"));
                    return Type::Error;
                }
                Type::Bool
            }
        }
    }

    fn check_call(&mut self, callee: &str, args: &[Expr]) -> Type {
        let Some(symbol) = self.table.resolve(callee).cloned() else {
            self.error(format!("Undefined function: {callee}"));
            return Type::Error;
        };
        if !symbol.is_function {
            self.error(format!("{callee} is not a function"));
            return Type::Error;
        }
        let Type::Function { params, ret } = symbol.ty else {
            // define() only ever marks Function-typed symbols as functions.
            return Type::Error;
        };
        if args.len() != params.len() {
            self.error("Function argument count mismatch");
            return Type::Error;
        }
        for (arg, param_ty) in args.iter().zip(&params) {
            let arg_ty = self.check_expr(arg);
            if !param_ty.accepts(&arg_ty) {
                self.error("Argument type mismatch");
            }
        }
        *ret
    }

    fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.report(Diagnostic::new(message));
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn analyze_source(source: &str) -> Result<Analysis, Diagnostics> {
        let program = Parser::new(source).parse().unwrap();
        Analyzer::new().analyze(&program)
    }

    fn first_error(source: &str) -> String {
        let diagnostics = analyze_source(source).unwrap_err();
        diagnostics.iter().next().unwrap().message.clone()
    }

    fn assert_clean(source: &str) {
        if let Err(diagnostics) = analyze_source(source) {
            panic!("unexpected diagnostics for {source:?}: {diagnostics}");
        }
    }

    #[test]
    fn inner_blocks_may_shadow() {
        assert_clean("int x = 1; { int x = 2; print(x); }");
    }

    #[test]
    fn duplicates_in_one_scope_are_rejected() {
        assert_eq!(
            first_error("int x = 1; int x = 2;"),
            "Variable 'x' already defined in this scope"
        );
        assert_eq!(
            first_error("function void f() {} function void f() {}"),
            "Function 'f' already defined"
        );
    }

    #[test]
    fn int_widens_to_float_but_not_back() {
        assert_clean("float f = 1;");
        assert_eq!(
            first_error("int i = 1.5;"),
            "Type mismatch in variable initialization"
        );
    }

    #[test]
    fn mixed_arithmetic_produces_float() {
        assert_eq!(
            first_error("int z = 1 + 2.0;"),
            "Type mismatch in variable initialization"
        );
        assert_clean("float z = 1 + 2.0;");
        assert_eq!(
            first_error(r#"int s = "a" + 1;"#),
            "Numeric operands required for +"
        );
    }

    #[test]
    fn modulo_requires_integers_on_both_sides() {
        assert_clean("int a = 7 % 2;");
        assert_eq!(first_error("1.0 % 2;"), "Integer operands required for %");
        assert_eq!(first_error("1 % 2.0;"), "Integer operands required for %");
    }

    #[test]
    fn conditions_must_be_boolean() {
        assert_eq!(first_error("if (1) {}"), "If condition must be boolean");
        assert_eq!(
            first_error("while (1.5) {}"),
            "While condition must be boolean"
        );
        assert_eq!(
            first_error("for (; 1 ;) {}"),
            "For condition must be boolean"
        );
        assert_clean("if (true) {} else {}");
        assert_clean("while (1 < 2) {}");
    }

    #[test]
    fn logical_operators_require_booleans_on_both_sides() {
        assert_eq!(
            first_error("true && 1;"),
            "Boolean operands required for &&"
        );
        assert_eq!(
            first_error("1 || false;"),
            "Boolean operands required for ||"
        );
        assert_clean("bool ok = true && !false || 1 < 2;");
    }

    #[test]
    fn unary_operators_check_their_operand() {
        assert_eq!(first_error("!1;"), "Boolean operand required for !");
        assert_eq!(
            first_error(r#"-"a";"#),
            "Numeric operand required for unary -"
        );
        assert_clean("int n = -1; float f = -1.5; bool b = !false;");
    }

    #[test]
    fn return_statements_are_checked_against_the_signature() {
        assert_eq!(first_error("return 1;"), "Return statement outside function");
        assert_eq!(
            first_error("function int f() { return; }"),
            "Non-void function must return a value"
        );
        assert_eq!(
            first_error("function int f() { return 1.5; }"),
            "Return type mismatch"
        );
        assert_clean("function void f() { return; }");
        assert_clean("function float f() { return 1; }");
    }

    #[test]
    fn recursion_resolves() {
        assert_clean(
            "function int fact(int n) { if (n <= 1) { return 1; } return n * fact(n - 1); }",
        );
    }

    #[test]
    fn calls_are_checked_for_arity_and_types() {
        assert_eq!(
            first_error("function void f(int a) {} f();"),
            "Function argument count mismatch"
        );
        assert_eq!(
            first_error("function void f(int a) {} f(true);"),
            "Argument type mismatch"
        );
        assert_eq!(first_error("g(1);"), "Undefined function: g");
        assert_eq!(first_error("int x = 1; x(1);"), "x is not a function");
        assert_clean("function int half(float v) { return 0; } int h = half(4);");
    }

    #[test]
    fn assignment_needs_a_variable_or_index_target() {
        assert_eq!(first_error("1 = 2;"), "Invalid assignment target");
        assert_clean("int x; x = 2;");
        assert_clean("int[3] a; a[0] = 5;");
        assert_eq!(
            first_error("int x; x = true;"),
            "Type mismatch in assignment"
        );
    }

    #[test]
    fn print_accepts_only_printable_types() {
        assert_eq!(
            first_error("function void f() {} print(f());"),
            "Cannot print value of type void"
        );
        assert_eq!(
            first_error("int[2] a; print(a);"),
            "Cannot print value of type int[2]"
        );
        assert_clean(r#"print(1); print(1.5); print("hi"); print(true);"#);
    }

    #[test]
    fn string_equality_is_allowed() {
        assert_clean("string a; string b; bool c = a == b;");
        assert_eq!(
            first_error(r#"bool bad = "x" < 1;"#),
            "Type mismatch in comparison"
        );
    }

    #[test]
    fn locals_may_shadow_parameters() {
        assert_clean("function int f(int n) { int n = 2; return n; }");
    }

    #[test]
    fn index_expressions_are_checked() {
        assert_eq!(
            first_error("int x = 1; int y = x[0];"),
            "Array access on non-array type"
        );
        assert_eq!(
            first_error("int[3] a; int b = a[true];"),
            "Array index must be integer"
        );
        assert_clean("int[3] a; int b = a[1];");
    }

    #[test]
    fn undefined_variables_are_reported_once_per_use() {
        assert_eq!(first_error("int y = missing;"), "Undefined variable: missing");
    }

    #[test]
    fn expression_types_are_recorded_by_id() {
        let program = Parser::new("1 + 2.0;").parse().unwrap();
        let analysis = Analyzer::new().analyze(&program).unwrap();
        let Item::Statement(Stmt::Expression(expr)) = &program.items[0] else {
            panic!("expected expression statement");
        };
        assert_eq!(analysis.type_of(expr.id), Type::Float);
        assert_eq!(analysis.type_of(ExprId(9999)), Type::Error);
    }
}
