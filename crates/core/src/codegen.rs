use crate::ast::{Expr, ExprKind, Function, Item, Program, Stmt};
use crate::error::{Error, Result};
use crate::semantic::Analysis;
use crate::types::Type;

/// Emits C from an analyzed program.
///
/// The output is meant to be read: four-space indents and a blank line
/// after every top-level item. Expression types come from the analysis,
/// which is why generation requires one.
pub struct CodeGenerator<'a> {
    analysis: &'a Analysis,
    output: String,
    indent: usize,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Self {
            analysis,
            output: String::new(),
            indent: 0,
        }
    }

    pub fn generate(mut self, program: &Program) -> Result<String> {
        self.write_line("#include <stdio.h>");
        self.write_line("#include <stdlib.h>");
        self.write_line("#include <string.h>");
        self.write_line("");
        for item in &program.items {
            match item {
                Item::Function(function) => self.emit_function(function)?,
                Item::Statement(stmt) => self.emit_stmt(stmt)?,
            }
            self.write_line("");
        }
        Ok(self.output)
    }

    fn emit_function(&mut self, function: &Function) -> Result<()> {
        if function.name == "main" {
            // The C entry point must be int main regardless of the
            // declared Nova return type.
            self.write("int main(");
        } else {
            let header = format!("{} {}(", c_type(&function.return_type), function.name);
            self.write(&header);
        }
        for (i, parameter) in function.parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            let param = format!("{} {}", c_type(&parameter.ty), parameter.name);
            self.write(&param);
        }
        self.finish_line(") {");
        self.indent += 1;
        for stmt in &function.body {
            self.emit_stmt(stmt)?;
        }
        if function.name == "main" && function.return_type == Type::Void {
            self.write_line("return 0;");
        }
        self.indent -= 1;
        self.write_line("}");
        Ok(())
    }

    fn emit_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::VarDecl {
                ty,
                name,
                initializer,
            } => {
                self.write_indent();
                match ty {
                    Type::Array { element, size } => {
                        let decl = format!("{} {}[{}]", c_type(element), name, size);
                        self.write(&decl);
                    }
                    _ => {
                        let decl = format!("{} {}", c_type(ty), name);
                        self.write(&decl);
                    }
                }
                if let Some(initializer) = initializer {
                    self.write(" = ");
                    self.emit_expr(initializer);
                } else if *ty == Type::String {
                    self.write(" = NULL");
                }
                self.finish_line(";");
            }
            Stmt::Block(statements) => {
                // Braces come from the surrounding construct; scoping was
                // settled during analysis.
                for stmt in statements {
                    self.emit_stmt(stmt)?;
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write_indent();
                self.write("if (");
                self.emit_expr(condition);
                self.finish_line(") {");
                self.indent += 1;
                self.emit_stmt(then_branch)?;
                self.indent -= 1;
                if let Some(else_branch) = else_branch {
                    self.write_line("} else {");
                    self.indent += 1;
                    self.emit_stmt(else_branch)?;
                    self.indent -= 1;
                }
                self.write_line("}");
            }
            Stmt::While { condition, body } => {
                self.write_indent();
                self.write("while (");
                self.emit_expr(condition);
                self.finish_line(") {");
                self.indent += 1;
                self.emit_stmt(body)?;
                self.indent -= 1;
                self.write_line("}");
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                self.write_indent();
                self.write("for (");
                if let Some(init) = init {
                    self.emit_for_init(init);
                }
                self.write("; ");
                if let Some(condition) = condition {
                    self.emit_expr(condition);
                }
                self.write("; ");
                if let Some(update) = update {
                    self.emit_expr(update);
                }
                self.finish_line(") {");
                self.indent += 1;
                self.emit_stmt(body)?;
                self.indent -= 1;
                self.write_line("}");
            }
            Stmt::Return(value) => {
                self.write_indent();
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.emit_expr(value);
                }
                self.finish_line(";");
            }
            Stmt::Print(expr) => self.emit_print(expr)?,
            Stmt::Expression(expr) => {
                self.write_indent();
                self.emit_expr(expr);
                self.finish_line(";");
            }
        }
        Ok(())
    }

    /// The first slot of a C for header takes the declaration without a
    /// trailing semicolon, so this bypasses the statement emitter.
    fn emit_for_init(&mut self, init: &Stmt) {
        match init {
            Stmt::VarDecl {
                ty,
                name,
                initializer,
            } => {
                let decl = format!("{} {}", c_type(ty), name);
                self.write(&decl);
                if let Some(initializer) = initializer {
                    self.write(" = ");
                    self.emit_expr(initializer);
                }
            }
            Stmt::Expression(expr) => self.emit_expr(expr),
            _ => {}
        }
    }

    fn emit_print(&mut self, expr: &Expr) -> Result<()> {
        self.write_indent();
        match self.analysis.type_of(expr.id) {
            Type::Int => self.write(r#"printf("%d\n", "#),
            Type::Float => self.write(r#"printf("%f\n", "#),
            Type::String => self.write(r#"printf("%s\n", "#),
            Type::Bool => {
                self.write(r#"printf("%s\n", ("#);
                self.emit_expr(expr);
                self.finish_line(r#") ? "true" : "false");"#);
                return Ok(());
            }
            ty => {
                return Err(Error::CodegenError(format!(
                    "Cannot print value of type {ty}"
                )));
            }
        }
        self.emit_expr(expr);
        self.finish_line(");");
        Ok(())
    }

    fn emit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Int(value) => self.write(&value.to_string()),
            ExprKind::Float(value) => self.write(&format!("{value:.6}")),
            ExprKind::Str(value) => self.write(&format!("\"{value}\"")),
            ExprKind::Bool(value) => self.write(if *value { "1" } else { "0" }),
            ExprKind::Variable(name) => self.write(name),
            ExprKind::Index { array, index } => {
                self.emit_expr(array);
                self.write("[");
                self.emit_expr(index);
                self.write("]");
            }
            ExprKind::Binary { op, left, right } => {
                self.write("(");
                self.emit_expr(left);
                self.write(&format!(" {op} "));
                self.emit_expr(right);
                self.write(")");
            }
            ExprKind::Unary { op, operand } => {
                self.write("(");
                self.write(&op.to_string());
                self.emit_expr(operand);
                self.write(")");
            }
            ExprKind::Call { callee, args } => {
                self.write(callee);
                self.write("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(arg);
                }
                self.write(")");
            }
            ExprKind::Assign { target, value } => {
                // Emitted parenthesized so a nested assignment keeps its
                // grouping inside a larger C expression.
                self.write("(");
                self.emit_expr(target);
                self.write(" = ");
                self.emit_expr(value);
                self.write(")");
            }
        }
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    fn write_line(&mut self, text: &str) {
        self.write_indent();
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Ends a line already in progress; no indent is applied.
    fn finish_line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }
}

fn c_type(ty: &Type) -> String {
    match ty {
        Type::Int => "int".to_string(),
        Type::Float => "float".to_string(),
        Type::String => "char*".to_string(),
        Type::Bool => "int".to_string(),
        Type::Void => "void".to_string(),
        Type::Array { element, .. } => format!("{}*", c_type(element)),
        Type::Function { .. } | Type::Error => "void*".to_string(),
    }
}
