use std::fs;
use std::path::Path;

use tracing::debug;

use crate::codegen::CodeGenerator;
use crate::error::{Error, Result};
use crate::parser::Parser;
use crate::semantic::Analyzer;

/// Compiles Nova source text to C source text.
pub fn compile_source(source: &str) -> Result<String> {
    let program = Parser::new(source).parse().map_err(Error::ParseError)?;
    debug!(items = program.items.len(), "parsed program");
    let analysis = Analyzer::new()
        .analyze(&program)
        .map_err(Error::SemanticError)?;
    CodeGenerator::new(&analysis).generate(&program)
}

/// Reads a Nova source file and compiles it to C source text.
pub fn compile_file(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)?;
    compile_source(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_compiles_end_to_end() {
        let c = compile_source("function void main() { print(2 + 3); }").unwrap();
        assert!(c.starts_with("#include <stdio.h>"));
        assert!(c.contains("int main() {"));
        assert!(c.contains(r#"printf("%d\n", (2 + 3));"#));
    }

    #[test]
    fn parse_diagnostics_come_back_as_parse_errors() {
        let err = compile_source("int x = ;").unwrap_err();
        match err {
            Error::ParseError(diagnostics) => {
                assert!(diagnostics.to_string().contains("Expected expression"));
            }
            other => panic!("expected a parse error, got {other}"),
        }
    }

    #[test]
    fn semantic_diagnostics_come_back_as_semantic_errors() {
        let err = compile_source("int x = true;").unwrap_err();
        match err {
            Error::SemanticError(diagnostics) => {
                assert!(
                    diagnostics
                        .to_string()
                        .contains("Type mismatch in variable initialization")
                );
            }
            other => panic!("expected a semantic error, got {other}"),
        }
    }
}
