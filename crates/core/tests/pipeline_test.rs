use std::fs;

use nova_core::config::CONFIG_FILE_NAME;
use nova_core::{Config, Error, compile_file, compile_source};

#[test]
fn compiles_a_source_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("greet.nova");
    fs::write(&source, "function void main() { print(\"hi\"); }\n").unwrap();

    let c = compile_file(&source).unwrap();
    assert!(c.contains("int main() {"));
    assert!(c.contains(r#"printf("%s\n", "hi");"#));
}

#[test]
fn missing_files_surface_as_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = compile_file(&dir.path().join("absent.nova")).unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
}

#[test]
fn config_discovery_starts_beside_the_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("project");
    let src = project.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        project.join(CONFIG_FILE_NAME),
        r#"{"cc": "clang", "cc_args": ["-Wall"]}"#,
    )
    .unwrap();

    let config = Config::for_source(&src.join("main.nova")).unwrap();
    assert_eq!(config.cc, "clang");
    assert_eq!(config.cc_args, vec!["-Wall".to_string()]);
}

#[test]
fn semantic_analysis_reports_every_problem_in_one_run() {
    let err = compile_source("int x = true; int x = 2; print(y);").unwrap_err();
    let Error::SemanticError(diagnostics) = err else {
        panic!("expected a semantic error");
    };
    let messages: Vec<_> = diagnostics.into_iter().map(|d| d.message).collect();
    assert_eq!(
        messages,
        vec![
            "Type mismatch in variable initialization",
            "Variable 'x' already defined in this scope",
            "Undefined variable: y",
            "Cannot print value of type error",
        ]
    );
}

#[test]
fn parsing_stops_at_the_first_problem() {
    let err = compile_source("int x = ;\nint y = 2;\nbroken").unwrap_err();
    let Error::ParseError(diagnostics) = err else {
        panic!("expected a parse error");
    };
    let first = diagnostics.iter().next().unwrap();
    assert_eq!(first.message, "Expected expression");
    assert_eq!(first.line, Some(1));
}
