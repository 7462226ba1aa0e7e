use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn nova() -> Command {
    Command::cargo_bin("nova").unwrap()
}

#[test]
fn help_prints_usage() {
    nova()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_prints_the_version() {
    nova()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_arguments_show_usage_on_stderr() {
    nova()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_input_file_is_reported() {
    nova()
        .arg("/no/such/dir/program.nova")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn non_nova_extensions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "hello").unwrap();

    nova()
        .arg(&notes)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Input file must have .nova extension",
        ));
}

#[test]
fn two_arguments_translate_to_c() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("ok.nova");
    let output = dir.path().join("out.c");
    fs::write(&source, "function void main() { print(1); }\n").unwrap();

    nova()
        .arg(&source)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully compiled"));

    let c = fs::read_to_string(&output).unwrap();
    assert!(c.contains("#include <stdio.h>"));
    assert!(c.contains("int main("));
}

#[test]
fn diagnostics_go_to_stderr_and_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bad.nova");
    fs::write(&source, "int x = ;\n").unwrap();

    nova()
        .arg(&source)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Expected expression"));
}

#[test]
fn compiles_and_runs_a_program() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("answer.nova");
    fs::write(&source, "function void main() { print(42); }\n").unwrap();

    nova()
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiling").and(predicate::str::contains("42")));
}

#[test]
fn the_programs_exit_code_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("exit3.nova");
    fs::write(&source, "function int main() { return 3; }\n").unwrap();

    nova().arg(&source).assert().code(3);
}

#[test]
fn a_failing_configured_compiler_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("prog.nova");
    fs::write(&source, "function void main() { print(1); }\n").unwrap();
    fs::write(dir.path().join(".nova.json"), r#"{"cc": "false"}"#).unwrap();

    nova()
        .arg(&source)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Failed to compile generated C code",
        ));
}

#[test]
fn the_c_compilers_own_errors_reach_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("arrays.nova");
    // Whole-array assignment passes the Nova checks but is not valid C.
    fs::write(
        &source,
        "function void main() { int[2] a; int[2] b; a = b; }\n",
    )
    .unwrap();

    nova()
        .arg(&source)
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("Failed to compile generated C code")
                .and(predicate::str::contains("error:")),
        );
}

#[test]
fn keep_intermediates_leaves_artifacts_beside_the_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("prog.nova");
    fs::write(&source, "function void main() { print(3 + 4); }\n").unwrap();
    fs::write(
        dir.path().join(".nova.json"),
        r#"{"keep_intermediates": true}"#,
    )
    .unwrap();

    nova()
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("7"));

    assert!(dir.path().join("prog.c").exists());
    assert!(dir.path().join("prog").exists());
}

#[test]
fn keeping_intermediates_for_a_bare_dot_nova_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join(".nova");
    fs::write(&source, "function void main() { print(1); }\n").unwrap();
    fs::write(
        dir.path().join(".nova.json"),
        r#"{"keep_intermediates": true}"#,
    )
    .unwrap();

    nova()
        .arg(&source)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("would overwrite the source file"));

    assert!(fs::read_to_string(&source).unwrap().contains("function"));
}
