use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use nova_core::{Config, Error, compile_file};

/// Compile and run Nova programs
#[derive(Parser)]
#[command(name = "nova")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
struct Cli {
    /// Nova source file
    input: PathBuf,

    /// Write the generated C here instead of compiling and running it
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing based on RUST_LOG env var
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if !cli.input.exists() {
        eprintln!("Error: File not found: {}", cli.input.display());
        std::process::exit(1);
    }
    if !cli.input.to_string_lossy().ends_with(".nova") {
        eprintln!("Error: Input file must have .nova extension");
        std::process::exit(1);
    }

    match cli.output {
        Some(output) => build_command(&cli.input, &output),
        None => {
            let code = run_command(&cli.input)?;
            std::process::exit(code)
        }
    }
}

/// Two-argument mode: translate to C and stop.
fn build_command(input: &Path, output: &Path) -> Result<()> {
    let c_source = compile_or_exit(input);
    fs::write(output, c_source)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Successfully compiled {} to {}",
        input.display(),
        output.display()
    );
    Ok(())
}

/// One-argument mode: translate, hand the C to the configured compiler,
/// run the result and pass its exit code through.
fn run_command(input: &Path) -> Result<i32> {
    println!("Compiling {}...", input.display());
    let c_source = compile_or_exit(input);
    let config = Config::for_source(input)?;
    debug!(cc = %config.cc, keep = config.keep_intermediates, "build configuration");

    let (c_file, exe_file, _guard) = if config.keep_intermediates {
        let exe_file = input.with_extension("");
        // A file named just ".nova" has no stem; stripping the extension
        // would hand the source path itself to the C compiler's -o.
        if exe_file == input {
            return Err(anyhow::anyhow!(
                "Cannot keep intermediates for {}: the executable would overwrite the source file",
                input.display()
            ));
        }
        (input.with_extension("c"), exe_file, None)
    } else {
        let dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        (
            dir.path().join("nova_temp.c"),
            dir.path().join("nova_temp_exe"),
            Some(dir),
        )
    };

    fs::write(&c_file, c_source).with_context(|| format!("Failed to write {}", c_file.display()))?;

    let output = Command::new(&config.cc)
        .arg("-o")
        .arg(&exe_file)
        .arg(&c_file)
        .args(&config.cc_args)
        .output()
        .with_context(|| format!("Failed to run C compiler '{}'", config.cc))?;

    if !output.status.success() {
        eprintln!("Error: Failed to compile generated C code");
        eprint!("{}", String::from_utf8_lossy(&output.stderr));
        return Ok(1);
    }

    // A bare relative path would go through PATH lookup instead of the
    // binary that was just built.
    let exe_file = fs::canonicalize(&exe_file).unwrap_or(exe_file);
    let status = Command::new(&exe_file)
        .status()
        .with_context(|| format!("Failed to run {}", exe_file.display()))?;
    Ok(status.code().unwrap_or(1))
}

/// Compiles the source; diagnostics go to stderr one per line and end
/// the process, matching the compiler's user-facing error contract.
fn compile_or_exit(input: &Path) -> String {
    match compile_file(input) {
        Ok(c_source) => c_source,
        Err(Error::ParseError(diagnostics) | Error::SemanticError(diagnostics)) => {
            for diagnostic in diagnostics.iter() {
                eprintln!("{diagnostic}");
            }
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
