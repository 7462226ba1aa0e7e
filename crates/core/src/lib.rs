//! Compiler core for the Nova language.
//!
//! Nova is a small statically typed language that compiles to C. This
//! crate carries the whole pipeline from source text to C output, along
//! with the build settings and the run command shared by the CLI and
//! editor integrations.

pub mod ast;
pub mod codegen;
pub mod command;
pub mod compiler;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantic;
mod symbol_table;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use command::RunCommand;
pub use compiler::{compile_file, compile_source};
pub use config::Config;
pub use error::{Diagnostic, Diagnostics, Error, Result};
