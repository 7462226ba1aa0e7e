//! Host-agnostic editor integration for the Nova language.
//!
//! An editor implements the traits in [`host`]; [`extension::activate`]
//! then registers the run command, which pastes a `nova` invocation for
//! the focused document into a fresh integrated terminal.

pub mod extension;
pub mod host;

pub use extension::{Extension, LANGUAGE_ID, RUN_COMMAND, TERMINAL_NAME, activate};
pub use host::{ActiveEditor, CommandCallback, Host, Terminal};
