use std::path::PathBuf;
use std::sync::Arc;

/// Handler invoked when the host fires a registered command.
pub type CommandCallback = Box<dyn Fn() + Send + Sync>;

/// The document currently focused in the host editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEditor {
    /// Host-assigned language identifier; "nova" for Nova sources
    pub language_id: String,
    /// Path of the document on disk
    pub file_name: PathBuf,
}

/// An integrated terminal owned by the host.
pub trait Terminal: Send + Sync {
    /// Brings the terminal into view.
    fn show(&self);

    /// Types a line into the terminal as if the user had entered it.
    fn send_text(&self, text: &str);
}

/// The slice of an editor the Nova extension talks to.
///
/// Anything observable the extension does goes through this trait, so a
/// test host records it all.
pub trait Host: Send + Sync {
    /// Makes `callback` invocable under the command `id`. Registering an
    /// id again replaces the earlier callback instead of stacking.
    fn register_command(&self, id: &str, callback: CommandCallback);

    /// Removes the registration for `id`, if any.
    fn unregister_command(&self, id: &str);

    /// The editor that currently has focus, if any.
    fn active_editor(&self) -> Option<ActiveEditor>;

    /// Opens a new integrated terminal with the given title.
    fn create_terminal(&self, name: &str) -> Arc<dyn Terminal>;
}
