use std::sync::Arc;

use tracing::{debug, info};

use nova_core::RunCommand;

use crate::host::{CommandCallback, Host};

/// Command id under which the run action is registered.
pub const RUN_COMMAND: &str = "nova.run";
/// Language identifier Nova documents carry in the host.
pub const LANGUAGE_ID: &str = "nova";
/// Title of the terminals the run command opens.
pub const TERMINAL_NAME: &str = "Nova";

/// Keeps a command registered for exactly as long as it lives.
struct CommandRegistration {
    host: Arc<dyn Host>,
    id: &'static str,
}

impl CommandRegistration {
    fn new(host: Arc<dyn Host>, id: &'static str, callback: CommandCallback) -> Self {
        host.register_command(id, callback);
        Self { host, id }
    }
}

impl Drop for CommandRegistration {
    fn drop(&mut self) {
        self.host.unregister_command(self.id);
    }
}

/// A live activation of the Nova extension.
///
/// Dropping it deactivates the extension and releases every registration
/// it made.
pub struct Extension {
    _run_command: CommandRegistration,
}

/// Wires the extension up to a host. Activating twice on one host is
/// harmless: the run command registration replaces rather than stacks.
pub fn activate(host: Arc<dyn Host>) -> Extension {
    info!("Nova language extension is now active!");
    let handler_host = Arc::clone(&host);
    let run_command = CommandRegistration::new(
        host,
        RUN_COMMAND,
        Box::new(move || run_current_file(handler_host.as_ref())),
    );
    Extension {
        _run_command: run_command,
    }
}

/// Runs the file in the focused editor if it is a Nova document, and
/// quietly does nothing otherwise.
fn run_current_file(host: &dyn Host) {
    let Some(editor) = host.active_editor() else {
        debug!("run requested with no active editor");
        return;
    };
    if editor.language_id != LANGUAGE_ID {
        debug!(language = %editor.language_id, "run requested for a non-Nova document");
        return;
    }

    let command = RunCommand::new(editor.file_name);
    // Every run opens its own terminal; earlier runs keep their output.
    let terminal = host.create_terminal(TERMINAL_NAME);
    terminal.show();
    terminal.send_text(&command.to_shell_command());
}
