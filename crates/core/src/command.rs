use std::path::PathBuf;

/// The shell invocation that runs a Nova source file.
///
/// Editor integrations build one of these from the active document and
/// paste the rendered command into a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    program: String,
    file: PathBuf,
}

impl RunCommand {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            program: "nova".to_string(),
            file: file.into(),
        }
    }

    /// Overrides the program name, for hosts that address the compiler
    /// by full path.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Renders the command for a POSIX shell. The file path is double
    /// quoted and the characters that stay significant inside double
    /// quotes are backslash-escaped.
    pub fn to_shell_command(&self) -> String {
        let mut command = self.program.clone();
        command.push(' ');
        command.push('"');
        for c in self.file.to_string_lossy().chars() {
            if matches!(c, '\\' | '"' | '$' | '`') {
                command.push('\\');
            }
            command.push(c);
        }
        command.push('"');
        command
    }
}
