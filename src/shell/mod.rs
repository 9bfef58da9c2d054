// src/shell/mod.rs

pub mod commands;

mod bash;
mod batch;
mod powershell;

pub use bash::BashRenderer;
pub use batch::BatchRenderer;
pub use powershell::PowerShellRenderer;

use clap::ValueEnum;

use crate::shell::commands::ShellCommand;

/// The script dialects that can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShellKind {
    Bash,
    Batch,
    #[value(name = "powershell")]
    PowerShell,
}

impl ShellKind {
    pub fn renderer(self) -> Box<dyn ShellRenderer> {
        match self {
            Self::Bash => Box::new(BashRenderer),
            Self::Batch => Box::new(BatchRenderer),
            Self::PowerShell => Box::new(PowerShellRenderer),
        }
    }

    pub fn script_extension(self) -> &'static str {
        match self {
            Self::Bash => "sh",
            Self::Batch => "bat",
            Self::PowerShell => "ps1",
        }
    }
}

/// Renders one shell-neutral command to dialect text.
pub trait ShellRenderer {
    /// Returns the script text for `command`, or `None` when the dialect has
    /// no equivalent and the command is skipped.
    fn render(&self, command: &ShellCommand) -> Option<String>;
}

/// Renders a command sequence to a complete script. Every rendered chunk is
/// normalized to end with exactly one trailing newline.
pub fn render_script(kind: ShellKind, shell_commands: &[ShellCommand]) -> String {
    let renderer = kind.renderer();
    let mut script = String::new();

    for command in shell_commands {
        if let Some(chunk) = renderer.render(command) {
            script.push_str(chunk.trim_end_matches('\n'));
            script.push('\n');
        }
    }

    script
}
