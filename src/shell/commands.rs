// src/shell/commands.rs

use std::path::PathBuf;

/// How a script reacts when the previous command failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorExit {
    /// Exit with the error value the shell reports for the previous command.
    Propagate,
    /// Read the error value from a previously persisted variable.
    FromVariable(String),
    /// Exit with this fixed code.
    WithCode(i32),
}

/// One shell-neutral command. Scripts are sequences of these, rendered to a
/// concrete dialect by a `ShellRenderer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Text displayed to the user, one echo per line.
    Message(String),

    /// Invoke another script so its environment changes persist in the
    /// calling shell.
    Call {
        command_line: String,
        exit_on_error: bool,
        exit_via_return: bool,
    },

    /// Run a program as a child process; its environment changes do not
    /// persist. `exit_via_return` is only honored when `exit_on_error` holds.
    Execute {
        command_line: String,
        exit_on_error: bool,
        exit_via_return: bool,
    },

    /// Assign an environment variable, replacing any existing value. `None`
    /// unsets it; multiple values are joined with the dialect's path
    /// separator.
    Set {
        name: String,
        values: Option<Vec<String>>,
    },

    /// Add values to a path-style variable only if not already present, so
    /// re-running the script never duplicates entries.
    Augment {
        name: String,
        values: Vec<String>,
        prepend: bool,
    },

    /// Terminate the script, optionally pausing for keyboard input first.
    Exit {
        pause_on_success: bool,
        pause_on_error: bool,
        return_code: Option<i32>,
    },

    /// Terminate the script if the previous command failed.
    ExitOnError {
        mode: ErrorExit,
        use_return_statement: bool,
    },

    /// Stop the shell from echoing the commands it runs.
    EchoOff,

    /// Save the previous command's error value into a named variable before
    /// later commands overwrite it.
    PersistError { variable_name: String },

    /// Push the current directory and change to `path`, or to the directory
    /// containing the running script when `path` is `None`.
    PushDirectory { path: Option<PathBuf> },

    /// Return to the directory saved by the matching push.
    PopDirectory,

    /// Dialect-specific text emitted verbatim.
    Raw(String),
}

impl ShellCommand {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            name: name.into(),
            values: Some(vec![value.into()]),
        }
    }

    pub fn set_many(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::Set {
            name: name.into(),
            values: Some(values),
        }
    }

    pub fn unset(name: impl Into<String>) -> Self {
        Self::Set {
            name: name.into(),
            values: None,
        }
    }

    /// Append `value` to a path-style variable, guarded against duplicates.
    pub fn augment(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Augment {
            name: name.into(),
            values: vec![value.into()],
            prepend: false,
        }
    }

    pub fn call(command_line: impl Into<String>) -> Self {
        Self::Call {
            command_line: command_line.into(),
            exit_on_error: true,
            exit_via_return: false,
        }
    }

    pub fn execute(command_line: impl Into<String>) -> Self {
        Self::Execute {
            command_line: command_line.into(),
            exit_on_error: true,
            exit_via_return: false,
        }
    }
}
