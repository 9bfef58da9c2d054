// src/shell/batch.rs

use uuid::Uuid;

use crate::shell::ShellRenderer;
use crate::shell::commands::{ErrorExit, ShellCommand};

/// Renders commands as Windows batch. Label names for augment guards carry a
/// random suffix so repeated augments never collide.
#[derive(Debug)]
pub struct BatchRenderer;

const CARET_PLACEHOLDER: &str = "__caret_placeholder__";

// Percent doubles; the rest are caret-escaped.
const MESSAGE_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("%", "%%"),
    ("&", "^&"),
    ("<", "^<"),
    (">", "^>"),
    ("|", "^|"),
    (",", "^,"),
    (";", "^;"),
    ("(", "^("),
    (")", "^)"),
    ("[", "^["),
    ("]", "^]"),
];

impl ShellRenderer for BatchRenderer {
    fn render(&self, command: &ShellCommand) -> Option<String> {
        match command {
            ShellCommand::Message(text) => {
                let lines: Vec<String> = text
                    .split('\n')
                    .map(|line| {
                        if line.trim().is_empty() {
                            // `echo.` prints a blank line; the trailing space
                            // keeps a following `&&` from being glued to it.
                            "echo. ".to_string()
                        } else {
                            // Carets are hidden first so the escapes below do
                            // not escape each other's carets.
                            let mut escaped = line.replace('^', CARET_PLACEHOLDER);
                            for (from, to) in MESSAGE_SUBSTITUTIONS {
                                escaped = escaped.replace(from, to);
                            }
                            format!("echo {}", escaped.replace(CARET_PLACEHOLDER, "^^"))
                        }
                    })
                    .collect();

                Some(format!("{}\n", lines.join(" && ")))
            }

            ShellCommand::Call {
                command_line,
                exit_on_error,
                ..
            } => Some(self.invocation(format!("call {command_line}\n"), *exit_on_error)),

            ShellCommand::Execute {
                command_line,
                exit_on_error,
                ..
            } => {
                // Invoking a batch file from a batch file without `cmd /c`
                // would replace the current script.
                let first_token = shlex::split(command_line)
                    .and_then(|tokens| tokens.into_iter().next())
                    .map(|token| token.to_lowercase())
                    .unwrap_or_default();

                let invocation =
                    if first_token.ends_with(".bat") || first_token.ends_with(".cmd") {
                        format!("cmd /c {command_line}\n")
                    } else {
                        format!("{command_line}\n")
                    };

                Some(self.invocation(invocation, *exit_on_error))
            }

            ShellCommand::Set { name, values } => match values {
                None => Some(format!("SET {name}=\n")),
                Some(values) => Some(format!("SET {name}={}\n", values.join(";"))),
            },

            ShellCommand::Augment {
                name,
                values,
                prepend,
            } => {
                let statements: Vec<String> = values
                    .iter()
                    .map(|value| {
                        let label = format!("skip_{}", Uuid::new_v4().simple());
                        let assignment = if *prepend {
                            format!("SET {name}={value};%{name}%")
                        } else {
                            format!("SET {name}=%{name}%;{value}")
                        };

                        format!(
                            "REM {value}\necho \";%{name}%;\" | findstr /C:\";{value};\" >nul\nif %ERRORLEVEL% EQU 0 goto {label}\n\n{assignment}\n\n:{label}\n"
                        )
                    })
                    .collect();

                Some(statements.join("\n"))
            }

            ShellCommand::Exit {
                pause_on_success,
                pause_on_error,
                return_code,
            } => {
                let success = if *pause_on_success {
                    "if %ERRORLEVEL% EQU 0 (pause)\n"
                } else {
                    ""
                };
                let error = if *pause_on_error {
                    "if %ERRORLEVEL% NEQ 0 (pause)\n"
                } else {
                    ""
                };

                Some(format!(
                    "{success}{error}exit /B {}\n",
                    return_code.unwrap_or(0)
                ))
            }

            ShellCommand::ExitOnError { mode, .. } => {
                let variable = match mode {
                    ErrorExit::FromVariable(variable) => variable.clone(),
                    _ => "ERRORLEVEL".to_string(),
                };
                let code = match mode {
                    ErrorExit::WithCode(code) => code.to_string(),
                    _ => format!("%{variable}%"),
                };

                Some(format!("if %{variable}% NEQ 0 (exit /B {code})\n"))
            }

            ShellCommand::EchoOff => Some("@echo off\n".to_string()),

            ShellCommand::PersistError { variable_name } => {
                Some(format!("SET {variable_name}=%ERRORLEVEL%\n"))
            }

            ShellCommand::PushDirectory { path } => match path {
                // %~dp0 is the directory containing the running script.
                None => Some("pushd \"%~dp0\"\n".to_string()),
                Some(path) => Some(format!("pushd \"{}\"\n", path.display())),
            },

            ShellCommand::PopDirectory => Some("popd\n".to_string()),

            ShellCommand::Raw(text) => Some(text.clone()),
        }
    }
}

impl BatchRenderer {
    fn invocation(&self, mut result: String, exit_on_error: bool) -> String {
        if exit_on_error
            && let Some(check) = self.render(&ShellCommand::ExitOnError {
                mode: ErrorExit::Propagate,
                use_return_statement: false,
            })
        {
            result.push_str(&check);
        }

        result
    }
}
