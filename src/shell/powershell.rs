// src/shell/powershell.rs

use crate::shell::ShellRenderer;
use crate::shell::commands::{ErrorExit, ShellCommand};

/// Renders commands as PowerShell. There is no echo-off equivalent, so that
/// command renders to nothing.
#[derive(Debug)]
pub struct PowerShellRenderer;

// The backtick substitution must run first; it is the escape character the
// other substitutions introduce.
const MESSAGE_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("`", "``"),
    ("$", "`$"),
    ("\"", "`\""),
];

impl ShellRenderer for PowerShellRenderer {
    fn render(&self, command: &ShellCommand) -> Option<String> {
        match command {
            ShellCommand::Message(text) => {
                let lines: Vec<String> = text
                    .split('\n')
                    .map(|line| {
                        if line.trim().is_empty() {
                            "Write-Host \"\"".to_string()
                        } else {
                            let mut escaped = line.to_string();
                            for (from, to) in MESSAGE_SUBSTITUTIONS {
                                escaped = escaped.replace(from, to);
                            }
                            format!("Write-Host \"{escaped}\"")
                        }
                    })
                    .collect();

                Some(format!("{}\n", lines.join("; ")))
            }

            ShellCommand::Call {
                command_line,
                exit_on_error,
                exit_via_return,
            } => Some(self.invocation(
                format!(". {command_line}\n"),
                *exit_on_error,
                *exit_via_return,
            )),

            ShellCommand::Execute {
                command_line,
                exit_on_error,
                exit_via_return,
            } => Some(self.invocation(
                format!("& {command_line}\n"),
                *exit_on_error,
                *exit_via_return,
            )),

            ShellCommand::Set { name, values } => match values {
                None => Some(format!(
                    "Remove-Item Env:{name} -ErrorAction SilentlyContinue\n"
                )),
                Some(values) => {
                    let joined = values.join(";");
                    let joined = joined.strip_prefix('"').unwrap_or(&joined);
                    let joined = joined.strip_suffix('"').unwrap_or(joined);
                    Some(format!("$env:{name} = \"{joined}\"\n"))
                }
            },

            ShellCommand::Augment {
                name,
                values,
                prepend,
            } => {
                let statements: Vec<String> = values
                    .iter()
                    .map(|value| {
                        let assignment = if *prepend {
                            format!("$env:{name} = \"{value};$env:{name}\"")
                        } else {
                            format!("$env:{name} = \"$env:{name};{value}\"")
                        };

                        // An unset variable would otherwise leave a dangling
                        // separator in the containment probe.
                        format!(
                            "if (-not $env:{name} -or \";$env:{name};\" -notlike \"*;{value};*\") {{\n    {assignment}\n}}\n"
                        )
                    })
                    .collect();

                Some(statements.join(""))
            }

            ShellCommand::Exit {
                pause_on_success,
                pause_on_error,
                return_code,
            } => {
                let success = if *pause_on_success {
                    "if ($LASTEXITCODE -eq 0) {\n    Read-Host \"Press [Enter] to continue\"\n}\n"
                } else {
                    ""
                };
                let error = if *pause_on_error {
                    "if ($LASTEXITCODE -ne 0) {\n    Read-Host \"Press [Enter] to continue\"\n}\n"
                } else {
                    ""
                };

                Some(format!("{success}{error}exit {}\n", return_code.unwrap_or(0)))
            }

            ShellCommand::ExitOnError {
                mode,
                use_return_statement,
            } => {
                let status = match mode {
                    ErrorExit::FromVariable(variable) => format!("${variable}"),
                    _ => "$LASTEXITCODE".to_string(),
                };
                let code = match mode {
                    ErrorExit::WithCode(code) => code.to_string(),
                    _ => "$error_code".to_string(),
                };
                let keyword = if *use_return_statement { "return" } else { "exit" };

                Some(format!(
                    "$error_code = {status}\nif ($error_code -ne 0) {{\n    {keyword} {code}\n}}\n"
                ))
            }

            ShellCommand::EchoOff => None,

            ShellCommand::PersistError { variable_name } => {
                Some(format!("${variable_name} = $LASTEXITCODE\n"))
            }

            ShellCommand::PushDirectory { path } => match path {
                None => Some("Push-Location $PSScriptRoot\n".to_string()),
                Some(path) => Some(format!("Push-Location \"{}\"\n", path.display())),
            },

            ShellCommand::PopDirectory => Some("Pop-Location\n".to_string()),

            ShellCommand::Raw(text) => Some(text.clone()),
        }
    }
}

impl PowerShellRenderer {
    fn invocation(&self, mut result: String, exit_on_error: bool, exit_via_return: bool) -> String {
        if exit_on_error
            && let Some(check) = self.render(&ShellCommand::ExitOnError {
                mode: ErrorExit::Propagate,
                use_return_statement: exit_via_return,
            })
        {
            result.push_str(&check);
        }

        result
    }
}
