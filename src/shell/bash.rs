// src/shell/bash.rs

use crate::shell::ShellRenderer;
use crate::shell::commands::{ErrorExit, ShellCommand};

/// Renders commands as Bash. Scripts are meant to be sourced, so exits use
/// `return` when requested and `set +x` stands in for echo-off.
#[derive(Debug)]
pub struct BashRenderer;

// Applied in order; the backtick substitution must run after the others so
// its backslashes are not escaped twice.
const MESSAGE_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("$", "\\$"),
    ("\"", "\\\""),
    ("`", "\\\\\\`"),
];

impl ShellRenderer for BashRenderer {
    fn render(&self, command: &ShellCommand) -> Option<String> {
        match command {
            ShellCommand::Message(text) => {
                let lines: Vec<String> = text
                    .split('\n')
                    .map(|line| {
                        if line.trim().is_empty() {
                            "echo \"\"".to_string()
                        } else {
                            let mut escaped = line.to_string();
                            for (from, to) in MESSAGE_SUBSTITUTIONS {
                                escaped = escaped.replace(from, to);
                            }
                            format!("echo \"{escaped}\"")
                        }
                    })
                    .collect();

                Some(format!("{}\n", lines.join(" && ")))
            }

            ShellCommand::Call {
                command_line,
                exit_on_error,
                exit_via_return,
            } => Some(self.invocation(
                format!("source {command_line}\n"),
                *exit_on_error,
                *exit_via_return,
            )),

            ShellCommand::Execute {
                command_line,
                exit_on_error,
                exit_via_return,
            } => Some(self.invocation(
                format!("{command_line}\n"),
                *exit_on_error,
                *exit_via_return,
            )),

            ShellCommand::Set { name, values } => match values {
                None => Some(format!("unset {name}\n")),
                Some(values) => {
                    let joined = values.join(":");
                    let joined = joined.strip_prefix('"').unwrap_or(&joined);
                    let joined = joined.strip_suffix('"').unwrap_or(joined);
                    Some(format!("export {name}=\"{joined}\"\n"))
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
                            format!("export {name}=\"{value}:${{{name}}}\"")
                        } else {
                            format!("export {name}=\"${{{name}}}:{value}\"")
                        };

                        format!(
                            "[[ \":${{{name}}}:\" != *\":{value}:\"* ]] && {assignment}"
                        )
                    })
                    .collect();

                Some(format!("{}\n", statements.join("\n")))
            }

            ShellCommand::Exit {
                pause_on_success,
                pause_on_error,
                return_code,
            } => {
                let success = if *pause_on_success {
                    "if [[ $? -eq 0 ]]; then\n    read -p \"Press [Enter] to continue\"\nfi\n"
                } else {
                    ""
                };
                let error = if *pause_on_error {
                    "if [[ $? -ne 0 ]]; then\n    read -p \"Press [Enter] to continue\"\nfi\n"
                } else {
                    ""
                };

                Some(format!(
                    "{success}{error}return {}\n",
                    return_code.unwrap_or(0)
                ))
            }

            ShellCommand::ExitOnError {
                mode,
                use_return_statement,
            } => {
                let status = match mode {
                    ErrorExit::FromVariable(variable) => format!("${variable}"),
                    _ => "$?".to_string(),
                };
                let code = match mode {
                    ErrorExit::WithCode(code) => code.to_string(),
                    _ => "$error_code".to_string(),
                };
                let keyword = if *use_return_statement { "return" } else { "exit" };

                Some(format!(
                    "error_code={status}\nif [[ $error_code -ne 0 ]]; then\n    {keyword} {code}\nfi\n"
                ))
            }

            ShellCommand::EchoOff => Some("set +x\n".to_string()),

            ShellCommand::PersistError { variable_name } => {
                Some(format!("{variable_name}=$?\n"))
            }

            ShellCommand::PushDirectory { path } => match path {
                // Without a path, change to the directory of the sourced script.
                None => Some(
                    "pushd $( cd \"$( dirname \"${BASH_SOURCE[0]}\" )\" > /dev/null 2>&1 && pwd ) > /dev/null\n"
                        .to_string(),
                ),
                Some(path) => {
                    let posix = path.to_string_lossy().replace('\\', "/");
                    Some(format!("pushd \"{posix}\" > /dev/null\n"))
                }
            },

            ShellCommand::PopDirectory => Some("popd > /dev/null\n".to_string()),

            ShellCommand::Raw(text) => Some(text.clone()),
        }
    }
}

impl BashRenderer {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn render(command: &ShellCommand) -> String {
        BashRenderer
            .render(command)
            .expect("bash renders every command")
    }

    #[test]
    fn test_message_escaping() {
        assert_eq!(
            render(&ShellCommand::message("cost: $5 \"quoted\" `tick`")),
            "echo \"cost: \\$5 \\\"quoted\\\" \\\\\\`tick\\\\\\`\"\n"
        );
    }

    #[test]
    fn test_multiline_message_joins_with_and() {
        assert_eq!(
            render(&ShellCommand::message("one\n\ntwo")),
            "echo \"one\" && echo \"\" && echo \"two\"\n"
        );
    }

    #[test]
    fn test_set_joins_and_strips_outer_quotes() {
        assert_eq!(
            render(&ShellCommand::set_many(
                "VAR",
                vec!["\"a".to_string(), "b\"".to_string()]
            )),
            "export VAR=\"a:b\"\n"
        );
        assert_eq!(render(&ShellCommand::unset("VAR")), "unset VAR\n");
    }

    #[test]
    fn test_augment_append() {
        assert_eq!(
            render(&ShellCommand::augment("PATH", "/tools/bin")),
            "[[ \":${PATH}:\" != *\":/tools/bin:\"* ]] && export PATH=\"${PATH}:/tools/bin\"\n"
        );
    }

    #[test]
    fn test_augment_prepend() {
        assert_eq!(
            render(&ShellCommand::Augment {
                name: "PATH".to_string(),
                values: vec!["/tools/bin".to_string()],
                prepend: true,
            }),
            "[[ \":${PATH}:\" != *\":/tools/bin:\"* ]] && export PATH=\"/tools/bin:${PATH}\"\n"
        );
    }

    #[test]
    fn test_call_appends_error_check() {
        assert_eq!(
            render(&ShellCommand::call("./other.sh")),
            "source ./other.sh\nerror_code=$?\nif [[ $error_code -ne 0 ]]; then\n    exit $error_code\nfi\n"
        );
    }

    #[test]
    fn test_execute_with_return_statement() {
        assert_eq!(
            render(&ShellCommand::Execute {
                command_line: "make all".to_string(),
                exit_on_error: true,
                exit_via_return: true,
            }),
            "make all\nerror_code=$?\nif [[ $error_code -ne 0 ]]; then\n    return $error_code\nfi\n"
        );
    }

    #[test]
    fn test_execute_without_error_check() {
        assert_eq!(
            render(&ShellCommand::Execute {
                command_line: "make all".to_string(),
                exit_on_error: false,
                exit_via_return: false,
            }),
            "make all\n"
        );
    }

    #[test]
    fn test_exit_on_error_modes() {
        assert_eq!(
            render(&ShellCommand::ExitOnError {
                mode: ErrorExit::FromVariable("saved".to_string()),
                use_return_statement: false,
            }),
            "error_code=$saved\nif [[ $error_code -ne 0 ]]; then\n    exit $error_code\nfi\n"
        );
        assert_eq!(
            render(&ShellCommand::ExitOnError {
                mode: ErrorExit::WithCode(3),
                use_return_statement: false,
            }),
            "error_code=$?\nif [[ $error_code -ne 0 ]]; then\n    exit 3\nfi\n"
        );
    }

    #[test]
    fn test_exit_with_pauses() {
        let rendered = render(&ShellCommand::Exit {
            pause_on_success: true,
            pause_on_error: true,
            return_code: Some(2),
        });

        assert!(rendered.contains("if [[ $? -eq 0 ]]; then"));
        assert!(rendered.contains("if [[ $? -ne 0 ]]; then"));
        assert!(rendered.contains("read -p \"Press [Enter] to continue\""));
        assert!(rendered.ends_with("return 2\n"));
    }

    #[test]
    fn test_push_and_pop_directory() {
        assert_eq!(
            render(&ShellCommand::PushDirectory {
                path: Some(PathBuf::from("/opt/tools"))
            }),
            "pushd \"/opt/tools\" > /dev/null\n"
        );
        assert!(
            render(&ShellCommand::PushDirectory { path: None }).contains("BASH_SOURCE[0]")
        );
        assert_eq!(render(&ShellCommand::PopDirectory), "popd > /dev/null\n");
    }

    #[test]
    fn test_persist_error() {
        assert_eq!(
            render(&ShellCommand::PersistError {
                variable_name: "saved".to_string()
            }),
            "saved=$?\n"
        );
    }
}
