// src/core/activation.rs

use std::collections::BTreeMap;

use crate::models::ToolConfig;
use crate::shell::commands::ShellCommand;

/// Builds the command sequence that activates the given tools: echo off,
/// then for each tool a guarded PATH augment followed by its merged
/// environment variables.
pub fn create_activation_commands(
    tools: &[(ToolConfig, BTreeMap<String, String>)],
) -> Vec<ShellCommand> {
    let mut shell_commands = vec![ShellCommand::EchoOff];

    for (config, environment) in tools {
        shell_commands.push(ShellCommand::augment(
            "PATH",
            config.binary_directory.to_string_lossy(),
        ));

        for (name, value) in environment {
            shell_commands.push(ShellCommand::set(name.clone(), value.clone()));
        }
    }

    shell_commands
}
