// src/cli/handlers/activate.rs

use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;

use crate::cli::args::ActivateArgs;
use crate::constants::ENV_FILE_EXTENSION;
use crate::core::catalog::{self, CurrentPlatformQuery, NameFilter};
use crate::core::{activation, env_files, version};
use crate::models::{Architecture, OperatingSystem, ToolConfig};
use crate::shell;

pub fn handle(args: ActivateArgs) -> Result<()> {
    let tools_directory = &args.tools_directory;
    if !tools_directory.is_dir() {
        bail!(
            "The tools directory '{}' does not exist.",
            tools_directory.display()
        );
    }

    // 1. Resolve each tool to the configuration for this machine.
    let query = CurrentPlatformQuery {
        names: NameFilter::new(args.include.clone(), args.exclude.clone()),
        tool_versions: version::parse_tool_version_args(&args.tool_versions)?,
        operating_system: OperatingSystem::current()?,
        architecture: Architecture::current()?,
        allow_generic_operating_system: !args.no_generic_operating_system,
        allow_generic_architecture: !args.no_generic_architecture,
    };

    let outcome = catalog::resolve_current(tools_directory, &query)?;

    for error in &outcome.errors {
        eprintln!("{} {}", "Warning:".yellow().bold(), error);
    }

    if outcome.configs.is_empty() {
        bail!("No tools were found in '{}'.", tools_directory.display());
    }

    if args.verbose {
        print_configurations(&outcome.configs);
    }

    // 2. Gather and merge each tool's environment files.
    let mut tools: Vec<(ToolConfig, BTreeMap<String, String>)> = Vec::new();

    for config in outcome.configs {
        let environment = env_files::load_tool_environment(&config, ENV_FILE_EXTENSION);

        for error in &environment.errors {
            eprintln!("{} {}", "Warning:".yellow().bold(), error);
        }

        tools.push((config, environment.values));
    }

    // 3. Render the activation script.
    let shell_commands = activation::create_activation_commands(&tools);
    let script = shell::render_script(args.output_type, &shell_commands);

    if let Some(parent) = args.output_filename.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create the directory '{}'.", parent.display())
        })?;
    }

    fs::write(&args.output_filename, script).with_context(|| {
        format!("Failed to write '{}'.", args.output_filename.display())
    })?;

    println!(
        "\n{} Activated {} tool(s) in '{}'.",
        "✔".green(),
        tools.len().to_string().bold(),
        args.output_filename.display().to_string().cyan()
    );

    Ok(())
}

fn print_configurations(configs: &[ToolConfig]) {
    for config in configs {
        let title = match &config.version {
            Some(version) => format!("{} (v{version})", config.name),
            None => config.name.clone(),
        };

        println!("\n{}", title.bold());
        println!("{}", "-".repeat(title.len()).dimmed());
        println!("  Root:              {}", config.root_directory.display());
        println!(
            "  Versioned:         {}",
            config.versioned_directory.display()
        );
        println!("  Binary:            {}", config.binary_directory.display());
        println!(
            "  Operating System:  {}",
            config
                .operating_system
                .map(|tag| tag.name())
                .unwrap_or("<none>")
        );
        println!(
            "  Architecture:      {}",
            config
                .architecture
                .map(|tag| tag.name())
                .unwrap_or("<none>")
        );
    }
}
