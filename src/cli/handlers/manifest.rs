// src/cli/handlers/manifest.rs

use anyhow::{Result, bail};
use colored::Colorize;

use crate::cli::args::ManifestArgs;
use crate::constants::ENV_FILE_EXTENSION;
use crate::core::catalog::NameFilter;
use crate::core::manifest;

pub fn handle(args: ManifestArgs) -> Result<()> {
    let tools_directory = &args.tools_directory;
    if !tools_directory.is_dir() {
        bail!(
            "The tools directory '{}' does not exist.",
            tools_directory.display()
        );
    }

    let names = NameFilter::new(args.include.clone(), args.exclude.clone());

    let outcome = manifest::generate_manifest(
        tools_directory,
        &names,
        ENV_FILE_EXTENSION,
        args.env_content,
    )?;

    for issue in &outcome.issues {
        eprintln!("{} {}", "Warning:".yellow().bold(), issue);
    }

    if outcome.manifest.tools.is_empty() {
        bail!("No tools were found in '{}'.", tools_directory.display());
    }

    manifest::write_manifest(&outcome.manifest, &args.output_filename)?;

    println!(
        "\n{} Described {} tool(s) in '{}'.",
        "✔".green(),
        outcome.manifest.tools.len().to_string().bold(),
        args.output_filename.display().to_string().cyan()
    );

    Ok(())
}
