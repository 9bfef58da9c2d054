// src/cli/mod.rs

pub mod args;
pub mod handlers;

use clap::{Parser, Subcommand};

use crate::cli::args::{ActivateArgs, ManifestArgs};

#[derive(Parser, Debug)]
#[command(
    name = "toolcase",
    version,
    about = "Works with tools organized in a well-defined directory structure.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Create a script that activates tools for the current machine.
    Activate(ActivateArgs),

    /// Write a YAML manifest describing every tool configuration found.
    Manifest(ManifestArgs),
}
