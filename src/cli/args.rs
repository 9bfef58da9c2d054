// src/cli/args.rs

use clap::Parser;
use std::path::PathBuf;

use crate::constants::TOOL_LAYOUT_HELP;
use crate::shell::ShellKind;

#[derive(Parser, Debug)]
#[command(after_long_help = TOOL_LAYOUT_HELP)]
pub struct ActivateArgs {
    /// Path to the script to generate.
    pub output_filename: PathBuf,

    /// The type of script to generate.
    #[arg(value_enum)]
    pub output_type: ShellKind,

    /// Path to the directory containing the tools.
    pub tools_directory: PathBuf,

    /// Name of a tool to include; all tools found are included by default.
    #[arg(long, short = 'i', value_name = "NAME")]
    pub include: Vec<String>,

    /// Name of a tool to exclude; no tools are excluded by default.
    #[arg(long, short = 'e', value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Specific version of a tool to use, as NAME=VERSION; the latest
    /// version found is used by default.
    #[arg(long = "tool-version", value_name = "NAME=VERSION")]
    pub tool_versions: Vec<String>,

    /// Do not let a 'Generic' directory satisfy the current operating system.
    #[arg(long)]
    pub no_generic_operating_system: bool,

    /// Do not let a 'Generic' directory satisfy the current architecture.
    #[arg(long)]
    pub no_generic_architecture: bool,

    /// Write verbose information to the terminal.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(after_long_help = TOOL_LAYOUT_HELP)]
pub struct ManifestArgs {
    /// Path to the manifest file to generate.
    pub output_filename: PathBuf,

    /// Path to the directory containing the tools.
    pub tools_directory: PathBuf,

    /// Name of a tool to include; all tools found are included by default.
    #[arg(long, short = 'i', value_name = "NAME")]
    pub include: Vec<String>,

    /// Name of a tool to exclude; no tools are excluded by default.
    #[arg(long, short = 'e', value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Embed the content of each environment file in the manifest instead of
    /// its path.
    #[arg(long)]
    pub env_content: bool,
}
