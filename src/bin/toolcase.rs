// src/bin/toolcase.rs

use clap::Parser;
use colored::Colorize;

use toolcase::cli::{Cli, CliCommand, handlers};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("Parsed arguments: {cli:?}");

    let result = match cli.command {
        CliCommand::Activate(args) => handlers::activate::handle(args),
        CliCommand::Manifest(args) => handlers::manifest::handle(args),
    };

    if let Err(error) = result {
        eprintln!("\n{} {:#}", "Error:".red().bold(), error);
        std::process::exit(1);
    }
}
