// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Args, Subcommand};

mod clean;

use clean::{CleanArgs, utils_clean};

#[derive(Debug, Args)]
#[command(about = "General utilities for preparing annotation exports.")]
#[command(args_conflicts_with_subcommands = true)]
#[command(arg_required_else_help = true)]
#[command(flatten_help = true)]
pub struct UtilsArgs {
    #[command(subcommand)]
    command: Option<UtilsCommands>,
}

#[derive(Debug, Subcommand)]
enum UtilsCommands {
    Clean(CleanArgs),
}

pub fn utils(args: &UtilsArgs) {
    match args.command.as_ref() {
        Some(UtilsCommands::Clean(clean_args)) => utils_clean(clean_args),
        None => {}
    }
}
