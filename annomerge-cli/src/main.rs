// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use annomerge_cli::{merge, utils};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Merge(merge::MergeArgs),
    Utils(utils::UtilsArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Merge(merge_args)) => merge::merge(merge_args),
        Some(Commands::Utils(utils_args)) => utils::utils(utils_args),
        None => {}
    }
}
