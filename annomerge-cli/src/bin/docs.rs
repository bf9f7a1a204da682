#![allow(clippy::all)]
use clap::{Parser, Subcommand};

use annomerge_cli::{merge, utils};

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
    clap_markdown::print_help_markdown::<Cli>();
}
