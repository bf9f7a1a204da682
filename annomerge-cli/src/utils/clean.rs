// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::PathBuf;

use clap::Args;

use annomerge_core::an::{JsonLayout, clean_document};
use annomerge_core::io::{read_json, write_json};
use annomerge_core::ut;

#[derive(Debug, Args)]
#[command(about = "Reduce image references in a Label Studio or COCO JSON file to bare filenames.")]
pub struct CleanArgs {
    #[arg(short = 'i', long, help = "Input JSON file.", required = true)]
    pub input: Option<String>,

    #[arg(short = 'o', long, help = "Output JSON file.", required = true)]
    pub output: Option<String>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn utils_clean(args: &CleanArgs) {
    let input = PathBuf::from(args.input.to_owned().unwrap_or_default());
    let output = PathBuf::from(args.output.to_owned().unwrap_or_default());

    if !input.is_file() {
        eprintln!(
            "[annomerge::utils::clean] ERROR: Input file {} does not exist.",
            input.display()
        );
        std::process::exit(1);
    }

    let extension = output
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    if extension.as_deref() != Some("json") {
        eprintln!("[annomerge::utils::clean] ERROR: Invalid output extension. Must end with .json.");
        std::process::exit(1);
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            eprintln!(
                "[annomerge::utils::clean] ERROR: Invalid output path. Parent directory of output file path does not exist."
            );
            std::process::exit(1);
        }
    }

    ut::track::progress_log(&format!("Reading {}", input.display()), args.verbose);

    let mut document = read_json(&input).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let report = clean_document(&mut document);

    if report.layout == JsonLayout::Unknown {
        ut::track::progress_warn("Unknown JSON structure. Could not sanitize.");
    } else {
        println!(
            "[OK] Cleaned {} paths in {} format.",
            ut::track::thousands_format(report.cleaned),
            report.layout
        );
    }

    write_json(&output, &document).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    println!("Saved clean JSON to: {}", output.display());
}
