// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::PathBuf;

use clap::{ArgAction, Args};
use colored::*;

use annomerge_core::config::MergeConfig;
use annomerge_core::pipeline::{Member, merge_members};
use annomerge_core::ut;

#[derive(Debug, Args)]
#[command(about = "Merge Label Studio annotations and image archives from 2 to 4 team members.")]
pub struct MergeArgs {
    #[arg(
        short = 'm',
        long,
        num_args = 3,
        value_names = ["NAME", "JSON", "ZIP"],
        action = ArgAction::Append,
        required = true,
        help = "Member entry: full name, annotations.json, images.zip (repeat for each member)."
    )]
    pub member: Vec<String>,

    #[arg(
        short = 'o',
        long,
        help = "Output directory. Defaults to $ANNOMERGE_OUT_DIR or ./Merger."
    )]
    pub out_dir: Option<String>,

    #[arg(
        long,
        help = "Warn about task image references missing from the merged archive."
    )]
    pub check_references: bool,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

/// Group the flat `--member` values into (name, json, zip) submissions
pub fn members_from_values(values: &[String]) -> Vec<Member> {
    values
        .chunks_exact(3)
        .map(|chunk| Member::new(chunk[0].as_str(), &chunk[1], &chunk[2]))
        .collect()
}

pub fn merge(args: &MergeArgs) {
    let members = members_from_values(&args.member);

    let mut config = match &args.out_dir {
        Some(out_dir) => MergeConfig::with_out_dir(PathBuf::from(out_dir)),
        None => MergeConfig::default(),
    };
    config.check_references = args.check_references;
    config.verbose = args.verbose;

    let report = merge_members(&members, &config).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    println!("{}", "Merge complete.".bold());
    println!("Merged JSON: {}", report.merged_json.display());
    println!("Merged images ZIP: {}", report.merged_archive.display());
    println!(
        "Images written: {} | Duplicates skipped: {}",
        ut::track::thousands_format(report.images_written),
        ut::track::thousands_format(report.images_skipped)
    );
    println!(
        "Merged tasks: {}",
        ut::track::thousands_format(report.merged_tasks)
    );

    if let Some(missing) = report.missing_references {
        if missing.is_empty() {
            println!("All task image references resolve to archive entries.");
        } else {
            for reference in missing.iter() {
                ut::track::progress_warn(&format!(
                    "Image reference not found in merged archive: {}",
                    reference
                ));
            }
            println!(
                "Unresolved image references: {}",
                ut::track::thousands_format(missing.len())
            );
        }
    }
}
