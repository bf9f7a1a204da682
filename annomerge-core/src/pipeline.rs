// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use crate::an::{merge_tasks, missing_references};
use crate::config::MergeConfig;
use crate::constant::{MAX_MEMBERS, MIN_MEMBERS};
use crate::error::MergeError;
use crate::io::{flatten_archives, pack_directory, read_task_array, write_json};
use crate::ut::path::safe_name;
use crate::ut::track::{progress_log, thousands_format};

/// One contributor submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub tasks: PathBuf,
    pub archive: PathBuf,
}

impl Member {
    pub fn new<S, P, Q>(name: S, tasks: P, archive: Q) -> Self
    where
        S: Into<String>,
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        Self {
            name: name.into(),
            tasks: tasks.as_ref().to_path_buf(),
            archive: archive.as_ref().to_path_buf(),
        }
    }

    /// Display name sanitized for audit copy filenames
    pub fn safe_name(&self) -> String {
        safe_name(&self.name)
    }
}

/// Summary of a completed merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub merged_json: PathBuf,
    pub merged_archive: PathBuf,
    pub images_written: usize,
    pub images_skipped: usize,
    pub merged_tasks: usize,
    /// Unresolved image references, only populated when the check is enabled
    pub missing_references: Option<Vec<String>>,
}

/// Check the member count and that every declared input exists
///
/// The count is checked before touching the filesystem.
pub fn validate_members(members: &[Member]) -> Result<(), MergeError> {
    validate_member_count(members)?;
    validate_member_files(members)
}

fn validate_member_count(members: &[Member]) -> Result<(), MergeError> {
    if !(MIN_MEMBERS..=MAX_MEMBERS).contains(&members.len()) {
        return Err(MergeError::MemberCountError(members.len()));
    }

    Ok(())
}

fn validate_member_files(members: &[Member]) -> Result<(), MergeError> {
    for member in members.iter() {
        for path in [&member.tasks, &member.archive] {
            if !path.exists() {
                return Err(MergeError::NoFileError(format!(
                    "{} (member '{}')",
                    path.display(),
                    member.name
                )));
            }
        }
    }

    Ok(())
}

/// Remove merged artifacts left by an earlier run
fn remove_previous_outputs(config: &MergeConfig) -> Result<(), MergeError> {
    for path in [config.merged_json_path(), config.merged_archive_path()] {
        if path.is_file() {
            std::fs::remove_file(&path)
                .map_err(|err| MergeError::WriteError(format!("{}: {}", path.display(), err)))?;
        }
    }

    Ok(())
}

/// Copy a member's raw inputs into the individuals directory
fn preserve_inputs(member: &Member, directory: &Path) -> Result<(), MergeError> {
    let safe = member.safe_name();

    let copies = [
        (&member.tasks, directory.join(format!("input_{}.json", safe))),
        (&member.archive, directory.join(format!("images_{}.zip", safe))),
    ];

    for (source, target) in copies.iter() {
        std::fs::copy(source, target).map_err(|err| {
            MergeError::WriteError(format!(
                "{} -> {}: {}",
                source.display(),
                target.display(),
                err
            ))
        })?;
    }

    Ok(())
}

/// Merge contributor annotations and image archives into one dataset
///
/// Merged artifacts from an earlier run in the same output directory are
/// removed once the member count is accepted, so a failed run never leaves
/// stale results behind. Inputs are validated and every task array is
/// parsed before anything is written. The image archive is built before the merged JSON so that a
/// corrupt archive leaves neither merged artifact behind. The temporary
/// image directory is removed whether or not flattening succeeds.
///
/// # Arguments
///
/// * `members` - Two to four contributor submissions in submission order
/// * `config` - Output layout and switches
pub fn merge_members(members: &[Member], config: &MergeConfig) -> Result<MergeReport, MergeError> {
    validate_member_count(members)?;
    remove_previous_outputs(config)?;
    validate_member_files(members)?;

    let task_lists = members
        .iter()
        .map(|member| read_task_array(&member.tasks))
        .collect::<Result<Vec<_>, _>>()?;

    progress_log(
        &format!(
            "Loaded {} tasks from {} members.",
            thousands_format(task_lists.iter().map(Vec::len).sum::<usize>()),
            members.len()
        ),
        config.verbose,
    );

    let individuals = config.individuals_path();
    std::fs::create_dir_all(&individuals)
        .map_err(|err| MergeError::DirError(format!("{}: {}", individuals.display(), err)))?;

    for member in members.iter() {
        preserve_inputs(member, &individuals)?;
    }

    let merged = merge_tasks(&task_lists);

    progress_log(
        &format!("Merged into {} tasks.", thousands_format(merged.len())),
        config.verbose,
    );

    let archives: Vec<&PathBuf> = members.iter().map(|member| &member.archive).collect();
    let temp = config.temp_path();
    let merged_archive = config.merged_archive_path();

    let flattened = flatten_archives(&archives, &temp, config.verbose).and_then(|summary| {
        pack_directory(&temp, &merged_archive, config.verbose)?;
        Ok(summary)
    });

    if temp.exists() {
        let _ = std::fs::remove_dir_all(&temp);
    }

    let summary = flattened?;

    let merged_json = config.merged_json_path();
    write_json(&merged_json, &merged)?;

    let missing = if config.check_references {
        Some(missing_references(&merged, &summary.files))
    } else {
        None
    };

    progress_log("Merge complete.", config.verbose);

    Ok(MergeReport {
        merged_json,
        merged_archive,
        images_written: summary.written,
        images_skipped: summary.skipped,
        merged_tasks: merged.len(),
        missing_references: missing,
    })
}
