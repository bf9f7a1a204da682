// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::HashSet;

use crate::an::Task;
use crate::an::clean::clean_path;

/// Image references whose filename is absent from the merged archive
///
/// Each reference is reduced to a bare filename (see [`clean_path`]) and
/// compared against the flattened archive entries. Tasks without an image
/// reference are ignored.
///
/// # Arguments
///
/// * `tasks` - Merged tasks
/// * `archive_files` - Filenames written to the merged archive
pub fn missing_references(tasks: &[Task], archive_files: &[String]) -> Vec<String> {
    let available: HashSet<&str> = archive_files.iter().map(String::as_str).collect();

    tasks
        .iter()
        .filter_map(Task::image)
        .filter(|image| !available.contains(clean_path(image).as_str()))
        .map(str::to_string)
        .collect()
}
