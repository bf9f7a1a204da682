// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constant::IMAGE_EXTENSIONS;
use crate::error::MergeError;

/// Sanitize a contributor display name for use in a filename
///
/// Characters other than alphanumerics, space, underscore, dash, and dot
/// become underscores, then spaces become underscores.
///
/// # Arguments
///
/// * `name` - Contributor display name
///
/// # Examples
///
/// ```
/// use annomerge_core::ut::path::safe_name;
///
/// assert_eq!(safe_name("  Alice Smith "), "Alice_Smith");
/// assert_eq!(safe_name("Bob/Borg?"), "Bob_Borg_");
/// assert_eq!(safe_name("cara.vella-2"), "cara.vella-2");
/// ```
pub fn safe_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, ' ' | '_' | '-' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect::<String>()
        .replace(' ', "_")
}

/// Base filename of a path-like reference, treating `/` and `\` as separators
///
/// Returns `None` when the reference has no non-empty final segment.
///
/// # Examples
///
/// ```
/// use annomerge_core::ut::path::file_name_of;
///
/// assert_eq!(file_name_of("/data/upload/1/img1.jpg"), Some("img1.jpg"));
/// assert_eq!(file_name_of("C:\\images\\img2.png"), Some("img2.png"));
/// assert_eq!(file_name_of("images/"), Some("images"));
/// assert_eq!(file_name_of(""), None);
/// ```
pub fn file_name_of(reference: &str) -> Option<&str> {
    reference
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
}

/// Relative path for an archive entry name, safe to join under a directory
///
/// Both `/` and `\` separate segments. Empty, `.`, `..` and drive prefix
/// segments are dropped, so absolute and traversing names land inside the
/// extraction root. Returns `None` when nothing remains.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use annomerge_core::ut::path::entry_path;
///
/// assert_eq!(entry_path("C:\\win\\cat.png"), Some(PathBuf::from("win/cat.png")));
/// assert_eq!(entry_path("../up/cat.png"), Some(PathBuf::from("up/cat.png")));
/// assert_eq!(entry_path("/"), None);
/// ```
pub fn entry_path(name: &str) -> Option<PathBuf> {
    let path: PathBuf = name
        .split(['/', '\\'])
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .filter(|segment| !segment.ends_with(':'))
        .collect();

    (!path.as_os_str().is_empty()).then_some(path)
}

/// Remove a directory if present and recreate it empty
pub fn clear_directory<P: AsRef<Path>>(directory: P) -> Result<(), MergeError> {
    let directory = directory.as_ref();

    if directory.exists() {
        std::fs::remove_dir_all(directory)
            .map_err(|err| MergeError::DirError(format!("{}: {}", directory.display(), err)))?;
    }

    std::fs::create_dir_all(directory)
        .map_err(|err| MergeError::DirError(format!("{}: {}", directory.display(), err)))
}

/// Check whether a path is an operating system metadata artifact
pub fn is_os_metadata(path: &Path) -> bool {
    let hidden_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("._") || name.contains("DS_Store"));

    hidden_name
        || path
            .components()
            .any(|component| component.as_os_str() == "__MACOSX")
}

/// Check whether a path carries one of the recognized image extensions
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Collect every regular file below a directory sorted by path
///
/// Symbolic links are not followed and are not returned.
///
/// # Arguments
///
/// * `directory` - Root directory to walk
pub fn collect_regular_files<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>, MergeError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(directory.as_ref()).sort_by_file_name() {
        let entry = entry.map_err(|err| MergeError::DirError(err.to_string()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
