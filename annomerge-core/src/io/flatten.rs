// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use kdam::BarExt;
use zip::ZipArchive;

use crate::constant::{RENAME_DIGEST_LENGTH, UNZIP_TMP_PREFIX};
use crate::error::MergeError;
use crate::io::digest::digest_file;
use crate::ut::path::{
    clear_directory, collect_regular_files, entry_path, has_image_extension, is_os_metadata,
};
use crate::ut::track::{progress_bar, progress_log, thousands_format};

/// Counts reported by a single flatten run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenSummary {
    pub written: usize,
    pub skipped: usize,
    /// Output filenames in the order they were written
    pub files: Vec<String>,
}

/// Accumulator for one flatten call
///
/// Tracks every content digest retained so far, the names written, and the
/// duplicate counter.
#[derive(Debug, Default)]
pub struct FlattenContext {
    seen: HashSet<String>,
    files: Vec<String>,
    skipped: usize,
}

impl FlattenContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy one candidate image into the output directory unless its bytes were seen
    ///
    /// # Arguments
    ///
    /// * `path` - Candidate image file
    /// * `dest_dir` - Flattened output directory
    pub fn ingest(&mut self, path: &Path, dest_dir: &Path) -> Result<(), MergeError> {
        let digest = digest_file(path)?;

        if self.seen.contains(&digest) {
            self.skipped += 1;
            return Ok(());
        }

        let target = unique_target(dest_dir, path, &digest)?;

        std::fs::copy(path, &target)
            .map_err(|err| MergeError::WriteError(format!("{}: {}", target.display(), err)))?;

        let name = target
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        self.seen.insert(digest);
        self.files.push(name);

        Ok(())
    }

    pub fn into_summary(self) -> FlattenSummary {
        FlattenSummary {
            written: self.files.len(),
            skipped: self.skipped,
            files: self.files,
        }
    }
}

/// Pick a free output path for an image, disambiguating by digest on a name clash
fn unique_target(dest_dir: &Path, path: &Path, digest: &str) -> Result<PathBuf, MergeError> {
    let name = path
        .file_name()
        .ok_or_else(|| MergeError::ReadError(format!("{} has no filename", path.display())))?;

    let target = dest_dir.join(name);
    if !target.exists() {
        return Ok(target);
    }

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let short = &digest[..RENAME_DIGEST_LENGTH.min(digest.len())];

    let target = dest_dir.join(format!("{}_{}{}", stem, short, suffix));
    if !target.exists() {
        return Ok(target);
    }

    let mut index = 1usize;
    loop {
        let target = dest_dir.join(format!("{}_{}_{}{}", stem, short, index, suffix));
        if !target.exists() {
            return Ok(target);
        }
        index += 1;
    }
}

/// Extract a single archive into a directory
///
/// Entries are streamed one by one under a sanitized relative path (see
/// [`entry_path`]), so Windows separators, absolute names and `..`
/// segments never escape the directory.
fn extract_archive(archive: &Path, directory: &Path) -> Result<(), MergeError> {
    std::fs::create_dir_all(directory)
        .map_err(|err| MergeError::DirError(format!("{}: {}", directory.display(), err)))?;

    let file = File::open(archive)
        .map_err(|err| MergeError::NoFileError(format!("{}: {}", archive.display(), err)))?;

    let mut zip = ZipArchive::new(file)
        .map_err(|err| MergeError::ArchiveError(format!("{}: {}", archive.display(), err)))?;

    for idx in 0..zip.len() {
        let mut entry = zip
            .by_index(idx)
            .map_err(|err| MergeError::ArchiveError(format!("{}: {}", archive.display(), err)))?;

        if entry.is_dir() {
            continue;
        }

        let Some(relative) = entry_path(entry.name()) else {
            continue;
        };

        let target = directory.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| MergeError::DirError(format!("{}: {}", parent.display(), err)))?;
        }

        let mut output = File::create(&target)
            .map_err(|err| MergeError::WriteError(format!("{}: {}", target.display(), err)))?;

        std::io::copy(&mut entry, &mut output).map_err(|err| {
            MergeError::ArchiveError(format!("{} ({}): {}", archive.display(), entry.name(), err))
        })?;
    }

    Ok(())
}

/// Extract image archives into one directory, dropping byte-identical duplicates
///
/// The destination is cleared first. Archives are extracted into a scoped
/// working area next to the destination (one subdirectory per archive) that
/// is removed on success and on every error path.
///
/// # Arguments
///
/// * `archives` - Archive paths in submission order
/// * `dest_dir` - Directory receiving the flattened images
/// * `verbose` - Print progress to console
pub fn flatten_archives<P: AsRef<Path>>(
    archives: &[P],
    dest_dir: &Path,
    verbose: bool,
) -> Result<FlattenSummary, MergeError> {
    clear_directory(dest_dir)?;

    let parent = dest_dir
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let work = tempfile::Builder::new()
        .prefix(UNZIP_TMP_PREFIX)
        .tempdir_in(parent)
        .map_err(|err| MergeError::DirError(format!("{}: {}", parent.display(), err)))?;

    let mut roots = Vec::with_capacity(archives.len());
    for (idx, archive) in archives.iter().enumerate() {
        let root = work.path().join(idx.to_string());
        extract_archive(archive.as_ref(), &root)?;
        roots.push(root);
    }

    let mut candidates = Vec::new();
    for root in roots.iter() {
        for path in collect_regular_files(root)? {
            let relative = path.strip_prefix(root).unwrap_or(path.as_path());
            if !is_os_metadata(relative) && has_image_extension(relative) {
                candidates.push(path);
            }
        }
    }

    progress_log(
        &format!(
            "Detected {} candidate images across {} archives.",
            thousands_format(candidates.len()),
            archives.len()
        ),
        verbose,
    );

    let mut pb = progress_bar(candidates.len(), "Flattening images", verbose);
    let mut context = FlattenContext::new();

    for path in candidates.iter() {
        context.ingest(path, dest_dir)?;
        if verbose {
            let _ = pb.update(1);
        }
    }

    if verbose {
        println!();
    }

    work.close()
        .map_err(|err| MergeError::DirError(err.to_string()))?;

    Ok(context.into_summary())
}

#[cfg(test)]
mod test {

    use super::*;

    use std::io::Write;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    fn leftover_work_dirs(root: &Path) -> usize {
        std::fs::read_dir(root)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(UNZIP_TMP_PREFIX))
            .count()
    }

    #[test]
    pub fn test_identical_images_are_deduplicated() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        let b = root.path().join("b.zip");
        write_zip(&a, &[("cat.png", b"same-bytes")]);
        write_zip(&b, &[("nested/cat.png", b"same-bytes")]);

        let dest = root.path().join("images");
        let summary = flatten_archives(&[&a, &b], &dest, false).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.files, vec!["cat.png".to_string()]);
        assert_eq!(std::fs::read(dest.join("cat.png")).unwrap(), b"same-bytes");
    }

    #[test]
    pub fn test_same_name_distinct_bytes_are_renamed() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        let b = root.path().join("b.zip");
        write_zip(&a, &[("cat.png", b"first cat")]);
        write_zip(&b, &[("cat.png", b"second cat")]);

        let dest = root.path().join("images");
        let summary = flatten_archives(&[&a, &b], &dest, false).unwrap();

        assert_eq!(summary.written, 2);
        assert_eq!(summary.skipped, 0);

        let renamed = format!("cat_{}.png", &crate::io::digest_bytes(b"second cat")[..8]);
        assert_eq!(summary.files, vec!["cat.png".to_string(), renamed.clone()]);
        assert_eq!(std::fs::read(dest.join("cat.png")).unwrap(), b"first cat");
        assert_eq!(std::fs::read(dest.join(renamed)).unwrap(), b"second cat");
    }

    #[test]
    pub fn test_duplicate_under_different_name() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        write_zip(&a, &[("x/one.jpg", b"pixels"), ("y/two.jpg", b"pixels")]);

        let dest = root.path().join("images");
        let summary = flatten_archives(&[&a], &dest, false).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.files, vec!["one.jpg".to_string()]);
    }

    #[test]
    pub fn test_metadata_and_non_images_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        write_zip(
            &a,
            &[
                ("dog.JPG", b"dog"),
                ("notes.txt", b"text"),
                ("._dog.JPG", b"resource fork"),
                (".DS_Store", b"finder"),
                ("__MACOSX/dog.JPG", b"mac copy"),
            ],
        );

        let dest = root.path().join("images");
        let summary = flatten_archives(&[&a], &dest, false).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 0);
        assert!(dest.join("dog.JPG").exists());
        assert!(!dest.join("notes.txt").exists());
    }

    #[test]
    pub fn test_counts_are_stable_across_runs() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        let b = root.path().join("b.zip");
        write_zip(&a, &[("1.png", b"one"), ("2.png", b"two")]);
        write_zip(&b, &[("2.png", b"two"), ("3.png", b"three"), ("1.png", b"uno")]);

        let dest = root.path().join("images");
        let first = flatten_archives(&[&a, &b], &dest, false).unwrap();
        let second = flatten_archives(&[&a, &b], &dest, false).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.written + first.skipped, 5);
        assert_eq!(std::fs::read_dir(&dest).unwrap().count(), first.written);
    }

    #[test]
    pub fn test_destination_is_cleared() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        write_zip(&a, &[("cat.png", b"cat")]);

        let dest = root.path().join("images");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("stale.png"), b"stale").unwrap();

        flatten_archives(&[&a], &dest, false).unwrap();

        assert!(!dest.join("stale.png").exists());
        assert!(dest.join("cat.png").exists());
    }

    #[test]
    pub fn test_corrupt_archive_cleans_working_area() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        let bad = root.path().join("bad.zip");
        write_zip(&a, &[("cat.png", b"cat")]);
        std::fs::write(&bad, b"this is not a zip archive").unwrap();

        let dest = root.path().join("images");
        let result = flatten_archives(&[&a, &bad], &dest, false);

        assert!(matches!(result, Err(MergeError::ArchiveError(_))));
        assert_eq!(leftover_work_dirs(root.path()), 0);
    }

    #[test]
    pub fn test_empty_archive() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        write_zip(&a, &[]);

        let summary = flatten_archives(&[&a], &root.path().join("images"), false).unwrap();

        assert_eq!(summary, FlattenSummary::default());
    }

    #[test]
    pub fn test_working_area_removed_on_success() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        write_zip(&a, &[("cat.png", b"cat")]);

        flatten_archives(&[&a], &root.path().join("images"), false).unwrap();

        assert_eq!(leftover_work_dirs(root.path()), 0);
    }

    #[test]
    pub fn test_context_skips_seen_digests() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("src");
        let dest = root.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(src.join("a.png"), b"a").unwrap();

        let mut context = FlattenContext::new();
        context.ingest(&src.join("a.png"), &dest).unwrap();
        context.ingest(&src.join("a.png"), &dest).unwrap();

        let summary = context.into_summary();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.files, vec!["a.png".to_string()]);
    }

    #[test]
    pub fn test_windows_separators_are_flattened() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        write_zip(&a, &[("C:\\win\\cat.png", b"cat"), ("imgs\\__MACOSX\\dog.png", b"fork")]);

        let dest = root.path().join("images");
        let summary = flatten_archives(&[&a], &dest, false).unwrap();

        assert_eq!(summary.files, vec!["cat.png".to_string()]);
        assert_eq!(std::fs::read(dest.join("cat.png")).unwrap(), b"cat");
    }

    #[test]
    pub fn test_absolute_and_parent_entries_stay_inside() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a.zip");
        write_zip(&a, &[("/abs/cat.png", b"cat"), ("../up/dog.png", b"dog")]);

        let dest = root.path().join("images");
        let summary = flatten_archives(&[&a], &dest, false).unwrap();

        assert_eq!(summary.files, vec!["cat.png".to_string(), "dog.png".to_string()]);
        assert!(!root.path().join("up").exists());
        assert_eq!(leftover_work_dirs(root.path()), 0);
    }
}
