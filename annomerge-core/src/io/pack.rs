// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use kdam::BarExt;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::MergeError;
use crate::ut::path::collect_regular_files;
use crate::ut::track::progress_bar;

/// Write every regular file below a directory into one deflated zip archive
///
/// Entries are named by their `/`-separated path relative to `src_dir` and
/// added in sorted order with a fixed timestamp, so identical directories
/// always produce identical archives. An existing archive at `output` is
/// replaced, and a partially written archive is removed on failure.
///
/// # Arguments
///
/// * `src_dir` - Directory to pack
/// * `output` - Path to output zip archive
/// * `verbose` - Print progress to console
///
/// Returns the number of entries written.
pub fn pack_directory(src_dir: &Path, output: &Path, verbose: bool) -> Result<usize, MergeError> {
    let mut files = Vec::new();
    for path in collect_regular_files(src_dir)? {
        let relative = path
            .strip_prefix(src_dir)
            .map_err(|err| MergeError::OtherError(err.to_string()))?
            .to_string_lossy()
            .replace('\\', "/");
        files.push((relative, path));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    if output.exists() {
        std::fs::remove_file(output)
            .map_err(|err| MergeError::WriteError(format!("{}: {}", output.display(), err)))?;
    }

    let result = write_archive(&files, output, verbose);
    if result.is_err() {
        let _ = std::fs::remove_file(output);
    }

    result
}

fn write_archive(
    files: &[(String, std::path::PathBuf)],
    output: &Path,
    verbose: bool,
) -> Result<usize, MergeError> {
    let file = File::create(output)
        .map_err(|err| MergeError::WriteError(format!("{}: {}", output.display(), err)))?;

    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut pb = progress_bar(files.len(), "Packing images", verbose);

    for (name, path) in files {
        let mut source = File::open(path)
            .map_err(|err| MergeError::ReadError(format!("{}: {}", path.display(), err)))?;

        zip.start_file(name.as_str(), options)
            .map_err(|err| MergeError::WriteError(format!("{}: {}", name, err)))?;

        std::io::copy(&mut source, &mut zip)
            .map_err(|err| MergeError::WriteError(format!("{}: {}", name, err)))?;

        if verbose {
            let _ = pb.update(1);
        }
    }

    if verbose {
        println!();
    }

    zip.finish()
        .map_err(|err| MergeError::WriteError(format!("{}: {}", output.display(), err)))?;

    Ok(files.len())
}
