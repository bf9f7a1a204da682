// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use crate::constant::{
    DEFAULT_OUT_DIR, INDIVIDUALS_DIR, MERGED_ARCHIVE, MERGED_JSON, OUT_DIR_ENV, TEMP_DIR,
};

/// Resolve the default output directory
///
/// Uses `ANNOMERGE_OUT_DIR` when it is set to a non-empty value and falls
/// back to `Merger` in the current working directory otherwise.
pub fn default_out_dir() -> PathBuf {
    if let Ok(out_dir) = std::env::var(OUT_DIR_ENV) {
        if !out_dir.is_empty() {
            return PathBuf::from(out_dir);
        }
    }

    PathBuf::from(DEFAULT_OUT_DIR)
}

/// Output layout and switches for a single merge run
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub out_dir: PathBuf,
    pub check_references: bool,
    pub verbose: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            check_references: false,
            verbose: false,
        }
    }
}

impl MergeConfig {
    /// Default layout rooted at the provided output directory
    pub fn with_out_dir<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn individuals_path(&self) -> PathBuf {
        self.out_dir.join(INDIVIDUALS_DIR)
    }

    pub fn temp_path(&self) -> PathBuf {
        self.out_dir.join(TEMP_DIR)
    }

    pub fn merged_json_path(&self) -> PathBuf {
        self.out_dir.join(MERGED_JSON)
    }

    pub fn merged_archive_path(&self) -> PathBuf {
        self.out_dir.join(MERGED_ARCHIVE)
    }
}
