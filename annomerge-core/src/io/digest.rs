// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha1::{Digest, Sha1};

use crate::constant::DIGEST_BUFFER_SIZE;
use crate::error::MergeError;

/// Compute the SHA-1 content digest of a file as lowercase hex
///
/// The file is streamed through a fixed buffer so large images are never
/// held in memory at once.
///
/// # Arguments
///
/// * `path` - Path to the file to digest
pub fn digest_file<P: AsRef<Path>>(path: P) -> Result<String, MergeError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|err| MergeError::ReadError(format!("{}: {}", path.display(), err)))?;

    let mut reader = BufReader::with_capacity(DIGEST_BUFFER_SIZE, file);
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; DIGEST_BUFFER_SIZE];

    loop {
        let n = reader
            .read(&mut buffer)
            .map_err(|err| MergeError::ReadError(format!("{}: {}", path.display(), err)))?;

        if n == 0 {
            break;
        }

        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the SHA-1 digest of in-memory bytes as lowercase hex
pub fn digest_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
