// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::an::Task;
use crate::error::MergeError;

/// Read any JSON document from disk
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Value, MergeError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|err| MergeError::NoFileError(format!("{}: {}", path.display(), err)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| MergeError::ReadError(format!("{}: {}", path.display(), err)))
}

/// Read a Label Studio task array
///
/// The top level of the document must be an array of task objects.
///
/// # Arguments
///
/// * `path` - Path to a Label Studio JSON export
pub fn read_task_array<P: AsRef<Path>>(path: P) -> Result<Vec<Task>, MergeError> {
    let path = path.as_ref();
    let data = read_json(path).map_err(|err| match err {
        MergeError::ReadError(message) => MergeError::TaskArrayError(message),
        other => other,
    })?;

    if !data.is_array() {
        return Err(MergeError::TaskArrayError(format!(
            "{} does not contain a top-level array",
            path.display()
        )));
    }

    serde_json::from_value(data)
        .map_err(|err| MergeError::TaskArrayError(format!("{}: {}", path.display(), err)))
}

/// Write a value as indented UTF-8 JSON with non-ASCII characters unescaped
pub fn write_json<P, T>(path: P, value: &T) -> Result<(), MergeError>
where
    P: AsRef<Path>,
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|err| MergeError::WriteError(format!("{}: {}", path.display(), err)))?;

    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|err| MergeError::WriteError(format!("{}: {}", path.display(), err)))?;

    writer
        .flush()
        .map_err(|err| MergeError::WriteError(format!("{}: {}", path.display(), err)))
}
