// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::an::Task;
use crate::ut::path::file_name_of;

/// Derive the key used to decide that tasks refer to the same image
///
/// The upload identifier wins when present. Otherwise the base filename of
/// the image reference is used, or the raw reference when it has no
/// filename component.
///
/// # Examples
///
/// ```
/// use annomerge_core::an::{Task, task_key};
///
/// let task: Task = serde_json::from_str(
///     r#"{"data": {"image": "/data/local-files/batch-2/img1.jpg"}}"#
/// ).unwrap();
/// assert_eq!(task_key(&task), "img1.jpg");
///
/// let task: Task = serde_json::from_str(
///     r#"{"file_upload": "8c1e-img1.jpg", "data": {"image": "/data/upload/8c1e-img1.jpg"}}"#
/// ).unwrap();
/// assert_eq!(task_key(&task), "8c1e-img1.jpg");
/// ```
pub fn task_key(task: &Task) -> String {
    if let Some(upload) = task.upload() {
        return upload;
    }

    let image = task.image().unwrap_or_default();
    file_name_of(image).unwrap_or(image).to_string()
}
