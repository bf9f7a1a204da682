// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single Label Studio task
///
/// Only the fields the merge reads or rewrites are typed. Every other key
/// in the export is kept in `extra` and written back unchanged.
///
/// # Examples
///
/// ```
/// use annomerge_core::an::Task;
///
/// let task: Task = serde_json::from_str(r#"{
///     "id": 7,
///     "file_upload": "3f2a-img1.jpg",
///     "data": {"image": "/data/upload/1/3f2a-img1.jpg"}
/// }"#).unwrap();
///
/// assert_eq!(task.upload().as_deref(), Some("3f2a-img1.jpg"));
/// assert_eq!(task.annotations().len(), 0);
/// assert_eq!(task.extra["id"], 7);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_upload: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TaskData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `data` payload of a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One labeler's complete set of markings on a task
///
/// Identifiers are kept as raw JSON values since exports carry both
/// numbers and strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<ResultEntry>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One marking or region within an annotation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Upload identifier when present and non-empty
    ///
    /// Non-string identifiers are rendered as their JSON text.
    pub fn upload(&self) -> Option<String> {
        match present(self.file_upload.as_ref())? {
            Value::String(upload) => Some(upload.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Image reference from the task payload, when it is a string
    pub fn image(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.image.as_ref())
            .and_then(Value::as_str)
    }

    /// Annotations, empty when the field is absent or null
    pub fn annotations(&self) -> &[Annotation] {
        self.annotations.as_deref().unwrap_or_default()
    }
}

impl Annotation {
    /// Result entries, empty when the field is absent or null
    pub fn results(&self) -> &[ResultEntry] {
        self.result.as_deref().unwrap_or_default()
    }
}

impl ResultEntry {
    /// Result identifier when present, not null and not an empty string
    pub fn identifier(&self) -> Option<&Value> {
        present(self.id.as_ref())
    }
}

/// Treat null and the empty string like an absent field
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    })
}
