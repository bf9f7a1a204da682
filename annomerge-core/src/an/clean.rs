// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fmt;

use serde_json::Value;

use crate::constant::{COCO_FILE_NAME_KEY, COCO_IMAGES_KEY};
use crate::ut::path::file_name_of;

/// Layout detected when cleaning a JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    LabelStudio,
    Coco,
    Unknown,
}

impl fmt::Display for JsonLayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JsonLayout::LabelStudio => write!(f, "Label Studio list"),
            JsonLayout::Coco => write!(f, "COCO dictionary"),
            JsonLayout::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub layout: JsonLayout,
    pub cleaned: usize,
}

/// Reduce an image reference to a bare filename
///
/// Percent-encoded characters are decoded first so that encoded Windows
/// separators are honoured. When a query marker survives in the filename,
/// only the text after the last `?` is kept.
///
/// # Examples
///
/// ```
/// use annomerge_core::an::clean_path;
///
/// assert_eq!(
///     clean_path("/data/local-files/?d=C%3A%5Cteam%5Cimages%5C20251112_123441.jpg"),
///     "20251112_123441.jpg"
/// );
/// assert_eq!(clean_path("/data/upload/3/cat%20one.png"), "cat one.png");
/// assert_eq!(clean_path("cat.png"), "cat.png");
/// ```
pub fn clean_path(path: &str) -> String {
    let decoded = urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_string());

    let name = file_name_of(&decoded).unwrap_or_default();

    match name.rsplit_once('?') {
        Some((_, after)) => after.to_string(),
        None => name.to_string(),
    }
}

/// Clean a string value in place, returning whether it changed
fn clean_value(value: &mut Value) -> bool {
    let Some(original) = value.as_str() else {
        return false;
    };

    let cleaned = clean_path(original);
    if cleaned == original {
        return false;
    }

    *value = Value::String(cleaned);
    true
}

/// Clean image references in a Label Studio task array or COCO document
///
/// Task arrays have `data.image` and `file_upload` cleaned, with changed
/// image references counted. COCO documents have every
/// `images[].file_name` cleaned and counted. Any other layout is left
/// untouched.
pub fn clean_document(document: &mut Value) -> CleanReport {
    if let Some(tasks) = document.as_array_mut() {
        let mut cleaned = 0;

        for task in tasks.iter_mut() {
            if let Some(image) = task.get_mut("data").and_then(|data| data.get_mut("image")) {
                if clean_value(image) {
                    cleaned += 1;
                }
            }

            if let Some(upload) = task.get_mut("file_upload") {
                clean_value(upload);
            }
        }

        return CleanReport {
            layout: JsonLayout::LabelStudio,
            cleaned,
        };
    }

    if let Some(images) = document
        .get_mut(COCO_IMAGES_KEY)
        .and_then(Value::as_array_mut)
    {
        let cleaned = images
            .iter_mut()
            .filter_map(|image| image.get_mut(COCO_FILE_NAME_KEY))
            .map(clean_value)
            .filter(|changed| *changed)
            .count();

        return CleanReport {
            layout: JsonLayout::Coco,
            cleaned,
        };
    }

    CleanReport {
        layout: JsonLayout::Unknown,
        cleaned: 0,
    }
}
