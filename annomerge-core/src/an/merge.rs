// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use indexmap::IndexMap;
use serde_json::Value;

use crate::an::key::task_key;
use crate::an::{Annotation, ResultEntry, Task};
use crate::constant::RESULT_DIGEST_LENGTH;
use crate::io::digest_bytes;

/// Group tasks from every contributor by task key
///
/// Groups are ordered by the first appearance of their key, and tasks
/// within a group keep contributor submission order.
pub fn group_tasks(task_lists: &[Vec<Task>]) -> IndexMap<String, Vec<&Task>> {
    let mut groups: IndexMap<String, Vec<&Task>> = IndexMap::new();

    for task in task_lists.iter().flatten() {
        groups.entry(task_key(task)).or_default().push(task);
    }

    groups
}

/// Synthesize a result identifier from an annotation id and the entry contents
///
/// # Examples
///
/// ```
/// use annomerge_core::an::{ResultEntry, result_id};
///
/// let entry: ResultEntry = serde_json::from_str(r#"{"type": "choices"}"#).unwrap();
/// let id = result_id(2, &entry);
///
/// assert!(id.starts_with("res_2_"));
/// assert_eq!(id.len(), "res_2_".len() + 6);
/// ```
pub fn result_id(annotation_id: u64, entry: &ResultEntry) -> String {
    let serialized = serde_json::to_string(entry).unwrap_or_default();
    let digest = digest_bytes(serialized.as_bytes());

    format!("res_{}_{}", annotation_id, &digest[..RESULT_DIGEST_LENGTH])
}

/// Merge every task sharing one key into a single task
///
/// The task with the most annotations (first one on ties) is copied as the
/// base. Its annotations are replaced by the union of all annotations in
/// the group, renumbered from 1 in group order, with missing result
/// identifiers filled in.
///
/// Returns `None` for an empty group.
pub fn merge_group(tasks: &[&Task]) -> Option<Task> {
    let mut base = *tasks.first()?;
    for &task in tasks.iter().skip(1) {
        if task.annotations().len() > base.annotations().len() {
            base = task;
        }
    }

    let annotations: Vec<Annotation> = tasks
        .iter()
        .copied()
        .flat_map(Task::annotations)
        .zip(1u64..)
        .map(|(annotation, id)| renumber(annotation, id))
        .collect();

    let mut merged = base.clone();
    merged.annotations = Some(annotations);

    Some(merged)
}

fn renumber(annotation: &Annotation, id: u64) -> Annotation {
    let mut annotation = annotation.clone();
    annotation.id = Some(Value::from(id));

    if let Some(results) = annotation.result.as_mut() {
        for entry in results.iter_mut().filter(|entry| entry.identifier().is_none()) {
            entry.id = None;
            entry.id = Some(Value::String(result_id(id, entry)));
        }
    }

    annotation
}

/// Merge all contributors' task lists into one task per key
///
/// # Arguments
///
/// * `task_lists` - One task array per contributor in submission order
pub fn merge_tasks(task_lists: &[Vec<Task>]) -> Vec<Task> {
    group_tasks(task_lists)
        .values()
        .filter_map(|tasks| merge_group(tasks))
        .collect()
}

#[cfg(test)]
mod test {

    use super::*;

    use serde_json::json;

    fn task(value: serde_json::Value) -> Task {
        serde_json::from_value(value).unwrap()
    }

    fn annotated(image: &str, n: usize) -> Task {
        let annotations: Vec<serde_json::Value> = (0..n)
            .map(|i| json!({"id": 100 + i, "result": [{"id": format!("r{}", i), "type": "choices"}]}))
            .collect();

        task(json!({"data": {"image": image}, "annotations": annotations}))
    }

    fn ids(task: &Task) -> Vec<u64> {
        task.annotations()
            .iter()
            .filter_map(|a| a.id.as_ref().and_then(Value::as_u64))
            .collect()
    }

    fn result_ids(annotation: &Annotation) -> Vec<Option<&Value>> {
        annotation.results().iter().map(ResultEntry::identifier).collect()
    }

    #[test]
    pub fn test_merge_two_contributors_same_image() {
        let a = vec![annotated("/data/upload/img1.jpg", 1)];
        let b = vec![annotated("/other/path/img1.jpg", 2)];

        let merged = merge_tasks(&[a, b]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].annotations().len(), 3);
        assert_eq!(ids(&merged[0]), vec![1, 2, 3]);
    }

    #[test]
    pub fn test_base_task_has_most_annotations() {
        let a = vec![task(json!({"id": 1, "data": {"image": "x.png"}, "annotations": []}))];
        let b = vec![task(json!({"id": 2, "data": {"image": "x.png"}, "annotations": [{"id": 5}]}))];

        let merged = merge_tasks(&[a, b]);

        assert_eq!(merged[0].extra["id"], 2);
    }

    #[test]
    pub fn test_base_task_tie_keeps_first() {
        let a = vec![task(json!({"id": 1, "data": {"image": "x.png"}, "annotations": [{"id": 1}]}))];
        let b = vec![task(json!({"id": 2, "data": {"image": "x.png"}, "annotations": [{"id": 1}]}))];

        let merged = merge_tasks(&[a, b]);

        assert_eq!(merged[0].extra["id"], 1);
        assert_eq!(ids(&merged[0]), vec![1, 2]);
    }

    #[test]
    pub fn test_group_order_is_first_seen() {
        let a = vec![annotated("b.png", 1), annotated("a.png", 1)];
        let b = vec![annotated("c.png", 1), annotated("b.png", 1)];

        let merged = merge_tasks(&[a, b]);
        let images: Vec<&str> = merged.iter().filter_map(|t| t.image()).collect();

        assert_eq!(images, vec!["b.png", "a.png", "c.png"]);
        assert_eq!(merged[0].annotations().len(), 2);
    }

    #[test]
    pub fn test_upload_identifier_takes_precedence() {
        let a = vec![task(json!({"file_upload": "u1", "data": {"image": "same.png"}, "annotations": [{"id": 1}]}))];
        let b = vec![task(json!({"file_upload": "u2", "data": {"image": "same.png"}, "annotations": [{"id": 1}]}))];

        assert_eq!(merge_tasks(&[a, b]).len(), 2);
    }

    #[test]
    pub fn test_missing_annotations_count_as_zero() {
        let a = vec![task(json!({"data": {"image": "x.png"}}))];
        let b = vec![annotated("x.png", 2)];

        let merged = merge_tasks(&[a, b]);

        assert_eq!(merged.len(), 1);
        assert_eq!(ids(&merged[0]), vec![1, 2]);
    }

    #[test]
    pub fn test_annotation_count_is_sum() {
        let a = vec![annotated("x.png", 3), annotated("y.png", 1)];
        let b = vec![annotated("x.png", 2)];
        let c = vec![annotated("y.png", 4), annotated("x.png", 0)];

        let merged = merge_tasks(&[a, b, c]);

        assert_eq!(merged.len(), 2);
        assert_eq!(ids(&merged[0]), (1..=5).collect::<Vec<u64>>());
        assert_eq!(ids(&merged[1]), (1..=5).collect::<Vec<u64>>());
    }

    #[test]
    pub fn test_missing_result_identifiers_are_synthesized() {
        let a = vec![task(json!({
            "data": {"image": "x.png"},
            "annotations": [
                {"id": 1, "result": [{"id": "keep"}, {"type": "labels"}, {"id": "", "type": "labels"}]}
            ]
        }))];
        let b = vec![task(json!({
            "data": {"image": "x.png"},
            "annotations": [{"id": 1, "result": [{"type": "labels"}]}]
        }))];

        let merged = merge_tasks(&[a, b]);
        let first = result_ids(&merged[0].annotations()[0]);
        let second = result_ids(&merged[0].annotations()[1]);

        let expected: ResultEntry = serde_json::from_value(json!({"type": "labels"})).unwrap();
        let synthesized = |id| Value::String(result_id(id, &expected));

        assert_eq!(first[0], Some(&json!("keep")));
        assert_eq!(first[1], Some(&synthesized(1)));
        assert_eq!(first[2], Some(&synthesized(1)));
        assert_eq!(second[0], Some(&synthesized(2)));
        assert_ne!(first[1], second[0]);
    }

    #[test]
    pub fn test_mixed_identifier_types() {
        let a = vec![task(json!({
            "file_upload": 17,
            "data": {"image": "x.png"},
            "annotations": [{"id": "a1", "result": [{"id": 42, "type": "labels"}, {"id": null}]}]
        }))];
        let b = vec![task(json!({
            "file_upload": 17,
            "data": {"image": "y.png"},
            "annotations": [{"id": -3, "result": [{"id": "r9"}]}]
        }))];

        let merged = merge_tasks(&[a, b]);
        let first = result_ids(&merged[0].annotations()[0]);

        assert_eq!(merged.len(), 1);
        assert_eq!(ids(&merged[0]), vec![1, 2]);
        assert_eq!(first[0], Some(&json!(42)));
        assert!(first[1].and_then(Value::as_str).is_some_and(|id| id.starts_with("res_1_")));
        assert_eq!(result_ids(&merged[0].annotations()[1]), vec![Some(&json!("r9"))]);
    }

    #[test]
    pub fn test_inputs_are_not_mutated() {
        let a = vec![annotated("x.png", 1)];
        let b = vec![annotated("x.png", 1)];
        let before = (a.clone(), b.clone());

        let lists = [a, b];
        let _ = merge_tasks(&lists);

        assert_eq!(lists[0], before.0);
        assert_eq!(lists[1], before.1);
    }

    #[test]
    pub fn test_empty_group() {
        assert!(merge_group(&[]).is_none());
    }
}
