mod clean;
mod key;
mod merge;
mod refs;
mod task;

pub use task::Annotation;
pub use task::ResultEntry;
pub use task::Task;
pub use task::TaskData;

pub use key::task_key;

pub use merge::group_tasks;
pub use merge::merge_group;
pub use merge::merge_tasks;
pub use merge::result_id;

pub use clean::CleanReport;
pub use clean::JsonLayout;
pub use clean::clean_document;
pub use clean::clean_path;

pub use refs::missing_references;
