mod digest;
mod flatten;
mod pack;
mod tasks;

pub use digest::digest_bytes;
pub use digest::digest_file;

pub use flatten::FlattenContext;
pub use flatten::FlattenSummary;
pub use flatten::flatten_archives;

pub use pack::pack_directory;

pub use tasks::read_json;
pub use tasks::read_task_array;
pub use tasks::write_json;
