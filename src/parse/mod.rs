pub mod deadline;
pub mod task_parser;
pub mod task_serializer;

pub use deadline::{DeadlineError, parse_deadline, sort_key};
pub use task_parser::parse_tasks;
pub use task_serializer::serialize_tasks;
