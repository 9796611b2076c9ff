pub mod check;
pub mod task_ops;
