//! The query pipeline: validate, execute, format, explain.

mod executor;
mod format;
mod validator;

pub use executor::QueryExecutor;
pub use format::{render_output, render_table, NO_RESULT_MARKER};
pub use validator::{ValidationResult, Validator};
