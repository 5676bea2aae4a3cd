//! Activity source backed by git repositories on disk.
//!
//! Only commits are available locally; pull requests, issues, reviews,
//! languages and collaborators stay empty.

pub mod parser;
pub mod scanner;

pub use parser::Parser;
pub use scanner::{repo_display_name, Scanner};
