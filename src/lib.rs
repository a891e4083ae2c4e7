pub mod cli;
pub mod config;
pub mod core;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use core::classifier::{classify, ClassifyPolicy};
pub use core::deleter::{DeletionExecutor, DeletionOutcome, DeletionRequest};
pub use core::git::{GitOperations, GitService};
pub use utils::{Result, TidyError};
