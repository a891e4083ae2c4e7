pub mod error;
pub mod logging;

pub use error::{Result, TidyError};
