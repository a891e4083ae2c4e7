pub mod branch;
pub mod classifier;
pub mod deleter;
pub mod git;
