//! Repository hook support
//!
//! libgit2 never runs hooks, so the bump commit runs them itself:
//! - pre-commit: before the index is written into a commit
//! - commit-msg: with the path of a file holding the proposed message

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{hooks_dir, HookType};
