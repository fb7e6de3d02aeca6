pub mod bump;
pub mod changelog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod ui;
pub mod warning;

pub use error::{BumpError, Result};
