//! User interface module.
//!
//! All terminal output meant for people goes through here; diagnostics go through
//! `tracing` instead. The workflow never prompts: decisions a human would confirm
//! are taken from configuration.

pub mod formatter;

pub use formatter::{
    display_commit_analysis, display_error, display_report, display_status, display_success,
    display_warning, format_report,
};
