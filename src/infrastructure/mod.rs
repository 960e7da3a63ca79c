//! Sandbox filesystem helpers.
//!
//! Inside Zellij the host filesystem is mounted under `/host`; these helpers
//! translate between the paths users configure and the paths the plugin sees.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, strip_host_prefix};
