//! # skillcheck-cli
//!
//! Command-line interface for the skillcheck corpus validator.
//!
//! ## Commands
//!
//! - `skillcheck audit`: schema, link, and catalog audit (`--watch` to re-run on change)
//! - `skillcheck triggers`: trigger, functional, and performance harness
//! - `skillcheck config`: show the resolved configuration
//! - `skillcheck completions`: generate shell completions

pub mod commands;
pub mod output;

pub use commands::Cli;
