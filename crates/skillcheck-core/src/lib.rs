//! # skillcheck-core
//!
//! Shared vocabulary for the skillcheck workspace: the [`Issue`] a checker
//! emits, the [`RunReport`] the reporter aggregates, and the unified error
//! type used for the few conditions that abort a run outright.

pub mod error;
pub mod issue;
pub mod report;

pub use error::{CheckError, Result};
pub use issue::{Issue, IssueCode, Severity};
pub use report::{DocumentClass, RunReport, SuiteTally};
