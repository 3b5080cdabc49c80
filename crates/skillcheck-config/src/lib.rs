//! # skillcheck-config
//!
//! Configuration for skillcheck. Reads `skillcheck.toml` (explicit path,
//! `SKILLCHECK_CONFIG`, or the corpus root), then applies environment
//! overrides. Every table has defaults, so the file is optional.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::SkillcheckConfig;
pub use schema::{ConfigWarning, HarnessConfig, LayoutConfig, LoggingConfig, RulesConfig, WarningSeverity};
