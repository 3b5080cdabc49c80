//! SKILL.md corpus checks.
//!
//! Discovery and loading live in [`corpus`] and [`document`]. Per-document
//! rules are in [`schema`] and [`links`], cross-document rules in [`catalog`],
//! and the trigger heuristics in [`harness`]. [`runner`] ties them together.

pub mod catalog;
pub mod corpus;
pub mod document;
pub mod frontmatter;
pub mod harness;
pub mod links;
pub mod markdown;
pub mod runner;
pub mod schema;

pub use catalog::{Catalog, CatalogEntry, SkillStamp};
pub use corpus::{Corpus, DocumentRef};
pub use document::SkillDocument;
pub use frontmatter::{Frontmatter, SkillMetadata, SkillVersion};
pub use harness::{
    ExamplePrompts, Harness, KeywordOverlapScorer, Suite, SuiteResult, TriggerScorer,
    TriggerVerdict,
};
pub use runner::{run_audit, run_harness};
