use serde::{Deserialize, Serialize};

use crate::issue::{Issue, Severity};

/// Whether a document is subject to the full rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentClass {
    Active,
    Draft,
}

impl DocumentClass {
    pub fn is_active(&self) -> bool {
        matches!(self, DocumentClass::Active)
    }
}

/// One processed document, as listed in the report header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub path: String,
    pub class: DocumentClass,
}

/// Pass/fail counts for one harness suite across the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteTally {
    pub suite: String,
    pub passed: usize,
    pub failed: usize,
}

/// Aggregate of every finding from one invocation.
///
/// Checkers hand their issues over by value; the report owns concatenation
/// and ordering. Call [`RunReport::finish`] once all producers are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub documents: Vec<DocumentEntry>,
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suites: Vec<SuiteTally>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, path: impl Into<String>, class: DocumentClass) {
        self.documents.push(DocumentEntry {
            path: path.into(),
            class,
        });
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    /// Register a suite up front so it is listed even when nothing ran.
    pub fn register_suite(&mut self, suite: &str) {
        if !self.suites.iter().any(|s| s.suite == suite) {
            self.suites.push(SuiteTally {
                suite: suite.to_string(),
                passed: 0,
                failed: 0,
            });
        }
    }

    pub fn record_suite(&mut self, suite: &str, passed: bool) {
        self.register_suite(suite);
        if let Some(tally) = self.suites.iter_mut().find(|s| s.suite == suite) {
            if passed {
                tally.passed += 1;
            } else {
                tally.failed += 1;
            }
        }
    }

    /// Sort documents by path and issues by (severity, path, code).
    pub fn finish(&mut self) {
        self.documents.sort_by(|a, b| a.path.cmp(&b.path));
        self.issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    pub fn active_count(&self) -> usize {
        self.documents.iter().filter(|d| d.class.is_active()).count()
    }

    pub fn draft_count(&self) -> usize {
        self.documents.len() - self.active_count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Issues recorded against a single document path.
    pub fn issues_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |i| i.path == path)
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    /// Process exit status: 1 when any error-severity issue exists.
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() { 1 } else { 0 }
    }
}
