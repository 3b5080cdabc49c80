//! Whole-corpus passes: the audit and the harness.
//!
//! Per-document work fans out on a `JoinSet` of blocking tasks. Cross-document
//! checks and suite totals run only after every task has joined.

use skillcheck_config::SkillcheckConfig;
use skillcheck_core::{CheckError, DocumentClass, Issue, RunReport};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::catalog::{self, Catalog, SkillStamp};
use crate::corpus::{Corpus, DocumentRef};
use crate::document::SkillDocument;
use crate::harness::{Harness, Suite, SuiteResult};
use crate::links;
use crate::schema;

/// Run `work` on every document concurrently, returning results in input order.
async fn for_each_document<T, F>(docs: Vec<DocumentRef>, work: F) -> skillcheck_core::Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(DocumentRef) -> T + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let mut slots: Vec<Option<T>> = (0..docs.len()).map(|_| None).collect();
    let mut join_set = JoinSet::new();

    for (idx, doc) in docs.into_iter().enumerate() {
        let work = Arc::clone(&work);
        join_set.spawn_blocking(move || (idx, work(doc)));
    }

    while let Some(joined) = join_set.join_next().await {
        let (idx, value) = joined.map_err(|e| CheckError::Task(e.to_string()))?;
        slots[idx] = Some(value);
    }

    Ok(slots.into_iter().flatten().collect())
}

struct DocumentAudit {
    rel_path: String,
    class: DocumentClass,
    issues: Vec<Issue>,
    stamp: Option<SkillStamp>,
}

fn audit_document(doc_ref: DocumentRef, config: &SkillcheckConfig) -> DocumentAudit {
    let (doc, mut issues) = SkillDocument::load(&doc_ref.path, doc_ref.rel_path, doc_ref.class);
    issues.extend(schema::validate_document(&doc, &config.rules));
    issues.extend(links::check_links(&doc));

    let stamp = match doc.frontmatter.name.as_deref() {
        Some(name) if doc.class.is_active() && !name.trim().is_empty() => Some(SkillStamp {
            name: name.to_string(),
            version: doc.frontmatter.version().cloned(),
            rel_path: doc.rel_path.clone(),
        }),
        _ => None,
    };

    debug!(path = %doc.rel_path, issues = issues.len(), "audited document");
    DocumentAudit {
        rel_path: doc.rel_path,
        class: doc.class,
        issues,
        stamp,
    }
}

/// Schema, link, and catalog audit over the whole corpus.
///
/// Only a missing content root is fatal. An unreadable catalog becomes a
/// single issue and skips the cross-checks.
pub async fn run_audit(root: &Path, config: &SkillcheckConfig) -> skillcheck_core::Result<RunReport> {
    let corpus = Corpus::new(root, &config.layout);
    let docs = corpus.discover()?;

    let shared = Arc::new(config.clone());
    let audits = for_each_document(docs, move |doc_ref| audit_document(doc_ref, &shared)).await?;

    let mut report = RunReport::new();
    let mut stamps = Vec::new();
    for audit in audits {
        report.add_document(audit.rel_path, audit.class);
        report.extend(audit.issues);
        stamps.extend(audit.stamp);
    }

    report.extend(catalog::check_duplicate_names(&stamps));

    let catalog_rel = corpus.rel_path(corpus.catalog_path());
    match Catalog::load(corpus.catalog_path(), &catalog_rel) {
        Ok(catalog) => report.extend(catalog::check_consistency(&stamps, &catalog)),
        Err(issue) => {
            warn!(catalog = %catalog_rel, reason = %issue.message, "skipping catalog consistency checks");
            report.extend([issue]);
        }
    }

    report.finish();
    info!(
        documents = report.documents.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "audit complete"
    );
    Ok(report)
}

/// Trigger, functional, and performance suites over active documents.
pub async fn run_harness(
    root: &Path,
    config: &SkillcheckConfig,
    harness: Harness,
) -> skillcheck_core::Result<RunReport> {
    let corpus = Corpus::new(root, &config.layout);
    let active: Vec<DocumentRef> = corpus
        .discover()?
        .into_iter()
        .filter(|d| d.class.is_active())
        .collect();

    info!(scorer = harness.scorer_name(), documents = active.len(), "running harness");

    let evaluated = for_each_document(active, move |doc_ref| {
        let (doc, _) = SkillDocument::load(&doc_ref.path, doc_ref.rel_path, doc_ref.class);
        let results = harness.evaluate(&doc);
        (doc.rel_path, results)
    })
    .await?;

    let mut report = RunReport::new();
    for suite in Suite::ALL {
        report.register_suite(suite.as_str());
    }

    for (rel_path, results) in evaluated {
        report.add_document(rel_path, DocumentClass::Active);
        for SuiteResult { suite, failure } in results {
            report.record_suite(suite.as_str(), failure.is_none());
            report.extend(failure);
        }
    }

    report.finish();
    info!(
        documents = report.documents.len(),
        failures = report.error_count(),
        "harness complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn results_keep_input_order() {
        let docs: Vec<DocumentRef> = (0..32)
            .map(|i| DocumentRef {
                path: format!("/x/{i}/SKILL.md").into(),
                rel_path: format!("{i:02}"),
                class: DocumentClass::Active,
            })
            .collect();
        let out = for_each_document(docs, |d| d.rel_path).await.unwrap();
        let expected: Vec<String> = (0..32).map(|i| format!("{i:02}")).collect();
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn panicking_task_is_a_task_error() {
        let docs = vec![DocumentRef {
            path: "/x/SKILL.md".into(),
            rel_path: "x".into(),
            class: DocumentClass::Active,
        }];
        let result = for_each_document(docs, |_| -> usize { panic!("boom") }).await;
        assert!(matches!(result, Err(CheckError::Task(_))));
    }
}
