//! Text and JSON rendering of run reports.

use console::style;
use serde::Serialize;
use skillcheck_core::{DocumentClass, Issue, RunReport, Severity};
use skillcheck_skills::Suite;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

pub fn print_json<T: Serialize>(ok: bool, data: T) -> skillcheck_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(&JsonOut { ok, data })?);
    Ok(())
}

/// `[SEVERITY] code path: message`
pub fn issue_line(issue: &Issue) -> String {
    let tag = format!("[{}]", issue.severity.label());
    let tag = match issue.severity {
        Severity::Error => style(tag).red().bold(),
        Severity::Warning => style(tag).yellow().bold(),
    };
    format!("{tag} {} {}: {}", issue.code, issue.path, issue.message)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Per-document status lines, one line per issue, then totals.
pub fn render_audit(report: &RunReport) -> String {
    let mut lines = Vec::new();

    for doc in &report.documents {
        let (errors, warnings) = report
            .issues_for(&doc.path)
            .fold((0, 0), |(e, w), i| if i.is_error() { (e + 1, w) } else { (e, w + 1) });
        let class = match doc.class {
            DocumentClass::Active => "active",
            DocumentClass::Draft => "draft",
        };
        let line = match (errors, warnings) {
            (0, 0) => format!("{} {} ({class})", style("OK  ").green(), doc.path),
            (0, w) => format!(
                "{} {} ({class}): {}",
                style("WARN").yellow(),
                doc.path,
                plural(w, "warning")
            ),
            (e, w) => format!(
                "{} {} ({class}): {}, {}",
                style("FAIL").red(),
                doc.path,
                plural(e, "error"),
                plural(w, "warning")
            ),
        };
        lines.push(line);
    }

    if !report.issues.is_empty() {
        lines.push(String::new());
        lines.extend(report.issues.iter().map(issue_line));
    }

    lines.push(String::new());
    lines.push(format!(
        "Checked {} ({} active, {} draft): {}, {}",
        plural(report.documents.len(), "document"),
        report.active_count(),
        report.draft_count(),
        plural(report.error_count(), "error"),
        plural(report.warning_count(), "warning"),
    ));
    lines.join("\n")
}

/// Per-document suite verdicts, failure lines, per-suite tallies, then totals.
pub fn render_harness(report: &RunReport) -> String {
    let mut lines = Vec::new();

    for doc in &report.documents {
        let failed: Vec<Suite> = Suite::ALL
            .into_iter()
            .filter(|s| report.issues_for(&doc.path).any(|i| i.code == s.code()))
            .collect();
        let verdicts: Vec<String> = Suite::ALL
            .iter()
            .map(|s| {
                let v = if failed.contains(s) { "fail" } else { "pass" };
                format!("{s}={v}")
            })
            .collect();
        let status = if failed.is_empty() {
            style("PASS").green()
        } else {
            style("FAIL").red()
        };
        lines.push(format!("{status} {} {}", doc.path, verdicts.join(" ")));
    }

    if !report.issues.is_empty() {
        lines.push(String::new());
        lines.extend(report.issues.iter().map(issue_line));
    }

    lines.push(String::new());
    for tally in &report.suites {
        lines.push(format!(
            "{}: {} passed, {} failed",
            tally.suite, tally.passed, tally.failed
        ));
    }
    lines.push(format!(
        "Evaluated {}: {}",
        plural(report.documents.len(), "active document"),
        plural(report.error_count(), "suite failure"),
    ));
    lines.join("\n")
}
