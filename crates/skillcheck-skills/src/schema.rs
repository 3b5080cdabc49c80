//! Structural and schema rules for a single SKILL.md.
//!
//! Every rule runs regardless of what earlier rules found, so one document
//! can surface several independent problems in a single pass.

use regex::Regex;
use skillcheck_config::RulesConfig;
use skillcheck_core::{Issue, IssueCode};
use std::sync::LazyLock;

use crate::document::SkillDocument;
use crate::frontmatter::ALLOWED_KEYS;
use crate::markdown::{self, Heading};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

static WHEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bwhen\b").unwrap());

/// Body sections every active document must have, with the heading text
/// that satisfies each one.
const REQUIRED_SECTIONS: &[(&str, IssueCode, &str)] = &[
    ("example", IssueCode::MissingExamplesSection, "Examples"),
    (
        "troubleshooting",
        IssueCode::MissingTroubleshootingSection,
        "Troubleshooting",
    ),
    ("workflow", IssueCode::MissingWorkflowSection, "Workflow"),
];

const README_NAMES: &[&str] = &["README.md", "readme.md"];

/// Run every schema rule against one document.
pub fn validate_document(doc: &SkillDocument, rules: &RulesConfig) -> Vec<Issue> {
    let mut issues = Vec::new();

    check_keys(doc, &mut issues);
    check_field_types(doc, &mut issues);
    check_name(doc, rules, &mut issues);
    check_description(doc, rules, &mut issues);
    check_compatibility(doc, rules, &mut issues);
    check_version_format(doc, &mut issues);
    check_status(doc, rules, &mut issues);

    if doc.class.is_active() {
        check_trigger_language(doc, &mut issues);
        check_version_present(doc, &mut issues);
        check_sections(doc, &mut issues);
        check_no_readme(doc, &mut issues);
    }

    issues
}

fn check_keys(doc: &SkillDocument, issues: &mut Vec<Issue>) {
    let unexpected = &doc.frontmatter.unexpected_keys;
    if unexpected.is_empty() {
        return;
    }
    issues.push(Issue::new(
        IssueCode::UnexpectedFrontmatterKeys,
        &doc.rel_path,
        format!(
            "unexpected frontmatter keys: {} (allowed: {})",
            unexpected.join(", "),
            ALLOWED_KEYS.join(", ")
        ),
    ));
}

fn check_field_types(doc: &SkillDocument, issues: &mut Vec<Issue>) {
    for err in &doc.frontmatter.type_errors {
        issues.push(Issue::new(
            IssueCode::InvalidFieldType,
            &doc.rel_path,
            format!("`{}` must be {}", err.field, err.expected),
        ));
    }
}

fn check_name(doc: &SkillDocument, rules: &RulesConfig, issues: &mut Vec<Issue>) {
    let name = match doc.frontmatter.name.as_deref() {
        Some(n) if !n.trim().is_empty() => n,
        _ => {
            issues.push(Issue::new(
                IssueCode::MissingName,
                &doc.rel_path,
                "frontmatter has no `name`",
            ));
            return;
        }
    };

    if !NAME_RE.is_match(name) {
        issues.push(Issue::new(
            IssueCode::InvalidNameFormat,
            &doc.rel_path,
            format!("name '{name}' must be lowercase letters and digits separated by single hyphens"),
        ));
    }

    // Exact comparison: a case-only difference is still a mismatch.
    let folder = doc.folder_name().unwrap_or_default();
    if name != folder {
        issues.push(Issue::new(
            IssueCode::NameFolderMismatch,
            &doc.rel_path,
            format!("name '{name}' does not match its folder '{folder}'"),
        ));
    }

    let lowered = name.to_lowercase();
    for word in &rules.reserved_words {
        if lowered.contains(&word.to_lowercase()) {
            issues.push(Issue::new(
                IssueCode::ReservedName,
                &doc.rel_path,
                format!("name '{name}' contains reserved word '{word}'"),
            ));
        }
    }
}

fn check_description(doc: &SkillDocument, rules: &RulesConfig, issues: &mut Vec<Issue>) {
    let Some(description) = doc.frontmatter.description.as_deref() else {
        issues.push(Issue::new(
            IssueCode::MissingDescription,
            &doc.rel_path,
            "frontmatter has no `description`",
        ));
        return;
    };

    if description.trim().is_empty() {
        issues.push(Issue::new(
            IssueCode::EmptyDescription,
            &doc.rel_path,
            "description is empty",
        ));
    }

    let chars = description.chars().count();
    if chars > rules.description_max_chars {
        issues.push(Issue::new(
            IssueCode::DescriptionTooLong,
            &doc.rel_path,
            format!(
                "description is {chars} characters (limit {})",
                rules.description_max_chars
            ),
        ));
    }

    if description.contains(['<', '>']) {
        issues.push(Issue::new(
            IssueCode::DescriptionAngleBrackets,
            &doc.rel_path,
            "description must not contain '<' or '>'",
        ));
    }
}

fn check_compatibility(doc: &SkillDocument, rules: &RulesConfig, issues: &mut Vec<Issue>) {
    let Some(compat) = doc.frontmatter.compatibility.as_deref() else {
        return;
    };
    let chars = compat.chars().count();
    if chars > rules.compatibility_max_chars {
        issues.push(Issue::new(
            IssueCode::CompatibilityTooLong,
            &doc.rel_path,
            format!(
                "compatibility is {chars} characters (limit {})",
                rules.compatibility_max_chars
            ),
        ));
    }
}

fn check_version_format(doc: &SkillDocument, issues: &mut Vec<Issue>) {
    let Some(version) = doc.frontmatter.version() else {
        return;
    };
    if !version.is_well_formed() {
        issues.push(Issue::new(
            IssueCode::InvalidVersionFormat,
            &doc.rel_path,
            format!("metadata.version '{version}' must be a positive integer without leading zeros"),
        ));
    }
}

fn check_status(doc: &SkillDocument, rules: &RulesConfig, issues: &mut Vec<Issue>) {
    let Some(status) = doc
        .frontmatter
        .metadata
        .as_ref()
        .and_then(|m| m.status.as_deref())
    else {
        return;
    };
    if !rules.allowed_statuses.iter().any(|s| s == status) {
        issues.push(Issue::new(
            IssueCode::UnknownStatus,
            &doc.rel_path,
            format!(
                "metadata.status '{status}' is not one of: {}",
                rules.allowed_statuses.join(", ")
            ),
        ));
    }
}

fn check_trigger_language(doc: &SkillDocument, issues: &mut Vec<Issue>) {
    // Missing or empty descriptions are already reported above.
    let Some(description) = doc.frontmatter.description.as_deref() else {
        return;
    };
    if !description.trim().is_empty() && !WHEN_RE.is_match(description) {
        issues.push(Issue::new(
            IssueCode::DescriptionMissingWhen,
            &doc.rel_path,
            "description should say when to use the skill (e.g. \"Use when ...\")",
        ));
    }
}

fn check_version_present(doc: &SkillDocument, issues: &mut Vec<Issue>) {
    if doc.frontmatter.version().is_none() {
        issues.push(Issue::new(
            IssueCode::MissingVersion,
            &doc.rel_path,
            "active skills must declare metadata.version",
        ));
    }
}

fn check_sections(doc: &SkillDocument, issues: &mut Vec<Issue>) {
    let headings: Vec<Heading> = markdown::headings(&doc.body);
    for (needle, code, title) in REQUIRED_SECTIONS {
        if !markdown::has_heading_containing(&headings, needle) {
            issues.push(Issue::new(
                *code,
                &doc.rel_path,
                format!("body has no {title} heading"),
            ));
        }
    }
}

fn check_no_readme(doc: &SkillDocument, issues: &mut Vec<Issue>) {
    let dir = doc.base_dir();
    for name in README_NAMES {
        if dir.join(name).is_file() {
            issues.push(Issue::new(
                IssueCode::ReadmeNotAllowed,
                &doc.rel_path,
                format!("skill folder contains {name}; put that content in SKILL.md or references/"),
            ));
            // Case-insensitive filesystems report both names for one file.
            break;
        }
    }
}
