use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a finding is. Only errors affect the exit status.
///
/// The derived ordering puts errors before warnings, which is the order the
/// reporter prints them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

/// Stable identifier for the rule that produced an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    // ── Loader ─────────────────────────────────────────────────
    MissingFrontmatter,
    InvalidFrontmatter,
    ParseError,
    FrontmatterNotMap,

    // ── Schema ─────────────────────────────────────────────────
    UnexpectedFrontmatterKeys,
    InvalidFieldType,
    MissingName,
    InvalidNameFormat,
    NameFolderMismatch,
    ReservedName,
    MissingDescription,
    EmptyDescription,
    DescriptionTooLong,
    DescriptionAngleBrackets,
    DescriptionMissingWhen,
    CompatibilityTooLong,
    MissingVersion,
    InvalidVersionFormat,
    UnknownStatus,
    MissingExamplesSection,
    MissingTroubleshootingSection,
    MissingWorkflowSection,
    ReadmeNotAllowed,

    // ── Catalog consistency ────────────────────────────────────
    MarketplaceJsonError,
    MissingMarketplaceEntry,
    MissingMarketplaceVersion,
    VersionMismatchMarketplace,
    DuplicateMarketplaceEntry,
    OrphanedMarketplaceEntry,
    DuplicateSkillName,

    // ── Links ──────────────────────────────────────────────────
    BrokenLocalLink,

    // ── Harness suites ─────────────────────────────────────────
    Trigger,
    Functional,
    Performance,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::MissingFrontmatter => "missing_frontmatter",
            IssueCode::InvalidFrontmatter => "invalid_frontmatter",
            IssueCode::ParseError => "parse_error",
            IssueCode::FrontmatterNotMap => "frontmatter_not_map",
            IssueCode::UnexpectedFrontmatterKeys => "unexpected_frontmatter_keys",
            IssueCode::InvalidFieldType => "invalid_field_type",
            IssueCode::MissingName => "missing_name",
            IssueCode::InvalidNameFormat => "invalid_name_format",
            IssueCode::NameFolderMismatch => "name_folder_mismatch",
            IssueCode::ReservedName => "reserved_name",
            IssueCode::MissingDescription => "missing_description",
            IssueCode::EmptyDescription => "empty_description",
            IssueCode::DescriptionTooLong => "description_too_long",
            IssueCode::DescriptionAngleBrackets => "description_angle_brackets",
            IssueCode::DescriptionMissingWhen => "description_missing_when",
            IssueCode::CompatibilityTooLong => "compatibility_too_long",
            IssueCode::MissingVersion => "missing_version",
            IssueCode::InvalidVersionFormat => "invalid_version_format",
            IssueCode::UnknownStatus => "unknown_status",
            IssueCode::MissingExamplesSection => "missing_examples_section",
            IssueCode::MissingTroubleshootingSection => "missing_troubleshooting_section",
            IssueCode::MissingWorkflowSection => "missing_workflow_section",
            IssueCode::ReadmeNotAllowed => "readme_not_allowed",
            IssueCode::MarketplaceJsonError => "marketplace_json_error",
            IssueCode::MissingMarketplaceEntry => "missing_marketplace_entry",
            IssueCode::MissingMarketplaceVersion => "missing_marketplace_version",
            IssueCode::VersionMismatchMarketplace => "version_mismatch_marketplace",
            IssueCode::DuplicateMarketplaceEntry => "duplicate_marketplace_entry",
            IssueCode::OrphanedMarketplaceEntry => "orphaned_marketplace_entry",
            IssueCode::DuplicateSkillName => "duplicate_skill_name",
            IssueCode::BrokenLocalLink => "broken_local_link",
            IssueCode::Trigger => "trigger",
            IssueCode::Functional => "functional",
            IssueCode::Performance => "performance",
        }
    }

    /// Default severity for findings of this kind.
    pub fn severity(&self) -> Severity {
        match self {
            IssueCode::UnknownStatus | IssueCode::OrphanedMarketplaceEntry => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding against one document (or against the catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub code: IssueCode,
    /// Repository-relative, `/`-separated path of the offending file.
    pub path: String,
    pub message: String,
}

impl Issue {
    /// Create an issue with the code's default severity.
    pub fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Sort key used by the reporter: severity, then path, then code.
    /// The message breaks any remaining tie so output is fully deterministic.
    pub fn sort_key(&self) -> (Severity, &str, &'static str, &str) {
        (self.severity, &self.path, self.code.as_str(), &self.message)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.severity.label(),
            self.code,
            self.path,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_report_line_format() {
        let issue = Issue::new(
            IssueCode::MissingName,
            "skills/dev/foo/SKILL.md",
            "frontmatter has no `name`",
        );
        assert_eq!(
            issue.to_string(),
            "[ERROR] missing_name skills/dev/foo/SKILL.md: frontmatter has no `name`"
        );
    }

    #[test]
    fn warnings_sort_after_errors() {
        assert!(Severity::Error < Severity::Warning);
    }

    #[test]
    fn default_severity_by_code() {
        assert_eq!(IssueCode::UnknownStatus.severity(), Severity::Warning);
        assert_eq!(IssueCode::OrphanedMarketplaceEntry.severity(), Severity::Warning);
        assert_eq!(IssueCode::Trigger.severity(), Severity::Error);
        assert_eq!(IssueCode::BrokenLocalLink.severity(), Severity::Error);
    }

    #[test]
    fn code_serializes_as_snake_case() {
        let json = serde_json::to_string(&IssueCode::VersionMismatchMarketplace).unwrap();
        assert_eq!(json, "\"version_mismatch_marketplace\"");
        assert_eq!(
            IssueCode::VersionMismatchMarketplace.as_str(),
            "version_mismatch_marketplace"
        );
    }
}
