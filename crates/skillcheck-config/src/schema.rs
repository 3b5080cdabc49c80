use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration, mapped from `skillcheck.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillcheckConfig {
    pub layout: LayoutConfig,
    pub rules: RulesConfig,
    pub harness: HarnessConfig,
    pub logging: LoggingConfig,
}

// ── Layout ─────────────────────────────────────────────────────

/// Where documents and the catalog live, relative to the corpus root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canonical content root. Every document file below it is checked.
    pub content_root: PathBuf,
    /// Drafts subtree. Documents here skip the active-only rules.
    pub drafts_dir: PathBuf,
    /// JSON catalog cross-referenced against document versions.
    pub catalog_path: PathBuf,
    /// File name that marks a directory as a skill.
    pub document_file: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("skills"),
            drafts_dir: PathBuf::from("skills/drafts"),
            catalog_path: PathBuf::from(".claude-plugin/marketplace.json"),
            document_file: "SKILL.md".into(),
        }
    }
}

// ── Rules ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Substrings a skill name may not contain (compared case-insensitively).
    pub reserved_words: Vec<String>,
    /// Maximum `description` length in characters.
    pub description_max_chars: usize,
    /// Maximum `compatibility` length in characters.
    pub compatibility_max_chars: usize,
    /// Accepted values for `metadata.status`. Anything else is a warning.
    pub allowed_statuses: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            reserved_words: vec!["anthropic".into(), "claude".into()],
            description_max_chars: 1024,
            compatibility_max_chars: 500,
            allowed_statuses: vec![
                "draft".into(),
                "experimental".into(),
                "beta".into(),
                "stable".into(),
                "deprecated".into(),
            ],
        }
    }
}

// ── Harness ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub max_body_lines: usize,
    pub max_body_words: usize,
    pub max_description_chars: usize,
    /// Words dropped from description keywords on top of the built-in list.
    pub extra_stop_words: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_body_lines: 500,
            max_body_words: 5000,
            max_description_chars: 1024,
            extra_stop_words: vec![],
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            WarningSeverity::Error => "error",
            WarningSeverity::Warning => "warning",
            WarningSeverity::Info => "info",
        };
        write!(f, "{} {}: {}", tag, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, " ({})", h)?;
        }
        Ok(())
    }
}

impl SkillcheckConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Layout ───
        if self.layout.content_root.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                field: "layout.content_root".into(),
                message: "content root is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to the directory holding skill folders, e.g. 'skills'".into()),
            });
        }
        if self.layout.content_root.is_absolute() || self.layout.drafts_dir.is_absolute() {
            warnings.push(ConfigWarning {
                field: "layout".into(),
                message: "absolute paths are resolved as-is, not against the corpus root".into(),
                severity: WarningSeverity::Info,
                hint: None,
            });
        }
        if !self.layout.drafts_dir.starts_with(&self.layout.content_root) {
            warnings.push(ConfigWarning {
                field: "layout.drafts_dir".into(),
                message: format!(
                    "'{}' is outside content root '{}'; no document will be classified as draft",
                    self.layout.drafts_dir.display(),
                    self.layout.content_root.display()
                ),
                severity: WarningSeverity::Warning,
                hint: Some("Drafts are a subtree of the content root".into()),
            });
        }
        if self.layout.document_file.trim().is_empty() {
            warnings.push(ConfigWarning {
                field: "layout.document_file".into(),
                message: "document file name is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Use 'SKILL.md'".into()),
            });
        }

        // ── Rules ───
        if self.rules.description_max_chars == 0 {
            warnings.push(ConfigWarning {
                field: "rules.description_max_chars".into(),
                message: "limit is 0, so every description would be too long".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 1024".into()),
            });
        }
        if self.rules.reserved_words.iter().any(|w| w.trim().is_empty()) {
            warnings.push(ConfigWarning {
                field: "rules.reserved_words".into(),
                message: "contains an empty entry, which matches every name".into(),
                severity: WarningSeverity::Error,
                hint: None,
            });
        }

        // ── Harness ───
        for (field, value) in [
            ("harness.max_body_lines", self.harness.max_body_lines),
            ("harness.max_body_words", self.harness.max_body_words),
            ("harness.max_description_chars", self.harness.max_description_chars),
        ] {
            if value == 0 {
                warnings.push(ConfigWarning {
                    field: field.into(),
                    message: "limit is 0, so the performance suite can never pass".into(),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
            }
        }

        // ── Logging ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // Check for hard errors
        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
