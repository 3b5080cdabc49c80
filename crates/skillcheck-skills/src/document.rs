use serde_yaml::Value;
use skillcheck_core::{DocumentClass, Issue, IssueCode};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::frontmatter::Frontmatter;

const FRONTMATTER_DELIM: &str = "---";

/// A SKILL.md file read from disk.
///
/// Loading never fails. When the frontmatter is absent or unreadable the
/// document carries empty defaults and the loader issues explain why, so the
/// schema rules can still run and report their own findings.
#[derive(Debug, Clone)]
pub struct SkillDocument {
    /// Absolute (or root-joined) path to the file.
    pub path: PathBuf,
    /// Root-relative, `/`-separated path used in reports.
    pub rel_path: String,
    pub class: DocumentClass,
    pub frontmatter: Frontmatter,
    /// Everything after the closing delimiter (or the whole file).
    pub body: String,
}

/// Why the frontmatter block could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitError {
    MissingOpen,
    MissingClose,
}

impl SkillDocument {
    /// Read and parse a SKILL.md file.
    pub fn load(path: &Path, rel_path: String, class: DocumentClass) -> (Self, Vec<Issue>) {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path.to_path_buf(), rel_path, class),
            Err(e) => {
                let issue = Issue::new(
                    IssueCode::ParseError,
                    rel_path.clone(),
                    format!("failed to read file: {e}"),
                );
                let doc = Self {
                    path: path.to_path_buf(),
                    rel_path,
                    class,
                    frontmatter: Frontmatter::default(),
                    body: String::new(),
                };
                (doc, vec![issue])
            }
        }
    }

    /// Parse SKILL.md content with known path info.
    pub fn parse(
        text: &str,
        path: PathBuf,
        rel_path: String,
        class: DocumentClass,
    ) -> (Self, Vec<Issue>) {
        let mut issues = Vec::new();

        let (frontmatter, body) = match split_frontmatter(text) {
            Ok((raw, body)) => {
                let fm = parse_frontmatter(raw, &rel_path, &mut issues);
                (fm, body.to_string())
            }
            Err(SplitError::MissingOpen) => {
                issues.push(Issue::new(
                    IssueCode::MissingFrontmatter,
                    rel_path.clone(),
                    "file must start with a `---` frontmatter delimiter",
                ));
                (Frontmatter::default(), text.to_string())
            }
            Err(SplitError::MissingClose) => {
                issues.push(Issue::new(
                    IssueCode::InvalidFrontmatter,
                    rel_path.clone(),
                    "frontmatter has no closing `---` delimiter",
                ));
                (Frontmatter::default(), text.to_string())
            }
        };

        debug!(path = %rel_path, issues = issues.len(), "parsed skill document");

        let doc = Self {
            path,
            rel_path,
            class,
            frontmatter,
            body,
        };
        (doc, issues)
    }

    /// Name of the directory that contains this document.
    pub fn folder_name(&self) -> Option<&str> {
        self.path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
    }

    /// Directory that contains this document.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

/// Split a file into its raw frontmatter text and body.
///
/// The first line must be exactly `---`; the block ends at the next line
/// that is exactly `---` (trailing whitespace ignored).
fn split_frontmatter(text: &str) -> Result<(&str, &str), SplitError> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next().ok_or(SplitError::MissingOpen)?;
    if first.trim_end() != FRONTMATTER_DELIM {
        return Err(SplitError::MissingOpen);
    }

    let fm_start = first.len();
    let mut offset = fm_start;
    for line in lines {
        if line.trim_end() == FRONTMATTER_DELIM {
            let raw = &text[fm_start..offset];
            let body = &text[offset + line.len()..];
            return Ok((raw, body));
        }
        offset += line.len();
    }

    Err(SplitError::MissingClose)
}

/// Parse the raw block as YAML. Failures become issues and yield defaults.
fn parse_frontmatter(raw: &str, rel_path: &str, issues: &mut Vec<Issue>) -> Frontmatter {
    if raw.trim().is_empty() {
        return Frontmatter::default();
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Mapping(map)) => Frontmatter::from_mapping(&map),
        Ok(Value::Null) => Frontmatter::default(),
        Ok(other) => {
            issues.push(Issue::new(
                IssueCode::FrontmatterNotMap,
                rel_path,
                format!("frontmatter must be a mapping, found {}", yaml_kind(&other)),
            ));
            Frontmatter::default()
        }
        Err(e) => {
            issues.push(Issue::new(
                IssueCode::ParseError,
                rel_path,
                format!("frontmatter is not valid YAML: {e}"),
            ));
            Frontmatter::default()
        }
    }
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
