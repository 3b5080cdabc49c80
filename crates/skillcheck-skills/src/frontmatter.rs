use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::sync::LazyLock;

/// Top-level frontmatter keys a SKILL.md may declare.
pub const ALLOWED_KEYS: &[&str] = &[
    "name",
    "description",
    "license",
    "allowed-tools",
    "compatibility",
    "metadata",
];

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[1-9][0-9]*$").unwrap());

/// A `metadata.version` value.
///
/// The raw text is kept for exact comparison against the catalog, so
/// `"03"` and `"3"` stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVersion {
    raw: String,
}

impl SkillVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Matches `^[1-9][0-9]*$`.
    pub fn is_well_formed(&self) -> bool {
        VERSION_RE.is_match(&self.raw)
    }
}

impl fmt::Display for SkillVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The nested `metadata` block. Keys other than these four are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillMetadata {
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub version: Option<SkillVersion>,
}

/// A known key holding a value of the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTypeError {
    pub field: String,
    pub expected: &'static str,
}

/// Typed view of a SKILL.md frontmatter block.
///
/// Unknown top-level keys are not rejected here; they are collected in
/// `unexpected_keys` so the schema rules can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub allowed_tools: Vec<String>,
    pub compatibility: Option<String>,
    pub metadata: Option<SkillMetadata>,
    pub unexpected_keys: Vec<String>,
    pub type_errors: Vec<FieldTypeError>,
}

impl Frontmatter {
    /// Build the typed record from a parsed YAML mapping.
    pub fn from_mapping(map: &Mapping) -> Self {
        let mut fm = Frontmatter::default();

        for (key, value) in map {
            let Some(key) = key.as_str() else {
                fm.unexpected_keys.push(render_key(key));
                continue;
            };
            match key {
                "name" => fm.name = fm.scalar(key, value),
                "description" => fm.description = fm.scalar(key, value),
                "license" => fm.license = fm.scalar(key, value),
                "compatibility" => fm.compatibility = fm.scalar(key, value),
                "allowed-tools" => fm.allowed_tools = fm.tool_list(value),
                "metadata" => fm.metadata = fm.metadata_block(value),
                other => fm.unexpected_keys.push(other.to_string()),
            }
        }

        fm.unexpected_keys.sort();
        fm
    }

    /// `metadata.version`, if declared.
    pub fn version(&self) -> Option<&SkillVersion> {
        self.metadata.as_ref().and_then(|m| m.version.as_ref())
    }

    fn scalar(&mut self, field: &str, value: &Value) -> Option<String> {
        match scalar_text(value) {
            Some(text) => Some(text),
            None => {
                self.type_error(field, "a string");
                None
            }
        }
    }

    fn tool_list(&mut self, value: &Value) -> Vec<String> {
        match value {
            Value::Null => Vec::new(),
            Value::String(s) => s.split_whitespace().map(str::to_string).collect(),
            Value::Sequence(items) => self.string_list("allowed-tools", items),
            _ => {
                self.type_error("allowed-tools", "a string or a list of strings");
                Vec::new()
            }
        }
    }

    fn metadata_block(&mut self, value: &Value) -> Option<SkillMetadata> {
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => return Some(SkillMetadata::default()),
            _ => {
                self.type_error("metadata", "a mapping");
                return None;
            }
        };

        let mut meta = SkillMetadata::default();
        if let Some(v) = map.get("category") {
            meta.category = self.scalar("metadata.category", v);
        }
        if let Some(v) = map.get("status") {
            meta.status = self.scalar("metadata.status", v);
        }
        if let Some(v) = map.get("version") {
            meta.version = self.scalar("metadata.version", v).map(SkillVersion::new);
        }
        if let Some(v) = map.get("tags") {
            match v {
                Value::Sequence(items) => meta.tags = self.string_list("metadata.tags", items),
                Value::Null => {}
                _ => self.type_error("metadata.tags", "a list of strings"),
            }
        }
        Some(meta)
    }

    fn string_list(&mut self, field: &str, items: &[Value]) -> Vec<String> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match scalar_text(item) {
                Some(text) => out.push(text),
                None => {
                    self.type_error(field, "a list of strings");
                    break;
                }
            }
        }
        out
    }

    fn type_error(&mut self, field: &str, expected: &'static str) {
        self.type_errors.push(FieldTypeError {
            field: field.to_string(),
            expected,
        });
    }
}

/// Text of a scalar value. A bare `key:` (null) reads as an empty string.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn render_key(key: &Value) -> String {
    scalar_text(key).unwrap_or_else(|| format!("{key:?}"))
}
