//! The marketplace catalog and its consistency with the skill documents.

use serde_json::Value;
use skillcheck_core::{Issue, IssueCode};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

use crate::frontmatter::SkillVersion;

/// One catalog listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    /// Raw version text; numbers are rendered as written.
    pub version: Option<String>,
}

/// Parsed `marketplace.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
    /// Root-relative path used when reporting catalog-level issues.
    pub rel_path: String,
}

impl Catalog {
    /// Read and parse the catalog. Any failure is returned as a single
    /// `marketplace_json_error` issue.
    pub fn load(path: &Path, rel_path: &str) -> Result<Self, Issue> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Issue::new(
                IssueCode::MarketplaceJsonError,
                rel_path,
                format!("failed to read catalog: {e}"),
            )
        })?;
        Self::parse(&text, rel_path)
    }

    /// Accepts a top-level array of entries, or an object holding one under
    /// `plugins` or `skills`.
    pub fn parse(text: &str, rel_path: &str) -> Result<Self, Issue> {
        let fail = |msg: String| Issue::new(IssueCode::MarketplaceJsonError, rel_path, msg);

        let value: Value =
            serde_json::from_str(text).map_err(|e| fail(format!("catalog is not valid JSON: {e}")))?;

        let items = match &value {
            Value::Array(items) => items,
            Value::Object(obj) => match obj.get("plugins").or_else(|| obj.get("skills")) {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(fail(
                        "catalog object must contain a `plugins` or `skills` array".into(),
                    ));
                }
            },
            _ => return Err(fail("catalog must be a JSON array or object".into())),
        };

        let mut entries = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let name = item
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| fail(format!("catalog entry #{idx} has no string `name`")))?;
            let version = match item.get("version") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            };
            entries.push(CatalogEntry {
                name: name.to_string(),
                version,
            });
        }

        debug!(entries = entries.len(), "parsed catalog");
        Ok(Self {
            entries,
            rel_path: rel_path.to_string(),
        })
    }
}

/// Identity of one active skill, as needed for cross-checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillStamp {
    pub name: String,
    pub version: Option<SkillVersion>,
    pub rel_path: String,
}

/// Two documents claiming the same `name`. Every holder after the first is
/// reported, naming the first.
pub fn check_duplicate_names(stamps: &[SkillStamp]) -> Vec<Issue> {
    let mut first_seen: HashMap<&str, &str> = HashMap::new();
    let mut issues = Vec::new();

    for stamp in stamps {
        match first_seen.get(stamp.name.as_str()) {
            Some(first) => issues.push(Issue::new(
                IssueCode::DuplicateSkillName,
                &stamp.rel_path,
                format!("skill name '{}' is already used by {first}", stamp.name),
            )),
            None => {
                first_seen.insert(&stamp.name, &stamp.rel_path);
            }
        }
    }
    issues
}

/// Compare each active skill against its catalog listing.
///
/// Versions compare as raw text, so `"3"` against `"03"` is a mismatch.
/// Skills that declare no version are left to the schema rules.
pub fn check_consistency(stamps: &[SkillStamp], catalog: &Catalog) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut index: HashMap<&str, &CatalogEntry> = HashMap::new();

    for entry in &catalog.entries {
        if index.contains_key(entry.name.as_str()) {
            issues.push(Issue::new(
                IssueCode::DuplicateMarketplaceEntry,
                &catalog.rel_path,
                format!("catalog lists '{}' more than once", entry.name),
            ));
        } else {
            index.insert(&entry.name, entry);
        }
    }

    for stamp in stamps {
        let Some(version) = &stamp.version else {
            continue;
        };
        let Some(entry) = index.get(stamp.name.as_str()) else {
            issues.push(Issue::new(
                IssueCode::MissingMarketplaceEntry,
                &stamp.rel_path,
                format!("skill '{}' has no catalog entry", stamp.name),
            ));
            continue;
        };
        match &entry.version {
            None => issues.push(Issue::new(
                IssueCode::MissingMarketplaceVersion,
                &stamp.rel_path,
                format!("catalog entry '{}' has no version", stamp.name),
            )),
            Some(listed) if listed != version.raw() => issues.push(Issue::new(
                IssueCode::VersionMismatchMarketplace,
                &stamp.rel_path,
                format!(
                    "metadata.version is {version} but the catalog lists {listed} for '{}'",
                    stamp.name
                ),
            )),
            Some(_) => {}
        }
    }

    let known: HashSet<&str> = stamps.iter().map(|s| s.name.as_str()).collect();
    let mut orphaned: Vec<&str> = index
        .keys()
        .copied()
        .filter(|name| !known.contains(name))
        .collect();
    orphaned.sort_unstable();
    for name in orphaned {
        issues.push(Issue::new(
            IssueCode::OrphanedMarketplaceEntry,
            &catalog.rel_path,
            format!("catalog entry '{name}' matches no active skill"),
        ));
    }

    issues
}
