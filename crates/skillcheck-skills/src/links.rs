use skillcheck_core::{Issue, IssueCode};

use crate::corpus::normalize_path;
use crate::document::SkillDocument;
use crate::markdown;

/// Report every relative link in the body whose target file is missing.
///
/// Links inside fenced code blocks, bare fragments, and anything carrying a
/// URI scheme (`https:`, `mailto:`, ...) are ignored. Targets resolve against
/// the directory holding the document.
pub fn check_links(doc: &SkillDocument) -> Vec<Issue> {
    let text = markdown::strip_fenced_blocks(&doc.body);
    let base = doc.base_dir();
    let mut issues = Vec::new();

    for target in markdown::link_targets(&text) {
        let Some(local) = local_path(&target) else {
            continue;
        };
        let resolved = normalize_path(&base.join(local));
        if !resolved.exists() {
            issues.push(Issue::new(
                IssueCode::BrokenLocalLink,
                &doc.rel_path,
                format!("link target '{target}' does not exist"),
            ));
        }
    }

    issues
}

/// The file-path part of a link target, or `None` when it is not local.
fn local_path(target: &str) -> Option<&str> {
    if has_uri_scheme(target) {
        return None;
    }
    let path = target
        .split(['#', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    (!path.is_empty()).then_some(path)
}

/// `scheme:` per RFC 3986: a letter then letters, digits, `+`, `-` or `.`.
fn has_uri_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
