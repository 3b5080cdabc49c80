//! Minimal Markdown scanning: fences, ATX headings, and inline link targets.

use regex::Regex;
use std::sync::LazyLock;

static INLINE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]\n]*\]\(([^)\n]*)\)").unwrap());

/// How a line relates to fenced code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// An opening or closing fence line.
    Fence,
    /// Inside a fenced block.
    Code,
    Text,
}

/// The marker character and run length of an open fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

/// Parse a fence line: at least three backticks or tildes, and the rest of
/// the line after the run. Up to three spaces of indentation are allowed.
fn parse_fence(line: &str) -> Option<(Fence, &str)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let trimmed = &line[indent..];
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    if len < 3 {
        return None;
    }
    let rest = &trimmed[len..];
    if marker == '`' && rest.contains('`') {
        return None;
    }
    Some((Fence { marker, len }, rest))
}

/// Line-by-line fence state.
///
/// A block closes only on a bare fence of the same character that is at
/// least as long as the one that opened it. A backtick block can show
/// tilde fences as content, and a longer fence can show shorter ones.
#[derive(Debug, Default)]
pub struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    pub fn classify(&mut self, line: &str) -> LineKind {
        match self.open {
            None => match parse_fence(line) {
                Some((fence, _)) => {
                    self.open = Some(fence);
                    LineKind::Fence
                }
                None => LineKind::Text,
            },
            Some(open) => match parse_fence(line) {
                Some((fence, rest))
                    if fence.marker == open.marker
                        && fence.len >= open.len
                        && rest.trim().is_empty() =>
                {
                    self.open = None;
                    LineKind::Fence
                }
                _ => LineKind::Code,
            },
        }
    }
}

/// Lines outside fenced code blocks, paired with their 1-based line number.
pub fn unfenced_lines(body: &str) -> Vec<(usize, &str)> {
    let mut fences = FenceTracker::default();
    body.lines()
        .enumerate()
        .filter(|(_, line)| fences.classify(line) == LineKind::Text)
        .map(|(idx, line)| (idx + 1, line))
        .collect()
}

/// Body text with fenced code blocks removed.
pub fn strip_fenced_blocks(body: &str) -> String {
    unfenced_lines(body)
        .into_iter()
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub text: String,
}

/// Parse an ATX heading (`#` through `######` followed by a space).
pub fn parse_heading(line: &str) -> Option<Heading> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(|c: char| c == ' ' || c == '\t') {
        return None;
    }
    let text = rest.trim().trim_end_matches('#').trim_end();
    Some(Heading {
        level,
        text: text.to_string(),
    })
}

/// All headings outside fenced code blocks, in document order.
pub fn headings(body: &str) -> Vec<Heading> {
    unfenced_lines(body)
        .into_iter()
        .filter_map(|(_, line)| parse_heading(line))
        .collect()
}

/// True when some heading's text contains `needle` (case-insensitive).
pub fn has_heading_containing(headings: &[Heading], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    headings
        .iter()
        .any(|h| h.text.to_lowercase().contains(&needle))
}

/// Targets of `[label](target)` occurrences in `text`, in order.
///
/// Angle-bracketed targets are unwrapped and a trailing link title
/// (`[x](path "title")`) is dropped.
pub fn link_targets(text: &str) -> Vec<String> {
    INLINE_LINK_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_target(m.as_str()))
        .collect()
}

fn clean_target(raw: &str) -> String {
    let target = raw.trim();
    if target.starts_with('<') {
        if let Some(end) = target.find('>') {
            return target[1..end].to_string();
        }
    }
    match target.split_once(char::is_whitespace) {
        Some((before, _)) => before.to_string(),
        None => target.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_lines_are_skipped() {
        let body = "intro\n```bash\n# not a heading\n```\n## Real";
        let lines: Vec<&str> = unfenced_lines(body).into_iter().map(|(_, l)| l).collect();
        assert_eq!(lines, vec!["intro", "## Real"]);
    }

    #[test]
    fn tilde_fences_count_too() {
        let body = "~~~\n[a](missing.md)\n~~~\n[b](here.md)";
        assert_eq!(link_targets(&strip_fenced_blocks(body)), vec!["here.md"]);
    }

    #[test]
    fn other_fence_marker_does_not_close_block() {
        let body = "```markdown\n~~~\n[inside code](nowhere.md)\n## Examples\n~~~\n```\n[after](here.md)";
        let text = strip_fenced_blocks(body);
        assert_eq!(link_targets(&text), vec!["here.md"]);
        assert!(headings(body).is_empty());
    }

    #[test]
    fn shorter_or_annotated_fence_does_not_close_block() {
        let body = "````\n```\n[a](one.md)\n```rust\n````\n[b](two.md)";
        assert_eq!(link_targets(&strip_fenced_blocks(body)), vec!["two.md"]);

        let body = "~~~\n~~~~ not a close\n[a](one.md)\n~~~~~\n[b](two.md)";
        assert_eq!(link_targets(&strip_fenced_blocks(body)), vec!["two.md"]);
    }

    #[test]
    fn fence_line_classification() {
        let mut fences = FenceTracker::default();
        let kinds: Vec<LineKind> = ["text", "    ```", "```py", "~~~", "``` ", "text"]
            .into_iter()
            .map(|l| fences.classify(l))
            .collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Text,
                LineKind::Text,
                LineKind::Fence,
                LineKind::Code,
                LineKind::Fence,
                LineKind::Text,
            ]
        );
    }

    #[test]
    fn heading_parsing() {
        assert_eq!(
            parse_heading("## Workflow ##"),
            Some(Heading {
                level: 2,
                text: "Workflow".into()
            })
        );
        assert!(parse_heading("#hashtag").is_none());
        assert!(parse_heading("####### seven").is_none());
        assert!(parse_heading("plain text").is_none());
    }

    #[test]
    fn heading_search_is_case_insensitive() {
        let hs = headings("# Title\n### TROUBLESHOOTING tips\n");
        assert!(has_heading_containing(&hs, "troubleshooting"));
        assert!(!has_heading_containing(&hs, "workflow"));
    }

    #[test]
    fn link_target_variants() {
        let text = r#"See [guide](docs/guide.md#setup), [site](https://x.io) and [t](<a b.md>) or [q](ref.md "Title")."#;
        assert_eq!(
            link_targets(text),
            vec!["docs/guide.md#setup", "https://x.io", "a b.md", "ref.md"]
        );
    }
}
