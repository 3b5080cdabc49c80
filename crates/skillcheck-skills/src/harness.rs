//! Static trigger, functional, and performance checks for active skills.
//!
//! Nothing here calls a model. The trigger suite guesses whether the
//! description discriminates between the body's own positive and non-trigger
//! examples by counting shared keywords.

use regex::Regex;
use serde::{Deserialize, Serialize};
use skillcheck_config::HarnessConfig;
use skillcheck_core::{Issue, IssueCode};
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::document::SkillDocument;
use crate::markdown::{self, FenceTracker, Heading, LineKind};

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").unwrap());

static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["\x{201C}]([^"\x{201D}\n]+)["\x{201D}]"#).unwrap());

const MIN_KEYWORD_LEN: usize = 4;

/// Common words that say nothing about what a skill is for.
const STOP_WORDS: &[&str] = &[
    "about", "after", "also", "asked", "asks", "before", "been", "being", "both", "claude",
    "could", "does", "doing", "done", "each", "from", "have", "help", "helps", "into", "just",
    "like", "make", "more", "most", "need", "needs", "only", "other", "over", "should", "skill",
    "skills", "some", "such", "than", "that", "their", "them", "then", "there", "these", "they",
    "this", "those", "through", "used", "user", "users", "uses", "using", "very", "want",
    "wants", "were", "what", "when", "where", "which", "while", "will", "with", "would", "your",
];

const FUNCTIONAL_MARKERS: &[&str] = &["- Error:", "- Cause:", "- Solution:", "Expected behavior:"];

const FUNCTIONAL_HEADINGS: &[(&str, &str)] = &[
    ("workflow", "Workflow heading"),
    ("example", "Examples heading"),
    ("troubleshooting", "Troubleshooting heading"),
];

/// The harness's independent check categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    Trigger,
    Functional,
    Performance,
}

impl Suite {
    pub const ALL: [Suite; 3] = [Suite::Trigger, Suite::Functional, Suite::Performance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::Trigger => "trigger",
            Suite::Functional => "functional",
            Suite::Performance => "performance",
        }
    }

    /// Issue code used for this suite's failures.
    pub fn code(&self) -> IssueCode {
        match self {
            Suite::Trigger => IssueCode::Trigger,
            Suite::Functional => IssueCode::Functional,
            Suite::Performance => IssueCode::Performance,
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one suite for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteResult {
    pub suite: Suite,
    /// `None` when the suite passed.
    pub failure: Option<Issue>,
}

impl SuiteResult {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Example utterances quoted under the body's labeled headings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamplePrompts {
    pub positive: Option<String>,
    pub negative: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Positive,
    Negative,
    Other,
}

fn classify_heading(heading: &Heading) -> Section {
    let text = heading.text.to_lowercase();
    if text.contains("non-trigger") || text.contains("non trigger") || text.contains("negative trigger")
    {
        Section::Negative
    } else if text.contains("positive trigger") {
        Section::Positive
    } else {
        Section::Other
    }
}

/// Find the first quoted utterance under a "positive trigger" heading and
/// under a "non-trigger" heading. Quotes inside code fences count, headings
/// inside them do not.
pub fn extract_example_prompts(body: &str) -> ExamplePrompts {
    let mut prompts = ExamplePrompts::default();
    let mut section = Section::Other;
    let mut fences = FenceTracker::default();

    for line in body.lines() {
        match fences.classify(line) {
            LineKind::Fence => continue,
            LineKind::Text => {
                if let Some(heading) = markdown::parse_heading(line) {
                    section = classify_heading(&heading);
                    continue;
                }
            }
            LineKind::Code => {}
        }

        let slot = match section {
            Section::Positive => &mut prompts.positive,
            Section::Negative => &mut prompts.negative,
            Section::Other => continue,
        };
        if slot.is_none() {
            if let Some(caps) = QUOTED_RE.captures(line) {
                *slot = Some(caps[1].trim().to_string());
            }
        }
    }

    prompts
}

/// Distinct description keywords, in first-seen order.
///
/// Tokens are lowercase alphanumeric runs of at least four characters that
/// start with a letter and are not stop words.
pub fn extract_keywords(description: &str, extra_stop_words: &[String]) -> Vec<String> {
    let lowered = description.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for token in TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()) {
        if token.len() < MIN_KEYWORD_LEN
            || !token.starts_with(|c: char| c.is_ascii_alphabetic())
            || STOP_WORDS.contains(&token)
            || extra_stop_words.iter().any(|w| w.eq_ignore_ascii_case(token))
            || keywords.iter().any(|k| k == token)
        {
            continue;
        }
        keywords.push(token.to_string());
    }

    keywords
}

/// How well a description separates its positive example from its
/// counter-example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerVerdict {
    Pass {
        positive_hits: usize,
        negative_hits: usize,
    },
    /// No keyword reached the positive prompt. Takes precedence over
    /// insufficient discrimination.
    ZeroOverlap { negative_hits: usize },
    InsufficientDiscrimination {
        positive_hits: usize,
        negative_hits: usize,
    },
    MissingPrompts,
}

impl TriggerVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, TriggerVerdict::Pass { .. })
    }

    /// Human-readable failure reason, `None` on pass.
    pub fn reason(&self) -> Option<String> {
        match self {
            TriggerVerdict::Pass { .. } => None,
            TriggerVerdict::ZeroOverlap { negative_hits } => Some(format!(
                "zero overlap: no description keyword appears in the positive trigger prompt \
                 (non-trigger hits: {negative_hits})"
            )),
            TriggerVerdict::InsufficientDiscrimination {
                positive_hits,
                negative_hits,
            } => Some(format!(
                "insufficient discrimination: positive trigger prompt matches {positive_hits} \
                 keywords, non-trigger prompt matches {negative_hits}"
            )),
            TriggerVerdict::MissingPrompts => Some(
                "missing example user prompts (need a quoted positive trigger and non-trigger example)"
                    .to_string(),
            ),
        }
    }
}

/// Decides whether a description would plausibly activate on the positive
/// prompt and not on the negative one.
pub trait TriggerScorer: Send + Sync {
    fn name(&self) -> &str;
    fn score(&self, description: &str, positive: &str, negative: &str) -> TriggerVerdict;
}

/// Counts description keywords found as substrings of each prompt.
#[derive(Debug, Clone, Default)]
pub struct KeywordOverlapScorer {
    extra_stop_words: Vec<String>,
}

impl KeywordOverlapScorer {
    pub fn new(extra_stop_words: Vec<String>) -> Self {
        Self { extra_stop_words }
    }
}

impl TriggerScorer for KeywordOverlapScorer {
    fn name(&self) -> &str {
        "keyword-overlap"
    }

    fn score(&self, description: &str, positive: &str, negative: &str) -> TriggerVerdict {
        let keywords = extract_keywords(description, &self.extra_stop_words);
        let positive = positive.to_lowercase();
        let negative = negative.to_lowercase();

        let positive_hits = keywords.iter().filter(|k| positive.contains(k.as_str())).count();
        let negative_hits = keywords.iter().filter(|k| negative.contains(k.as_str())).count();

        if positive_hits == 0 {
            TriggerVerdict::ZeroOverlap { negative_hits }
        } else if positive_hits <= negative_hits {
            TriggerVerdict::InsufficientDiscrimination {
                positive_hits,
                negative_hits,
            }
        } else {
            TriggerVerdict::Pass {
                positive_hits,
                negative_hits,
            }
        }
    }
}

/// Runs all three suites against a document.
#[derive(Clone)]
pub struct Harness {
    scorer: Arc<dyn TriggerScorer>,
    limits: HarnessConfig,
}

impl Harness {
    /// Harness with the keyword-overlap scorer.
    pub fn new(config: &HarnessConfig) -> Self {
        let scorer = KeywordOverlapScorer::new(config.extra_stop_words.clone());
        Self::with_scorer(Arc::new(scorer), config)
    }

    pub fn with_scorer(scorer: Arc<dyn TriggerScorer>, config: &HarnessConfig) -> Self {
        Self {
            scorer,
            limits: config.clone(),
        }
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// One result per suite, in [`Suite::ALL`] order.
    pub fn evaluate(&self, doc: &SkillDocument) -> Vec<SuiteResult> {
        Suite::ALL
            .iter()
            .map(|&suite| {
                let reason = match suite {
                    Suite::Trigger => self.trigger(doc),
                    Suite::Functional => functional(doc),
                    Suite::Performance => self.performance(doc),
                };
                SuiteResult {
                    suite,
                    failure: reason.map(|msg| Issue::new(suite.code(), &doc.rel_path, msg)),
                }
            })
            .collect()
    }

    fn trigger(&self, doc: &SkillDocument) -> Option<String> {
        let prompts = extract_example_prompts(&doc.body);
        let verdict = match (&prompts.positive, &prompts.negative) {
            (Some(positive), Some(negative)) => {
                let description = doc.frontmatter.description.as_deref().unwrap_or_default();
                self.scorer.score(description, positive, negative)
            }
            _ => TriggerVerdict::MissingPrompts,
        };
        verdict.reason()
    }

    fn performance(&self, doc: &SkillDocument) -> Option<String> {
        let lines = doc.body.lines().count();
        let words = doc.body.split_whitespace().count();
        let desc_chars = doc
            .frontmatter
            .description
            .as_deref()
            .map_or(0, |d| d.chars().count());

        let mut over = Vec::new();
        if lines > self.limits.max_body_lines {
            over.push(format!("body lines {lines} > {}", self.limits.max_body_lines));
        }
        if words > self.limits.max_body_words {
            over.push(format!("body words {words} > {}", self.limits.max_body_words));
        }
        if desc_chars > self.limits.max_description_chars {
            over.push(format!(
                "description chars {desc_chars} > {}",
                self.limits.max_description_chars
            ));
        }

        (!over.is_empty()).then(|| format!("size limits exceeded: {}", over.join("; ")))
    }
}

fn functional(doc: &SkillDocument) -> Option<String> {
    let headings = markdown::headings(&doc.body);
    let mut missing: Vec<&str> = FUNCTIONAL_HEADINGS
        .iter()
        .filter(|(needle, _)| !markdown::has_heading_containing(&headings, needle))
        .map(|(_, label)| *label)
        .collect();
    missing.extend(
        FUNCTIONAL_MARKERS
            .iter()
            .filter(|marker| !doc.body.contains(**marker))
            .copied(),
    );

    (!missing.is_empty()).then(|| format!("missing required structure: {}", missing.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillcheck_core::DocumentClass;
    use std::path::PathBuf;

    const FULL_BODY: &str = r#"# PDF Tools

## Workflow
1. Open the form.

## Examples

### Positive trigger
User says: "Please fill this PDF form with my address"

### Non-trigger
User says: "What is the weather tomorrow?"

Expected behavior: the form is filled.

## Troubleshooting
- Error: file locked
- Cause: another process
- Solution: close it
"#;

    fn doc(description: &str, body: &str) -> SkillDocument {
        let text = format!("---\nname: pdf-tools\ndescription: \"{description}\"\n---\n{body}");
        SkillDocument::parse(
            &text,
            PathBuf::from("/repo/skills/pdf-tools/SKILL.md"),
            "skills/pdf-tools/SKILL.md".into(),
            DocumentClass::Active,
        )
        .0
    }

    fn failures(results: &[SuiteResult]) -> Vec<Suite> {
        results
            .iter()
            .filter(|r| !r.passed())
            .map(|r| r.suite)
            .collect()
    }

    #[test]
    fn keyword_extraction() {
        let kws = extract_keywords(
            "Fill PDF forms. Use when the user wants to fill 2fa forms or edit PDF files.",
            &[],
        );
        assert_eq!(kws, vec!["fill", "forms", "edit", "files"]);

        let extra = vec!["FORMS".to_string()];
        assert_eq!(
            extract_keywords("fill forms quickly", &extra),
            vec!["fill", "quickly"]
        );
    }

    #[test]
    fn prompt_extraction_uses_first_quote_per_section() {
        let body = "### Positive Trigger\n\"first one\" and \"second\"\n\"later\"\n### Non-Trigger Example\n```\nUser: \u{201C}curly quoted\u{201D}\n```\n";
        let prompts = extract_example_prompts(body);
        assert_eq!(prompts.positive.as_deref(), Some("first one"));
        assert_eq!(prompts.negative.as_deref(), Some("curly quoted"));
    }

    #[test]
    fn headings_inside_fences_do_not_switch_sections() {
        let body = "### Positive trigger\n```\n# Non-trigger\n\"fenced prompt\"\n```\n";
        let prompts = extract_example_prompts(body);
        assert_eq!(prompts.positive.as_deref(), Some("fenced prompt"));
        assert_eq!(prompts.negative, None);
    }

    #[test]
    fn tilde_fence_inside_backtick_fence_hides_headings() {
        let body = "### Positive trigger\n```\n~~~\n# Non-trigger\n~~~\n\"fenced prompt\"\n```\n";
        let prompts = extract_example_prompts(body);
        assert_eq!(prompts.positive.as_deref(), Some("fenced prompt"));
        assert_eq!(prompts.negative, None);
    }

    #[test]
    fn complete_document_passes_every_suite() {
        let h = Harness::new(&HarnessConfig::default());
        let results = h.evaluate(&doc("Fill PDF forms. Use when filling a PDF form.", FULL_BODY));
        assert_eq!(failures(&results), vec![]);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn zero_overlap_takes_precedence() {
        let body = "### Positive trigger\n\"tell me a joke\"\n### Non-trigger\n\"merge these spreadsheet columns\"\n";
        let h = Harness::new(&HarnessConfig::default());
        let results = h.evaluate(&doc("Merge spreadsheet columns. Use when asked.", body));
        let trigger = &results[0];
        assert_eq!(trigger.suite, Suite::Trigger);
        let msg = &trigger.failure.as_ref().unwrap().message;
        assert!(msg.starts_with("zero overlap"), "{msg}");
        assert!(!msg.contains("insufficient"));
    }

    #[test]
    fn ties_are_insufficient_discrimination() {
        let scorer = KeywordOverlapScorer::default();
        assert_eq!(
            scorer.score("rotate images", "rotate this", "rotate that"),
            TriggerVerdict::InsufficientDiscrimination {
                positive_hits: 1,
                negative_hits: 1
            }
        );
    }

    #[test]
    fn missing_prompts_fail_trigger_suite() {
        let h = Harness::new(&HarnessConfig::default());
        let results = h.evaluate(&doc("Fill forms. Use when.", "### Positive trigger\n\"fill\"\n"));
        let msg = &results[0].failure.as_ref().unwrap().message;
        assert!(msg.contains("missing example user prompts"));
    }

    #[test]
    fn functional_failure_is_one_issue_listing_everything() {
        let h = Harness::new(&HarnessConfig::default());
        let results = h.evaluate(&doc("x", "## Workflow\n- Error: a\n"));
        let functional = results.iter().find(|r| r.suite == Suite::Functional).unwrap();
        let msg = &functional.failure.as_ref().unwrap().message;
        assert!(msg.contains("Examples heading"));
        assert!(msg.contains("Troubleshooting heading"));
        assert!(msg.contains("- Cause:"));
        assert!(msg.contains("Expected behavior:"));
        assert!(!msg.contains("- Error:"));
    }

    #[test]
    fn performance_reports_measured_values() {
        let limits = HarnessConfig {
            max_body_lines: 2,
            max_body_words: 3,
            ..HarnessConfig::default()
        };
        let h = Harness::new(&limits);
        let results = h.evaluate(&doc("short", "one two\nthree four\nfive\n"));
        let perf = results.iter().find(|r| r.suite == Suite::Performance).unwrap();
        let msg = &perf.failure.as_ref().unwrap().message;
        assert!(msg.contains("body lines 3 > 2"), "{msg}");
        assert!(msg.contains("body words 5 > 3"), "{msg}");
    }

    struct AlwaysPass;

    impl TriggerScorer for AlwaysPass {
        fn name(&self) -> &str {
            "always-pass"
        }
        fn score(&self, _: &str, _: &str, _: &str) -> TriggerVerdict {
            TriggerVerdict::Pass {
                positive_hits: 1,
                negative_hits: 0,
            }
        }
    }

    #[test]
    fn scorer_is_pluggable() {
        let h = Harness::with_scorer(Arc::new(AlwaysPass), &HarnessConfig::default());
        assert_eq!(h.scorer_name(), "always-pass");
        let body = "### Positive trigger\n\"a\"\n### Non-trigger\n\"b\"\n";
        assert!(h.evaluate(&doc("nothing", body))[0].passed());
    }
}
