#[cfg(test)]
mod tests {
    use skillcheck_config::SkillcheckConfig;
    use skillcheck_core::{IssueCode, RunReport};
    use skillcheck_skills::{Harness, run_audit, run_harness};
    use std::fs;
    use std::path::Path;

    const CODE_REVIEW: &str = r#"---
name: code-review
description: Review pull request diffs. Use when the user asks for a code review of changes.
license: MIT
allowed-tools: Read Grep
metadata:
  category: development
  tags: [review, git]
  status: stable
  version: "2"
---

# Code Review

See the [checklist](references/checklist.md#style) and the [guide](https://example.com/guide).

## Workflow
1. Read the diff.
2. Comment on problems.

## Examples

### Positive trigger
User says: "Can you review my pull request before I merge?"

### Non-trigger
User says: "Write a poem about autumn leaves"

Expected behavior: a list of review comments grouped by file.

## Troubleshooting
- Error: diff is empty
- Cause: nothing staged
- Solution: stage changes first
"#;

    const DRAFT: &str = "---\nname: idea\ndescription: Rough idea.\n---\n\nNothing yet.\n";

    const CATALOG: &str =
        r#"{"name":"skills","plugins":[{"name":"code-review","version":"2","source":"./skills/dev/code-review"}]}"#;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn valid_corpus(root: &Path) {
        write(root, "skills/dev/code-review/SKILL.md", CODE_REVIEW);
        write(root, "skills/dev/code-review/references/checklist.md", "# Style\n");
        write(root, "skills/drafts/idea/SKILL.md", DRAFT);
        write(root, ".claude-plugin/marketplace.json", CATALOG);
    }

    fn codes(report: &RunReport) -> Vec<IssueCode> {
        report.issues.iter().map(|i| i.code).collect()
    }

    fn count(report: &RunReport, code: IssueCode) -> usize {
        report.issues.iter().filter(|i| i.code == code).count()
    }

    fn harness(config: &SkillcheckConfig) -> Harness {
        Harness::new(&config.harness)
    }

    // ── Round trip ─────────────────────────────────────────────

    #[tokio::test]
    async fn test_valid_corpus_is_clean_for_both_entry_points() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        let config = SkillcheckConfig::default();

        let audit = run_audit(dir.path(), &config).await.unwrap();
        assert_eq!(codes(&audit), vec![]);
        assert_eq!(audit.active_count(), 1);
        assert_eq!(audit.draft_count(), 1);
        assert_eq!(audit.exit_code(), 0);

        let harnessed = run_harness(dir.path(), &config, harness(&config)).await.unwrap();
        assert_eq!(codes(&harnessed), vec![]);
        assert_eq!(harnessed.documents.len(), 1);
        for tally in &harnessed.suites {
            assert_eq!((tally.passed, tally.failed), (1, 0), "{}", tally.suite);
        }
        assert_eq!(harnessed.exit_code(), 0);
    }

    // ── Properties ─────────────────────────────────────────────

    #[tokio::test]
    async fn test_audit_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        write(dir.path(), "skills/a/bad/SKILL.md", "---\nname: Bad\n---\n[x](gone.md)\n");
        write(dir.path(), "skills/b/worse/SKILL.md", "no frontmatter");
        let config = SkillcheckConfig::default();

        let first = run_audit(dir.path(), &config).await.unwrap();
        let second = run_audit(dir.path(), &config).await.unwrap();
        assert!(!first.issues.is_empty());
        assert_eq!(first.issues, second.issues);
        assert_eq!(first.exit_code(), second.exit_code());
    }

    #[tokio::test]
    async fn test_missing_and_mismatch_never_both_fire() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        write(
            dir.path(),
            "skills/dev/unlisted/SKILL.md",
            &CODE_REVIEW
                .replace("name: code-review", "name: unlisted")
                .replace("version: \"2\"", "version: \"7\""),
        );
        write(dir.path(), "skills/dev/unlisted/references/checklist.md", "x");
        let config = SkillcheckConfig::default();

        let report = run_audit(dir.path(), &config).await.unwrap();
        let unlisted: Vec<IssueCode> = report
            .issues_for("skills/dev/unlisted/SKILL.md")
            .map(|i| i.code)
            .collect();
        assert_eq!(unlisted, vec![IssueCode::MissingMarketplaceEntry]);
    }

    #[tokio::test]
    async fn test_drafts_skip_active_rules_and_catalog() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        let config = SkillcheckConfig::default();

        let report = run_audit(dir.path(), &config).await.unwrap();
        assert_eq!(report.issues_for("skills/drafts/idea/SKILL.md").count(), 0);

        let harnessed = run_harness(dir.path(), &config, harness(&config)).await.unwrap();
        assert!(
            harnessed
                .documents
                .iter()
                .all(|d| d.path != "skills/drafts/idea/SKILL.md")
        );
    }

    #[tokio::test]
    async fn test_errors_sort_before_warnings() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        write(
            dir.path(),
            ".claude-plugin/marketplace.json",
            r#"[{"name":"code-review","version":"2"},{"name":"retired","version":"1"}]"#,
        );
        write(dir.path(), "skills/zz/broken/SKILL.md", "---\nname: broken\n");
        let config = SkillcheckConfig::default();

        let report = run_audit(dir.path(), &config).await.unwrap();
        let last = report.issues.last().unwrap();
        assert_eq!(last.code, IssueCode::OrphanedMarketplaceEntry);
        assert!(report.issues[..report.issues.len() - 1].iter().all(|i| i.is_error()));
        assert_eq!(report.exit_code(), 1);
    }

    // ── Scenarios ──────────────────────────────────────────────

    #[tokio::test]
    async fn test_unclosed_frontmatter_still_reports_field_failures() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        write(
            dir.path(),
            "skills/drafts/open/SKILL.md",
            "---\nname: open\ndescription: never closed\n\n# Body\n",
        );
        let config = SkillcheckConfig::default();

        let report = run_audit(dir.path(), &config).await.unwrap();
        let found: Vec<IssueCode> = report
            .issues_for("skills/drafts/open/SKILL.md")
            .map(|i| i.code)
            .collect();
        assert_eq!(
            found,
            vec![
                IssueCode::InvalidFrontmatter,
                IssueCode::MissingDescription,
                IssueCode::MissingName,
            ]
        );
    }

    #[tokio::test]
    async fn test_name_case_is_compared_exactly() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        write(
            dir.path(),
            "skills/drafts/my-skill/SKILL.md",
            "---\nname: \"My-Skill\"\ndescription: Use when testing.\n---\n",
        );
        let config = SkillcheckConfig::default();

        let report = run_audit(dir.path(), &config).await.unwrap();
        let found: Vec<IssueCode> = report
            .issues_for("skills/drafts/my-skill/SKILL.md")
            .map(|i| i.code)
            .collect();
        assert_eq!(
            found,
            vec![IssueCode::InvalidNameFormat, IssueCode::NameFolderMismatch]
        );
    }

    #[tokio::test]
    async fn test_zero_overlap_beats_insufficient_discrimination() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        let body = CODE_REVIEW
            .replace(
                "\"Can you review my pull request before I merge?\"",
                "\"Write a poem about autumn leaves\"",
            )
            .replace(
                "\"Write a poem about autumn leaves\"\n\nExpected",
                "\"Please review this pull request\"\n\nExpected",
            );
        write(dir.path(), "skills/dev/code-review/SKILL.md", &body);
        let config = SkillcheckConfig::default();

        let report = run_harness(dir.path(), &config, harness(&config)).await.unwrap();
        assert_eq!(codes(&report), vec![IssueCode::Trigger]);
        assert!(report.issues[0].message.contains("zero overlap"));
        assert!(!report.issues[0].message.contains("insufficient discrimination"));
        assert_eq!(report.exit_code(), 1);
        let trigger = report.suites.iter().find(|s| s.suite == "trigger").unwrap();
        assert_eq!((trigger.passed, trigger.failed), (0, 1));
    }

    #[tokio::test]
    async fn test_catalog_version_is_compared_as_text() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        write(
            dir.path(),
            "skills/dev/code-review/SKILL.md",
            &CODE_REVIEW.replace("version: \"2\"", "version: 3"),
        );
        let config = SkillcheckConfig::default();

        let report = run_audit(dir.path(), &config).await.unwrap();
        assert_eq!(codes(&report), vec![IssueCode::VersionMismatchMarketplace]);
        assert_eq!(report.issues[0].path, "skills/dev/code-review/SKILL.md");
    }

    // ── Failure handling ───────────────────────────────────────

    #[tokio::test]
    async fn test_missing_catalog_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        fs::remove_file(dir.path().join(".claude-plugin/marketplace.json")).unwrap();
        let config = SkillcheckConfig::default();

        let report = run_audit(dir.path(), &config).await.unwrap();
        assert_eq!(codes(&report), vec![IssueCode::MarketplaceJsonError]);
        assert_eq!(report.issues[0].path, ".claude-plugin/marketplace.json");
    }

    #[tokio::test]
    async fn test_missing_content_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = SkillcheckConfig::default();
        assert!(run_audit(dir.path(), &config).await.is_err());
        assert!(
            run_harness(dir.path(), &config, harness(&config))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_duplicate_active_names() {
        let dir = tempfile::tempdir().unwrap();
        valid_corpus(dir.path());
        write(dir.path(), "skills/other/code-review/SKILL.md", CODE_REVIEW);
        write(dir.path(), "skills/other/code-review/references/checklist.md", "x");
        let config = SkillcheckConfig::default();

        let report = run_audit(dir.path(), &config).await.unwrap();
        assert_eq!(count(&report, IssueCode::DuplicateSkillName), 1);
        assert_eq!(
            report
                .issues_for("skills/other/code-review/SKILL.md")
                .map(|i| i.code)
                .collect::<Vec<_>>(),
            vec![IssueCode::DuplicateSkillName]
        );
    }
}
