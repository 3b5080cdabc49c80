use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use skillcheck_config::{ConfigLoader, SkillcheckConfig};
use skillcheck_core::CheckError;
use skillcheck_skills::Corpus;

use super::audit;

/// Quiet period after the first event before re-running; editors often
/// write a file in several steps.
const DEBOUNCE: Duration = Duration::from_millis(250);

/// The content root, the catalog, and the config file. Changes anywhere else
/// under the repository root (build output, VCS metadata) are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WatchTargets {
    content_root: PathBuf,
    catalog_path: PathBuf,
    config_path: PathBuf,
}

impl WatchTargets {
    fn new(root: &Path, config: &SkillcheckConfig, config_path: &Path) -> Self {
        let corpus = Corpus::new(root, &config.layout);
        Self {
            content_root: corpus.content_root().to_path_buf(),
            catalog_path: corpus.catalog_path().to_path_buf(),
            config_path: config_path.to_path_buf(),
        }
    }

    /// Directories to register: the content root recursively, and the
    /// existing parents of the catalog and config files non-recursively.
    fn watches(&self) -> Vec<(PathBuf, RecursiveMode)> {
        let mut out = vec![(self.content_root.clone(), RecursiveMode::Recursive)];
        for file in [&self.catalog_path, &self.config_path] {
            let Some(dir) = file.parent().filter(|d| d.is_dir()) else {
                debug!(path = %file.display(), "no directory to watch");
                continue;
            };
            if !dir.starts_with(&self.content_root) && !out.iter().any(|(d, _)| d == dir) {
                out.push((dir.to_path_buf(), RecursiveMode::NonRecursive));
            }
        }
        out
    }

    fn is_relevant(&self, changed: &Path) -> bool {
        changed.starts_with(&self.content_root)
            || changed == self.catalog_path.as_path()
            || is_config_file(changed, &self.config_path)
    }

    fn register(&self, watcher: &mut impl Watcher) -> skillcheck_core::Result<()> {
        for (dir, mode) in self.watches() {
            watcher
                .watch(&dir, mode)
                .map_err(|e| CheckError::Watch(format!("failed to watch {}: {e}", dir.display())))?;
        }
        Ok(())
    }

    fn unregister(&self, watcher: &mut impl Watcher) {
        for (dir, _) in self.watches() {
            if let Err(e) = watcher.unwatch(&dir) {
                debug!(dir = %dir.display(), error = %e, "unwatch failed");
            }
        }
    }
}

/// Audit once, then again after every batch of relevant changes.
/// Returns the exit status of the last completed run.
pub(super) async fn cmd_watch(
    loader: ConfigLoader,
    root: PathBuf,
    json: bool,
) -> skillcheck_core::Result<i32> {
    let mut exit_code = audit::cmd_audit(&root, &loader.get(), json).await?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<PathBuf>>();
    let mut watcher = notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
        match res {
            Ok(event) => {
                if matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) {
                    let _ = tx.send(event.paths);
                }
            }
            Err(e) => warn!(error = %e, "file watcher error"),
        }
    })
    .map_err(|e| CheckError::Watch(format!("failed to create file watcher: {e}")))?;

    let mut targets = WatchTargets::new(&root, &loader.get(), loader.path());
    targets.register(&mut watcher)?;

    info!(
        content_root = %targets.content_root.display(),
        "watching for changes (Ctrl-C to stop)"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watch");
                break;
            }
            received = rx.recv() => {
                let Some(mut changed) = received else { break };
                tokio::time::sleep(DEBOUNCE).await;
                while let Ok(more) = rx.try_recv() {
                    changed.extend(more);
                }

                changed.retain(|p| targets.is_relevant(p));
                if changed.is_empty() {
                    continue;
                }

                if changed.iter().any(|p| is_config_file(p, loader.path())) {
                    match loader.reload() {
                        Ok(()) => {
                            let next = WatchTargets::new(&root, &loader.get(), loader.path());
                            if next != targets {
                                targets.unregister(&mut watcher);
                                next.register(&mut watcher)?;
                                targets = next;
                            }
                        }
                        Err(e) => warn!(error = %e, "config file has errors, keeping current config"),
                    }
                }

                debug!(changed = changed.len(), "re-running audit");
                println!();
                match audit::cmd_audit(&root, &loader.get(), json).await {
                    Ok(code) => exit_code = code,
                    Err(e) => error!(error = %e, "audit failed"),
                }
            }
        }
    }

    Ok(exit_code)
}

fn is_config_file(changed: &Path, config_path: &Path) -> bool {
    changed.file_name().is_some() && changed.file_name() == config_path.file_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_changes_match_by_file_name() {
        let config = Path::new("/repo/skillcheck.toml");
        assert!(is_config_file(Path::new("/repo/skillcheck.toml"), config));
        assert!(!is_config_file(Path::new("/repo/skills/a/SKILL.md"), config));
        assert!(!is_config_file(Path::new("/"), config));
    }

    #[test]
    fn only_content_catalog_and_config_changes_are_relevant() {
        let root = Path::new("/repo");
        let targets = WatchTargets::new(
            root,
            &SkillcheckConfig::default(),
            &root.join("skillcheck.toml"),
        );

        assert!(targets.is_relevant(Path::new("/repo/skills/a/SKILL.md")));
        assert!(targets.is_relevant(Path::new("/repo/skills/a/reference.md")));
        assert!(targets.is_relevant(Path::new("/repo/.claude-plugin/marketplace.json")));
        assert!(targets.is_relevant(Path::new("/repo/skillcheck.toml")));

        assert!(!targets.is_relevant(Path::new("/repo/target/debug/skillcheck")));
        assert!(!targets.is_relevant(Path::new("/repo/.git/index")));
        assert!(!targets.is_relevant(Path::new("/repo/README.md")));
        assert!(!targets.is_relevant(Path::new("/repo/.claude-plugin/other.json")));
    }

    #[test]
    fn watches_skip_the_repository_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("skills/a")).unwrap();
        std::fs::create_dir_all(root.join(".claude-plugin")).unwrap();
        std::fs::create_dir_all(root.join("target")).unwrap();

        let config_dir = root.join("conf");
        std::fs::create_dir_all(&config_dir).unwrap();
        let targets = WatchTargets::new(
            root,
            &SkillcheckConfig::default(),
            &config_dir.join("skillcheck.toml"),
        );

        let dirs: Vec<(PathBuf, RecursiveMode)> = targets.watches();
        assert_eq!(
            dirs,
            vec![
                (root.join("skills"), RecursiveMode::Recursive),
                (root.join(".claude-plugin"), RecursiveMode::NonRecursive),
                (config_dir, RecursiveMode::NonRecursive),
            ]
        );
    }

    #[test]
    fn missing_catalog_directory_is_not_watched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("skills")).unwrap();
        let targets = WatchTargets::new(
            dir.path(),
            &SkillcheckConfig::default(),
            Path::new("skillcheck.toml"),
        );
        assert_eq!(
            targets.watches(),
            vec![(dir.path().join("skills"), RecursiveMode::Recursive)]
        );
    }
}
