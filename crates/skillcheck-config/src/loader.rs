use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::schema::{ConfigWarning, SkillcheckConfig};

pub const CONFIG_FILE_NAME: &str = "skillcheck.toml";

/// Loads and reloads the skillcheck configuration.
pub struct ConfigLoader {
    config: Arc<RwLock<SkillcheckConfig>>,
    config_path: PathBuf,
    warnings: Vec<ConfigWarning>,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > SKILLCHECK_CONFIG env >
    /// `<root>/skillcheck.toml` > `~/.config/skillcheck/skillcheck.toml`.
    ///
    /// When none of the implicit candidates exist the corpus-root path is
    /// returned so a later `reload` picks up a newly created file there.
    pub fn resolve_path(explicit: Option<&Path>, root: &Path) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("SKILLCHECK_CONFIG") {
            return PathBuf::from(p);
        }
        let local = root.join(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        if let Some(user) = dirs::config_dir().map(|d| d.join("skillcheck").join(CONFIG_FILE_NAME)) {
            if user.exists() {
                return user;
            }
        }
        local
    }

    /// Load the config from disk, falling back to defaults.
    ///
    /// Validation warnings are not logged here; read them back with
    /// [`ConfigLoader::warnings`].
    pub fn load(explicit: Option<&Path>, root: &Path) -> skillcheck_core::Result<Self> {
        let config_path = Self::resolve_path(explicit, root);
        let (config, warnings) = Self::read(&config_path, explicit.is_some())?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
            warnings,
        })
    }

    /// Non-fatal validation findings from the initial load.
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Parse, apply env overrides, and validate. A missing file is only an
    /// error when the caller named it explicitly.
    fn read(
        config_path: &Path,
        required: bool,
    ) -> skillcheck_core::Result<(SkillcheckConfig, Vec<ConfigWarning>)> {
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(config_path)?;
            Self::parse(&raw, config_path)?
        } else if required {
            return Err(skillcheck_core::CheckError::Config(format!(
                "config file not found: {}",
                config_path.display()
            )));
        } else {
            debug!(?config_path, "no config file, using defaults");
            SkillcheckConfig::default()
        };

        let config = Self::apply_env_overrides(config);

        let warnings = config
            .validate()
            .map_err(skillcheck_core::CheckError::Config)?;

        Ok((config, warnings))
    }

    /// Parse TOML text into a config.
    pub fn parse(raw: &str, origin: &Path) -> skillcheck_core::Result<SkillcheckConfig> {
        toml::from_str::<SkillcheckConfig>(raw).map_err(|e| {
            skillcheck_core::CheckError::Config(format!(
                "failed to parse {}: {}",
                origin.display(),
                e
            ))
        })
    }

    /// Get a read snapshot of the current config.
    pub fn get(&self) -> SkillcheckConfig {
        self.config.read().clone()
    }

    /// Path the config was (or would be) loaded from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides (SKILLCHECK_LOG_LEVEL, SKILLCHECK_CONTENT_ROOT, SKILLCHECK_CATALOG).
    fn apply_env_overrides(mut config: SkillcheckConfig) -> SkillcheckConfig {
        if let Ok(v) = std::env::var("SKILLCHECK_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Ok(v) = std::env::var("SKILLCHECK_CONTENT_ROOT") {
            let old_root = config.layout.content_root.clone();
            config.layout.content_root = PathBuf::from(&v);
            // Keep drafts nested under the new root when they were nested under the old one.
            if let Ok(rest) = config.layout.drafts_dir.strip_prefix(&old_root) {
                config.layout.drafts_dir = PathBuf::from(v).join(rest);
            }
        }
        if let Ok(v) = std::env::var("SKILLCHECK_CATALOG") {
            config.layout.catalog_path = PathBuf::from(v);
        }
        config
    }

    /// Reload the config from disk. Keeps the current config on failure.
    pub fn reload(&self) -> skillcheck_core::Result<()> {
        let (new_config, warnings) = Self::read(&self.config_path, false)?;
        for w in &warnings {
            warn!("{}", w);
        }
        *self.config.write() = new_config;
        info!("configuration reloaded");
        Ok(())
    }
}
