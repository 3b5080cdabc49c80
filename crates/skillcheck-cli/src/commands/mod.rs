use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use skillcheck_config::{ConfigLoader, SkillcheckConfig};
use skillcheck_core::CheckError;

use crate::output;

mod audit;
mod triggers;
mod watch;

/// Schema auditor and trigger-heuristic harness for SKILL.md catalogs
#[derive(Parser)]
#[command(name = "skillcheck", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to skillcheck.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Repository root holding the skills tree and the catalog
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit frontmatter, structure, local links, and catalog consistency
    Audit {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Re-run when skill files, the catalog, or the config change
        #[arg(short, long)]
        watch: bool,
    },
    /// Run the trigger, functional, and performance suites on active skills
    Triggers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the resolved configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Run the selected command and return the process exit status.
    pub async fn run(self) -> skillcheck_core::Result<i32> {
        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());

        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref(), &root)?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level
                .as_deref()
                .unwrap_or(config.logging.level.as_str())
        };
        init_tracing(&config, log_level);
        for w in config_loader.warnings() {
            warn!("{}", w);
        }

        match self.command {
            Commands::Audit { json, watch: true } => {
                watch::cmd_watch(config_loader, root, json).await
            }
            Commands::Audit { json, watch: false } => audit::cmd_audit(&root, &config, json).await,
            Commands::Triggers { json } => triggers::cmd_triggers(&root, &config, json).await,
            Commands::Config { json } => Self::cmd_config(&config, config_loader.path(), json),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    fn cmd_config(config: &SkillcheckConfig, path: &Path, json: bool) -> skillcheck_core::Result<i32> {
        let warnings: Vec<String> = config
            .validate()
            .map_err(CheckError::Config)?
            .iter()
            .map(ToString::to_string)
            .collect();
        let source = path.exists().then(|| path.to_path_buf());

        if json {
            #[derive(Serialize)]
            struct ConfigView<'a> {
                source: Option<PathBuf>,
                config: &'a SkillcheckConfig,
                warnings: Vec<String>,
            }
            output::print_json(
                true,
                ConfigView {
                    source,
                    config,
                    warnings,
                },
            )?;
        } else {
            match &source {
                Some(p) => println!("# loaded from {}", p.display()),
                None => println!("# no config file found, showing defaults"),
            }
            for w in &warnings {
                println!("# {w}");
            }
            println!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| CheckError::Config(e.to_string()))?
            );
        }
        Ok(0)
    }

    fn cmd_completions(shell: Shell) -> skillcheck_core::Result<i32> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "skillcheck", &mut std::io::stdout());
        Ok(0)
    }
}

/// Logs go to stderr so stdout stays clean for reports and JSON.
fn init_tracing(config: &SkillcheckConfig, log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    // try_init: a second run in the same process keeps the first subscriber.
    let _ = if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
    };
}
