//! CLI configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizforge_core::NavigationMode;

/// Top-level quizforge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    /// Navigation mode used when `--mode` is not given.
    #[serde(default)]
    pub default_mode: NavigationMode,
    /// Shuffle the selected questions before starting.
    #[serde(default)]
    pub shuffle: bool,
    /// Seed for reproducible shuffles.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Bank file used when `--bank` is not given. A relative path is taken
    /// from the directory holding the config file.
    #[serde(default)]
    pub bank: Option<PathBuf>,
    /// Tell the user right away whether a study-mode answer was correct.
    #[serde(default = "default_true")]
    pub show_feedback: bool,
}

fn default_true() -> bool {
    true
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            default_mode: NavigationMode::Sequential,
            shuffle: false,
            seed: None,
            bank: None,
            show_feedback: true,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Environment variable overrides: `QUIZFORGE_MODE`, `QUIZFORGE_SEED`,
/// `QUIZFORGE_BANK`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let mut config = toml::from_str::<QuizforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            if let (Some(bank), Some(dir)) = (&config.bank, path.parent()) {
                config.bank = Some(dir.join(bank));
            }
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizforgeConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    Ok(config)
}

fn apply_env_overrides(
    config: &mut QuizforgeConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(mode) = var("QUIZFORGE_MODE") {
        config.default_mode = mode
            .parse()
            .map_err(|e: String| anyhow::anyhow!("QUIZFORGE_MODE: {e}"))?;
    }

    if let Some(seed) = var("QUIZFORGE_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("QUIZFORGE_SEED must be an unsigned integer, got '{seed}'"))?;
        config.seed = Some(seed);
    }

    if let Some(bank) = var("QUIZFORGE_BANK") {
        config.bank = Some(PathBuf::from(bank));
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}
