use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use std::path::Path;

use crate::dates::DEFAULT_START_YEAR;
use crate::profile::{Profile, PROFILE_NAMES};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. Unset keeps the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8983/solr/benchmark_core".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    #[serde(default = "default_total_documents")]
    pub total_documents: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Wipe the core before loading. Unset follows the profile.
    #[serde(default)]
    pub index_reset: Option<bool>,
    /// Count documents after loading and compare with what was sent.
    #[serde(default)]
    pub verify: bool,
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    /// Fixed RNG seed for a reproducible corpus.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_documents: default_total_documents(),
            batch_size: default_batch_size(),
            profile: default_profile(),
            index_reset: None,
            verify: false,
            start_year: default_start_year(),
            seed: None,
        }
    }
}

fn default_total_documents() -> usize {
    1000
}
fn default_batch_size() -> usize {
    250
}
fn default_profile() -> String {
    "classic".to_string()
}
fn default_start_year() -> i32 {
    DEFAULT_START_YEAR
}

impl SeedConfig {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// The profile named in `run.profile`.
    pub fn profile(&self) -> Result<Profile> {
        Profile::by_name(&self.run.profile).with_context(|| {
            format!(
                "Unknown profile: '{}'. Available: {}",
                self.run.profile,
                PROFILE_NAMES.join(", ")
            )
        })
    }

    /// Whether the core is wiped before loading.
    pub fn index_reset(&self, profile: &Profile) -> bool {
        self.run.index_reset.unwrap_or(profile.reset_on_start)
    }

    /// Check every value. `now` is the clock generation will run against.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        let url = self.index.base_url.trim();
        if url.is_empty() {
            anyhow::bail!("index.base_url must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("index.base_url must be an http(s) URL, got '{}'", url);
        }

        if self.run.batch_size == 0 {
            anyhow::bail!("run.batch_size must be > 0");
        }

        let this_year = now.year();
        if self.run.start_year > this_year {
            anyhow::bail!(
                "run.start_year must be <= {}, got {}",
                this_year,
                self.run.start_year
            );
        }

        self.profile()?;
        Ok(())
    }
}

pub fn load_config(path: &Path, now: DateTime<Utc>) -> Result<SeedConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: SeedConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    config.validate(now)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`SeedConfig::minimal`].
///
/// Only for the implicit default path. A path the user named goes through
/// [`load_config`] so a typo is an error.
pub fn load_or_default(path: &Path, now: DateTime<Utc>) -> Result<SeedConfig> {
    if path.exists() {
        load_config(path, now)
    } else {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        Ok(SeedConfig::minimal())
    }
}
