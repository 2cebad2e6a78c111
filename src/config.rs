use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result, ensure};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    pub ranking: RankingConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub cities_csv: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    /// Outlying states/territories dropped from the ranking entirely.
    #[serde(default = "default_excluded_states")]
    pub excluded_states: Vec<String>,
    #[serde(default)]
    pub min_population: u64,
    pub cities_per_state: usize,
}

fn default_excluded_states() -> Vec<String> {
    vec!["AK".to_string(), "HI".to_string(), "PR".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub feed_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        // An invalid capacity is fatal here, before any ingestion starts.
        ensure!(
            config.ranking.cities_per_state >= 1,
            "cities_per_state must be at least 1 (got {})",
            config.ranking.cities_per_state
        );
        Ok(config)
    }
}
