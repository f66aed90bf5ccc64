use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use harvester_engine::{BrowserSettings, HarvestSettings};
use serde::{Deserialize, Serialize};

/// Everything the tool can be configured with, as stored in a RON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub harvest: HarvestSettings,
    pub browser: BrowserSettings,
    /// Destination of the finished URL list.
    pub output: PathBuf,
    pub log_file: Option<PathBuf>,
    /// Seconds the browser stays open after the run.
    pub linger_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            harvest: HarvestSettings::default(),
            browser: BrowserSettings::default(),
            output: PathBuf::from("feed_links.txt"),
            log_file: None,
            linger_secs: 10,
        }
    }
}

/// Built-in defaults, or `path` when given. Missing keys fall back to defaults.
pub fn load(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse(&content).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn parse(content: &str) -> Result<AppConfig> {
    Ok(ron::from_str(content)?)
}

pub fn to_ron(config: &AppConfig) -> Result<String> {
    let pretty = ron::ser::PrettyConfig::new();
    Ok(ron::ser::to_string_pretty(config, pretty)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse(
            r#"(
                harvest: (max_cycles: Some(40), settle_delay_ms: 1500),
                output: "out/links.txt",
            )"#,
        )
        .unwrap();

        assert_eq!(config.harvest.max_cycles, Some(40));
        assert_eq!(config.harvest.settle_delay_ms, 1500);
        assert_eq!(config.harvest.max_unchanged_cycles, 6);
        assert_eq!(config.output, PathBuf::from("out/links.txt"));
        assert_eq!(config.browser, BrowserSettings::default());
    }

    #[test]
    fn pretty_output_parses_back() {
        let config = AppConfig::default();
        let text = to_ron(&config).unwrap();
        assert_eq!(parse(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = load(Some(&temp.path().join("absent.ron"))).unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load(None).unwrap(), AppConfig::default());
    }
}
