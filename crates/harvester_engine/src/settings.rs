use std::time::Duration;

use harvester_core::{BaseOrigin, OriginError, TerminationPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Origin(#[from] OriginError),
    #[error("selector `{0}` must not be empty")]
    EmptySelector(&'static str),
    #[error("`{0}` must be at least 1")]
    ZeroLimit(&'static str),
}

/// Tunables of a harvest run. Durations are milliseconds so config files stay flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    /// Selects one rendered feed item.
    pub item_selector: String,
    /// Selects the permalink anchor inside an item.
    pub permalink_selector: String,
    /// camelCase name of the `data-*` attribute carrying a stable item id.
    pub identity_data_key: String,
    pub base_origin: String,
    pub first_render_timeout_ms: u64,
    pub attribute_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub scroll_steps: u32,
    pub scroll_step_pause_ms: u64,
    pub max_unchanged_cycles: u32,
    pub max_consecutive_failures: u32,
    /// Hard stop for feeds whose extent never settles.
    pub max_cycles: Option<u32>,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            item_selector: r#"article[data-testid="tweet"]"#.to_string(),
            permalink_selector: "a:has(time[datetime])".to_string(),
            identity_data_key: "tweetId".to_string(),
            base_origin: "https://x.com".to_string(),
            first_render_timeout_ms: 15_000,
            attribute_timeout_ms: 2_000,
            settle_delay_ms: 3_000,
            scroll_steps: 5,
            scroll_step_pause_ms: 100,
            max_unchanged_cycles: 6,
            max_consecutive_failures: 15,
            max_cycles: None,
        }
    }
}

impl HarvestSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.item_selector.trim().is_empty() {
            return Err(ConfigError::EmptySelector("item_selector"));
        }
        if self.permalink_selector.trim().is_empty() {
            return Err(ConfigError::EmptySelector("permalink_selector"));
        }
        if self.max_unchanged_cycles == 0 {
            return Err(ConfigError::ZeroLimit("max_unchanged_cycles"));
        }
        if self.max_consecutive_failures == 0 {
            return Err(ConfigError::ZeroLimit("max_consecutive_failures"));
        }
        if self.max_cycles == Some(0) {
            return Err(ConfigError::ZeroLimit("max_cycles"));
        }
        self.base_origin()?;
        Ok(())
    }

    pub fn base_origin(&self) -> Result<BaseOrigin, ConfigError> {
        Ok(BaseOrigin::parse(&self.base_origin)?)
    }

    pub fn termination_policy(&self) -> TerminationPolicy {
        TerminationPolicy {
            max_unchanged_cycles: self.max_unchanged_cycles,
            max_consecutive_failures: self.max_consecutive_failures,
            max_cycles: self.max_cycles,
        }
    }

    pub fn first_render_timeout(&self) -> Duration {
        Duration::from_millis(self.first_render_timeout_ms)
    }

    pub fn attribute_timeout(&self) -> Duration {
        Duration::from_millis(self.attribute_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn scroll_step_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_step_pause_ms)
    }
}
