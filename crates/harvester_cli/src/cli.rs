use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Collects every item permalink from an infinitely scrolling feed.
#[derive(Parser, Debug)]
#[command(name = "feed-harvester", version, about)]
pub struct Cli {
    /// RON config file; built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the URL list (one per line)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page the browser opens before the hand-off prompt
    #[arg(long)]
    pub start_url: Option<String>,

    /// Origin used to resolve root-relative permalinks
    #[arg(long)]
    pub base_origin: Option<String>,

    /// Stop after this many cycles even if the feed keeps growing
    #[arg(long)]
    pub max_cycles: Option<u32>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Start harvesting immediately instead of waiting for Enter
    #[arg(long)]
    pub no_prompt: bool,

    /// Seconds to keep the browser open after the run
    #[arg(long)]
    pub linger_secs: Option<u64>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the effective configuration as RON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Command line flags win over the config file.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(url) = &self.start_url {
            config.browser.start_url = url.clone();
        }
        if let Some(origin) = &self.base_origin {
            config.harvest.base_origin = origin.clone();
        }
        if let Some(cap) = self.max_cycles {
            config.harvest.max_cycles = Some(cap);
        }
        if self.headless {
            config.browser.headless = true;
        }
        if let Some(secs) = self.linger_secs {
            config.linger_secs = secs;
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}
