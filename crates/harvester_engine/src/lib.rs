//! Harvester engine: drives a live feed through the [`PageDriver`] seam and
//! runs the harvest loop on top of `harvester_core`.
mod cycle;
mod driver;
mod export;
mod extract;
mod harvest;
mod persist;
mod progress;
mod settings;
mod types;

#[cfg(feature = "chromium")]
mod chromium;

#[cfg(feature = "chromium")]
pub use chromium::{BrowserSettings, ChromiumDriver};
pub use cycle::CycleProcessor;
pub use driver::{DriverError, PageDriver};
pub use export::{numbered_listing, render_url_list, write_url_list};
pub use extract::{ItemExtractor, ItemResult};
pub use harvest::Harvester;
pub use persist::{ensure_output_dir, write_atomically, PersistError};
pub use progress::{ChannelProgressSink, LogProgressSink, ProgressSink};
pub use settings::{ConfigError, HarvestSettings};
pub use types::{CycleSummary, HarvestError, HarvestEvent, HarvestOutcome, HarvestStatus};
