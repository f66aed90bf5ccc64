use std::sync::mpsc;

use engine_logging::{engine_debug, engine_info};

use crate::HarvestEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: HarvestEvent);
}

/// Forwards events to another thread, e.g. a UI.
pub struct ChannelProgressSink {
    tx: mpsc::Sender<HarvestEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<HarvestEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: HarvestEvent) {
        let _ = self.tx.send(event);
    }
}

/// Reports progress through the log.
#[derive(Debug, Default)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: HarvestEvent) {
        match event {
            HarvestEvent::LinkFound { url, total } => {
                engine_info!("Link found ({total}): {url}");
            }
            HarvestEvent::CycleCompleted(summary) => {
                engine_info!(
                    "{} new, {} failed, {} skipped; total {} unique; unchanged {}; extent {}",
                    summary.report.new_count,
                    summary.report.failures,
                    summary.report.skipped,
                    summary.total,
                    summary.unchanged_cycles,
                    summary.extent
                );
                engine_debug!(
                    "consecutive extraction failures: {}",
                    summary.consecutive_failures
                );
            }
            HarvestEvent::Finished { status, total } => {
                engine_info!("Harvest finished ({status}) with {total} unique links");
            }
        }
    }
}
