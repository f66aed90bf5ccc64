use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use harvester_core::{
    update, CycleObservation, CycleReport, LoopState, ResultSet, TerminationPolicy, Verdict,
};
use tokio_util::sync::CancellationToken;

use crate::types::fatal_or;
use crate::{
    ConfigError, CycleProcessor, CycleSummary, DriverError, HarvestError, HarvestEvent,
    HarvestOutcome, HarvestSettings, HarvestStatus, PageDriver, ProgressSink,
};

/// Drives the scroll / process / decide loop over one feed.
///
/// ```text
/// AwaitContent -> Process -> Decide -> Scroll -> AwaitContent
///                              |
///                              +-> Exhausted | Aborted | CycleLimit
/// ```
///
/// Cancellation is only observed between cycles and during the settle delay.
#[derive(Debug, Clone)]
pub struct Harvester {
    settings: HarvestSettings,
    policy: TerminationPolicy,
    processor: CycleProcessor,
    cancel: CancellationToken,
}

impl Harvester {
    pub fn new(settings: HarvestSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            policy: settings.termination_policy(),
            processor: CycleProcessor::from_settings(&settings)?,
            settings,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    /// Harvests until the feed is exhausted or the run is stopped.
    ///
    /// A lost session still hands back what was collected, inside
    /// [`HarvestError::Session`].
    pub async fn run<D: PageDriver>(
        &self,
        driver: &mut D,
        sink: &dyn ProgressSink,
    ) -> Result<HarvestOutcome, HarvestError> {
        let mut results = ResultSet::new();
        let mut cycles = 0;
        let ended = self.drive(driver, &mut results, &mut cycles, sink).await;
        engine_logging::set_cycle(0);

        let (status, lost) = match ended {
            Ok(status) => (status, None),
            Err(err) => {
                engine_error!("Browser session lost after {cycles} cycles: {err}");
                (HarvestStatus::SessionLost, Some(err))
            }
        };
        let total = results.len();
        sink.emit(HarvestEvent::Finished { status, total });

        let outcome = HarvestOutcome {
            urls: results.finalize(),
            status,
            cycles,
        };
        match lost {
            None => Ok(outcome),
            Some(source) => Err(HarvestError::Session {
                source,
                partial: outcome,
            }),
        }
    }

    async fn drive<D: PageDriver>(
        &self,
        driver: &mut D,
        results: &mut ResultSet,
        cycles: &mut u32,
        sink: &dyn ProgressSink,
    ) -> Result<HarvestStatus, DriverError> {
        let initial_extent = self.measure_extent(driver, 0).await?;
        let mut state = LoopState::new(initial_extent);
        engine_info!("Starting harvest (extent {initial_extent})");

        loop {
            if self.cancel.is_cancelled() {
                return Ok(HarvestStatus::Cancelled);
            }
            let cycle = state.cycles() + 1;
            engine_logging::set_cycle(cycle);

            let report = self.process_rendered(driver, results, sink).await?;

            let extent_after = self.measure_extent(driver, state.last_extent()).await?;
            let observation = CycleObservation {
                report,
                extent_before: state.last_extent(),
                extent_after,
            };
            let (next, verdict) = update(state, observation, &self.policy);
            state = next;
            *cycles = state.cycles();

            sink.emit(HarvestEvent::CycleCompleted(CycleSummary {
                cycle,
                report,
                total: results.len(),
                unchanged_cycles: state.unchanged_cycles(),
                consecutive_failures: state.consecutive_extraction_failures(),
                extent: extent_after,
            }));

            match verdict {
                Verdict::Continue => {}
                Verdict::Exhausted => {
                    engine_info!(
                        "End of feed: {} cycles without new links or growth",
                        state.unchanged_cycles()
                    );
                    return Ok(HarvestStatus::Exhausted);
                }
                Verdict::Aborted => {
                    engine_warn!(
                        "Too many consecutive extraction failures ({}), stopping",
                        state.consecutive_extraction_failures()
                    );
                    return Ok(HarvestStatus::Aborted);
                }
                Verdict::CycleLimit => {
                    engine_warn!("Cycle limit of {} reached, stopping", state.cycles());
                    return Ok(HarvestStatus::CycleLimit);
                }
            }

            self.scroll(driver).await?;
            if self.cancel.is_cancelled() {
                return Ok(HarvestStatus::Cancelled);
            }
            let settled = self.measure_extent(driver, extent_after).await?;
            state.rebase_extent(settled);
        }
    }

    /// AwaitContent + Process. A render timeout yields an empty report.
    async fn process_rendered<D: PageDriver>(
        &self,
        driver: &mut D,
        results: &mut ResultSet,
        sink: &dyn ProgressSink,
    ) -> Result<CycleReport, DriverError> {
        let selector = self.settings.item_selector.as_str();
        let timeout = self.settings.first_render_timeout();

        let rendered = match driver.wait_for(selector, timeout).await {
            Ok(rendered) => rendered,
            Err(err) => fatal_or(err, |err| {
                engine_warn!("waiting for items failed: {err}");
                false
            })?,
        };
        if !rendered {
            engine_warn!("No items rendered within {timeout:?}; counting as a quiet cycle");
            return Ok(CycleReport::default());
        }

        let handles = match driver.query_all(selector).await {
            Ok(handles) => handles,
            Err(err) => fatal_or(err, |err| {
                engine_warn!("querying items failed: {err}");
                Vec::new()
            })?,
        };
        engine_debug!("{} items rendered", handles.len());

        self.processor.process(driver, handles, results, sink).await
    }

    /// Scroll gestures followed by the settle delay.
    async fn scroll<D: PageDriver>(&self, driver: &mut D) -> Result<(), DriverError> {
        engine_debug!("Scrolling {} steps", self.settings.scroll_steps);
        if let Err(err) = driver
            .scroll_advance(self.settings.scroll_steps, self.settings.scroll_step_pause())
            .await
        {
            fatal_or(err, |err| engine_warn!("scroll failed: {err}"))?;
        }

        tokio::select! {
            _ = tokio::time::sleep(self.settings.settle_delay()) => {}
            _ = self.cancel.cancelled() => {
                engine_info!("Cancellation requested while waiting for content");
            }
        }
        Ok(())
    }

    async fn measure_extent<D: PageDriver>(
        &self,
        driver: &mut D,
        fallback: u64,
    ) -> Result<u64, DriverError> {
        match driver.document_extent().await {
            Ok(extent) => Ok(extent),
            Err(err) => fatal_or(err, |err| {
                engine_warn!("measuring extent failed, reusing {fallback}: {err}");
                fallback
            }),
        }
    }
}
