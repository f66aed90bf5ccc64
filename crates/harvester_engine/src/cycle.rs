use engine_logging::{engine_debug, engine_trace};
use harvester_core::{
    fingerprint_function, CycleReport, CycleTally, ItemIdentity, ItemOutcome, ResultSet,
};

use crate::types::fatal_or;
use crate::{
    ConfigError, DriverError, HarvestEvent, HarvestSettings, ItemExtractor, PageDriver,
    ProgressSink,
};

/// Runs the item extractor over one rendered snapshot.
#[derive(Debug, Clone)]
pub struct CycleProcessor {
    extractor: ItemExtractor,
    fingerprint: String,
}

impl CycleProcessor {
    pub fn new(extractor: ItemExtractor, identity_data_key: &str) -> Self {
        Self {
            extractor,
            fingerprint: fingerprint_function(identity_data_key),
        }
    }

    pub fn from_settings(settings: &HarvestSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(
            ItemExtractor::from_settings(settings)?,
            &settings.identity_data_key,
        ))
    }

    /// Processes `handles` in rendered order, one at a time.
    ///
    /// The snapshot is consumed: handles are never looked at again after this
    /// call. Failed items still count as handled so a broken item costs one
    /// attempt per cycle. An error means the session is gone.
    pub async fn process<D: PageDriver>(
        &self,
        driver: &mut D,
        handles: Vec<D::Handle>,
        results: &mut ResultSet,
        sink: &dyn ProgressSink,
    ) -> Result<CycleReport, DriverError> {
        let mut tally = CycleTally::new();

        for (index, handle) in handles.into_iter().enumerate() {
            let identity = self.identify(driver, &handle).await?;
            if !tally.admit(identity) {
                engine_trace!("item {index} already handled this cycle");
                continue;
            }

            let extraction = self.extractor.extract(driver, &handle).await?;
            match tally.record(extraction, results) {
                ItemOutcome::New(url) => sink.emit(HarvestEvent::LinkFound {
                    url,
                    total: results.len(),
                }),
                ItemOutcome::Duplicate(url) => engine_trace!("already collected: {url}"),
                ItemOutcome::Failed(failure) => {
                    engine_debug!("item {index}: extraction failed: {failure}")
                }
            }
        }

        Ok(tally.finish())
    }

    async fn identify<D: PageDriver>(
        &self,
        driver: &mut D,
        handle: &D::Handle,
    ) -> Result<Option<ItemIdentity>, DriverError> {
        match driver.evaluate(handle, &self.fingerprint).await {
            Ok(value) => Ok(ItemIdentity::from_fingerprint(&value)),
            Err(err) => fatal_or(err, |err| {
                engine_debug!("fingerprint unavailable: {err}");
                None
            }),
        }
    }
}
