use std::time::Duration;

use harvester_core::{canonicalize_href, BaseOrigin, CanonicalUrl, ExtractionFailure};

use crate::types::fatal_or;
use crate::{ConfigError, DriverError, HarvestSettings, PageDriver};

pub type ItemResult = Result<CanonicalUrl, ExtractionFailure>;

/// Reads the permalink of one rendered item without touching the page.
#[derive(Debug, Clone)]
pub struct ItemExtractor {
    permalink_selector: String,
    attribute_timeout: Duration,
    base_origin: BaseOrigin,
}

impl ItemExtractor {
    pub fn new(
        permalink_selector: impl Into<String>,
        attribute_timeout: Duration,
        base_origin: BaseOrigin,
    ) -> Self {
        Self {
            permalink_selector: permalink_selector.into(),
            attribute_timeout,
            base_origin,
        }
    }

    pub fn from_settings(settings: &HarvestSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(
            settings.permalink_selector.clone(),
            settings.attribute_timeout(),
            settings.base_origin()?,
        ))
    }

    /// The outer error is a lost session; the inner one a per-item failure.
    pub async fn extract<D>(
        &self,
        driver: &mut D,
        handle: &D::Handle,
    ) -> Result<ItemResult, DriverError>
    where
        D: PageDriver + ?Sized,
    {
        let link = match driver.find_within(handle, &self.permalink_selector).await {
            Ok(Some(link)) => link,
            Ok(None) => return Ok(Err(ExtractionFailure::NoPermalink)),
            Err(err) => return fatal_or(err, |err| Err(driver_failure(err))),
        };

        let read = driver.attribute(&link, "href", self.attribute_timeout);
        let href = match tokio::time::timeout(self.attribute_timeout, read).await {
            Err(_elapsed) => return Ok(Err(ExtractionFailure::AttributeTimeout)),
            Ok(Ok(Some(href))) => href,
            Ok(Ok(None)) => return Ok(Err(ExtractionFailure::EmptyHref)),
            Ok(Err(err)) => return fatal_or(err, |err| Err(driver_failure(err))),
        };

        Ok(canonicalize_href(&href, &self.base_origin))
    }
}

fn driver_failure(err: DriverError) -> ExtractionFailure {
    match err {
        DriverError::Timeout => ExtractionFailure::AttributeTimeout,
        other => ExtractionFailure::Driver(other.to_string()),
    }
}
