use std::fmt;

use harvester_core::{CanonicalUrl, CycleReport};
use thiserror::Error;

use crate::DriverError;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestStatus {
    /// The feed stopped producing new items and stopped growing.
    Exhausted,
    /// Too many consecutive extraction failures.
    Aborted,
    /// The configured cycle cap was reached.
    CycleLimit,
    /// Cancelled from outside at a cycle boundary.
    Cancelled,
    /// The browser went away mid-run.
    SessionLost,
}

impl HarvestStatus {
    /// Only an exhausted feed is known to be complete.
    pub fn is_complete(self) -> bool {
        matches!(self, HarvestStatus::Exhausted)
    }
}

impl fmt::Display for HarvestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestStatus::Exhausted => write!(f, "feed exhausted"),
            HarvestStatus::Aborted => write!(f, "aborted after repeated extraction failures"),
            HarvestStatus::CycleLimit => write!(f, "stopped at cycle limit"),
            HarvestStatus::Cancelled => write!(f, "cancelled"),
            HarvestStatus::SessionLost => write!(f, "browser session lost"),
        }
    }
}

/// Result of a run. Partial results are kept whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOutcome {
    /// Sorted, deduplicated URLs.
    pub urls: Vec<CanonicalUrl>,
    pub status: HarvestStatus,
    pub cycles: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub cycle: u32,
    pub report: CycleReport,
    pub total: usize,
    pub unchanged_cycles: u32,
    pub consecutive_failures: u32,
    pub extent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestEvent {
    LinkFound { url: CanonicalUrl, total: usize },
    CycleCompleted(CycleSummary),
    Finished { status: HarvestStatus, total: usize },
}

#[derive(Debug, Error)]
pub enum HarvestError {
    /// `partial` holds everything collected before the session was lost.
    #[error("browser session lost after {} cycles: {source}", .partial.cycles)]
    Session {
        #[source]
        source: DriverError,
        partial: HarvestOutcome,
    },
}

impl HarvestError {
    pub fn partial(&self) -> &HarvestOutcome {
        match self {
            HarvestError::Session { partial, .. } => partial,
        }
    }
}

/// Passes fatal driver errors through; the caller degrades everything else.
pub(crate) fn fatal_or<T>(
    err: DriverError,
    recover: impl FnOnce(DriverError) -> T,
) -> Result<T, DriverError> {
    if err.is_fatal() {
        Err(err)
    } else {
        Ok(recover(err))
    }
}
