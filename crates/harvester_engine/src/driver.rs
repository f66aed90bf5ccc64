use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("driver operation timed out")]
    Timeout,
    #[error("browser session closed")]
    SessionClosed,
    #[error("driver protocol error: {0}")]
    Protocol(String),
}

impl DriverError {
    /// Only a lost session ends a run; everything else degrades locally.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DriverError::SessionClosed)
    }
}

/// Capabilities the harvest loop needs from the live, rendered feed.
///
/// Handles are only valid for the cycle in which `query_all` returned them.
/// The loop borrows the driver mutably for a whole run, so exactly one caller
/// touches the page at a time.
#[async_trait::async_trait]
pub trait PageDriver: Send {
    type Handle: Send + Sync;

    /// Every element currently matching `selector`, in rendered order.
    async fn query_all(&mut self, selector: &str) -> Result<Vec<Self::Handle>, DriverError>;

    /// First descendant of `handle` matching `selector`.
    async fn find_within(
        &mut self,
        handle: &Self::Handle,
        selector: &str,
    ) -> Result<Option<Self::Handle>, DriverError>;

    async fn attribute(
        &mut self,
        handle: &Self::Handle,
        name: &str,
        timeout: Duration,
    ) -> Result<Option<String>, DriverError>;

    /// Calls a JS function declaration with the element bound to `this`.
    async fn evaluate(
        &mut self,
        handle: &Self::Handle,
        function: &str,
    ) -> Result<Value, DriverError>;

    /// Scalar proxy for how much content has been rendered (document height).
    async fn document_extent(&mut self) -> Result<u64, DriverError>;

    /// Issues `steps` discrete scroll gestures, pausing `step_pause` after each.
    async fn scroll_advance(&mut self, steps: u32, step_pause: Duration)
        -> Result<(), DriverError>;

    /// Waits until at least one element matches. `Ok(false)` on timeout.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, DriverError>;
}
