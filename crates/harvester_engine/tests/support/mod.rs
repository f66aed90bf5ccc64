#![allow(dead_code)]

use std::sync::{Mutex, Once};
use std::time::Duration;

use harvester_engine::{DriverError, HarvestEvent, PageDriver, ProgressSink};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

#[derive(Debug, Clone)]
pub enum Href {
    Present(String),
    /// The item has no permalink anchor at all.
    Missing,
    /// Reading the attribute never completes.
    Hangs,
    Broken,
}

#[derive(Debug, Clone)]
pub struct FakeItem {
    pub data_id: Option<String>,
    pub href: Href,
}

impl FakeItem {
    pub fn link(id: &str, href: &str) -> Self {
        Self {
            data_id: Some(id.to_string()),
            href: Href::Present(href.to_string()),
        }
    }

    pub fn anonymous(href: &str) -> Self {
        Self {
            data_id: None,
            href: Href::Present(href.to_string()),
        }
    }

    pub fn without_permalink(id: &str) -> Self {
        Self {
            data_id: Some(id.to_string()),
            href: Href::Missing,
        }
    }

    pub fn with_href(id: &str, href: Href) -> Self {
        Self {
            data_id: Some(id.to_string()),
            href,
        }
    }
}

/// What the rendered view looks like between two scrolls.
#[derive(Debug, Clone)]
pub struct Frame {
    items: Vec<FakeItem>,
    extent: u64,
    /// Extent once the items have been looked at (content still streaming in).
    late_extent: Option<u64>,
}

impl Frame {
    pub fn new(items: Vec<FakeItem>, extent: u64) -> Self {
        Self {
            items,
            extent,
            late_extent: None,
        }
    }

    pub fn loading_to(mut self, late_extent: u64) -> Self {
        self.late_extent = Some(late_extent);
        self
    }
}

/// Scripted feed: every scroll moves to the next frame, the last one repeats.
pub struct ScriptedFeed {
    frames: Vec<Frame>,
    current: usize,
    queried: bool,
    pub scrolls: u32,
    pub scroll_steps: Vec<u32>,
    pub queries: u32,
    close_after_scrolls: Option<u32>,
}

impl ScriptedFeed {
    pub fn new(frames: Vec<Frame>) -> Self {
        assert!(!frames.is_empty(), "script needs at least one frame");
        Self {
            frames,
            current: 0,
            queried: false,
            scrolls: 0,
            scroll_steps: Vec::new(),
            queries: 0,
            close_after_scrolls: None,
        }
    }

    pub fn closing_after_scrolls(mut self, scrolls: u32) -> Self {
        self.close_after_scrolls = Some(scrolls);
        self
    }

    fn frame(&self) -> &Frame {
        &self.frames[self.current]
    }

    fn check_open(&self) -> Result<(), DriverError> {
        match self.close_after_scrolls {
            Some(limit) if self.scrolls >= limit => Err(DriverError::SessionClosed),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl PageDriver for ScriptedFeed {
    type Handle = FakeItem;

    async fn query_all(&mut self, _selector: &str) -> Result<Vec<FakeItem>, DriverError> {
        self.check_open()?;
        self.queries += 1;
        self.queried = true;
        Ok(self.frame().items.clone())
    }

    async fn find_within(
        &mut self,
        handle: &FakeItem,
        _selector: &str,
    ) -> Result<Option<FakeItem>, DriverError> {
        self.check_open()?;
        match handle.href {
            Href::Missing => Ok(None),
            _ => Ok(Some(handle.clone())),
        }
    }

    async fn attribute(
        &mut self,
        handle: &FakeItem,
        _name: &str,
        _timeout: Duration,
    ) -> Result<Option<String>, DriverError> {
        self.check_open()?;
        match &handle.href {
            Href::Present(href) => Ok(Some(href.clone())),
            Href::Missing => Ok(None),
            Href::Hangs => std::future::pending().await,
            Href::Broken => Err(DriverError::Protocol("node detached".into())),
        }
    }

    async fn evaluate(&mut self, handle: &FakeItem, _function: &str) -> Result<Value, DriverError> {
        self.check_open()?;
        Ok(json!({ "dataId": handle.data_id }))
    }

    async fn document_extent(&mut self) -> Result<u64, DriverError> {
        self.check_open()?;
        let frame = self.frame();
        Ok(match frame.late_extent {
            Some(late) if self.queried => late,
            _ => frame.extent,
        })
    }

    async fn scroll_advance(&mut self, steps: u32, _step_pause: Duration) -> Result<(), DriverError> {
        self.check_open()?;
        self.scrolls += 1;
        self.scroll_steps.push(steps);
        self.current = (self.current + 1).min(self.frames.len() - 1);
        self.queried = false;
        Ok(())
    }

    async fn wait_for(&mut self, _selector: &str, timeout: Duration) -> Result<bool, DriverError> {
        self.check_open()?;
        if self.frame().items.is_empty() {
            tokio::time::sleep(timeout).await;
            return Ok(false);
        }
        Ok(true)
    }
}

/// Keeps every event; optionally cancels a token once `cancel_after` cycles completed.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<HarvestEvent>>,
    cancel: Option<(u32, CancellationToken)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_after(cycles: u32, token: CancellationToken) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cancel: Some((cycles, token)),
        }
    }

    pub fn events(&self) -> Vec<HarvestEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn unchanged_per_cycle(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HarvestEvent::CycleCompleted(summary) => Some(summary.unchanged_cycles),
                _ => None,
            })
            .collect()
    }

    pub fn totals_per_cycle(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HarvestEvent::CycleCompleted(summary) => Some(summary.total),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: HarvestEvent) {
        if let (HarvestEvent::CycleCompleted(summary), Some((after, token))) = (&event, &self.cancel)
        {
            if summary.cycle >= *after {
                token.cancel();
            }
        }
        self.events.lock().unwrap().push(event);
    }
}

pub fn status_url(user: &str, id: u32) -> String {
    format!("/{user}/status/{id}")
}
