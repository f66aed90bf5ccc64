use crate::{CanonicalUrl, ExtractionFailure, IdentityGuard, ItemIdentity, ResultSet};

/// What happened to one extracted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    New(CanonicalUrl),
    Duplicate(CanonicalUrl),
    Failed(ExtractionFailure),
}

/// Counts produced by one processing pass over a rendered snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    pub new_count: u32,
    pub successes: u32,
    pub failures: u32,
    /// Items skipped because their identity was already handled this cycle.
    pub skipped: u32,
    /// Failures after the last successful extraction of the cycle, or all of
    /// them when nothing succeeded.
    pub trailing_failures: u32,
    pub saw_success: bool,
}

/// Book-keeping for a single cycle. Fed one item at a time in rendered order.
#[derive(Debug, Default)]
pub struct CycleTally {
    guard: IdentityGuard,
    report: CycleReport,
}

impl CycleTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the item was already handled this cycle.
    pub fn admit(&mut self, identity: Option<ItemIdentity>) -> bool {
        let first = self.guard.first_sighting(identity);
        if !first {
            self.report.skipped += 1;
        }
        first
    }

    pub fn record(
        &mut self,
        extraction: Result<CanonicalUrl, ExtractionFailure>,
        results: &mut ResultSet,
    ) -> ItemOutcome {
        match extraction {
            Ok(url) => {
                self.report.successes += 1;
                self.report.saw_success = true;
                self.report.trailing_failures = 0;
                if results.insert(url.clone()) {
                    self.report.new_count += 1;
                    ItemOutcome::New(url)
                } else {
                    ItemOutcome::Duplicate(url)
                }
            }
            Err(failure) => {
                self.report.failures += 1;
                self.report.trailing_failures += 1;
                ItemOutcome::Failed(failure)
            }
        }
    }

    pub fn report(&self) -> CycleReport {
        self.report
    }

    /// Ends the cycle; the identity guard is dropped with it.
    pub fn finish(self) -> CycleReport {
        self.report
    }
}
