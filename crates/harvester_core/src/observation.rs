use crate::CycleReport;

/// Everything the termination detector needs to know about one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleObservation {
    pub report: CycleReport,
    /// Extent measured once the previous scroll settled (or at run start).
    pub extent_before: u64,
    /// Extent measured after this cycle's items were processed.
    pub extent_after: u64,
}

impl CycleObservation {
    /// A cycle in which no item rendered within the wait window.
    pub fn empty(extent_before: u64, extent_after: u64) -> Self {
        Self {
            report: CycleReport::default(),
            extent_before,
            extent_after,
        }
    }
}
