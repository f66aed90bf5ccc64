/// Mutable run state threaded through the harvest loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopState {
    pub(crate) last_extent: u64,
    pub(crate) unchanged_cycles: u32,
    pub(crate) consecutive_extraction_failures: u32,
    pub(crate) cycles: u32,
}

impl LoopState {
    pub fn new(initial_extent: u64) -> Self {
        Self {
            last_extent: initial_extent,
            ..Self::default()
        }
    }

    pub fn last_extent(&self) -> u64 {
        self.last_extent
    }

    pub fn unchanged_cycles(&self) -> u32 {
        self.unchanged_cycles
    }

    pub fn consecutive_extraction_failures(&self) -> u32 {
        self.consecutive_extraction_failures
    }

    /// Completed cycles so far.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Records the extent measured after a scroll has settled.
    pub fn rebase_extent(&mut self, extent: u64) {
        self.last_extent = extent;
    }
}
