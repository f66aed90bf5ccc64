/// Decision taken after every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    /// Nothing new and no growth for `max_unchanged_cycles` cycles in a row.
    Exhausted,
    /// Consecutive extraction failures reached `max_consecutive_failures`.
    Aborted,
    /// `max_cycles` cycles completed without another terminal verdict.
    CycleLimit,
}

impl Verdict {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Verdict::Continue)
    }
}

/// Ceilings used by [`crate::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationPolicy {
    pub max_unchanged_cycles: u32,
    pub max_consecutive_failures: u32,
    pub max_cycles: Option<u32>,
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self {
            max_unchanged_cycles: 6,
            max_consecutive_failures: 15,
            max_cycles: None,
        }
    }
}
