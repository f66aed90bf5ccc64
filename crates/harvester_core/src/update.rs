use crate::{CycleObservation, LoopState, TerminationPolicy, Verdict};

/// Pure termination step: folds one cycle's observation into the loop state.
pub fn update(
    mut state: LoopState,
    observation: CycleObservation,
    policy: &TerminationPolicy,
) -> (LoopState, Verdict) {
    let report = observation.report;
    state.cycles = state.cycles.saturating_add(1);

    // Any success inside the cycle breaks the run of failures.
    state.consecutive_extraction_failures = if report.saw_success {
        report.trailing_failures
    } else {
        state
            .consecutive_extraction_failures
            .saturating_add(report.failures)
    };

    if state.consecutive_extraction_failures >= policy.max_consecutive_failures {
        return (state, Verdict::Aborted);
    }

    if report.new_count > 0 {
        state.unchanged_cycles = 0;
    } else if observation.extent_after == observation.extent_before {
        state.unchanged_cycles = state.unchanged_cycles.saturating_add(1);
        if state.unchanged_cycles >= policy.max_unchanged_cycles {
            return (state, Verdict::Exhausted);
        }
    } else {
        // Still loading (ads, already-seen items); not a stall.
        state.unchanged_cycles = 0;
    }

    if let Some(cap) = policy.max_cycles {
        if state.cycles >= cap {
            return (state, Verdict::CycleLimit);
        }
    }

    (state, Verdict::Continue)
}
