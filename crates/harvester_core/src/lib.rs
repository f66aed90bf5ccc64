//! Harvester core: IO-free pieces of the feed harvesting algorithm.
//!
//! Everything here is a pure function of its inputs so the engine's loop can
//! be driven and tested without a browser.
mod canonical;
mod cycle;
mod identity;
mod observation;
mod result_set;
mod state;
mod update;
mod verdict;

pub use canonical::{canonicalize_href, BaseOrigin, CanonicalUrl, ExtractionFailure, OriginError};
pub use cycle::{CycleReport, CycleTally, ItemOutcome};
pub use identity::{fingerprint_function, IdentityGuard, ItemIdentity};
pub use observation::CycleObservation;
pub use result_set::ResultSet;
pub use state::LoopState;
pub use update::update;
pub use verdict::{TerminationPolicy, Verdict};
