//! Progressive fallback retrieval engine

pub mod fallback;
pub mod levels;
pub mod transitions;
pub mod types;

pub use fallback::{FallbackEngine, SessionScope};
pub use transitions::{EscalationState, Transition, transition};
pub use types::{
    AttemptSummary, RetrievalRequest, RetrievalResult, RetrievalStatus, StrategyName,
    StrategyOutcome, StrategyStatus, StrategyUsed,
};
