//! Escalation state machine
//!
//! | level           | exit condition                          | otherwise        |
//! |-----------------|-----------------------------------------|------------------|
//! | plain           | never accepts; markup → structured      | headless_render  |
//! | structured      | success and words > min_words           | headless_render  |
//! | headless_render | success                                 | headful_render   |
//! | headful_render  | success                                 | failed_all       |

use super::types::{StrategyName, StrategyOutcome, StrategyStatus};
use crate::quality_gate::is_acceptable;

/// Current position in the escalation chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationState {
    Running(StrategyName),
    FailedAll,
}

impl EscalationState {
    pub const START: Self = Self::Running(StrategyName::Plain);
}

/// Decision taken after a level's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The outcome is the final result
    Accept,
    /// Run another level next
    Advance(EscalationState),
}

/// Next step after `outcome` was produced by `outcome.strategy`
#[must_use]
pub fn transition(outcome: &StrategyOutcome, min_words: usize) -> Transition {
    use EscalationState::{FailedAll, Running};
    use StrategyName::{HeadfulRender, HeadlessRender, Plain, Structured};

    match outcome.strategy {
        Plain if outcome.is_success() => Transition::Advance(Running(Structured)),
        Plain => Transition::Advance(Running(HeadlessRender)),
        Structured
            if outcome.status == StrategyStatus::Success
                && outcome
                    .text
                    .as_deref()
                    .is_some_and(|text| is_acceptable(text, min_words)) =>
        {
            Transition::Accept
        }
        Structured => Transition::Advance(Running(HeadlessRender)),
        HeadlessRender if outcome.is_success() => Transition::Accept,
        HeadlessRender => Transition::Advance(Running(HeadfulRender)),
        HeadfulRender if outcome.is_success() => Transition::Accept,
        HeadfulRender => Transition::Advance(FailedAll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EscalationState::{FailedAll, Running};

    fn outcome(strategy: StrategyName, status: StrategyStatus, words: usize) -> StrategyOutcome {
        let text = vec!["w"; words].join(" ");
        StrategyOutcome::with_text(strategy, status, text)
    }

    #[test]
    fn test_plain_transport_failure_skips_structured() {
        let failed = StrategyOutcome::failed(
            StrategyName::Plain,
            StrategyStatus::TransportError,
            "HTTP 503",
        );
        assert_eq!(
            transition(&failed, 100),
            Transition::Advance(Running(StrategyName::HeadlessRender))
        );
    }

    #[test]
    fn test_plain_success_goes_to_structured() {
        let fetched = StrategyOutcome::fetched("<p>x</p>".into(), "https://e.com/".into());
        assert_eq!(
            transition(&fetched, 100),
            Transition::Advance(Running(StrategyName::Structured))
        );
    }

    #[test]
    fn test_structured_needs_success_and_words() {
        let short = outcome(StrategyName::Structured, StrategyStatus::Success, 100);
        assert_eq!(
            transition(&short, 100),
            Transition::Advance(Running(StrategyName::HeadlessRender))
        );

        let long = outcome(StrategyName::Structured, StrategyStatus::Success, 101);
        assert_eq!(transition(&long, 100), Transition::Accept);

        let empty = outcome(StrategyName::Structured, StrategyStatus::EmptyContent, 500);
        assert_eq!(
            transition(&empty, 100),
            Transition::Advance(Running(StrategyName::HeadlessRender))
        );
    }

    #[test]
    fn test_structured_exit_reads_text_not_cached_count() {
        let mut blank = outcome(StrategyName::Structured, StrategyStatus::Success, 0);
        blank.word_count = Some(500);
        assert_eq!(
            transition(&blank, 100),
            Transition::Advance(Running(StrategyName::HeadlessRender))
        );

        let mut missing = outcome(StrategyName::Structured, StrategyStatus::Success, 200);
        missing.text = None;
        assert_eq!(
            transition(&missing, 100),
            Transition::Advance(Running(StrategyName::HeadlessRender))
        );
    }

    #[test]
    fn test_render_levels() {
        for status in [
            StrategyStatus::EmptyContent,
            StrategyStatus::BotDetected,
            StrategyStatus::RenderError,
        ] {
            let headless = outcome(StrategyName::HeadlessRender, status, 0);
            assert_eq!(
                transition(&headless, 100),
                Transition::Advance(Running(StrategyName::HeadfulRender))
            );
            let headful = outcome(StrategyName::HeadfulRender, status, 0);
            assert_eq!(transition(&headful, 100), Transition::Advance(FailedAll));
        }

        let ok = outcome(StrategyName::HeadfulRender, StrategyStatus::Success, 3);
        assert_eq!(transition(&ok, 100), Transition::Accept);
    }

    #[test]
    fn test_chain_never_moves_backwards() {
        let statuses = [
            StrategyStatus::Success,
            StrategyStatus::EmptyContent,
            StrategyStatus::BotDetected,
            StrategyStatus::TransportError,
            StrategyStatus::RenderError,
        ];
        for strategy in StrategyName::ALL {
            for status in statuses {
                if let Transition::Advance(Running(next)) =
                    transition(&outcome(strategy, status, 0), 100)
                {
                    assert!(next > strategy, "{strategy} -> {next}");
                }
            }
        }
    }
}
