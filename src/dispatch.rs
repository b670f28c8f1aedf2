use std::time::Instant;

use crate::types::DispatchReport;
use crate::{Kind, Rule, UnmatchedCase};

pub(crate) fn dispatch<S, E>(
    rules: &[Rule<S, E>],
    state: &S,
    event: &E,
) -> Result<S, UnmatchedCase>
where
    S: Kind,
    E: Kind,
{
    // Rules are stored in priority order; the first one that applies wins.
    for (index, rule) in rules.iter().enumerate() {
        if let Some(next) = rule.try_apply(state, event) {
            tracing::trace!(
                rule = index,
                event_case = rule.event_case,
                state_case = rule.state_case,
                "rule fired"
            );
            return Ok(next);
        }
    }

    Err(unmatched(state, event))
}

pub(crate) fn dispatch_detailed<S, E>(
    rules: &[Rule<S, E>],
    state: &S,
    event: &E,
) -> DispatchReport<S>
where
    S: Kind,
    E: Kind,
{
    let start = Instant::now();
    let mut examined = 0;

    for (index, rule) in rules.iter().enumerate() {
        examined += 1;
        if let Some(next) = rule.try_apply(state, event) {
            return DispatchReport::new(
                Ok(next),
                Some((index, rule.description())),
                examined,
                start.elapsed(),
            );
        }
    }

    DispatchReport::new(
        Err(unmatched(state, event)),
        None,
        examined,
        start.elapsed(),
    )
}

/// Index of the first rule whose predicates both hold, without running any
/// handler.
pub(crate) fn first_match<S, E>(rules: &[Rule<S, E>], state: &S, event: &E) -> Option<usize> {
    rules.iter().position(|rule| rule.matches(state, event))
}

fn unmatched<S: Kind, E: Kind>(state: &S, event: &E) -> UnmatchedCase {
    let err = UnmatchedCase::new(event.kind(), state.kind());
    tracing::debug!(event = err.event(), state = err.state(), "no rule matched");
    err
}
