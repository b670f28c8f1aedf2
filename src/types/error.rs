use thiserror::Error;

/// No rule of a [`Dispatcher`](super::Dispatcher) matched the (state, event)
/// pair it was given.
///
/// An unhandled combination is a gap in the aggregate's handler table. It is
/// returned to the caller instead of leaving the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("no rule matches event '{event}' in state '{state}'")]
pub struct UnmatchedCase {
    event: &'static str,
    state: &'static str,
}

impl UnmatchedCase {
    #[must_use]
    pub fn new(event: &'static str, state: &'static str) -> Self {
        Self { event, state }
    }

    /// Kind of the event no rule handled.
    #[must_use]
    pub fn event(&self) -> &'static str {
        self.event
    }

    /// Kind of the state the event was applied to.
    #[must_use]
    pub fn state(&self) -> &'static str {
        self.state
    }
}
