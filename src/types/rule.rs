use std::fmt;
use std::sync::Arc;

use super::case::{Case, case_name};

/// Narrows both inputs and runs the user handler when both narrow.
pub(crate) type Handler<S, E> = dyn Fn(&S, &E) -> Option<S> + Send + Sync;

/// One entry of a rule table: an event predicate, a state predicate and the
/// handler producing the next state.
///
/// Rules are created through [`DispatcherBuilder`](super::DispatcherBuilder)
/// and their position in the table is their priority. The handler only runs
/// when both predicates hold; [`try_apply`](Self::try_apply) returns `None`
/// otherwise.
pub struct Rule<S, E> {
    pub(crate) event_case: &'static str,
    pub(crate) state_case: &'static str,
    pub(crate) event_matches: fn(&E) -> bool,
    pub(crate) state_matches: fn(&S) -> bool,
    pub(crate) handler: Arc<Handler<S, E>>,
    pub(crate) unconditional: bool,
}

impl<S: 'static, E: 'static> Rule<S, E> {
    /// A rule matching events that narrow to `Ev`, in any state.
    pub(crate) fn for_event<Ev, F>(handler: F) -> Self
    where
        Ev: Case<E>,
        F: Fn(&S, &Ev) -> S + Send + Sync + 'static,
    {
        let handler: Arc<Handler<S, E>> = Arc::new(move |state: &S, event: &E| {
            <Ev as Case<E>>::narrow(event).map(|event| handler(state, event))
        });
        Self {
            event_case: case_name::<Ev>(),
            state_case: case_name::<S>(),
            event_matches: |event| <Ev as Case<E>>::narrow(event).is_some(),
            state_matches: |_| true,
            handler,
            unconditional: false,
        }
    }

    /// A rule matching events that narrow to `Ev` while the state narrows to
    /// `St`. The handler sees both narrowed payloads.
    pub(crate) fn for_event_and_state<Ev, St, F>(handler: F) -> Self
    where
        Ev: Case<E>,
        St: Case<S>,
        F: Fn(&St, &Ev) -> S + Send + Sync + 'static,
    {
        let handler: Arc<Handler<S, E>> = Arc::new(move |state: &S, event: &E| {
            let state = <St as Case<S>>::narrow(state)?;
            let event = <Ev as Case<E>>::narrow(event)?;
            Some(handler(state, event))
        });
        Self {
            event_case: case_name::<Ev>(),
            state_case: case_name::<St>(),
            event_matches: |event| <Ev as Case<E>>::narrow(event).is_some(),
            state_matches: |state| <St as Case<S>>::narrow(state).is_some(),
            handler,
            unconditional: false,
        }
    }

    /// A rule matching every (state, event) pair.
    pub(crate) fn catch_all<F>(handler: F) -> Self
    where
        F: Fn(&S, &E) -> S + Send + Sync + 'static,
    {
        let handler: Arc<Handler<S, E>> =
            Arc::new(move |state: &S, event: &E| Some(handler(state, event)));
        Self {
            event_case: case_name::<E>(),
            state_case: case_name::<S>(),
            event_matches: |_| true,
            state_matches: |_| true,
            handler,
            unconditional: true,
        }
    }
}

impl<S, E> Rule<S, E> {
    /// Whether this rule accepts `event`.
    #[must_use]
    pub fn event_matches(&self, event: &E) -> bool {
        (self.event_matches)(event)
    }

    /// Whether this rule accepts `state`.
    #[must_use]
    pub fn state_matches(&self, state: &S) -> bool {
        (self.state_matches)(state)
    }

    /// Whether both predicates hold for the pair.
    #[must_use]
    pub fn matches(&self, state: &S, event: &E) -> bool {
        self.state_matches(state) && self.event_matches(event)
    }

    /// Runs the handler if both predicates hold.
    #[must_use]
    pub fn try_apply(&self, state: &S, event: &E) -> Option<S> {
        (self.handler)(state, event)
    }

    /// Whether this rule matches every pair, shadowing all rules after it.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.unconditional
    }

    #[must_use]
    pub fn description(&self) -> RuleDescription {
        RuleDescription {
            event: self.event_case,
            state: self.state_case,
        }
    }
}

impl<S, E> Clone for Rule<S, E> {
    fn clone(&self) -> Self {
        Self {
            event_case: self.event_case,
            state_case: self.state_case,
            event_matches: self.event_matches,
            state_matches: self.state_matches,
            handler: Arc::clone(&self.handler),
            unconditional: self.unconditional,
        }
    }
}

impl<S, E> fmt::Debug for Rule<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("event", &self.event_case)
            .field("state", &self.state_case)
            .finish_non_exhaustive()
    }
}

/// The cases a rule was registered for, by name.
///
/// Rules registered without a state case report the state type itself, which
/// matches every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RuleDescription {
    pub event: &'static str,
    pub state: &'static str,
}

impl fmt::Display for RuleDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.event, self.state)
    }
}
