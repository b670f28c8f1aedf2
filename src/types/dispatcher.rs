use std::fmt;
use std::sync::Arc;

use super::case::{Case, Kind};
use super::dispatch_report::DispatchReport;
use super::error::UnmatchedCase;
use super::rule::{Rule, RuleDescription};

/// Builder for a [`Dispatcher`].
///
/// Rules are appended in priority order: the first rule added is the first
/// one tried. Building is non-destructive, so a builder can keep growing after
/// [`build()`](Self::build) without affecting dispatchers built earlier.
///
/// # Example
///
/// ```
/// use statefold::{Case, DispatcherBuilder, Kind};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Account {
///     balance: i64,
/// }
///
/// enum AccountEvent {
///     Deposited(Deposited),
///     Closed,
/// }
///
/// struct Deposited {
///     amount: i64,
/// }
///
/// impl Case<AccountEvent> for Deposited {
///     fn narrow(event: &AccountEvent) -> Option<&Self> {
///         match event {
///             AccountEvent::Deposited(deposited) => Some(deposited),
///             AccountEvent::Closed => None,
///         }
///     }
/// }
///
/// impl Kind for Account {
///     fn kind(&self) -> &'static str {
///         "Account"
///     }
/// }
///
/// impl Kind for AccountEvent {
///     fn kind(&self) -> &'static str {
///         match self {
///             AccountEvent::Deposited(_) => "Deposited",
///             AccountEvent::Closed => "Closed",
///         }
///     }
/// }
///
/// let dispatcher = DispatcherBuilder::<Account, AccountEvent>::new()
///     .add_by_event_type::<Deposited, _>(|account, deposited| Account {
///         balance: account.balance + deposited.amount,
///     })
///     .add_catch_all(|account, _| account.clone());
///
/// let account = Account { balance: 10 };
/// let deposited = AccountEvent::Deposited(Deposited { amount: 5 });
/// assert_eq!(dispatcher.apply(&account, &deposited), Ok(Account { balance: 15 }));
/// assert_eq!(dispatcher.apply(&account, &AccountEvent::Closed), Ok(account));
/// ```
pub struct DispatcherBuilder<S, E> {
    rules: Vec<Rule<S, E>>,
}

impl<S: 'static, E: 'static> DispatcherBuilder<S, E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule for events that narrow to `Ev`, in any state.
    ///
    /// `Ev` may be a single variant or a family of variants; see [`Case`].
    #[must_use]
    pub fn add_by_event_type<Ev, F>(mut self, handler: F) -> Self
    where
        Ev: Case<E>,
        F: Fn(&S, &Ev) -> S + Send + Sync + 'static,
    {
        self.rules.push(Rule::for_event::<Ev, F>(handler));
        self
    }

    /// Append a rule for events that narrow to `Ev` while the state narrows
    /// to `St`. The handler receives both narrowed payloads.
    #[must_use]
    pub fn add_by_event_and_state_type<Ev, St, F>(mut self, handler: F) -> Self
    where
        Ev: Case<E>,
        St: Case<S>,
        F: Fn(&St, &Ev) -> S + Send + Sync + 'static,
    {
        self.rules.push(Rule::for_event_and_state::<Ev, St, F>(handler));
        self
    }

    /// Append a rule matching every (state, event) pair and finish the
    /// builder.
    ///
    /// Nothing appended after an unconditional rule could ever be reached, so
    /// this consumes the builder and returns the [`Dispatcher`].
    pub fn add_catch_all<F>(mut self, handler: F) -> Dispatcher<S, E>
    where
        F: Fn(&S, &E) -> S + Send + Sync + 'static,
    {
        self.rules.push(Rule::catch_all(handler));
        Dispatcher::new(self.rules)
    }
}

impl<S, E> DispatcherBuilder<S, E> {
    /// Combine two builders. Every rule of `self` keeps precedence over every
    /// rule of `other`; relative order within each side is preserved.
    #[must_use]
    pub fn compose(self, other: Self) -> Self {
        Self {
            rules: crate::compose::compose(self.rules, other.rules),
        }
    }

    /// Freeze a snapshot of the current rules into a [`Dispatcher`].
    ///
    /// A catch-all is not required: pairs no rule handles are reported as
    /// [`UnmatchedCase`] at dispatch time.
    pub fn build(&self) -> Dispatcher<S, E> {
        Dispatcher::new(self.rules.clone())
    }

    /// Number of rules registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S, E> Default for DispatcherBuilder<S, E> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<S, E> Clone for DispatcherBuilder<S, E> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<S, E> fmt::Debug for DispatcherBuilder<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("rules", &self.rules)
            .finish()
    }
}

/// A frozen, immutable rule table folding events into state.
///
/// Thread-safe and cheap to clone: clones share the same table. Designed to be
/// built once per aggregate type and shared by every instance.
pub struct Dispatcher<S, E> {
    rules: Arc<[Rule<S, E>]>,
}

impl<S, E> Dispatcher<S, E> {
    fn new(rules: Vec<Rule<S, E>>) -> Self {
        tracing::debug!(
            rules = rules.len(),
            fallback = rules.iter().any(Rule::is_catch_all),
            "dispatcher built"
        );
        Self {
            rules: rules.into(),
        }
    }

    /// Combine two dispatchers into a new one. Every rule of `self` keeps
    /// precedence over every rule of `other`.
    ///
    /// Rules of `other` are unreachable if `self` ends in a catch-all.
    pub fn or_else(&self, other: &Self) -> Self {
        Self::new(crate::compose::compose(
            self.rules.iter().cloned(),
            other.rules.iter().cloned(),
        ))
    }

    /// Index of the rule [`apply()`](Self::apply) would fire for this pair,
    /// without running any handler.
    #[must_use]
    pub fn matching_rule(&self, state: &S, event: &E) -> Option<usize> {
        crate::dispatch::first_match(&self.rules, state, event)
    }

    /// The rule table in priority order.
    #[must_use]
    pub fn rules(&self) -> &[Rule<S, E>] {
        &self.rules
    }

    /// Rule descriptions in priority order.
    #[must_use]
    pub fn rule_order(&self) -> Vec<RuleDescription> {
        self.rules.iter().map(Rule::description).collect()
    }

    /// Whether the table contains a catch-all, i.e. whether
    /// [`apply()`](Self::apply) can never fail.
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.rules.iter().any(Rule::is_catch_all)
    }

    /// Number of rules placed after a catch-all. They never fire.
    #[must_use]
    pub fn unreachable_rules(&self) -> usize {
        crate::compose::shadowed_by_catch_all(&self.rules)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: Kind, E: Kind> Dispatcher<S, E> {
    /// Fold one event into the state.
    ///
    /// Tries every rule in priority order and returns the result of the first
    /// one whose event and state cases both match.
    ///
    /// # Errors
    ///
    /// Returns [`UnmatchedCase`] naming the event and state kinds if no rule
    /// matches.
    pub fn apply(&self, state: &S, event: &E) -> Result<S, UnmatchedCase> {
        crate::dispatch::dispatch(&self.rules, state, event)
    }

    /// Fold a sequence of events into `initial`, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first event no rule handles and returns its
    /// [`UnmatchedCase`].
    pub fn fold<'a, I>(&self, initial: S, events: I) -> Result<S, UnmatchedCase>
    where
        I: IntoIterator<Item = &'a E>,
        E: 'a,
    {
        events
            .into_iter()
            .try_fold(initial, |state, event| self.apply(&state, event))
    }

    /// Dispatch with diagnostics.
    ///
    /// Returns a [`DispatchReport`] with the same outcome as
    /// [`apply()`](Self::apply), the rule that fired, the number of rules
    /// examined and timing information.
    pub fn apply_detailed(&self, state: &S, event: &E) -> DispatchReport<S> {
        crate::dispatch::dispatch_detailed(&self.rules, state, event)
    }
}

impl<S, E> Clone for Dispatcher<S, E> {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
        }
    }
}

impl<S, E> fmt::Debug for Dispatcher<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("rules", &self.rules)
            .finish()
    }
}

impl<S, E> fmt::Display for Dispatcher<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dispatcher({} rules", self.rules.len())?;
        if self.has_fallback() {
            write!(f, ", with fallback")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter(i64);

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Add(Add),
        Reset,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Add(i64);

    impl Case<Op> for Add {
        fn narrow(value: &Op) -> Option<&Self> {
            match value {
                Op::Add(add) => Some(add),
                Op::Reset => None,
            }
        }
    }

    impl Kind for Counter {
        fn kind(&self) -> &'static str {
            "Counter"
        }
    }

    impl Kind for Op {
        fn kind(&self) -> &'static str {
            match self {
                Op::Add(_) => "Add",
                Op::Reset => "Reset",
            }
        }
    }

    fn adder() -> DispatcherBuilder<Counter, Op> {
        DispatcherBuilder::<Counter, Op>::new()
            .add_by_event_type::<Add, _>(|c, add| Counter(c.0 + add.0))
    }

    #[test]
    fn builder_collects_rules_in_order() {
        let builder = adder().add_by_event_type::<Op, _>(|_, _| Counter(0));
        assert_eq!(builder.len(), 2);
        assert_eq!(builder.rules[0].description().event, "Add");
        assert_eq!(builder.rules[1].description().event, "Op");
    }

    #[test]
    fn build_is_non_destructive() {
        let builder = adder();
        let first = builder.build();
        let builder = builder.add_by_event_type::<Op, _>(|_, _| Counter(0));
        let second = builder.build();

        assert_eq!(builder.len(), 2);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert!(first.apply(&Counter(1), &Op::Reset).is_err());
        assert_eq!(second.apply(&Counter(1), &Op::Reset), Ok(Counter(0)));
    }

    #[test]
    fn catch_all_finishes_builder() {
        let dispatcher = adder().add_catch_all(|c, _| c.clone());
        assert!(dispatcher.has_fallback());
        assert_eq!(dispatcher.len(), 2);
        assert_eq!(dispatcher.apply(&Counter(3), &Op::Reset), Ok(Counter(3)));
    }

    #[test]
    fn compose_gives_self_precedence() {
        let doubler = DispatcherBuilder::<Counter, Op>::new()
            .add_by_event_type::<Add, _>(|c, add| Counter(c.0 + 2 * add.0));
        let composed = adder().compose(doubler.clone()).build();
        assert_eq!(composed.apply(&Counter(1), &Op::Add(Add(1))), Ok(Counter(2)));

        let reversed = doubler.compose(adder()).build();
        assert_eq!(reversed.apply(&Counter(1), &Op::Add(Add(1))), Ok(Counter(3)));
    }

    #[test]
    fn or_else_keeps_first_fallback() {
        let keep = adder().add_catch_all(|c, _| c.clone());
        let zero = DispatcherBuilder::<Counter, Op>::new().add_catch_all(|_, _| Counter(0));
        let combined = keep.or_else(&zero);

        assert_eq!(combined.len(), 3);
        assert_eq!(combined.unreachable_rules(), 1);
        assert_eq!(combined.apply(&Counter(5), &Op::Reset), Ok(Counter(5)));
    }

    #[test]
    fn fold_applies_in_order() {
        let dispatcher = adder()
            .add_by_event_type::<Op, _>(|_, _| Counter(0))
            .build();
        let events = [Op::Add(Add(4)), Op::Reset, Op::Add(Add(2)), Op::Add(Add(3))];
        assert_eq!(dispatcher.fold(Counter(10), &events), Ok(Counter(5)));
    }

    #[test]
    fn fold_stops_at_unmatched_event() {
        let dispatcher = adder().build();
        let events = [Op::Add(Add(1)), Op::Reset, Op::Add(Add(1))];
        assert_eq!(
            dispatcher.fold(Counter(0), &events),
            Err(UnmatchedCase::new("Reset", "Counter"))
        );
    }

    #[test]
    fn rule_order_lists_descriptions() {
        let dispatcher = adder().add_catch_all(|c, _| c.clone());
        assert_eq!(
            dispatcher.rule_order(),
            vec![
                RuleDescription {
                    event: "Add",
                    state: "Counter"
                },
                RuleDescription {
                    event: "Op",
                    state: "Counter"
                },
            ]
        );
    }

    #[test]
    fn clone_shares_table() {
        let dispatcher = adder().build();
        let copy = dispatcher.clone();
        assert!(Arc::ptr_eq(&dispatcher.rules, &copy.rules));
    }

    #[test]
    fn display_summarizes_table() {
        assert_eq!(adder().build().to_string(), "Dispatcher(1 rules)");
        assert_eq!(
            adder().add_catch_all(|c, _| c.clone()).to_string(),
            "Dispatcher(2 rules, with fallback)"
        );
    }

    #[test]
    fn dispatcher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dispatcher<Counter, Op>>();
        assert_send_sync::<DispatcherBuilder<Counter, Op>>();
    }
}
