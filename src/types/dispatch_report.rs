use std::fmt;
use std::time::Duration;

use super::error::UnmatchedCase;
use super::rule::RuleDescription;

/// Detailed result of a single dispatch, returned by
/// [`Dispatcher::apply_detailed()`](super::Dispatcher::apply_detailed).
///
/// Carries the same outcome as [`Dispatcher::apply()`](super::Dispatcher::apply)
/// together with the rule that fired, how many rules were examined and the
/// wall-clock duration of the dispatch.
#[derive(Debug, Clone)]
#[must_use]
pub struct DispatchReport<S> {
    outcome: Result<S, UnmatchedCase>,
    fired: Option<(usize, RuleDescription)>,
    examined: usize,
    duration: Duration,
}

impl<S> DispatchReport<S> {
    pub(crate) fn new(
        outcome: Result<S, UnmatchedCase>,
        fired: Option<(usize, RuleDescription)>,
        examined: usize,
        duration: Duration,
    ) -> Self {
        Self {
            outcome,
            fired,
            examined,
            duration,
        }
    }

    /// The next state, or the unmatched case.
    pub fn outcome(&self) -> Result<&S, &UnmatchedCase> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> Result<S, UnmatchedCase> {
        self.outcome
    }

    /// Priority index of the rule that fired.
    #[must_use]
    pub fn rule_index(&self) -> Option<usize> {
        self.fired.map(|(index, _)| index)
    }

    #[must_use]
    pub fn rule(&self) -> Option<RuleDescription> {
        self.fired.map(|(_, description)| description)
    }

    /// Number of rules tried, including the one that fired.
    #[must_use]
    pub fn examined(&self) -> usize {
        self.examined
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl<S> fmt::Display for DispatchReport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.fired, &self.outcome) {
            (Some((index, rule)), _) => write!(f, "fired: #{index} ({rule})")?,
            (None, Err(err)) => write!(f, "unmatched: {err}")?,
            (None, Ok(_)) => write!(f, "fired: none")?,
        }
        write!(f, ", examined: {}", self.examined)?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accessors() {
        let rule = RuleDescription {
            event: "Deposited",
            state: "Account",
        };
        let report = DispatchReport::new(Ok(15_i64), Some((2, rule)), 3, Duration::from_nanos(500));

        assert_eq!(report.outcome(), Ok(&15));
        assert_eq!(report.rule_index(), Some(2));
        assert_eq!(report.rule(), Some(rule));
        assert_eq!(report.examined(), 3);
        assert_eq!(report.duration(), Duration::from_nanos(500));
        assert_eq!(report.into_outcome(), Ok(15));
    }

    #[test]
    fn report_display_fired() {
        let rule = RuleDescription {
            event: "Deposited",
            state: "Account",
        };
        let report = DispatchReport::new(Ok(()), Some((0, rule)), 1, Duration::from_nanos(10));
        let s = report.to_string();
        assert!(s.contains("fired: #0 (Deposited in Account)"));
        assert!(s.contains("examined: 1"));
    }

    #[test]
    fn report_display_unmatched() {
        let report: DispatchReport<()> = DispatchReport::new(
            Err(UnmatchedCase::new("Closed", "Open")),
            None,
            4,
            Duration::from_nanos(10),
        );
        let s = report.to_string();
        assert!(s.contains("unmatched: no rule matches event 'Closed' in state 'Open'"));
        assert!(s.contains("examined: 4"));
        assert_eq!(report.rule_index(), None);
    }
}
