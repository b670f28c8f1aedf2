use crate::Rule;

/// Concatenates two rule tables: every rule of `first` in its order, then
/// every rule of `second` in its order. `first` always takes precedence.
pub(crate) fn compose<S, E>(
    first: impl IntoIterator<Item = Rule<S, E>>,
    second: impl IntoIterator<Item = Rule<S, E>>,
) -> Vec<Rule<S, E>> {
    let mut rules: Vec<Rule<S, E>> = first.into_iter().collect();
    let boundary = rules.len();
    rules.extend(second);

    tracing::debug!(
        first = boundary,
        second = rules.len() - boundary,
        "composed rule tables"
    );

    let shadowed = shadowed_by_catch_all(&rules);
    if shadowed > 0 {
        tracing::warn!(shadowed, "rules follow a catch-all and can never fire");
    }

    rules
}

/// Number of rules placed after the first catch-all rule.
pub(crate) fn shadowed_by_catch_all<S, E>(rules: &[Rule<S, E>]) -> usize {
    rules
        .iter()
        .position(Rule::is_catch_all)
        .map_or(0, |idx| rules.len() - idx - 1)
}
