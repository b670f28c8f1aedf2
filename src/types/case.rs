/// Narrows a value of a closed sum type `T` to one of its variants, or to a
/// family of variants.
///
/// A rule registered for a case matches every value that narrows to it. Type
/// hierarchies are modelled as nested enums: a family is itself a variant of
/// the outer enum, and each leaf variant narrows through its family. A rule
/// for the family therefore matches all of its members, while a rule for a
/// leaf matches only that leaf.
///
/// Every type is a case of itself, which always matches. This is the root of
/// the hierarchy.
///
/// # Example
///
/// ```
/// use statefold::Case;
///
/// enum AccountEvent {
///     Funds(FundsMoved),
///     Closed(Closed),
/// }
///
/// enum FundsMoved {
///     Deposited(Deposited),
///     Withdrawn(Withdrawn),
/// }
///
/// struct Deposited { amount: i64 }
/// struct Withdrawn { amount: i64 }
/// struct Closed;
///
/// impl Case<AccountEvent> for FundsMoved {
///     fn narrow(event: &AccountEvent) -> Option<&Self> {
///         match event {
///             AccountEvent::Funds(funds) => Some(funds),
///             AccountEvent::Closed(_) => None,
///         }
///     }
/// }
///
/// impl Case<AccountEvent> for Deposited {
///     fn narrow(event: &AccountEvent) -> Option<&Self> {
///         match FundsMoved::narrow(event)? {
///             FundsMoved::Deposited(deposited) => Some(deposited),
///             FundsMoved::Withdrawn(_) => None,
///         }
///     }
/// }
///
/// let event = AccountEvent::Funds(FundsMoved::Deposited(Deposited { amount: 5 }));
/// assert!(<FundsMoved as Case<AccountEvent>>::narrow(&event).is_some());
/// assert_eq!(<Deposited as Case<AccountEvent>>::narrow(&event).map(|d| d.amount), Some(5));
/// assert!(<AccountEvent as Case<AccountEvent>>::narrow(&event).is_some());
/// ```
pub trait Case<T>: 'static {
    /// Returns the typed payload if `value` is this case, `None` otherwise.
    fn narrow(value: &T) -> Option<&Self>;
}

impl<T: 'static> Case<T> for T {
    fn narrow(value: &T) -> Option<&Self> {
        Some(value)
    }
}

/// Names the concrete variant a value holds.
///
/// Used to describe the inputs of a dispatch that no rule handled, so the
/// names should be stable and human readable, e.g. `"Deposited"`.
pub trait Kind {
    fn kind(&self) -> &'static str;
}

/// Short, readable name of a case type for diagnostics: the last path
/// segment of [`std::any::type_name`], keeping generic arguments intact.
///
/// Tuples, arrays and slices have no single path to shorten and keep their
/// full name.
pub(crate) fn case_name<C: ?Sized>() -> &'static str {
    let full = std::any::type_name::<C>();
    if full.starts_with('(') || full.starts_with('[') {
        return full;
    }
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
