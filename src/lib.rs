//! Typed, first-match handler tables that fold events into aggregate state.
//!
//! A [`DispatcherBuilder`] collects rules in priority order. Each rule pairs
//! an event [`Case`] (and optionally a state case) with a handler producing
//! the next state. Building freezes the rules into a [`Dispatcher`], whose
//! [`apply()`](Dispatcher::apply) tries them in order and runs the first one
//! that matches, or reports an [`UnmatchedCase`].

mod compose;
mod dispatch;
mod types;

pub use types::{
    Case, DispatchReport, Dispatcher, DispatcherBuilder, Kind, Rule, RuleDescription,
    UnmatchedCase,
};
