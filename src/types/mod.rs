mod case;
mod dispatch_report;
mod dispatcher;
mod error;
mod rule;

pub use case::{Case, Kind};
pub use dispatch_report::DispatchReport;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::UnmatchedCase;
pub use rule::{Rule, RuleDescription};
