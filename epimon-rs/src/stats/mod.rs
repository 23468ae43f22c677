//! Visit statistics for the monitoring dashboard.
//!
//! Visibility and aggregation are kept apart on purpose. A [`VisitSource`]
//! (the persistence layer) decides which visits a caller may see for a given
//! [`AccessScope`]; [`aggregate`] only counts what it is handed and never
//! filters. Passing an unfiltered collection to the aggregator leaks data from
//! other institutions.
mod aggregator;
mod io;
mod report;
mod scope;

pub use aggregator::*;
pub use io::*;
pub use report::*;
pub use scope::*;
