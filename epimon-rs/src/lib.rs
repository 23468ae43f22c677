//! Numerical and aggregation core of an epidemiological monitoring backend.
//!
//! Two independent pieces live here: a deterministic SIR simulator that
//! projects an outbreak from a handful of population parameters, and the
//! statistics aggregator that summarizes reported visits per day and per
//! symptom category. Persistence, authentication and transport are left to
//! the caller.
pub mod domain;
pub mod error;
pub mod models;
pub mod params;
pub mod prelude;
pub mod sim;
pub mod stats;
pub mod trackers;
pub mod utils;

pub use crate::error::{Error, Result};
pub use crate::models::simulate;
pub use crate::params::{SimulationParameters, SimulationRequest};
pub use crate::stats::{aggregate, statistics, AccessScope};

/// Base Real type used by this crate. Uses an alias to easily change precision
/// if necessary.
pub type Real = f64;

/// Simulation time, measured in whole days starting at zero.
pub type Day = usize;

pub(crate) const INF: Real = Real::INFINITY;
