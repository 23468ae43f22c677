//! Batch evaluation of independent simulations.
mod sweep;

pub use sweep::*;
