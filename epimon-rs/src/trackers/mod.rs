//! Storage and rendering of simulated epicurves.
mod trajectory;

pub use trajectory::*;
