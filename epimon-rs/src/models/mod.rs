//! Epidemic models. Only the deterministic SIR model is implemented.
mod sir;

pub use sir::*;
