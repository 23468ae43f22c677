use crate::prelude::{Day, Real};

///////////////////////////////////////////////////////////////////////////////
// Default SIR projection
///////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_POPULATION: u64 = 1000;
pub const DEFAULT_INITIAL_INFECTED: u64 = 1;
pub const DEFAULT_INITIAL_RECOVERED: u64 = 0;
pub const DEFAULT_BETA: Real = 0.2;
pub const DEFAULT_GAMMA: Real = 0.1;
pub const DEFAULT_DAYS: Day = 160;
