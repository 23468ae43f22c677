pub use crate::domain::*;
pub use crate::error::{Error, Result};
pub use crate::models::*;
pub use crate::params::*;
pub use crate::sim::*;
pub use crate::stats::*;
pub use crate::trackers::*;
pub use crate::{Day, Real};
pub(crate) use crate::INF;
