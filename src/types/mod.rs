mod error;
mod result;
mod stats;

pub use error::ErrorKind;
pub use result::{ResultKind, SourceResult};
pub use stats::RunStats;

pub(crate) use stats::{StatsCell, lock};

/// The subquake `Result` type
pub type Result<T> = std::result::Result<T, crate::ErrorKind>;
