pub mod calendar;
pub mod error;
pub mod types;

#[cfg(feature = "avalanche")]
pub mod avalanche;

#[cfg(feature = "export")]
pub mod export;

pub use calendar::MonthStamp;
pub use error::{AvalancheError, ValidationError};
pub use types::*;

/// Standard result type for all avalanche operations
pub type AvalancheResult<T> = Result<T, AvalancheError>;
