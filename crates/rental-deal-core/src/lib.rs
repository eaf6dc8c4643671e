pub mod deal;
pub mod error;
pub mod types;

#[cfg(feature = "report")]
pub mod report;

pub use error::RentalDealError;
pub use types::*;

/// Standard result type for all rental-deal operations
pub type RentalDealResult<T> = Result<T, RentalDealError>;
