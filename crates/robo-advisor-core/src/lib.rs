pub mod error;
pub mod portfolio;
pub mod types;

#[cfg(feature = "profile")]
pub mod profile;

#[cfg(feature = "analysis")]
pub mod analysis;

#[cfg(feature = "performance")]
pub mod performance;

pub use error::AdvisorError;
pub use portfolio::allocation::Allocation;
pub use types::*;

/// Standard result type for all robo-advisor operations
pub type AdvisorResult<T> = Result<T, AdvisorError>;
