pub mod analysis;
pub mod performance;
pub mod portfolio;
pub mod profile;
