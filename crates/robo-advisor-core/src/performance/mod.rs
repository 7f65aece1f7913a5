pub mod provider;
pub mod simulation;

pub use provider::{InMemoryPriceHistory, PriceHistoryProvider, PricePoint, PriceSeries};
pub use simulation::{simulate_portfolio, SimulationInput, SimulationOutput};
