mod ledger;
mod market;
mod results;
mod transactions;

pub use ledger::{
    AggregatedPeriod, CashFlowProjection, DailyEntry, Horizon, Period, ProjectionRequest,
};
pub use market::{
    AssetClass, DEFAULT_CORRELATION, DEFAULT_MEAN_RETURNS, DEFAULT_VOLATILITY, MarketOverride,
    default_correlation,
};
pub use results::{PortfolioPathMatrix, SimulationProgress, SimulationSummary};
pub use transactions::{Frequency, Transaction, TransactionKind};
