// =============================================================================
// ta-summary — Technical analysis summaries from OHLC history
// =============================================================================
//
// A deterministic, stateless transform from one price series to a technical
// summary: RSI, an EMA set, MACD, clustered support/resistance levels and a
// three-horizon trend. Callers own data retrieval and presentation.
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod levels;
pub mod market_data;
pub mod trend;
pub mod types;

pub use config::{AnalysisConfig, MacdParams, ToleranceMode};
pub use engine::{analyze, TechnicalResult, TrendSummary};
pub use error::{AnalysisError, Result};
pub use levels::{ClusterStrategy, Level};
pub use market_data::{PricePoint, PriceSeries};
pub use trend::HorizonTrend;
pub use types::{LevelKind, MacdDivergence, OverallTrend, RsiSignal, TrendLabel};
