use serde::{Deserialize, Serialize};

use crate::levels::Level;
use crate::market_data::PriceSeries;
use crate::trend::HorizonTrend;
use crate::types::{MacdDivergence, OverallTrend, RsiSignal, TrendLabel};

/// Complete technical summary of one price series.
///
/// Every numeric field is finite or an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalResult {
    pub current_price: f64,
    pub rsi: RsiSummary,
    pub ema: EmaSummary,
    pub macd: MacdSummary,
    pub support_levels: Vec<Level>,
    pub resistance_levels: Vec<Level>,
    pub nearest_support: Option<f64>,
    pub nearest_resistance: Option<f64>,
    pub trend: TrendSummary,
    pub price: PriceSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiSummary {
    pub value: f64,
    pub signal: RsiSignal,
}

/// Current value of one configured EMA.
///
/// `value` is `0.0` while the EMA is still warming up; `ready` tells the two
/// cases apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaReading {
    pub period: usize,
    pub value: f64,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaSummary {
    pub values: Vec<EmaReading>,
    /// Fully aligned stack trend.
    pub trend: TrendLabel,
}

impl EmaSummary {
    /// Reading for `period`, if that period was configured.
    pub fn get(&self, period: usize) -> Option<&EmaReading> {
        self.values.iter().find(|r| r.period == period)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdSummary {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub trend: TrendLabel,
    pub divergence: MacdDivergence,
}

/// Per-horizon labels plus their consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub short_term: TrendLabel,
    pub medium_term: TrendLabel,
    pub long_term: TrendLabel,
    pub overall_trend: OverallTrend,
    /// 0 when the indicators cancel out, 100 when they all agree.
    pub strength: u32,
}

impl TrendSummary {
    pub fn new(horizons: HorizonTrend, overall_trend: OverallTrend, strength: u32) -> Self {
        Self {
            short_term: horizons.short_term,
            medium_term: horizons.medium_term,
            long_term: horizons.long_term,
            overall_trend,
            strength,
        }
    }
}

/// Snapshot of the latest price relative to the rest of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    pub current: f64,
    /// Last close minus the previous close.
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub period_high: f64,
    pub period_low: f64,
    pub volume: Option<f64>,
    pub average_volume: Option<f64>,
}

impl PriceSummary {
    /// Summarise `series`; `None` only for an empty series.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let points = series.points();
        let last = points.last()?;
        let previous = points.len().checked_sub(2).map(|i| points[i].close);

        let change = previous.map(|prev| last.close - prev);
        let change_percent = previous
            .filter(|prev| *prev != 0.0)
            .map(|prev| (last.close - prev) / prev * 100.0)
            .filter(|pct| pct.is_finite());

        let period_high = points.iter().map(|p| p.high).fold(f64::MIN, f64::max);
        let period_low = points.iter().map(|p| p.low).fold(f64::MAX, f64::min);

        let volumes: Vec<f64> = points.iter().filter_map(|p| p.volume).collect();
        let average_volume = if volumes.is_empty() {
            None
        } else {
            Some(volumes.iter().sum::<f64>() / volumes.len() as f64).filter(|v| v.is_finite())
        };

        Some(Self {
            current: last.close,
            change,
            change_percent,
            period_high,
            period_low,
            volume: last.volume,
            average_volume,
        })
    }
}
