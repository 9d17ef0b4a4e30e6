use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One sampling interval of market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    fn check(&self, index: usize) -> Result<()> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AnalysisError::InvalidPoint {
                    index,
                    reason: format!("{name} is not a finite number"),
                });
            }
        }
        if self.high < self.low {
            return Err(AnalysisError::InvalidPoint {
                index,
                reason: format!("high {} is below low {}", self.high, self.low),
            });
        }
        if let Some(volume) = self.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(AnalysisError::InvalidPoint {
                    index,
                    reason: format!("volume {volume} is not a finite non-negative number"),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PriceSeries -- validated, read-only OHLC history for one instrument
// ---------------------------------------------------------------------------

/// Ordered OHLC history for one instrument and one interval.
///
/// Built only through [`PriceSeries::new`] (serde goes through the same path),
/// so every instance has finite prices, `high >= low` and strictly increasing
/// timestamps. Gaps between timestamps are allowed. An empty series is valid
/// here; the engine is the one that refuses it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        for (index, point) in points.iter().enumerate() {
            point.check(index)?;
            if index > 0 && point.timestamp <= points[index - 1].timestamp {
                return Err(AnalysisError::InvalidPoint {
                    index,
                    reason: format!(
                        "timestamp {} does not follow {}",
                        point.timestamp,
                        points[index - 1].timestamp
                    ),
                });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point, if any.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Close prices (oldest-first order).
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// High prices (oldest-first order).
    pub fn highs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.high).collect()
    }

    /// Low prices (oldest-first order).
    pub fn lows(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.low).collect()
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = AnalysisError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}
