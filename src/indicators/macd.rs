// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line  = EMA(fast) - EMA(slow)
//   Signal     = EMA(signal) of the MACD line
//   Histogram  = MACD line - Signal
//
// Both EMAs are SMA-seeded (see `ema.rs`), so the MACD line starts at close
// index `slow - 1` and the signal line `signal - 1` points later. Points inside
// the signal warm-up carry `None` for signal and histogram.
//
// Divergence compares the last two swings on each side of price with the MACD
// line at the same closes:
//   bearish = later peak higher in price, lower in MACD
//   bullish = later trough lower in price, higher in MACD
// When both fire, the one confirmed by the more recent swing wins.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::{self, calculate_ema};
use crate::levels::ExtremaPoint;
use crate::types::{MacdDivergence, TrendLabel};

/// One MACD reading, tagged with the close index it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub index: usize,
    pub macd: f64,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

/// A fully-formed MACD reading (all three components present).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the MACD series for `closes`.
///
/// Returns an empty `Vec` when any period is zero, `fast >= slow`, or there
/// are fewer than `slow` closes.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<MacdPoint> {
    if fast == 0 || signal == 0 || fast >= slow || closes.len() < slow {
        return Vec::new();
    }

    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    // fast_ema[k] belongs to close index fast-1+k, slow_ema[k] to slow-1+k.
    let offset = slow - fast;
    let line: Vec<f64> = slow_ema
        .iter()
        .zip(fast_ema.iter().skip(offset))
        .map(|(s, f)| f - s)
        .take_while(|v| v.is_finite())
        .collect();

    let signal_line = calculate_ema(&line, signal);
    let first = first_index(slow);

    line.iter()
        .enumerate()
        .map(|(k, &macd)| {
            let signal_value = k
                .checked_sub(signal - 1)
                .and_then(|j| signal_line.get(j).copied());
            MacdPoint {
                index: first + k,
                macd,
                signal: signal_value,
                histogram: signal_value.map(|s| macd - s),
            }
        })
        .collect()
}

/// Close index of the first MACD line value.
pub fn first_index(slow: usize) -> usize {
    ema::first_index(slow)
}

/// MACD reading for the last close, or `None` when the series does not reach
/// it with all three components.
pub fn current_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdReading> {
    latest_reading(&calculate_macd(closes, fast, slow, signal), closes.len())
}

/// Complete reading at close index `len - 1` of an already computed series.
pub fn latest_reading(series: &[MacdPoint], len: usize) -> Option<MacdReading> {
    let last = *series.last()?;
    if last.index + 1 != len {
        return None;
    }
    Some(MacdReading {
        macd: last.macd,
        signal: last.signal?,
        histogram: last.histogram?,
    })
}

/// Number of closes needed before the first complete MACD reading.
pub fn warm_up(slow: usize, signal: usize) -> usize {
    slow.saturating_add(signal.saturating_sub(1))
}

/// Price/MACD divergence over the most recent swings.
///
/// Swings outside the MACD series (inside the slow EMA warm-up) never count.
pub fn detect_divergence(
    series: &[MacdPoint],
    peaks: &[ExtremaPoint],
    troughs: &[ExtremaPoint],
) -> MacdDivergence {
    let bearish = last_pair(peaks).and_then(|(a, b)| {
        let (ma, mb) = (line_at(series, a.index)?, line_at(series, b.index)?);
        (b.price > a.price && mb < ma).then_some(b.index)
    });
    let bullish = last_pair(troughs).and_then(|(a, b)| {
        let (ma, mb) = (line_at(series, a.index)?, line_at(series, b.index)?);
        (b.price < a.price && mb > ma).then_some(b.index)
    });

    match (bullish, bearish) {
        (Some(bull), Some(bear)) if bull > bear => MacdDivergence::BullishDivergence,
        (Some(bull), Some(bear)) if bear > bull => MacdDivergence::BearishDivergence,
        (Some(_), None) => MacdDivergence::BullishDivergence,
        (None, Some(_)) => MacdDivergence::BearishDivergence,
        _ => MacdDivergence::None,
    }
}

fn last_pair(points: &[ExtremaPoint]) -> Option<(&ExtremaPoint, &ExtremaPoint)> {
    match points {
        [.., a, b] => Some((a, b)),
        _ => None,
    }
}

/// MACD line at close `index`. The series is contiguous from its first index.
fn line_at(series: &[MacdPoint], index: usize) -> Option<f64> {
    let first = series.first()?.index;
    series.get(index.checked_sub(first)?).map(|p| p.macd)
}

impl MacdReading {
    /// Bullish only when the line is above signal AND the histogram is
    /// positive; bearish only on the full mirror; neutral otherwise.
    pub fn trend(&self) -> TrendLabel {
        if self.macd > self.signal && self.histogram > 0.0 {
            TrendLabel::Bullish
        } else if self.macd < self.signal && self.histogram < 0.0 {
            TrendLabel::Bearish
        } else {
            TrendLabel::Neutral
        }
    }
}
