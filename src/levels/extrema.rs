// =============================================================================
// Extrema Detector
// =============================================================================
//
// Index `i` is a peak when `highs[i]` is strictly greater than every high in
// the symmetric window `[i - L, i + L]`, and a trough when `lows[i]` is
// strictly lower than every low in that window. Any equal neighbour
// disqualifies `i`, so flat tops and bottoms produce nothing.
//
// Only `i` in `[L, n - L)` is examined; with `n < 2L + 1` the result is empty.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumKind {
    Peak,
    Trough,
}

/// A single local high or low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremaPoint {
    pub index: usize,
    pub price: f64,
    pub kind: ExtremumKind,
}

/// Peaks and troughs, each in ascending index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extrema {
    pub peaks: Vec<ExtremaPoint>,
    pub troughs: Vec<ExtremaPoint>,
}

impl Extrema {
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty() && self.troughs.is_empty()
    }
}

/// Scan aligned `highs`/`lows` for local extrema with half-window `lookback`.
///
/// Slices of unequal length are scanned over their common prefix.
pub fn find_extrema(highs: &[f64], lows: &[f64], lookback: usize) -> Extrema {
    let n = highs.len().min(lows.len());
    let mut extrema = Extrema::default();
    if lookback == 0 || n <= lookback.saturating_mul(2) {
        return extrema;
    }

    for i in lookback..n - lookback {
        let window = i - lookback..=i + lookback;

        if window.clone().filter(|&j| j != i).all(|j| highs[i] > highs[j]) {
            extrema.peaks.push(ExtremaPoint {
                index: i,
                price: highs[i],
                kind: ExtremumKind::Peak,
            });
        }
        if window.filter(|&j| j != i).all(|j| lows[i] < lows[j]) {
            extrema.troughs.push(ExtremaPoint {
                index: i,
                price: lows[i],
                kind: ExtremumKind::Trough,
            });
        }
    }

    extrema
}
