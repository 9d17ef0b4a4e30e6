// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
//   ATR_0   = SMA of first `period` TR values
//   ATR_t   = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// Used as the volatility-adaptive clustering tolerance.
// =============================================================================

use crate::market_data::PricePoint;

/// Compute the most recent ATR value from a slice of price points (oldest
/// first) using Wilder's smoothing method.
///
/// Returns `None` when `period` is zero, there are fewer than `period + 1`
/// points, or any intermediate value is non-finite.
pub fn calculate_atr(points: &[PricePoint], period: usize) -> Option<f64> {
    if period == 0 || points.len() <= period {
        return None;
    }

    let tr_values: Vec<f64> = points
        .windows(2)
        .map(|w| {
            let prev_close = w[0].close;
            let hl = w[1].high - w[1].low;
            let hc = (w[1].high - prev_close).abs();
            let lc = (w[1].low - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect();

    let period_f = period as f64;
    let mut atr = tr_values[..period].iter().sum::<f64>() / period_f;
    if !atr.is_finite() {
        return None;
    }

    for &tr in &tr_values[period..] {
        atr = (atr * (period_f - 1.0) + tr) / period_f;
        if !atr.is_finite() {
            return None;
        }
    }

    Some(atr)
}
