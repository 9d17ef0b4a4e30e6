// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = EMA_{t-1} + (close_t - EMA_{t-1}) * multiplier
//
// The very first EMA value is seeded with the SMA of the first `period` closes,
// so output element `k` belongs to close index `period - 1 + k`.
// =============================================================================

/// Compute the EMA series for the given `closes` slice and look-back `period`.
///
/// Returns an empty `Vec` when the input is too short or the period is zero.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() < period` => empty vec
/// - A non-finite intermediate value truncates the series at that point.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    // Seed: SMA of the first `period` values.
    let sma: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(sma);

    let mut prev_ema = sma;
    for &close in &closes[period..] {
        let ema = prev_ema + (close - prev_ema) * multiplier;
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}

/// Close index of the first EMA value for `period`.
pub fn first_index(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Most recent EMA value, or `None` while the EMA is still warming up.
///
/// A series truncated by a non-finite value does not reach the last close and
/// therefore has no current value either.
pub fn current_ema(closes: &[f64], period: usize) -> Option<f64> {
    let series = calculate_ema(closes, period);
    let last = *series.last()?;
    (first_index(period) + series.len() == closes.len()).then_some(last)
}
