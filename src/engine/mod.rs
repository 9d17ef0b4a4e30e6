// =============================================================================
// Technical Analysis Engine
// =============================================================================
//
// Turns one price series into a `TechnicalResult`:
//
//   1. Refuse an empty series and an invalid config.
//   2. RSI / EMA set / MACD over the closes. The current RSI and MACD must
//      exist, otherwise the call fails with InsufficientHistory.
//   3. Extrema over highs/lows, then clustering into support/resistance with a
//      tolerance derived from the current price (or ATR). The same extrema
//      feed MACD divergence.
//   4. Trend classification from the EMA stack, then the overall consensus and
//      a strength score over horizons, EMA stack, MACD trend and RSI bias.
//
// The call is pure: no state survives it, so identical inputs give identical
// results and independent calls may run in parallel.

pub mod result;

use tracing::{debug, warn};

use crate::config::{AnalysisConfig, ToleranceMode};
use crate::error::{AnalysisError, Result};
use crate::indicators::{self, macd};
use crate::levels::{self, LevelParams};
use crate::market_data::PriceSeries;
use crate::trend::{self, EmaStack};

pub use result::{
    EmaReading, EmaSummary, MacdSummary, PriceSummary, RsiSummary, TechnicalResult, TrendSummary,
};

/// Analyse `series` with `config`. All-or-nothing: a fatal condition returns
/// an error and no partial result.
pub fn analyze(series: &PriceSeries, config: &AnalysisConfig) -> Result<TechnicalResult> {
    let price = PriceSummary::from_series(series).ok_or(AnalysisError::EmptySeries)?;
    config.validate()?;

    let n = series.len();
    let closes = series.closes();
    let current_price = price.current;

    // --- Indicators ----------------------------------------------------------
    let rsi_value = indicators::current_rsi(&closes, config.rsi_period).ok_or(
        AnalysisError::InsufficientHistory {
            indicator: "RSI",
            required: config.rsi_period.saturating_add(1),
            available: n,
        },
    )?;

    let macd_params = config.macd;
    let macd_series = indicators::calculate_macd(
        &closes,
        macd_params.fast,
        macd_params.slow,
        macd_params.signal,
    );
    let macd_reading = macd::latest_reading(&macd_series, n).ok_or(
        AnalysisError::InsufficientHistory {
            indicator: "MACD",
            required: macd::warm_up(macd_params.slow, macd_params.signal),
            available: n,
        },
    )?;

    let ema_values: Vec<Option<f64>> = config
        .ema_periods
        .iter()
        .map(|&period| indicators::current_ema(&closes, period))
        .collect();

    let missing: Vec<usize> = config
        .ema_periods
        .iter()
        .zip(&ema_values)
        .filter(|(_, v)| v.is_none())
        .map(|(&p, _)| p)
        .collect();
    if !missing.is_empty() {
        warn!(
            points = n,
            missing_periods = ?missing,
            "EMA readings unavailable; reported as 0 and trend degraded"
        );
    }

    // --- Support / resistance ------------------------------------------------
    let tolerance = clustering_tolerance(series, config, current_price);
    let extrema = levels::find_extrema(&series.highs(), &series.lows(), config.lookback);
    let level_set = levels::cluster_levels(
        &extrema,
        current_price,
        &LevelParams {
            tolerance,
            min_touch_count: config.min_touch_count,
            max_levels: config.max_levels,
            strategy: config.cluster_strategy,
        },
    );

    // --- Trend ---------------------------------------------------------------
    let stack = EmaStack {
        short: ema_values[0],
        medium: ema_values[1],
        long: ema_values[3],
    };
    let horizons = trend::classify_horizons(current_price, &stack);
    let aligned = trend::classify_aligned(current_price, &stack);
    let macd_trend = macd_reading.trend();
    let divergence = indicators::detect_divergence(&macd_series, &extrema.peaks, &extrema.troughs);

    let overall = trend::classify_overall(&horizons, aligned);
    let strength = trend::trend_strength(&[
        horizons.short_term,
        horizons.medium_term,
        horizons.long_term,
        aligned,
        macd_trend,
        trend::rsi_bias(rsi_value),
    ]);

    debug!(
        points = n,
        current_price,
        tolerance,
        peaks = extrema.peaks.len(),
        troughs = extrema.troughs.len(),
        support = level_set.support.len(),
        resistance = level_set.resistance.len(),
        rsi = rsi_value,
        overall = %overall,
        strength,
        divergence = %divergence,
        "technical analysis complete"
    );

    Ok(TechnicalResult {
        current_price,
        rsi: RsiSummary {
            value: rsi_value,
            signal: indicators::classify_rsi(rsi_value),
        },
        ema: EmaSummary {
            values: config
                .ema_periods
                .iter()
                .zip(&ema_values)
                .map(|(&period, value)| EmaReading {
                    period,
                    value: value.unwrap_or(0.0),
                    ready: value.is_some(),
                })
                .collect(),
            trend: aligned,
        },
        macd: MacdSummary {
            macd: macd_reading.macd,
            signal: macd_reading.signal,
            histogram: macd_reading.histogram,
            trend: macd_trend,
            divergence,
        },
        support_levels: level_set.support,
        resistance_levels: level_set.resistance,
        nearest_support: level_set.nearest_support,
        nearest_resistance: level_set.nearest_resistance,
        trend: TrendSummary::new(horizons, overall, strength),
        price,
    })
}

/// Absolute clustering tolerance for the current call.
fn clustering_tolerance(series: &PriceSeries, config: &AnalysisConfig, current_price: f64) -> f64 {
    let percent = config.tolerance_pct * current_price.abs();
    match config.tolerance_mode {
        ToleranceMode::Percent => percent,
        ToleranceMode::Atr => {
            match indicators::calculate_atr(series.points(), config.atr_period) {
                Some(atr) if atr > 0.0 => atr * config.atr_multiplier,
                _ => {
                    debug!(
                        atr_period = config.atr_period,
                        points = series.len(),
                        "ATR unavailable, using percent tolerance"
                    );
                    percent
                }
            }
        }
    }
}
