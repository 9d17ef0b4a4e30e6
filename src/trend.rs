// =============================================================================
// Multi-Horizon Trend Classification
// =============================================================================
//
// Compares the current close against the short / medium / long EMA stack.
//
// Horizon labels are binary while data is present:
//   short_term  = bullish if close > EMA_short          else bearish
//   medium_term = bullish if EMA_short > EMA_medium     else bearish
//   long_term   = bullish if close > EMA_long           else bearish
// If any of the three EMAs is missing, all three horizons are neutral.
//
// The aligned EMA trend is ternary and stricter:
//   bullish  = EMA_short > EMA_medium > EMA_long AND close > EMA_short
//   bearish  = EMA_short < EMA_medium < EMA_long AND close < EMA_short
//   neutral  = anything else, including a missing EMA
//
// The overall trend is a vote over the three horizons (+1 bullish, -1
// bearish, 0 neutral):
//   strong_bullish = all three bullish AND aligned trend bullish
//   bullish        = net vote > 0
//   strong_bearish = all three bearish AND aligned trend bearish
//   bearish        = net vote < 0
//   neutral        = net vote 0
//
// Trend strength is the share of directional signals pointing the same way:
// round(100 * |bullish - bearish| / signals), 0 for no signals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{OverallTrend, TrendLabel};

/// Current values of the three EMAs the classifier looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmaStack {
    pub short: Option<f64>,
    pub medium: Option<f64>,
    pub long: Option<f64>,
}

impl EmaStack {
    fn values(&self) -> Option<(f64, f64, f64)> {
        Some((self.short?, self.medium?, self.long?))
    }
}

/// One label per horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonTrend {
    pub short_term: TrendLabel,
    pub medium_term: TrendLabel,
    pub long_term: TrendLabel,
}

fn binary(bullish: bool) -> TrendLabel {
    if bullish {
        TrendLabel::Bullish
    } else {
        TrendLabel::Bearish
    }
}

/// Classify each horizon independently.
pub fn classify_horizons(close: f64, stack: &EmaStack) -> HorizonTrend {
    let Some((short, medium, long)) = stack.values() else {
        debug!(close, "trend: EMA stack incomplete, horizons degraded to neutral");
        return HorizonTrend::default();
    };

    HorizonTrend {
        short_term: binary(close > short),
        medium_term: binary(short > medium),
        long_term: binary(close > long),
    }
}

/// Fully aligned EMA trend.
pub fn classify_aligned(close: f64, stack: &EmaStack) -> TrendLabel {
    let Some((short, medium, long)) = stack.values() else {
        return TrendLabel::Neutral;
    };

    if short > medium && medium > long && close > short {
        TrendLabel::Bullish
    } else if short < medium && medium < long && close < short {
        TrendLabel::Bearish
    } else {
        TrendLabel::Neutral
    }
}

fn vote(label: TrendLabel) -> i32 {
    match label {
        TrendLabel::Bullish => 1,
        TrendLabel::Bearish => -1,
        TrendLabel::Neutral => 0,
    }
}

/// Consensus of the horizons, upgraded to strong when the EMA stack agrees.
pub fn classify_overall(horizons: &HorizonTrend, aligned: TrendLabel) -> OverallTrend {
    let net: i32 = [horizons.short_term, horizons.medium_term, horizons.long_term]
        .into_iter()
        .map(vote)
        .sum();

    match (net, aligned) {
        (3, TrendLabel::Bullish) => OverallTrend::StrongBullish,
        (-3, TrendLabel::Bearish) => OverallTrend::StrongBearish,
        (n, _) if n > 0 => OverallTrend::Bullish,
        (n, _) if n < 0 => OverallTrend::Bearish,
        _ => OverallTrend::Neutral,
    }
}

/// Directional lean of an RSI reading around its midpoint.
pub fn rsi_bias(rsi: f64) -> TrendLabel {
    if rsi > 50.0 {
        TrendLabel::Bullish
    } else if rsi < 50.0 {
        TrendLabel::Bearish
    } else {
        TrendLabel::Neutral
    }
}

/// Agreement score in `0..=100` over `signals`.
pub fn trend_strength(signals: &[TrendLabel]) -> u32 {
    if signals.is_empty() {
        return 0;
    }
    let net: i32 = signals.iter().copied().map(vote).sum();
    (100.0 * f64::from(net.unsigned_abs()) / signals.len() as f64).round() as u32
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn stack(short: f64, medium: f64, long: f64) -> EmaStack {
        EmaStack {
            short: Some(short),
            medium: Some(medium),
            long: Some(long),
        }
    }

    #[test]
    fn horizons_bullish_stack() {
        let t = classify_horizons(110.0, &stack(105.0, 100.0, 90.0));
        assert_eq!(t.short_term, TrendLabel::Bullish);
        assert_eq!(t.medium_term, TrendLabel::Bullish);
        assert_eq!(t.long_term, TrendLabel::Bullish);
    }

    #[test]
    fn horizons_are_independent() {
        // Below the short EMA, short above medium, above the long EMA.
        let t = classify_horizons(100.0, &stack(101.0, 99.0, 80.0));
        assert_eq!(t.short_term, TrendLabel::Bearish);
        assert_eq!(t.medium_term, TrendLabel::Bullish);
        assert_eq!(t.long_term, TrendLabel::Bullish);
    }

    #[test]
    fn horizon_equality_falls_to_bearish() {
        let t = classify_horizons(100.0, &stack(100.0, 100.0, 100.0));
        assert_eq!(t.short_term, TrendLabel::Bearish);
        assert_eq!(t.medium_term, TrendLabel::Bearish);
        assert_eq!(t.long_term, TrendLabel::Bearish);
    }

    #[test]
    fn missing_ema_degrades_every_horizon() {
        let mut s = stack(105.0, 100.0, 90.0);
        s.long = None;
        let t = classify_horizons(110.0, &s);
        assert_eq!(t, HorizonTrend::default());
        assert_eq!(t.short_term, TrendLabel::Neutral);
        assert_eq!(t.medium_term, TrendLabel::Neutral);
        assert_eq!(t.long_term, TrendLabel::Neutral);
    }

    #[test]
    fn aligned_requires_full_ordering() {
        assert_eq!(classify_aligned(110.0, &stack(105.0, 100.0, 90.0)), TrendLabel::Bullish);
        assert_eq!(classify_aligned(80.0, &stack(85.0, 90.0, 100.0)), TrendLabel::Bearish);
        // Ordered stack but price on the wrong side of the short EMA.
        assert_eq!(classify_aligned(104.0, &stack(105.0, 100.0, 90.0)), TrendLabel::Neutral);
        assert_eq!(classify_aligned(86.0, &stack(85.0, 90.0, 100.0)), TrendLabel::Neutral);
        // Mixed ordering.
        assert_eq!(classify_aligned(110.0, &stack(105.0, 90.0, 100.0)), TrendLabel::Neutral);
    }

    #[test]
    fn aligned_flat_is_neutral() {
        assert_eq!(classify_aligned(100.0, &stack(100.0, 100.0, 100.0)), TrendLabel::Neutral);
    }

    #[test]
    fn aligned_missing_ema_is_neutral() {
        let s = EmaStack {
            short: Some(105.0),
            medium: Some(100.0),
            long: None,
        };
        assert_eq!(classify_aligned(110.0, &s), TrendLabel::Neutral);
    }

    fn horizons(short: TrendLabel, medium: TrendLabel, long: TrendLabel) -> HorizonTrend {
        HorizonTrend {
            short_term: short,
            medium_term: medium,
            long_term: long,
        }
    }

    #[test]
    fn overall_strong_needs_unanimous_horizons_and_aligned_stack() {
        use TrendLabel::*;
        assert_eq!(
            classify_overall(&horizons(Bullish, Bullish, Bullish), Bullish),
            OverallTrend::StrongBullish
        );
        assert_eq!(
            classify_overall(&horizons(Bullish, Bullish, Bullish), Neutral),
            OverallTrend::Bullish
        );
        assert_eq!(
            classify_overall(&horizons(Bearish, Bearish, Bearish), Bearish),
            OverallTrend::StrongBearish
        );
        assert_eq!(
            classify_overall(&horizons(Bearish, Bearish, Bearish), Neutral),
            OverallTrend::Bearish
        );
    }

    #[test]
    fn overall_follows_majority() {
        use TrendLabel::*;
        assert_eq!(
            classify_overall(&horizons(Bearish, Bullish, Bullish), Neutral),
            OverallTrend::Bullish
        );
        assert_eq!(
            classify_overall(&horizons(Bullish, Bearish, Bearish), Neutral),
            OverallTrend::Bearish
        );
        assert_eq!(classify_overall(&HorizonTrend::default(), Neutral), OverallTrend::Neutral);
    }

    #[test]
    fn rsi_bias_splits_at_fifty() {
        assert_eq!(rsi_bias(50.0), TrendLabel::Neutral);
        assert_eq!(rsi_bias(50.1), TrendLabel::Bullish);
        assert_eq!(rsi_bias(12.0), TrendLabel::Bearish);
    }

    #[test]
    fn strength_measures_agreement() {
        use TrendLabel::*;
        assert_eq!(trend_strength(&[]), 0);
        assert_eq!(trend_strength(&[Bullish; 6]), 100);
        assert_eq!(trend_strength(&[Bearish; 6]), 100);
        assert_eq!(trend_strength(&[Bullish, Bearish, Bullish, Bearish]), 0);
        assert_eq!(trend_strength(&[Neutral; 6]), 0);
        // net 3 of 6
        assert_eq!(trend_strength(&[Bearish, Bearish, Bearish, Neutral, Neutral, Neutral]), 50);
        // net 5 of 6 and net 4 of 6
        assert_eq!(trend_strength(&[Bullish, Bullish, Bullish, Bullish, Bullish, Neutral]), 83);
        assert_eq!(trend_strength(&[Bullish, Bullish, Bullish, Bullish, Neutral, Neutral]), 67);
    }

    #[test]
    fn horizon_trend_serialises_camel_case() {
        let t = classify_horizons(110.0, &stack(105.0, 100.0, 90.0));
        let json = serde_json::to_value(t).unwrap();
        assert_eq!(json["shortTerm"], "bullish");
        assert_eq!(json["mediumTerm"], "bullish");
        assert_eq!(json["longTerm"], "bullish");
    }
}
