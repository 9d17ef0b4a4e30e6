// =============================================================================
// Analysis Configuration
// =============================================================================
//
// Every tunable scalar of an analysis call. A config is passed explicitly into
// each call; nothing is cached between calls.
//
// All fields carry `#[serde(default)]` so that a partial JSON document (or
// `{}`) loads with the documented defaults for whatever it leaves out.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AnalysisError;
use crate::levels::ClusterStrategy;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

/// Largest accepted period or lookback. Anything above it can only ever
/// produce insufficient history, and window arithmetic stays in range.
pub const MAX_PERIOD: usize = u32::MAX as usize;

fn default_lookback() -> usize {
    10
}

fn default_tolerance_pct() -> f64 {
    0.02
}

fn default_atr_period() -> usize {
    14
}

fn default_atr_multiplier() -> f64 {
    1.0
}

fn default_min_touch_count() -> usize {
    2
}

fn default_max_levels() -> usize {
    5
}

fn default_rsi_period() -> usize {
    14
}

fn default_ema_periods() -> [usize; 4] {
    [20, 50, 100, 200]
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

// =============================================================================
// ToleranceMode
// =============================================================================

/// How the clustering tolerance is derived from the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceMode {
    /// `tolerance_pct` × current price.
    Percent,
    /// ATR(`atr_period`) × `atr_multiplier`, falling back to percent mode
    /// when the ATR cannot be formed.
    Atr,
}

impl Default for ToleranceMode {
    fn default() -> Self {
        Self::Percent
    }
}

// =============================================================================
// MacdParams
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    #[serde(default = "default_macd_fast")]
    pub fast: usize,

    #[serde(default = "default_macd_slow")]
    pub slow: usize,

    #[serde(default = "default_macd_signal")]
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: default_macd_fast(),
            slow: default_macd_slow(),
            signal: default_macd_signal(),
        }
    }
}

// =============================================================================
// AnalysisConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    // --- Support / resistance ----------------------------------------------

    /// Half-width of the extrema window.
    #[serde(default = "default_lookback")]
    pub lookback: usize,

    /// Fraction of the current price used as clustering tolerance.
    #[serde(default = "default_tolerance_pct")]
    pub tolerance_pct: f64,

    #[serde(default)]
    pub tolerance_mode: ToleranceMode,

    #[serde(default = "default_atr_period")]
    pub atr_period: usize,

    #[serde(default = "default_atr_multiplier")]
    pub atr_multiplier: f64,

    /// Minimum true touch count for a level to be reported.
    #[serde(default = "default_min_touch_count")]
    pub min_touch_count: usize,

    /// Levels reported per side.
    #[serde(default = "default_max_levels")]
    pub max_levels: usize,

    #[serde(default)]
    pub cluster_strategy: ClusterStrategy,

    // --- Indicators ----------------------------------------------------------

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Short, medium, reporting-only and long EMA periods, in that order.
    #[serde(default = "default_ema_periods")]
    pub ema_periods: [usize; 4],

    #[serde(default)]
    pub macd: MacdParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lookback: default_lookback(),
            tolerance_pct: default_tolerance_pct(),
            tolerance_mode: ToleranceMode::Percent,
            atr_period: default_atr_period(),
            atr_multiplier: default_atr_multiplier(),
            min_touch_count: default_min_touch_count(),
            max_levels: default_max_levels(),
            cluster_strategy: ClusterStrategy::FirstMatch,
            rsi_period: default_rsi_period(),
            ema_periods: default_ema_periods(),
            macd: MacdParams::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file at `path` and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analysis config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("rejected analysis config from {}", path.display()))?;

        info!(
            path = %path.display(),
            lookback = config.lookback,
            tolerance_mode = ?config.tolerance_mode,
            ema_periods = ?config.ema_periods,
            "analysis config loaded"
        );

        Ok(config)
    }

    /// Reject parameter combinations the engine cannot honour.
    pub fn validate(&self) -> std::result::Result<(), AnalysisError> {
        let invalid = |msg: String| Err(AnalysisError::InvalidConfig(msg));

        if self.lookback == 0 {
            return invalid("lookback must be at least 1".into());
        }
        let periods = [
            ("lookback", self.lookback),
            ("atrPeriod", self.atr_period),
            ("rsiPeriod", self.rsi_period),
            ("emaPeriods", self.ema_periods[3]),
            ("macd.slow", self.macd.slow),
            ("macd.signal", self.macd.signal),
        ];
        if let Some((name, value)) = periods.iter().find(|(_, v)| *v > MAX_PERIOD) {
            return invalid(format!("{name} must not exceed {MAX_PERIOD}, got {value}"));
        }
        if !self.tolerance_pct.is_finite() || self.tolerance_pct <= 0.0 {
            return invalid(format!("tolerancePct must be positive, got {}", self.tolerance_pct));
        }
        if self.tolerance_mode == ToleranceMode::Atr {
            if self.atr_period == 0 {
                return invalid("atrPeriod must be at least 1".into());
            }
            if !self.atr_multiplier.is_finite() || self.atr_multiplier <= 0.0 {
                return invalid(format!(
                    "atrMultiplier must be positive, got {}",
                    self.atr_multiplier
                ));
            }
        }
        if self.min_touch_count == 0 {
            return invalid("minTouchCount must be at least 1".into());
        }
        if self.max_levels == 0 {
            return invalid("maxLevels must be at least 1".into());
        }
        if self.rsi_period == 0 {
            return invalid("rsiPeriod must be at least 1".into());
        }
        if self.ema_periods[0] == 0 || self.ema_periods.windows(2).any(|w| w[0] >= w[1]) {
            return invalid(format!(
                "emaPeriods must be non-zero and strictly increasing, got {:?}",
                self.ema_periods
            ));
        }
        if self.macd.fast == 0 || self.macd.signal == 0 || self.macd.fast >= self.macd.slow {
            return invalid(format!(
                "macd periods must satisfy 0 < fast < slow and signal > 0, got {}/{}/{}",
                self.macd.fast, self.macd.slow, self.macd.signal
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.lookback, 10);
        assert!((cfg.tolerance_pct - 0.02).abs() < f64::EPSILON);
        assert_eq!(cfg.tolerance_mode, ToleranceMode::Percent);
        assert_eq!(cfg.min_touch_count, 2);
        assert_eq!(cfg.max_levels, 5);
        assert_eq!(cfg.cluster_strategy, ClusterStrategy::FirstMatch);
        assert_eq!(cfg.rsi_period, 14);
        assert_eq!(cfg.ema_periods, [20, 50, 100, 200]);
        assert_eq!(cfg.macd, MacdParams { fast: 12, slow: 26, signal: 9 });
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{
            "lookback": 5,
            "tolerancePct": 0.01,
            "toleranceMode": "atr",
            "clusterStrategy": "nearest",
            "macd": { "signal": 5 }
        }"#;
        let cfg: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.lookback, 5);
        assert!((cfg.tolerance_pct - 0.01).abs() < f64::EPSILON);
        assert_eq!(cfg.tolerance_mode, ToleranceMode::Atr);
        assert_eq!(cfg.cluster_strategy, ClusterStrategy::Nearest);
        assert_eq!(cfg.macd, MacdParams { fast: 12, slow: 26, signal: 5 });
        assert_eq!(cfg.min_touch_count, 2);
        assert_eq!(cfg.ema_periods, [20, 50, 100, 200]);
    }

    #[test]
    fn roundtrip_serialisation() {
        let cfg = AnalysisConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"minTouchCount\":2"));
        let cfg2: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, cfg2);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let base = AnalysisConfig::default();
        let cases = vec![
            AnalysisConfig { lookback: 0, ..base.clone() },
            AnalysisConfig { tolerance_pct: 0.0, ..base.clone() },
            AnalysisConfig { tolerance_pct: f64::NAN, ..base.clone() },
            AnalysisConfig { min_touch_count: 0, ..base.clone() },
            AnalysisConfig { max_levels: 0, ..base.clone() },
            AnalysisConfig { rsi_period: 0, ..base.clone() },
            AnalysisConfig { ema_periods: [20, 50, 50, 200], ..base.clone() },
            AnalysisConfig { ema_periods: [0, 50, 100, 200], ..base.clone() },
            AnalysisConfig { macd: MacdParams { fast: 26, slow: 26, signal: 9 }, ..base.clone() },
            AnalysisConfig { macd: MacdParams { fast: 12, slow: 26, signal: 0 }, ..base.clone() },
            AnalysisConfig { tolerance_mode: ToleranceMode::Atr, atr_period: 0, ..base.clone() },
            AnalysisConfig { tolerance_mode: ToleranceMode::Atr, atr_multiplier: -1.0, ..base.clone() },
        ];
        for (i, cfg) in cases.iter().enumerate() {
            assert!(
                matches!(cfg.validate(), Err(AnalysisError::InvalidConfig(_))),
                "case {i} should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_oversized_periods() {
        let base = AnalysisConfig::default();
        let cases = vec![
            AnalysisConfig { lookback: usize::MAX, ..base.clone() },
            AnalysisConfig { rsi_period: usize::MAX, ..base.clone() },
            AnalysisConfig { atr_period: usize::MAX, ..base.clone() },
            AnalysisConfig { ema_periods: [20, 50, 100, usize::MAX], ..base.clone() },
            AnalysisConfig { macd: MacdParams { fast: 12, slow: usize::MAX, signal: 9 }, ..base.clone() },
            AnalysisConfig { macd: MacdParams { fast: 12, slow: 26, signal: usize::MAX }, ..base.clone() },
        ];
        for (i, cfg) in cases.iter().enumerate() {
            assert!(
                matches!(cfg.validate(), Err(AnalysisError::InvalidConfig(_))),
                "case {i} should be rejected"
            );
        }

        let at_cap = AnalysisConfig { lookback: MAX_PERIOD, ..base };
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn atr_fields_ignored_in_percent_mode() {
        let cfg = AnalysisConfig {
            atr_period: 0,
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(AnalysisConfig::load("/nonexistent/analysis_config.json").is_err());
    }

    #[test]
    fn load_reads_and_validates_file() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("ta_summary_cfg_ok_{}.json", std::process::id()));
        std::fs::write(&good, r#"{ "lookback": 4 }"#).unwrap();
        let cfg = AnalysisConfig::load(&good).unwrap();
        assert_eq!(cfg.lookback, 4);
        std::fs::remove_file(&good).unwrap();

        let bad = dir.join(format!("ta_summary_cfg_bad_{}.json", std::process::id()));
        std::fs::write(&bad, r#"{ "lookback": 0 }"#).unwrap();
        assert!(AnalysisConfig::load(&bad).is_err());
        std::fs::remove_file(&bad).unwrap();
    }
}
