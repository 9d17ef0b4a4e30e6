// =============================================================================
// ta-summary — Batch Entry Point
// =============================================================================
//
// Analyses every JSON price file given on the command line and prints one
// JSON object keyed by symbol (or file stem). Each file is analysed on its
// own blocking task; one bad file is logged and does not stop the others.
// A name already taken by an earlier file is suffixed with the file path.
//
//   TA_CONFIG  optional path to an analysis config JSON file
//   RUST_LOG   tracing filter (default: info)
// =============================================================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ta_summary::{analyze, AnalysisConfig, PriceSeries, TechnicalResult};

/// Envelope produced by the upstream quote retrieval layer.
#[derive(Debug, Deserialize)]
struct QuoteFile {
    #[serde(default)]
    symbol: Option<String>,
    quotes: PriceSeries,
}

/// Read a series file: either a bare array of points or a `QuoteFile`.
fn load_series(path: &Path) -> Result<(String, PriceSeries)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read price series from {}", path.display()))?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if content.trim_start().starts_with('{') {
        let file: QuoteFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse quote file {}", path.display()))?;
        Ok((file.symbol.unwrap_or(stem), file.quotes))
    } else {
        let series: PriceSeries = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse price series {}", path.display()))?;
        Ok((stem, series))
    }
}

fn run_one(path: &Path, config: &AnalysisConfig) -> Result<(String, TechnicalResult)> {
    let (name, series) = load_series(path)?;
    let result = analyze(&series, config)
        .with_context(|| format!("analysis failed for {name} ({} points)", series.len()))?;
    info!(
        symbol = %name,
        points = series.len(),
        price = result.current_price,
        rsi = %result.rsi.signal,
        ema_trend = %result.ema.trend,
        macd_trend = %result.macd.trend,
        "series analysed"
    );
    Ok((name, result))
}

/// Key for a result named `name`, unique within `report`.
fn report_key(report: &serde_json::Map<String, serde_json::Value>, name: String, path: &Path) -> String {
    if !report.contains_key(&name) {
        return name;
    }

    let mut key = format!("{name} ({})", path.display());
    let mut n = 2;
    while report.contains_key(&key) {
        key = format!("{name} ({}) #{n}", path.display());
        n += 1;
    }
    warn!(symbol = %name, key = %key, "Duplicate series name, reporting under file path");
    key
}

fn load_config() -> AnalysisConfig {
    match std::env::var("TA_CONFIG") {
        Ok(path) => AnalysisConfig::load(&path).unwrap_or_else(|e| {
            warn!(path = %path, error = %format!("{e:#}"), "Failed to load config, using defaults");
            AnalysisConfig::default()
        }),
        Err(_) => AnalysisConfig::default(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Arc::new(load_config());

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!("usage: ta-summary FILE [FILE ...]");
    }
    info!(files = paths.len(), "Analysing price series");

    // ── 2. Fan out, one blocking task per file ───────────────────────────
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let cfg = config.clone();
            let task_path = path.clone();
            (path, tokio::task::spawn_blocking(move || run_one(&task_path, &cfg)))
        })
        .collect();

    // ── 3. Collect in input order ────────────────────────────────────────
    let total = handles.len();
    let mut failures = 0usize;
    let mut report = serde_json::Map::new();

    for (path, handle) in handles {
        match handle.await {
            Ok(Ok((name, result))) => {
                let key = report_key(&report, name, &path);
                report.insert(key, serde_json::to_value(&result)?);
            }
            Ok(Err(e)) => {
                failures += 1;
                error!(path = %path.display(), error = %format!("{e:#}"), "Series skipped");
            }
            Err(e) => {
                failures += 1;
                error!(path = %path.display(), error = %e, "Analysis task aborted");
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    if failures > 0 {
        bail!("{failures} of {total} series failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tmp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}_{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_bare_array_named_by_stem() {
        let path = write_tmp(
            "bare.json",
            r#"[{"date": "2024-01-01T00:00:00Z", "open": 1, "high": 2, "low": 0.5, "close": 1.5}]"#,
        );
        let (name, series) = load_series(&path).unwrap();
        assert!(name.ends_with("_bare"));
        assert_eq!(series.len(), 1);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn loads_quote_envelope_with_symbol() {
        let path = write_tmp(
            "envelope.json",
            r#"{"symbol": "NVDA", "quotes": [
                {"date": "2024-01-01T00:00:00Z", "open": 1, "high": 2, "low": 0.5, "close": 1.5},
                {"date": "2024-01-08T00:00:00Z", "open": 1.5, "high": 2.5, "low": 1, "close": 2}
            ]}"#,
        );
        let (name, series) = load_series(&path).unwrap();
        assert_eq!(name, "NVDA");
        assert_eq!(series.len(), 2);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn short_series_is_reported_as_error() {
        let path = write_tmp(
            "short.json",
            r#"[{"date": "2024-01-01T00:00:00Z", "open": 1, "high": 2, "low": 0.5, "close": 1.5}]"#,
        );
        assert!(run_one(&path, &AnalysisConfig::default()).is_err());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn duplicate_names_keep_every_result() {
        let mut report = serde_json::Map::new();
        let a = Path::new("a.json");
        let b = Path::new("b.json");

        let first = report_key(&report, "NVDA".into(), a);
        assert_eq!(first, "NVDA");
        report.insert(first, serde_json::json!({ "currentPrice": 103.0 }));

        let second = report_key(&report, "NVDA".into(), b);
        assert_eq!(second, "NVDA (b.json)");
        report.insert(second, serde_json::json!({ "currentPrice": 503.0 }));

        // Same file given twice.
        let third = report_key(&report, "NVDA".into(), b);
        assert_eq!(third, "NVDA (b.json) #2");
        report.insert(third, serde_json::json!({ "currentPrice": 503.0 }));

        assert_eq!(report.len(), 3);
        assert_eq!(report["NVDA"]["currentPrice"], 103.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_series(Path::new("/nonexistent/series.json")).is_err());
    }
}
