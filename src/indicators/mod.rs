// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator implementations over the close projection
// of a price series. Series functions return an empty `Vec` and "current"
// helpers return `None` on insufficient data, so a value is never reported
// before its warm-up window has been filled.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::calculate_atr;
pub use ema::{calculate_ema, current_ema};
pub use macd::{calculate_macd, current_macd, detect_divergence, MacdPoint, MacdReading};
pub use rsi::{calculate_rsi, classify_rsi, current_rsi};
