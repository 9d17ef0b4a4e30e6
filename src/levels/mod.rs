// =============================================================================
// Support / Resistance Module
// =============================================================================
//
// Two stages over the high/low projections of a price series:
// - `extrema`: local peaks and troughs within a symmetric lookback window
// - `cluster`: tolerance-based grouping of those extrema into levels

pub mod cluster;
pub mod extrema;

pub use cluster::{cluster_levels, ClusterStrategy, Level, LevelParams, LevelSet, MAX_STRENGTH};
pub use extrema::{find_extrema, Extrema, ExtremaPoint, ExtremumKind};
