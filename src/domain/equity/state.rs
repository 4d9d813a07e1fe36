//! Equity curve state containers — app-owned, SDK-provided update logic.

use std::collections::{HashMap, HashSet};

use super::EquityPoint;
use crate::shared::{Timeframe, TradingId};

/// Merged equity curves, one per `(trading, timeframe)` key.
///
/// The app owns instances of this type. The SDK provides update methods.
/// Incremental fetches may overlap the tail of what is already held; merging
/// deduplicates by exact timestamp, so re-applying a batch is a no-op.
#[derive(Debug, Clone, Default)]
pub struct EquityCurveState {
    data: HashMap<(TradingId, Timeframe), Vec<EquityPoint>>,
}

impl EquityCurveState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a freshly fetched batch into the curve for this key.
    ///
    /// Only points with strictly new timestamps are appended, in arrival
    /// order; existing points keep their positions. Returns how many points
    /// were actually added.
    pub fn merge_batch(
        &mut self,
        trading_id: TradingId,
        timeframe: Timeframe,
        batch: Vec<EquityPoint>,
    ) -> usize {
        let entry = self.data.entry((trading_id, timeframe)).or_default();

        let mut seen: HashSet<i64> =
            entry.iter().map(|p| p.timestamp.timestamp_millis()).collect();

        let before = entry.len();
        for point in batch {
            // insert() also guards against duplicates inside the batch itself
            if seen.insert(point.timestamp.timestamp_millis()) {
                entry.push(point);
            }
        }
        entry.len() - before
    }

    /// Replace the whole curve for a key (full refetch).
    pub fn replace(
        &mut self,
        trading_id: TradingId,
        timeframe: Timeframe,
        points: Vec<EquityPoint>,
    ) {
        self.data.insert((trading_id, timeframe), points);
    }

    pub fn get(&self, trading_id: &TradingId, timeframe: Timeframe) -> Option<&Vec<EquityPoint>> {
        self.data.get(&(trading_id.clone(), timeframe))
    }

    /// Timestamp of the newest held point, in epoch millis — the `since`
    /// parameter for the next incremental fetch.
    pub fn latest_timestamp(&self, trading_id: &TradingId, timeframe: Timeframe) -> Option<u64> {
        self.get(trading_id, timeframe)?
            .iter()
            .map(|p| p.timestamp.timestamp_millis() as u64)
            .max()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}
