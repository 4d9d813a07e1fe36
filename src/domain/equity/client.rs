//! Equity sub-client — curve fetches, incremental merge, lightweight metrics.

use rust_decimal::Decimal;

use crate::client::QuantflowClient;
use crate::domain::equity::metrics::{self, LightweightMetrics};
use crate::domain::equity::{EquityCurve, EquityCurveState};
use crate::domain::trading::Trading;
use crate::error::SdkError;
use crate::shared::{Timeframe, TradingId};

/// Sub-client for equity-curve operations.
pub struct Equity<'a> {
    pub(crate) client: &'a QuantflowClient,
}

impl<'a> Equity<'a> {
    /// Fetch a slice of the equity curve.
    ///
    /// `since` is exclusive, in epoch millis; pass the state's latest held
    /// timestamp to get only the new tail.
    pub async fn fetch(
        &self,
        trading_id: &TradingId,
        timeframe: Timeframe,
        since: Option<u64>,
        limit: Option<u32>,
    ) -> Result<EquityCurve, SdkError> {
        let wire = self
            .client
            .http
            .get_equity_curve(trading_id.as_str(), timeframe, since, limit)
            .await?;
        Ok(EquityCurve {
            points: wire.points.into_iter().map(Into::into).collect(),
            baseline_price: wire.baseline_price,
            initial_funds: wire.initial_funds,
        })
    }

    /// Fetch whatever is newer than the state already holds and merge it in.
    ///
    /// Returns the number of points actually added. Re-running against an
    /// unchanged backend adds nothing — the merge deduplicates by timestamp.
    pub async fn fetch_incremental(
        &self,
        state: &mut EquityCurveState,
        trading_id: &TradingId,
        timeframe: Timeframe,
    ) -> Result<usize, SdkError> {
        let since = state.latest_timestamp(trading_id, timeframe);
        let curve = self.fetch(trading_id, timeframe, since, None).await?;
        Ok(state.merge_batch(trading_id.clone(), timeframe, curve.points))
    }

    /// The minimal fetch behind list views: exactly one latest point, one
    /// candle close, and the derived equity/ROI pair.
    ///
    /// A failed candle fetch is not an error — price resolution falls through
    /// to the curve's own data, then to `fallback_price`.
    pub async fn fetch_lightweight_metrics(
        &self,
        trading: &Trading,
        timeframe: Timeframe,
        fallback_price: Option<Decimal>,
    ) -> Result<LightweightMetrics, SdkError> {
        let curve = self.fetch(&trading.id, timeframe, None, Some(1)).await?;

        let last_close = match self
            .client
            .http
            .get_klines(&trading.stock_symbol, &trading.quote_symbol, timeframe, Some(1))
            .await
        {
            Ok(klines) => klines.last().map(|k| k.close),
            Err(e) => {
                tracing::debug!(error = %e, "Candle fetch failed; falling back to curve prices");
                None
            }
        };

        let last_point = curve.points.last();
        let effective_price = metrics::resolve_effective_price(
            last_close,
            last_point.and_then(|p| p.stock_price),
            curve.baseline_price,
            fallback_price,
        );

        let equity = match last_point {
            Some(point) => metrics::current_equity(point, effective_price),
            None => curve.initial_funds.unwrap_or(trading.initial_funds),
        };
        let initial_funds = curve.initial_funds.unwrap_or(trading.initial_funds);

        Ok(LightweightMetrics {
            equity,
            roi_percent: metrics::roi(equity, initial_funds),
            effective_price,
        })
    }
}
