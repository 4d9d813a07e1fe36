//! Derived performance metrics — pure functions over merged curves.
//!
//! Nothing here touches the network; every function is deterministic in its
//! input, so the chart layer can recompute on every merge without surprises.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::EquityPoint;
use crate::shared::{fmt, Timeframe};

/// Return on investment as a percentage.
///
/// Zero when `initial_funds` is zero or negative — a trading that never had
/// funds has no meaningful return, and division by zero must not leak into
/// chart labels.
pub fn roi(equity: Decimal, initial_funds: Decimal) -> f64 {
    if initial_funds <= Decimal::ZERO {
        return 0.0;
    }
    ((equity - initial_funds) / initial_funds * Decimal::from(100))
        .to_f64()
        .unwrap_or(0.0)
}

/// Per-period fractional returns between consecutive points.
fn period_returns(points: &[EquityPoint]) -> Vec<f64> {
    points
        .windows(2)
        .filter_map(|w| {
            let prev = w[0].equity.to_f64()?;
            let next = w[1].equity.to_f64()?;
            if prev == 0.0 {
                None
            } else {
                Some((next - prev) / prev)
            }
        })
        .collect()
}

/// Share of periods with positive return, as a percentage. Zero with fewer
/// than two points.
pub fn win_rate(points: &[EquityPoint]) -> f64 {
    let returns = period_returns(points);
    if returns.is_empty() {
        return 0.0;
    }
    let wins = returns.iter().filter(|r| **r > 0.0).count();
    wins as f64 / returns.len() as f64 * 100.0
}

/// Maximum peak-to-trough decline, as a positive percentage.
pub fn max_drawdown(points: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0_f64;
    for point in points {
        let Some(equity) = point.equity.to_f64() else {
            continue;
        };
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            let drawdown = (peak - equity) / peak * 100.0;
            if drawdown > worst {
                worst = drawdown;
            }
        }
    }
    worst
}

/// Annualized Sharpe-like ratio over per-period returns, zero risk-free rate.
///
/// Zero when there are fewer than two returns or the returns have no
/// variance.
pub fn sharpe_ratio(points: &[EquityPoint], timeframe: Timeframe) -> f64 {
    let returns = period_returns(points);
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return 0.0;
    }
    mean / std_dev * timeframe.periods_per_year().sqrt()
}

/// Resolve the stock price to value holdings with, in strict priority order:
/// last candle close → last curve point's own price → curve baseline price →
/// caller-supplied fallback → none.
pub fn resolve_effective_price(
    last_close: Option<Decimal>,
    last_point_price: Option<Decimal>,
    baseline_price: Option<Decimal>,
    fallback: Option<Decimal>,
) -> Option<Decimal> {
    last_close
        .or(last_point_price)
        .or(baseline_price)
        .or(fallback)
}

/// Current equity for one point: quote balance plus holdings at the effective
/// price, falling back to the backend's raw equity when no price resolves.
pub fn current_equity(point: &EquityPoint, effective_price: Option<Decimal>) -> Decimal {
    match effective_price {
        Some(price) => point.quote_balance + point.stock_balance * price,
        None => point.equity,
    }
}

/// The cheap per-trading numbers list views render.
#[derive(Debug, Clone, PartialEq)]
pub struct LightweightMetrics {
    pub equity: Decimal,
    pub roi_percent: f64,
    pub effective_price: Option<Decimal>,
}

impl std::fmt::Display for LightweightMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            fmt::display(&self.equity.to_f64().unwrap_or(0.0)),
            fmt::display_percent(self.roi_percent)
        )
    }
}

/// Full chart-header metrics over a merged curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveMetrics {
    pub roi_percent: f64,
    pub win_rate_percent: f64,
    pub max_drawdown_percent: f64,
    pub sharpe_ratio: f64,
}

impl std::fmt::Display for CurveMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "roi {} / win {} / drawdown {} / sharpe {}",
            fmt::display_percent(self.roi_percent),
            fmt::display_percent(self.win_rate_percent),
            fmt::display_percent(self.max_drawdown_percent),
            fmt::display_with_decimals(&self.sharpe_ratio, 2)
        )
    }
}

/// Compute all chart metrics in one pass over the merged curve.
pub fn curve_metrics(
    points: &[EquityPoint],
    initial_funds: Decimal,
    timeframe: Timeframe,
) -> CurveMetrics {
    let final_equity = points.last().map(|p| p.equity).unwrap_or(initial_funds);
    CurveMetrics {
        roi_percent: roi(final_equity, initial_funds),
        win_rate_percent: win_rate(points),
        max_drawdown_percent: max_drawdown(points),
        sharpe_ratio: sharpe_ratio(points, timeframe),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn point(millis: i64, equity: f64) -> EquityPoint {
        EquityPoint {
            timestamp: DateTime::from_timestamp_millis(millis).unwrap(),
            equity: Decimal::try_from(equity).unwrap(),
            quote_balance: Decimal::ZERO,
            stock_balance: Decimal::ZERO,
            stock_price: None,
            benchmark_return: None,
        }
    }

    #[test]
    fn test_roi_formula() {
        assert_eq!(roi(Decimal::from(1100), Decimal::from(1000)), 10.0);
        assert_eq!(roi(Decimal::from(900), Decimal::from(1000)), -10.0);
        assert_eq!(roi(Decimal::from(1000), Decimal::from(1000)), 0.0);
    }

    #[test]
    fn test_roi_zero_initial_funds_is_zero() {
        assert_eq!(roi(Decimal::from(500), Decimal::ZERO), 0.0);
        assert_eq!(roi(Decimal::from(500), Decimal::from(-10)), 0.0);
    }

    #[test]
    fn test_win_rate() {
        // up, down, up → 2 wins out of 3 periods
        let points = vec![
            point(0, 100.0),
            point(1, 110.0),
            point(2, 105.0),
            point(3, 120.0),
        ];
        let rate = win_rate(&points);
        assert!((rate - 66.666).abs() < 0.01);
        assert_eq!(win_rate(&points[..1]), 0.0);
        assert_eq!(win_rate(&[]), 0.0);
    }

    #[test]
    fn test_max_drawdown() {
        let points = vec![
            point(0, 100.0),
            point(1, 120.0),
            point(2, 90.0), // 25% off the 120 peak
            point(3, 130.0),
            point(4, 117.0), // 10% off the 130 peak
        ];
        assert!((max_drawdown(&points) - 25.0).abs() < 1e-9);
        assert_eq!(max_drawdown(&[point(0, 100.0)]), 0.0);
    }

    #[test]
    fn test_monotonic_curve_has_no_drawdown() {
        let points = vec![point(0, 100.0), point(1, 105.0), point(2, 110.0)];
        assert_eq!(max_drawdown(&points), 0.0);
    }

    #[test]
    fn test_sharpe_zero_variance_is_zero() {
        // identical returns → std dev 0
        let points = vec![point(0, 100.0), point(1, 100.0), point(2, 100.0)];
        assert_eq!(sharpe_ratio(&points, Timeframe::Day1), 0.0);
        assert_eq!(sharpe_ratio(&points[..2], Timeframe::Day1), 0.0);
    }

    #[test]
    fn test_sharpe_positive_for_rising_curve() {
        let points = vec![
            point(0, 100.0),
            point(1, 102.0),
            point(2, 103.0),
            point(3, 106.0),
        ];
        assert!(sharpe_ratio(&points, Timeframe::Day1) > 0.0);
    }

    #[test]
    fn test_effective_price_priority_order() {
        let close = Some(Decimal::from(64000));
        let last = Some(Decimal::from(63500));
        let base = Some(Decimal::from(60000));
        let fall = Some(Decimal::from(1));

        assert_eq!(resolve_effective_price(close, last, base, fall), close);
        assert_eq!(resolve_effective_price(None, last, base, fall), last);
        assert_eq!(resolve_effective_price(None, None, base, fall), base);
        assert_eq!(resolve_effective_price(None, None, None, fall), fall);
        assert_eq!(resolve_effective_price(None, None, None, None), None);
    }

    #[test]
    fn test_current_equity_values_holdings() {
        let p = EquityPoint {
            timestamp: DateTime::from_timestamp_millis(0).unwrap(),
            equity: Decimal::from(999),
            quote_balance: Decimal::from(500),
            stock_balance: Decimal::new(1, 2), // 0.01
            stock_price: None,
            benchmark_return: None,
        };
        assert_eq!(
            current_equity(&p, Some(Decimal::from(60000))),
            Decimal::from(1100)
        );
        // no resolvable price → raw equity field
        assert_eq!(current_equity(&p, None), Decimal::from(999));
    }

    #[test]
    fn test_curve_metrics_display() {
        let m = CurveMetrics {
            roi_percent: 12.5,
            win_rate_percent: 60.0,
            max_drawdown_percent: 8.0,
            sharpe_ratio: 1.234,
        };
        assert_eq!(
            m.to_string(),
            "roi +12.5% / win +60% / drawdown +8% / sharpe 1.23"
        );
    }

    #[test]
    fn test_curve_metrics_empty_curve() {
        let m = curve_metrics(&[], Decimal::from(1000), Timeframe::Hour1);
        assert_eq!(m.roi_percent, 0.0);
        assert_eq!(m.max_drawdown_percent, 0.0);
        assert_eq!(m.sharpe_ratio, 0.0);
    }
}
