//! Performance metrics derived from the trade ledger and equity curve.
//!
//! Pure functions of their inputs: recomputing from the same ledger and
//! curve always yields the same summary.

use crate::domain::equity::EquityPoint;
use crate::domain::ledger::Trade;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const CALENDAR_DAYS_PER_YEAR: f64 = 365.25;

/// Fixed key set returned for a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub total_trades: usize,
    pub win_rate_pct: f64,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub avg_win: f64,
    /// Mean losing profit, a negative number (zero when there are no losers).
    pub avg_loss: f64,
    /// |avg_win / avg_loss|; +infinity when there are no losing trades.
    pub profit_factor: f64,
}

impl PerformanceSummary {
    /// `None` until at least one trade has closed and the curve is non-empty,
    /// so callers never see a partial summary.
    pub fn compute(
        initial_capital: f64,
        trades: &[Trade],
        equity_curve: &[EquityPoint],
    ) -> Option<Self> {
        if trades.is_empty() || equity_curve.is_empty() {
            return None;
        }

        let first = equity_curve.first()?;
        let last = equity_curve.last()?;
        let final_capital = last.equity;

        let total_return_pct = (final_capital / initial_capital - 1.0) * 100.0;

        let elapsed_days = (last.date - first.date).num_days();
        let annualized_return_pct = if elapsed_days > 0 {
            let growth = final_capital / initial_capital;
            (growth.powf(CALENDAR_DAYS_PER_YEAR / elapsed_days as f64) - 1.0) * 100.0
        } else {
            0.0
        };

        let max_drawdown_pct = compute_max_drawdown(equity_curve);
        let sharpe_ratio = compute_sharpe(equity_curve);

        let mut winning_trades = 0usize;
        let mut losing_trades = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;

        for trade in trades {
            if trade.profit > 0.0 {
                winning_trades += 1;
                total_wins += trade.profit;
            } else if trade.profit < 0.0 {
                losing_trades += 1;
                total_losses += trade.profit;
            }
        }

        let total_trades = trades.len();
        let win_rate_pct = winning_trades as f64 / total_trades as f64 * 100.0;

        let avg_win = if winning_trades > 0 {
            total_wins / winning_trades as f64
        } else {
            0.0
        };
        let avg_loss = if losing_trades > 0 {
            total_losses / losing_trades as f64
        } else {
            0.0
        };
        let profit_factor = if avg_loss != 0.0 {
            (avg_win / avg_loss).abs()
        } else {
            f64::INFINITY
        };

        Some(PerformanceSummary {
            initial_capital,
            final_capital,
            total_return_pct,
            annualized_return_pct,
            max_drawdown_pct,
            sharpe_ratio,
            total_trades,
            win_rate_pct,
            winning_trades,
            losing_trades,
            avg_win,
            avg_loss,
            profit_factor,
        })
    }

    /// Fixed-order key/value view, used for the console report.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("initial_capital", format!("{:.2}", self.initial_capital)),
            ("final_capital", format!("{:.2}", self.final_capital)),
            ("total_return_pct", format!("{:.2}", self.total_return_pct)),
            (
                "annualized_return_pct",
                format!("{:.2}", self.annualized_return_pct),
            ),
            ("max_drawdown_pct", format!("{:.2}", self.max_drawdown_pct)),
            ("sharpe_ratio", format!("{:.2}", self.sharpe_ratio)),
            ("total_trades", self.total_trades.to_string()),
            ("win_rate_pct", format!("{:.2}", self.win_rate_pct)),
            ("winning_trades", self.winning_trades.to_string()),
            ("losing_trades", self.losing_trades.to_string()),
            ("avg_win", format!("{:.2}", self.avg_win)),
            ("avg_loss", format!("{:.2}", self.avg_loss)),
            ("profit_factor", format!("{:.2}", self.profit_factor)),
        ]
    }
}

/// Minimum of (equity - running_max) / running_max over the curve, in
/// percent. Zero for a curve that never dips below its running peak.
fn compute_max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (point.equity - peak) / peak * 100.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// mean(daily returns) / sample stdev * sqrt(252); zero when the deviation
/// is zero or fewer than two returns are defined.
fn compute_sharpe(equity_curve: &[EquityPoint]) -> f64 {
    let returns: Vec<f64> = equity_curve
        .iter()
        .filter_map(|p| p.daily_return_pct)
        .collect();

    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stdev = variance.sqrt();

    if stdev > 0.0 {
        mean / stdev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}
