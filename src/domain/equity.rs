//! Equity curve: a second pass over the bar series, applying trade profits
//! as their exit dates are reached.

use chrono::NaiveDate;

use crate::domain::ledger::Trade;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
    /// Percent change against the previous point; `None` for the first point.
    pub daily_return_pct: Option<f64>,
}

/// Walk the bars with a pointer into the exit-date-ordered trade list.
///
/// Every trade whose exit date is at or before the bar's date is applied
/// before the bar's equity is recorded, so multiple trades closing by the
/// same date all land on that bar.
pub fn build_equity_curve(
    bars: &[OhlcvBar],
    trades: &[Trade],
    initial_capital: f64,
) -> Vec<EquityPoint> {
    let mut curve = Vec::with_capacity(bars.len());
    let mut capital = initial_capital;
    let mut next_trade = 0;
    let mut prev_equity: Option<f64> = None;

    for bar in bars {
        while next_trade < trades.len() && bar.date >= trades[next_trade].exit_date {
            capital += trades[next_trade].profit;
            next_trade += 1;
        }

        let daily_return_pct = prev_equity.map(|prev| {
            if prev == 0.0 {
                0.0
            } else {
                (capital / prev - 1.0) * 100.0
            }
        });

        curve.push(EquityPoint {
            date: bar.date,
            equity: capital,
            daily_return_pct,
        });
        prev_equity = Some(capital);
    }

    curve
}
