//! Trade ledger: turns the sized signal series into round-trip trades.
//!
//! This is a second state machine, separate from signal generation on
//! purpose: the signal machine always passes through `Flat`, while the
//! ledger may close one trade and open the next on the same bar (the
//! flat-then-reopen reversal).

use chrono::NaiveDate;

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::sizing::SizedRecord;

/// One completed round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Size with sign: positive for long, negative for short.
    pub signed_position: f64,
    pub profit: f64,
    pub return_pct: f64,
}

/// Transaction costs, applied per round trip.
///
/// The ledger deducts `round_trip_cost` from every trade's profit. Both
/// rates default to zero, which reproduces the raw-close profit formula.
/// `return_pct` is always computed from raw entry and exit prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    /// Commission as a fraction of traded notional, charged on each leg.
    pub commission_rate: f64,
    /// Slippage as a fraction of traded notional, charged on each leg.
    pub slippage_rate: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            commission_rate: 0.0,
            slippage_rate: 0.0,
        }
    }
}

impl CostModel {
    pub fn round_trip_cost(
        &self,
        entry_price: f64,
        exit_price: f64,
        quantity: f64,
        contract_size: f64,
    ) -> f64 {
        let rate = self.commission_rate + self.slippage_rate;
        (entry_price.abs() + exit_price.abs()) * quantity.abs() * contract_size * rate
    }
}

struct OpenPosition {
    /// Signed size, never zero while the position is open.
    signed_size: f64,
    entry_price: f64,
    entry_date: NaiveDate,
}

fn close_trade(
    open: &OpenPosition,
    exit_date: NaiveDate,
    exit_price: f64,
    contract_size: f64,
    costs: &CostModel,
) -> Trade {
    let gross = (exit_price - open.entry_price) * open.signed_size * contract_size;
    let cost = costs.round_trip_cost(open.entry_price, exit_price, open.signed_size, contract_size);
    let return_pct = if open.signed_size > 0.0 {
        (exit_price / open.entry_price - 1.0) * 100.0
    } else {
        (open.entry_price / exit_price - 1.0) * 100.0
    };

    Trade {
        entry_date: open.entry_date,
        exit_date,
        entry_price: open.entry_price,
        exit_price,
        signed_position: open.signed_size,
        profit: gross - cost,
        return_pct,
    }
}

/// Fold over the sized signal series, emitting trades ordered by exit date.
///
/// A held position closes on any opposite-sign signal at that bar's close.
/// On the same bar, a non-zero signal then opens a new position (direction =
/// signal sign, magnitude = that bar's size). A position still open after
/// the last bar is force-closed at the last close.
pub fn build_trades(
    bars: &[OhlcvBar],
    rows: &[SizedRecord],
    contract_size: f64,
    costs: &CostModel,
) -> Vec<Trade> {
    debug_assert_eq!(bars.len(), rows.len());

    let mut trades = Vec::new();
    let mut open: Option<OpenPosition> = None;

    for (bar, row) in bars.iter().zip(rows) {
        if let Some(position) = &open {
            let closes = (position.signed_size > 0.0 && row.signal == -1)
                || (position.signed_size < 0.0 && row.signal == 1);
            if closes {
                trades.push(close_trade(position, bar.date, bar.close, contract_size, costs));
                open = None;
            }
        }

        // a zero-sized entry carries no weight and never reaches the ledger
        if open.is_none() && row.signal != 0 && row.position_size > 0.0 {
            open = Some(OpenPosition {
                signed_size: f64::from(row.signal) * row.position_size,
                entry_price: bar.close,
                entry_date: bar.date,
            });
        }
    }

    if let (Some(position), Some(last)) = (&open, bars.last()) {
        trades.push(close_trade(position, last.date, last.close, contract_size, costs));
    }

    trades
}
