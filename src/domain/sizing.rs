//! Risk-based position sizing.
//!
//! Sizing always uses the initial account value: realized gains are not
//! reinvested into the size of later positions.

use chrono::NaiveDate;

use crate::domain::indicator::AtrPoint;
use crate::domain::signal::{PositionState, SignalRecord};

/// A [`SignalRecord`] extended with the size allowed by the risk budget.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedRecord {
    pub date: NaiveDate,
    pub signal: i8,
    pub position: PositionState,
    pub entry_price: Option<f64>,
    pub stop_level: Option<f64>,
    /// Units permitted by the risk budget at this bar's volatility. Never
    /// negative; zero while the ATR is undefined or zero.
    pub position_size: f64,
}

/// position_size = (account_value * risk_percent) / (ATR * contract_size)
///
/// Undefined ATR, zero ATR, or a non-finite quotient all size to zero, so a
/// warm-up bar can emit a signal but never a position with weight.
pub fn size_signals(
    signals: &[SignalRecord],
    atr: &[AtrPoint],
    account_value: f64,
    risk_percent: f64,
    contract_size: f64,
) -> Vec<SizedRecord> {
    let max_loss_per_trade = account_value * risk_percent;

    signals
        .iter()
        .zip(atr)
        .map(|(record, atr_point)| {
            let position_size = match atr_point.value {
                Some(atr) if atr > 0.0 => {
                    let size = max_loss_per_trade / (atr * contract_size);
                    if size.is_finite() { size } else { 0.0 }
                }
                _ => 0.0,
            };
            SizedRecord {
                date: record.date,
                signal: record.signal,
                position: record.position,
                entry_price: record.entry_price,
                stop_level: record.stop_level,
                position_size,
            }
        })
        .collect()
}
