//! Signal state machine: a single sequential pass over the bar series.
//!
//! Decisions for bar i use bar i-1's channel values (a channel that includes
//! the current bar's own extreme must never trigger its breakout) and bar i's
//! ATR. Exactly one signal is emitted per bar, and transitions always pass
//! through `Flat`: the machine never flips Long to Short in one step.

use chrono::NaiveDate;

use crate::domain::indicator::IndicatorTable;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::strategy::TurtleParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
    Short,
}

/// Per-bar outcome of the state machine.
///
/// `entry_price` and `stop_level` are `None` exactly when `position` is
/// `Flat`; `stop_level` is also `None` while the ATR is still warming up.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRecord {
    pub date: NaiveDate,
    /// -1, 0 or +1.
    pub signal: i8,
    pub position: PositionState,
    pub entry_price: Option<f64>,
    pub stop_level: Option<f64>,
}

/// Stop level for the given state: entry -/+ ATR * multiplier for Long/Short.
///
/// `None` when flat or when either the entry price or the ATR is undefined,
/// in which case no stop can fire.
fn active_stop(
    position: PositionState,
    entry_price: Option<f64>,
    atr: Option<f64>,
    atr_multiplier: f64,
) -> Option<f64> {
    let entry = entry_price?;
    let atr = atr?;
    match position {
        PositionState::Flat => None,
        PositionState::Long => Some(entry - atr * atr_multiplier),
        PositionState::Short => Some(entry + atr * atr_multiplier),
    }
}

/// Fold over the bars producing one [`SignalRecord`] each.
///
/// Index 0 is never a decision point (there is no prior-bar channel), so it
/// always records signal 0 and `Flat`. Per bar, in priority order:
/// volatility stop, then breakout entry when flat, otherwise channel exit.
/// Comparisons against an undefined channel or stop never fire.
pub fn generate_signals(
    bars: &[OhlcvBar],
    indicators: &IndicatorTable,
    params: &TurtleParams,
) -> Vec<SignalRecord> {
    let mut records = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return records;
    }

    records.push(SignalRecord {
        date: bars[0].date,
        signal: 0,
        position: PositionState::Flat,
        entry_price: None,
        stop_level: None,
    });

    let mut position = PositionState::Flat;
    let mut entry_price: Option<f64> = None;

    for i in 1..bars.len() {
        let bar = &bars[i];
        let atr = indicators.atr[i].value;
        let entry_channel = &indicators.entry_channel[i - 1];
        let exit_channel = &indicators.exit_channel[i - 1];
        let stop = active_stop(position, entry_price, atr, params.atr_multiplier);

        let mut signal: i8 = 0;
        match position {
            PositionState::Long => {
                if stop.is_some_and(|s| bar.low <= s) {
                    // stop check has highest priority
                    signal = -1;
                    position = PositionState::Flat;
                    entry_price = None;
                } else if exit_channel.low.is_some_and(|low| bar.close < low)
                    || stop.is_some_and(|s| bar.close < s)
                {
                    signal = -1;
                    position = PositionState::Flat;
                    entry_price = None;
                }
            }
            PositionState::Short => {
                if stop.is_some_and(|s| bar.high >= s) {
                    signal = 1;
                    position = PositionState::Flat;
                    entry_price = None;
                } else if exit_channel.high.is_some_and(|high| bar.close > high)
                    || stop.is_some_and(|s| bar.close > s)
                {
                    signal = 1;
                    position = PositionState::Flat;
                    entry_price = None;
                }
            }
            PositionState::Flat => {
                if entry_channel.high.is_some_and(|high| bar.close > high) {
                    signal = 1;
                    position = PositionState::Long;
                    entry_price = Some(bar.close);
                } else if entry_channel.low.is_some_and(|low| bar.close < low) {
                    signal = -1;
                    position = PositionState::Short;
                    entry_price = Some(bar.close);
                }
            }
        }

        // recorded stop reflects the resulting position, so an entry bar
        // already carries the stop implied by its own entry price
        let stop_level = active_stop(position, entry_price, atr, params.atr_multiplier);

        records.push(SignalRecord {
            date: bar.date,
            signal,
            position,
            entry_price,
            stop_level,
        });
    }

    records
}
