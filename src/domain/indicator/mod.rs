//! Rolling-window indicators feeding the signal state machine.
//!
//! Warm-up values are `None`, never zero: an undefined channel or ATR must
//! not be confusable with a computed zero downstream.

pub mod atr;
pub mod donchian;

pub use atr::{rolling_atr, AtrPoint};
pub use donchian::{donchian_channel, ChannelPoint};

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::strategy::TurtleParams;

/// Per-bar derived values required by the signal state machine.
///
/// Entry and exit channels are two independent invocations of the Donchian
/// calculation; they share no state.
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    pub entry_channel: Vec<ChannelPoint>,
    pub exit_channel: Vec<ChannelPoint>,
    pub atr: Vec<AtrPoint>,
}

impl IndicatorTable {
    pub fn compute(bars: &[OhlcvBar], params: &TurtleParams) -> Self {
        IndicatorTable {
            entry_channel: donchian_channel(bars, params.entry_window),
            exit_channel: donchian_channel(bars, params.exit_window),
            atr: rolling_atr(bars, params.atr_window),
        }
    }
}
