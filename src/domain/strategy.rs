//! Strategy parameters for the channel-breakout rule.

/// Turtle-style breakout parameters, fixed for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct TurtleParams {
    /// Donchian window for entry breakouts.
    pub entry_window: usize,
    /// Donchian window for exit breakouts.
    pub exit_window: usize,
    /// ATR window for stops and sizing.
    pub atr_window: usize,
    /// Stop distance in ATR multiples.
    pub atr_multiplier: f64,
    /// Fraction of account value risked per trade, in (0, 1].
    pub risk_percent: f64,
}

impl Default for TurtleParams {
    fn default() -> Self {
        TurtleParams {
            entry_window: 20,
            exit_window: 10,
            atr_window: 20,
            atr_multiplier: 2.0,
            risk_percent: 0.01,
        }
    }
}
