//! Backtest orchestration: indicators, signals, sizing, ledger, equity,
//! in that order, for one symbol or a whole batch.

use std::collections::HashMap;

use crate::domain::equity::{EquityPoint, build_equity_curve};
use crate::domain::indicator::IndicatorTable;
use crate::domain::ledger::{CostModel, Trade, build_trades};
use crate::domain::metrics::PerformanceSummary;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::generate_signals;
use crate::domain::sizing::{SizedRecord, size_signals};
use crate::domain::strategy::TurtleParams;

/// Account-level settings, as opposed to the per-strategy [`TurtleParams`].
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub contract_size: f64,
    pub cost_model: CostModel,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 100_000.0,
            contract_size: 1.0,
            cost_model: CostModel::default(),
        }
    }
}

/// Everything a single-symbol run produces.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub symbol: String,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_return_pct: f64,
    pub signals: Vec<SizedRecord>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl BacktestResult {
    /// `None` until the run produced at least one trade.
    pub fn performance(&self) -> Option<PerformanceSummary> {
        PerformanceSummary::compute(self.initial_capital, &self.trades, &self.equity_curve)
    }
}

/// Run the full pipeline over one symbol's bar series.
///
/// An empty series yields an empty result with `final_capital` equal to
/// `initial_capital`; it is not an error at this layer.
pub fn run_backtest(
    symbol: &str,
    bars: &[OhlcvBar],
    params: &TurtleParams,
    config: &BacktestConfig,
) -> BacktestResult {
    let indicators = IndicatorTable::compute(bars, params);
    let signals = generate_signals(bars, &indicators, params);
    let sized = size_signals(
        &signals,
        &indicators.atr,
        config.initial_capital,
        params.risk_percent,
        config.contract_size,
    );
    let trades = build_trades(bars, &sized, config.contract_size, &config.cost_model);
    let equity_curve = build_equity_curve(bars, &trades, config.initial_capital);

    let final_capital = equity_curve
        .last()
        .map_or(config.initial_capital, |point| point.equity);
    let total_return_pct = (final_capital / config.initial_capital - 1.0) * 100.0;

    BacktestResult {
        symbol: symbol.to_string(),
        initial_capital: config.initial_capital,
        final_capital,
        total_return_pct,
        signals: sized,
        trades,
        equity_curve,
    }
}

/// Run each symbol independently with the same parameters. Results carry no
/// cross-symbol state; iteration order of the input map does not matter.
pub fn run_backtest_many(
    data: &HashMap<String, Vec<OhlcvBar>>,
    params: &TurtleParams,
    config: &BacktestConfig,
) -> HashMap<String, BacktestResult> {
    data.iter()
        .map(|(symbol, bars)| (symbol.clone(), run_backtest(symbol, bars, params, config)))
        .collect()
}
