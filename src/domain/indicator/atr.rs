//! Average True Range: simple rolling mean of true range.
//!
//! TR[0] has no previous close, so it falls back to high[0] - low[0].
//! Warmup: first (window - 1) bars are undefined.

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct AtrPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

pub fn rolling_atr(bars: &[OhlcvBar], window: usize) -> Vec<AtrPoint> {
    let mut tr_values: Vec<f64> = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            bar.high - bar.low
        } else {
            bar.true_range(bars[i - 1].close)
        };
        tr_values.push(tr);
    }

    let mut values = Vec::with_capacity(bars.len());
    let warmup = window.saturating_sub(1);

    for i in 0..bars.len() {
        let value = if window > 0 && i >= warmup {
            let sum: f64 = tr_values[i + 1 - window..=i].iter().sum();
            Some(sum / window as f64)
        } else {
            None
        };
        values.push(AtrPoint {
            date: bars[i].date,
            value,
        });
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(day: u32, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            symbol: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn atr_warmup() {
        let bars: Vec<OhlcvBar> = (0..5).map(|i| make_bar(i + 1, 110.0, 90.0, 100.0)).collect();
        let series = rolling_atr(&bars, 3);

        assert_eq!(series.len(), 5);
        assert!(series[0].value.is_none());
        assert!(series[1].value.is_none());
        assert!(series[2].value.is_some());
        assert!(series[4].value.is_some());
    }

    #[test]
    fn atr_is_rolling_mean_of_tr() {
        let bars = vec![
            make_bar(1, 110.0, 100.0, 105.0),
            make_bar(2, 115.0, 105.0, 110.0),
            make_bar(3, 120.0, 110.0, 115.0),
            make_bar(4, 140.0, 120.0, 130.0),
        ];
        let series = rolling_atr(&bars, 3);

        // TR = [10, 10, 10, 25]; mean of last three at i=3 is 15
        let atr2 = series[2].value.unwrap();
        let atr3 = series[3].value.unwrap();
        assert!((atr2 - 10.0).abs() < 1e-9);
        assert!((atr3 - 15.0).abs() < 1e-9);
    }

    #[test]
    fn atr_first_bar_uses_high_low_only() {
        // gap down on bar 1: |low - prev_close| dominates
        let bars = vec![
            make_bar(1, 110.0, 100.0, 105.0),
            make_bar(2, 95.0, 90.0, 92.0),
        ];
        let series = rolling_atr(&bars, 2);

        // TR[0] = 10 (no look-back term), TR[1] = max(5, 10, 15) = 15
        let atr1 = series[1].value.unwrap();
        assert!((atr1 - 12.5).abs() < 1e-9);
    }

    #[test]
    fn atr_positive_once_warmed_up() {
        let bars: Vec<OhlcvBar> = (0..10)
            .map(|i| make_bar(i + 1, 102.0 + i as f64, 98.0 + i as f64, 100.0 + i as f64))
            .collect();
        let series = rolling_atr(&bars, 4);

        for point in &series[3..] {
            assert!(point.value.unwrap() > 0.0);
        }
    }

    #[test]
    fn atr_empty_input() {
        let series = rolling_atr(&[], 20);
        assert!(series.is_empty());
    }
}
