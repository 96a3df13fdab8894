//! Donchian channel: rolling highest-high / lowest-low over a trailing window.
//!
//! Warmup: first (window - 1) bars are undefined.

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPoint {
    pub date: NaiveDate,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

pub fn donchian_channel(bars: &[OhlcvBar], window: usize) -> Vec<ChannelPoint> {
    let mut values = Vec::with_capacity(bars.len());
    let warmup = window.saturating_sub(1);

    for i in 0..bars.len() {
        let date = bars[i].date;

        let (high, low) = if window > 0 && i >= warmup {
            let slice = &bars[i + 1 - window..=i];
            let high = slice.iter().map(|b| b.high).fold(f64::MIN, f64::max);
            let low = slice.iter().map(|b| b.low).fold(f64::MAX, f64::min);
            (Some(high), Some(low))
        } else {
            (None, None)
        };

        values.push(ChannelPoint { date, high, low });
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(highs_lows: &[(f64, f64)]) -> Vec<OhlcvBar> {
        highs_lows
            .iter()
            .enumerate()
            .map(|(i, &(high, low))| OhlcvBar {
                symbol: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: (high + low) / 2.0,
                high,
                low,
                close: (high + low) / 2.0,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn channel_warmup() {
        let bars = make_bars(&[(10.0, 5.0), (12.0, 6.0), (11.0, 4.0), (13.0, 7.0)]);
        let channel = donchian_channel(&bars, 3);

        assert!(channel[0].high.is_none());
        assert!(channel[1].high.is_none());
        assert!(channel[2].high.is_some());
        assert!(channel[3].high.is_some());
    }

    #[test]
    fn channel_rolling_max_min() {
        let bars = make_bars(&[(10.0, 5.0), (12.0, 6.0), (11.0, 4.0), (13.0, 7.0)]);
        let channel = donchian_channel(&bars, 3);

        // bars 0..=2: max high 12, min low 4
        assert_eq!(channel[2].high, Some(12.0));
        assert_eq!(channel[2].low, Some(4.0));
        // bars 1..=3: max high 13, min low 4
        assert_eq!(channel[3].high, Some(13.0));
        assert_eq!(channel[3].low, Some(4.0));
    }

    #[test]
    fn channel_window_one_tracks_each_bar() {
        let bars = make_bars(&[(10.0, 5.0), (12.0, 6.0)]);
        let channel = donchian_channel(&bars, 1);

        assert_eq!(channel[0].high, Some(10.0));
        assert_eq!(channel[0].low, Some(5.0));
        assert_eq!(channel[1].high, Some(12.0));
        assert_eq!(channel[1].low, Some(6.0));
    }

    #[test]
    fn channel_window_larger_than_series_all_undefined() {
        let bars = make_bars(&[(10.0, 5.0), (12.0, 6.0)]);
        let channel = donchian_channel(&bars, 5);

        assert!(channel.iter().all(|p| p.high.is_none() && p.low.is_none()));
    }

    #[test]
    fn channel_empty_input() {
        let channel = donchian_channel(&[], 20);
        assert!(channel.is_empty());
    }
}
