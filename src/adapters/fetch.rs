//! Bounded concurrent fetch over a [`DataPort`].
//!
//! A fixed pool of worker threads drains a job queue of symbols. One symbol
//! failing to load never aborts its siblings: the failure is reported on
//! stderr and the symbol is simply absent from the result map.

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;

use chrono::NaiveDate;
use crossbeam_channel::bounded;

use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

/// Fetch every symbol's bars, at most `max_concurrent` in flight at once.
///
/// The result map holds only the symbols that loaded; iteration order of the
/// input slice does not affect the contents.
pub fn fetch_many<P: DataPort + Sync>(
    port: &P,
    symbols: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
    max_concurrent: usize,
) -> HashMap<String, Vec<OhlcvBar>> {
    if symbols.is_empty() {
        return HashMap::new();
    }

    let workers = max_concurrent.max(1).min(symbols.len());
    let (tx, rx) = bounded::<String>(symbols.len());
    for symbol in symbols {
        // capacity equals the symbol count, so the queue never blocks here
        let _ = tx.send(symbol.clone());
    }
    drop(tx);

    let results: Mutex<HashMap<String, Vec<OhlcvBar>>> = Mutex::new(HashMap::new());

    thread::scope(|scope| {
        for _ in 0..workers {
            let rx = rx.clone();
            let results = &results;
            scope.spawn(move || {
                while let Ok(symbol) = rx.recv() {
                    match port.fetch_ohlcv(&symbol, start_date, end_date) {
                        Ok(bars) => {
                            results
                                .lock()
                                .unwrap_or_else(|poisoned| poisoned.into_inner())
                                .insert(symbol, bars);
                        }
                        Err(e) => {
                            eprintln!("Warning: skipping {} ({})", symbol, e);
                        }
                    }
                }
            });
        }
    });

    results
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
