//! Data access port trait.

use chrono::NaiveDate;

use crate::domain::error::TurtleError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// Bars for `symbol` within `[start_date, end_date]`, ascending by date.
    /// An empty result is `Err(NoData)`, never an empty vector.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TurtleError>;

    fn list_symbols(&self) -> Result<Vec<String>, TurtleError>;

    /// First date, last date and bar count for a symbol; `None` when the
    /// source holds nothing for it.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TurtleError>;
}
