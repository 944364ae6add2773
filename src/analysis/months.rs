/// Calendar date → `YYYY-MM` month key.

use chrono::Datelike;

use crate::model::MonthLabel;

/// Derives the zero-padded month label for a date, e.g. 2003-04-17 → `"2003-04"`.
///
/// Works for anything `Datelike`, so both `NaiveDate` and the various
/// date-time types map to the month they fall in.
pub fn month_label<D: Datelike>(date: &D) -> MonthLabel {
    MonthLabel::from_date(date)
}
