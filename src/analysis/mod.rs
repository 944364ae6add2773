/// Monthly pivot of precipitation records.
///
/// Submodules:
/// - `months`    — date → `YYYY-MM` month label.
/// - `aggregate` — group-by fold into (station, month) cells.
/// - `pivot`     — dense station x month matrices, both strategies.
///
/// Nothing here performs I/O; progress is reported through the injected
/// `Reporter` in `pivot::run_pivot` only.

pub mod aggregate;
pub mod months;
pub mod pivot;
