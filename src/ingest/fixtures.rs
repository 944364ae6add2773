/// Test fixtures: representative daily precipitation CSV payloads.
///
/// These mirror the layout of the GHCN-derived `precipitation.csv` the tool
/// is normally pointed at:
///
///   station,name,date,latitude,longitude,elevation,precipitation
///
/// `station` is the GHCN identifier and is not used for grouping; rows are
/// keyed by the human-readable `name`. Precipitation is in tenths of a
/// millimetre.

/// Three stations over two months. Atlanta reports twice in January 2016,
/// Calgary once in January and once in February, Vancouver twice in
/// February only.
#[cfg(test)]
pub(crate) fn fixture_three_station_csv() -> &'static str {
    "station,name,date,latitude,longitude,elevation,precipitation
USW00013874,\"ATLANTA HARTSFIELD INTL AP, GA US\",2016-01-01,33.6301,-84.4418,308.5,112
USW00013874,\"ATLANTA HARTSFIELD INTL AP, GA US\",2016-01-02,33.6301,-84.4418,308.5,0
CA003031093,\"CALGARY INTL A, AB CA\",2016-01-15,51.1139,-114.0203,1084.1,3
CA003031093,\"CALGARY INTL A, AB CA\",2016-02-20,51.1139,-114.0203,1084.1,8
CA001108395,\"VANCOUVER INTL A, BC CA\",2016-02-01,49.1947,-123.1839,4.3,97
CA001108395,\"VANCOUVER INTL A, BC CA\",2016-02-02,49.1947,-123.1839,4.3,41
"
}

/// Second data row (line 3) has an empty `name`.
#[cfg(test)]
pub(crate) fn fixture_blank_station_csv() -> &'static str {
    "station,name,date,latitude,longitude,elevation,precipitation
USW00013874,\"ATLANTA HARTSFIELD INTL AP, GA US\",2016-01-01,33.6301,-84.4418,308.5,112
USW00013874,,2016-01-02,33.6301,-84.4418,308.5,0
"
}

/// First data row (line 2) has an empty `date`.
#[cfg(test)]
pub(crate) fn fixture_blank_date_csv() -> &'static str {
    "station,name,date,latitude,longitude,elevation,precipitation
CA003031093,\"CALGARY INTL A, AB CA\",,51.1139,-114.0203,1084.1,3
"
}
