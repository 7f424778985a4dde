use chrono::{NaiveDate, NaiveDateTime};

/// Date-time layouts, day before month. Two-digit years are tried before
/// four-digit ones since `%Y` would otherwise accept `24` as year 24.
const DATE_TIME_FORMATS: [&str; 16] = [
    "%d.%m.%y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%y %H:%M",
    "%d.%m.%Y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y, %H:%M",
    "%d.%m.%Y, %H:%M:%S",
];

const DATE_FORMATS: [&str; 7] = [
    "%d.%m.%y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%Y-%m-%d",
];

/// Parse a timestamp cell using the day-first convention.
///
/// Accepts `dd.mm.yyyy`, `dd/mm/yyyy` and `dd-mm-yyyy` (two-digit years allowed)
/// with an optional `HH:MM[:SS]` time, plus ISO `yyyy-mm-dd`. Date-only values
/// resolve to midnight. Returns `None` for anything else.
pub fn parse_day_first(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
