//! Serde formats for calendar fields on the wire.

// `YYYY-MM-DD`
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

// `HH:MM:SS`; seconds are optional on input
time::serde::format_description!(
    pub clock_time,
    Time,
    "[hour]:[minute][optional [:[second]]]"
);
