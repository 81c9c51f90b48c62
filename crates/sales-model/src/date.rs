//! Conversions from the date representations that show up in spreadsheet cells.

use chrono::{Days, NaiveDate, NaiveDateTime};

/// Day zero of the Excel 1900 date system as used for serial values > 60.
///
/// Serial `1` is 1900-01-01, but Excel treats 1900 as a leap year (the Lotus
/// 1-2-3 bug), so anchoring on 1899-12-30 yields correct dates from 1900-03-01
/// onwards.
const EXCEL_1900_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// First serial (1900-03-01) past the phantom 1900-02-29.
const EXCEL_FIRST_EXACT_SERIAL: f64 = 61.0;

/// Largest serial Excel can represent (9999-12-31).
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// Convert an Excel 1900-system serial date to a calendar date. The time-of-day fraction is
/// discarded. Serials before 1900-03-01 are rejected.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite()
        || serial < EXCEL_FIRST_EXACT_SERIAL
        || serial >= EXCEL_MAX_SERIAL + 1.0
    {
        return None;
    }

    let (y, m, d) = EXCEL_1900_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_days(Days::new(serial.trunc() as u64))
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse date text as written into spreadsheet or CSV cells.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }

    None
}
