use calamine::{Data, ExcelDateTime};
use chrono::NaiveDate;
use sales_model::date::{from_excel_serial, parse_date_text};

/// Cell value normalized across the workbook and CSV readers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawCell<'a> {
    Empty,
    Text(&'a str),
    Int(i64),
    Number(f64),
    Bool(bool),
    /// Number carrying a date/time number format. Keeps calamine's value so the
    /// workbook's date system (1900 or 1904) is applied on conversion.
    DateTime(ExcelDateTime),
    Error(String),
}

impl<'a> RawCell<'a> {
    pub(crate) fn from_data(value: &'a Data) -> Self {
        match value {
            Data::Empty => RawCell::Empty,
            Data::String(s) if s.trim().is_empty() => RawCell::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s),
            Data::Int(v) => RawCell::Int(*v),
            Data::Float(v) => RawCell::Number(*v),
            Data::Bool(v) => RawCell::Bool(*v),
            Data::DateTime(v) => RawCell::DateTime(*v),
            Data::Error(e) => RawCell::Error(e.to_string()),
        }
    }

    pub(crate) fn from_text(value: &'a str) -> Self {
        if value.trim().is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value)
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    /// Header cells are matched on their trimmed text; anything else never matches.
    pub(crate) fn header_text(&self) -> Option<&'a str> {
        match self {
            RawCell::Text(s) => Some(s.trim()),
            _ => None,
        }
    }

    pub(crate) fn to_date(&self) -> Result<NaiveDate, String> {
        let parsed = match self {
            RawCell::DateTime(v) if v.is_datetime() => workbook_date(v),
            RawCell::Number(v) => from_excel_serial(*v),
            RawCell::Int(v) => from_excel_serial(*v as f64),
            RawCell::Text(s) => parse_date_text(s),
            _ => None,
        };
        parsed.ok_or_else(|| format!("expected a date, found {}", self.describe()))
    }

    /// Text fields are taken verbatim; numeric labels (e.g. a bare city code) are rendered back
    /// to text.
    pub(crate) fn to_text(&self) -> Result<String, String> {
        match self {
            RawCell::Text(s) => Ok((*s).to_string()),
            RawCell::Int(v) => Ok(v.to_string()),
            RawCell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => Ok(format!("{}", *v as i64)),
            RawCell::Number(v) => Ok(v.to_string()),
            _ => Err(format!("expected text, found {}", self.describe())),
        }
    }

    pub(crate) fn to_quantity(&self) -> Result<i64, String> {
        let value = match self {
            RawCell::Int(v) => Some(*v),
            RawCell::Number(v) => integral(*v),
            RawCell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            _ => None,
        };
        value.ok_or_else(|| format!("expected a whole number, found {}", self.describe()))
    }

    pub(crate) fn to_amount(&self) -> Result<f64, String> {
        let value = match self {
            RawCell::Int(v) => Some(*v as f64),
            RawCell::Number(v) => Some(*v),
            RawCell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("expected a number, found {}", self.describe()))
    }

    fn describe(&self) -> String {
        match self {
            RawCell::Empty => "an empty cell".to_string(),
            RawCell::Text(s) => format!("text {s:?}"),
            RawCell::Int(v) => format!("integer {v}"),
            RawCell::Number(v) => format!("number {v}"),
            RawCell::Bool(v) => format!("boolean {v}"),
            RawCell::DateTime(v) if v.is_duration() => format!("duration {}", v.as_f64()),
            RawCell::DateTime(v) => format!("date serial {}", v.as_f64()),
            RawCell::Error(e) => format!("error value {e}"),
        }
    }
}

fn workbook_date(value: &ExcelDateTime) -> Option<NaiveDate> {
    let serial = value.as_f64();
    // Past 9999-12-31 the calendar components no longer fit.
    if !serial.is_finite() || serial < 0.0 || serial >= 2_958_466.0 {
        return None;
    }
    let (y, m, d, ..) = value.to_ymd_hms_milli();
    NaiveDate::from_ymd_opt(i32::from(y), u32::from(m), u32::from(d))
}

fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}
