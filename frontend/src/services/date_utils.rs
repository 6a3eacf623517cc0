use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use shared::DisplayRule;

/// Field the filter reads when the caller doesn't name one
pub const DEFAULT_DATE_FIELD: &str = "createdOn";

/// The relative ranges offered in list filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Last24Hours,
    Last7Days,
    Last30Days,
    Last3Months,
}

impl DateRange {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Last 24 hours" => Some(Self::Last24Hours),
            "Last 7 days" => Some(Self::Last7Days),
            "Last 30 days" => Some(Self::Last30Days),
            "Last 3 months" => Some(Self::Last3Months),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Last24Hours => "Last 24 hours",
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::Last3Months => "Last 3 months",
        }
    }

    /// Fixed window; "3 months" is 90 days, not calendar months
    pub fn window(&self) -> Duration {
        match self {
            Self::Last24Hours => Duration::hours(24),
            Self::Last7Days => Duration::days(7),
            Self::Last30Days => Duration::days(30),
            Self::Last3Months => Duration::days(90),
        }
    }
}

/// Read access to a record's date-like fields by name
pub trait RecordFields {
    fn field(&self, name: &str) -> Option<&str>;
}

impl RecordFields for Value {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

impl RecordFields for DisplayRule {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "lastModified" | "createdOn" => Some(self.last_modified.as_str()),
            _ => None,
        }
    }
}

/// Predicate selecting records whose date field falls inside a range.
///
/// The cutoff is fixed when the filter is built, so the same filter gives the
/// same answer for the same record no matter when it is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRangeFilter {
    field: String,
    cutoff: Option<DateTime<Utc>>,
}

impl DateRangeFilter {
    /// Unknown or missing labels produce a filter that accepts everything
    pub fn new(range_label: Option<&str>, date_field: Option<&str>) -> Self {
        Self::at(range_label, date_field, Utc::now())
    }

    pub fn at(range_label: Option<&str>, date_field: Option<&str>, now: DateTime<Utc>) -> Self {
        let cutoff = range_label
            .and_then(DateRange::from_label)
            .map(|range| now - range.window());

        Self {
            field: date_field.unwrap_or(DEFAULT_DATE_FIELD).to_string(),
            cutoff,
        }
    }

    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    pub fn matches<R: RecordFields + ?Sized>(&self, record: &R) -> bool {
        let Some(cutoff) = self.cutoff else {
            return true;
        };
        match parse_record_date(record.field(&self.field)) {
            Some(date) => date >= cutoff,
            None => false,
        }
    }

    pub fn apply<'a, R: RecordFields>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|record| self.matches(*record)).collect()
    }
}

/// Same as [`DateRangeFilter::new`]
pub fn date_range_filter(range_label: Option<&str>, date_field: Option<&str>) -> DateRangeFilter {
    DateRangeFilter::new(range_label, date_field)
}

/// Permissive date parsing for list records.
///
/// Missing, empty or `"-"` values become the Unix epoch, which no real range
/// includes. Anything with a `/` is read as `DD/MM/YYYY`. Returns `None` for
/// strings that are not dates at all.
pub fn parse_record_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = match value.map(str::trim) {
        None | Some("") | Some("-") => return Some(DateTime::<Utc>::UNIX_EPOCH),
        Some(value) => value,
    };

    if value.contains('/') {
        return parse_day_month_year(value);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

fn parse_day_month_year(value: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = value.split('/').collect();
    let [day, month, year]: [&str; 3] = parts.try_into().ok()?;

    let date = NaiveDate::from_ymd_opt(
        year.trim().parse().ok()?,
        month.trim().parse().ok()?,
        day.trim().parse().ok()?,
    )?;
    date.and_hms_opt(0, 0, 0).map(|datetime| datetime.and_utc())
}
