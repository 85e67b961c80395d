use crate::schema::Parameter;
use chrono::NaiveDate;

/// One grid observation, as produced by normalization.
///
/// Coordinates or the value may be `None` when the source row carried
/// something non-numeric; such records are excluded from spatial matching but
/// kept for auditing.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub value: Option<f64>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub tehsil: Option<String>,
}

impl Record {
    /// True when the record can participate in spatial matching.
    pub fn is_locatable(&self) -> bool {
        self.lat.is_some() && self.lon.is_some() && self.value.is_some()
    }
}

/// Data-quality facts observed during normalization.
///
/// These are advisory, not errors: a dataset with dropped rows or a corrected
/// axis swap is still queryable, but the caller must be able to audit what
/// happened upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QualityReport {
    /// Rows in the raw input, before any filtering.
    pub rows_in: usize,
    /// Rows dropped because their date failed to parse.
    pub rows_dropped_bad_date: usize,
    /// Whether the lat/lon columns were found swapped and corrected.
    pub axis_swapped: bool,
}

impl QualityReport {
    /// True when normalization saw nothing suspicious.
    pub fn is_clean(&self) -> bool {
        self.rows_dropped_bad_date == 0 && !self.axis_swapped
    }
}

/// A normalized, immutable snapshot of one parameter's records.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub parameter: Parameter,
    pub records: Vec<Record>,
    pub quality: QualityReport,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
