//! Validated construction of entities from [RawRow]s
//!
//! Every construction routine evaluates all the rules of its entity kind, in the
//! order the fields are declared, and only builds the entity if none of them failed.
use crate::enums::GtfsEnum;
use crate::notice::Notice;
use crate::objects::GtfsFile;
use crate::raw_row::{RawRow, RawValue};
use crate::time_codec::{parse_date, TimeCodec};
use chrono::NaiveDate;
use std::ops::RangeInclusive;

/// Outcome of the construction of one entity from one row
#[derive(Debug, Clone, PartialEq)]
pub enum BuildResult<E> {
    Success(E),
    /// The row broke at least one rule. Notices are in rule declaration order
    Failure(Vec<Notice>),
}

impl<E> BuildResult<E> {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success(_))
    }

    pub fn map<U, F: FnOnce(E) -> U>(self, f: F) -> BuildResult<U> {
        match self {
            BuildResult::Success(e) => BuildResult::Success(f(e)),
            BuildResult::Failure(notices) => BuildResult::Failure(notices),
        }
    }

    pub fn entity(&self) -> Option<&E> {
        match self {
            BuildResult::Success(e) => Some(e),
            BuildResult::Failure(_) => None,
        }
    }

    /// The notices of a failure, nothing for a success
    pub fn notices(&self) -> &[Notice] {
        match self {
            BuildResult::Success(_) => &[],
            BuildResult::Failure(notices) => notices,
        }
    }

    pub fn into_result(self) -> Result<E, Vec<Notice>> {
        match self {
            BuildResult::Success(e) => Ok(e),
            BuildResult::Failure(notices) => Err(notices),
        }
    }
}

/// Integer held by a raw value. Floats must be integral and fit in an `i64`.
///
/// On failure, returns the value as written.
pub(crate) fn as_integer(value: &RawValue) -> Result<i64, String> {
    match value {
        RawValue::Integer(i) => Ok(*i),
        RawValue::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(*v as i64),
        RawValue::Float(v) => Err(v.to_string()),
        RawValue::Text(s) => s.trim().parse::<i64>().map_err(|_| s.clone()),
    }
}

/// Reads the fields of one row, recording a [Notice] for each broken rule.
///
/// Accessors return `None` when the value is absent or invalid. A required accessor
/// returning `None` always records a notice, so [FieldValidator::finish] can rely on it.
pub struct FieldValidator<'r> {
    filename: &'static str,
    row: &'r RawRow,
    entity_id: Option<String>,
    notices: Vec<Notice>,
}

impl<'r> FieldValidator<'r> {
    pub fn new(file: GtfsFile, row: &'r RawRow) -> Self {
        Self {
            filename: file.file_name(),
            row,
            entity_id: None,
            notices: Vec::new(),
        }
    }

    /// Uses the raw value of `field` as entity id in the notices
    pub fn identified_by(mut self, field: &str) -> Self {
        self.entity_id = self.row.get(field).map(|v| v.to_string());
        self
    }

    pub fn filename(&self) -> &'static str {
        self.filename
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn has(&self, field: &str) -> bool {
        self.row.contains(field)
    }

    /// Records a notice for a rule checked by the caller
    pub fn reject(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn missing(&mut self, field: &str) {
        let notice = Notice::missing_required_value(self.filename, field, self.entity_id());
        self.notices.push(notice);
    }

    fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() && !self.has(field) {
            self.missing(field);
        }
        value
    }

    pub fn optional_text(&mut self, field: &str) -> Option<String> {
        self.row.get(field).map(|v| match v {
            RawValue::Text(s) => s.trim().to_owned(),
            other => other.to_string(),
        })
    }

    pub fn required_text(&mut self, field: &str) -> Option<String> {
        let value = self.optional_text(field);
        self.required(field, value)
    }

    fn integer(&mut self, field: &str) -> Option<i64> {
        match as_integer(self.row.get(field)?) {
            Ok(i) => Some(i),
            Err(raw) => {
                let notice = Notice::invalid_integer(self.filename, field, &raw, self.entity_id());
                self.notices.push(notice);
                None
            }
        }
    }

    pub fn optional_integer(&mut self, field: &str, range: RangeInclusive<i64>) -> Option<i64> {
        let value = self.integer(field)?;
        if range.contains(&value) {
            Some(value)
        } else {
            let notice =
                Notice::integer_out_of_range(self.filename, field, &range, value, self.entity_id());
            self.notices.push(notice);
            None
        }
    }

    pub fn required_integer(&mut self, field: &str, range: RangeInclusive<i64>) -> Option<i64> {
        let value = self.optional_integer(field, range);
        self.required(field, value)
    }

    fn float(&mut self, field: &str) -> Option<f64> {
        let parsed = match self.row.get(field)? {
            RawValue::Integer(i) => Some(*i as f64),
            RawValue::Float(v) => Some(*v),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        match parsed.filter(|v| v.is_finite()) {
            Some(v) => Some(v),
            None => {
                let raw = self.row.get(field).map(|v| v.to_string()).unwrap_or_default();
                let notice = Notice::invalid_float(self.filename, field, &raw, self.entity_id());
                self.notices.push(notice);
                None
            }
        }
    }

    pub fn optional_float(&mut self, field: &str, range: RangeInclusive<f64>) -> Option<f64> {
        let value = self.float(field)?;
        if range.contains(&value) {
            Some(value)
        } else {
            let notice =
                Notice::float_out_of_range(self.filename, field, &range, value, self.entity_id());
            self.notices.push(notice);
            None
        }
    }

    pub fn required_float(&mut self, field: &str, range: RangeInclusive<f64>) -> Option<f64> {
        let value = self.optional_float(field, range);
        self.required(field, value)
    }

    pub fn optional_enum<T: GtfsEnum>(&mut self, field: &str) -> Option<T> {
        let code = self.integer(field)?;
        let value = T::from_code(code);
        if value.is_none() {
            let notice = Notice::unexpected_enum_value(self.filename, field, code, self.entity_id());
            self.notices.push(notice);
        }
        value
    }

    pub fn required_enum<T: GtfsEnum>(&mut self, field: &str) -> Option<T> {
        let value = self.optional_enum(field);
        self.required(field, value)
    }

    /// An enumeration that falls back on its default value when absent
    pub fn enum_or_default<T: GtfsEnum + Default>(&mut self, field: &str) -> T {
        self.optional_enum(field).unwrap_or_default()
    }

    pub fn optional_time(&mut self, field: &str, codec: &dyn TimeCodec) -> Option<i32> {
        let raw = self.optional_text(field)?;
        match codec.to_seconds(&raw) {
            Ok(seconds) => Some(seconds),
            Err(_) => {
                let notice = Notice::invalid_time(self.filename, field, &raw, self.entity_id());
                self.notices.push(notice);
                None
            }
        }
    }

    pub fn required_time(&mut self, field: &str, codec: &dyn TimeCodec) -> Option<i32> {
        let value = self.optional_time(field, codec);
        self.required(field, value)
    }

    pub fn optional_date(&mut self, field: &str) -> Option<NaiveDate> {
        let raw = self.optional_text(field)?;
        let date = parse_date(&raw);
        if date.is_none() {
            let notice = Notice::invalid_date(self.filename, field, &raw, self.entity_id());
            self.notices.push(notice);
        }
        date
    }

    pub fn required_date(&mut self, field: &str) -> Option<NaiveDate> {
        let value = self.optional_date(field);
        self.required(field, value)
    }

    /// A `0`/`1` flag, like the days of `calendar.txt`
    pub fn required_bool(&mut self, field: &str) -> Option<bool> {
        self.required_integer(field, 0..=1).map(|i| i == 1)
    }

    /// Builds the entity if no rule was broken
    pub fn finish<E, F: FnOnce() -> Option<E>>(self, build: F) -> BuildResult<E> {
        if self.notices.is_empty() {
            if let Some(entity) = build() {
                return BuildResult::Success(entity);
            }
        }
        BuildResult::Failure(self.notices)
    }
}
