//! Diagnostics produced while loading and validating a feed
use crate::objects::Identity;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Entity id used when the offending entity could not be identified
pub const NO_ID: &str = "no id";

/// How serious a [Notice] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informative, the feed is still valid
    Info,
    /// The feed is valid but something looks wrong
    Warning,
    /// The feed violates the GTFS reference
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// One structured diagnostic describing a single detected violation.
///
/// Every kind of notice shares this shape. What is specific to a rule (range bounds,
/// offending values, composite key parts...) lives in `extensions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub severity: Severity,
    /// Stable snake_case identifier of the rule, e.g. `missing_required_value`
    pub code: &'static str,
    pub title: &'static str,
    pub description: String,
    /// The GTFS file the notice is about, e.g. `stop_times.txt`
    pub filename: String,
    /// Identifier of the entity at fault, [NO_ID] when it is unknown
    pub entity_id: String,
    pub extensions: BTreeMap<String, Value>,
}

const COMPOSITE_KEY_PARTS: [(&str, &str); 5] = [
    ("compositeKeyFirstPart", "compositeKeyFirstValue"),
    ("compositeKeySecondPart", "compositeKeySecondValue"),
    ("compositeKeyThirdPart", "compositeKeyThirdValue"),
    ("compositeKeyFourthPart", "compositeKeyFourthValue"),
    ("compositeKeyFifthPart", "compositeKeyFifthValue"),
];

impl Notice {
    pub fn new(
        severity: Severity,
        code: &'static str,
        title: &'static str,
        filename: &str,
        description: String,
    ) -> Self {
        Self {
            severity,
            code,
            title,
            description,
            filename: filename.to_owned(),
            entity_id: NO_ID.to_owned(),
            extensions: BTreeMap::new(),
        }
    }

    pub fn with_entity_id(mut self, entity_id: Option<&str>) -> Self {
        self.entity_id = entity_id.unwrap_or(NO_ID).to_owned();
        self
    }

    pub fn with_extension<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.extensions.insert(key.to_owned(), value.into());
        self
    }

    /// Adds the `compositeKey*` extensions describing an identity made of several fields
    pub fn with_composite_key<K: AsRef<str>, V: Into<Value>>(
        mut self,
        parts: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        for ((part_key, value_key), (name, value)) in COMPOSITE_KEY_PARTS.iter().zip(parts) {
            self.extensions
                .insert((*part_key).to_owned(), Value::from(name.as_ref()));
            self.extensions.insert((*value_key).to_owned(), value.into());
        }
        self
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    pub fn missing_required_value(filename: &str, field: &str, entity_id: Option<&str>) -> Self {
        Self::new(
            Severity::Error,
            "missing_required_value",
            "Missing required value",
            filename,
            format!("Missing value for required field `{}`", field),
        )
        .with_entity_id(entity_id)
        .with_extension("fieldName", field)
    }

    pub fn unexpected_enum_value(
        filename: &str,
        field: &str,
        raw_value: impl Into<Value>,
        entity_id: Option<&str>,
    ) -> Self {
        Self::new(
            Severity::Error,
            "unexpected_enum_value",
            "Unexpected enum value",
            filename,
            format!("Field `{}` has a value outside of its enumeration", field),
        )
        .with_entity_id(entity_id)
        .with_extension("fieldName", field)
        .with_extension("enumValue", raw_value)
    }

    pub fn integer_out_of_range(
        filename: &str,
        field: &str,
        range: &std::ops::RangeInclusive<i64>,
        actual: i64,
        entity_id: Option<&str>,
    ) -> Self {
        Self::new(
            Severity::Error,
            "integer_out_of_range",
            "Integer out of range",
            filename,
            format!(
                "Field `{}` is {}, expected a value between {} and {}",
                field,
                actual,
                range.start(),
                range.end()
            ),
        )
        .with_entity_id(entity_id)
        .with_extension("fieldName", field)
        .with_extension("rangeMin", *range.start())
        .with_extension("rangeMax", *range.end())
        .with_extension("actualValue", actual)
    }

    pub fn float_out_of_range(
        filename: &str,
        field: &str,
        range: &std::ops::RangeInclusive<f64>,
        actual: f64,
        entity_id: Option<&str>,
    ) -> Self {
        Self::new(
            Severity::Error,
            "float_out_of_range",
            "Float out of range",
            filename,
            format!(
                "Field `{}` is {}, expected a value between {} and {}",
                field,
                actual,
                range.start(),
                range.end()
            ),
        )
        .with_entity_id(entity_id)
        .with_extension("fieldName", field)
        .with_extension("rangeMin", *range.start())
        .with_extension("rangeMax", *range.end())
        .with_extension("actualValue", actual)
    }

    fn unparsable(
        code: &'static str,
        title: &'static str,
        expected: &str,
        filename: &str,
        field: &str,
        raw_value: &str,
        entity_id: Option<&str>,
    ) -> Self {
        Self::new(
            Severity::Error,
            code,
            title,
            filename,
            format!(
                "Field `{}` has value `{}` which is not {}",
                field, raw_value, expected
            ),
        )
        .with_entity_id(entity_id)
        .with_extension("fieldName", field)
        .with_extension("rawValue", raw_value)
    }

    pub fn invalid_integer(filename: &str, field: &str, raw: &str, id: Option<&str>) -> Self {
        Self::unparsable("invalid_integer", "Invalid integer", "an integer", filename, field, raw, id)
    }

    pub fn invalid_float(filename: &str, field: &str, raw: &str, id: Option<&str>) -> Self {
        Self::unparsable("invalid_float", "Invalid float", "a number", filename, field, raw, id)
    }

    pub fn invalid_time(filename: &str, field: &str, raw: &str, id: Option<&str>) -> Self {
        Self::unparsable("invalid_time", "Invalid time", "a HH:MM:SS time", filename, field, raw, id)
    }

    pub fn invalid_date(filename: &str, field: &str, raw: &str, id: Option<&str>) -> Self {
        Self::unparsable("invalid_date", "Invalid date", "a YYYYMMDD date", filename, field, raw, id)
    }

    /// Two fields that cannot be given together, or one that requires another
    pub fn illegal_field_value_combination(
        filename: &str,
        field: &str,
        conflicting_field: &str,
        entity_id: Option<&str>,
    ) -> Self {
        Self::new(
            Severity::Error,
            "illegal_field_value_combination",
            "Illegal field value combination",
            filename,
            format!(
                "Field `{}` cannot be combined with `{}` here",
                field, conflicting_field
            ),
        )
        .with_entity_id(entity_id)
        .with_extension("fieldName", field)
        .with_extension("conflictingFieldName", conflicting_field)
    }

    pub fn station_with_parent_station(stop_id: Option<&str>, parent_station: &str) -> Self {
        Self::new(
            Severity::Error,
            "station_with_parent_station",
            "Station with parent station",
            "stops.txt",
            format!(
                "A station cannot be part of another station (`{}`)",
                parent_station
            ),
        )
        .with_entity_id(stop_id)
        .with_extension("fieldName", "parent_station")
        .with_extension("parentId", parent_station)
    }

    pub fn wrong_parent_location_type(
        stop_id: &str,
        location_type: i64,
        parent_station: &str,
        parent_location_type: i64,
        expected_location_type: i64,
    ) -> Self {
        Self::new(
            Severity::Error,
            "wrong_parent_location_type",
            "Wrong parent location type",
            "stops.txt",
            format!(
                "Location of type {} has parent `{}` of type {}, expected type {}",
                location_type, parent_station, parent_location_type, expected_location_type
            ),
        )
        .with_entity_id(Some(stop_id))
        .with_extension("locationType", location_type)
        .with_extension("parentId", parent_station)
        .with_extension("parentLocationType", parent_location_type)
        .with_extension("expectedLocationType", expected_location_type)
    }

    /// A second row reuses the identity of an already loaded entity
    pub fn duplicated_entity(filename: &str, identity: &Identity) -> Self {
        let field_name = identity
            .parts()
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("+");
        let notice = Self::new(
            Severity::Error,
            "duplicated_entity",
            "Duplicated entity",
            filename,
            format!("Another entity with the same `{}` already exists", field_name),
        )
        .with_extension("fieldName", field_name);
        match identity.parts() {
            [(_, value)] => notice.with_entity_id(Some(value.as_str())),
            parts => notice.with_composite_key(parts.iter().map(|(name, value)| (*name, value.as_str()))),
        }
    }

    pub fn decreasing_shape_distance(
        shape_id: &str,
        sequence: i64,
        distance: f64,
        previous_sequence: i64,
        previous_distance: f64,
    ) -> Self {
        Self::new(
            Severity::Error,
            "decreasing_shape_distance",
            "Decreasing shape distance",
            "shapes.txt",
            format!(
                "shape_dist_traveled {} at sequence {} is not greater than {} at sequence {}",
                distance, sequence, previous_distance, previous_sequence
            ),
        )
        .with_entity_id(Some(shape_id))
        .with_extension("shapePtSequence", sequence)
        .with_extension("shapeDistTraveled", distance)
        .with_extension("previousShapePtSequence", previous_sequence)
        .with_extension("previousShapeDistTraveled", previous_distance)
    }

    pub fn decreasing_stop_time_distance(
        trip_id: &str,
        sequence: i64,
        distance: f64,
        previous_sequence: i64,
        previous_distance: f64,
    ) -> Self {
        Self::new(
            Severity::Error,
            "decreasing_stop_time_distance",
            "Decreasing stop time distance",
            "stop_times.txt",
            format!(
                "shape_dist_traveled {} at stop_sequence {} is not greater than {} at stop_sequence {}",
                distance, sequence, previous_distance, previous_sequence
            ),
        )
        .with_composite_key([
            ("trip_id", Value::from(trip_id)),
            ("stop_sequence", Value::from(sequence)),
        ])
        .with_extension("stopSequence", sequence)
        .with_extension("shapeDistTraveled", distance)
        .with_extension("previousStopSequence", previous_sequence)
        .with_extension("previousShapeDistTraveled", previous_distance)
    }

    /// `arrival_time` of a stop is before the `departure_time` of the stop at `stop_sequence`
    pub fn backwards_time_travel(
        trip_id: &str,
        stop_sequence: i64,
        next_stop_sequence: i64,
        arrival_time: String,
        departure_time: String,
    ) -> Self {
        Self::new(
            Severity::Error,
            "backwards_time_travel",
            "Backwards time travel between stops",
            "stop_times.txt",
            format!(
                "Vehicle arrives at stop_sequence {} at {}, before leaving stop_sequence {} at {}",
                next_stop_sequence, arrival_time, stop_sequence, departure_time
            ),
        )
        .with_composite_key([
            ("trip_id", Value::from(trip_id)),
            ("stop_sequence", Value::from(stop_sequence)),
        ])
        .with_extension("stopTimeStopSequence", stop_sequence)
        .with_extension("nextStopTimeStopSequence", next_stop_sequence)
        .with_extension("stopTimeArrivalTime", arrival_time)
        .with_extension("stopTimeDepartureTime", departure_time)
    }

    pub fn arrival_time_after_departure_time(
        trip_id: &str,
        stop_sequence: i64,
        arrival_time: String,
        departure_time: String,
    ) -> Self {
        Self::new(
            Severity::Error,
            "arrival_time_after_departure_time",
            "Arrival time after departure time",
            "stop_times.txt",
            format!(
                "arrival_time {} is after departure_time {}",
                arrival_time, departure_time
            ),
        )
        .with_composite_key([
            ("trip_id", Value::from(trip_id)),
            ("stop_sequence", Value::from(stop_sequence)),
        ])
        .with_extension("stopTimeArrivalTime", arrival_time)
        .with_extension("stopTimeDepartureTime", departure_time)
    }

    /// Describes the operating window of two trips of the same block that overlap
    pub fn block_trips_with_overlapping_stop_times(
        block_id: &str,
        trip: (&str, String, String),
        previous_trip: (&str, String, String),
    ) -> Self {
        let (trip_id, first_time, last_time) = trip;
        let (previous_trip_id, previous_first_time, previous_last_time) = previous_trip;
        Self::new(
            Severity::Error,
            "block_trips_with_overlapping_stop_times",
            "Block trips with overlapping stop times",
            "trips.txt",
            format!(
                "Trips `{}` and `{}` of block `{}` are operated at the same time",
                previous_trip_id, trip_id, block_id
            ),
        )
        .with_entity_id(Some(trip_id))
        .with_extension("tripId", trip_id)
        .with_extension("previousTripId", previous_trip_id)
        .with_extension("blockId", block_id)
        .with_extension("tripFirstTime", first_time)
        .with_extension("tripLastTime", last_time)
        .with_extension("previousTripFirstTime", previous_first_time)
        .with_extension("previousTripLastTime", previous_last_time)
    }

    pub fn agency_lang_and_feed_lang_mismatch(
        agency_id: Option<&str>,
        agency_name: &str,
        agency_lang: Option<&str>,
        feed_lang: &str,
    ) -> Self {
        Self::new(
            Severity::Error,
            "agency_lang_and_feed_lang_mismatch",
            "Mismatching feed and agency language",
            "feed_info.txt",
            format!(
                "Agency `{}` uses language `{}` while the feed declares `{}`",
                agency_name,
                agency_lang.unwrap_or_default(),
                feed_lang
            ),
        )
        .with_entity_id(agency_id)
        .with_extension("agencyName", agency_name)
        .with_extension("agencyAgencyLang", agency_lang.unwrap_or_default())
        .with_extension("feedInfoFeedLang", feed_lang)
    }

    /// Two frequency periods of a trip share some time. Times are rendered by the codec
    pub fn overlapping_trip_frequencies(
        trip_id: &str,
        frequency: (String, String),
        previous_frequency: (String, String),
    ) -> Self {
        let (start_time, end_time) = frequency;
        let (previous_start_time, previous_end_time) = previous_frequency;
        Self::new(
            Severity::Error,
            "overlapping_trip_frequencies",
            "Overlapping frequencies",
            "frequencies.txt",
            format!(
                "Trip `{}` has frequencies {}-{} and {}-{} overlapping",
                trip_id, previous_start_time, previous_end_time, start_time, end_time
            ),
        )
        .with_entity_id(Some(trip_id))
        .with_composite_key([
            ("trip_id", Value::from(trip_id)),
            ("start_time", Value::from(start_time.as_str())),
        ])
        .with_extension("frequencyStartTime", start_time)
        .with_extension("frequencyEndTime", end_time)
        .with_extension("previousFrequencyStartTime", previous_start_time)
        .with_extension("previousFrequencyEndTime", previous_end_time)
    }

    pub fn suspicious_min_transfer_time(
        from_stop_id: &str,
        to_stop_id: &str,
        range: &std::ops::RangeInclusive<i64>,
        actual: i64,
    ) -> Self {
        Self::new(
            Severity::Warning,
            "suspicious_min_transfer_time",
            "Suspicious minimum transfer time",
            "transfers.txt",
            format!(
                "Transfer from `{}` to `{}` takes {} seconds, expected between {} and {}",
                from_stop_id,
                to_stop_id,
                actual,
                range.start(),
                range.end()
            ),
        )
        .with_composite_key([
            ("from_stop_id", from_stop_id),
            ("to_stop_id", to_stop_id),
        ])
        .with_extension("rangeMin", *range.start())
        .with_extension("rangeMax", *range.end())
        .with_extension("actualValue", actual)
    }

    /// A trip with `shape_dist_traveled` in its stop times references a shape without points
    pub fn non_existing_shape(trip_id: &str, stop_sequence: i64, shape_id: &str) -> Self {
        Self::new(
            Severity::Error,
            "non_existing_shape",
            "Non existing shape",
            "stop_times.txt",
            format!(
                "Trip `{}` gives distances along shape `{}` which has no point",
                trip_id, shape_id
            ),
        )
        .with_entity_id(Some(trip_id))
        .with_composite_key([
            ("trip_id", Value::from(trip_id)),
            ("stop_sequence", Value::from(stop_sequence)),
        ])
        .with_extension("fieldName", "shape_id")
        .with_extension("shapeId", shape_id)
    }

    pub fn route_color_and_text_insufficient_contrast(route_id: &str, contrast_ratio: f64) -> Self {
        Self::new(
            Severity::Error,
            "route_color_and_text_insufficient_contrast",
            "Insufficient contrast between route colors",
            "routes.txt",
            format!(
                "route_color and route_text_color have a contrast ratio of {:.2}",
                contrast_ratio
            ),
        )
        .with_entity_id(Some(route_id))
        .with_extension("contrastRatio", contrast_ratio)
    }

    /// The vehicle would travel faster than any vehicle can between the listed stops
    pub fn fast_travel_between_stops(trip_id: &str, speed_kmh: f64, stop_sequences: &[u32]) -> Self {
        Self::new(
            Severity::Error,
            "fast_travel_between_stops",
            "Fast travel between stops",
            "stop_times.txt",
            format!(
                "Trip `{}` travels at {:.0} km/h between stop_sequences {:?}",
                trip_id, speed_kmh, stop_sequences
            ),
        )
        .with_entity_id(Some(trip_id))
        .with_extension("speedKmh", speed_kmh)
        .with_extension("stopSequenceList", stop_sequences.to_vec())
    }
}

/// Append-only sink accumulating every notice of a validation run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NoticeContainer {
    notices: Vec<Notice>,
}

impl NoticeContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn extend(&mut self, notices: impl IntoIterator<Item = Notice>) {
        self.notices.extend(notices);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Number of notices of the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.notices.iter().filter(|n| n.severity == severity).count()
    }

    pub fn into_vec(self) -> Vec<Notice> {
        self.notices
    }
}

impl<'a> IntoIterator for &'a NoticeContainer {
    type Item = &'a Notice;
    type IntoIter = std::slice::Iter<'a, Notice>;

    fn into_iter(self) -> Self::IntoIter {
        self.notices.iter()
    }
}
