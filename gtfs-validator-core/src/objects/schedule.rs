use super::{Entity, GtfsFile, Identity};
use crate::build::{BuildResult, FieldValidator};
use crate::enums::*;
use crate::raw_row::RawRow;
use crate::time_codec::TimeCodec;
use std::fmt;

/// General informations about the agency running the network. See <https://gtfs.org/reference/static/#agencytxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agency {
    /// Unique technical (not for the traveller) identifier for the Agency. Only required when the feed has several agencies
    pub id: Option<String>,
    /// Full name of the transit agency
    pub name: String,
    /// Full url of the transit agency.
    pub url: String,
    /// Timezone where the transit agency is located
    pub timezone: String,
    /// Primary language used by this transit agency
    pub lang: Option<String>,
    /// A voice telephone number for the specified agency
    pub phone: Option<String>,
    /// URL of a web page that allows a rider to purchase tickets or other fare instruments for that agency online
    pub fare_url: Option<String>,
    /// Email address actively monitored by the agency’s customer service department
    pub email: Option<String>,
}

impl Agency {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row).identified_by("agency_id");
        let id = v.optional_text("agency_id");
        let name = v.required_text("agency_name");
        let url = v.required_text("agency_url");
        let timezone = v.required_text("agency_timezone");
        let lang = v.optional_text("agency_lang");
        let phone = v.optional_text("agency_phone");
        let fare_url = v.optional_text("agency_fare_url");
        let email = v.optional_text("agency_email");
        v.finish(|| {
            Some(Agency {
                id,
                name: name?,
                url: url?,
                timezone: timezone?,
                lang,
                phone,
                fare_url,
                email,
            })
        })
    }
}

impl Entity for Agency {
    const FILE: GtfsFile = GtfsFile::Agency;

    fn identity(&self) -> Identity {
        match &self.id {
            Some(id) => Identity::single("agency_id", id.as_str()),
            None => Identity::none(),
        }
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A route is a commercial line (there can be various stop sequences for a same line). See <https://gtfs.org/reference/static/#routestxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Unique technical (not for the traveller) identifier for the route
    pub id: String,
    /// Agency for the specified route
    pub agency_id: Option<String>,
    /// Short name of a route. This will often be a short, abstract identifier like "32", "100X", or "Green"
    pub short_name: Option<String>,
    /// Full name of a route. This name is generally more descriptive than the [Route::short_name]
    pub long_name: Option<String>,
    /// Description of a route that provides useful, quality information
    pub desc: Option<String>,
    /// Indicates the type of transportation used on a route
    pub route_type: RouteType,
    /// URL of a web page about the particular route
    pub url: Option<String>,
    /// Route color designation that matches public facing material, as given in the file
    pub color: Option<String>,
    /// Legible color to use for text drawn against a background of [Route::color]
    pub text_color: Option<String>,
    /// Orders the routes in a way which is ideal for presentation to customers
    pub order: Option<u32>,
    /// Indicates whether a rider can board the transit vehicle anywhere along the vehicle’s travel path
    pub continuous_pickup: ContinuousPickupDropOff,
    /// Indicates whether a rider can alight from the transit vehicle at any point along the vehicle’s travel path
    pub continuous_drop_off: ContinuousPickupDropOff,
}

impl Route {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row).identified_by("route_id");
        let id = v.required_text("route_id");
        let agency_id = v.optional_text("agency_id");
        let short_name = v.optional_text("route_short_name");
        let long_name = v.optional_text("route_long_name");
        let desc = v.optional_text("route_desc");
        let route_type = v.required_enum("route_type");
        let url = v.optional_text("route_url");
        let color = v.optional_text("route_color");
        let text_color = v.optional_text("route_text_color");
        let order = v.optional_integer("route_sort_order", 0..=u32::MAX as i64);
        let continuous_pickup = v.enum_or_default("continuous_pickup");
        let continuous_drop_off = v.enum_or_default("continuous_drop_off");
        v.finish(|| {
            Some(Route {
                id: id?,
                agency_id,
                short_name,
                long_name,
                desc,
                route_type: route_type?,
                url,
                color,
                text_color,
                order: order.map(|o| o as u32),
                continuous_pickup,
                continuous_drop_off,
            })
        })
    }
}

impl Entity for Route {
    const FILE: GtfsFile = GtfsFile::Routes;

    fn identity(&self) -> Identity {
        Identity::single("route_id", self.id.as_str())
    }
}

/// A trip is a vehicle that follows a sequence of stop times on certain days. See <https://gtfs.org/reference/static/#tripstxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    /// Unique technical identifier (not for the traveller) for the Trip
    pub id: String,
    /// References the calendar (service_id) on which this trip runs
    pub service_id: String,
    /// References along which [Route] this trip runs
    pub route_id: String,
    /// Shape of the trip
    pub shape_id: Option<String>,
    /// Text that appears on signage identifying the trip's destination to riders
    pub trip_headsign: Option<String>,
    /// Public facing text used to identify the trip to riders, for instance, to identify train numbers for commuter rail trips
    pub trip_short_name: Option<String>,
    /// Indicates the direction of travel for a trip. This field is not used in routing; it provides a way to separate trips by direction when publishing time tables
    pub direction_id: Option<DirectionType>,
    /// Identifies the block to which the trip belongs. A block consists of a single trip or many sequential trips made using the same vehicle
    pub block_id: Option<String>,
    /// Indicates wheelchair accessibility
    pub wheelchair_accessible: Availability,
    /// Indicates whether bikes are allowed
    pub bikes_allowed: BikesAllowedType,
}

impl Trip {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row).identified_by("trip_id");
        let route_id = v.required_text("route_id");
        let service_id = v.required_text("service_id");
        let id = v.required_text("trip_id");
        let trip_headsign = v.optional_text("trip_headsign");
        let trip_short_name = v.optional_text("trip_short_name");
        let direction_id = v.optional_enum("direction_id");
        let block_id = v.optional_text("block_id");
        let shape_id = v.optional_text("shape_id");
        let wheelchair_accessible = v.enum_or_default("wheelchair_accessible");
        let bikes_allowed = v.enum_or_default("bikes_allowed");
        v.finish(|| {
            Some(Trip {
                id: id?,
                service_id: service_id?,
                route_id: route_id?,
                shape_id,
                trip_headsign,
                trip_short_name,
                direction_id,
                block_id,
                wheelchair_accessible,
                bikes_allowed,
            })
        })
    }
}

impl Entity for Trip {
    const FILE: GtfsFile = GtfsFile::Trips;

    fn identity(&self) -> Identity {
        Identity::single("trip_id", self.id.as_str())
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Trip route id: {}, service id: {}",
            self.route_id, self.service_id
        )
    }
}

/// The moment where a vehicle, running on [Trip] stops at a location. See <https://gtfs.org/reference/static/#stoptimestxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopTime {
    /// [Trip] to which this stop time belongs to
    pub trip_id: String,
    /// Arrival time of the stop time, as an offset of the time codec
    pub arrival_time: Option<i32>,
    /// Departure time of the stop time, as an offset of the time codec
    pub departure_time: Option<i32>,
    /// Identifier of the location where the vehicle stops
    pub stop_id: String,
    /// Order of stops for a particular trip. The values must increase along the trip but do not need to be consecutive
    pub stop_sequence: u32,
    /// Text that appears on signage identifying the trip's destination to riders
    pub stop_headsign: Option<String>,
    /// Indicates pickup method
    pub pickup_type: PickupDropOffType,
    /// Indicates drop off method
    pub drop_off_type: PickupDropOffType,
    /// Indicates whether a rider can board the transit vehicle anywhere along the vehicle’s travel path
    pub continuous_pickup: ContinuousPickupDropOff,
    /// Indicates whether a rider can alight from the transit vehicle at any point along the vehicle’s travel path
    pub continuous_drop_off: ContinuousPickupDropOff,
    /// Actual distance traveled along the associated shape, from the first stop to the stop specified in this record
    pub shape_dist_traveled: Option<f64>,
    /// Indicates if arrival and departure times for a stop are strictly adhered to by the vehicle or if they are instead approximate and/or interpolated times
    pub timepoint: TimepointType,
}

impl StopTime {
    pub fn build(row: &RawRow, codec: &dyn TimeCodec) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row);
        let trip_id = v.required_text("trip_id");
        let arrival_time = v.optional_time("arrival_time", codec);
        let departure_time = v.optional_time("departure_time", codec);
        let stop_id = v.required_text("stop_id");
        let stop_sequence = v.required_integer("stop_sequence", 0..=u32::MAX as i64);
        let stop_headsign = v.optional_text("stop_headsign");
        let pickup_type = v.enum_or_default("pickup_type");
        let drop_off_type = v.enum_or_default("drop_off_type");
        let continuous_pickup = v.enum_or_default("continuous_pickup");
        let continuous_drop_off = v.enum_or_default("continuous_drop_off");
        let shape_dist_traveled = v.optional_float("shape_dist_traveled", 0.0..=f64::MAX);
        let timepoint = v.enum_or_default("timepoint");
        v.finish(|| {
            Some(StopTime {
                trip_id: trip_id?,
                arrival_time,
                departure_time,
                stop_id: stop_id?,
                stop_sequence: stop_sequence? as u32,
                stop_headsign,
                pickup_type,
                drop_off_type,
                continuous_pickup,
                continuous_drop_off,
                shape_dist_traveled,
                timepoint,
            })
        })
    }
}

impl Entity for StopTime {
    const FILE: GtfsFile = GtfsFile::StopTimes;

    fn identity(&self) -> Identity {
        Identity::composite([
            ("trip_id", self.trip_id.clone()),
            ("stop_sequence", self.stop_sequence.to_string()),
        ])
    }
}

/// A single geographical point describing the shape of a [Trip]. See <https://gtfs.org/reference/static/#shapestxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    /// Unique technical (not for the traveller) identifier for the Shape
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Sequence in which the shape points connect to form the shape. Values increase along the trip but do not need to be consecutive.
    pub sequence: u32,
    /// Actual distance traveled along the shape from the first shape point to the point specified in this record
    pub dist_traveled: Option<f64>,
}

impl Shape {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row).identified_by("shape_id");
        let id = v.required_text("shape_id");
        let latitude = v.required_float("shape_pt_lat", -90.0..=90.0);
        let longitude = v.required_float("shape_pt_lon", -180.0..=180.0);
        let sequence = v.required_integer("shape_pt_sequence", 0..=u32::MAX as i64);
        let dist_traveled = v.optional_float("shape_dist_traveled", 0.0..=f64::MAX);
        v.finish(|| {
            Some(Shape {
                id: id?,
                latitude: latitude?,
                longitude: longitude?,
                sequence: sequence? as u32,
                dist_traveled,
            })
        })
    }
}

/// Shape points are only appended: their ordering is checked after loading
impl Entity for Shape {
    const FILE: GtfsFile = GtfsFile::Shapes;

    fn identity(&self) -> Identity {
        Identity::none()
    }
}

/// Timetables can be defined by the frequency of their vehicles. See <<https://gtfs.org/reference/static/#frequenciestxt>>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frequency {
    /// References the [Trip] that uses frequency
    pub trip_id: String,
    /// Time at which the first vehicle departs from the first stop of the trip
    pub start_time: i32,
    /// Time at which service changes to a different headway (or ceases) at the first stop in the trip
    pub end_time: i32,
    /// Time, in seconds, between departures from the same stop (headway) for the trip, during the time interval specified by start_time and end_time
    pub headway_secs: u32,
    /// Indicates the type of service for a trip
    pub exact_times: ExactTimes,
}

impl Frequency {
    pub fn build(row: &RawRow, codec: &dyn TimeCodec) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row);
        let trip_id = v.required_text("trip_id");
        let start_time = v.required_time("start_time", codec);
        let end_time = v.required_time("end_time", codec);
        let headway_secs = v.required_integer("headway_secs", 1..=u32::MAX as i64);
        let exact_times = v.enum_or_default("exact_times");
        v.finish(|| {
            Some(Frequency {
                trip_id: trip_id?,
                start_time: start_time?,
                end_time: end_time?,
                headway_secs: headway_secs? as u32,
                exact_times,
            })
        })
    }
}

impl Entity for Frequency {
    const FILE: GtfsFile = GtfsFile::Frequencies;

    fn identity(&self) -> Identity {
        Identity::composite([
            ("trip_id", self.trip_id.clone()),
            ("start_time", self.start_time.to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_codec::HhMmSsCodec;
    use serde_json::Value;

    #[test]
    fn stop_time_with_one_broken_rule() {
        let row = RawRow::new()
            .with("trip_id", "t1")
            .with("arrival_time", "08:00:00")
            .with("departure_time", "08:01:00")
            .with("stop_id", "s1")
            .with("stop_sequence", "1")
            .with("pickup_type", "9");
        let result = StopTime::build(&row, &HhMmSsCodec);
        let notices = result.notices();
        assert_eq!(1, notices.len());
        assert_eq!("unexpected_enum_value", notices[0].code);
        assert_eq!(Some(&Value::from("pickup_type")), notices[0].extension("fieldName"));
    }

    #[test]
    fn stop_time_identity() {
        let row = RawRow::new()
            .with("trip_id", "t1")
            .with("stop_id", "s1")
            .with("stop_sequence", 4);
        let stop_time = StopTime::build(&row, &HhMmSsCodec).into_result().unwrap();
        assert_eq!(None, stop_time.arrival_time);
        assert_eq!(PickupDropOffType::Regular, stop_time.pickup_type);
        assert_eq!(
            Some(vec!["t1".to_owned(), "4".to_owned()]),
            stop_time.identity().key()
        );
    }

    #[test]
    fn agency_without_id_has_no_identity() {
        let row = RawRow::new()
            .with("agency_name", "BIBUS")
            .with("agency_url", "http://www.bibus.fr")
            .with("agency_timezone", "Europe/Paris");
        let agency = Agency::build(&row).into_result().unwrap();
        assert!(agency.identity().is_none());
    }

    #[test]
    fn route_requires_type() {
        let row = RawRow::new().with("route_id", "r1").with("route_short_name", "1");
        let result = Route::build(&row);
        assert_eq!(1, result.notices().len());
        assert_eq!("r1", result.notices()[0].entity_id);
        assert_eq!(Some(&Value::from("route_type")), result.notices()[0].extension("fieldName"));
    }

    #[test]
    fn frequency_headway_must_be_positive() {
        let row = RawRow::new()
            .with("trip_id", "t1")
            .with("start_time", "06:00:00")
            .with("end_time", "22:00:00")
            .with("headway_secs", 0);
        let result = Frequency::build(&row, &HhMmSsCodec);
        assert_eq!(vec!["integer_out_of_range"], result.notices().iter().map(|n| n.code).collect::<Vec<_>>());
    }

    #[test]
    fn agency_with_one_broken_rule() {
        let row = RawRow::new()
            .with("agency_id", "ag")
            .with("agency_url", "http://www.bibus.fr")
            .with("agency_timezone", "Europe/Paris");
        let result = Agency::build(&row);
        let notices = result.notices();
        assert_eq!(1, notices.len());
        assert_eq!("missing_required_value", notices[0].code);
        assert_eq!("ag", notices[0].entity_id);
        assert_eq!(Some(&Value::from("agency_name")), notices[0].extension("fieldName"));
    }

    #[test]
    fn shape_with_one_broken_rule() {
        let row = RawRow::new()
            .with("shape_id", "sh1")
            .with("shape_pt_lat", 95.0)
            .with("shape_pt_lon", -4.48)
            .with("shape_pt_sequence", 1);
        let result = Shape::build(&row);
        let notices = result.notices();
        assert_eq!(1, notices.len());
        assert_eq!("float_out_of_range", notices[0].code);
        assert_eq!("sh1", notices[0].entity_id);
        assert_eq!(Some(&Value::from("shape_pt_lat")), notices[0].extension("fieldName"));
    }
}
