//! The locations of `stops.txt`, resolved into one variant per `location_type`
use crate::build::{as_integer, BuildResult, FieldValidator};
use crate::enums::{Availability, GtfsEnum, LocationType};
use crate::notice::Notice;
use crate::objects::{Entity, GtfsFile, Identity};
use crate::raw_row::RawRow;
use std::fmt;

/// Fields shared by every kind of location. See <https://gtfs.org/reference/static/#stopstxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationBase {
    /// Unique technical identifier (not for the traveller) of the location
    pub id: String,
    /// Short text or a number that identifies the location for riders
    pub code: Option<String>,
    /// Name of the location. Required for stops, stations and entrances
    pub name: Option<String>,
    /// Description of the location
    pub description: Option<String>,
    /// Latitude of the location. Required for stops, stations and entrances
    pub latitude: Option<f64>,
    /// Longitude of the location. Required for stops, stations and entrances
    pub longitude: Option<f64>,
    /// Identifies the fare zone for a stop
    pub zone_id: Option<String>,
    /// URL of a web page about the location
    pub url: Option<String>,
    /// Timezone of the location
    pub timezone: Option<String>,
    /// Indicates whether wheelchair boardings are possible from the location
    pub wheelchair_boarding: Availability,
    /// Level of the location
    pub level_id: Option<String>,
    /// Platform identifier for a platform stop (a stop belonging to a station)
    pub platform_code: Option<String>,
}

/// A location that can be part of another one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildLocation {
    pub base: LocationBase,
    /// The location containing this one
    pub parent_station: Option<String>,
}

/// A physical location of `stops.txt`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Location {
    /// Where passengers board or disembark from a transit vehicle. A platform when it has a parent station
    StopOrPlatform(ChildLocation),
    /// A structure or area that contains one or more platforms. It has no parent
    Station(LocationBase),
    /// Where passengers can enter or exit a station from the street
    Entrance(ChildLocation),
    /// A location within a station used to link together pathways
    GenericNode(ChildLocation),
    /// A specific location on a platform
    BoardingArea(ChildLocation),
}

/// Reads the discriminant without validating it. Invalid values are reported
/// when the `location_type` field itself is validated.
fn peek_location_type(row: &RawRow) -> LocationType {
    row.get("location_type")
        .and_then(|value| as_integer(value).ok())
        .and_then(LocationType::from_code)
        .unwrap_or_default()
}

impl Location {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let kind = peek_location_type(row);
        let positioned = matches!(
            kind,
            LocationType::StopOrPlatform | LocationType::Station | LocationType::Entrance
        );

        let mut v = FieldValidator::new(Self::FILE, row).identified_by("stop_id");
        let id = v.required_text("stop_id");
        let code = v.optional_text("stop_code");
        let name = if positioned {
            v.required_text("stop_name")
        } else {
            v.optional_text("stop_name")
        };
        let description = v.optional_text("stop_desc");
        let latitude = if positioned {
            v.required_float("stop_lat", -90.0..=90.0)
        } else {
            v.optional_float("stop_lat", -90.0..=90.0)
        };
        let longitude = if positioned {
            v.required_float("stop_lon", -180.0..=180.0)
        } else {
            v.optional_float("stop_lon", -180.0..=180.0)
        };
        let zone_id = v.optional_text("zone_id");
        let url = v.optional_text("stop_url");
        let _: Option<LocationType> = v.optional_enum("location_type");
        let parent_station = match kind {
            LocationType::Station => {
                if let Some(parent) = v.optional_text("parent_station") {
                    v.reject(Notice::station_with_parent_station(v.entity_id(), &parent));
                }
                None
            }
            LocationType::StopOrPlatform => v.optional_text("parent_station"),
            LocationType::Entrance | LocationType::GenericNode | LocationType::BoardingArea => {
                v.required_text("parent_station")
            }
        };
        let timezone = v.optional_text("stop_timezone");
        let wheelchair_boarding = v.enum_or_default("wheelchair_boarding");
        let level_id = v.optional_text("level_id");
        let platform_code = v.optional_text("platform_code");

        v.finish(|| {
            let base = LocationBase {
                id: id?,
                code,
                name,
                description,
                latitude,
                longitude,
                zone_id,
                url,
                timezone,
                wheelchair_boarding,
                level_id,
                platform_code,
            };
            let child = |base| ChildLocation {
                base,
                parent_station,
            };
            Some(match kind {
                LocationType::StopOrPlatform => Location::StopOrPlatform(child(base)),
                LocationType::Station => Location::Station(base),
                LocationType::Entrance => Location::Entrance(child(base)),
                LocationType::GenericNode => Location::GenericNode(child(base)),
                LocationType::BoardingArea => Location::BoardingArea(child(base)),
            })
        })
    }

    pub fn base(&self) -> &LocationBase {
        match self {
            Location::Station(base) => base,
            Location::StopOrPlatform(c)
            | Location::Entrance(c)
            | Location::GenericNode(c)
            | Location::BoardingArea(c) => &c.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn location_type(&self) -> LocationType {
        match self {
            Location::StopOrPlatform(_) => LocationType::StopOrPlatform,
            Location::Station(_) => LocationType::Station,
            Location::Entrance(_) => LocationType::Entrance,
            Location::GenericNode(_) => LocationType::GenericNode,
            Location::BoardingArea(_) => LocationType::BoardingArea,
        }
    }

    /// Stations never have a parent
    pub fn parent_station(&self) -> Option<&str> {
        match self {
            Location::Station(_) => None,
            Location::StopOrPlatform(c)
            | Location::Entrance(c)
            | Location::GenericNode(c)
            | Location::BoardingArea(c) => c.parent_station.as_deref(),
        }
    }

    /// The type a parent of this location must have, if it can have one
    pub fn expected_parent_type(&self) -> Option<LocationType> {
        match self {
            Location::Station(_) => None,
            Location::BoardingArea(_) => Some(LocationType::StopOrPlatform),
            Location::StopOrPlatform(_) | Location::Entrance(_) | Location::GenericNode(_) => {
                Some(LocationType::Station)
            }
        }
    }
}

impl Entity for Location {
    const FILE: GtfsFile = GtfsFile::Stops;

    fn identity(&self) -> Identity {
        Identity::single("stop_id", self.id())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.base().name.as_deref().unwrap_or(self.id()))
    }
}
