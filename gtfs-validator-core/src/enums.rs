//! Closed sets of values used by GTFS integer fields

/// An enumeration encoded as an integer in a GTFS file
pub trait GtfsEnum: Sized + Copy {
    /// `None` when the code is not part of the enumeration
    fn from_code(code: i64) -> Option<Self>;
    fn code(self) -> i64;
}

macro_rules! gtfs_enum {
    ($name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        impl GtfsEnum for $name {
            fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code,)+
                }
            }
        }
    };
}

/// Describes the kind of location in `stops.txt`. See <https://gtfs.org/reference/static/#stopstxt> `location_type`
#[derive(Derivative, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[derivative(Default(bound = ""))]
pub enum LocationType {
    /// Stop (or Platform). A location where passengers board or disembark from a transit vehicle. Is called a platform when defined within a parent_station
    #[derivative(Default)]
    StopOrPlatform,
    /// Station. A physical structure or area that contains one or more platform
    Station,
    /// A location where passengers can enter or exit a station from the street
    Entrance,
    /// A location within a station, not matching any other location type, used to link together pathways
    GenericNode,
    /// A specific location on a platform, where passengers can board and/or alight vehicles
    BoardingArea,
}

gtfs_enum!(LocationType {
    StopOrPlatform = 0,
    Station = 1,
    Entrance = 2,
    GenericNode = 3,
    BoardingArea = 4,
});

/// Describes the kind of route. See <https://gtfs.org/reference/static/#routestxt> `route_type`
///
/// Some route types are extended GTFS (<https://developers.google.com/transit/gtfs/reference/extended-route-types>)
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[derivative(Default(bound = ""))]
pub enum RouteType {
    /// Tram, Streetcar, Light rail. Any light rail or street level system within a metropolitan area
    Tramway,
    /// Subway, Metro. Any underground rail system within a metropolitan area
    Subway,
    /// Used for intercity or long-distance travel
    Rail,
    /// Used for short- and long-distance bus routes
    #[derivative(Default)]
    Bus,
    /// Used for short- and long-distance boat service
    Ferry,
    /// Used for street-level rail cars where the cable runs beneath the vehicle
    CableCar,
    /// Aerial lift, suspended cable car
    Gondola,
    /// Any rail system designed for steep inclines
    Funicular,
    /// Electric buses that draw power from overhead wires using poles
    Trolleybus,
    /// Railway in which the track consists of a single rail or a beam
    Monorail,
    /// (extended) Used for intercity bus services
    Coach,
    /// (extended) Airplanes
    Air,
    /// (extended) Taxi, Cab
    Taxi,
    /// (extended) any other value of the extended range
    Other(i32),
}

impl GtfsEnum for RouteType {
    fn from_code(code: i64) -> Option<Self> {
        let i = i32::try_from(code).ok()?;
        let hundreds = i / 100;
        Some(match (i, hundreds) {
            (0, _) | (_, 9) => RouteType::Tramway,
            (1, _) | (_, 4) => RouteType::Subway,
            (2, _) | (_, 1) => RouteType::Rail,
            (3, _) | (_, 7) | (_, 8) => RouteType::Bus,
            (4, _) | (_, 10) | (_, 12) => RouteType::Ferry,
            (5, _) => RouteType::CableCar,
            (6, _) | (_, 13) => RouteType::Gondola,
            (7, _) | (_, 14) => RouteType::Funicular,
            (11, _) => RouteType::Trolleybus,
            (12, _) => RouteType::Monorail,
            (_, 2) => RouteType::Coach,
            (_, 11) => RouteType::Air,
            (_, 15) => RouteType::Taxi,
            (_, 3) | (_, 5) | (_, 6) | (_, 16) | (_, 17) => RouteType::Other(i),
            _ => return None,
        })
    }

    fn code(self) -> i64 {
        // Note: for extended route type, we might loose the initial precise route type
        match self {
            RouteType::Tramway => 0,
            RouteType::Subway => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableCar => 5,
            RouteType::Gondola => 6,
            RouteType::Funicular => 7,
            RouteType::Trolleybus => 11,
            RouteType::Monorail => 12,
            RouteType::Coach => 200,
            RouteType::Air => 1100,
            RouteType::Taxi => 1500,
            RouteType::Other(i) => i as i64,
        }
    }
}

/// Describes if and how a traveller can board or alight the vehicle. See <https://gtfs.org/reference/static/#stop_timestxt> `pickup_type` and `dropoff_type`
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[derivative(Default(bound = ""))]
pub enum PickupDropOffType {
    /// Regularly scheduled pickup or drop off (default when empty).
    #[derivative(Default)]
    Regular,
    /// No pickup or drop off available.
    NotAvailable,
    /// Must phone agency to arrange pickup or drop off.
    ArrangeByPhone,
    /// Must coordinate with driver to arrange pickup or drop off.
    CoordinateWithDriver,
}

gtfs_enum!(PickupDropOffType {
    Regular = 0,
    NotAvailable = 1,
    ArrangeByPhone = 2,
    CoordinateWithDriver = 3,
});

/// Indicates whether a rider can board the transit vehicle anywhere along the vehicle’s travel path
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[derivative(Default(bound = ""))]
pub enum ContinuousPickupDropOff {
    /// Continuous stopping pickup or drop off.
    Continuous,
    /// No continuous stopping pickup or drop off (default when empty).
    #[derivative(Default)]
    NotAvailable,
    /// Must phone agency to arrange continuous stopping pickup or drop off.
    ArrangeByPhone,
    /// Must coordinate with driver to arrange continuous stopping pickup or drop off.
    CoordinateWithDriver,
}

gtfs_enum!(ContinuousPickupDropOff {
    Continuous = 0,
    NotAvailable = 1,
    ArrangeByPhone = 2,
    CoordinateWithDriver = 3,
});

/// Describes if the stop time is exact or not. See <https://gtfs.org/reference/static/#stop_timestxt> `timepoint`
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[derivative(Default(bound = ""))]
pub enum TimepointType {
    /// Times are considered approximate
    Approximate,
    /// Times are considered exact
    #[derivative(Default)]
    Exact,
}

gtfs_enum!(TimepointType {
    Approximate = 0,
    Exact = 1,
});

/// Generic enum to define if a service (like wheelchair boarding) is available
#[derive(Debug, Derivative, PartialEq, Eq, Hash, Clone, Copy, Serialize)]
#[derivative(Default)]
pub enum Availability {
    /// No information if the service is available
    #[derivative(Default)]
    InformationNotAvailable,
    /// The service is available
    Available,
    /// The service is not available
    NotAvailable,
}

gtfs_enum!(Availability {
    InformationNotAvailable = 0,
    Available = 1,
    NotAvailable = 2,
});

/// Defines if a calendar date is added or deleted from a calendar
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Exception {
    /// There will be a service on that day
    Added,
    /// There won’t be a service on that day
    Deleted,
}

gtfs_enum!(Exception {
    Added = 1,
    Deleted = 2,
});

/// Defines the direction of a trip, only for display, not for routing. See <https://gtfs.org/reference/static/#tripstxt> `direction_id`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DirectionType {
    /// Travel in one direction (e.g. outbound travel).
    Outbound,
    /// Travel in the opposite direction (e.g. inbound travel).
    Inbound,
}

gtfs_enum!(DirectionType {
    Outbound = 0,
    Inbound = 1,
});

/// Is the trip accessible with a bike. See <https://gtfs.org/reference/static/#tripstxt> `bikes_allowed`
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[derivative(Default)]
pub enum BikesAllowedType {
    /// No bike information for the trip
    #[derivative(Default)]
    NoBikeInfo,
    /// Vehicle being used on this particular trip can accommodate at least one bicycle
    AtLeastOneBike,
    /// No bicycles are allowed on this trip
    NoBikesAllowed,
}

gtfs_enum!(BikesAllowedType {
    NoBikeInfo = 0,
    AtLeastOneBike = 1,
    NoBikesAllowed = 2,
});

/// Defines where a fare can be paid
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PaymentMethod {
    /// Fare is paid on board
    Aboard,
    /// Fare must be paid before boarding
    PreBoarding,
}

gtfs_enum!(PaymentMethod {
    Aboard = 0,
    PreBoarding = 1,
});

/// Defines if the frequency is exact (the vehicle runs exactly every n minutes) or not
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[derivative(Default)]
pub enum ExactTimes {
    /// Frequency-based trips
    #[derivative(Default)]
    FrequencyBased,
    /// Schedule-based trips with the exact same headway throughout the day.
    ScheduleBased,
}

gtfs_enum!(ExactTimes {
    FrequencyBased = 0,
    ScheduleBased = 1,
});

/// Defines how many transfers can be done with a fare. An empty value means unlimited
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Transfers {
    /// No transfers permitted on this fare
    NoTransfer,
    /// Riders may transfer once
    UniqueTransfer,
    /// Riders may transfer twice
    TwoTransfers,
}

gtfs_enum!(Transfers {
    NoTransfer = 0,
    UniqueTransfer = 1,
    TwoTransfers = 2,
});

/// Defines the type of a transfer between two stops
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[derivative(Default)]
pub enum TransferType {
    /// Recommended transfer point between routes
    #[derivative(Default)]
    Recommended,
    /// Departing vehicle waits for arriving one
    Timed,
    /// Transfer requires a minimum amount of time between arrival and departure to ensure a connection.
    MinTime,
    /// Transfer is not possible at this location
    Impossible,
}

gtfs_enum!(TransferType {
    Recommended = 0,
    Timed = 1,
    MinTime = 2,
    Impossible = 3,
});

/// Type of pathway between two locations
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PathwayMode {
    /// A walkway
    Walkway,
    /// Stairs
    Stairs,
    /// Moving sidewalk / travelator
    MovingSidewalk,
    /// Escalator
    Escalator,
    /// Elevator
    Elevator,
    /// A pathway that crosses into an area of the station where a
    /// proof of payment is required (usually via a physical payment gate)
    FareGate,
    /// Indicates a pathway exiting an area where proof-of-payment is required
    /// into an area where proof-of-payment is no longer required.
    ExitGate,
}

gtfs_enum!(PathwayMode {
    Walkway = 1,
    Stairs = 2,
    MovingSidewalk = 3,
    Escalator = 4,
    Elevator = 5,
    FareGate = 6,
    ExitGate = 7,
});

/// Indicates in which direction the pathway can be used
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PathwayDirectionType {
    /// Unidirectional pathway, it can only be used from `from_stop_id` to `to_stop_id`.
    Unidirectional,
    /// Bidirectional pathway, it can be used in the two directions.
    Bidirectional,
}

gtfs_enum!(PathwayDirectionType {
    Unidirectional = 0,
    Bidirectional = 1,
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_route_types() {
        assert_eq!(Some(RouteType::Coach), RouteType::from_code(201));
        assert_eq!(Some(RouteType::Other(1702)), RouteType::from_code(1702));
        assert_eq!(Some(RouteType::Trolleybus), RouteType::from_code(11));
        assert_eq!(None, RouteType::from_code(8));
        assert_eq!(None, RouteType::from_code(-1));
        assert_eq!(None, RouteType::from_code(1800));
    }

    #[test]
    fn codes_outside_enumeration() {
        assert_eq!(None, LocationType::from_code(5));
        assert_eq!(None, Exception::from_code(0));
        assert_eq!(Some(PathwayMode::ExitGate), PathwayMode::from_code(7));
        assert_eq!(4, LocationType::BoardingArea.code());
    }
}
