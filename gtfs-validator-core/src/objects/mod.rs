//! Typed GTFS entities and their identities
mod network;
mod schedule;
mod service;

pub use network::*;
pub use schedule::*;
pub use service::*;

use crate::Error;
use std::fmt;

/// The files of a feed that the validator turns into entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GtfsFile {
    Agency,
    Stops,
    Routes,
    Trips,
    StopTimes,
    Calendar,
    CalendarDates,
    FareAttributes,
    FareRules,
    Shapes,
    Frequencies,
    Transfers,
    Pathways,
    Levels,
    FeedInfo,
    Translations,
}

impl GtfsFile {
    /// Every file, in loading order
    pub const ALL: [GtfsFile; 16] = [
        GtfsFile::Agency,
        GtfsFile::Stops,
        GtfsFile::Routes,
        GtfsFile::Trips,
        GtfsFile::StopTimes,
        GtfsFile::Calendar,
        GtfsFile::CalendarDates,
        GtfsFile::FareAttributes,
        GtfsFile::FareRules,
        GtfsFile::Shapes,
        GtfsFile::Frequencies,
        GtfsFile::Transfers,
        GtfsFile::Pathways,
        GtfsFile::Levels,
        GtfsFile::FeedInfo,
        GtfsFile::Translations,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            GtfsFile::Agency => "agency.txt",
            GtfsFile::Stops => "stops.txt",
            GtfsFile::Routes => "routes.txt",
            GtfsFile::Trips => "trips.txt",
            GtfsFile::StopTimes => "stop_times.txt",
            GtfsFile::Calendar => "calendar.txt",
            GtfsFile::CalendarDates => "calendar_dates.txt",
            GtfsFile::FareAttributes => "fare_attributes.txt",
            GtfsFile::FareRules => "fare_rules.txt",
            GtfsFile::Shapes => "shapes.txt",
            GtfsFile::Frequencies => "frequencies.txt",
            GtfsFile::Transfers => "transfers.txt",
            GtfsFile::Pathways => "pathways.txt",
            GtfsFile::Levels => "levels.txt",
            GtfsFile::FeedInfo => "feed_info.txt",
            GtfsFile::Translations => "translations.txt",
        }
    }

    pub fn from_file_name(name: &str) -> Result<Self, Error> {
        GtfsFile::ALL
            .iter()
            .copied()
            .find(|f| f.file_name() == name)
            .ok_or_else(|| Error::UnknownFile(name.to_owned()))
    }

    /// Files that must be in every feed. `calendar.txt` is only conditionally required
    pub fn is_required(self) -> bool {
        matches!(
            self,
            GtfsFile::Agency
                | GtfsFile::Stops
                | GtfsFile::Routes
                | GtfsFile::Trips
                | GtfsFile::StopTimes
        )
    }
}

impl fmt::Display for GtfsFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// The field(s) that must be unique for one entity kind within a feed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    parts: Vec<(&'static str, String)>,
}

impl Identity {
    /// Entities stored without deduplication
    pub fn none() -> Self {
        Self { parts: Vec::new() }
    }

    pub fn single(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            parts: vec![(field, value.into())],
        }
    }

    pub fn composite(parts: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        Self {
            parts: parts.into_iter().collect(),
        }
    }

    pub fn parts(&self) -> &[(&'static str, String)] {
        &self.parts
    }

    pub fn is_none(&self) -> bool {
        self.parts.is_empty()
    }

    /// The values making the identity, `None` when the entity has no identity
    pub fn key(&self) -> Option<Vec<String>> {
        if self.is_none() {
            None
        } else {
            Some(self.parts.iter().map(|(_, v)| v.clone()).collect())
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self
            .parts
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// A validated record stored in the repository
pub trait Entity {
    /// The file the entity is read from
    const FILE: GtfsFile;
    fn identity(&self) -> Identity;
}
