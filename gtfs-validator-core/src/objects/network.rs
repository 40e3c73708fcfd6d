use super::{Entity, GtfsFile, Identity};
use crate::build::{BuildResult, FieldValidator};
use crate::enums::*;
use crate::raw_row::RawRow;

/// Transfer information between stops. See <https://gtfs.org/reference/static/#transferstxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    /// Location where a connection between routes begins
    pub from_stop_id: String,
    /// Location where a connection between routes ends
    pub to_stop_id: String,
    /// Type of the transfer
    pub transfer_type: TransferType,
    /// Minimum time needed to make the transfer in seconds
    pub min_transfer_time: Option<u32>,
}

impl Transfer {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row);
        let from_stop_id = v.required_text("from_stop_id");
        let to_stop_id = v.required_text("to_stop_id");
        let transfer_type = v.enum_or_default("transfer_type");
        let min_transfer_time = v.optional_integer("min_transfer_time", 0..=u32::MAX as i64);
        v.finish(|| {
            Some(Transfer {
                from_stop_id: from_stop_id?,
                to_stop_id: to_stop_id?,
                transfer_type,
                min_transfer_time: min_transfer_time.map(|t| t as u32),
            })
        })
    }
}

impl Entity for Transfer {
    const FILE: GtfsFile = GtfsFile::Transfers;

    fn identity(&self) -> Identity {
        Identity::composite([
            ("from_stop_id", self.from_stop_id.clone()),
            ("to_stop_id", self.to_stop_id.clone()),
        ])
    }
}

/// Pathway going from a location to another. See <https://gtfs.org/reference/static/#pathwaystxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pathway {
    /// Uniquely identifies the pathway
    pub id: String,
    /// Location at which the pathway begins
    pub from_stop_id: String,
    /// Location at which the pathway ends
    pub to_stop_id: String,
    /// Type of pathway between the specified (from_stop_id, to_stop_id) pair
    pub mode: PathwayMode,
    /// Indicates in which direction the pathway can be used
    pub is_bidirectional: PathwayDirectionType,
    /// Horizontal length in meters of the pathway from the origin location to the destination location
    pub length: Option<f64>,
    /// Average time in seconds needed to walk through the pathway from the origin location to the destination location
    pub traversal_time: Option<u32>,
    /// Number of stairs of the pathway, negative when going down
    pub stair_count: Option<i32>,
    /// Maximum slope ratio of the pathway
    pub max_slope: Option<f64>,
    /// Minimum width of the pathway in meters
    pub min_width: Option<f64>,
    /// Text from physical signage visible to transit riders
    pub signposted_as: Option<String>,
    /// Same than the signposted_as field, but when the pathways is used backward
    pub reversed_signposted_as: Option<String>,
}

impl Pathway {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row).identified_by("pathway_id");
        let id = v.required_text("pathway_id");
        let from_stop_id = v.required_text("from_stop_id");
        let to_stop_id = v.required_text("to_stop_id");
        let mode = v.required_enum("pathway_mode");
        let is_bidirectional = v.required_enum("is_bidirectional");
        let length = v.optional_float("length", 0.0..=f64::MAX);
        let traversal_time = v.optional_integer("traversal_time", 1..=u32::MAX as i64);
        let stair_count = v.optional_integer("stair_count", i32::MIN as i64..=i32::MAX as i64);
        let max_slope = v.optional_float("max_slope", f64::MIN..=f64::MAX);
        let min_width = v.optional_float("min_width", 0.0..=f64::MAX);
        let signposted_as = v.optional_text("signposted_as");
        let reversed_signposted_as = v.optional_text("reversed_signposted_as");
        v.finish(|| {
            Some(Pathway {
                id: id?,
                from_stop_id: from_stop_id?,
                to_stop_id: to_stop_id?,
                mode: mode?,
                is_bidirectional: is_bidirectional?,
                length,
                traversal_time: traversal_time.map(|t| t as u32),
                stair_count: stair_count.map(|c| c as i32),
                max_slope,
                min_width,
                signposted_as,
                reversed_signposted_as,
            })
        })
    }
}

impl Entity for Pathway {
    const FILE: GtfsFile = GtfsFile::Pathways;

    fn identity(&self) -> Identity {
        Identity::single("pathway_id", self.id.as_str())
    }
}

/// A level within a station. See <https://gtfs.org/reference/static/#levelstxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    /// Unique technical identifier of the level
    pub id: String,
    /// Numeric index of the level that indicates relative position of this level in relation to other levels (levels with higher indices are assumed to be located above levels with lower indices)
    pub index: f64,
    /// Name of the level as seen by the rider inside the building or station
    pub name: Option<String>,
}

impl Level {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row).identified_by("level_id");
        let id = v.required_text("level_id");
        let index = v.required_float("level_index", f64::MIN..=f64::MAX);
        let name = v.optional_text("level_name");
        v.finish(|| {
            Some(Level {
                id: id?,
                index: index?,
                name,
            })
        })
    }
}

impl Entity for Level {
    const FILE: GtfsFile = GtfsFile::Levels;

    fn identity(&self) -> Identity {
        Identity::single("level_id", self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pathway_requires_mode_and_direction() {
        let row = RawRow::new()
            .with("pathway_id", "p1")
            .with("from_stop_id", "a")
            .with("to_stop_id", "b")
            .with("pathway_mode", 8)
            .with("stair_count", -12);
        let result = Pathway::build(&row);
        let codes: Vec<_> = result.notices().iter().map(|n| n.code).collect();
        assert_eq!(vec!["unexpected_enum_value", "missing_required_value"], codes);
    }

    #[test]
    fn transfer_defaults_to_recommended() {
        let row = RawRow::new().with("from_stop_id", "a").with("to_stop_id", "b");
        let transfer = Transfer::build(&row).into_result().unwrap();
        assert_eq!(TransferType::Recommended, transfer.transfer_type);
        assert_eq!(2, transfer.identity().parts().len());
    }

    #[test]
    fn transfer_with_one_broken_rule() {
        let row = RawRow::new()
            .with("from_stop_id", "a")
            .with("to_stop_id", "b")
            .with("transfer_type", 9);
        let result = Transfer::build(&row);
        let notices = result.notices();
        assert_eq!(1, notices.len());
        assert_eq!("unexpected_enum_value", notices[0].code);
        assert_eq!(crate::notice::NO_ID, notices[0].entity_id);
    }

    #[test]
    fn level_with_one_broken_rule() {
        let row = RawRow::new()
            .with("level_id", "l1")
            .with("level_index", "ground")
            .with("level_name", "Rez-de-chaussée");
        let result = Level::build(&row);
        let notices = result.notices();
        assert_eq!(1, notices.len());
        assert_eq!("invalid_float", notices[0].code);
        assert_eq!("l1", notices[0].entity_id);
    }

    #[test]
    fn pathway_with_one_broken_rule() {
        let row = RawRow::new()
            .with("pathway_id", "p1")
            .with("from_stop_id", "a")
            .with("to_stop_id", "b")
            .with("pathway_mode", 1)
            .with("is_bidirectional", 0)
            .with("traversal_time", 0);
        let result = Pathway::build(&row);
        let notices = result.notices();
        assert_eq!(1, notices.len());
        assert_eq!("integer_out_of_range", notices[0].code);
        assert_eq!("p1", notices[0].entity_id);
    }
}
