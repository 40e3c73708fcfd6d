use super::{ValidationContext, Validator};
use crate::enums::GtfsEnum;
use crate::notice::{Notice, NoticeContainer};
use crate::repository::FeedRepository;
use log::debug;

/// A location's `parent_station` must be a station, or a platform for boarding areas
pub struct ParentStationValidator;

impl Validator for ParentStationValidator {
    fn name(&self) -> &'static str {
        "parent_location_type"
    }

    fn validate(&self, feed: &FeedRepository, _: &ValidationContext, notices: &mut NoticeContainer) {
        for location in &feed.locations {
            let (parent_id, expected) = match (location.parent_station(), location.expected_parent_type()) {
                (Some(parent_id), Some(expected)) => (parent_id, expected),
                _ => continue,
            };
            let parent = match feed.location(parent_id) {
                Some(parent) => parent,
                None => {
                    debug!("parent {} of {} is not a known location", parent_id, location.id());
                    continue;
                }
            };
            if parent.location_type() != expected {
                notices.push(Notice::wrong_parent_location_type(
                    location.id(),
                    location.location_type().code(),
                    parent_id,
                    parent.location_type().code(),
                    expected.code(),
                ));
            }
        }
    }
}
