//! Consistency checks run once every row of the feed is loaded
mod block_overlap;
mod distance;
mod frequencies;
mod language;
mod parent_station;
mod route_color;
mod shape_reference;
mod stop_time_times;
mod transfers;
mod travel_speed;

pub use block_overlap::BlockTripsOverlapValidator;
pub use distance::{ShapeDistanceValidator, StopTimeDistanceValidator};
pub use frequencies::TripFrequenciesOverlapValidator;
pub use language::FeedLanguageValidator;
pub use parent_station::ParentStationValidator;
pub use route_color::RouteColorContrastValidator;
pub use shape_reference::ShapeIdReferenceValidator;
pub use stop_time_times::{BackwardsTimeTravelValidator, StopTimeArrivalDepartureValidator};
pub use transfers::MinTransferTimeValidator;
pub use travel_speed::TripTravelSpeedValidator;

use crate::notice::NoticeContainer;
use crate::pipeline::ValidationConfig;
use crate::repository::FeedRepository;
use crate::time_codec::TimeCodec;

/// What validators need besides the entities
pub struct ValidationContext<'a> {
    pub codec: &'a dyn TimeCodec,
    pub config: &'a ValidationConfig,
}

/// A rule over the whole loaded feed
pub trait Validator {
    fn name(&self) -> &'static str;
    /// Must only read the repository, so running it twice gives the same notices
    fn validate(
        &self,
        feed: &FeedRepository,
        context: &ValidationContext,
        notices: &mut NoticeContainer,
    );
}

/// The fixed catalog of validators, in running order
pub fn default_validators() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(ShapeDistanceValidator),
        Box::new(StopTimeDistanceValidator),
        Box::new(BackwardsTimeTravelValidator),
        Box::new(StopTimeArrivalDepartureValidator),
        Box::new(BlockTripsOverlapValidator),
        Box::new(FeedLanguageValidator),
        Box::new(ParentStationValidator),
        Box::new(TripFrequenciesOverlapValidator),
        Box::new(MinTransferTimeValidator),
        Box::new(ShapeIdReferenceValidator),
        Box::new(RouteColorContrastValidator),
        Box::new(TripTravelSpeedValidator),
    ]
}

/// Compares each item with the nearest preceding item whose `carried` value is defined.
///
/// Items without a `current` value are not compared, and items without a `carried`
/// value do not replace the preceding one: absence never breaks the chain.
pub(crate) fn scan_against_previous<'a, T, C, D: Copy>(
    items: &[&'a T],
    current: impl Fn(&T) -> Option<C>,
    carried: impl Fn(&T) -> Option<D>,
    mut visit: impl FnMut(&'a T, C, &'a T, D),
) {
    let mut previous: Option<(&'a T, D)> = None;
    for &item in items {
        if let (Some(value), Some((previous_item, previous_value))) = (current(item), previous) {
            visit(item, value, previous_item, previous_value);
        }
        if let Some(value) = carried(item) {
            previous = Some((item, value));
        }
    }
}
