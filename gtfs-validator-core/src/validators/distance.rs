use super::{scan_against_previous, ValidationContext, Validator};
use crate::notice::{Notice, NoticeContainer};
use crate::repository::FeedRepository;

/// `shape_dist_traveled` must strictly increase along a shape
pub struct ShapeDistanceValidator;

impl Validator for ShapeDistanceValidator {
    fn name(&self) -> &'static str {
        "shape_increasing_distance"
    }

    fn validate(&self, feed: &FeedRepository, _: &ValidationContext, notices: &mut NoticeContainer) {
        for (shape_id, points) in feed.shape_points_by_shape() {
            scan_against_previous(
                &points,
                |p| p.dist_traveled,
                |p| p.dist_traveled,
                |point, distance, previous, previous_distance| {
                    if distance <= previous_distance {
                        notices.push(Notice::decreasing_shape_distance(
                            shape_id,
                            point.sequence.into(),
                            distance,
                            previous.sequence.into(),
                            previous_distance,
                        ));
                    }
                },
            );
        }
    }
}

/// `shape_dist_traveled` must strictly increase along the stop times of a trip
pub struct StopTimeDistanceValidator;

impl Validator for StopTimeDistanceValidator {
    fn name(&self) -> &'static str {
        "stop_time_increasing_distance"
    }

    fn validate(&self, feed: &FeedRepository, _: &ValidationContext, notices: &mut NoticeContainer) {
        for (trip_id, stop_times) in feed.stop_times_by_trip() {
            scan_against_previous(
                &stop_times,
                |st| st.shape_dist_traveled,
                |st| st.shape_dist_traveled,
                |stop_time, distance, previous, previous_distance| {
                    if distance <= previous_distance {
                        notices.push(Notice::decreasing_stop_time_distance(
                            trip_id,
                            stop_time.stop_sequence.into(),
                            distance,
                            previous.stop_sequence.into(),
                            previous_distance,
                        ));
                    }
                },
            );
        }
    }
}
