use super::{ValidationContext, Validator};
use crate::notice::{Notice, NoticeContainer};
use crate::repository::FeedRepository;
use log::debug;
use std::collections::BTreeSet;

/// Stop times giving a `shape_dist_traveled` need their trip to reference an existing shape.
///
/// Reported once per trip, on its first stop time with a distance.
pub struct ShapeIdReferenceValidator;

impl Validator for ShapeIdReferenceValidator {
    fn name(&self) -> &'static str {
        "shape_id_reference_in_stop_time"
    }

    fn validate(&self, feed: &FeedRepository, _: &ValidationContext, notices: &mut NoticeContainer) {
        let shape_ids: BTreeSet<&str> = feed.shapes.iter().map(|p| p.id.as_str()).collect();
        for (trip_id, stop_times) in feed.stop_times_by_trip() {
            let stop_time = match stop_times.iter().find(|st| st.shape_dist_traveled.is_some()) {
                Some(stop_time) => stop_time,
                None => continue,
            };
            let trip = match feed.trip(trip_id) {
                Some(trip) => trip,
                None => {
                    debug!("stop times reference unknown trip {}", trip_id);
                    continue;
                }
            };
            match &trip.shape_id {
                None => notices.push(Notice::missing_required_value(
                    "trips.txt",
                    "shape_id",
                    Some(trip_id),
                )),
                Some(shape_id) if !shape_ids.contains(shape_id.as_str()) => {
                    notices.push(Notice::non_existing_shape(
                        trip_id,
                        stop_time.stop_sequence.into(),
                        shape_id,
                    ))
                }
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Shape, StopTime, Trip};
    use crate::pipeline::ValidationConfig;
    use crate::raw_row::RawRow;
    use crate::time_codec::HhMmSsCodec;
    use serde_json::Value;

    fn trip(id: &str, shape_id: Option<&str>) -> Trip {
        let mut row = RawRow::new()
            .with("route_id", "r1")
            .with("service_id", "s1")
            .with("trip_id", id);
        if let Some(shape_id) = shape_id {
            row = row.with("shape_id", shape_id);
        }
        Trip::build(&row).into_result().unwrap()
    }

    fn stop_time(trip_id: &str, sequence: i64, distance: Option<f64>) -> StopTime {
        let mut row = RawRow::new()
            .with("trip_id", trip_id)
            .with("stop_id", "s")
            .with("stop_sequence", sequence)
            .with("arrival_time", "08:00:00")
            .with("departure_time", "08:00:00");
        if let Some(d) = distance {
            row = row.with("shape_dist_traveled", d);
        }
        StopTime::build(&row, &HhMmSsCodec).into_result().unwrap()
    }

    fn run(feed: &FeedRepository) -> NoticeContainer {
        let config = ValidationConfig::default();
        let context = ValidationContext {
            codec: &HhMmSsCodec,
            config: &config,
        };
        let mut notices = NoticeContainer::new();
        ShapeIdReferenceValidator.validate(feed, &context, &mut notices);
        notices
    }

    fn feed() -> FeedRepository {
        let mut feed = FeedRepository::default();
        let point = RawRow::new()
            .with("shape_id", "sh1")
            .with("shape_pt_lat", 48.0)
            .with("shape_pt_lon", -4.0)
            .with("shape_pt_sequence", 1);
        feed.shapes.insert(Shape::build(&point).into_result().unwrap());
        for t in [
            trip("with_shape", Some("sh1")),
            trip("unknown_shape", Some("sh2")),
            trip("no_shape", None),
            trip("no_distance", None),
        ] {
            feed.trips.insert(t);
        }
        for st in [
            stop_time("with_shape", 1, Some(0.0)),
            stop_time("unknown_shape", 1, None),
            stop_time("unknown_shape", 2, Some(2.0)),
            stop_time("unknown_shape", 3, Some(4.0)),
            stop_time("no_shape", 1, Some(0.0)),
            stop_time("no_distance", 1, None),
            stop_time("no_trip", 1, Some(0.0)),
        ] {
            feed.stop_times.insert(st);
        }
        feed
    }

    #[test]
    fn distances_without_a_shape() {
        let notices = run(&feed());
        assert_eq!(
            vec!["missing_required_value", "non_existing_shape"],
            notices.iter().map(|n| n.code).collect::<Vec<_>>()
        );

        let missing = notices.iter().next().unwrap();
        assert_eq!("no_shape", missing.entity_id);
        assert_eq!("trips.txt", missing.filename);
        assert_eq!(Some(&Value::from("shape_id")), missing.extension("fieldName"));

        let unknown = notices.iter().nth(1).unwrap();
        assert_eq!("unknown_shape", unknown.entity_id);
        assert_eq!("stop_times.txt", unknown.filename);
        assert_eq!(Some(&Value::from("sh2")), unknown.extension("shapeId"));
        assert_eq!(Some(&Value::from(2)), unknown.extension("compositeKeySecondValue"));
    }
}
