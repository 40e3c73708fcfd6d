use super::{ValidationContext, Validator};
use crate::notice::{Notice, NoticeContainer};
use crate::repository::FeedRepository;
use log::debug;

/// Above this speed, in meters per second, no vehicle can travel between two stops
const MAX_SPEED: i64 = 42;
const METERS_PER_SECOND_TO_KMH: f64 = 3.6;

/// Vehicles cannot travel between consecutive stops faster than [MAX_SPEED].
///
/// Stops sharing the same time (arrival equal to the previous departure) are
/// merged with the next one: their distances add up until time passes.
pub struct TripTravelSpeedValidator;

/// Great-circle distance in meters
fn haversine_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    const EARTH_RADIUS: f64 = 6371.0; // Earth radius in kilometers
    let ((lat, lon), (other_lat, other_lon)) = (from, to);

    let d_lat = (other_lat - lat).to_radians();
    let d_lon = (other_lon - lon).to_radians();

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + lat.to_radians().cos() * other_lat.to_radians().cos() * (d_lon / 2.0).sin() * (d_lon / 2.0).sin();

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS * c * 1000.0
}

/// What is known of the stops already visited by the trip
#[derive(Default)]
struct Travel {
    departure_time: Option<i32>,
    position: Option<(f64, f64)>,
    accumulated_distance: i64,
    accumulated_sequences: Vec<u32>,
}

impl Travel {
    fn restart(&mut self) {
        *self = Travel::default();
    }
}

impl Validator for TripTravelSpeedValidator {
    fn name(&self) -> &'static str {
        "fast_travel_between_stops"
    }

    fn validate(&self, feed: &FeedRepository, _: &ValidationContext, notices: &mut NoticeContainer) {
        for (trip_id, stop_times) in feed.stop_times_by_trip() {
            let mut travel = Travel::default();
            for stop_time in stop_times {
                let position = feed.location(&stop_time.stop_id).and_then(|location| {
                    let base = location.base();
                    Some((base.latitude?, base.longitude?))
                });
                let position = match position {
                    Some(position) => position,
                    None => {
                        debug!(
                            "trip {}: no position for stop {}, speed unknown",
                            trip_id, stop_time.stop_id
                        );
                        travel.restart();
                        continue;
                    }
                };
                let distance = travel
                    .position
                    .map_or(0, |previous| haversine_distance(previous, position) as i64);

                let mut same_time = false;
                if let (Some(departure), Some(arrival)) = (travel.departure_time, stop_time.arrival_time) {
                    same_time = arrival == departure;
                    if !same_time {
                        let speed = (distance + travel.accumulated_distance) / i64::from(arrival - departure);
                        if speed > MAX_SPEED {
                            travel.accumulated_sequences.push(stop_time.stop_sequence);
                            notices.push(Notice::fast_travel_between_stops(
                                trip_id,
                                speed as f64 * METERS_PER_SECOND_TO_KMH,
                                &travel.accumulated_sequences,
                            ));
                        }
                    }
                }

                if same_time {
                    travel.accumulated_distance += distance;
                } else {
                    travel.accumulated_distance = 0;
                    travel.accumulated_sequences.clear();
                }
                travel.departure_time = stop_time.departure_time;
                travel.position = Some(position);
                travel.accumulated_sequences.push(stop_time.stop_sequence);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::StopTime;
    use crate::pipeline::ValidationConfig;
    use crate::raw_row::RawRow;
    use crate::stops::Location;
    use crate::time_codec::HhMmSsCodec;
    use serde_json::Value;

    fn stop(id: &str, lon: f64) -> Location {
        let row = RawRow::new()
            .with("stop_id", id)
            .with("stop_name", id)
            .with("stop_lat", 48.0)
            .with("stop_lon", lon);
        Location::build(&row).into_result().unwrap()
    }

    fn stop_time(trip_id: &str, sequence: i64, stop_id: &str, arrival: &str, departure: &str) -> StopTime {
        let row = RawRow::new()
            .with("trip_id", trip_id)
            .with("stop_id", stop_id)
            .with("stop_sequence", sequence)
            .with("arrival_time", arrival)
            .with("departure_time", departure);
        StopTime::build(&row, &HhMmSsCodec).into_result().unwrap()
    }

    fn run(stop_times: Vec<StopTime>) -> NoticeContainer {
        let mut feed = FeedRepository::default();
        // About 7.4 km between consecutive stops
        for s in [stop("a", 2.0), stop("b", 2.1), stop("c", 2.2)] {
            feed.locations.insert(s);
        }
        for st in stop_times {
            feed.stop_times.insert(st);
        }
        let config = ValidationConfig::default();
        let context = ValidationContext {
            codec: &HhMmSsCodec,
            config: &config,
        };
        let mut notices = NoticeContainer::new();
        TripTravelSpeedValidator.validate(&feed, &context, &mut notices);
        notices
    }

    fn sequences(notice: &Notice) -> Option<&Value> {
        notice.extension("stopSequenceList")
    }

    #[test]
    fn distance_between_stops() {
        let distance = haversine_distance((48.0, 2.0), (48.0, 2.1));
        assert!((distance - 7440.0).abs() < 20.0, "{}", distance);
        assert_eq!(0.0, haversine_distance((48.0, 2.0), (48.0, 2.0)));
    }

    #[test]
    fn realistic_speed() {
        let notices = run(vec![
            stop_time("t1", 1, "a", "08:00:00", "08:00:00"),
            stop_time("t1", 2, "b", "08:10:00", "08:11:00"),
            stop_time("t1", 3, "c", "08:20:00", "08:20:00"),
        ]);
        assert!(notices.is_empty());
    }

    #[test]
    fn too_fast_between_two_stops() {
        let notices = run(vec![
            stop_time("t1", 1, "a", "08:00:00", "08:00:00"),
            stop_time("t1", 2, "b", "08:01:00", "08:01:00"),
        ]);
        assert_eq!(1, notices.len());
        let notice = notices.iter().next().unwrap();
        assert_eq!("t1", notice.entity_id);
        assert_eq!("stop_times.txt", notice.filename);
        assert_eq!(Some(&Value::from(vec![1, 2])), sequences(notice));
        let speed = notice.extension("speedKmh").and_then(Value::as_f64).unwrap();
        assert!(speed > 400.0, "{}", speed);
    }

    #[test]
    fn stops_at_the_same_time_accumulate_distance() {
        let notices = run(vec![
            stop_time("t1", 1, "a", "08:00:00", "08:00:00"),
            stop_time("t1", 2, "b", "08:00:00", "08:00:00"),
            stop_time("t1", 3, "c", "08:02:00", "08:02:00"),
        ]);
        assert_eq!(1, notices.len());
        assert_eq!(
            Some(&Value::from(vec![1, 2, 3])),
            sequences(notices.iter().next().unwrap())
        );
    }

    #[test]
    fn unknown_stop_breaks_the_chain() {
        let notices = run(vec![
            stop_time("t1", 1, "a", "08:00:00", "08:00:00"),
            stop_time("t1", 2, "unknown", "08:00:30", "08:00:30"),
            stop_time("t1", 3, "b", "08:01:00", "08:01:00"),
        ]);
        assert!(notices.is_empty());
    }
}
