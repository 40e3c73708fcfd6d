use super::{scan_against_previous, ValidationContext, Validator};
use crate::notice::{Notice, NoticeContainer};
use crate::repository::FeedRepository;

/// A vehicle cannot arrive at a stop before it left the previous one
pub struct BackwardsTimeTravelValidator;

impl Validator for BackwardsTimeTravelValidator {
    fn name(&self) -> &'static str {
        "backwards_time_travel"
    }

    fn validate(
        &self,
        feed: &FeedRepository,
        context: &ValidationContext,
        notices: &mut NoticeContainer,
    ) {
        for (trip_id, stop_times) in feed.stop_times_by_trip() {
            scan_against_previous(
                &stop_times,
                |st| st.arrival_time,
                |st| st.departure_time,
                |stop_time, arrival, previous, previous_departure| {
                    if arrival < previous_departure {
                        notices.push(Notice::backwards_time_travel(
                            trip_id,
                            previous.stop_sequence.into(),
                            stop_time.stop_sequence.into(),
                            context.codec.to_hhmmss(arrival),
                            context.codec.to_hhmmss(previous_departure),
                        ));
                    }
                },
            );
        }
    }
}

/// At one stop, the vehicle arrives before it departs
pub struct StopTimeArrivalDepartureValidator;

impl Validator for StopTimeArrivalDepartureValidator {
    fn name(&self) -> &'static str {
        "stop_time_arrival_and_departure_time"
    }

    fn validate(
        &self,
        feed: &FeedRepository,
        context: &ValidationContext,
        notices: &mut NoticeContainer,
    ) {
        for stop_time in &feed.stop_times {
            if let (Some(arrival), Some(departure)) = (stop_time.arrival_time, stop_time.departure_time) {
                if arrival > departure {
                    notices.push(Notice::arrival_time_after_departure_time(
                        &stop_time.trip_id,
                        stop_time.stop_sequence.into(),
                        context.codec.to_hhmmss(arrival),
                        context.codec.to_hhmmss(departure),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::StopTime;
    use crate::pipeline::ValidationConfig;
    use crate::time_codec::{HhMmSsCodec, TimeCodec};
    use serde_json::Value;

    fn stop_time(sequence: u32, arrival: Option<i32>, departure: Option<i32>) -> StopTime {
        StopTime {
            trip_id: "0".to_owned(),
            arrival_time: arrival,
            departure_time: departure,
            stop_id: format!("s{}", sequence),
            stop_sequence: sequence,
            stop_headsign: None,
            pickup_type: Default::default(),
            drop_off_type: Default::default(),
            continuous_pickup: Default::default(),
            continuous_drop_off: Default::default(),
            shape_dist_traveled: None,
            timepoint: Default::default(),
        }
    }

    fn run(validator: &dyn Validator, stop_times: Vec<StopTime>) -> NoticeContainer {
        let mut feed = FeedRepository::default();
        for st in stop_times {
            feed.stop_times.insert(st);
        }
        let config = ValidationConfig::default();
        let context = ValidationContext {
            codec: &HhMmSsCodec,
            config: &config,
        };
        let mut notices = NoticeContainer::new();
        validator.validate(&feed, &context, &mut notices);
        notices
    }

    #[test]
    fn valid_time_combination() {
        let notices = run(
            &BackwardsTimeTravelValidator,
            vec![
                stop_time(2, Some(710), Some(920)),
                stop_time(5, Some(945), Some(1011)),
                stop_time(8, Some(1144), Some(1201)),
            ],
        );
        assert!(notices.is_empty());
    }

    #[test]
    fn arrival_before_previous_departure() {
        let notices = run(
            &BackwardsTimeTravelValidator,
            vec![
                stop_time(8, Some(1020), Some(1201)),
                stop_time(2, Some(710), Some(920)),
                stop_time(5, Some(910), Some(1011)),
            ],
        );
        assert_eq!(1, notices.len());
        let notice = notices.iter().next().unwrap();
        assert_eq!("stop_times.txt", notice.filename);
        assert_eq!("no id", notice.entity_id);
        assert_eq!(Some(&Value::from("trip_id")), notice.extension("compositeKeyFirstPart"));
        assert_eq!(Some(&Value::from("0")), notice.extension("compositeKeyFirstValue"));
        assert_eq!(Some(&Value::from(2)), notice.extension("compositeKeySecondValue"));
        assert_eq!(Some(&Value::from(2)), notice.extension("stopTimeStopSequence"));
        assert_eq!(Some(&Value::from(5)), notice.extension("nextStopTimeStopSequence"));
        assert_eq!(
            Some(&Value::from(HhMmSsCodec.to_hhmmss(910))),
            notice.extension("stopTimeArrivalTime")
        );
        assert_eq!(
            Some(&Value::from(HhMmSsCodec.to_hhmmss(920))),
            notice.extension("stopTimeDepartureTime")
        );
    }

    #[test]
    fn absent_arrival_keeps_previous_departure() {
        let notices = run(
            &BackwardsTimeTravelValidator,
            vec![
                stop_time(2, Some(710), Some(920)),
                stop_time(5, None, Some(1000)),
                stop_time(8, Some(1020), Some(1201)),
            ],
        );
        assert!(notices.is_empty());
    }

    #[test]
    fn absent_departure_does_not_break_the_chain() {
        let notices = run(
            &BackwardsTimeTravelValidator,
            vec![
                stop_time(1, Some(700), Some(900)),
                stop_time(2, None, None),
                stop_time(3, Some(850), Some(950)),
            ],
        );
        assert_eq!(1, notices.len());
        let notice = notices.iter().next().unwrap();
        assert_eq!(Some(&Value::from(1)), notice.extension("stopTimeStopSequence"));
    }

    #[test]
    fn arrival_after_departure_in_one_row() {
        let notices = run(
            &StopTimeArrivalDepartureValidator,
            vec![
                stop_time(1, Some(700), Some(700)),
                stop_time(2, Some(800), Some(750)),
                stop_time(3, None, Some(900)),
            ],
        );
        assert_eq!(1, notices.len());
        let notice = notices.iter().next().unwrap();
        assert_eq!("arrival_time_after_departure_time", notice.code);
        assert_eq!(Some(&Value::from(2)), notice.extension("compositeKeySecondValue"));
    }
}
