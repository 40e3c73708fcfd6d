use super::{ValidationContext, Validator};
use crate::enums::Exception;
use crate::notice::{Notice, NoticeContainer};
use crate::objects::{StopTime, Trip};
use crate::repository::FeedRepository;
use chrono::{NaiveDate, Weekday};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Trips of a same block are run by one vehicle, so they cannot run at the same time
pub struct BlockTripsOverlapValidator;

/// Why two services can be active on the same day
#[derive(Debug, PartialEq)]
enum ServiceConflict {
    SameService,
    Weekdays(Vec<Weekday>),
    Dates(Vec<NaiveDate>),
}

struct TripInterval<'a> {
    trip: &'a Trip,
    first_time: i32,
    last_time: i32,
}

impl<'a> TripInterval<'a> {
    /// From the arrival at the first stop to the departure from the last one
    fn new(trip: &'a Trip, stop_times: &[&StopTime]) -> Option<Self> {
        let first_time = stop_times.first()?.arrival_time?;
        let last_time = stop_times.last()?.departure_time?;
        (first_time < last_time).then_some(TripInterval {
            trip,
            first_time,
            last_time,
        })
    }

    /// Touching intervals do not overlap: a vehicle can arrive and leave at the same second
    fn overlaps(&self, other: &TripInterval) -> bool {
        self.first_time < other.last_time && other.first_time < self.last_time
    }
}

/// Every day a service runs, from its calendar and its exceptions
fn service_dates(feed: &FeedRepository, service_id: &str) -> BTreeSet<NaiveDate> {
    let mut dates = BTreeSet::new();
    if let Some(calendar) = feed.calendar(service_id) {
        let mut date = calendar.start_date;
        while date <= calendar.end_date {
            if calendar.valid_weekday(date) {
                dates.insert(date);
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
    }
    for calendar_date in feed.calendar_dates_for(service_id) {
        match calendar_date.exception_type {
            Exception::Added => dates.insert(calendar_date.date),
            Exception::Deleted => dates.remove(&calendar_date.date),
        };
    }
    dates
}

fn service_conflict(
    feed: &FeedRepository,
    calendar_aware: bool,
    service_id: &str,
    other_service_id: &str,
) -> Option<ServiceConflict> {
    if service_id == other_service_id {
        return Some(ServiceConflict::SameService);
    }
    if !calendar_aware {
        return None;
    }
    match (feed.calendar(service_id), feed.calendar(other_service_id)) {
        (Some(calendar), Some(other)) => {
            if calendar.start_date > other.end_date || other.start_date > calendar.end_date {
                return None;
            }
            let weekdays: Vec<Weekday> = calendar.weekdays().filter(|d| other.runs_on(*d)).collect();
            (!weekdays.is_empty()).then_some(ServiceConflict::Weekdays(weekdays))
        }
        _ => {
            let dates = service_dates(feed, service_id);
            let conflicting: Vec<NaiveDate> = service_dates(feed, other_service_id)
                .intersection(&dates)
                .copied()
                .collect();
            (!conflicting.is_empty()).then_some(ServiceConflict::Dates(conflicting))
        }
    }
}

impl Validator for BlockTripsOverlapValidator {
    fn name(&self) -> &'static str {
        "block_trips_with_overlapping_stop_times"
    }

    fn validate(
        &self,
        feed: &FeedRepository,
        context: &ValidationContext,
        notices: &mut NoticeContainer,
    ) {
        let stop_times_by_trip = feed.stop_times_by_trip();
        let calendar_aware = context.config.calendar_aware_block_overlap;
        let mut conflicts: BTreeMap<(&str, &str), Option<ServiceConflict>> = BTreeMap::new();

        for (block_id, trips) in feed.trips_by_block() {
            let intervals: Vec<TripInterval> = trips
                .into_iter()
                .filter_map(|trip| {
                    let stop_times = stop_times_by_trip.get(trip.id.as_str())?;
                    TripInterval::new(trip, stop_times)
                })
                .collect();
            debug!("block {}: {} trips with a time interval", block_id, intervals.len());

            for (i, previous) in intervals.iter().enumerate() {
                for interval in &intervals[i + 1..] {
                    if !previous.overlaps(interval) {
                        continue;
                    }
                    let services = (
                        previous.trip.service_id.as_str(),
                        interval.trip.service_id.as_str(),
                    );
                    let conflict = conflicts.entry(services).or_insert_with(|| {
                        service_conflict(feed, calendar_aware, services.0, services.1)
                    });
                    let notice = match conflict {
                        None => continue,
                        Some(conflict) => overlap_notice(context, block_id, previous, interval, conflict),
                    };
                    notices.push(notice);
                }
            }
        }
    }
}

fn overlap_notice(
    context: &ValidationContext,
    block_id: &str,
    previous: &TripInterval,
    interval: &TripInterval,
    conflict: &ServiceConflict,
) -> Notice {
    let codec = context.codec;
    let notice = Notice::block_trips_with_overlapping_stop_times(
        block_id,
        (
            &interval.trip.id,
            codec.to_hhmmss(interval.first_time),
            codec.to_hhmmss(interval.last_time),
        ),
        (
            &previous.trip.id,
            codec.to_hhmmss(previous.first_time),
            codec.to_hhmmss(previous.last_time),
        ),
    );
    match conflict {
        ServiceConflict::SameService => notice,
        ServiceConflict::Weekdays(days) => notice.with_extension(
            "conflictingWeekdays",
            days.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
        ),
        ServiceConflict::Dates(dates) => notice.with_extension(
            "conflictingDateList",
            dates
                .iter()
                .map(|d| d.format("%Y%m%d").to_string())
                .collect::<Vec<_>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Calendar, CalendarDate};
    use crate::pipeline::ValidationConfig;
    use crate::raw_row::RawRow;
    use crate::time_codec::HhMmSsCodec;
    use serde_json::Value;

    fn trip(id: &str, service_id: &str, block_id: &str) -> Trip {
        let row = RawRow::new()
            .with("route_id", "r1")
            .with("service_id", service_id)
            .with("trip_id", id)
            .with("block_id", block_id);
        Trip::build(&row).into_result().unwrap()
    }

    fn add_trip(feed: &mut FeedRepository, trip: Trip, first: &str, last: &str) {
        for (sequence, time) in [(1, first), (2, last)] {
            let row = RawRow::new()
                .with("trip_id", trip.id.as_str())
                .with("arrival_time", time)
                .with("departure_time", time)
                .with("stop_id", "s")
                .with("stop_sequence", sequence);
            feed.stop_times
                .insert(StopTime::build(&row, &HhMmSsCodec).into_result().unwrap());
        }
        feed.trips.insert(trip);
    }

    fn calendar(service_id: &str, days: [u8; 7], start: &str, end: &str) -> Calendar {
        let names = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];
        let mut row = RawRow::new()
            .with("service_id", service_id)
            .with("start_date", start)
            .with("end_date", end);
        for (name, day) in names.iter().zip(days) {
            row = row.with(name, day as i64);
        }
        Calendar::build(&row).into_result().unwrap()
    }

    fn added(service_id: &str, date: &str) -> CalendarDate {
        let row = RawRow::new()
            .with("service_id", service_id)
            .with("date", date)
            .with("exception_type", 1);
        CalendarDate::build(&row).into_result().unwrap()
    }

    fn run_with(feed: &FeedRepository, config: ValidationConfig) -> NoticeContainer {
        let context = ValidationContext {
            codec: &HhMmSsCodec,
            config: &config,
        };
        let mut notices = NoticeContainer::new();
        BlockTripsOverlapValidator.validate(feed, &context, &mut notices);
        notices
    }

    fn run(feed: &FeedRepository) -> NoticeContainer {
        run_with(feed, ValidationConfig::default())
    }

    #[test]
    fn same_service_overlap() {
        let mut feed = FeedRepository::default();
        add_trip(&mut feed, trip("t1", "s", "b1"), "08:00:00", "09:00:00");
        add_trip(&mut feed, trip("t2", "s", "b1"), "08:30:00", "09:30:00");
        add_trip(&mut feed, trip("t3", "s", "b2"), "08:30:00", "09:30:00");
        let notices = run(&feed);
        assert_eq!(1, notices.len());
        let notice = notices.iter().next().unwrap();
        assert_eq!("t2", notice.entity_id);
        assert_eq!(Some(&Value::from("t1")), notice.extension("previousTripId"));
        assert_eq!(Some(&Value::from("b1")), notice.extension("blockId"));
        assert_eq!(Some(&Value::from("08:00:00")), notice.extension("previousTripFirstTime"));
        assert_eq!(Some(&Value::from("09:30:00")), notice.extension("tripLastTime"));
    }

    #[test]
    fn consecutive_trips_do_not_overlap() {
        let mut feed = FeedRepository::default();
        add_trip(&mut feed, trip("t1", "s", "b1"), "08:00:00", "09:00:00");
        add_trip(&mut feed, trip("t2", "s", "b1"), "09:00:00", "10:00:00");
        assert!(run(&feed).is_empty());
    }

    #[test]
    fn calendars_sharing_a_weekday() {
        let mut feed = FeedRepository::default();
        feed.calendars.insert(calendar("week", [1, 1, 1, 1, 1, 0, 0], "20200101", "20201231"));
        feed.calendars.insert(calendar("friday", [0, 0, 0, 0, 1, 0, 0], "20200601", "20210601"));
        feed.calendars.insert(calendar("weekend", [0, 0, 0, 0, 0, 1, 1], "20200101", "20201231"));
        add_trip(&mut feed, trip("t1", "week", "b1"), "08:00:00", "09:00:00");
        add_trip(&mut feed, trip("t2", "friday", "b1"), "08:30:00", "09:30:00");
        add_trip(&mut feed, trip("t3", "weekend", "b1"), "08:30:00", "09:30:00");

        let notices = run(&feed);
        assert_eq!(1, notices.len());
        let notice = notices.iter().next().unwrap();
        assert_eq!("t2", notice.entity_id);
        assert_eq!(
            Some(&Value::from(vec!["Fri"])),
            notice.extension("conflictingWeekdays")
        );

        let config = ValidationConfig::default().calendar_aware_block_overlap(false);
        assert!(run_with(&feed, config).is_empty());
    }

    #[test]
    fn calendars_with_disjoint_ranges() {
        let mut feed = FeedRepository::default();
        feed.calendars.insert(calendar("2020", [1; 7], "20200101", "20201231"));
        feed.calendars.insert(calendar("2021", [1; 7], "20210101", "20211231"));
        add_trip(&mut feed, trip("t1", "2020", "b1"), "08:00:00", "09:00:00");
        add_trip(&mut feed, trip("t2", "2021", "b1"), "08:30:00", "09:30:00");
        assert!(run(&feed).is_empty());
    }

    #[test]
    fn calendar_dates_only() {
        let mut feed = FeedRepository::default();
        feed.calendar_dates.insert(added("a", "20200101"));
        feed.calendar_dates.insert(added("a", "20200102"));
        feed.calendar_dates.insert(added("b", "20200102"));
        feed.calendar_dates.insert(added("c", "20200103"));
        add_trip(&mut feed, trip("t1", "a", "b1"), "08:00:00", "09:00:00");
        add_trip(&mut feed, trip("t2", "b", "b1"), "08:30:00", "09:30:00");
        add_trip(&mut feed, trip("t3", "c", "b1"), "08:30:00", "09:30:00");

        let notices = run(&feed);
        assert_eq!(1, notices.len());
        let notice = notices.iter().next().unwrap();
        assert_eq!("t2", notice.entity_id);
        assert_eq!(
            Some(&Value::from(vec!["20200102"])),
            notice.extension("conflictingDateList")
        );
    }

    #[test]
    fn trips_without_times_are_skipped() {
        let mut feed = FeedRepository::default();
        add_trip(&mut feed, trip("t1", "s", "b1"), "08:00:00", "09:00:00");
        feed.trips.insert(trip("t2", "s", "b1"));
        assert!(run(&feed).is_empty());
    }
}
