use super::{ValidationContext, Validator};
use crate::notice::{Notice, NoticeContainer};
use crate::objects::Frequency;
use crate::repository::FeedRepository;
use log::debug;
use std::collections::BTreeMap;

/// The frequency periods of one trip cannot share any time
pub struct TripFrequenciesOverlapValidator;

/// Touching periods do not overlap: a period can start when the previous one ends
fn overlaps(frequency: &Frequency, other: &Frequency) -> bool {
    frequency.start_time < other.end_time && other.start_time < frequency.end_time
}

impl Validator for TripFrequenciesOverlapValidator {
    fn name(&self) -> &'static str {
        "overlapping_trip_frequencies"
    }

    fn validate(
        &self,
        feed: &FeedRepository,
        context: &ValidationContext,
        notices: &mut NoticeContainer,
    ) {
        let mut by_trip: BTreeMap<&str, Vec<&Frequency>> = BTreeMap::new();
        for frequency in &feed.frequencies {
            if frequency.start_time < frequency.end_time {
                by_trip.entry(frequency.trip_id.as_str()).or_default().push(frequency);
            } else {
                debug!(
                    "frequency of {} starting at {} is empty",
                    frequency.trip_id, frequency.start_time
                );
            }
        }

        let codec = context.codec;
        let period = |f: &Frequency| (codec.to_hhmmss(f.start_time), codec.to_hhmmss(f.end_time));
        for (trip_id, mut frequencies) in by_trip {
            frequencies.sort_by_key(|f| (f.start_time, f.end_time));
            for (i, previous) in frequencies.iter().enumerate() {
                for frequency in frequencies[i + 1..].iter().filter(|f| overlaps(previous, f)) {
                    notices.push(Notice::overlapping_trip_frequencies(
                        trip_id,
                        period(*frequency),
                        period(*previous),
                    ));
                }
            }
        }
    }
}
