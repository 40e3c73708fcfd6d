use super::{ValidationContext, Validator};
use crate::notice::{Notice, NoticeContainer};
use crate::repository::FeedRepository;

/// A `min_transfer_time` outside of the configured range is probably a typo
pub struct MinTransferTimeValidator;

impl Validator for MinTransferTimeValidator {
    fn name(&self) -> &'static str {
        "suspicious_min_transfer_time"
    }

    fn validate(
        &self,
        feed: &FeedRepository,
        context: &ValidationContext,
        notices: &mut NoticeContainer,
    ) {
        let range = &context.config.min_transfer_time_range;
        for transfer in &feed.transfers {
            let seconds = match transfer.min_transfer_time {
                Some(seconds) => i64::from(seconds),
                None => continue,
            };
            if !range.contains(&seconds) {
                notices.push(Notice::suspicious_min_transfer_time(
                    &transfer.from_stop_id,
                    &transfer.to_stop_id,
                    range,
                    seconds,
                ));
            }
        }
    }
}
