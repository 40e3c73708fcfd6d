use super::{ValidationContext, Validator};
use crate::notice::{Notice, NoticeContainer};
use crate::objects::Agency;
use crate::repository::FeedRepository;
use std::collections::BTreeSet;

/// The agencies must speak the language declared in `feed_info.txt`.
///
/// A multilingual feed must have agencies speaking more than one language.
pub struct FeedLanguageValidator;

fn mismatch(agency: &Agency, feed_lang: &str) -> Notice {
    Notice::agency_lang_and_feed_lang_mismatch(
        agency.id.as_deref(),
        &agency.name,
        agency.lang.as_deref(),
        feed_lang,
    )
}

impl Validator for FeedLanguageValidator {
    fn name(&self) -> &'static str {
        "feed_lang_and_agency_lang"
    }

    fn validate(
        &self,
        feed: &FeedRepository,
        context: &ValidationContext,
        notices: &mut NoticeContainer,
    ) {
        let feed_info = match feed.feed_info() {
            Some(feed_info) => feed_info,
            None => return,
        };
        let feed_lang = feed_info.lang.as_str();
        let agencies = feed.agencies();

        if feed_lang == context.config.multi_language_marker {
            let languages: BTreeSet<&str> =
                agencies.iter().filter_map(|a| a.lang.as_deref()).collect();
            if languages.len() <= 1 {
                notices.extend(agencies.iter().map(|a| mismatch(a, feed_lang)));
            }
        } else {
            notices.extend(
                agencies
                    .iter()
                    .filter(|a| a.lang.as_deref() != Some(feed_lang))
                    .map(|a| mismatch(a, feed_lang)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::FeedInfo;
    use crate::pipeline::ValidationConfig;
    use crate::raw_row::RawRow;
    use crate::time_codec::HhMmSsCodec;
    use serde_json::Value;

    fn feed(feed_lang: Option<&str>, agency_langs: &[(&str, &str)]) -> FeedRepository {
        let mut feed = FeedRepository::default();
        for (id, lang) in agency_langs {
            let row = RawRow::new()
                .with("agency_id", *id)
                .with("agency_name", format!("Agency {}", id))
                .with("agency_url", "http://example.com")
                .with("agency_timezone", "Europe/Paris")
                .with("agency_lang", *lang);
            feed.agencies.insert(Agency::build(&row).into_result().unwrap());
        }
        if let Some(feed_lang) = feed_lang {
            let row = RawRow::new()
                .with("feed_publisher_name", "publisher")
                .with("feed_publisher_url", "http://example.com")
                .with("feed_lang", feed_lang);
            feed.feed_info.insert(FeedInfo::build(&row).into_result().unwrap());
        }
        feed
    }

    fn run(feed: &FeedRepository) -> NoticeContainer {
        let config = ValidationConfig::default();
        let context = ValidationContext {
            codec: &HhMmSsCodec,
            config: &config,
        };
        let mut notices = NoticeContainer::new();
        FeedLanguageValidator.validate(feed, &context, &mut notices);
        notices
    }

    #[test]
    fn no_feed_info() {
        assert!(run(&feed(None, &[("a", "fr"), ("b", "en")])).is_empty());
    }

    #[test]
    fn multilingual_feed_with_several_languages() {
        assert!(run(&feed(Some("mul"), &[("a", "french"), ("b", "english")])).is_empty());
    }

    #[test]
    fn multilingual_feed_with_one_language() {
        let notices = run(&feed(Some("mul"), &[("a", "X"), ("b", "X")]));
        assert_eq!(2, notices.len());
        let ids: Vec<&str> = notices.iter().map(|n| n.entity_id.as_str()).collect();
        assert_eq!(vec!["a", "b"], ids);
    }

    #[test]
    fn agency_speaking_another_language() {
        let notices = run(&feed(Some("en"), &[("a", "en"), ("b", "fr")]));
        assert_eq!(1, notices.len());
        let notice = notices.iter().next().unwrap();
        assert_eq!("b", notice.entity_id);
        assert_eq!("feed_info.txt", notice.filename);
        assert_eq!(crate::notice::Severity::Error, notice.severity);
        assert_eq!(Some(&Value::from("Agency b")), notice.extension("agencyName"));
        assert_eq!(Some(&Value::from("fr")), notice.extension("agencyAgencyLang"));
        assert_eq!(Some(&Value::from("en")), notice.extension("feedInfoFeedLang"));
    }
}
