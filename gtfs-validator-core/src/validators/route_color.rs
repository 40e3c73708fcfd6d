use super::{ValidationContext, Validator};
use crate::notice::{Notice, NoticeContainer};
use crate::repository::FeedRepository;
use log::debug;

/// Lowest accepted contrast ratio between `route_color` and `route_text_color`
const MIN_CONTRAST_RATIO: f64 = 4.5;

/// The text of a route must be readable against its color
pub struct RouteColorContrastValidator;

/// Relative luminance of a `RRGGBB` color, channels kept in 0..=255
fn luminance(color: &str) -> Option<f64> {
    if color.len() != 6 || !color.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&color[i..i + 2], 16).ok().map(f64::from);
    Some(0.2126 * channel(0)? + 0.7152 * channel(2)? + 0.0722 * channel(4)?)
}

fn contrast_ratio(color: &str, text_color: &str) -> Option<f64> {
    let (a, b) = (luminance(color)?, luminance(text_color)?);
    Some((a.max(b) + 0.05) / (a.min(b) + 0.05))
}

impl Validator for RouteColorContrastValidator {
    fn name(&self) -> &'static str {
        "route_color_contrast"
    }

    fn validate(&self, feed: &FeedRepository, _: &ValidationContext, notices: &mut NoticeContainer) {
        for route in &feed.routes {
            let (color, text_color) = match (&route.color, &route.text_color) {
                (Some(color), Some(text_color)) => (color, text_color),
                _ => continue,
            };
            match contrast_ratio(color, text_color) {
                Some(ratio) if ratio < MIN_CONTRAST_RATIO => notices.push(
                    Notice::route_color_and_text_insufficient_contrast(&route.id, ratio),
                ),
                Some(_) => {}
                None => debug!(
                    "route {} has colors {} and {} that are not RRGGBB",
                    route.id, color, text_color
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Route;
    use crate::pipeline::ValidationConfig;
    use crate::raw_row::RawRow;
    use crate::time_codec::HhMmSsCodec;
    use serde_json::Value;

    fn route(id: &str, color: Option<&str>, text_color: Option<&str>) -> Route {
        let mut row = RawRow::new()
            .with("route_id", id)
            .with("route_short_name", id)
            .with("route_type", 3);
        if let Some(color) = color {
            row = row.with("route_color", color);
        }
        if let Some(text_color) = text_color {
            row = row.with("route_text_color", text_color);
        }
        Route::build(&row).into_result().unwrap()
    }

    #[test]
    fn ratios() {
        assert_eq!(Some(1.0), contrast_ratio("a5ff00", "a5ff00"));
        assert!(contrast_ratio("FFFFFF", "000000").unwrap() > 5000.0);
        assert!(contrast_ratio("FF0000", "FFFFFF").unwrap() > MIN_CONTRAST_RATIO);
        assert_eq!(None, contrast_ratio("FFF", "000000"));
        assert_eq!(None, contrast_ratio("GGGGGG", "000000"));
    }

    #[test]
    fn unreadable_routes() {
        let mut feed = FeedRepository::default();
        for r in [
            route("contrasted", Some("FFFFFF"), Some("000000")),
            route("grey", Some("777777"), Some("FFFFFF")),
            route("no_text_color", Some("777777"), None),
            route("invalid", Some("77777"), Some("FFFFFF")),
        ] {
            feed.routes.insert(r);
        }
        let config = ValidationConfig::default();
        let context = ValidationContext {
            codec: &HhMmSsCodec,
            config: &config,
        };
        let mut notices = NoticeContainer::new();
        RouteColorContrastValidator.validate(&feed, &context, &mut notices);

        assert_eq!(1, notices.len());
        let notice = notices.iter().next().unwrap();
        assert_eq!("grey", notice.entity_id);
        assert_eq!("routes.txt", notice.filename);
        let ratio = notice.extension("contrastRatio").and_then(Value::as_f64).unwrap();
        assert!((ratio - 255.05 / 119.05).abs() < 1e-9);
    }
}
