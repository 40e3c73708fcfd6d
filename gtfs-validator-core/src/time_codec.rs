use crate::Error;
use chrono::NaiveDate;

/// Conversion between GTFS time strings and a signed offset.
///
/// Validators only ever compare offsets and render them back for notices,
/// so any bijection works.
pub trait TimeCodec {
    /// Converts a `HH:MM:SS` string (hours may exceed 24) into an offset
    fn to_seconds(&self, s: &str) -> Result<i32, Error>;
    /// Renders an offset back to its textual form
    fn to_hhmmss(&self, offset: i32) -> String;
}

/// Offsets are seconds since the start of the service day
#[derive(Debug, Default, Clone, Copy)]
pub struct HhMmSsCodec;

fn parse_time_impl(h: &str, m: &str, s: &str) -> Result<i32, std::num::ParseIntError> {
    let hours: i32 = h.parse()?;
    let minutes: i32 = m.parse()?;
    let seconds: i32 = s.parse()?;
    Ok(hours * 3600 + minutes * 60 + seconds)
}

impl TimeCodec for HhMmSsCodec {
    fn to_seconds(&self, s: &str) -> Result<i32, Error> {
        let invalid = || Error::InvalidTime(s.to_owned());
        let len = s.len();
        if !(7..=8).contains(&len) || !s.is_ascii() {
            return Err(invalid());
        }
        let (hour, min, sec) = (&s[..len - 6], &s[len - 5..len - 3], &s[len - 2..]);
        if &s[len - 6..len - 5] != ":" || &s[len - 3..len - 2] != ":" {
            return Err(invalid());
        }
        if [hour, min, sec]
            .iter()
            .any(|part| !part.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(invalid());
        }
        let seconds = parse_time_impl(hour, min, sec).map_err(|_| invalid())?;
        if min >= "60" || sec >= "60" {
            return Err(invalid());
        }
        Ok(seconds)
    }

    fn to_hhmmss(&self, offset: i32) -> String {
        let sign = if offset < 0 { "-" } else { "" };
        let time = offset.unsigned_abs();
        format!(
            "{}{:02}:{:02}:{:02}",
            sign,
            time / 3600,
            time % 3600 / 60,
            time % 60
        )
    }
}

/// Parses a GTFS `YYYYMMDD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_times_past_midnight() {
        let codec = HhMmSsCodec;
        assert_eq!(0, codec.to_seconds("00:00:00").unwrap());
        assert_eq!(7 * 3600 + 10 * 60, codec.to_seconds("7:10:00").unwrap());
        assert_eq!(25 * 3600 + 59, codec.to_seconds("25:00:59").unwrap());
        assert_eq!("25:00:59", codec.to_hhmmss(25 * 3600 + 59));
        assert_eq!("00:15:10", codec.to_hhmmss(910));
    }

    #[test]
    fn rejects_malformed_times() {
        let codec = HhMmSsCodec;
        for s in ["", "7:10", "07-10-00", "07:60:00", "07:10:61", "ab:10:00", "123:00:00", "+7:10:00"] {
            assert!(codec.to_seconds(s).is_err(), "{} should be rejected", s);
        }
    }

    #[test]
    fn parses_dates() {
        assert_eq!(NaiveDate::from_ymd_opt(2020, 2, 29), parse_date("20200229"));
        assert_eq!(None, parse_date("20190229"));
        assert_eq!(None, parse_date("2020-01-01"));
    }
}
