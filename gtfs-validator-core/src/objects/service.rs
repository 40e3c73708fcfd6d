use super::{Entity, GtfsFile, Identity};
use crate::build::{BuildResult, FieldValidator};
use crate::enums::*;
use crate::raw_row::RawRow;
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;

/// A calender describes on which days the vehicle runs. See <https://gtfs.org/reference/static/#calendartxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calendar {
    /// Unique technical identifier (not for the traveller) of this calendar
    pub id: String,
    /// Does the service run on mondays
    pub monday: bool,
    /// Does the service run on tuesdays
    pub tuesday: bool,
    /// Does the service run on wednesdays
    pub wednesday: bool,
    /// Does the service run on thursdays
    pub thursday: bool,
    /// Does the service run on fridays
    pub friday: bool,
    /// Does the service run on saturdays
    pub saturday: bool,
    /// Does the service run on sundays
    pub sunday: bool,
    /// Start service day for the service interval
    pub start_date: NaiveDate,
    /// End service day for the service interval. This service day is included in the interval
    pub end_date: NaiveDate,
}

impl Calendar {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row).identified_by("service_id");
        let id = v.required_text("service_id");
        let monday = v.required_bool("monday");
        let tuesday = v.required_bool("tuesday");
        let wednesday = v.required_bool("wednesday");
        let thursday = v.required_bool("thursday");
        let friday = v.required_bool("friday");
        let saturday = v.required_bool("saturday");
        let sunday = v.required_bool("sunday");
        let start_date = v.required_date("start_date");
        let end_date = v.required_date("end_date");
        v.finish(|| {
            Some(Calendar {
                id: id?,
                monday: monday?,
                tuesday: tuesday?,
                wednesday: wednesday?,
                thursday: thursday?,
                friday: friday?,
                saturday: saturday?,
                sunday: sunday?,
                start_date: start_date?,
                end_date: end_date?,
            })
        })
    }

    /// Returns true if there is a service running on that day of the week
    pub fn runs_on(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Returns true if there is a service running on that day
    pub fn valid_weekday(&self, date: NaiveDate) -> bool {
        self.runs_on(date.weekday())
    }

    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> + '_ {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(move |d| self.runs_on(*d))
    }
}

impl Entity for Calendar {
    const FILE: GtfsFile = GtfsFile::Calendar;

    fn identity(&self) -> Identity {
        Identity::single("service_id", self.id.as_str())
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.start_date, self.end_date)
    }
}

/// Defines a specific date that can be added or removed from a [Calendar]. See <https://gtfs.org/reference/static/#calendar_datestxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDate {
    /// Identifier of the service that is modified at this date
    pub service_id: String,
    /// Date where the service will be added or deleted
    pub date: NaiveDate,
    /// Is the service added or deleted
    pub exception_type: Exception,
}

impl CalendarDate {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row);
        let service_id = v.required_text("service_id");
        let date = v.required_date("date");
        let exception_type = v.required_enum("exception_type");
        v.finish(|| {
            Some(CalendarDate {
                service_id: service_id?,
                date: date?,
                exception_type: exception_type?,
            })
        })
    }
}

impl Entity for CalendarDate {
    const FILE: GtfsFile = GtfsFile::CalendarDates;

    fn identity(&self) -> Identity {
        Identity::composite([
            ("service_id", self.service_id.clone()),
            ("date", self.date.format("%Y%m%d").to_string()),
        ])
    }
}

/// Meta-data about the feed. See <https://gtfs.org/reference/static/#feed_infotxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedInfo {
    /// Full name of the organization that publishes the dataset.
    pub name: String,
    /// URL of the dataset publishing organization's website
    pub url: String,
    /// Default language used for the text in this dataset
    pub lang: String,
    /// Defines the language that should be used when the data consumer doesn’t know the language of the rider
    pub default_lang: Option<String>,
    /// The dataset provides complete and reliable schedule information for service in the period from this date
    pub start_date: Option<NaiveDate>,
    /// The dataset provides complete and reliable schedule information for service in the period until this date
    pub end_date: Option<NaiveDate>,
    /// String that indicates the current version of their GTFS dataset
    pub version: Option<String>,
    /// Email address for communication regarding the GTFS dataset and data publishing practices
    pub contact_email: Option<String>,
    /// URL for contact information, a web-form, support desk, or other tools for communication regarding the GTFS dataset and data publishing practices
    pub contact_url: Option<String>,
}

impl FeedInfo {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row);
        let name = v.required_text("feed_publisher_name");
        let url = v.required_text("feed_publisher_url");
        let lang = v.required_text("feed_lang");
        let default_lang = v.optional_text("default_lang");
        let start_date = v.optional_date("feed_start_date");
        let end_date = v.optional_date("feed_end_date");
        let version = v.optional_text("feed_version");
        let contact_email = v.optional_text("feed_contact_email");
        let contact_url = v.optional_text("feed_contact_url");
        v.finish(|| {
            Some(FeedInfo {
                name: name?,
                url: url?,
                lang: lang?,
                default_lang,
                start_date,
                end_date,
                version,
                contact_email,
                contact_url,
            })
        })
    }
}

impl Entity for FeedInfo {
    const FILE: GtfsFile = GtfsFile::FeedInfo;

    fn identity(&self) -> Identity {
        Identity::none()
    }
}

impl fmt::Display for FeedInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A fare class. See <https://gtfs.org/reference/static/#fare_attributestxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareAttribute {
    /// Unique technical (not for the traveller) identifier for the FareAttribute
    pub id: String,
    /// Fare price, in the unit specified by [FareAttribute::currency]
    pub price: f64,
    /// Currency used to pay the fare.
    pub currency: String,
    ///Indicates when the fare must be paid
    pub payment_method: PaymentMethod,
    /// Indicates the number of transfers permitted on this fare, `None` for unlimited
    pub transfers: Option<Transfers>,
    /// Identifies the relevant agency for a fare
    pub agency_id: Option<String>,
    /// Length of time in seconds before a transfer expires
    pub transfer_duration: Option<u32>,
}

impl FareAttribute {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row).identified_by("fare_id");
        let id = v.required_text("fare_id");
        let price = v.required_float("price", 0.0..=f64::MAX);
        let currency = v.required_text("currency_type");
        let payment_method = v.required_enum("payment_method");
        let transfers = v.optional_enum("transfers");
        let agency_id = v.optional_text("agency_id");
        let transfer_duration = v.optional_integer("transfer_duration", 0..=u32::MAX as i64);
        v.finish(|| {
            Some(FareAttribute {
                id: id?,
                price: price?,
                currency: currency?,
                payment_method: payment_method?,
                transfers,
                agency_id,
                transfer_duration: transfer_duration.map(|d| d as u32),
            })
        })
    }
}

impl Entity for FareAttribute {
    const FILE: GtfsFile = GtfsFile::FareAttributes;

    fn identity(&self) -> Identity {
        Identity::single("fare_id", self.id.as_str())
    }
}

/// Rules to apply a [FareAttribute] to itineraries. See <https://gtfs.org/reference/static/#fare_rulestxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareRule {
    pub fare_id: String,
    pub route_id: Option<String>,
    pub origin_id: Option<String>,
    pub destination_id: Option<String>,
    pub contains_id: Option<String>,
}

impl FareRule {
    pub fn build(row: &RawRow) -> BuildResult<Self> {
        let mut v = FieldValidator::new(Self::FILE, row).identified_by("fare_id");
        let fare_id = v.required_text("fare_id");
        let route_id = v.optional_text("route_id");
        let origin_id = v.optional_text("origin_id");
        let destination_id = v.optional_text("destination_id");
        let contains_id = v.optional_text("contains_id");
        v.finish(|| {
            Some(FareRule {
                fare_id: fare_id?,
                route_id,
                origin_id,
                destination_id,
                contains_id,
            })
        })
    }
}

impl Entity for FareRule {
    const FILE: GtfsFile = GtfsFile::FareRules;

    fn identity(&self) -> Identity {
        Identity::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar_row() -> RawRow {
        RawRow::new()
            .with("service_id", "week")
            .with("monday", "1")
            .with("tuesday", "1")
            .with("wednesday", "1")
            .with("thursday", "1")
            .with("friday", "1")
            .with("saturday", "0")
            .with("sunday", "0")
            .with("start_date", "20200101")
            .with("end_date", "20201231")
    }

    #[test]
    fn calendar_weekdays() {
        let calendar = Calendar::build(&calendar_row()).into_result().unwrap();
        assert_eq!(5, calendar.weekdays().count());
        assert!(!calendar.runs_on(Weekday::Sun));
        // 2020-01-04 is a saturday
        assert!(!calendar.valid_weekday(NaiveDate::from_ymd_opt(2020, 1, 4).unwrap()));
    }

    #[test]
    fn calendar_day_flags_are_binary() {
        let row = calendar_row().with("sunday", "2");
        let result = Calendar::build(&row);
        assert_eq!(1, result.notices().len());
        assert_eq!("integer_out_of_range", result.notices()[0].code);
        assert_eq!("week", result.notices()[0].entity_id);
    }

    #[test]
    fn calendar_date_identity() {
        let row = RawRow::new()
            .with("service_id", "week")
            .with("date", "20200105")
            .with("exception_type", 1);
        let date = CalendarDate::build(&row).into_result().unwrap();
        assert_eq!(Exception::Added, date.exception_type);
        assert_eq!(
            Some(vec!["week".to_owned(), "20200105".to_owned()]),
            date.identity().key()
        );
    }

    #[test]
    fn unlimited_transfers() {
        let row = RawRow::new()
            .with("fare_id", "f1")
            .with("price", "1.50")
            .with("currency_type", "EUR")
            .with("payment_method", "0")
            .with("transfers", "");
        let fare = FareAttribute::build(&row).into_result().unwrap();
        assert_eq!(None, fare.transfers);
        assert_eq!(1.5, fare.price);
    }

    #[test]
    fn feed_info_with_one_broken_rule() {
        let row = RawRow::new()
            .with("feed_publisher_name", "Publisher")
            .with("feed_publisher_url", "http://example.com")
            .with("feed_lang", "fr")
            .with("feed_end_date", "2020-12-31");
        let result = FeedInfo::build(&row);
        let notices = result.notices();
        assert_eq!(1, notices.len());
        assert_eq!("invalid_date", notices[0].code);
        assert_eq!(crate::notice::NO_ID, notices[0].entity_id);
        assert_eq!("feed_info.txt", notices[0].filename);
    }

    #[test]
    fn fare_rule_with_one_broken_rule() {
        let row = RawRow::new().with("route_id", "r1").with("origin_id", "zone1");
        let result = FareRule::build(&row);
        let notices = result.notices();
        assert_eq!(1, notices.len());
        assert_eq!("missing_required_value", notices[0].code);
        assert_eq!(crate::notice::NO_ID, notices[0].entity_id);
        assert_eq!(
            Some(&serde_json::Value::from("fare_id")),
            notices[0].extension("fieldName")
        );
    }
}
