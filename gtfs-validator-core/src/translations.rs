//! Rows of `translations.txt`, resolved by the shape of the record they translate
use crate::build::{BuildResult, FieldValidator};
use crate::notice::Notice;
use crate::objects::{Entity, GtfsFile, Identity};
use crate::raw_row::RawRow;
use crate::Error;
use std::fmt;

/// The tables whose fields can be translated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Agency,
    Stops,
    Routes,
    Trips,
    StopTimes,
    Pathways,
    Levels,
    FeedInfo,
    Attributions,
}

impl TableName {
    pub fn parse(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "agency" => TableName::Agency,
            "stops" => TableName::Stops,
            "routes" => TableName::Routes,
            "trips" => TableName::Trips,
            "stop_times" => TableName::StopTimes,
            "pathways" => TableName::Pathways,
            "levels" => TableName::Levels,
            "feed_info" => TableName::FeedInfo,
            "attributions" => TableName::Attributions,
            other => return Err(Error::UnknownTableName(other.to_owned())),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Agency => "agency",
            TableName::Stops => "stops",
            TableName::Routes => "routes",
            TableName::Trips => "trips",
            TableName::StopTimes => "stop_times",
            TableName::Pathways => "pathways",
            TableName::Levels => "levels",
            TableName::FeedInfo => "feed_info",
            TableName::Attributions => "attributions",
        }
    }

    /// Tables whose records are only identified by two fields
    pub fn has_composite_key(self) -> bool {
        matches!(self, TableName::StopTimes)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What every translation carries. See <https://gtfs.org/reference/static/#translationstxt>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationBase {
    pub table_name: TableName,
    /// Name of the translated field
    pub field_name: String,
    pub language: String,
    pub translation: String,
    /// Translates every occurrence of this value instead of one record
    pub field_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Translation {
    /// A field of `feed_info.txt`, which has a single row
    SingleRow(TranslationBase),
    /// A record identified by `record_id`, or every record holding `field_value`
    SimpleKey {
        base: TranslationBase,
        record_id: Option<String>,
    },
    /// A record identified by `record_id` and `record_sub_id`
    CompositeKey {
        base: TranslationBase,
        record_id: String,
        record_sub_id: String,
    },
}

fn illegal(v: &mut FieldValidator, field: &str, other: &str) {
    let notice = Notice::illegal_field_value_combination(v.filename(), field, other, None);
    v.reject(notice);
}

impl Translation {
    /// Fails only when `table_name` is not a translatable table
    pub fn build(row: &RawRow) -> Result<BuildResult<Self>, Error> {
        let mut v = FieldValidator::new(Self::FILE, row);
        let table_name = v
            .required_text("table_name")
            .map(|t| TableName::parse(&t))
            .transpose()?;
        let field_name = v.required_text("field_name");
        let language = v.required_text("language");
        let translation = v.required_text("translation");
        let record_id = v.optional_text("record_id");
        let record_sub_id = v.optional_text("record_sub_id");
        let field_value = v.optional_text("field_value");

        match table_name {
            Some(TableName::FeedInfo) => {
                for field in ["record_id", "record_sub_id", "field_value"] {
                    if v.has(field) {
                        illegal(&mut v, field, "table_name");
                    }
                }
            }
            Some(table) => {
                match (&record_id, &field_value) {
                    (Some(_), Some(_)) => illegal(&mut v, "record_id", "field_value"),
                    (None, None) => illegal(&mut v, "record_id", "field_value"),
                    _ => {}
                }
                if record_sub_id.is_some() {
                    if field_value.is_some() {
                        illegal(&mut v, "record_sub_id", "field_value");
                    } else if !table.has_composite_key() {
                        illegal(&mut v, "record_sub_id", "table_name");
                    }
                }
                if table.has_composite_key() && record_id.is_some() && record_sub_id.is_none() {
                    let notice = Notice::missing_required_value(v.filename(), "record_sub_id", None);
                    v.reject(notice);
                }
            }
            None => {}
        }

        Ok(v.finish(|| {
            let table_name = table_name?;
            let base = TranslationBase {
                table_name,
                field_name: field_name?,
                language: language?,
                translation: translation?,
                field_value,
            };
            Some(match (table_name, record_id, record_sub_id) {
                (TableName::FeedInfo, _, _) => Translation::SingleRow(base),
                (table, Some(record_id), Some(record_sub_id)) if table.has_composite_key() => {
                    Translation::CompositeKey {
                        base,
                        record_id,
                        record_sub_id,
                    }
                }
                (_, record_id, _) => Translation::SimpleKey { base, record_id },
            })
        }))
    }

    pub fn base(&self) -> &TranslationBase {
        match self {
            Translation::SingleRow(base)
            | Translation::SimpleKey { base, .. }
            | Translation::CompositeKey { base, .. } => base,
        }
    }
}

impl Entity for Translation {
    const FILE: GtfsFile = GtfsFile::Translations;

    fn identity(&self) -> Identity {
        let base = self.base();
        let mut parts = vec![
            ("table_name", base.table_name.as_str().to_owned()),
            ("field_name", base.field_name.clone()),
            ("language", base.language.clone()),
        ];
        match self {
            Translation::SingleRow(_) => {}
            Translation::SimpleKey {
                record_id: Some(record_id),
                ..
            } => parts.push(("record_id", record_id.clone())),
            Translation::SimpleKey { record_id: None, .. } => {
                parts.push(("field_value", base.field_value.clone().unwrap_or_default()))
            }
            Translation::CompositeKey {
                record_id,
                record_sub_id,
                ..
            } => {
                parts.push(("record_id", record_id.clone()));
                parts.push(("record_sub_id", record_sub_id.clone()));
            }
        }
        Identity::composite(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(table_name: &str) -> RawRow {
        RawRow::new()
            .with("table_name", table_name)
            .with("field_name", "stop_name")
            .with("language", "fr")
            .with("translation", "Gare")
    }

    fn codes(result: &BuildResult<Translation>) -> Vec<&str> {
        result.notices().iter().map(|n| n.code).collect()
    }

    #[test]
    fn feed_info_is_a_single_row() {
        let result = Translation::build(&row("feed_info")).unwrap();
        let translation = result.into_result().unwrap();
        assert!(matches!(translation, Translation::SingleRow(_)));
        assert_eq!(3, translation.identity().parts().len());
    }

    #[test]
    fn feed_info_rejects_record_fields() {
        let result = Translation::build(&row("feed_info").with("record_id", "x")).unwrap();
        assert_eq!(vec!["illegal_field_value_combination"], codes(&result));
    }

    #[test]
    fn stops_use_a_simple_key() {
        let translation = Translation::build(&row("stops").with("record_id", "s1"))
            .unwrap()
            .into_result()
            .unwrap();
        match &translation {
            Translation::SimpleKey { record_id, .. } => assert_eq!(Some("s1"), record_id.as_deref()),
            other => panic!("unexpected variant {:?}", other),
        }
        assert_eq!(Some("s1"), translation.identity().key().unwrap().last().map(|s| s.as_str()));
    }

    #[test]
    fn field_value_translates_every_record() {
        let translation = Translation::build(&row("routes").with("field_value", "Gare"))
            .unwrap()
            .into_result()
            .unwrap();
        assert!(matches!(translation, Translation::SimpleKey { record_id: None, .. }));
        assert_eq!("field_value", translation.identity().parts()[3].0);
    }

    #[test]
    fn stop_times_use_a_composite_key() {
        let translation = Translation::build(
            &row("stop_times")
                .with("record_id", "t1")
                .with("record_sub_id", "3"),
        )
        .unwrap()
        .into_result()
        .unwrap();
        assert!(matches!(translation, Translation::CompositeKey { .. }));
        assert_eq!(5, translation.identity().parts().len());
    }

    #[test]
    fn stop_times_need_the_sub_id() {
        let result = Translation::build(&row("stop_times").with("record_id", "t1")).unwrap();
        assert_eq!(vec!["missing_required_value"], codes(&result));
    }

    #[test]
    fn record_id_and_field_value_are_exclusive() {
        let both = row("stops").with("record_id", "s1").with("field_value", "Gare");
        assert_eq!(
            vec!["illegal_field_value_combination"],
            codes(&Translation::build(&both).unwrap())
        );
        assert_eq!(
            vec!["illegal_field_value_combination"],
            codes(&Translation::build(&row("stops")).unwrap())
        );
    }

    #[test]
    fn unknown_table_is_a_contract_violation() {
        let result = Translation::build(&row("calendar"));
        assert!(matches!(result, Err(Error::UnknownTableName(t)) if t == "calendar"));
    }

    #[test]
    fn missing_table_name_is_a_notice() {
        let result = Translation::build(&row("").with("record_id", "s1")).unwrap();
        assert_eq!(vec!["missing_required_value"], codes(&result));
    }
}
