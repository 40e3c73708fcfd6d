//! Loading of the rows, then validation of the loaded feed
use crate::build::BuildResult;
use crate::exclusion::DependencyTree;
use crate::notice::{Notice, NoticeContainer, Severity};
use crate::objects::*;
use crate::raw_row::RawRow;
use crate::repository::{FeedRepository, InsertOutcome, Table};
use crate::stops::Location;
use crate::time_codec::TimeCodec;
use crate::translations::Translation;
use crate::validators::{default_validators, ValidationContext};
use crate::Error;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Allows to parameterize how the feed is validated
///
/// ```
/// let config = gtfs_validator_core::ValidationConfig::default()
///     .multi_language_marker("mul")
///     .calendar_aware_block_overlap(false); // Only trips sharing a service_id can overlap
/// assert!(!config.calendar_aware_block_overlap);
/// ```
#[derive(Derivative, Debug, Clone)]
#[derivative(Default)]
pub struct ValidationConfig {
    /// Value of `feed_lang` announcing agencies speaking several languages
    #[derivative(Default(value = "\"mul\".to_owned()"))]
    pub multi_language_marker: String,
    /// Trips of a block with different `service_id`s overlap if their services can run the same day
    #[derivative(Default(value = "true"))]
    pub calendar_aware_block_overlap: bool,
    /// Dependencies between the files, the GTFS ones when `None`
    pub dependency_tree: Option<DependencyTree>,
    /// Accepted values of `min_transfer_time`, in seconds
    #[derivative(Default(value = "0..=86400"))]
    pub min_transfer_time_range: RangeInclusive<i64>,
}

impl ValidationConfig {
    /// Returns Self and can be chained
    pub fn multi_language_marker(mut self, marker: impl Into<String>) -> Self {
        self.multi_language_marker = marker.into();
        self
    }

    /// Should trips with different services be checked for overlaps (default: true)
    pub fn calendar_aware_block_overlap(mut self, calendar_aware: bool) -> Self {
        self.calendar_aware_block_overlap = calendar_aware;
        self
    }

    pub fn dependency_tree(mut self, tree: DependencyTree) -> Self {
        self.dependency_tree = Some(tree);
        self
    }

    /// A transfer time outside of this range is suspicious (default: 0 to 24 hours)
    pub fn min_transfer_time_range(mut self, range: RangeInclusive<i64>) -> Self {
        self.min_transfer_time_range = range;
        self
    }

    pub fn dependencies(&self) -> &DependencyTree {
        self.dependency_tree
            .as_ref()
            .unwrap_or_else(|| DependencyTree::gtfs())
    }
}

/// First phase: builds the entities row by row and stores them.
///
/// Rows of one file must be given in file order, first occurrences win over duplicates.
pub struct FeedLoader<'c> {
    config: ValidationConfig,
    codec: &'c dyn TimeCodec,
    excluded: BTreeSet<String>,
    repository: FeedRepository,
    notices: NoticeContainer,
}

fn store<E: Entity>(table: &mut Table<E>, notices: &mut NoticeContainer, result: BuildResult<E>) {
    match result {
        BuildResult::Success(entity) => {
            if let InsertOutcome::Duplicate(identity) = table.insert(entity) {
                notices.push(Notice::duplicated_entity(E::FILE.file_name(), &identity));
            }
        }
        BuildResult::Failure(row_notices) => notices.extend(row_notices),
    }
}

impl<'c> FeedLoader<'c> {
    pub fn new(config: ValidationConfig, codec: &'c dyn TimeCodec) -> Self {
        Self {
            config,
            codec,
            excluded: BTreeSet::new(),
            repository: FeedRepository::default(),
            notices: NoticeContainer::new(),
        }
    }

    /// Skips the given files (missing or unreadable ones) and every file depending on them.
    /// Entities already loaded from an excluded file are dropped.
    ///
    /// Returns Self and can be chained
    pub fn exclude<I, S>(mut self, seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let closure = self.config.dependencies().exclusion_closure(seeds);
        if !closure.is_empty() {
            info!("excluded files: {:?}", closure);
        }
        for file_name in &closure {
            if let Ok(file) = GtfsFile::from_file_name(file_name) {
                let dropped = self.repository.clear(file);
                if dropped > 0 {
                    warn!("{}: {} loaded entities dropped", file, dropped);
                }
            }
        }
        self.excluded.extend(closure);
        self
    }

    pub fn is_excluded(&self, file: GtfsFile) -> bool {
        self.excluded.contains(file.file_name())
    }

    pub fn excluded_files(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Builds the entity of one row and stores it. Rows of excluded files are ignored.
    ///
    /// Only a contract violation, like an unknown translated table, is an error.
    /// Invalid data is reported in the notices.
    pub fn load_row(&mut self, file: GtfsFile, row: &RawRow) -> Result<(), Error> {
        if self.is_excluded(file) {
            return Ok(());
        }
        let (r, n, codec) = (&mut self.repository, &mut self.notices, self.codec);
        match file {
            GtfsFile::Agency => store(&mut r.agencies, n, Agency::build(row)),
            GtfsFile::Stops => store(&mut r.locations, n, Location::build(row)),
            GtfsFile::Routes => store(&mut r.routes, n, Route::build(row)),
            GtfsFile::Trips => store(&mut r.trips, n, Trip::build(row)),
            GtfsFile::StopTimes => store(&mut r.stop_times, n, StopTime::build(row, codec)),
            GtfsFile::Calendar => store(&mut r.calendars, n, Calendar::build(row)),
            GtfsFile::CalendarDates => store(&mut r.calendar_dates, n, CalendarDate::build(row)),
            GtfsFile::FareAttributes => {
                store(&mut r.fare_attributes, n, FareAttribute::build(row))
            }
            GtfsFile::FareRules => store(&mut r.fare_rules, n, FareRule::build(row)),
            GtfsFile::Shapes => store(&mut r.shapes, n, Shape::build(row)),
            GtfsFile::Frequencies => store(&mut r.frequencies, n, Frequency::build(row, codec)),
            GtfsFile::Transfers => store(&mut r.transfers, n, Transfer::build(row)),
            GtfsFile::Pathways => store(&mut r.pathways, n, Pathway::build(row)),
            GtfsFile::Levels => store(&mut r.levels, n, Level::build(row)),
            GtfsFile::FeedInfo => store(&mut r.feed_info, n, FeedInfo::build(row)),
            GtfsFile::Translations => store(&mut r.translations, n, Translation::build(row)?),
        }
        Ok(())
    }

    /// Loads every row of a file, in order. Returns how many rows were read
    pub fn load_file<'r, I>(&mut self, file: GtfsFile, rows: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = &'r RawRow>,
    {
        if self.is_excluded(file) {
            debug!("skipping {}: excluded", file);
            return Ok(0);
        }
        let mut count = 0;
        for row in rows {
            self.load_row(file, row)?;
            count += 1;
        }
        debug!("{}: {} rows loaded", file, count);
        Ok(count)
    }

    /// Like [FeedLoader::load_file], for a file known by its name
    pub fn load_named_file<'r, I>(&mut self, file_name: &str, rows: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = &'r RawRow>,
    {
        let file = GtfsFile::from_file_name(file_name)?;
        self.load_file(file, rows)
    }

    /// Notices emitted so far while building the entities
    pub fn notices(&self) -> &NoticeContainer {
        &self.notices
    }

    /// Ends the loading phase. Nothing can be added to the feed afterwards
    pub fn finish(self) -> LoadedFeed<'c> {
        info!(
            "loading done: {} notices, {} stop times, {} trips",
            self.notices.len(),
            self.repository.stop_times.len(),
            self.repository.trips.len()
        );
        LoadedFeed {
            config: self.config,
            codec: self.codec,
            excluded: self.excluded,
            repository: self.repository,
            load_notices: self.notices,
        }
    }
}

/// Second phase: a feed whose entities are all loaded, ready for the consistency checks
pub struct LoadedFeed<'c> {
    config: ValidationConfig,
    codec: &'c dyn TimeCodec,
    excluded: BTreeSet<String>,
    repository: FeedRepository,
    load_notices: NoticeContainer,
}

impl<'c> LoadedFeed<'c> {
    pub fn repository(&self) -> &FeedRepository {
        &self.repository
    }

    pub fn load_notices(&self) -> &NoticeContainer {
        &self.load_notices
    }

    /// Runs every validator over the repository. It can be called again with the same result
    pub fn validate(&self) -> NoticeContainer {
        let context = ValidationContext {
            codec: self.codec,
            config: &self.config,
        };
        let mut notices = NoticeContainer::new();
        for validator in default_validators() {
            let before = notices.len();
            validator.validate(&self.repository, &context, &mut notices);
            info!("{}: {} notices", validator.name(), notices.len() - before);
        }
        notices
    }

    /// Notices of both phases, loading ones first
    pub fn report(&self) -> ValidationReport {
        let mut notices = self.load_notices.clone();
        notices.extend(self.validate().into_vec());
        ValidationReport::new(notices, &self.excluded)
    }
}

/// The outcome of a validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub notices: Vec<Notice>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub excluded_files: Vec<String>,
}

impl ValidationReport {
    pub fn new(notices: NoticeContainer, excluded: &BTreeSet<String>) -> Self {
        Self {
            error_count: notices.count(Severity::Error),
            warning_count: notices.count(Severity::Warning),
            info_count: notices.count(Severity::Info),
            notices: notices.into_vec(),
            excluded_files: excluded.iter().cloned().collect(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
