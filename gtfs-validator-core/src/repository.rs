//! Identity-keyed storage of the loaded entities
use crate::objects::*;
use crate::stops::Location;
use crate::translations::Translation;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// What happened to an entity given to [Table::insert]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// An entity with that identity is already stored and was kept
    Duplicate(Identity),
}

/// The entities of one kind, in insertion order, unique by identity
#[derive(Debug, Clone)]
pub struct Table<E> {
    rows: Vec<E>,
    index: FxHashMap<Vec<String>, usize>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<E: Entity> Table<E> {
    /// Stores the entity unless its identity is taken. Entities without identity are always stored
    pub fn insert(&mut self, entity: E) -> InsertOutcome {
        let identity = entity.identity();
        match identity.key() {
            None => {}
            Some(key) if self.index.contains_key(&key) => return InsertOutcome::Duplicate(identity),
            Some(key) => {
                self.index.insert(key, self.rows.len());
            }
        }
        self.rows.push(entity);
        InsertOutcome::Inserted
    }

    /// Looks an entity up by the values of its identity
    pub fn get<S: AsRef<str>>(&self, key: &[S]) -> Option<&E> {
        let key: Vec<String> = key.iter().map(|k| k.as_ref().to_owned()).collect();
        self.index.get(&key).map(|i| &self.rows[*i])
    }
}

impl<E> Table<E> {
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a, E> IntoIterator for &'a Table<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Every entity of one feed. It lives for one validation run
#[derive(Debug, Default, Clone)]
pub struct FeedRepository {
    pub agencies: Table<Agency>,
    pub locations: Table<Location>,
    pub routes: Table<Route>,
    pub trips: Table<Trip>,
    pub stop_times: Table<StopTime>,
    pub calendars: Table<Calendar>,
    pub calendar_dates: Table<CalendarDate>,
    pub fare_attributes: Table<FareAttribute>,
    pub fare_rules: Table<FareRule>,
    pub shapes: Table<Shape>,
    pub frequencies: Table<Frequency>,
    pub transfers: Table<Transfer>,
    pub pathways: Table<Pathway>,
    pub levels: Table<Level>,
    pub feed_info: Table<FeedInfo>,
    pub translations: Table<Translation>,
}

impl FeedRepository {
    pub fn agencies(&self) -> &[Agency] {
        &self.agencies.rows
    }

    /// The feed info, if the feed has one. Extra rows are ignored
    pub fn feed_info(&self) -> Option<&FeedInfo> {
        self.feed_info.rows.first()
    }

    pub fn trip(&self, trip_id: &str) -> Option<&Trip> {
        self.trips.get(&[trip_id])
    }

    pub fn location(&self, stop_id: &str) -> Option<&Location> {
        self.locations.get(&[stop_id])
    }

    pub fn calendar(&self, service_id: &str) -> Option<&Calendar> {
        self.calendars.get(&[service_id])
    }

    pub fn calendar_dates_for<'a>(
        &'a self,
        service_id: &'a str,
    ) -> impl Iterator<Item = &'a CalendarDate> + 'a {
        self.calendar_dates
            .iter()
            .filter(move |d| d.service_id == service_id)
    }

    /// Stop times grouped by trip, each group ordered by `stop_sequence`
    pub fn stop_times_by_trip(&self) -> BTreeMap<&str, Vec<&StopTime>> {
        let mut by_trip: BTreeMap<&str, Vec<&StopTime>> = BTreeMap::new();
        for stop_time in &self.stop_times {
            by_trip
                .entry(stop_time.trip_id.as_str())
                .or_default()
                .push(stop_time);
        }
        for stop_times in by_trip.values_mut() {
            stop_times.sort_by_key(|st| st.stop_sequence);
        }
        by_trip
    }

    /// Stop times of one trip ordered by `stop_sequence`
    pub fn stop_times_for_trip(&self, trip_id: &str) -> Vec<&StopTime> {
        let mut stop_times: Vec<&StopTime> = self
            .stop_times
            .iter()
            .filter(|st| st.trip_id == trip_id)
            .collect();
        stop_times.sort_by_key(|st| st.stop_sequence);
        stop_times
    }

    /// Shape points grouped by shape, each group ordered by `shape_pt_sequence`.
    /// Points sharing a sequence number keep their file order.
    pub fn shape_points_by_shape(&self) -> BTreeMap<&str, Vec<&Shape>> {
        let mut by_shape: BTreeMap<&str, Vec<&Shape>> = BTreeMap::new();
        for point in &self.shapes {
            by_shape.entry(point.id.as_str()).or_default().push(point);
        }
        for points in by_shape.values_mut() {
            points.sort_by_key(|p| p.sequence);
        }
        by_shape
    }

    /// Drops every entity of a file. Returns how many were stored
    pub fn clear(&mut self, file: GtfsFile) -> usize {
        fn take<E>(table: &mut Table<E>) -> usize {
            std::mem::take(table).len()
        }
        match file {
            GtfsFile::Agency => take(&mut self.agencies),
            GtfsFile::Stops => take(&mut self.locations),
            GtfsFile::Routes => take(&mut self.routes),
            GtfsFile::Trips => take(&mut self.trips),
            GtfsFile::StopTimes => take(&mut self.stop_times),
            GtfsFile::Calendar => take(&mut self.calendars),
            GtfsFile::CalendarDates => take(&mut self.calendar_dates),
            GtfsFile::FareAttributes => take(&mut self.fare_attributes),
            GtfsFile::FareRules => take(&mut self.fare_rules),
            GtfsFile::Shapes => take(&mut self.shapes),
            GtfsFile::Frequencies => take(&mut self.frequencies),
            GtfsFile::Transfers => take(&mut self.transfers),
            GtfsFile::Pathways => take(&mut self.pathways),
            GtfsFile::Levels => take(&mut self.levels),
            GtfsFile::FeedInfo => take(&mut self.feed_info),
            GtfsFile::Translations => take(&mut self.translations),
        }
    }

    /// Trips having a `block_id`, grouped by it, in file order
    pub fn trips_by_block(&self) -> BTreeMap<&str, Vec<&Trip>> {
        let mut by_block: BTreeMap<&str, Vec<&Trip>> = BTreeMap::new();
        for trip in &self.trips {
            if let Some(block_id) = &trip.block_id {
                by_block.entry(block_id.as_str()).or_default().push(trip);
            }
        }
        by_block
    }
}
