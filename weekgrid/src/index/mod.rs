//! Sparse (period, weekday) → lessons index.
//!
//! [`GridIndex`] groups lesson records by their [`Coordinate`]: the first
//! record at a slot creates its [`Group`], later ones are appended in the
//! order they were inserted.  [`GridIndex::enumerate`] hands the result over
//! as a `Vec<`[`Entry`]`>` in arbitrary order; sorting belongs to the
//! renderer's caller (see [`crate::render::sort_entries`]).
//!
//! # Lifecycle
//! One index per rendering request: created empty, filled from the record
//! stream, enumerated once (consuming it), dropped.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::GridError;
use crate::lesson::{Coordinate, LessonRecord, RawRecord};

// ── Group ─────────────────────────────────────────────────────────────────────

/// Lessons sharing one slot, in insertion order.  Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    lessons: Vec<LessonRecord>,
}

impl Group {
    /// A group always starts from its first lesson, so it can never be empty.
    pub fn new(first: LessonRecord) -> Self {
        Self {
            lessons: vec![first],
        }
    }

    fn push(&mut self, lesson: LessonRecord) -> Result<(), GridError> {
        self.lessons
            .try_reserve(1)
            .map_err(|_| GridError::AllocationFailure {
                what: "lesson group",
                requested: std::mem::size_of::<LessonRecord>(),
            })?;
        self.lessons.push(lesson);
        Ok(())
    }

    /// The first lesson inserted at this slot.
    pub fn first(&self) -> &LessonRecord {
        &self.lessons[0]
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LessonRecord> {
        self.lessons.iter()
    }

    pub fn as_slice(&self) -> &[LessonRecord] {
        &self.lessons
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a LessonRecord;
    type IntoIter = std::slice::Iter<'a, LessonRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.lessons.iter()
    }
}

// ── Entry ─────────────────────────────────────────────────────────────────────

/// A materialised (coordinate, group) pair, used for sorting and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub coordinate: Coordinate,
    pub group: Group,
}

// ── Ingest policy / report ────────────────────────────────────────────────────

/// What [`GridIndex::ingest`] does with a record whose integer fields do not
/// parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Stop at the first malformed record and return
    /// [`GridError::MalformedRecord`].
    #[default]
    Abort,
    /// Log a warning, drop the record and continue.
    Skip,
}

/// Counters returned by [`GridIndex::ingest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    pub inserted: usize,
    pub skipped: usize,
}

// ── GridIndex ─────────────────────────────────────────────────────────────────

/// Mapping from [`Coordinate`] to [`Group`] with insert-or-append semantics.
#[derive(Debug, Default)]
pub struct GridIndex {
    slots: HashMap<Coordinate, Group>,
    records: usize,
}

impl GridIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `lesson` at its coordinate, appending to an existing group if
    /// the slot is already occupied.
    ///
    /// # Errors
    /// [`GridError::AllocationFailure`] if the map or the group cannot grow.
    pub fn insert(&mut self, lesson: LessonRecord) -> Result<(), GridError> {
        let coordinate = lesson.coordinate();

        match self.slots.get_mut(&coordinate) {
            Some(group) => {
                group.push(lesson)?;
                debug!(%coordinate, lessons = group.len(), "appended to existing slot");
            }
            None => {
                self.slots
                    .try_reserve(1)
                    .map_err(|_| GridError::AllocationFailure {
                        what: "grid index",
                        requested: std::mem::size_of::<(Coordinate, Group)>(),
                    })?;
                self.slots.insert(coordinate, Group::new(lesson));
                debug!(%coordinate, "new slot");
            }
        }

        self.records += 1;
        Ok(())
    }

    /// Parse and insert every raw record in stream order.
    ///
    /// # Errors
    /// * [`GridError::MalformedRecord`] on the first unparseable record when
    ///   `policy` is [`MalformedPolicy::Abort`].  Records before it have
    ///   already been inserted; the index should be discarded.
    /// * [`GridError::AllocationFailure`] from [`insert`](Self::insert).
    pub fn ingest<I>(
        &mut self,
        records: I,
        policy: MalformedPolicy,
    ) -> Result<IngestReport, GridError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut report = IngestReport::default();

        for (position, raw) in records.into_iter().enumerate() {
            match raw.parse() {
                Ok(lesson) => {
                    self.insert(lesson)?;
                    report.inserted += 1;
                }
                Err(source) => match policy {
                    MalformedPolicy::Abort => {
                        return Err(GridError::MalformedRecord { position, source });
                    }
                    MalformedPolicy::Skip => {
                        warn!(position, error = %source, "skipping malformed record");
                        report.skipped += 1;
                    }
                },
            }
        }

        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            slots = self.slots.len(),
            "records ingested"
        );
        Ok(report)
    }

    /// The group stored at `coordinate`, if any.
    pub fn lookup(&self, coordinate: &Coordinate) -> Option<&Group> {
        self.slots.get(coordinate)
    }

    /// Number of distinct coordinates.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of lesson records across all groups.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Consume the index and return one [`Entry`] per stored coordinate.
    ///
    /// The order is unspecified.
    pub fn enumerate(self) -> Vec<Entry> {
        self.slots
            .into_iter()
            .map(|(coordinate, group)| Entry { coordinate, group })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lesson(row: i32, column: i32, name: &str) -> LessonRecord {
        LessonRecord {
            row,
            hours: format!("p{row}"),
            name: name.into(),
            instructor: "T1".into(),
            room: "R1".into(),
            column,
        }
    }

    fn raw(period: &str, weekday: &str, name: &str) -> RawRecord {
        RawRecord {
            period: period.into(),
            hours: "08:00-08:45".into(),
            lesson_name: name.into(),
            teacher_id: "T1".into(),
            classroom: "R1".into(),
            weekday: weekday.into(),
        }
    }

    fn sorted(index: GridIndex) -> Vec<Entry> {
        let mut entries = index.enumerate();
        entries.sort_by_key(|e| e.coordinate);
        entries
    }

    // ── insert / lookup ───────────────────────────────────────────────────────

    #[test]
    fn colliding_records_share_one_group_in_insertion_order() {
        let mut index = GridIndex::new();
        index.insert(lesson(1, 1, "a")).unwrap();
        index.insert(lesson(1, 1, "b")).unwrap();
        index.insert(lesson(2, 3, "c")).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.record_count(), 3);

        let entries = sorted(index);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].coordinate, Coordinate::new(1, 1));
        let names: Vec<&str> = entries[0].group.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        assert_eq!(entries[1].coordinate, Coordinate::new(2, 3));
        assert_eq!(entries[1].group.len(), 1);
        assert_eq!(entries[1].group.first().name, "c");
    }

    #[test]
    fn lookup_finds_only_occupied_slots() {
        let mut index = GridIndex::new();
        index.insert(lesson(3, 2, "x")).unwrap();

        let group = index.lookup(&Coordinate::new(3, 2)).unwrap();
        assert_eq!(group.first().name, "x");
        assert!(index.lookup(&Coordinate::new(2, 3)).is_none());
    }

    #[test]
    fn empty_index_enumerates_nothing() {
        let index = GridIndex::new();
        assert!(index.is_empty());
        assert!(index.enumerate().is_empty());
    }

    #[test]
    fn group_is_never_empty() {
        let group = Group::new(lesson(1, 0, "only"));
        assert!(!group.is_empty());
        assert_eq!(group.as_slice().len(), 1);
    }

    // ── ingest ────────────────────────────────────────────────────────────────

    #[test]
    fn ingest_parses_and_groups() {
        let mut index = GridIndex::new();
        let report = index
            .ingest(
                vec![raw("1", "0", "Math"), raw("1", "0", "Art"), raw("2", "4", "Bio")],
                MalformedPolicy::Abort,
            )
            .unwrap();

        assert_eq!(report, IngestReport { inserted: 3, skipped: 0 });
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup(&Coordinate::new(1, 0)).unwrap().len(), 2);
    }

    #[test]
    fn ingest_abort_reports_position_of_malformed_record() {
        let mut index = GridIndex::new();
        let err = index
            .ingest(
                vec![raw("1", "0", "ok"), raw("x", "0", "bad"), raw("2", "0", "late")],
                MalformedPolicy::Abort,
            )
            .unwrap_err();

        match err {
            GridError::MalformedRecord { position, .. } => assert_eq!(position, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ingest_skip_drops_malformed_records() {
        let mut index = GridIndex::new();
        let report = index
            .ingest(
                vec![raw("1", "0", "ok"), raw("1", "monday", "bad"), raw("2", "0", "ok2")],
                MalformedPolicy::Skip,
            )
            .unwrap();

        assert_eq!(report, IngestReport { inserted: 2, skipped: 1 });
        assert_eq!(index.record_count(), 2);
        assert!(index.lookup(&Coordinate::new(1, 0)).is_some());
    }

    #[test]
    fn default_policy_is_abort() {
        assert_eq!(MalformedPolicy::default(), MalformedPolicy::Abort);
    }

    // ── Properties ────────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn one_entry_per_coordinate_with_records_in_insertion_order(
            coords in prop::collection::vec((0i32..6, 0i32..5), 0..60)
        ) {
            let mut index = GridIndex::new();
            for (i, &(row, column)) in coords.iter().enumerate() {
                index.insert(lesson(row, column, &i.to_string())).unwrap();
            }

            let entries = index.enumerate();

            let mut seen: Vec<Coordinate> = entries.iter().map(|e| e.coordinate).collect();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), entries.len());

            let mut distinct: Vec<(i32, i32)> = coords.clone();
            distinct.sort();
            distinct.dedup();
            prop_assert_eq!(distinct.len(), entries.len());

            for entry in &entries {
                let expected: Vec<String> = coords
                    .iter()
                    .enumerate()
                    .filter(|(_, rc)| Coordinate::new(rc.0, rc.1) == entry.coordinate)
                    .map(|(i, _)| i.to_string())
                    .collect();
                let actual: Vec<String> = entry.group.iter().map(|l| l.name.clone()).collect();
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
