/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Lesson data structures for the timetable grid.
//!
//! Two distinct types model the two sides of ingestion:
//!
//! ```text
//! storage  ──(six text fields)──►  RawRecord  ──(parse)──►  LessonRecord  ──►  GridIndex
//!                                   ↑ untyped                  ↑ typed, immutable
//! ```
//!
//! # Ownership model
//! A `LessonRecord` is **moved** into exactly one [`Group`](crate::index::Group)
//! when it is inserted into the index.  Nothing mutates it afterwards.

use std::fmt;

use thiserror::Error;

// ── Coordinate ────────────────────────────────────────────────────────────────

/// A timetable slot: `row` is the period number, `column` the weekday number.
///
/// The derived `Ord` compares `row` first, then `column`, which is exactly the
/// order the renderer requires.  The index itself never relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: i32,
    pub column: i32,
}

impl Coordinate {
    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

// ── LessonRecord ──────────────────────────────────────────────────────────────

/// One timetable entry after its integer fields have been parsed.
///
/// Text fields are opaque: they are written into the rendered grid verbatim,
/// without any escaping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LessonRecord {
    /// Period number (grid row).
    pub row: i32,

    /// Display time of the period, e.g. `"08:00-08:45"`.
    pub hours: String,

    pub name: String,

    /// Instructor identifier.
    pub instructor: String,

    /// Room identifier.
    pub room: String,

    /// Weekday number (grid column), `0` = first weekday.
    pub column: i32,
}

impl LessonRecord {
    /// The slot this lesson occupies.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.row, self.column)
    }
}

// ── RawRecord ─────────────────────────────────────────────────────────────────

/// A record exactly as the storage layer hands it over: six text fields in the
/// order `period, hours, lesson_name, teacher_id, classroom, weekday`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    pub period: String,
    pub hours: String,
    pub lesson_name: String,
    pub teacher_id: String,
    pub classroom: String,
    pub weekday: String,
}

impl RawRecord {
    /// Build a raw record from the six fields in storage order.
    pub fn from_fields(fields: [String; 6]) -> Self {
        let [period, hours, lesson_name, teacher_id, classroom, weekday] = fields;
        Self {
            period,
            hours,
            lesson_name,
            teacher_id,
            classroom,
            weekday,
        }
    }

    /// Parse the integer fields and produce a [`LessonRecord`].
    ///
    /// Surrounding whitespace around `period` and `weekday` is ignored; any
    /// other content that is not a valid `i32` is rejected.
    ///
    /// # Errors
    /// [`RecordError::InvalidInteger`] naming the offending field and value.
    pub fn parse(self) -> Result<LessonRecord, RecordError> {
        let row = parse_int("period", &self.period)?;
        let column = parse_int("weekday", &self.weekday)?;

        Ok(LessonRecord {
            row,
            hours: self.hours,
            name: self.lesson_name,
            instructor: self.teacher_id,
            room: self.classroom,
            column,
        })
    }
}

fn parse_int(field: &'static str, value: &str) -> Result<i32, RecordError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| RecordError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

// ── RecordError ───────────────────────────────────────────────────────────────

/// Why a single raw record could not be turned into a [`LessonRecord`].
///
/// Carried inside [`GridError::MalformedRecord`](crate::error::GridError::MalformedRecord)
/// together with the record's position in the input stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("field '{field}' is not an integer: '{value}'")]
    InvalidInteger { field: &'static str, value: String },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
