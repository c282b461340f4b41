/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Weekgrid – weekly timetable grid renderer
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── lesson      – Coordinate, LessonRecord, RawRecord parsing
//! ├── index/      – sparse (period, weekday) → lessons index
//! ├── render/     – sorted entries → table rows, growable output buffer
//! ├── error       – GridError
//! ├── pipeline    – records → index → sorted entries → markup
//! ├── config/     – YAML configuration
//! ├── source/     – RecordSource trait + YAML record file
//! ├── page        – template placeholder substitution
//! └── server/     – sequential HTTP responder
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod lesson;
pub mod page;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod source;

pub use error::GridError;
pub use pipeline::render_timetable;
