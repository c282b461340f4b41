/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! One rendering request, end to end:
//!
//! ```text
//! RawRecord stream ──ingest──► GridIndex ──enumerate──► Vec<Entry> ──sort──► GridRenderer ──► String
//! ```
//!
//! Every call owns a fresh [`GridIndex`]; nothing is shared between requests.

use tracing::debug;

use crate::config::RenderConfig;
use crate::error::GridError;
use crate::index::GridIndex;
use crate::lesson::RawRecord;
use crate::render::{sort_entries, GridRenderer};

/// Build the grid markup for `records`.
///
/// # Errors
/// Any [`GridError`] from ingestion or rendering; no partial output is
/// returned.
pub fn render_timetable<I>(records: I, config: &RenderConfig) -> Result<String, GridError>
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut index = GridIndex::new();
    let report = index.ingest(records, config.on_malformed)?;

    let mut entries = index.enumerate();
    sort_entries(&mut entries);
    debug!(
        entries = entries.len(),
        records = report.inserted,
        "entries sorted"
    );

    GridRenderer::new(config).render(&entries)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MalformedPolicy;

    fn raw(period: &str, hours: &str, name: &str, weekday: &str) -> RawRecord {
        RawRecord {
            period: period.into(),
            hours: hours.into(),
            lesson_name: name.into(),
            teacher_id: "xK".into(),
            classroom: "101".into(),
            weekday: weekday.into(),
        }
    }

    #[test]
    fn unordered_records_render_in_grid_order() {
        let records = vec![
            raw("2", "09:00-09:45", "Bio", "1"),
            raw("1", "08:00-08:45", "Math", "3"),
            raw("1", "08:00-08:45", "Art", "0"),
            raw("1", "08:00-08:45", "Music", "0"),
        ];

        let html = render_timetable(records, &RenderConfig::default()).unwrap();

        let art = html.find("Art").unwrap();
        let music = html.find("Music").unwrap();
        let math = html.find("Math").unwrap();
        let bio = html.find("Bio").unwrap();
        assert!(art < music && music < math && math < bio);
        assert_eq!(html.matches("<tr ").count(), 2);
        assert!(html.contains("<span>Art xK 101</span><br/><span>Music xK 101</span><br/>"));
    }

    #[test]
    fn no_records_renders_nothing() {
        let html = render_timetable(Vec::new(), &RenderConfig::default()).unwrap();
        assert!(html.is_empty());
    }

    #[test]
    fn malformed_record_aborts_by_default() {
        let records = vec![raw("1", "h", "ok", "0"), raw("one", "h", "bad", "0")];
        let err = render_timetable(records, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::MalformedRecord { position: 1, .. }));
    }

    #[test]
    fn malformed_record_is_dropped_under_skip() {
        let config = RenderConfig {
            on_malformed: MalformedPolicy::Skip,
            ..RenderConfig::default()
        };
        let records = vec![raw("1", "h", "ok", "0"), raw("one", "h", "bad", "0")];

        let html = render_timetable(records, &config).unwrap();
        assert!(html.contains("ok"));
        assert!(!html.contains("bad"));
    }
}
