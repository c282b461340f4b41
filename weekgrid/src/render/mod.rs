//! Grid renderer: sorted entries → HTML table rows.
//!
//! # Layout
//!
//! ```text
//! <tr> period | hours | mon | tue | wed | thu | fri </tr>
//!       ↑        ↑      └── weekday_count cells ──┘
//!       first lesson of the row's first group
//! ```
//!
//! 1. Filler rows for every period `1..first_row`, where `first_row` is the
//!    row of the *first* (smallest) sorted entry.
//! 2. For each entry, in (row, column) order:
//!    * a new row opens with the period and hours cells, followed by
//!      `column` empty cells;
//!    * inside a row, the gap to the previous entry's column is padded with
//!      empty cells;
//!    * the data cell stacks every lesson of the group;
//!    * the last entry of a row pads up to `weekday_count` and closes it.
//! 3. A trailing `</tr>` follows the last row.
//!
//! Row starts and ends are detected against the neighbouring entries; "no
//! previous entry" and "no next entry" are explicit `None`s, so the first
//! entry always opens a row and the last always closes one.

pub mod buffer;

use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::error::GridError;
use crate::index::Entry;
use crate::lesson::LessonRecord;

use buffer::OutputBuffer;

/// Apply the total order the renderer requires: row ascending, then column.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_unstable_by_key(|e| e.coordinate);
}

// ── GridRenderer ──────────────────────────────────────────────────────────────

/// Serialises sorted [`Entry`]s into table-row markup.
///
/// Lesson text is written verbatim.  Callers embedding untrusted text must
/// escape it before it reaches the index.
#[derive(Debug, Clone)]
pub struct GridRenderer {
    weekday_count: i32,
    open_row: String,
    open_cell: String,
    empty_cell: String,
}

impl GridRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        let open_cell = format!("<td class=\"{}\">", config.cell_class);
        Self {
            weekday_count: config.weekday_count,
            open_row: format!("<tr class=\"{}\">", config.row_class),
            empty_cell: format!("{open_cell}</td>"),
            open_cell,
        }
    }

    /// Render `entries`, which must be strictly ascending by coordinate
    /// (see [`sort_entries`]).
    ///
    /// An empty slice renders as the empty string.
    ///
    /// # Errors
    /// * [`GridError::UnsortedEntries`] if the precondition is violated.
    /// * [`GridError::AllocationFailure`] if the output cannot grow.
    pub fn render(&self, entries: &[Entry]) -> Result<String, GridError> {
        ensure_sorted(entries)?;

        let mut out = OutputBuffer::new()?;

        // NOTE: bounded by the smallest row, not the largest.  Rows after the
        // first data row are never padded.
        let filler_bound = entries.first().map_or(1, |e| e.coordinate.row);
        for period in 1..filler_bound {
            self.filler_row(&mut out, period)?;
        }

        let mut previous: Option<&Entry> = None;

        for (i, entry) in entries.iter().enumerate() {
            let row = entry.coordinate.row;
            let column = entry.coordinate.column;
            let next_row = entries.get(i + 1).map(|e| e.coordinate.row);

            match previous {
                Some(prev) if prev.coordinate.row == row => {
                    let gap = column
                        .saturating_sub(prev.coordinate.column)
                        .saturating_sub(1);
                    self.empty_cells(&mut out, gap)?;
                }
                _ => {
                    out.push_str(&self.open_row)?;
                    self.row_header(&mut out, entry.group.first())?;
                    self.empty_cells(&mut out, column)?;
                }
            }

            self.data_cell(&mut out, entry)?;

            if next_row != Some(row) {
                let trailing = (self.weekday_count - 1).saturating_sub(column);
                self.empty_cells(&mut out, trailing)?;
                out.push_str("</tr>")?;
            }

            previous = Some(entry);
        }

        if !entries.is_empty() {
            out.push_str("</tr>")?;
        }

        info!(
            entries = entries.len(),
            filler_rows = filler_bound.saturating_sub(1).max(0),
            bytes = out.len(),
            "grid rendered"
        );
        Ok(out.finish())
    }

    // ── Fragments ─────────────────────────────────────────────────────────────

    fn filler_row(&self, out: &mut OutputBuffer, period: i32) -> Result<(), GridError> {
        debug!(period, "filler row");
        out.push_str(&self.open_row)?;
        out.push_fmt(format_args!("{}{period}</td>", self.open_cell))?;
        out.push_str(&self.empty_cell)?;
        self.empty_cells(out, self.weekday_count)?;
        out.push_str("</tr>")
    }

    fn row_header(&self, out: &mut OutputBuffer, lesson: &LessonRecord) -> Result<(), GridError> {
        out.push_fmt(format_args!(
            "{open}{period}</td>{open}{hours}</td>",
            open = self.open_cell,
            period = lesson.row,
            hours = lesson.hours,
        ))
    }

    fn data_cell(&self, out: &mut OutputBuffer, entry: &Entry) -> Result<(), GridError> {
        out.push_str(&self.open_cell)?;
        for lesson in &entry.group {
            out.push_fmt(format_args!(
                "<span>{} {} {}</span><br/>",
                lesson.name, lesson.instructor, lesson.room
            ))?;
        }
        out.push_str("</td>")
    }

    /// Negative counts emit nothing.
    fn empty_cells(&self, out: &mut OutputBuffer, count: i32) -> Result<(), GridError> {
        for _ in 0..count {
            out.push_str(&self.empty_cell)?;
        }
        Ok(())
    }
}

fn ensure_sorted(entries: &[Entry]) -> Result<(), GridError> {
    match entries
        .windows(2)
        .find(|pair| pair[0].coordinate >= pair[1].coordinate)
    {
        Some(pair) => Err(GridError::UnsortedEntries {
            previous: pair[0].coordinate,
            next: pair[1].coordinate,
        }),
        None => Ok(()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
