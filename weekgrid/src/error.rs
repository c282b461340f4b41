/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for the grid core (index + renderer).
//!
//! Every variant fails the whole operation: the renderer either returns the
//! complete string or one of these, never a partial grid.  An empty input is
//! not an error.
//!
//! | Variant | Raised by |
//! |---|---|
//! | `MalformedRecord` | [`GridIndex::ingest`](crate::index::GridIndex::ingest) under `MalformedPolicy::Abort` |
//! | `AllocationFailure` | index storage or output buffer growth |
//! | `UnsortedEntries` | [`GridRenderer::render`](crate::render::GridRenderer::render) |

use thiserror::Error;

use crate::lesson::{Coordinate, RecordError};

#[derive(Debug, Error)]
pub enum GridError {
    /// Record number `position` (zero-based, in input order) had an
    /// unparseable integer field.
    #[error("record #{position} is malformed: {source}")]
    MalformedRecord {
        position: usize,
        #[source]
        source: RecordError,
    },

    /// Growing the output buffer or the index storage failed.
    #[error("failed to allocate {requested} more bytes for {what}")]
    AllocationFailure {
        what: &'static str,
        requested: usize,
    },

    /// The entries handed to the renderer were not strictly ascending by
    /// (row, column).
    #[error("entries are not sorted: {previous} is followed by {next}")]
    UnsortedEntries {
        previous: Coordinate,
        next: Coordinate,
    },
}
