/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Append-only output buffer with doubling growth.
//!
//! Growth is explicit so a failed allocation surfaces as
//! [`GridError::AllocationFailure`] instead of aborting the process, and the
//! caller never sees a half-written string: the buffer is only turned into a
//! `String` by [`OutputBuffer::finish`].

use std::fmt;

use crate::error::GridError;

/// Capacity reserved up front, in bytes.
pub const INITIAL_CAPACITY: usize = 1024;

#[derive(Debug)]
pub struct OutputBuffer {
    buf: String,
}

impl OutputBuffer {
    /// Create a buffer with [`INITIAL_CAPACITY`] bytes reserved.
    pub fn new() -> Result<Self, GridError> {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, GridError> {
        let mut buf = String::new();
        buf.try_reserve_exact(capacity)
            .map_err(|_| GridError::AllocationFailure {
                what: "output buffer",
                requested: capacity,
            })?;
        Ok(Self { buf })
    }

    /// Append `s`, growing to `(capacity + len(s)) * 2` when it does not fit.
    pub fn push_str(&mut self, s: &str) -> Result<(), GridError> {
        self.ensure(s.len())?;
        self.buf.push_str(s);
        Ok(())
    }

    /// Append formatted text, e.g. `out.push_fmt(format_args!("{n}"))`.
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), GridError> {
        match args.as_str() {
            Some(s) => self.push_str(s),
            None => self.push_str(&fmt::format(args)),
        }
    }

    fn ensure(&mut self, additional: usize) -> Result<(), GridError> {
        let used = self.buf.len();
        let capacity = self.buf.capacity();
        if used + additional <= capacity {
            return Ok(());
        }

        let target = capacity.saturating_add(additional).saturating_mul(2);
        let grow_by = target - used;
        self.buf
            .try_reserve_exact(grow_by)
            .map_err(|_| GridError::AllocationFailure {
                what: "output buffer",
                requested: grow_by,
            })
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Hand over the finished text.
    pub fn finish(self) -> String {
        self.buf
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
