/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Page templates: a static file with a placeholder where the grid goes.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    body: String,
}

impl Template {
    pub fn load(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open template: {}", path.display()))?;
        debug!(path = %path.display(), bytes = body.len(), "template loaded");
        Ok(Self { body })
    }

    pub fn from_string(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Replace every occurrence of `placeholder` with `content`.
    ///
    /// A template without the placeholder comes back unchanged.
    pub fn fill(&self, placeholder: &str, content: &str) -> String {
        if placeholder.is_empty() || !self.body.contains(placeholder) {
            warn!(placeholder, "template has no placeholder, grid not inserted");
            return self.body.clone();
        }
        self.body.replace(placeholder, content)
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
