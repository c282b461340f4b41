//! Configuration loading.
//!
//! Every field is optional; anything absent falls back to the values of
//! [`GridConfig::default`].  The expected YAML structure is:
//! ```yaml
//! source:
//!   records: data/timetable.yaml
//!   instructor: xK
//! render:
//!   weekday_count: 5
//!   row_class: "border-b border-gray"
//!   cell_class: "py-4 px-6"
//!   on_malformed: abort
//! template:
//!   placeholder: "%res%"
//!   routes:
//!     "/": templates/index.html
//! server:
//!   host: 127.0.0.1
//!   port: 8080
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::index::MalformedPolicy;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Maps directly onto the YAML file layout.  Callers work with
/// [`GridConfig`] instead.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GridConfigFile {
    source: SourceSection,
    render: RenderSection,
    template: TemplateSection,
    server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SourceSection {
    records: Option<PathBuf>,
    instructor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RenderSection {
    weekday_count: Option<i32>,
    row_class: Option<String>,
    cell_class: Option<String>,
    on_malformed: Option<MalformedPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TemplateSection {
    placeholder: Option<String>,
    routes: Option<BTreeMap<String, PathBuf>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Where lesson records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// YAML record file read by [`YamlRecordFile`](crate::source::YamlRecordFile).
    pub records: PathBuf,
    /// Keep only lessons taught by this instructor.  `None` keeps everything.
    pub instructor: Option<String>,
}

/// Grid layout and markup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Number of weekday columns; valid weekday numbers are
    /// `0..weekday_count`.
    pub weekday_count: i32,
    /// `class` attribute of every `<tr>`.
    pub row_class: String,
    /// `class` attribute of every `<td>`.
    pub cell_class: String,
    pub on_malformed: MalformedPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            weekday_count: 5,
            row_class: String::from("border-b border-gray"),
            cell_class: String::from("py-4 px-6"),
            on_malformed: MalformedPolicy::Abort,
        }
    }
}

/// Page template settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    /// Marker replaced by the rendered grid.
    pub placeholder: String,
    /// Request path → template file.
    pub routes: BTreeMap<String, PathBuf>,
}

/// HTTP responder settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub source: SourceConfig,
    pub render: RenderConfig,
    pub template: TemplateConfig,
    pub server: ServerConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        let mut routes = BTreeMap::new();
        routes.insert(String::from("/"), PathBuf::from("templates/index.html"));

        Self {
            source: SourceConfig {
                records: PathBuf::from("data/timetable.yaml"),
                instructor: None,
            },
            render: RenderConfig::default(),
            template: TemplateConfig {
                placeholder: String::from("%res%"),
                routes,
            },
            server: ServerConfig {
                host: String::from("127.0.0.1"),
                port: 8080,
            },
        }
    }
}

impl GridConfig {
    /// Parse `path` and overlay its values on the defaults.
    ///
    /// An empty file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or a value fails [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))?;

        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: GridConfigFile = if content.trim().is_empty() {
            GridConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let mut config = Self::default();

        if let Some(records) = file.source.records {
            config.source.records = records;
        }
        config.source.instructor = file.source.instructor;

        let render = &mut config.render;
        if let Some(v) = file.render.weekday_count {
            render.weekday_count = v;
        }
        if let Some(v) = file.render.row_class {
            render.row_class = v;
        }
        if let Some(v) = file.render.cell_class {
            render.cell_class = v;
        }
        if let Some(v) = file.render.on_malformed {
            render.on_malformed = v;
        }

        if let Some(v) = file.template.placeholder {
            config.template.placeholder = v;
        }
        if let Some(routes) = file.template.routes {
            config.template.routes = routes;
        }

        if let Some(v) = file.server.host {
            config.server.host = v;
        }
        if let Some(v) = file.server.port {
            config.server.port = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the renderer or templating cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.render.weekday_count < 1 {
            bail!(
                "render.weekday_count must be at least 1, got {}",
                self.render.weekday_count
            );
        }
        if self.template.placeholder.is_empty() {
            bail!("template.placeholder must not be empty");
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
