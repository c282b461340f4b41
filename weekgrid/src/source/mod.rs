//! Record sources: where raw lesson records come from.
//!
//! The grid core only needs an unordered stream of [`RawRecord`]s, so storage
//! sits behind the [`RecordSource`] trait.  [`YamlRecordFile`] reads a file of
//! six-element rows:
//! ```yaml
//! lessons:
//!   - [1, "08:00-08:45", "Math", "xK", "101", 0]
//!   - [1, "08:00-08:45", "Art",  "xK", "204", 0]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, info};

use crate::lesson::RawRecord;

/// Anything that can produce the raw records of one timetable.
pub trait RecordSource {
    /// Fetch every record.  Order carries no meaning.
    fn fetch(&self) -> Result<Vec<RawRecord>>;
}

/// In-memory source.
impl RecordSource for Vec<RawRecord> {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        Ok(self.clone())
    }
}

// ── YamlRecordFile ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RecordFile {
    #[serde(default)]
    lessons: Vec<Vec<Value>>,
}

/// Lesson records stored in a YAML file, re-read on every [`fetch`](RecordSource::fetch).
#[derive(Debug, Clone)]
pub struct YamlRecordFile {
    path: PathBuf,
    instructor: Option<String>,
}

impl YamlRecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            instructor: None,
        }
    }

    /// Keep only records whose teacher id equals `instructor`.
    pub fn with_instructor(mut self, instructor: Option<String>) -> Self {
        self.instructor = instructor;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for YamlRecordFile {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot open record file: {}", self.path.display()))?;

        let file: RecordFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", self.path.display()))?;

        let mut records = Vec::with_capacity(file.lessons.len());
        for (i, row) in file.lessons.into_iter().enumerate() {
            let record = row_to_record(row)
                .with_context(|| format!("lesson #{i} in {}", self.path.display()))?;

            if let Some(instructor) = &self.instructor {
                if &record.teacher_id != instructor {
                    continue;
                }
            }
            records.push(record);
        }

        info!(
            path = %self.path.display(),
            instructor = ?self.instructor,
            records = records.len(),
            "records fetched"
        );
        Ok(records)
    }
}

fn row_to_record(row: Vec<Value>) -> Result<RawRecord> {
    if row.len() != 6 {
        bail!("expected 6 fields, found {}", row.len());
    }

    let mut fields: [String; 6] = Default::default();
    for (slot, value) in fields.iter_mut().zip(row) {
        *slot = scalar_text(value)?;
    }
    debug!(?fields, "lesson row");

    Ok(RawRecord::from_fields(fields))
}

/// Text of a scalar YAML value; integer parsing is left to the grid core.
fn scalar_text(value: Value) -> Result<String> {
    Ok(match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s,
        other => bail!("field is not a scalar: {other:?}"),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const LESSONS: &str = r#"
lessons:
  - [1, "08:00-08:45", "Math", "xK", "101", 0]
  - [1, "08:00-08:45", "Art", "yZ", 204, 0]
  - [2, "09:00-09:45", "Bio", "xK", "B2", 3]
"#;

    #[test]
    fn fetch_converts_scalars_to_text() {
        let f = yaml_tempfile(LESSONS);
        let records = YamlRecordFile::new(f.path()).fetch().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].period, "1");
        assert_eq!(records[0].hours, "08:00-08:45");
        assert_eq!(records[0].lesson_name, "Math");
        assert_eq!(records[0].weekday, "0");
        assert_eq!(records[1].classroom, "204");
    }

    #[test]
    fn instructor_filter_keeps_matching_records() {
        let f = yaml_tempfile(LESSONS);
        let records = YamlRecordFile::new(f.path())
            .with_instructor(Some("xK".into()))
            .fetch()
            .unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.lesson_name.as_str()).collect();
        assert_eq!(names, vec!["Math", "Bio"]);
    }

    #[test]
    fn null_field_becomes_empty_text() {
        let f = yaml_tempfile("lessons:\n  - [1, ~, \"Gym\", \"xK\", ~, 2]\n");
        let records = YamlRecordFile::new(f.path()).fetch().unwrap();
        assert_eq!(records[0].hours, "");
        assert_eq!(records[0].classroom, "");
    }

    #[test]
    fn non_integer_period_is_passed_through_for_the_core_to_reject() {
        let f = yaml_tempfile("lessons:\n  - [\"first\", \"h\", \"n\", \"t\", \"c\", 0]\n");
        let records = YamlRecordFile::new(f.path()).fetch().unwrap();
        assert_eq!(records[0].period, "first");
        assert!(records[0].clone().parse().is_err());
    }

    #[test]
    fn wrong_arity_is_an_error() {
        let f = yaml_tempfile("lessons:\n  - [1, \"h\", \"n\"]\n");
        let err = YamlRecordFile::new(f.path()).fetch().unwrap_err();
        assert!(format!("{err:#}").contains("expected 6 fields"));
    }

    #[test]
    fn nested_value_is_an_error() {
        let f = yaml_tempfile("lessons:\n  - [1, [\"h\"], \"n\", \"t\", \"c\", 0]\n");
        assert!(YamlRecordFile::new(f.path()).fetch().is_err());
    }

    #[test]
    fn missing_lessons_key_means_no_records() {
        let f = yaml_tempfile("{}\n");
        assert!(YamlRecordFile::new(f.path()).fetch().unwrap().is_empty());
    }

    #[test]
    fn missing_file_returns_error() {
        assert!(YamlRecordFile::new("/nonexistent/lessons.yaml").fetch().is_err());
    }

    #[test]
    fn vec_source_returns_its_records() {
        let source = vec![RawRecord::default()];
        assert_eq!(source.fetch().unwrap().len(), 1);
    }
}
