//! Replay scenarios: a job table plus an ordered list of host events.
//!
//! ```toml
//! [[jobs]]
//! id = "abc"
//! files = [{ path = "show/ep1.mkv", size = 100 }]
//!
//! [[events]]
//! kind = "added"
//! job = "abc"
//! ```

use anyhow::{Context, Result};
use markincomplete_core::host::FileDescriptor;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Extension to use instead of the configured one.
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub jobs: Vec<ScenarioJob>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioJob {
    pub id: String,
    /// Empty for a job still waiting for metadata.
    #[serde(default)]
    pub files: Vec<ScenarioFile>,
    /// Initial per-file progress; missing entries start at 0.
    #[serde(default)]
    pub progress: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub path: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScenarioEvent {
    /// Job added to the session.
    Added {
        job: String,
        #[serde(default)]
        from_state: bool,
    },
    /// Metadata arrived; `files` becomes the job layout. Without `job` the
    /// host handle is treated as unresolvable.
    Metadata {
        #[serde(default)]
        job: Option<String>,
        #[serde(default)]
        files: Vec<ScenarioFile>,
    },
    /// File progress update; reaching 1.0 emits a file-completed event.
    Progress {
        job: String,
        index: usize,
        progress: f64,
    },
    /// Let time pass so deferred renames can run.
    Wait { secs: f64 },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read scenario: {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("parse scenario: {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }
}

/// Layout with indices assigned by position.
pub fn descriptors(files: &[ScenarioFile]) -> Vec<FileDescriptor> {
    files
        .iter()
        .enumerate()
        .map(|(i, f)| FileDescriptor::new(i, f.path.clone(), f.size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_event_kind() {
        let s = Scenario::parse(
            r#"
            extension = "part"

            [[jobs]]
            id = "a"
            files = [{ path = "x.bin", size = 3 }, { path = "y.bin" }]
            progress = [1.0]

            [[events]]
            kind = "added"
            job = "a"

            [[events]]
            kind = "metadata"

            [[events]]
            kind = "progress"
            job = "a"
            index = 1
            progress = 1.0

            [[events]]
            kind = "wait"
            secs = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(s.extension.as_deref(), Some("part"));
        assert_eq!(s.jobs[0].files.len(), 2);
        assert_eq!(s.jobs[0].files[1].size, 0);
        assert!(matches!(
            s.events[0],
            ScenarioEvent::Added { ref job, from_state: false } if job == "a"
        ));
        assert!(matches!(
            s.events[1],
            ScenarioEvent::Metadata { job: None, .. }
        ));
        assert!(matches!(
            s.events[2],
            ScenarioEvent::Progress { index: 1, .. }
        ));
        assert!(matches!(s.events[3], ScenarioEvent::Wait { .. }));
    }

    #[test]
    fn unknown_event_kind_is_an_error() {
        assert!(Scenario::parse("[[events]]\nkind = \"explode\"\n").is_err());
    }

    #[test]
    fn descriptors_are_indexed_by_position() {
        let files = vec![
            ScenarioFile {
                path: "a".into(),
                size: 1,
            },
            ScenarioFile {
                path: "b".into(),
                size: 2,
            },
        ];
        let d = descriptors(&files);
        assert_eq!(d[1], FileDescriptor::new(1, "b", 2));
    }
}
