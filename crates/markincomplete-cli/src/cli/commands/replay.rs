//! `markincomplete replay` – drive the plugin with a scripted event sequence.

use anyhow::{Context, Result};
use markincomplete_core::bindings::METADATA_RENAME_DEFER;
use markincomplete_core::config::{validate_extension, PluginConfig};
use markincomplete_core::deferred::TokioScheduler;
use markincomplete_core::host::HostEvent;
use markincomplete_core::memory_host::{MemoryEventBus, MemoryHost};
use markincomplete_core::plugin::MarkIncomplete;
use std::fmt::Write as _;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use crate::cli::scenario::{descriptors, Scenario, ScenarioEvent};

pub async fn run_replay(cfg: &PluginConfig, path: &Path, extension: Option<&str>) -> Result<()> {
    let scenario = Scenario::load(path)?;

    let mut config = cfg.clone();
    if let Some(ext) = extension.or(scenario.extension.as_deref()) {
        validate_extension(ext).context("refusing extension")?;
        config.extension = ext.to_string();
    }

    // Deferred renames are local tasks; they need a LocalSet to run on.
    let local = tokio::task::LocalSet::new();
    let host = local.run_until(replay(config, scenario)).await?;
    print!("{}", render_jobs(&host));
    Ok(())
}

/// Run every scenario event through an enabled plugin and return the host.
pub async fn replay(config: PluginConfig, scenario: Scenario) -> Result<MemoryHost> {
    let host = MemoryHost::new();
    for job in &scenario.jobs {
        host.add_job(&job.id, descriptors(&job.files));
        for (index, progress) in job.progress.iter().enumerate() {
            host.set_progress(&job.id, index, *progress);
        }
    }

    let mut bus = MemoryEventBus::new();
    let mut plugin = MarkIncomplete::new(host.clone(), config, Rc::new(TokioScheduler));
    plugin.enable(&mut bus);

    let mut scheduled = false;
    for event in scenario.events {
        match event {
            ScenarioEvent::Added { job, from_state } => {
                bus.emit(&HostEvent::JobAdded {
                    job_id: job,
                    from_state,
                });
            }
            ScenarioEvent::Metadata { job, files } => {
                if let Some(id) = &job {
                    if !host.set_metadata(id, descriptors(&files)) {
                        tracing::warn!(job_id = %id, "metadata for unknown job ignored by host");
                    }
                }
                scheduled |= job.is_some();
                bus.emit(&HostEvent::MetadataReceived { job_id: job });
            }
            ScenarioEvent::Progress {
                job,
                index,
                progress,
            } => {
                host.set_progress(&job, index, progress);
                if progress >= 1.0 {
                    bus.emit(&HostEvent::FileCompleted { job_id: job, index });
                }
            }
            ScenarioEvent::Wait { secs } => {
                let delay = Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("invalid wait of {secs} seconds"))?;
                tokio::time::sleep(delay).await;
            }
        }
    }

    if scheduled {
        // Let outstanding deferred renames land before reporting.
        tokio::time::sleep(METADATA_RENAME_DEFER + Duration::from_millis(50)).await;
    }
    plugin.disable();
    Ok(host)
}

/// Current file names of every job, one indented line per file.
pub fn render_jobs(host: &MemoryHost) -> String {
    let mut out = String::new();
    for id in host.job_ids() {
        let _ = writeln!(out, "job {id}");
        let paths = host.current_paths(&id).unwrap_or_default();
        for (index, path) in paths.iter().enumerate() {
            let _ = writeln!(out, "  [{index}] {path}");
        }
    }
    out
}
