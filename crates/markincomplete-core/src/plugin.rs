//! Plugin lifecycle: enable, reconfigure, disable.
//!
//! `enable` loads the configured extension into the orchestrator and
//! subscribes to host events; `disable` stops handling events and hands the
//! possibly-updated config back for the caller to persist.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::bindings::{self, SharedOrchestrator};
use crate::config::{validate_extension, ConfigError, PluginConfig};
use crate::deferred::Scheduler;
use crate::host::{EventSource, JobHost};
use crate::orchestrator::RenameOrchestrator;

pub struct MarkIncomplete<H: JobHost + 'static> {
    orchestrator: SharedOrchestrator<H>,
    scheduler: Rc<dyn Scheduler>,
    config: PluginConfig,
    enabled: Rc<Cell<bool>>,
    subscribed: bool,
}

impl<H: JobHost + 'static> MarkIncomplete<H> {
    pub fn new(host: H, config: PluginConfig, scheduler: Rc<dyn Scheduler>) -> Self {
        let orchestrator = RenameOrchestrator::new(host, config.extension.clone());
        Self {
            orchestrator: Rc::new(RefCell::new(orchestrator)),
            scheduler,
            config,
            enabled: Rc::new(Cell::new(false)),
            subscribed: false,
        }
    }

    /// Start reacting to host events.
    ///
    /// The host has no unsubscribe, so the handler stays registered and
    /// checks the enabled flag; calling `enable` again only flips it back on.
    pub fn enable(&mut self, events: &mut dyn EventSource) {
        tracing::info!(extension = %self.config.extension, "starting markincomplete");
        self.enabled.set(true);
        if self.subscribed {
            return;
        }
        self.subscribed = true;

        events.request_file_completion_events();

        let orchestrator = Rc::clone(&self.orchestrator);
        let scheduler = Rc::clone(&self.scheduler);
        let enabled = Rc::clone(&self.enabled);
        tracing::debug!("registering handlers");
        events.subscribe(Box::new(move |event| {
            if enabled.get() {
                bindings::dispatch(&orchestrator, &scheduler, event);
            }
        }));
    }

    /// Stop handling events and return the config to persist.
    pub fn disable(&mut self) -> PluginConfig {
        self.update_config();
        self.enabled.set(false);
        tracing::info!("markincomplete disabled");
        self.config.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn extension(&self) -> String {
        self.orchestrator.borrow().extension().to_string()
    }

    pub fn set_extension(&self, extension: &str) -> Result<(), ConfigError> {
        validate_extension(extension)?;
        self.orchestrator.borrow_mut().set_extension(extension);
        Ok(())
    }

    pub fn orchestrator(&self) -> SharedOrchestrator<H> {
        Rc::clone(&self.orchestrator)
    }

    fn update_config(&mut self) {
        let current = self.extension();
        tracing::info!(
            "updating extension in config from {} to {}",
            self.config.extension,
            current
        );
        self.config.extension = current;
    }
}
