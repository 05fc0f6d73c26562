//! # SDP Runtime Module
//!
//! Caller-facing service tying the callback dispatcher, the search
//! orchestrator and the record router together.
//!
//! ## Key Types
//!
//! - [`SdpService`] - the façade; one instance per host stack
//! - [`Dispatcher`] - single callback registration
//! - [`SdpConfig`] - JSON-loadable settings
//! - [`CompletionQueue`] - serialized completion context for collaborators
//!
//! ## Lifecycle
//!
//! 1. Build: `SdpService::new(engine, store)` or `SdpService::load("sdp.json", engine, store)`
//! 2. Register: `service.enable(callback)` (emits `Enabled`)
//! 3. Issue `search`, `create_record`, `remove_record`; completions arrive on the callback
//! 4. Shut down: `service.reset()`
//!
//! ## Example
//!
//! ```ignore
//! let service = SdpService::new(engine, store);
//! service.enable(Arc::new(|event: &SdpEvent| println!("{:?}", event)));
//! service.search(addr, uuid16(0x1101));
//! ```

pub mod completion;
pub mod config;
pub mod dispatcher;

pub use completion::CompletionQueue;
pub use config::{ConfigError, SdpConfig};
pub use dispatcher::{event_channel, Dispatcher, SdpCallback};

use crate::engine::{DiscoveryEngine, RecordStore};
use crate::logging::{LogFacade, LogLevel, SdpLogger};
use crate::sdp::{RecordRouter, SearchOrchestrator, WorkspaceGuard};
use crate::types::{BdAddr, Status, Uuid, UserToken};
use std::path::Path;
use std::sync::Arc;

/// Asynchronous SDP client façade. Every request returns an acceptance
/// status immediately; outcomes are delivered through the callback given
/// to [`SdpService::enable`].
pub struct SdpService {
    config: SdpConfig,
    dispatcher: Arc<Dispatcher>,
    searches: SearchOrchestrator,
    records: RecordRouter,
    logger: Arc<dyn SdpLogger>,
}

impl SdpService {
    pub fn new(engine: Arc<dyn DiscoveryEngine>, store: Arc<dyn RecordStore>) -> Self {
        Self::with_config(SdpConfig::default(), engine, store)
    }

    pub fn with_config(config: SdpConfig, engine: Arc<dyn DiscoveryEngine>, store: Arc<dyn RecordStore>) -> Self {
        Self::with_logger(config, engine, store, LogFacade::new())
    }

    pub fn with_logger(
        config: SdpConfig,
        engine: Arc<dyn DiscoveryEngine>,
        store: Arc<dyn RecordStore>,
        logger: Arc<dyn SdpLogger>,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(config.allow_rebind, Arc::clone(&logger)));
        let guard = WorkspaceGuard::new(config.effective_workspace_capacity());

        logger.log(
            LogLevel::Debug,
            "Runtime",
            &format!("Workspace capacity {} record(s)", guard.capacity()),
        );

        SdpService {
            searches: SearchOrchestrator::new(guard, engine, Arc::clone(&dispatcher), Arc::clone(&logger)),
            records: RecordRouter::new(store, Arc::clone(&dispatcher), Arc::clone(&logger)),
            dispatcher,
            config,
            logger,
        }
    }

    pub fn load<P: AsRef<Path>>(
        config_path: P,
        engine: Arc<dyn DiscoveryEngine>,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, ConfigError> {
        let config = SdpConfig::load(config_path)?;
        Ok(Self::with_config(config, engine, store))
    }

    /// Register the event sink and emit `Enabled` through it. With an
    /// existing registration this rebinds, or returns `Busy` if
    /// `allow_rebind` is off.
    pub fn enable(&self, callback: SdpCallback) -> Status {
        self.dispatcher.enable(callback)
    }

    /// Search `remote` for records of service class `uuid`.
    /// See [`SearchOrchestrator::search`].
    pub fn search(&self, remote: BdAddr, uuid: Uuid) -> Status {
        self.searches.search(remote, uuid)
    }

    /// Ask the record store to create the record tied to `token`;
    /// completes with `RecordCreated` echoing the token.
    pub fn create_record(&self, token: UserToken) -> Status {
        self.records.create_record(token)
    }

    /// Ask the record store to remove the record tied to `token`;
    /// completes with `RecordRemoved` echoing the token.
    pub fn remove_record(&self, token: UserToken) -> Status {
        self.records.remove_record(token)
    }

    /// Drop the callback registration. Requests fail until the next `enable`.
    /// A search still in flight keeps the workspace until its engine completes.
    pub fn reset(&self) {
        self.logger.log(LogLevel::Info, "Runtime", "Resetting SDP service");
        self.dispatcher.reset();
    }

    pub fn is_enabled(&self) -> bool {
        self.dispatcher.is_enabled()
    }

    pub fn search_in_flight(&self) -> bool {
        self.searches.in_flight()
    }

    pub fn config(&self) -> &SdpConfig {
        &self.config
    }
}
