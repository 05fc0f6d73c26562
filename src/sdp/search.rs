use super::workspace::{WorkspaceGuard, WorkspaceLease};
use crate::engine::DiscoveryEngine;
use crate::logging::{LogLevel, SdpLogger};
use crate::runtime::dispatcher::Dispatcher;
use crate::types::{BdAddr, SdpEvent, SearchResult, Status, Uuid, MAX_RECORDS};
use std::sync::Arc;

/// Drives one remote search at a time over the shared workspace.
pub struct SearchOrchestrator {
    guard: Arc<WorkspaceGuard>,
    engine: Arc<dyn DiscoveryEngine>,
    dispatcher: Arc<Dispatcher>,
    logger: Arc<dyn SdpLogger>,
}

impl SearchOrchestrator {
    pub fn new(
        guard: Arc<WorkspaceGuard>,
        engine: Arc<dyn DiscoveryEngine>,
        dispatcher: Arc<Dispatcher>,
        logger: Arc<dyn SdpLogger>,
    ) -> Self {
        SearchOrchestrator { guard, engine, dispatcher, logger }
    }

    /// Accept a search of `remote` for `uuid`.
    ///
    /// `Success` means accepted; the outcome arrives as `SearchCompleted`.
    /// `Busy` means another search holds the workspace. `Failure` means no
    /// callback is registered. Neither rejection emits an event.
    pub fn search(&self, remote: BdAddr, uuid: Uuid) -> Status {
        if !self.dispatcher.is_enabled() {
            self.logger.log(LogLevel::Warn, "Search", "Search rejected: service not enabled");
            return Status::Failure;
        }

        let Some(lease) = self.guard.try_reserve() else {
            self.logger.log(
                LogLevel::Debug,
                "Search",
                &format!("Search of {} rejected: workspace busy", remote.redacted()),
            );
            return Status::Busy;
        };

        self.logger.log(
            LogLevel::Info,
            "Search",
            &format!("Searching {} for {}", remote.redacted(), uuid),
        );
        self.dispatcher.deliver(&SdpEvent::SearchStarted { status: Status::Success });

        let dispatcher = Arc::clone(&self.dispatcher);
        let logger = Arc::clone(&self.logger);
        self.engine.begin_search(
            lease,
            remote,
            uuid,
            Box::new(move |lease: WorkspaceLease, status: Status| {
                // The lease is gone by the time the callback runs, so the
                // callback can start the next search straight away.
                let result = finish_search(lease, remote, uuid, status, logger.as_ref());
                dispatcher.deliver(&SdpEvent::SearchCompleted(result));
            }),
        );

        Status::Success
    }

    pub fn in_flight(&self) -> bool {
        self.guard.is_reserved()
    }
}

/// Build the result and release the workspace.
fn finish_search(
    mut lease: WorkspaceLease,
    remote: BdAddr,
    uuid: Uuid,
    status: Status,
    logger: &dyn SdpLogger,
) -> SearchResult {
    let status = status.completion();
    let records = lease.workspace_mut().take_records();
    let overflow = lease.workspace().dropped();
    lease.release();

    if !status.is_success() {
        logger.log(
            LogLevel::Warn,
            "Search",
            &format!("Search of {} failed", remote.redacted()),
        );
        return SearchResult::failed(remote, uuid);
    }

    let found = records.len() + overflow;
    if found > MAX_RECORDS {
        logger.log(
            LogLevel::Warn,
            "Search",
            &format!("{} records found on {}, delivering {}", found, remote.redacted(), MAX_RECORDS),
        );
    }

    let result = SearchResult::collect(status, remote, uuid, records);
    logger.log(
        LogLevel::Info,
        "Search",
        &format!("Search of {} complete: {} record(s)", remote.redacted(), result.record_count()),
    );
    result
}
