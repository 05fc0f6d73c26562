use super::traits::{DiscoveryEngine, SearchCompletion};
use crate::runtime::completion::CompletionQueue;
use crate::sdp::workspace::WorkspaceLease;
use crate::types::{BdAddr, RecordDescriptor, Status, Uuid};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// In-process discovery engine answering from a table of simulated remote
/// devices. Unknown devices complete with `Failure`, as a page timeout would.
/// Completions are signalled from the engine's own completion queue.
pub struct LoopbackEngine {
    devices: Arc<RwLock<HashMap<BdAddr, Vec<RecordDescriptor>>>>,
    queue: CompletionQueue,
}

impl LoopbackEngine {
    pub fn new() -> std::io::Result<Self> {
        Ok(LoopbackEngine {
            devices: Arc::new(RwLock::new(HashMap::new())),
            queue: CompletionQueue::new("sdp-loopback")?,
        })
    }

    /// Make `addr` reachable, advertising no records yet.
    pub fn add_device(&self, addr: BdAddr) {
        self.devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(addr)
            .or_default();
    }

    pub fn add_record(&self, addr: BdAddr, record: RecordDescriptor) {
        self.devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(addr)
            .or_default()
            .push(record);
    }

    pub fn remove_device(&self, addr: &BdAddr) -> bool {
        self.devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(addr)
            .is_some()
    }

    /// Wait until every completion signalled so far has been delivered.
    pub fn flush(&self) {
        self.queue.flush();
    }
}

impl DiscoveryEngine for LoopbackEngine {
    fn begin_search(
        &self,
        mut workspace: WorkspaceLease,
        remote: BdAddr,
        uuid: Uuid,
        on_complete: SearchCompletion,
    ) {
        let devices = Arc::clone(&self.devices);
        self.queue.post(move || {
            let advertised = devices
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&remote)
                .cloned();

            let status = match advertised {
                Some(records) => {
                    // Overflow is counted by the workspace, not stored.
                    for record in records.into_iter().filter(|r| r.matches(&uuid)) {
                        workspace.push(record);
                    }
                    Status::Success
                }
                None => Status::Failure,
            };
            on_complete(workspace, status);
        });
    }
}
