use crate::types::RecordDescriptor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Bounded buffer the discovery engine fills while a search is in flight.
#[derive(Debug)]
pub struct DiscoveryWorkspace {
    capacity: usize,
    records: Vec<RecordDescriptor>,
    dropped: usize,
}

impl DiscoveryWorkspace {
    pub fn new(capacity: usize) -> Self {
        DiscoveryWorkspace {
            capacity,
            records: Vec::with_capacity(capacity),
            dropped: 0,
        }
    }

    /// Append a discovered record. Returns false (and counts the record as
    /// dropped) once the workspace is full.
    pub fn push(&mut self, record: RecordDescriptor) -> bool {
        if self.records.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// Records that did not fit.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn records(&self) -> &[RecordDescriptor] {
        &self.records
    }

    pub fn take_records(&mut self) -> Vec<RecordDescriptor> {
        std::mem::take(&mut self.records)
    }

    fn clear(&mut self) {
        self.records.clear();
        self.dropped = 0;
    }
}

/// Single-owner guard over the shared discovery workspace.
///
/// State is `Idle` or `Reserved`. [`WorkspaceGuard::try_reserve`] moves
/// Idle -> Reserved with one compare-and-swap; dropping the returned
/// [`WorkspaceLease`] moves Reserved -> Idle. Overlapping reservations are
/// refused, never queued.
#[derive(Debug)]
pub struct WorkspaceGuard {
    reserved: AtomicBool,
    capacity: usize,
    slot: Mutex<Option<DiscoveryWorkspace>>,
}

impl WorkspaceGuard {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(WorkspaceGuard {
            reserved: AtomicBool::new(false),
            capacity,
            slot: Mutex::new(Some(DiscoveryWorkspace::new(capacity))),
        })
    }

    pub fn try_reserve(self: &Arc<Self>) -> Option<WorkspaceLease> {
        if self
            .reserved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }

        let workspace = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| DiscoveryWorkspace::new(self.capacity));

        Some(WorkspaceLease {
            guard: Arc::clone(self),
            workspace,
        })
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn release(&self, mut workspace: DiscoveryWorkspace) {
        workspace.clear();
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(workspace);
        self.reserved.store(false, Ordering::Release);
    }
}

/// Exclusive loan of the discovery workspace. Releases on drop, including
/// during unwinding, so a failed or abandoned search never wedges the guard.
#[derive(Debug)]
pub struct WorkspaceLease {
    guard: Arc<WorkspaceGuard>,
    workspace: DiscoveryWorkspace,
}

impl WorkspaceLease {
    pub fn workspace(&self) -> &DiscoveryWorkspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut DiscoveryWorkspace {
        &mut self.workspace
    }

    pub fn push(&mut self, record: RecordDescriptor) -> bool {
        self.workspace_mut().push(record)
    }

    /// Give the workspace back to the guard.
    pub fn release(self) {}
}

impl Drop for WorkspaceLease {
    fn drop(&mut self) {
        // A zero-capacity placeholder does not allocate.
        let workspace = std::mem::replace(&mut self.workspace, DiscoveryWorkspace::new(0));
        self.guard.release(workspace);
    }
}
