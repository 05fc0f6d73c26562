use super::traits::{RecordCompletion, RecordStore};
use crate::runtime::completion::CompletionQueue;
use crate::types::{RecordDescriptor, RecordHandle, Status, UserToken};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Handles below this value are reserved for the SDP server's own record.
const FIRST_HANDLE: u32 = 0x0001_0000;

#[derive(Debug)]
struct StoreState {
    staged: HashMap<UserToken, RecordDescriptor>,
    live: HashMap<UserToken, (RecordHandle, RecordDescriptor)>,
    next_handle: u32,
}

impl StoreState {
    fn create(&mut self, token: UserToken) -> Status {
        if self.live.contains_key(&token) {
            return Status::Failure;
        }
        let Some(record) = self.staged.remove(&token) else {
            return Status::Failure;
        };
        let handle = RecordHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1).max(FIRST_HANDLE);
        self.live.insert(token, (handle, record));
        Status::Success
    }

    fn remove(&mut self, token: UserToken) -> Status {
        match self.live.remove(&token) {
            Some(_) => Status::Success,
            None => Status::Failure,
        }
    }
}

/// Volatile record database. Callers stage a record under a token, then ask
/// the service to create it; removal is keyed by the same token. Nothing
/// outlives the store.
pub struct MemoryRecordStore {
    state: Arc<Mutex<StoreState>>,
    queue: CompletionQueue,
}

impl MemoryRecordStore {
    pub fn new() -> std::io::Result<Self> {
        Ok(MemoryRecordStore {
            state: Arc::new(Mutex::new(StoreState {
                staged: HashMap::new(),
                live: HashMap::new(),
                next_handle: FIRST_HANDLE,
            })),
            queue: CompletionQueue::new("sdp-record-store")?,
        })
    }

    /// Associate the record a later create request for `token` will add.
    /// Replaces anything previously staged under the same token.
    pub fn stage(&self, token: UserToken, record: RecordDescriptor) {
        self.lock().staged.insert(token, record);
    }

    pub fn handle(&self, token: UserToken) -> Option<RecordHandle> {
        self.lock().live.get(&token).map(|(handle, _)| *handle)
    }

    pub fn record(&self, token: UserToken) -> Option<RecordDescriptor> {
        self.lock().live.get(&token).map(|(_, record)| record.clone())
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flush(&self) {
        self.queue.flush();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for MemoryRecordStore {
    fn create(&self, token: UserToken, on_complete: RecordCompletion) {
        let state = Arc::clone(&self.state);
        self.queue.post(move || {
            let status = state.lock().unwrap_or_else(PoisonError::into_inner).create(token);
            on_complete(status, token);
        });
    }

    fn remove(&self, token: UserToken, on_complete: RecordCompletion) {
        let state = Arc::clone(&self.state);
        self.queue.post(move || {
            let status = state.lock().unwrap_or_else(PoisonError::into_inner).remove(token);
            on_complete(status, token);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{uuid16, RecordType};
    use std::sync::mpsc;

    fn opp() -> RecordDescriptor {
        RecordDescriptor::new(RecordType::Ops, uuid16(0x1105)).with_name("OBEX Object Push")
    }

    fn create(store: &MemoryRecordStore, token: UserToken) -> (Status, UserToken) {
        let (tx, rx) = mpsc::channel();
        store.create(token, Box::new(move |s: Status, t: UserToken| tx.send((s, t)).unwrap()));
        rx.recv().unwrap()
    }

    fn remove(store: &MemoryRecordStore, token: UserToken) -> (Status, UserToken) {
        let (tx, rx) = mpsc::channel();
        store.remove(token, Box::new(move |s: Status, t: UserToken| tx.send((s, t)).unwrap()));
        rx.recv().unwrap()
    }

    #[test]
    fn test_create_staged_record() {
        let store = MemoryRecordStore::new().unwrap();
        store.stage(UserToken(1), opp());

        assert_eq!(create(&store, UserToken(1)), (Status::Success, UserToken(1)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.handle(UserToken(1)), Some(RecordHandle(FIRST_HANDLE)));
        assert_eq!(store.record(UserToken(1)).unwrap().service_name, "OBEX Object Push");
    }

    #[test]
    fn test_create_without_staged_record_fails() {
        let store = MemoryRecordStore::new().unwrap();
        assert_eq!(create(&store, UserToken(3)), (Status::Failure, UserToken(3)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_create_fails() {
        let store = MemoryRecordStore::new().unwrap();
        store.stage(UserToken(1), opp());
        create(&store, UserToken(1));
        store.stage(UserToken(1), opp());
        assert_eq!(create(&store, UserToken(1)).0, Status::Failure);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_handles_increase() {
        let store = MemoryRecordStore::new().unwrap();
        store.stage(UserToken(1), opp());
        store.stage(UserToken(2), opp());
        create(&store, UserToken(1));
        create(&store, UserToken(2));

        let first = store.handle(UserToken(1)).unwrap();
        let second = store.handle(UserToken(2)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_remove() {
        let store = MemoryRecordStore::new().unwrap();
        store.stage(UserToken(5), opp());
        create(&store, UserToken(5));

        assert_eq!(remove(&store, UserToken(5)), (Status::Success, UserToken(5)));
        assert!(store.is_empty());
        assert_eq!(remove(&store, UserToken(5)), (Status::Failure, UserToken(5)));
    }
}
