use super::address::BdAddr;
use super::record::RecordDescriptor;
use super::status::{EventKind, Status};
use uuid::Uuid;

/// Maximum number of records delivered in one search result.
pub const MAX_RECORDS: usize = 15;

/// Caller-supplied handle echoed back unchanged in record completion events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserToken(pub u64);

impl From<u64> for UserToken {
    fn from(v: u64) -> Self {
        UserToken(v)
    }
}

/// Result of one remote search. Holds at most [`MAX_RECORDS`] records;
/// the record count is always the length of the record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub status: Status,
    pub remote_addr: BdAddr,
    pub uuid: Uuid,
    records: Vec<RecordDescriptor>,
}

impl SearchResult {
    /// Build a result, keeping the first [`MAX_RECORDS`] records and
    /// silently dropping the rest.
    pub fn collect<I>(status: Status, remote_addr: BdAddr, uuid: Uuid, records: I) -> Self
    where
        I: IntoIterator<Item = RecordDescriptor>,
    {
        SearchResult {
            status,
            remote_addr,
            uuid,
            records: records.into_iter().take(MAX_RECORDS).collect(),
        }
    }

    pub fn failed(remote_addr: BdAddr, uuid: Uuid) -> Self {
        Self::collect(Status::Failure, remote_addr, uuid, std::iter::empty())
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[RecordDescriptor] {
        &self.records
    }

    pub fn into_records(self) -> Vec<RecordDescriptor> {
        self.records
    }
}

/// Completion payload delivered through the registered callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdpEvent {
    Enabled { status: Status },
    SearchStarted { status: Status },
    SearchCompleted(SearchResult),
    RecordCreated { status: Status, token: UserToken },
    RecordRemoved { status: Status, token: UserToken },
}

impl SdpEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SdpEvent::Enabled { .. } => EventKind::Enabled,
            SdpEvent::SearchStarted { .. } => EventKind::SearchStarted,
            SdpEvent::SearchCompleted(_) => EventKind::SearchCompleted,
            SdpEvent::RecordCreated { .. } => EventKind::RecordCreated,
            SdpEvent::RecordRemoved { .. } => EventKind::RecordRemoved,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            SdpEvent::Enabled { status }
            | SdpEvent::SearchStarted { status }
            | SdpEvent::RecordCreated { status, .. }
            | SdpEvent::RecordRemoved { status, .. } => *status,
            SdpEvent::SearchCompleted(result) => result.status,
        }
    }

    /// Token carried by record events.
    pub fn token(&self) -> Option<UserToken> {
        match self {
            SdpEvent::RecordCreated { token, .. } | SdpEvent::RecordRemoved { token, .. } => {
                Some(*token)
            }
            _ => None,
        }
    }
}
