pub mod types;
pub mod logging;
pub mod engine;
pub mod runtime;
pub mod sdp;

pub use types::{
    BdAddr, EventKind, RecordDescriptor, RecordHandle, RecordType, ProtocolDescriptor,
    SdpEvent, SearchResult, Status, UserToken, Uuid, MAX_RECORDS, uuid16, uuid32,
};
pub use engine::{DiscoveryEngine, RecordStore, SearchCompletion, RecordCompletion, LoopbackEngine, MemoryRecordStore};
pub use sdp::{DiscoveryWorkspace, WorkspaceLease};
pub use runtime::*;
