//! # SDP Types Module
//!
//! Values exchanged between the caller, the service and its collaborators.
//!
//! ## Key Types
//!
//! - [`Status`] - Success / Failure / Busy outcome codes
//! - [`SdpEvent`] - Tagged completion payloads, one variant per [`EventKind`]
//! - [`SearchResult`] - Bounded list of discovered [`RecordDescriptor`]s
//! - [`BdAddr`] - 48-bit remote device address
//! - [`UserToken`] - Opaque correlation handle for record requests

pub mod status;
pub mod address;
pub mod record;
pub mod event;

pub use status::{Status, EventKind, status_text};
pub use address::{BdAddr, ParseAddrError, BASE_UUID, uuid16, uuid32, as_short_uuid};
pub use record::{RecordDescriptor, RecordType, ProtocolDescriptor, RecordHandle};
pub use event::{SdpEvent, SearchResult, UserToken, MAX_RECORDS};

pub use uuid::Uuid;
