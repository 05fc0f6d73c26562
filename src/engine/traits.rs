use crate::sdp::workspace::WorkspaceLease;
use crate::types::{BdAddr, Status, Uuid, UserToken};

/// Invoked once when a search ends. The engine hands the workspace back
/// together with its outcome; matching records are in the workspace.
pub type SearchCompletion = Box<dyn FnOnce(WorkspaceLease, Status) + Send + 'static>;

/// Invoked once when a record mutation ends, echoing the caller's token.
pub type RecordCompletion = Box<dyn FnOnce(Status, UserToken) + Send + 'static>;

/// Protocol engine performing the over-the-air service search.
/// Object-safe so hosts can plug in a real stack or a mock.
pub trait DiscoveryEngine: Send + Sync {
    /// Start searching `remote` for records of service class `uuid`.
    ///
    /// Must eventually call `on_complete` exactly once, including when the
    /// exchange cannot be started. May call it before returning.
    fn begin_search(
        &self,
        workspace: WorkspaceLease,
        remote: BdAddr,
        uuid: Uuid,
        on_complete: SearchCompletion,
    );
}

/// Local SDP record database.
pub trait RecordStore: Send + Sync {
    /// Create the record the caller associated with `token`.
    fn create(&self, token: UserToken, on_complete: RecordCompletion);

    /// Remove the record previously created for `token`.
    ///
    /// Only the token crosses this boundary: the store resolves the record
    /// handle it assigned at creation from the token itself.
    fn remove(&self, token: UserToken, on_complete: RecordCompletion);
}
