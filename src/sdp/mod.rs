//! # SDP Core Module
//!
//! - [`WorkspaceGuard`] - single-owner guard over the discovery workspace
//! - [`SearchOrchestrator`] - one remote search from request to completion event
//! - [`RecordRouter`] - local record create/remove relayed as events

pub mod workspace;
pub mod search;
pub mod records;

pub use workspace::{DiscoveryWorkspace, WorkspaceGuard, WorkspaceLease};
pub use search::SearchOrchestrator;
pub use records::RecordRouter;
