//! # Collaborator Module
//!
//! The seams between the service and the components doing the real work:
//! the discovery engine and the local record database.
//!
//! - [`DiscoveryEngine`] / [`RecordStore`] - traits hosts implement
//! - [`LoopbackEngine`] - in-process engine over simulated devices
//! - [`MemoryRecordStore`] - volatile record database

pub mod traits;
pub mod loopback;
pub mod memory;

pub use traits::*;
pub use loopback::LoopbackEngine;
pub use memory::MemoryRecordStore;
