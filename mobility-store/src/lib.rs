//! Host-side collaborators for `mobility-core`
//!
//! The core crate only defines the seams. This crate fills two of them for
//! hosts with a filesystem:
//!
//! - [`JsonFileStore`]: [`StateStore`](mobility_core::StateStore) over a flat
//!   JSON object on disk, committed atomically with write-then-rename
//! - [`JsonLinesSink`]: [`RecordSink`](mobility_core::RecordSink) writing one
//!   JSON object per record
//!
//! Uploading the records anywhere is left to the host.

pub mod error;
pub mod file_store;
pub mod sink;

pub use error::{StoreError, StoreResult};
pub use file_store::JsonFileStore;
pub use sink::{read_records, JsonLinesSink};
