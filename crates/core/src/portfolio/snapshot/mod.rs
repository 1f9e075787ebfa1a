//! Daily snapshot module - the point-in-time NLV cache and its recorder.

mod snapshot_model;
mod snapshot_recorder;
mod snapshot_traits;

pub use snapshot_model::*;
pub use snapshot_recorder::SnapshotRecorder;
pub use snapshot_traits::*;
