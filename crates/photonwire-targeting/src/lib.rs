//! Vision pipeline result records and their fixed-layout packet codec.
//!
//! One [`PipelineResult`] describes what the vision pipeline saw in a frame:
//! an ordered list of [`TrackedTarget`]s, a [`MultiTargetPnpResult`] and the
//! pipeline latency. It is encoded as:
//!
//! ```text
//! ┌───────────────┬──────────────────┬──────────┬──────────────────────┐
//! │ Latency (8B)  │ Multi-tag (201B) │ Count    │ Targets              │
//! │ f64 BE, ms    │ fixed record     │ (1B u8)  │ (Count x 284B)       │
//! └───────────────┴──────────────────┴──────────┴──────────────────────┘
//! ```
//!
//! The receive timestamp is local state and never goes on the wire.

pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod pnp;
pub mod result;
pub mod target;

pub use diagnostics::{TargetDiagnostics, WarnOnce};
pub use error::{Result, TargetingError};
pub use geometry::{Rotation3d, TargetCorner, Transform3d, Translation3d};
pub use pnp::{MultiTargetPnpResult, PnpResult, MAX_FIDUCIAL_IDS};
pub use result::{
    packet_size_for, PipelineResult, EMPTY_PACKET_SIZE, MAX_TARGETS, NO_TIMESTAMP,
};
pub use target::{TrackedTarget, CORNER_COUNT};
