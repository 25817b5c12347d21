//! Fixed-layout binary codec for vision pipeline results.
//!
//! photonwire carries one frame of vision pipeline output (detected targets,
//! a multi-tag pose estimate and latency) between a vision coprocessor and
//! its consumer as a compact, big-endian byte layout.
//!
//! # Crate Structure
//!
//! - [`packet`]: Byte cursor with typed, position-advancing primitives
//! - [`targeting`]: Target and pose records, and the pipeline result codec
//!
//! ```
//! use photonwire::targeting::{PipelineResult, TrackedTarget, WarnOnce};
//!
//! let result = PipelineResult::with_targets(12.5, vec![TrackedTarget::default()]).unwrap();
//! let mut packet = result.to_packet();
//! assert_eq!(packet.len(), result.packet_size());
//!
//! let mut received = PipelineResult::decode_from(&mut packet).unwrap();
//! received.set_timestamp_seconds(3.2);
//! assert!(received.best_target(&WarnOnce::new()).is_some());
//! ```

/// Re-export packet types.
pub mod packet {
    pub use photonwire_packet::*;
}

/// Re-export targeting types.
pub mod targeting {
    pub use photonwire_targeting::*;
}
