//! Position-tracking byte cursor for fixed-layout vision packets.
//!
//! This is the lowest layer of photonwire. A [`Packet`] owns a byte buffer and
//! a read position, and exposes typed encode/decode primitives:
//! - Every multi-byte value is big-endian (network order)
//! - Floating point values are IEEE-754 (`f32` = 4 bytes, `f64` = 8 bytes)
//! - Booleans are one byte, decoded as `byte != 0`
//!
//! Records with a constant wire width implement [`PacketRecord`] and compose
//! through the same primitives.

pub mod error;
pub mod packet;
pub mod record;

pub use error::{PacketError, Result};
pub use packet::{Packet, BOOL_SIZE, F32_SIZE, F64_SIZE, I16_SIZE, I32_SIZE, I64_SIZE};
pub use record::PacketRecord;
