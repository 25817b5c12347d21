//! Fixed-width geometry records shared by targets and pose results.
//!
//! Floats compare and hash by their bit patterns, so every record is a total
//! `Eq` and a value always equals its own decoded copy (NaN included).

use std::hash::{Hash, Hasher};

use photonwire_packet::{Packet, PacketRecord, Result, F64_SIZE};
use serde::{Deserialize, Serialize};

pub(crate) fn bits<const N: usize>(values: [f64; N]) -> [u64; N] {
    values.map(f64::to_bits)
}

/// Translation in meters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Translation3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Translation3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn floats(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl PartialEq for Translation3d {
    fn eq(&self, other: &Self) -> bool {
        bits(self.floats()) == bits(other.floats())
    }
}

impl Eq for Translation3d {}

impl Hash for Translation3d {
    fn hash<H: Hasher>(&self, state: &mut H) {
        bits(self.floats()).hash(state);
    }
}

impl PacketRecord for Translation3d {
    const PACK_SIZE_BYTES: usize = 3 * F64_SIZE;

    fn encode(&self, packet: &mut Packet) {
        for v in self.floats() {
            packet.encode_f64(v);
        }
    }

    fn decode(packet: &mut Packet) -> Result<Self> {
        Ok(Self {
            x: packet.decode_f64()?,
            y: packet.decode_f64()?,
            z: packet.decode_f64()?,
        })
    }
}

/// Rotation as a unit quaternion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rotation3d {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation3d {
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn from_quaternion(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    fn floats(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }
}

impl Default for Rotation3d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PartialEq for Rotation3d {
    fn eq(&self, other: &Self) -> bool {
        bits(self.floats()) == bits(other.floats())
    }
}

impl Eq for Rotation3d {}

impl Hash for Rotation3d {
    fn hash<H: Hasher>(&self, state: &mut H) {
        bits(self.floats()).hash(state);
    }
}

impl PacketRecord for Rotation3d {
    const PACK_SIZE_BYTES: usize = 4 * F64_SIZE;

    fn encode(&self, packet: &mut Packet) {
        for v in self.floats() {
            packet.encode_f64(v);
        }
    }

    fn decode(packet: &mut Packet) -> Result<Self> {
        Ok(Self {
            w: packet.decode_f64()?,
            x: packet.decode_f64()?,
            y: packet.decode_f64()?,
            z: packet.decode_f64()?,
        })
    }
}

/// Rigid transform: translation followed by rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transform3d {
    pub translation: Translation3d,
    pub rotation: Rotation3d,
}

impl Transform3d {
    pub fn new(translation: Translation3d, rotation: Rotation3d) -> Self {
        Self {
            translation,
            rotation,
        }
    }
}

impl PacketRecord for Transform3d {
    const PACK_SIZE_BYTES: usize = Translation3d::PACK_SIZE_BYTES + Rotation3d::PACK_SIZE_BYTES;

    fn encode(&self, packet: &mut Packet) {
        packet.encode_record(&self.translation);
        packet.encode_record(&self.rotation);
    }

    fn decode(packet: &mut Packet) -> Result<Self> {
        Ok(Self {
            translation: packet.decode_record()?,
            rotation: packet.decode_record()?,
        })
    }
}

/// A corner in image pixel coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TargetCorner {
    pub x: f64,
    pub y: f64,
}

impl TargetCorner {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl PartialEq for TargetCorner {
    fn eq(&self, other: &Self) -> bool {
        bits([self.x, self.y]) == bits([other.x, other.y])
    }
}

impl Eq for TargetCorner {}

impl Hash for TargetCorner {
    fn hash<H: Hasher>(&self, state: &mut H) {
        bits([self.x, self.y]).hash(state);
    }
}

impl PacketRecord for TargetCorner {
    const PACK_SIZE_BYTES: usize = 2 * F64_SIZE;

    fn encode(&self, packet: &mut Packet) {
        packet.encode_f64(self.x);
        packet.encode_f64(self.y);
    }

    fn decode(packet: &mut Packet) -> Result<Self> {
        Ok(Self {
            x: packet.decode_f64()?,
            y: packet.decode_f64()?,
        })
    }
}
