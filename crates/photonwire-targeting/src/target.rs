use std::hash::{Hash, Hasher};

use photonwire_packet::{Packet, PacketRecord, Result, F64_SIZE, I32_SIZE};
use serde::{Deserialize, Serialize};

use crate::geometry::{bits, TargetCorner, Transform3d};

/// Corners carried per corner set. Both sets are fixed-width on the wire.
pub const CORNER_COUNT: usize = 4;

/// One detected target in a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackedTarget {
    /// Horizontal angle to the target, degrees, positive right.
    pub yaw: f64,
    /// Vertical angle to the target, degrees, positive up.
    pub pitch: f64,
    /// Share of the image covered by the target, percent.
    pub area: f64,
    pub skew: f64,
    /// AprilTag id, or -1 when the target is not a fiducial.
    pub fiducial_id: i32,
    pub best_camera_to_target: Transform3d,
    pub alt_camera_to_target: Transform3d,
    pub pose_ambiguity: f64,
    pub min_area_rect_corners: [TargetCorner; CORNER_COUNT],
    pub detected_corners: [TargetCorner; CORNER_COUNT],
}

impl TrackedTarget {
    fn floats(&self) -> [f64; 5] {
        [
            self.yaw,
            self.pitch,
            self.area,
            self.skew,
            self.pose_ambiguity,
        ]
    }
}

impl Default for TrackedTarget {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            area: 0.0,
            skew: 0.0,
            fiducial_id: -1,
            best_camera_to_target: Transform3d::default(),
            alt_camera_to_target: Transform3d::default(),
            pose_ambiguity: 0.0,
            min_area_rect_corners: [TargetCorner::default(); CORNER_COUNT],
            detected_corners: [TargetCorner::default(); CORNER_COUNT],
        }
    }
}

impl PartialEq for TrackedTarget {
    fn eq(&self, other: &Self) -> bool {
        bits(self.floats()) == bits(other.floats())
            && self.fiducial_id == other.fiducial_id
            && self.best_camera_to_target == other.best_camera_to_target
            && self.alt_camera_to_target == other.alt_camera_to_target
            && self.min_area_rect_corners == other.min_area_rect_corners
            && self.detected_corners == other.detected_corners
    }
}

impl Eq for TrackedTarget {}

impl Hash for TrackedTarget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        bits(self.floats()).hash(state);
        self.fiducial_id.hash(state);
        self.best_camera_to_target.hash(state);
        self.alt_camera_to_target.hash(state);
        self.min_area_rect_corners.hash(state);
        self.detected_corners.hash(state);
    }
}

impl PacketRecord for TrackedTarget {
    const PACK_SIZE_BYTES: usize = 4 * F64_SIZE
        + I32_SIZE
        + 2 * Transform3d::PACK_SIZE_BYTES
        + F64_SIZE
        + 2 * CORNER_COUNT * TargetCorner::PACK_SIZE_BYTES;

    fn encode(&self, packet: &mut Packet) {
        packet.encode_f64(self.yaw);
        packet.encode_f64(self.pitch);
        packet.encode_f64(self.area);
        packet.encode_f64(self.skew);
        packet.encode_i32(self.fiducial_id);
        packet.encode_record(&self.best_camera_to_target);
        packet.encode_record(&self.alt_camera_to_target);
        packet.encode_f64(self.pose_ambiguity);
        for corner in self
            .min_area_rect_corners
            .iter()
            .chain(self.detected_corners.iter())
        {
            packet.encode_record(corner);
        }
    }

    fn decode(packet: &mut Packet) -> Result<Self> {
        let yaw = packet.decode_f64()?;
        let pitch = packet.decode_f64()?;
        let area = packet.decode_f64()?;
        let skew = packet.decode_f64()?;
        let fiducial_id = packet.decode_i32()?;
        let best_camera_to_target = packet.decode_record()?;
        let alt_camera_to_target = packet.decode_record()?;
        let pose_ambiguity = packet.decode_f64()?;
        let min_area_rect_corners = decode_corners(packet)?;
        let detected_corners = decode_corners(packet)?;

        Ok(Self {
            yaw,
            pitch,
            area,
            skew,
            fiducial_id,
            best_camera_to_target,
            alt_camera_to_target,
            pose_ambiguity,
            min_area_rect_corners,
            detected_corners,
        })
    }
}

fn decode_corners(packet: &mut Packet) -> Result<[TargetCorner; CORNER_COUNT]> {
    let mut corners = [TargetCorner::default(); CORNER_COUNT];
    for corner in &mut corners {
        *corner = packet.decode_record()?;
    }
    Ok(corners)
}
