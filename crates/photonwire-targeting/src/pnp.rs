//! Pose-estimation results computed from several visible fiducials.

use std::hash::{Hash, Hasher};

use photonwire_packet::{Packet, PacketRecord, BOOL_SIZE, F64_SIZE, I16_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetingError};
use crate::geometry::{bits, Transform3d};

/// Fiducial id slots in a [`MultiTargetPnpResult`].
pub const MAX_FIDUCIAL_IDS: usize = 32;

const UNUSED_ID_SLOT: i16 = -1;

/// A solvePnP solution. `is_present == false` means no solution was found;
/// the remaining fields are still carried verbatim.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PnpResult {
    pub is_present: bool,
    pub best: Transform3d,
    pub best_reproj_err: f64,
    pub alt: Transform3d,
    pub alt_reproj_err: f64,
    pub ambiguity: f64,
}

impl PnpResult {
    /// A present solution with a single candidate pose.
    pub fn single(best: Transform3d, best_reproj_err: f64) -> Self {
        Self {
            is_present: true,
            best,
            best_reproj_err,
            alt: best,
            alt_reproj_err: best_reproj_err,
            ambiguity: 0.0,
        }
    }

    /// A present solution with best and alternate candidates.
    pub fn with_alternate(
        best: Transform3d,
        best_reproj_err: f64,
        alt: Transform3d,
        alt_reproj_err: f64,
        ambiguity: f64,
    ) -> Self {
        Self {
            is_present: true,
            best,
            best_reproj_err,
            alt,
            alt_reproj_err,
            ambiguity,
        }
    }

    fn floats(&self) -> [f64; 3] {
        [self.best_reproj_err, self.alt_reproj_err, self.ambiguity]
    }
}

impl PartialEq for PnpResult {
    fn eq(&self, other: &Self) -> bool {
        self.is_present == other.is_present
            && self.best == other.best
            && self.alt == other.alt
            && bits(self.floats()) == bits(other.floats())
    }
}

impl Eq for PnpResult {}

impl Hash for PnpResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_present.hash(state);
        self.best.hash(state);
        self.alt.hash(state);
        bits(self.floats()).hash(state);
    }
}

impl PacketRecord for PnpResult {
    const PACK_SIZE_BYTES: usize = BOOL_SIZE + 2 * Transform3d::PACK_SIZE_BYTES + 3 * F64_SIZE;

    fn encode(&self, packet: &mut Packet) {
        packet.encode_bool(self.is_present);
        packet.encode_record(&self.best);
        packet.encode_f64(self.best_reproj_err);
        packet.encode_record(&self.alt);
        packet.encode_f64(self.alt_reproj_err);
        packet.encode_f64(self.ambiguity);
    }

    fn decode(packet: &mut Packet) -> photonwire_packet::Result<Self> {
        Ok(Self {
            is_present: packet.decode_bool()?,
            best: packet.decode_record()?,
            best_reproj_err: packet.decode_f64()?,
            alt: packet.decode_record()?,
            alt_reproj_err: packet.decode_f64()?,
            ambiguity: packet.decode_f64()?,
        })
    }
}

/// Field-relative pose estimated from every visible fiducial at once.
///
/// Check `estimated_pose.is_present` before using the pose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMultiTargetPnpResult")]
pub struct MultiTargetPnpResult {
    pub estimated_pose: PnpResult,
    fiducial_ids_used: Vec<i16>,
}

impl MultiTargetPnpResult {
    /// Build a result, rejecting id lists that do not fit the fixed slots.
    pub fn new(estimated_pose: PnpResult, fiducial_ids_used: Vec<i16>) -> Result<Self> {
        if fiducial_ids_used.len() > MAX_FIDUCIAL_IDS {
            return Err(TargetingError::TooManyFiducialIds {
                count: fiducial_ids_used.len(),
                max: MAX_FIDUCIAL_IDS,
            });
        }
        if let Some(&id) = fiducial_ids_used.iter().find(|&&id| id < 0) {
            return Err(TargetingError::InvalidFiducialId(id));
        }
        Ok(Self {
            estimated_pose,
            fiducial_ids_used,
        })
    }

    /// Ids of the fiducials that contributed to the solution.
    pub fn fiducial_ids_used(&self) -> &[i16] {
        &self.fiducial_ids_used
    }
}

impl PacketRecord for MultiTargetPnpResult {
    const PACK_SIZE_BYTES: usize = PnpResult::PACK_SIZE_BYTES + MAX_FIDUCIAL_IDS * I16_SIZE;

    fn encode(&self, packet: &mut Packet) {
        packet.encode_record(&self.estimated_pose);
        for slot in 0..MAX_FIDUCIAL_IDS {
            let id = self
                .fiducial_ids_used
                .get(slot)
                .copied()
                .unwrap_or(UNUSED_ID_SLOT);
            packet.encode_i16(id);
        }
    }

    fn decode(packet: &mut Packet) -> photonwire_packet::Result<Self> {
        let estimated_pose = packet.decode_record()?;

        let mut slots = [UNUSED_ID_SLOT; MAX_FIDUCIAL_IDS];
        for slot in &mut slots {
            *slot = packet.decode_i16()?;
        }
        // Every slot is read; padding and any other negative id are dropped.
        let fiducial_ids_used = slots.into_iter().filter(|&id| id >= 0).collect();

        Ok(Self {
            estimated_pose,
            fiducial_ids_used,
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawMultiTargetPnpResult {
    estimated_pose: PnpResult,
    fiducial_ids_used: Vec<i16>,
}

impl TryFrom<RawMultiTargetPnpResult> for MultiTargetPnpResult {
    type Error = TargetingError;

    fn try_from(raw: RawMultiTargetPnpResult) -> Result<Self> {
        Self::new(raw.estimated_pose, raw.fiducial_ids_used)
    }
}
