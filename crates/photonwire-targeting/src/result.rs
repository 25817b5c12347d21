use std::fmt;
use std::hash::{Hash, Hasher};

use photonwire_packet::{Packet, PacketRecord, F64_SIZE};
use serde::{Deserialize, Serialize};

use crate::diagnostics::TargetDiagnostics;
use crate::error::{Result, TargetingError};
use crate::pnp::MultiTargetPnpResult;
use crate::target::TrackedTarget;

/// Largest target count the one-byte count field can carry.
pub const MAX_TARGETS: usize = u8::MAX as usize;

/// Timestamp of a result that has not been stamped by the receiver.
pub const NO_TIMESTAMP: f64 = -1.0;

const LATENCY_SIZE: usize = F64_SIZE;
const TARGET_COUNT_SIZE: usize = 1;

/// Encoded size of a result with no targets: latency + multi-tag + count.
pub const EMPTY_PACKET_SIZE: usize =
    LATENCY_SIZE + MultiTargetPnpResult::PACK_SIZE_BYTES + TARGET_COUNT_SIZE;

/// Encoded size of a result carrying `target_count` targets.
pub const fn packet_size_for(target_count: usize) -> usize {
    target_count * TrackedTarget::PACK_SIZE_BYTES + EMPTY_PACKET_SIZE
}

/// One frame of vision pipeline output.
///
/// The result owns its target list; the list can only be read through a
/// borrowed slice or copied out, so the encoded count always matches. Target
/// order is the upstream ranking and is never changed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPipelineResult")]
pub struct PipelineResult {
    targets: Vec<TrackedTarget>,
    latency_millis: f64,
    timestamp_seconds: f64,
    multi_tag_result: MultiTargetPnpResult,
}

impl PipelineResult {
    /// An empty result: no targets, zero latency, no multi-tag solution.
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            latency_millis: 0.0,
            timestamp_seconds: NO_TIMESTAMP,
            multi_tag_result: MultiTargetPnpResult::default(),
        }
    }

    /// A result without a multi-tag solution.
    pub fn with_targets(latency_millis: f64, targets: Vec<TrackedTarget>) -> Result<Self> {
        Self::with_multi_tag(latency_millis, targets, MultiTargetPnpResult::default())
    }

    /// A result with every wire field supplied.
    ///
    /// Fails with [`TargetingError::TooManyTargets`] above [`MAX_TARGETS`].
    pub fn with_multi_tag(
        latency_millis: f64,
        targets: Vec<TrackedTarget>,
        multi_tag_result: MultiTargetPnpResult,
    ) -> Result<Self> {
        if targets.len() > MAX_TARGETS {
            return Err(TargetingError::TooManyTargets {
                count: targets.len(),
                max: MAX_TARGETS,
            });
        }
        Ok(Self {
            targets,
            latency_millis,
            timestamp_seconds: NO_TIMESTAMP,
            multi_tag_result,
        })
    }

    /// Pipeline processing latency in milliseconds.
    pub fn latency_millis(&self) -> f64 {
        self.latency_millis
    }

    /// Estimated capture time in seconds, or [`NO_TIMESTAMP`] if unset.
    pub fn timestamp_seconds(&self) -> f64 {
        self.timestamp_seconds
    }

    /// Stamp the result on the receiving side. Not transmitted.
    pub fn set_timestamp_seconds(&mut self, timestamp_seconds: f64) {
        self.timestamp_seconds = timestamp_seconds;
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn targets(&self) -> &[TrackedTarget] {
        &self.targets
    }

    /// An independent copy of the target list.
    pub fn to_targets(&self) -> Vec<TrackedTarget> {
        self.targets.clone()
    }

    /// Check `estimated_pose.is_present` before using the pose.
    pub fn multi_tag_result(&self) -> &MultiTargetPnpResult {
        &self.multi_tag_result
    }

    /// The highest-ranked target, or `None` if there are none.
    ///
    /// An empty result is reported to `diagnostics`; it is not an error.
    pub fn best_target<D>(&self, diagnostics: &D) -> Option<&TrackedTarget>
    where
        D: TargetDiagnostics + ?Sized,
    {
        let best = self.targets.first();
        if best.is_none() {
            diagnostics.no_targets();
        }
        best
    }

    /// Exact number of bytes [`populate_packet`](Self::populate_packet) writes.
    pub fn packet_size(&self) -> usize {
        packet_size_for(self.targets.len())
    }

    /// Encode into a freshly allocated packet of exactly the right size.
    pub fn to_packet(&self) -> Packet {
        let mut packet = Packet::with_capacity(self.packet_size());
        self.populate_packet(&mut packet);
        packet
    }

    /// Append the encoded result to `packet`.
    ///
    /// Wire format:
    /// ```text
    /// ┌───────────────┬──────────────────┬──────────┬──────────────────────┐
    /// │ Latency       │ Multi-tag result │ Count    │ Targets              │
    /// │ (8B f64 BE)   │ (201B)           │ (1B u8)  │ (Count x 284B)       │
    /// └───────────────┴──────────────────┴──────────┴──────────────────────┘
    /// ```
    pub fn populate_packet<'a>(&self, packet: &'a mut Packet) -> &'a mut Packet {
        let start = packet.len();
        // Construction caps the list at MAX_TARGETS, so the count fits a byte.
        let target_count = self.targets.len() as u8;

        packet.encode_f64(self.latency_millis);
        packet.encode_record(&self.multi_tag_result);
        packet.encode_u8(target_count);
        for target in &self.targets {
            packet.encode_record(target);
        }

        debug_assert_eq!(packet.len() - start, self.packet_size());
        tracing::trace!(
            target_count,
            bytes = packet.len() - start,
            "encoded pipeline result"
        );
        packet
    }

    /// Replace this result's wire fields with ones decoded from `packet`.
    ///
    /// The timestamp is left as it was. Returns the packet advanced past the
    /// result so an enclosing message can keep decoding. On underrun the
    /// result is left unchanged.
    pub fn create_from_packet<'a>(
        &mut self,
        packet: &'a mut Packet,
    ) -> photonwire_packet::Result<&'a mut Packet> {
        let start = packet.read_position();

        let latency_millis = packet.decode_f64()?;
        let multi_tag_result = packet.decode_record()?;
        let target_count = packet.decode_u8()?;

        let mut targets = Vec::with_capacity(usize::from(target_count));
        for _ in 0..target_count {
            targets.push(packet.decode_record()?);
        }

        self.latency_millis = latency_millis;
        self.multi_tag_result = multi_tag_result;
        self.targets = targets;

        tracing::trace!(
            target_count,
            bytes = packet.read_position() - start,
            "decoded pipeline result"
        );
        Ok(packet)
    }

    /// Decode a new, unstamped result from `packet`.
    pub fn decode_from(packet: &mut Packet) -> photonwire_packet::Result<Self> {
        let mut result = Self::new();
        result.create_from_packet(packet)?;
        Ok(result)
    }
}

impl Default for PipelineResult {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PipelineResult {
    fn eq(&self, other: &Self) -> bool {
        self.targets == other.targets
            && self.latency_millis.to_bits() == other.latency_millis.to_bits()
            && self.timestamp_seconds.to_bits() == other.timestamp_seconds.to_bits()
            && self.multi_tag_result == other.multi_tag_result
    }
}

impl Eq for PipelineResult {}

impl Hash for PipelineResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.targets.hash(state);
        self.latency_millis.to_bits().hash(state);
        self.timestamp_seconds.to_bits().hash(state);
        self.multi_tag_result.hash(state);
    }
}

impl fmt::Display for PipelineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PipelineResult [targets={:?}, latency_millis={}, timestamp_seconds={}, multi_tag_result={:?}]",
            self.targets, self.latency_millis, self.timestamp_seconds, self.multi_tag_result
        )
    }
}

fn no_timestamp() -> f64 {
    NO_TIMESTAMP
}

#[derive(Deserialize)]
struct RawPipelineResult {
    #[serde(default)]
    targets: Vec<TrackedTarget>,
    #[serde(default)]
    latency_millis: f64,
    #[serde(default = "no_timestamp")]
    timestamp_seconds: f64,
    #[serde(default)]
    multi_tag_result: MultiTargetPnpResult,
}

impl TryFrom<RawPipelineResult> for PipelineResult {
    type Error = TargetingError;

    fn try_from(raw: RawPipelineResult) -> Result<Self> {
        let mut result =
            Self::with_multi_tag(raw.latency_millis, raw.targets, raw.multi_tag_result)?;
        result.timestamp_seconds = raw.timestamp_seconds;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::hash::{BuildHasher, RandomState};

    use photonwire_packet::PacketError;

    use super::*;
    use crate::diagnostics::WarnOnce;
    use crate::geometry::{Rotation3d, TargetCorner, Transform3d, Translation3d};
    use crate::pnp::PnpResult;

    fn target(yaw: f64, fiducial_id: i32) -> TrackedTarget {
        TrackedTarget {
            yaw,
            pitch: yaw / 2.0,
            area: 1.25,
            fiducial_id,
            best_camera_to_target: Transform3d::new(
                Translation3d::new(3.0, yaw, 0.5),
                Rotation3d::IDENTITY,
            ),
            detected_corners: [TargetCorner::new(yaw, 1.0); 4],
            ..TrackedTarget::default()
        }
    }

    fn multi_tag() -> MultiTargetPnpResult {
        let pose = Transform3d::new(
            Translation3d::new(1.0, 2.0, 0.0),
            Rotation3d::from_quaternion(0.5, 0.5, 0.5, 0.5),
        );
        MultiTargetPnpResult::new(PnpResult::single(pose, 0.03), vec![1, 2]).unwrap()
    }

    fn roundtrip(result: &PipelineResult) -> PipelineResult {
        let mut packet = result.to_packet();
        let decoded = PipelineResult::decode_from(&mut packet).unwrap();
        assert_eq!(packet.remaining(), 0);
        decoded
    }

    #[derive(Default)]
    struct CountingDiagnostics {
        calls: Cell<usize>,
    }

    impl TargetDiagnostics for CountingDiagnostics {
        fn no_targets(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    #[test]
    fn test_empty_result_defaults() {
        let result = PipelineResult::new();
        assert!(!result.has_targets());
        assert_eq!(result.latency_millis(), 0.0);
        assert_eq!(result.timestamp_seconds(), NO_TIMESTAMP);
        assert_eq!(result.multi_tag_result(), &MultiTargetPnpResult::default());
        assert_eq!(result.packet_size(), EMPTY_PACKET_SIZE);
        assert_eq!(PipelineResult::default(), result);
    }

    #[test]
    fn test_empty_result_size_and_roundtrip() {
        let result = PipelineResult::with_targets(12.5, Vec::new()).unwrap();
        assert_eq!(result.packet_size(), 8 + MultiTargetPnpResult::PACK_SIZE_BYTES + 1);
        assert_eq!(result.packet_size(), 210);

        let packet = result.to_packet();
        assert_eq!(packet.len(), result.packet_size());
        assert_eq!(roundtrip(&result), result);
    }

    #[test]
    fn test_three_targets_keep_order() {
        let targets = vec![target(3.0, 30), target(1.0, 10), target(2.0, 20)];
        let result = PipelineResult::with_targets(0.0, targets.clone()).unwrap();

        let packet = result.to_packet();
        let count_offset = 8 + MultiTargetPnpResult::PACK_SIZE_BYTES;
        assert_eq!(packet.as_slice()[count_offset], 3);

        let decoded = roundtrip(&result);
        assert_eq!(decoded.targets(), targets.as_slice());
        assert_eq!(decoded, result);
    }

    #[test]
    fn test_size_matches_encoded_length() {
        for count in [0usize, 1, 2, 17, MAX_TARGETS] {
            let targets = (0..count).map(|i| target(i as f64, i as i32)).collect();
            let result = PipelineResult::with_multi_tag(4.0, targets, multi_tag()).unwrap();
            assert_eq!(result.to_packet().len(), result.packet_size());
            assert_eq!(result.packet_size(), packet_size_for(count));
        }
    }

    #[test]
    fn test_wire_layout_offsets() {
        let result =
            PipelineResult::with_multi_tag(12.5, vec![target(9.0, 4)], multi_tag()).unwrap();
        let mut packet = result.to_packet();

        assert_eq!(packet.decode_f64().unwrap(), 12.5);
        let decoded_multi: MultiTargetPnpResult = packet.decode_record().unwrap();
        assert_eq!(decoded_multi, multi_tag());
        assert_eq!(packet.decode_u8().unwrap(), 1);
        let decoded_target: TrackedTarget = packet.decode_record().unwrap();
        assert_eq!(decoded_target, target(9.0, 4));
    }

    #[test]
    fn test_roundtrip_with_multi_tag() {
        let result = PipelineResult::with_multi_tag(
            33.75,
            vec![target(-1.5, 3), target(8.25, 5)],
            multi_tag(),
        )
        .unwrap();
        assert_eq!(roundtrip(&result), result);
    }

    #[test]
    fn test_decode_leaves_timestamp_alone() {
        let mut sent = PipelineResult::with_targets(5.0, vec![target(1.0, 1)]).unwrap();
        sent.set_timestamp_seconds(100.0);
        let mut packet = sent.to_packet();

        let mut received = PipelineResult::new();
        received.set_timestamp_seconds(42.0);
        received.create_from_packet(&mut packet).unwrap();

        assert_eq!(received.timestamp_seconds(), 42.0);
        assert_eq!(received.targets(), sent.targets());
        assert_eq!(received.latency_millis(), 5.0);
    }

    #[test]
    fn test_fresh_decode_is_unstamped() {
        let mut sent = PipelineResult::with_targets(5.0, Vec::new()).unwrap();
        sent.set_timestamp_seconds(100.0);

        let decoded = roundtrip(&sent);
        assert_eq!(decoded.timestamp_seconds(), NO_TIMESTAMP);
        assert_ne!(decoded, sent);

        let mut stamped = decoded;
        stamped.set_timestamp_seconds(100.0);
        assert_eq!(stamped, sent);
    }

    #[test]
    fn test_decode_replaces_prior_targets() {
        let mut received =
            PipelineResult::with_targets(1.0, vec![target(1.0, 1), target(2.0, 2)]).unwrap();
        let mut packet = PipelineResult::with_targets(2.0, vec![target(7.0, 7)])
            .unwrap()
            .to_packet();

        received.create_from_packet(&mut packet).unwrap();
        assert_eq!(received.targets(), &[target(7.0, 7)]);
    }

    #[test]
    fn test_chained_decode() {
        let first = PipelineResult::with_targets(1.0, vec![target(1.0, 1)]).unwrap();
        let second = PipelineResult::with_multi_tag(2.0, Vec::new(), multi_tag()).unwrap();

        let mut packet = Packet::new();
        first.populate_packet(&mut packet);
        second.populate_packet(&mut packet).encode_u16(0xBEEF);

        let mut a = PipelineResult::new();
        let mut b = PipelineResult::new();
        let rest = a.create_from_packet(&mut packet).unwrap();
        let rest = b.create_from_packet(rest).unwrap();

        assert_eq!(rest.decode_u16().unwrap(), 0xBEEF);
        assert_eq!(a, first);
        assert_eq!(b, second);
    }

    #[test]
    fn test_truncated_packet_underruns() {
        let result =
            PipelineResult::with_targets(1.0, vec![target(1.0, 1), target(2.0, 2)]).unwrap();
        let full = result.to_packet();
        let mut truncated = Packet::from_bytes(&full.as_slice()[..full.len() - 10]);

        let mut received = PipelineResult::with_targets(9.0, Vec::new()).unwrap();
        let err = received.create_from_packet(&mut truncated).unwrap_err();

        assert!(matches!(err, PacketError::Underrun { .. }));
        assert_eq!(received.latency_millis(), 9.0);
        assert!(!received.has_targets());
    }

    #[test]
    fn test_empty_packet_underruns() {
        let mut packet = Packet::new();
        let err = PipelineResult::decode_from(&mut packet).unwrap_err();
        assert_eq!(
            err,
            PacketError::Underrun {
                needed: 8,
                remaining: 0
            }
        );
    }

    #[test]
    fn test_max_targets_roundtrip() {
        let targets: Vec<_> = (0..MAX_TARGETS).map(|i| target(i as f64, i as i32)).collect();
        let result = PipelineResult::with_targets(7.0, targets).unwrap();

        let packet = result.to_packet();
        assert_eq!(packet.as_slice()[8 + MultiTargetPnpResult::PACK_SIZE_BYTES], 255);

        let decoded = roundtrip(&result);
        assert_eq!(decoded.targets().len(), MAX_TARGETS);
        assert_eq!(decoded, result);
    }

    #[test]
    fn test_rejects_more_than_max_targets() {
        let targets = vec![TrackedTarget::default(); MAX_TARGETS + 1];
        let err = PipelineResult::with_targets(1.0, targets).unwrap_err();
        assert_eq!(
            err,
            TargetingError::TooManyTargets {
                count: 256,
                max: MAX_TARGETS
            }
        );
    }

    #[test]
    fn test_to_targets_is_independent_copy() {
        let result = PipelineResult::with_targets(1.0, vec![target(1.0, 1)]).unwrap();
        let mut copy = result.to_targets();
        copy.clear();
        copy.push(target(5.0, 5));

        assert_eq!(result.targets(), &[target(1.0, 1)]);
        assert_eq!(result.packet_size(), packet_size_for(1));
    }

    #[test]
    fn test_best_target_is_first() {
        let result =
            PipelineResult::with_targets(1.0, vec![target(2.0, 2), target(1.0, 1)]).unwrap();
        let diagnostics = CountingDiagnostics::default();

        assert_eq!(result.best_target(&diagnostics), Some(&target(2.0, 2)));
        assert_eq!(diagnostics.calls.get(), 0);
    }

    #[test]
    fn test_best_target_of_empty_result_reports() {
        let result = PipelineResult::new();
        let diagnostics = CountingDiagnostics::default();

        assert!(result.best_target(&diagnostics).is_none());
        assert!(result.best_target(&diagnostics).is_none());
        assert_eq!(diagnostics.calls.get(), 2);
    }

    #[test]
    fn test_best_target_warns_once() {
        let warn = WarnOnce::new();
        let empty = PipelineResult::new();

        for _ in 0..5 {
            assert!(empty.best_target(&warn).is_none());
        }
        assert!(warn.has_warned());
    }

    #[test]
    fn test_best_target_through_trait_object() {
        let warn = WarnOnce::new();
        let diagnostics: &dyn TargetDiagnostics = &warn;
        assert!(PipelineResult::new().best_target(diagnostics).is_none());
        assert!(warn.has_warned());
    }

    #[test]
    fn test_equality_is_field_complete() {
        let base =
            PipelineResult::with_multi_tag(1.0, vec![target(1.0, 1)], multi_tag()).unwrap();

        let mut stamped = base.clone();
        stamped.set_timestamp_seconds(3.0);
        assert_ne!(base, stamped);

        let other_latency =
            PipelineResult::with_multi_tag(1.5, base.to_targets(), multi_tag()).unwrap();
        assert_ne!(base, other_latency);

        let no_multi = PipelineResult::with_targets(1.0, base.to_targets()).unwrap();
        assert_ne!(base, no_multi);

        let reordered =
            PipelineResult::with_multi_tag(1.0, vec![target(1.0, 1), target(2.0, 2)], multi_tag())
                .unwrap();
        let swapped =
            PipelineResult::with_multi_tag(1.0, vec![target(2.0, 2), target(1.0, 1)], multi_tag())
                .unwrap();
        assert_ne!(reordered, swapped);
    }

    #[test]
    fn test_equal_results_hash_equally() {
        let state = RandomState::new();
        let a = PipelineResult::with_multi_tag(
            f64::NAN,
            vec![target(1.0, 1), target(2.0, 2)],
            multi_tag(),
        )
        .unwrap();
        let b = a.clone();

        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(state.hash_one(&a), state.hash_one(&b));
        assert_eq!(state.hash_one(&a), state.hash_one(roundtrip(&a)));
    }

    #[test]
    fn test_display_includes_all_fields() {
        let mut result = PipelineResult::with_targets(12.5, vec![target(1.0, 9)]).unwrap();
        result.set_timestamp_seconds(8.0);
        let text = result.to_string();

        assert!(text.contains("targets=[TrackedTarget"));
        assert!(text.contains("latency_millis=12.5"));
        assert!(text.contains("timestamp_seconds=8"));
        assert!(text.contains("multi_tag_result=MultiTargetPnpResult"));
    }

    #[test]
    fn test_json_document() {
        let json = r#"{
            "latency_millis": 12.5,
            "targets": [{"yaw": 1.0, "fiducial_id": 3}],
            "multi_tag_result": {"fiducial_ids_used": [3]}
        }"#;
        let result: PipelineResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.latency_millis(), 12.5);
        assert_eq!(result.timestamp_seconds(), NO_TIMESTAMP);
        assert_eq!(result.targets()[0].fiducial_id, 3);
        assert_eq!(result.multi_tag_result().fiducial_ids_used(), &[3]);

        let back: PipelineResult =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_json_rejects_too_many_targets() {
        let targets = vec!["{}"; MAX_TARGETS + 1].join(",");
        let json = format!(r#"{{"targets": [{targets}]}}"#);
        assert!(serde_json::from_str::<PipelineResult>(&json).is_err());
    }
}
