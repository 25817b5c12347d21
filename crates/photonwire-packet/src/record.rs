use crate::error::Result;
use crate::packet::Packet;

/// A record with a constant wire width that encodes itself through [`Packet`]
/// primitives.
///
/// `encode` must append exactly `PACK_SIZE_BYTES` bytes and `decode` must
/// consume exactly that many on success. Neither may touch bytes outside its
/// own block.
pub trait PacketRecord: Sized {
    /// Encoded width in bytes.
    const PACK_SIZE_BYTES: usize;

    /// Append this record to `packet`.
    fn encode(&self, packet: &mut Packet);

    /// Decode one record from the packet's read cursor.
    fn decode(packet: &mut Packet) -> Result<Self>;
}
