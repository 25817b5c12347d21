use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{PacketError, Result};
use crate::record::PacketRecord;

/// Wire width of a boolean.
pub const BOOL_SIZE: usize = 1;
/// Wire width of an `i16`/`u16`.
pub const I16_SIZE: usize = 2;
/// Wire width of an `i32`/`u32`.
pub const I32_SIZE: usize = 4;
/// Wire width of an `i64`.
pub const I64_SIZE: usize = 8;
/// Wire width of an `f32`.
pub const F32_SIZE: usize = 4;
/// Wire width of an `f64`.
pub const F64_SIZE: usize = 8;

const DEFAULT_CAPACITY: usize = 256;

/// A byte buffer with a read cursor.
///
/// Writes always append at the end of the written data, so an encode can
/// never overwrite bytes produced earlier. Reads consume from the cursor and
/// fail with [`PacketError::Underrun`] instead of reading past the end; a
/// failed read leaves the cursor where it was.
///
/// Wire format of the primitives:
/// ```text
/// ┌────────────┬───────┬─────────────────────────────┐
/// │ Type       │ Width │ Encoding                    │
/// ├────────────┼───────┼─────────────────────────────┤
/// │ u8 / i8    │ 1     │ raw byte                    │
/// │ bool       │ 1     │ 0x00 / 0x01 (read: != 0)    │
/// │ i16 / u16  │ 2     │ big-endian                  │
/// │ i32 / u32  │ 4     │ big-endian                  │
/// │ i64        │ 8     │ big-endian                  │
/// │ f32        │ 4     │ IEEE-754 binary32, BE       │
/// │ f64        │ 8     │ IEEE-754 binary64, BE       │
/// └────────────┴───────┴─────────────────────────────┘
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    buf: BytesMut,
    read_pos: usize,
}

impl Packet {
    /// Create an empty outgoing packet.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty outgoing packet with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            read_pos: 0,
        }
    }

    /// Wrap received bytes for decoding. The read cursor starts at zero.
    pub fn from_bytes(data: impl AsRef<[u8]>) -> Self {
        Self {
            buf: BytesMut::from(data.as_ref()),
            read_pos: 0,
        }
    }

    /// Total number of bytes written to the packet.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of bytes not yet consumed by decoding.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.read_pos
    }

    /// Current read cursor.
    pub fn read_position(&self) -> usize {
        self.read_pos
    }

    /// All written bytes, including already-consumed ones.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Freeze the written bytes for transmission.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Drop all data and rewind the cursor.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.read_pos = 0;
    }

    pub fn encode_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn encode_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    pub fn encode_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn encode_i16(&mut self, value: i16) {
        self.buf.put_i16(value);
    }

    pub fn encode_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    pub fn encode_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn encode_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    pub fn encode_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn encode_f32(&mut self, value: f32) {
        self.buf.put_f32(value);
    }

    pub fn encode_f64(&mut self, value: f64) {
        self.buf.put_f64(value);
    }

    /// Append raw bytes verbatim.
    pub fn encode_bytes(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    /// Append a fixed-width record.
    pub fn encode_record<R: PacketRecord>(&mut self, record: &R) {
        let start = self.buf.len();
        record.encode(self);
        debug_assert_eq!(
            self.buf.len() - start,
            R::PACK_SIZE_BYTES,
            "record wrote a different width than it declares"
        );
    }

    pub fn decode_u8(&mut self) -> Result<u8> {
        self.take::<1>().map(|b| b[0])
    }

    pub fn decode_i8(&mut self) -> Result<i8> {
        self.take::<1>().map(i8::from_be_bytes)
    }

    pub fn decode_bool(&mut self) -> Result<bool> {
        self.decode_u8().map(|b| b != 0)
    }

    pub fn decode_i16(&mut self) -> Result<i16> {
        self.take::<I16_SIZE>().map(i16::from_be_bytes)
    }

    pub fn decode_u16(&mut self) -> Result<u16> {
        self.take::<I16_SIZE>().map(u16::from_be_bytes)
    }

    pub fn decode_i32(&mut self) -> Result<i32> {
        self.take::<I32_SIZE>().map(i32::from_be_bytes)
    }

    pub fn decode_u32(&mut self) -> Result<u32> {
        self.take::<I32_SIZE>().map(u32::from_be_bytes)
    }

    pub fn decode_i64(&mut self) -> Result<i64> {
        self.take::<I64_SIZE>().map(i64::from_be_bytes)
    }

    pub fn decode_f32(&mut self) -> Result<f32> {
        self.take::<F32_SIZE>().map(f32::from_be_bytes)
    }

    pub fn decode_f64(&mut self) -> Result<f64> {
        self.take::<F64_SIZE>().map(f64::from_be_bytes)
    }

    /// Consume `len` raw bytes.
    pub fn decode_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        let start = self.read_pos;
        self.read_pos += len;
        Ok(Bytes::copy_from_slice(&self.buf[start..self.read_pos]))
    }

    /// Decode a fixed-width record.
    pub fn decode_record<R: PacketRecord>(&mut self) -> Result<R> {
        R::decode(self)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.read_pos..self.read_pos + N]);
        self.read_pos += N;
        Ok(out)
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            tracing::debug!(needed, remaining, "packet underrun");
            return Err(PacketError::Underrun { needed, remaining });
        }
        Ok(())
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
