//! Variable-length integer encoding: LEB128 varints, zigzag transforms, and
//! constant-tag precomputation.
//!
//! Decoding never allocates and never panics on malformed input; every
//! failure mode returns a [`DecodeError`] from the closed taxonomy.

use crate::error::DecodeError;

/// Types that can be read from and written as a LEB128 varint.
pub trait VarintCodec: Sized {
    const MAX_VARINT_BYTES: u32;

    /// Decode a varint from the front of `data`.
    ///
    /// # Safety
    ///
    /// The caller must ensure `data` is valid for `Self::MAX_VARINT_BYTES`
    /// bytes, or that a byte `< 0x80` (the terminator) appears before the
    /// slice ends.
    unsafe fn decode_varint(data: &[u8]) -> Result<(Self, usize), DecodeError>;

    /// Decode a varint from a possibly-short slice, copying into a scratch
    /// buffer first when `data` is too short to read unchecked.
    fn decode_varint_safe(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        if data.len() >= Self::MAX_VARINT_BYTES as usize {
            return unsafe { Self::decode_varint(data) };
        }

        let mut buffer = [0u8; 16];
        let len = data.len().min(16);
        buffer[..len].copy_from_slice(&data[..len]);
        unsafe { Self::decode_varint(&buffer[..]) }
    }

    /// Decode a varint from a [`bytes::Buf`], advancing it past the bytes read.
    fn decode_varint_buf<B: bytes::Buf>(buf: &mut B) -> Result<(Self, usize), DecodeError> {
        let chunk = buf.chunk();

        if chunk.len() >= Self::MAX_VARINT_BYTES as usize {
            let (value, bytes_read) = unsafe { Self::decode_varint(chunk)? };
            buf.advance(bytes_read);
            return Ok((value, bytes_read));
        }

        let mut buffer = [0u8; 16];
        for i in 0..Self::MAX_VARINT_BYTES as usize {
            if !buf.has_remaining() {
                return Err(DecodeError::VarintIncomplete);
            }
            buffer[i] = buf.get_u8();
            if buffer[i] < 0x80 {
                return unsafe { Self::decode_varint(&buffer[..]) };
            }
        }
        Err(DecodeError::VarintTooLarge)
    }

    /// Encode `self` as a varint into `buf`, returning the number of bytes written.
    fn encode_varint<B: bytes::BufMut>(self, buf: &mut B) -> usize;

    /// Number of bytes `self` would take to encode as a varint.
    fn encoded_varint_len(self) -> usize;
}

impl VarintCodec for u64 {
    const MAX_VARINT_BYTES: u32 = 10;

    #[inline(always)]
    unsafe fn decode_varint(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut value: u64 = 0;
        let mut shift = 0u32;
        for i in 0..10 {
            // SAFETY: caller guarantees `data` is valid for MAX_VARINT_BYTES
            // reads, or terminates earlier with a byte < 0x80.
            let b = unsafe { *data.get_unchecked(i) };
            if i == 9 {
                // Byte 10 may only contribute a single bit to a u64.
                if b >= 0x02 {
                    return Err(DecodeError::VarintTooLarge);
                }
                value |= (b as u64) << shift;
                return Ok((value, 10));
            }
            value |= ((b & 0x7f) as u64) << shift;
            if b < 0x80 {
                return Ok((value, i + 1));
            }
            shift += 7;
        }
        Err(DecodeError::VarintTooLarge)
    }

    #[inline]
    fn encode_varint<B: bytes::BufMut>(self, buf: &mut B) -> usize {
        let mut value = self;
        let mut written = 0;
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            written += 1;
            if value == 0 {
                buf.put_u8(byte);
                return written;
            }
            buf.put_u8(byte | 0x80);
        }
    }

    #[inline]
    fn encoded_varint_len(self) -> usize {
        #[rustfmt::skip]
        const LZ_TO_LEN: [u8; 65] = [
            10,
            9, 9, 9, 9, 9, 9, 9,
            8, 8, 8, 8, 8, 8, 8,
            7, 7, 7, 7, 7, 7, 7,
            6, 6, 6, 6, 6, 6, 6,
            5, 5, 5, 5, 5, 5, 5,
            4, 4, 4, 4, 4, 4, 4,
            3, 3, 3, 3, 3, 3, 3,
            2, 2, 2, 2, 2, 2, 2,
            1, 1, 1, 1, 1, 1, 1, 1,
        ];
        LZ_TO_LEN[self.leading_zeros() as usize] as usize
    }
}

impl VarintCodec for u32 {
    const MAX_VARINT_BYTES: u32 = 5;

    #[inline(always)]
    unsafe fn decode_varint(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut value: u32 = 0;
        let mut shift = 0u32;
        for i in 0..5 {
            // SAFETY: caller guarantees `data` is valid for MAX_VARINT_BYTES
            // reads, or terminates earlier with a byte < 0x80.
            let b = unsafe { *data.get_unchecked(i) };
            if i == 4 {
                if b >= 0x20 {
                    return Err(DecodeError::VarintTooLarge);
                }
                value |= (b as u32) << shift;
                return Ok((value, 5));
            }
            value |= ((b & 0x7f) as u32) << shift;
            if b < 0x80 {
                return Ok((value, i + 1));
            }
            shift += 7;
        }
        Err(DecodeError::VarintTooLarge)
    }

    #[inline]
    fn encode_varint<B: bytes::BufMut>(self, buf: &mut B) -> usize {
        let mut value = self;
        let mut written = 0;
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            written += 1;
            if value == 0 {
                buf.put_u8(byte);
                return written;
            }
            buf.put_u8(byte | 0x80);
        }
    }

    #[inline]
    fn encoded_varint_len(self) -> usize {
        #[rustfmt::skip]
        const LZ_TO_LEN: [u8; 33] = [
            5, 5, 5, 5,
            4, 4, 4, 4, 4, 4, 4,
            3, 3, 3, 3, 3, 3, 3,
            2, 2, 2, 2, 2, 2, 2,
            1, 1, 1, 1, 1, 1, 1, 1,
        ];
        LZ_TO_LEN[self.leading_zeros() as usize] as usize
    }
}

/// Zigzag-encode a signed 32-bit integer for `sint32` wire representation.
#[inline(always)]
pub const fn zigzag_encode32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Zigzag-decode a `sint32` wire value back to its signed form.
#[inline(always)]
pub const fn zigzag_decode32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Zigzag-encode a signed 64-bit integer for `sint64` wire representation.
#[inline(always)]
pub const fn zigzag_encode64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Zigzag-decode a `sint64` wire value back to its signed form.
#[inline(always)]
pub const fn zigzag_decode64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// A precomputed `(tag << 3) | wire_type` key, stashed as its already-encoded
/// varint bytes so the hot write path never re-runs varint encoding for a
/// field's key.
///
/// Field descriptors that know their tag and wire type at compile time
/// (every descriptor in this crate does) build one of these once and reuse
/// it on every write.
#[derive(Clone, Copy)]
pub struct ConstantTag {
    bytes: [u8; 5],
    len: u8,
}

impl ConstantTag {
    /// Precompute the encoded key bytes for `tag`/`wire_type`.
    ///
    /// `wire_type_val` is the raw 3-bit wire type value (see
    /// [`crate::wire::WireType::into_val`]); taking it as a primitive here
    /// keeps this module free of a dependency on `crate::wire`.
    pub const fn new(tag: u32, wire_type_val: u8) -> Self {
        let key = (tag << 3) | (wire_type_val as u32);
        let mut bytes = [0u8; 5];
        let mut value = key;
        let mut i = 0;
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                bytes[i] = byte;
                i += 1;
                break;
            }
            bytes[i] = byte | 0x80;
            i += 1;
        }
        Self { bytes, len: i as u8 }
    }

    /// Write the precomputed key bytes into `buf`.
    #[inline(always)]
    pub fn write<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.bytes[..self.len as usize]);
    }

    /// Number of bytes this constant tag occupies on the wire.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    pub const fn is_empty(&self) -> bool {
        false
    }
}
