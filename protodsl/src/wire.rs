//! Wire format for Google's Protocol Buffers, aka [protobuf](https://protobuf.dev).

use core::num::NonZeroU64;

use crate::error::DecodeError;
use crate::util::CastFrom;
use crate::util::{likely, unlikely};
use crate::varint::VarintCodec;

/// Minimum value of a protobuf tag.
pub const MINIMUM_TAG_VAL: u32 = 1;
/// Maximum value of a protobuf tag.
pub const MAXIMUM_TAG_VAL: u32 = (1 << 29) - 1;

/// A decoded protobuf field key containing a wire type and tag.
///
/// Packed into a [`NonZeroU64`] to enable register-based returns from
/// [`decode_key`]. In an ideal world this type would use `NonZeroU32` which
/// better resembles a protobuf key, but when used in a Result `rustc` passes
/// the return value on the stack while [`NonZeroU64`] is passed in registers.
///
/// The layout mirrors the protobuf wire format:
/// * Bits 0-2: wire type (0-5)
/// * Bits 3-31: tag/field number (1 to 2^29-1)
///
/// Since tags start at 1, the minimum raw value is 8 (`1 << 3`), guaranteeing
/// the value is always non-zero.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ProtoKey(NonZeroU64);

#[allow(clippy::as_conversions)]
impl ProtoKey {
    /// Creates a new [`ProtoKey`] from a raw key value, validating the wire type and tag.
    #[inline(always)]
    fn try_from_raw(raw_key: u32) -> Result<Self, DecodeError> {
        let wire_type_raw = (raw_key & 0b111) as u8;
        if unlikely(wire_type_raw > WireType::MAX_VAL) {
            return Err(DecodeError::InvalidWireType(wire_type_raw));
        }

        let tag = raw_key >> 3;
        if unlikely(tag == 0 || tag > MAXIMUM_TAG_VAL) {
            return Err(DecodeError::InvalidKey);
        }

        // SAFETY: We validated tag >= 1 above so raw_key is non-zero.
        Ok(Self(unsafe { NonZeroU64::new_unchecked(raw_key as u64) }))
    }

    /// Returns the [`WireType`] component of this key.
    #[inline(always)]
    pub const fn wire_type(self) -> WireType {
        let raw = (self.0.get() & 0b111) as u8;
        // SAFETY: We validated the wire type during construction.
        unsafe { core::mem::transmute::<u8, WireType>(raw) }
    }

    /// Returns the tag/field number component of this key.
    #[inline(always)]
    pub const fn tag(self) -> u32 {
        (self.0.get() >> 3) as u32
    }

    /// Decomposes this key into its [`WireType`] and tag components.
    #[inline(always)]
    pub const fn into_parts(self) -> (WireType, u32) {
        (self.wire_type(), self.tag())
    }
}

impl core::fmt::Debug for ProtoKey {
    #[cold]
    #[inline(never)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProtoKey")
            .field("wire_type", &self.wire_type())
            .field("tag", &self.tag())
            .finish()
    }
}

/// Encodes the provided tag and wire_type as a protobuf field key.
///
/// Hot path for encoding - called for every field in every message that
/// doesn't have a precomputed [`crate::varint::ConstantTag`] available.
#[inline(always)]
pub fn encode_key<B: bytes::BufMut>(wire_type: WireType, tag: u32, buf: &mut B) {
    let key = (tag << 3) | u32::cast_from(wire_type.into_val());
    u32::encode_varint(key, buf);
}

/// Returns the encoded length of a field key (tag + wire type).
#[inline(always)]
pub fn encoded_key_len(tag: u32) -> usize {
    // Wire type is 3 bits, so key = (tag << 3) | wire_type; the wire type
    // never changes the varint length since it only uses 3 bits.
    (tag << 3).encoded_varint_len()
}

/// Decodes the key from a protobuf encoded message.
///
/// # Performance
///
/// This is one of the hottest functions in the decode path. Arguments and
/// return values are chosen so they round-trip entirely in registers.
#[inline]
pub fn decode_key<B: bytes::Buf>(buf: &mut B) -> Result<ProtoKey, DecodeError> {
    let chunk = buf.chunk();
    let chunk_len = chunk.len();

    // N.B. Keys always fit in u32: the max tag value is `2^29-1` and the
    // max key value is `(2^29-1) << 3 | 7` which is `u32::MAX`.
    let value = if unlikely(chunk_len == 0) {
        return Err(DecodeError::InvalidKey);
    } else if likely(chunk[0] < 0x80 || chunk_len >= 5) {
        let (value, bytes_read) = unsafe { u32::decode_varint(chunk)? };
        buf.advance(bytes_read);
        value
    } else {
        u32::decode_varint_buf(buf)?.0
    };

    ProtoKey::try_from_raw(value)
}

/// Decodes the length prefix for a length-delimited field.
#[inline(always)]
pub fn decode_len<B: bytes::Buf>(buf: &mut B) -> Result<usize, DecodeError> {
    let chunk = buf.chunk();
    // Fast path, most lengths fit in one byte (< 128).
    if likely(!chunk.is_empty() && chunk[0] < 0x80) {
        let len = usize::cast_from(chunk[0]);
        buf.advance(1);
        Ok(len)
    } else {
        let (len, _) = u64::decode_varint_buf(buf)?;
        usize::try_from(len).map_err(|_| DecodeError::InvalidLength)
    }
}

/// Skips over a field value based on its wire type.
///
/// Protobuf supports backwards and forwards compatibility by skipping fields
/// we don't know about. We "skip" a field by advancing our buffer past it.
#[inline(always)]
pub fn skip_field<B: bytes::Buf>(wire_type: WireType, buf: &mut B) -> Result<(), DecodeError> {
    let skip_len = match wire_type {
        WireType::Varint => {
            u64::decode_varint_buf(buf)?;
            return Ok(());
        }
        WireType::I64 => 8,
        WireType::Len => decode_len(buf)?,
        WireType::I32 => 4,
        WireType::SGroup | WireType::EGroup => {
            return Err(DecodeError::InvalidWireType(wire_type.into_val()));
        }
    };

    if buf.remaining() < skip_len {
        return Err(DecodeError::FixedIncomplete);
    }
    buf.advance(skip_len);
    Ok(())
}

/// Denotes the type of a field in an encoded protobuf message.
///
/// Protobuf messages are a series of key-value pairs. When encoded each
/// key-value pair is turned into a record consisting of a field number, a
/// [`WireType`], and a payload. The [`WireType`] indicates how large the
/// proceeding payload is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
#[allow(dead_code)] // We construct this enum via transmute.
pub enum WireType {
    /// Variable length integer.
    ///
    /// Used for: `int32`, `int64`, `uint32`, `uint64`, `sint32`, `sint64`, `bool`, `enum`.
    Varint = 0,
    /// 64-bit integer.
    ///
    /// Used for: `fixed64`, `sfixed64`, `double`.
    I64 = 1,
    /// Variable length field.
    ///
    /// Used for: `string`, `bytes`, `message`, packed `repeated` fields.
    Len = 2,
    /// Group start (deprecated).
    SGroup = 3,
    /// Group end (deprecated).
    EGroup = 4,
    /// 32-bit integer.
    ///
    /// Used for: `fixed32`, `sfixed32`, `float`.
    I32 = 5,
}

// N.B. It's not super important that these are the same size, but keeping them as such
// allows the compiler to make as many optimizations as possible.
crate::util::assert_eq_size!(WireType, Result<WireType, ()>);

#[allow(clippy::as_conversions)]
impl WireType {
    /// Maximum value a [`WireType`] can be.
    const MAX_VAL: u8 = WireType::I32 as u8;

    // Compile-time check that our discriminants are contiguous 0..=MAX_VAL.
    const _DISCRIMINANT_CHECK: () = {
        assert!(WireType::Varint as u8 == 0);
        assert!(WireType::I64 as u8 == 1);
        assert!(WireType::Len as u8 == 2);
        assert!(WireType::SGroup as u8 == 3);
        assert!(WireType::EGroup as u8 == 4);
        assert!(WireType::I32 as u8 == 5);
    };

    /// Try to decode a [`WireType`] from the provided raw value.
    #[inline(always)]
    fn try_from_val(value: u8) -> Result<Self, DecodeError> {
        if value <= Self::MAX_VAL {
            // SAFETY: we just checked `value` is within our range, and
            // WireType and u8 share representation.
            let wire_type: WireType = unsafe { core::mem::transmute(value) };
            Ok(wire_type)
        } else {
            Err(DecodeError::InvalidWireType(value))
        }
    }

    /// Return the raw value for this [`WireType`].
    #[inline(always)]
    pub const fn into_val(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for WireType {
    type Error = DecodeError;

    #[inline(always)]
    fn try_from(value: u8) -> Result<Self, DecodeError> {
        WireType::try_from_val(value)
    }
}
