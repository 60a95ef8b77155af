//! Scalar protobuf types and their encoding/decoding implementations.

use super::{ProtoDecode, ProtoEncode, ProtoType};
use crate::error::DecodeError;
use crate::util::{CastFrom, ReinterpretCastFrom};
use crate::varint::{zigzag_decode32, zigzag_decode64, zigzag_encode32, zigzag_encode64, VarintCodec};
use crate::wire::WireType;

impl ProtoType for u64 {
    const WIRE_TYPE: WireType = WireType::Varint;
}

impl ProtoDecode for u64 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        *dst = u64::decode_varint_buf(buf).map(|(v, _)| v)?;
        Ok(())
    }
}

impl ProtoEncode for u64 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        self.encode_varint(buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        self.encoded_varint_len()
    }
}

impl ProtoType for u32 {
    const WIRE_TYPE: WireType = WireType::Varint;
}

impl ProtoDecode for u32 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        *dst = u32::decode_varint_buf(buf).map(|(v, _)| v)?;
        Ok(())
    }
}

impl ProtoEncode for u32 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        self.encode_varint(buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        self.encoded_varint_len()
    }
}

impl ProtoType for i64 {
    const WIRE_TYPE: WireType = WireType::Varint;
}

impl ProtoDecode for i64 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        *dst = u64::decode_varint_buf(buf).map(|(v, _)| i64::reinterpret_cast_from(v))?;
        Ok(())
    }
}

impl ProtoEncode for i64 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        u64::reinterpret_cast_from(*self).encode_varint(buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        u64::reinterpret_cast_from(*self).encoded_varint_len()
    }
}

impl ProtoType for i32 {
    const WIRE_TYPE: WireType = WireType::Varint;
}

impl ProtoDecode for i32 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        // Protobuf int32 is encoded as varint, sign-extended to 64 bits.
        let (v, _) = u64::decode_varint_buf(buf)?;
        let v = i64::reinterpret_cast_from(v);
        *dst = i32::try_from(v).map_err(|_| DecodeError::VarintTooLarge)?;
        Ok(())
    }
}

impl ProtoEncode for i32 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        // Negative values are sign-extended to 64 bits.
        let val = i64::cast_from(*self);
        u64::reinterpret_cast_from(val).encode_varint(buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        let val = i64::cast_from(*self);
        u64::reinterpret_cast_from(val).encoded_varint_len()
    }
}

impl ProtoType for bool {
    const WIRE_TYPE: WireType = WireType::Varint;
}

impl ProtoDecode for bool {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        *dst = u64::decode_varint_buf(buf).map(|(v, _)| v != 0)?;
        Ok(())
    }
}

impl ProtoEncode for bool {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        let val = if *self { 1 } else { 0 };
        buf.put_u8(val);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        1
    }
}

/// Wrapper for protobuf `sint32` (zigzag-encoded signed 32-bit integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Sint32(pub i32);

impl core::ops::Deref for Sint32 {
    type Target = i32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ProtoType for Sint32 {
    const WIRE_TYPE: WireType = WireType::Varint;
}

impl ProtoDecode for Sint32 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        *dst = Sint32(u32::decode_varint_buf(buf).map(|(v, _)| zigzag_decode32(v))?);
        Ok(())
    }
}

impl ProtoEncode for Sint32 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        zigzag_encode32(self.0).encode_varint(buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        zigzag_encode32(self.0).encoded_varint_len()
    }
}

/// Wrapper for protobuf `sint64` (zigzag-encoded signed 64-bit integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Sint64(pub i64);

impl core::ops::Deref for Sint64 {
    type Target = i64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ProtoType for Sint64 {
    const WIRE_TYPE: WireType = WireType::Varint;
}

impl ProtoDecode for Sint64 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        *dst = Sint64(u64::decode_varint_buf(buf).map(|(v, _)| zigzag_decode64(v))?);
        Ok(())
    }
}

impl ProtoEncode for Sint64 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        zigzag_encode64(self.0).encode_varint(buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        zigzag_encode64(self.0).encoded_varint_len()
    }
}

/// Wrapper for protobuf `fixed32` (little-endian unsigned 32-bit integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Fixed32(pub u32);

impl core::ops::Deref for Fixed32 {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ProtoType for Fixed32 {
    const WIRE_TYPE: WireType = WireType::I32;
}

impl ProtoDecode for Fixed32 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        if buf.remaining() < 4 {
            return Err(DecodeError::FixedIncomplete);
        }
        *dst = Fixed32(buf.get_u32_le());
        Ok(())
    }
}

impl ProtoEncode for Fixed32 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.0);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        4
    }
}

/// Wrapper for protobuf `fixed64` (little-endian unsigned 64-bit integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Fixed64(pub u64);

impl core::ops::Deref for Fixed64 {
    type Target = u64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ProtoType for Fixed64 {
    const WIRE_TYPE: WireType = WireType::I64;
}

impl ProtoDecode for Fixed64 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        if buf.remaining() < 8 {
            return Err(DecodeError::FixedIncomplete);
        }
        *dst = Fixed64(buf.get_u64_le());
        Ok(())
    }
}

impl ProtoEncode for Fixed64 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_u64_le(self.0);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        8
    }
}

/// Wrapper for protobuf `sfixed32` (little-endian signed 32-bit integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Sfixed32(pub i32);

impl core::ops::Deref for Sfixed32 {
    type Target = i32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ProtoType for Sfixed32 {
    const WIRE_TYPE: WireType = WireType::I32;
}

impl ProtoDecode for Sfixed32 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        if buf.remaining() < 4 {
            return Err(DecodeError::FixedIncomplete);
        }
        *dst = Sfixed32(buf.get_i32_le());
        Ok(())
    }
}

impl ProtoEncode for Sfixed32 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_i32_le(self.0);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        4
    }
}

/// Wrapper for protobuf `sfixed64` (little-endian signed 64-bit integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Sfixed64(pub i64);

impl core::ops::Deref for Sfixed64 {
    type Target = i64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ProtoType for Sfixed64 {
    const WIRE_TYPE: WireType = WireType::I64;
}

impl ProtoDecode for Sfixed64 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        if buf.remaining() < 8 {
            return Err(DecodeError::FixedIncomplete);
        }
        *dst = Sfixed64(buf.get_i64_le());
        Ok(())
    }
}

impl ProtoEncode for Sfixed64 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_i64_le(self.0);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        8
    }
}

impl ProtoType for f32 {
    const WIRE_TYPE: WireType = WireType::I32;
}

impl ProtoDecode for f32 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        if buf.remaining() < 4 {
            return Err(DecodeError::FixedIncomplete);
        }
        *dst = buf.get_f32_le();
        Ok(())
    }
}

impl ProtoEncode for f32 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_f32_le(*self);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        4
    }
}

impl ProtoType for f64 {
    const WIRE_TYPE: WireType = WireType::I64;
}

impl ProtoDecode for f64 {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        _offset: usize,
    ) -> Result<(), DecodeError> {
        if buf.remaining() < 8 {
            return Err(DecodeError::FixedIncomplete);
        }
        *dst = buf.get_f64_le();
        Ok(())
    }
}

impl ProtoEncode for f64 {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_f64_le(*self);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        8
    }
}
