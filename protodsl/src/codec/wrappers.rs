//! Wrapper type support for protobuf (e.g. Option, Box).

#[cfg(feature = "alloc")]
use alloc::boxed::Box;

use super::{ProtoDecode, ProtoEncode, ProtoType};
use crate::error::DecodeError;
use crate::wire::WireType;

impl<T: ProtoType> ProtoType for Option<T> {
    const WIRE_TYPE: WireType = T::WIRE_TYPE;
}

impl<T: ProtoDecode> ProtoDecode for Option<T> {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        offset: usize,
    ) -> Result<(), DecodeError> {
        let mut value = T::default();
        T::decode_into(buf, &mut value, offset)?;
        *dst = Some(value);
        Ok(())
    }
}

impl<T: ProtoEncode> ProtoEncode for Option<T> {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        if let Some(value) = self {
            value.encode(buf);
        }
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        match self {
            Some(value) => value.encoded_len(),
            None => 0,
        }
    }
}

// Box<T> implementations - allows heap allocation for recursive or large types.

#[cfg(feature = "alloc")]
impl<T: ProtoType> ProtoType for Box<T> {
    const WIRE_TYPE: WireType = T::WIRE_TYPE;
}

#[cfg(feature = "alloc")]
impl<T: ProtoDecode> ProtoDecode for Box<T> {
    #[inline]
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        offset: usize,
    ) -> Result<(), DecodeError> {
        T::decode_into(buf, dst.as_mut(), offset)
    }
}

#[cfg(feature = "alloc")]
impl<T: ProtoEncode> ProtoEncode for Box<T> {
    #[inline]
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        self.as_ref().encode(buf);
    }

    #[inline]
    fn encoded_len(&self) -> usize {
        self.as_ref().encoded_len()
    }
}
