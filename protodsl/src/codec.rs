//! Encoding and decoding traits for protobuf wire format.

mod default_check;
mod delimited;
#[cfg(feature = "alloc")]
mod map;
mod message;
mod oneof;
#[cfg(feature = "alloc")]
mod packed;
#[cfg(feature = "alloc")]
mod repeated;
mod scalar;
mod wrappers;

use crate::error::DecodeError;
use crate::wire::WireType;

pub trait ProtoType: Sized {
    /// The wire type used to decode this type.
    const WIRE_TYPE: WireType;
}

/// A type that can be decoded from protobuf wire format.
///
/// Implemented by scalars, fixed-width wrappers, and the cheap
/// length-delimited leaf types (`bytes`, `string`) whose length is an O(1)
/// `len()` call. Nested messages, packed repeated runs, and maps are
/// length-delimited too but are NOT `ProtoDecode`/`ProtoEncode` — they go
/// through the cache-aware helpers in `codec::message` instead (see that
/// module for why).
pub trait ProtoDecode: ProtoType + Default {
    /// Decode from `buf` into `dst`, following protobuf merging semantics.
    ///
    /// # Parameters
    /// * `buf`: The buffer to decode from (positioned at the value, after the key).
    /// * `dst`: The destination to decode into.
    /// * `offset`: Byte offset of this value in the message buffer.
    ///
    fn decode_into<B: bytes::Buf>(
        buf: &mut B,
        dst: &mut Self,
        offset: usize,
    ) -> Result<(), DecodeError>;
}

/// A type that can be encoded to protobuf wire format.
///
/// Types that implement `ProtoEncode` must also implement `ProtoDecode`.
pub trait ProtoEncode: ProtoType {
    /// Encode this value to the buffer.
    fn encode<B: bytes::BufMut>(&self, buf: &mut B);

    /// Returns the encoded length of this value (not including field key).
    fn encoded_len(&self) -> usize;
}

// Re-export default checking trait
pub use default_check::IsProtoDefault;

// Re-export scalar types
pub use scalar::{Fixed32, Fixed64, Sfixed32, Sfixed64, Sint32, Sint64};

// Re-export length-delimited types
pub use delimited::{ProtoBytes, ProtoString};

// Re-export repeated field types
#[cfg(feature = "alloc")]
pub use repeated::{decode_repeated_into, ProtoRepeated, Repeated, RepeatedDecodeIter, RepeatedIter};

// Re-export message types and helpers
pub use message::{
    decode_message_field, encode_message_field, encoded_message_field_len, skip_len_field,
    ProtoMessage,
};

// Re-export the length cache: `ProtoMessage::encoded_message_len`/`encode_message`
// take it by reference, so it must be nameable wherever a `ProtoMessage` impl is
// written (derive-generated or hand-written, see `src/bin/main.rs`).
pub use crate::lencache::{LenCache, LenCacheReader};

// Re-export oneof types and helpers
pub use oneof::{decode_oneof_field, encode_oneof_field, encoded_oneof_field_len, ProtoOneof};

// Re-export map field types
#[cfg(feature = "alloc")]
pub use map::{ProtoMap, ProtoMapKey};

// Re-export optimized packed decoding
#[cfg(feature = "alloc")]
pub use packed::PackedDecode;
