//! Oneof field support for protobuf.
//!
//! Protobuf oneofs map naturally to Rust enums. This module provides the
//! [`ProtoOneof`] trait for oneof encode/decode.
//!
//! # Wire Format
//!
//! Oneofs have no wire representation of their own. Each variant is encoded
//! as a regular field with its own tag, injected into the enclosing
//! message's own tag dispatch. The mutual exclusivity is enforced at the
//! Rust type level, and "last one wins" semantics apply during decode.
//!
//! # Cache threading
//!
//! A oneof variant can itself be length-delimited (a `string`, `bytes`, or
//! nested message). `encoded_variant_len`/`encode_variant` thread a
//! [`LenCache`]/[`LenCacheReader`] through for that reason, even though a
//! scalar variant's implementation simply ignores it — see
//! [`crate::codec::message`] for why a length-delimited value can't just
//! recompute its own length a second time at write.
//!
//! # Example
//!
//! ```ignore
//! // Given protobuf:
//! // message Foo {
//! //   oneof widget {
//! //     int32 quux = 1;
//! //     string bar = 2;
//! //   }
//! // }
//!
//! #[derive(ProtoOneof)]
//! pub enum Widget {
//!     #[proto(tag = 1)]
//!     Quux(i32),
//!     #[proto(tag = 2)]
//!     Bar(ProtoString),
//! }
//!
//! // In the message:
//! pub struct Foo {
//!     pub widget: Option<Widget>,
//! }
//! ```

use crate::error::DecodeError;
use crate::lencache::{LenCache, LenCacheReader};
use crate::wire::WireType;

/// Trait for protobuf oneof types.
///
/// Oneofs are represented as Rust enums where each variant corresponds to
/// a possible field. Only one field can be set at a time.
///
/// When decoding, if multiple fields from the same oneof appear in the wire
/// data, the last one wins (per protobuf spec).
pub trait ProtoOneof: Sized {
    /// Decode a oneof variant from the given tag and buffer.
    ///
    /// # Returns
    /// - `Ok(Some(variant))` if the tag matches a variant in this oneof
    /// - `Ok(None)` if the tag doesn't match any variant (unknown field)
    /// - `Err(...)` if decoding fails
    fn decode_variant<B: bytes::Buf>(
        tag: u32,
        wire_type: WireType,
        buf: &mut B,
        offset: usize,
    ) -> Result<Option<Self>, DecodeError>;

    /// Encode this oneof variant's complete field (key and value).
    fn encode_variant<B: bytes::BufMut>(&self, buf: &mut B, cache: &mut LenCacheReader<'_>);

    /// Returns the encoded length of this variant (including field key),
    /// reserving any cache slot(s) its value needs.
    fn encoded_variant_len(&self, cache: &mut LenCache) -> usize;

    /// Returns the tag of the currently active variant.
    fn variant_tag(&self) -> u32;

    /// Returns the wire type of the currently active variant.
    fn variant_wire_type(&self) -> WireType;

    /// Returns `(schema_type, field_name, tag)` for every alternative this
    /// oneof declares, in declaration order, for the schema text emitter
    /// (see [`crate::schema::oneof_field_def`]). Generated by
    /// `#[derive(ProtoOneof)]`; hand-written impls that never call
    /// `msg_def()` may leave this unimplemented.
    #[cfg(feature = "alloc")]
    fn oneof_schema() -> alloc::vec::Vec<(&'static str, &'static str, u32)>;
}

/// Helper to decode a oneof field into Option<T>.
///
/// Implements "last one wins" semantics by replacing any existing value.
#[inline]
pub fn decode_oneof_field<T: ProtoOneof, B: bytes::Buf>(
    dst: &mut Option<T>,
    tag: u32,
    wire_type: WireType,
    buf: &mut B,
    offset: usize,
) -> Result<bool, DecodeError> {
    match T::decode_variant(tag, wire_type, buf, offset)? {
        Some(value) => {
            *dst = Some(value);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Helper to encode an `Option<T>` oneof field.
#[inline]
pub fn encode_oneof_field<T: ProtoOneof, B: bytes::BufMut>(
    field: &Option<T>,
    buf: &mut B,
    cache: &mut LenCacheReader<'_>,
) {
    if let Some(ref value) = field {
        value.encode_variant(buf, cache);
    }
}

/// Helper to get the encoded length of an `Option<T>` oneof field.
#[inline]
pub fn encoded_oneof_field_len<T: ProtoOneof>(field: &Option<T>, cache: &mut LenCache) -> usize {
    match field {
        Some(value) => value.encoded_variant_len(cache),
        None => 0,
    }
}
