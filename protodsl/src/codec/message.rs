//! Message-level types and helpers.
//!
//! Encoding a message is a two-pass operation: [`ProtoMessage::encoded_message_len`]
//! walks the message once, filling a [`LenCache`] with the length of every
//! length-delimited field (including nested messages, recursively), and
//! [`ProtoMessage::encode_message`] walks it a second time, writing bytes
//! while reading that same cache back in lockstep. See [`crate::lencache`]
//! for why this is a cache and not a second `encoded_len()` call per field.

use bytes::Buf;

use crate::error::DecodeError;
use crate::lencache::{LenCache, LenCacheReader};
use crate::varint::VarintCodec;

use super::{ProtoDecode, ProtoEncode};

/// Trait for protobuf message types, implemented by generated message structs.
pub trait ProtoMessage: Sized + Default {
    /// Decode a message body (no length prefix) from `buf`, consuming
    /// whatever of it belongs to this message.
    ///
    /// Called directly for a top-level message (the whole input is the
    /// message) and via [`decode_message_field`] for a nested one (`buf` is
    /// bounded to the field's declared length there).
    fn decode_message<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError>;

    /// First pass: compute this message's encoded body length (not including
    /// its own length prefix), reserving and filling a `cache` slot for
    /// every length-delimited field it contains.
    fn encoded_message_len(&self, cache: &mut LenCache) -> usize;

    /// Second pass: write this message's body, consuming `cache` in the same
    /// order [`encoded_message_len`](Self::encoded_message_len) filled it.
    fn encode_message<B: bytes::BufMut>(&self, buf: &mut B, cache: &mut LenCacheReader<'_>);

    /// Encode this message as a standalone length-prefixed frame: runs both
    /// passes and writes the length prefix ahead of the body.
    fn write<B: bytes::BufMut>(&self, buf: &mut B) {
        let mut cache = LenCache::new();
        let body_len = self.encoded_message_len(&mut cache);
        (body_len as u64).encode_varint(buf);
        let mut reader = cache.reader();
        self.encode_message(buf, &mut reader);
    }

    /// Returns the total encoded size of [`write`](Self::write)'s output
    /// (length prefix plus body), populating `cache` for a subsequent
    /// [`write`](Self::write) call.
    fn write_len(&self, cache: &mut LenCache) -> usize {
        let body_len = self.encoded_message_len(cache);
        (body_len as u64).encoded_varint_len() + body_len
    }

    /// Alias for [`write`](Self::write): frame this message with only a
    /// length prefix (no field key), for stream transports that delimit
    /// messages without a surrounding field.
    fn write_len_prefixed<B: bytes::BufMut>(&self, buf: &mut B) {
        self.write(buf)
    }

    /// Decode a message framed with only a length prefix (no field key), the
    /// counterpart to [`write_len_prefixed`](Self::write_len_prefixed).
    fn read_len_prefixed<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
        decode_message_field(buf)
    }

    /// Decode assuming `buf` contains exactly one complete message, with no
    /// trailing bytes.
    fn full_read<B: bytes::Buf>(mut buf: B) -> Result<Self, DecodeError> {
        let msg = Self::decode_message(&mut buf)?;
        if buf.has_remaining() {
            return Err(DecodeError::MoreDataThanRequired);
        }
        Ok(msg)
    }

    /// Returns the proto2 schema text for this message (see
    /// [`crate::schema`]). Generated field-by-field by `#[derive(ProtoMessage)]`;
    /// a hand-written impl may implement this directly against the
    /// `crate::schema` building blocks, as `src/bin/main.rs` does.
    #[cfg(feature = "alloc")]
    fn msg_def() -> alloc::string::String;
}

/// Decode a message as a length-delimited field: read the length prefix,
/// bound `buf` to exactly that many bytes, and decode the message body from
/// the bounded view. Errors if the message doesn't consume its entire
/// declared length.
#[inline]
pub fn decode_message_field<T: ProtoMessage, B: bytes::Buf>(buf: &mut B) -> Result<T, DecodeError> {
    let len = crate::wire::decode_len(buf)?;
    if buf.remaining() < len {
        return Err(DecodeError::MsgIncomplete);
    }
    let mut sub = buf.take(len);
    let msg = T::decode_message(&mut sub)?;
    if sub.has_remaining() {
        return Err(DecodeError::MoreDataThanRequired);
    }
    Ok(msg)
}

/// Encode a message as a length-delimited field, consuming one cache slot
/// (reserved for it by [`encoded_message_field_len`]).
#[inline]
pub fn encode_message_field<T: ProtoMessage, B: bytes::BufMut>(
    msg: &T,
    buf: &mut B,
    cache: &mut LenCacheReader<'_>,
) {
    let len = cache.next();
    (len as u64).encode_varint(buf);
    msg.encode_message(buf, cache);
}

/// Compute the encoded length of a message as a length-delimited field
/// (length prefix plus body), reserving this field's own cache slot before
/// recursing into the message's own length-delimited children so the cache
/// ends up in pre-order.
#[inline]
pub fn encoded_message_field_len<T: ProtoMessage>(msg: &T, cache: &mut LenCache) -> usize {
    let slot = cache.reserve();
    let body_len = msg.encoded_message_len(cache);
    cache.fill(slot, body_len);
    (body_len as u64).encoded_varint_len() + body_len
}

/// Skip over a length-delimited field and return its bytes. Used by
/// generated "unknown field" handling to preserve nothing but advance past
/// the field correctly.
#[inline]
pub fn skip_len_field<B: bytes::Buf>(buf: &mut B) -> Result<bytes::Bytes, DecodeError> {
    let len = crate::wire::decode_len(buf)?;
    if buf.remaining() < len {
        return Err(DecodeError::MsgIncomplete);
    }
    Ok(buf.copy_to_bytes(len))
}

// Message fields are handled directly by derive-generated code via the
// free functions above (`decode_message_field`, `encode_message_field`,
// `encoded_message_field_len`), not through the cache-less `ProtoEncode`/
// `ProtoDecode` traits or their `Option<T>`/`Box<T>` blanket impls (see
// `codec::wrappers`) — those traits have no cache parameter, so routing a
// nested message through them would silently drop back to the quadratic
// recompute-every-time behavior this module exists to avoid.
