//! The closed taxonomy of decode-time errors.
//!
//! Writes cannot fail from the codec itself: every size is computed by the
//! first pass before a single byte is written (see [`crate::lencache`]), so
//! there is no `EncodeError`. A write can only fail if the destination
//! buffer cannot grow, which is a property of the buffer, not the codec.

use core::fmt;

/// A decode-time error.
///
/// This is a plain, non-bit-packed enum: the codec favors a readable
/// closed taxonomy over the register-packing tricks a lower-level wire
/// parser might reach for, since `DecodeError` is returned from
/// user-facing entry points (`read`, `full_read`), not threaded through
/// every leaf call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A varint ran off the end of the buffer before its terminating byte.
    VarintIncomplete,
    /// A varint's terminating byte carried bits beyond the target width.
    VarintTooLarge,
    /// A fixed32/fixed64 field had fewer bytes remaining than its width.
    FixedIncomplete,
    /// A length-delimited field's declared length ran past the end of its
    /// enclosing frame.
    MsgIncomplete,
    /// A declared length did not match what the backing container, packed
    /// body, or fixed-size destination required.
    InvalidLength,
    /// A packed repeated field's wire cursor did not land on the declared
    /// length boundary after decoding all elements.
    RepeatedIncomplete,
    /// The decoded tag did not match the field being read. This is caught
    /// locally by message dispatch (§4.E step 4) and is never returned to
    /// a caller of `read`/`full_read` — it is part of the internal
    /// tag-match/skip protocol, not a user-visible failure.
    TagMismatch,
    /// A non-optional field was absent after the read loop completed.
    RequiredFieldMissing,
    /// A user validator rejected a decoded value, optionally with a reason.
    ValidationFailed(Option<&'static str>),
    /// `full_read` decoded a complete message but bytes remained.
    MoreDataThanRequired,
    /// The wire type nibble decoded from a key was outside 0..=5.
    InvalidWireType(u8),
    /// A decoded tag was zero or exceeded the 29-bit field-id range.
    InvalidKey,
    /// A string field's bytes were not valid UTF-8.
    InvalidUtf8,
}

impl DecodeError {
    #[cold]
    #[inline(never)]
    pub const fn validation_failed(reason: &'static str) -> Self {
        Self::ValidationFailed(Some(reason))
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VarintIncomplete => write!(f, "varint ran out of bytes before terminating"),
            Self::VarintTooLarge => write!(f, "varint overflowed the target integer width"),
            Self::FixedIncomplete => write!(f, "fixed-width field ran out of bytes"),
            Self::MsgIncomplete => {
                write!(f, "length-delimited field's declared length exceeds remaining bytes")
            }
            Self::InvalidLength => {
                write!(f, "declared length did not match the destination or packed body")
            }
            Self::RepeatedIncomplete => {
                write!(f, "packed repeated field did not end on its declared length boundary")
            }
            Self::TagMismatch => write!(f, "tag did not match the expected field"),
            Self::RequiredFieldMissing => write!(f, "required field missing from wire data"),
            Self::ValidationFailed(Some(reason)) => write!(f, "validation failed: {reason}"),
            Self::ValidationFailed(None) => write!(f, "validation failed"),
            Self::MoreDataThanRequired => write!(f, "trailing bytes after a complete message"),
            Self::InvalidWireType(v) => write!(f, "invalid wire type {v}"),
            Self::InvalidKey => write!(f, "invalid field key (zero or out-of-range tag)"),
            Self::InvalidUtf8 => write!(f, "string field was not valid UTF-8"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

pub type Result<T> = core::result::Result<T, DecodeError>;

/// What a `#[proto(validate = "...")]` function is allowed to return.
///
/// A validator may be written as a plain predicate (`fn(&T) -> bool`) or as
/// one that reports its own reason (`fn(&T) -> Result<(), DecodeError>`).
/// The derive macro doesn't know which at expansion time — it has no type
/// information about the validator's return type — so it emits a call to
/// [`ValidateOutcome::into_validate_result`] and lets trait resolution pick
/// the right conversion at the call site instead.
pub trait ValidateOutcome {
    /// `false` becomes a bare [`DecodeError::ValidationFailed(None)`]; a
    /// `Result` is forwarded verbatim, reason and all.
    fn into_validate_result(self) -> Result<()>;
}

impl ValidateOutcome for bool {
    fn into_validate_result(self) -> Result<()> {
        if self {
            Ok(())
        } else {
            Err(DecodeError::ValidationFailed(None))
        }
    }
}

impl ValidateOutcome for Result<()> {
    fn into_validate_result(self) -> Result<()> {
        self
    }
}
