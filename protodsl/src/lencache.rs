//! Two-pass length cache driving the write side of message encoding.
//!
//! A length-delimited field's body length can only be known once its own
//! subtree has been walked, but the wire format requires the length prefix
//! *before* the body. Naively, an encoder either buffers the body to measure
//! it, or recomputes `encoded_len()` twice (once while sizing the parent,
//! once while writing it) — quadratic in nesting depth for deeply nested
//! messages.
//!
//! Instead, every length-delimited field (a nested message, packed repeated
//! run, `bytes`, or `string`) reserves a slot in a flat [`LenCache`] the
//! first time it is visited, in declaration order (pre-order over the
//! message tree), descends into its own children — which reserve and fill
//! their own slots — and then fills its slot once its body length is known.
//! Reading the cache back sequentially from the front, in the same pre-order
//! the size pass visited fields in, reproduces exactly the lengths the write
//! pass needs, in the order it needs them, with every length computed
//! exactly once.
//!
//! Concretely, for `message M { A a = 1; B b = 2; }` where `A` itself
//! contains one nested message field, the size pass leaves the cache holding
//! `[len(a), len(a.inner), len(b)]` — `a`'s slot is reserved (and later
//! filled) before `a.inner`'s, because `a`'s slot is reserved before
//! recursing into `a`'s own fields. The write pass then reads the cache
//! left-to-right, which is exactly the order a depth-first write visits
//! those same fields.

use smallvec::SmallVec;

/// Inline capacity before the cache spills to the heap. Chosen to cover the
/// overwhelming majority of real messages (a handful of length-delimited
/// fields per message) without allocating.
const INLINE_CAPACITY: usize = 16;

/// Write-side scratch space recording each length-delimited field's encoded
/// body length, indexed in the pre-order the message tree is walked.
#[derive(Default)]
pub struct LenCache {
    lens: SmallVec<[usize; INLINE_CAPACITY]>,
}

impl LenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next slot, to be [`fill`](Self::fill)ed once this field's
    /// body length is known (after recursing into any of its own
    /// length-delimited children, which reserve slots of their own).
    #[inline]
    pub fn reserve(&mut self) -> usize {
        let index = self.lens.len();
        self.lens.push(0);
        index
    }

    /// Fill a previously [`reserve`](Self::reserve)d slot.
    #[inline]
    pub fn fill(&mut self, index: usize, len: usize) {
        self.lens[index] = len;
    }

    /// Reserve and immediately fill a slot, for a length known with no
    /// recursion (e.g. a `bytes`/`string` field's length is just `self.len()`).
    #[inline]
    pub fn push(&mut self, len: usize) -> usize {
        let index = self.reserve();
        self.fill(index, len);
        index
    }

    /// Start reading this cache back from the front, for the write pass.
    #[inline]
    pub fn reader(&self) -> LenCacheReader<'_> {
        LenCacheReader { lens: &self.lens, pos: 0 }
    }

    pub fn clear(&mut self) {
        self.lens.clear();
    }

    pub fn len(&self) -> usize {
        self.lens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lens.is_empty()
    }
}

/// Read-side cursor over a [`LenCache`], consumed in the same pre-order the
/// size pass produced it in.
pub struct LenCacheReader<'a> {
    lens: &'a [usize],
    pos: usize,
}

impl<'a> LenCacheReader<'a> {
    /// Consume the next recorded length.
    ///
    /// # Panics
    ///
    /// Panics if the write pass visits a different number, or a different
    /// order, of length-delimited fields than the size pass did for the same
    /// value. Both passes walk generated code over the same field list, so
    /// this is a programming error (the two passes have gone out of sync),
    /// never a property of decoded data — it therefore has no
    /// `DecodeError` variant.
    #[inline]
    pub fn next(&mut self) -> usize {
        let len = self.lens[self.pos];
        self.pos += 1;
        len
    }
}
