//! Transmit bounce policy
//!
//! Some controllers cannot DMA from arbitrarily aligned memory, and some
//! expect payloads byte-swapped per 32-bit word. Instead of compile-time
//! switches the driver takes a [`BouncePolicy`]: a predicate deciding
//! whether a frame can be handed to the controller as-is, plus the copy step
//! used when it cannot.
//!
//! Bounce buffers are allocated once per transmit slot when the device is
//! opened ([`BounceBuffers`]); nothing is allocated per packet.

use super::buffer::BufferPool;
use crate::internal::constants::{FEC_ALIGNMENT, FEC_ALIGNMENT_MXS};

/// Decides how transmit payloads reach the controller.
pub trait BouncePolicy {
    /// Return `true` when `frame` must be staged through a bounce buffer
    fn needs_bounce(&self, frame: &[u8]) -> bool;

    /// Copy `frame` into `bounce` in the layout the controller expects.
    ///
    /// `bounce` is at least as long as `frame`.
    fn stage(&self, frame: &[u8], bounce: &mut [u8]) {
        bounce[..frame.len()].copy_from_slice(frame);
    }

    /// Bytes of the bounce buffer [`stage`](Self::stage) writes for a
    /// `len`-byte frame; the whole span is mapped for the controller.
    fn staged_len(&self, len: usize) -> usize {
        len
    }

    /// Undo controller-specific layout on received data before it is copied
    /// upward. `data` covers the received bytes rounded up to whole words.
    fn fixup_rx(&self, data: &mut [u8]) {
        let _ = data;
    }
}

/// Controllers without any layout restriction
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoBounce;

impl BouncePolicy for NoBounce {
    #[inline]
    fn needs_bounce(&self, _frame: &[u8]) -> bool {
        false
    }
}

/// Bounce frames whose start address has any bit of `mask` set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignMask {
    mask: usize,
}

impl AlignMask {
    /// 4-byte alignment
    pub const WORD: Self = Self::new(FEC_ALIGNMENT);

    /// 16-byte alignment (i.MX28-class controllers)
    pub const BURST: Self = Self::new(FEC_ALIGNMENT_MXS);

    /// Create a policy for the given address mask
    pub const fn new(mask: usize) -> Self {
        Self { mask }
    }

    /// The address mask
    pub const fn mask(&self) -> usize {
        self.mask
    }
}

impl Default for AlignMask {
    fn default() -> Self {
        Self::WORD
    }
}

impl BouncePolicy for AlignMask {
    #[inline]
    fn needs_bounce(&self, frame: &[u8]) -> bool {
        (frame.as_ptr() as usize) & self.mask != 0
    }
}

/// Big-endian-word controllers: every frame is staged and byte-swapped per
/// 32-bit word, and received data is swapped back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WordSwap;

impl BouncePolicy for WordSwap {
    #[inline]
    fn needs_bounce(&self, _frame: &[u8]) -> bool {
        true
    }

    fn stage(&self, frame: &[u8], bounce: &mut [u8]) {
        let len = frame.len();
        let padded = len.next_multiple_of(4).min(bounce.len());
        bounce[..len].copy_from_slice(frame);
        bounce[len..padded].fill(0);
        swap_words(&mut bounce[..padded]);
    }

    fn staged_len(&self, len: usize) -> usize {
        len.next_multiple_of(4)
    }

    fn fixup_rx(&self, data: &mut [u8]) {
        swap_words(data);
    }
}

/// Reverse the byte order of each whole 32-bit word in `data`
fn swap_words(data: &mut [u8]) {
    for word in data.chunks_exact_mut(4) {
        word.reverse();
    }
}

// =============================================================================
// Per-slot bounce buffers
// =============================================================================

/// One bounce buffer per transmit slot.
pub struct BounceBuffers<B, const N: usize> {
    slots: [Option<B>; N],
}

impl<B, const N: usize> BounceBuffers<B, N> {
    /// Empty set (no buffers allocated)
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
        }
    }

    /// Allocate every missing slot buffer from `pool`.
    ///
    /// Returns `false` if the pool ran dry; slots filled so far are kept.
    pub fn fill<P>(&mut self, pool: &mut P, size: usize) -> bool
    where
        P: BufferPool<Buffer = B>,
    {
        for slot in &mut self.slots {
            if slot.is_none() {
                match pool.alloc(size) {
                    Some(buf) => *slot = Some(buf),
                    None => return false,
                }
            }
        }
        true
    }

    /// Bounce buffer of `slot`, if allocated
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut B> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Check if every slot has a buffer
    pub fn is_filled(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Return every buffer to its pool
    pub fn release(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}

impl<B, const N: usize> Default for BounceBuffers<B, N> {
    fn default() -> Self {
        Self::new()
    }
}
