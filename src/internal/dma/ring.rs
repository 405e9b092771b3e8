//! Circular descriptor ring shared with the controller.
//!
//! The ring tracks a producer cursor (next slot handed to the controller)
//! and a consumer cursor (oldest slot not yet reclaimed). Equal cursors are
//! ambiguous, so an explicit `full` flag is set when the producer catches the
//! consumer and cleared whenever a slot is reclaimed. Cursor traversal follows
//! the wrap marker carried by the last descriptor.

use core::sync::atomic::{Ordering, fence};

use super::descriptor::{BufferDescriptor, Owner};

/// Returned by [`DescriptorRing::reserve_next_tx`] when every slot is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingFull;

/// Fixed-capacity circular descriptor ring.
pub struct DescriptorRing<const N: usize> {
    descriptors: [BufferDescriptor; N],
    producer: usize,
    consumer: usize,
    full: bool,
}

impl<const N: usize> DescriptorRing<N> {
    const SIZE_OK: () = assert!(
        N > 0 && N.is_power_of_two(),
        "descriptor ring size must be a non-zero power of two"
    );

    /// Create a ring of software-owned, zeroed descriptors.
    ///
    /// The wrap marker is written by [`reset`](Self::reset), which must run
    /// before the ring is handed to the controller.
    pub const fn new() -> Self {
        let () = Self::SIZE_OK;
        Self {
            descriptors: [const { BufferDescriptor::new() }; N],
            producer: 0,
            consumer: 0,
            full: false,
        }
    }

    /// Number of descriptors in the ring
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Producer cursor
    #[inline(always)]
    pub const fn producer(&self) -> usize {
        self.producer
    }

    /// Consumer cursor
    #[inline(always)]
    pub const fn consumer(&self) -> usize {
        self.consumer
    }

    /// Check if every slot is in flight
    #[inline(always)]
    pub const fn is_full(&self) -> bool {
        self.full
    }

    /// Number of slots between consumer and producer
    pub const fn occupancy(&self) -> usize {
        if self.full {
            N
        } else {
            (self.producer + N - self.consumer) % N
        }
    }

    /// Descriptor at `slot`
    #[inline(always)]
    pub fn descriptor(&self, slot: usize) -> &BufferDescriptor {
        &self.descriptors[slot % N]
    }

    /// Iterate over all descriptors with their slot index
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BufferDescriptor)> {
        self.descriptors.iter().enumerate()
    }

    /// Base address as programmed into the ring start register
    #[inline(always)]
    pub fn base_addr_u32(&self) -> u32 {
        self.descriptors.as_ptr() as usize as u32
    }

    /// Slot after `slot`, following the wrap marker
    #[inline(always)]
    fn next(&self, slot: usize) -> usize {
        if self.descriptors[slot].is_wrap() {
            0
        } else {
            (slot + 1) % N
        }
    }

    /// Return both cursors to the base, clear `full`, and re-mark the wrap slot.
    ///
    /// Descriptor contents other than the wrap marker are left to the caller.
    pub fn reset(&mut self) {
        for (i, desc) in self.descriptors.iter().enumerate() {
            desc.set_wrap(i == N - 1);
        }
        self.producer = 0;
        self.consumer = 0;
        self.full = false;
    }

    // =========================================================================
    // Producer side
    // =========================================================================

    /// Slot the next transmit should fill, or [`RingFull`].
    pub fn reserve_next_tx(&self) -> Result<usize, RingFull> {
        if self.full || self.descriptors[self.producer].is_device_owned() {
            return Err(RingFull);
        }
        Ok(self.producer)
    }

    /// Hand the producer slot to the controller and advance.
    ///
    /// Sets `full` when the producer lands on the consumer.
    pub fn advance_producer(&mut self) {
        // Descriptor body must be visible before ownership flips
        fence(Ordering::Release);
        self.descriptors[self.producer].set_owner(Owner::Device);
        self.producer = self.next(self.producer);
        if self.producer == self.consumer {
            self.full = true;
        }
    }

    // =========================================================================
    // Consumer side
    // =========================================================================

    /// Reclaim slots the controller has released, oldest first.
    ///
    /// Calls `f(slot, descriptor)` for each reclaimed slot and stops at the
    /// first slot still owned by the controller or when the ring is empty.
    /// Returns the number of reclaimed slots.
    pub fn drain_completed<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(usize, &BufferDescriptor),
    {
        let mut reclaimed = 0;
        loop {
            let slot = self.consumer;
            if self.descriptors[slot].is_device_owned() {
                break;
            }
            if slot == self.producer && !self.full {
                break;
            }
            fence(Ordering::Acquire);
            f(slot, &self.descriptors[slot]);
            self.full = false;
            self.consumer = self.next(slot);
            reclaimed += 1;
        }
        reclaimed
    }

    /// Consumer slot, if the controller has released it.
    ///
    /// Receive rings keep every slot armed, so ownership alone decides.
    pub fn next_received(&self) -> Option<usize> {
        let slot = self.consumer;
        if self.descriptors[slot].is_device_owned() {
            None
        } else {
            fence(Ordering::Acquire);
            Some(slot)
        }
    }

    /// Advance past a re-armed receive slot.
    ///
    /// The producer follows the consumer, so a receive ring always reads as
    /// empty from software's side.
    pub fn advance_received(&mut self) {
        self.consumer = self.next(self.consumer);
        self.producer = self.consumer;
        self.full = false;
    }
}

impl<const N: usize> Default for DescriptorRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
