//! Buffer descriptor shared with the controller's DMA engine.
//!
//! One descriptor format serves both rings. Each descriptor points to a data
//! buffer and carries the status/control bits that hand the slot back and
//! forth between software and the controller.

pub mod bits;

use bits::{esc, rx, sc, tx};

/// Volatile cell wrapper for descriptor fields
///
/// Ensures all accesses are volatile so the compiler never caches or
/// reorders descriptor field accesses the controller may observe.
#[repr(transparent)]
pub(crate) struct VolatileCell<T: Copy> {
    value: core::cell::UnsafeCell<T>,
}

// Safety: every access is a volatile read or write of a naturally aligned
// u16/u32 field.
unsafe impl<T: Copy> Sync for VolatileCell<T> {}

impl<T: Copy> VolatileCell<T> {
    /// Create a new volatile cell with the given initial value
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            value: core::cell::UnsafeCell::new(value),
        }
    }

    /// Read the value (volatile read)
    #[inline(always)]
    pub fn get(&self) -> T {
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    /// Write a value (volatile write)
    #[inline(always)]
    pub fn set(&self, value: T) {
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }

    /// Update the value using a function (read-modify-write)
    #[inline(always)]
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let old = self.get();
        self.set(f(old));
    }
}

// =============================================================================
// Ownership
// =============================================================================

/// Which side may currently mutate a descriptor slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Owner {
    /// The controller owns the slot; software must not touch it
    Device,
    /// Software owns the slot
    Software,
}

impl Owner {
    /// Decode from a raw status word
    #[inline(always)]
    pub const fn from_status(status: u16) -> Self {
        if status & sc::OWN != 0 {
            Owner::Device
        } else {
            Owner::Software
        }
    }
}

// =============================================================================
// Buffer Descriptor
// =============================================================================

/// Enhanced buffer descriptor (32 bytes).
///
/// Field order follows the little-endian layout of the controller: the
/// 16-bit length precedes the status word in memory.
#[repr(C, align(16))]
pub struct BufferDescriptor {
    /// Payload length (`cbd_datlen`)
    len: VolatileCell<u16>,
    /// Status and control (`cbd_sc`)
    status: VolatileCell<u16>,
    /// DMA address of the buffer (`cbd_bufaddr`)
    addr: VolatileCell<u32>,
    /// Extended status (`cbd_esc`)
    esc: VolatileCell<u32>,
    /// Protocol checksum status (`cbd_prot`)
    prot: VolatileCell<u32>,
    /// Last buffer descriptor update done (`cbd_bdu`)
    bdu: VolatileCell<u32>,
    /// 1588 timestamp
    _timestamp: VolatileCell<u32>,
    _reserved: [u16; 4],
}

impl BufferDescriptor {
    /// Size of one descriptor in bytes
    pub const SIZE: usize = core::mem::size_of::<Self>();

    /// Create a zeroed, software-owned descriptor
    pub const fn new() -> Self {
        Self {
            len: VolatileCell::new(0),
            status: VolatileCell::new(0),
            addr: VolatileCell::new(0),
            esc: VolatileCell::new(0),
            prot: VolatileCell::new(0),
            bdu: VolatileCell::new(0),
            _timestamp: VolatileCell::new(0),
            _reserved: [0; 4],
        }
    }

    // -------------------------------------------------------------------------
    // Raw field access
    // -------------------------------------------------------------------------

    /// Raw status word
    #[inline(always)]
    pub fn status(&self) -> u16 {
        self.status.get()
    }

    /// Overwrite the raw status word
    #[inline(always)]
    pub fn set_status(&self, status: u16) {
        self.status.set(status);
    }

    /// Payload length
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len.get() as usize
    }

    /// Set the payload length
    #[inline(always)]
    pub fn set_len(&self, len: usize) {
        self.len.set(len as u16);
    }

    /// Mapped buffer address
    #[inline(always)]
    pub fn addr(&self) -> u32 {
        self.addr.get()
    }

    /// Set the mapped buffer address
    #[inline(always)]
    pub fn set_addr(&self, addr: u32) {
        self.addr.set(addr);
    }

    /// Extended status word
    #[inline(always)]
    pub fn esc(&self) -> u32 {
        self.esc.get()
    }

    /// Set the extended status word
    #[inline(always)]
    pub fn set_esc(&self, value: u32) {
        self.esc.set(value);
    }

    // -------------------------------------------------------------------------
    // Ownership
    // -------------------------------------------------------------------------

    /// Current owner of the slot
    #[inline(always)]
    pub fn owner(&self) -> Owner {
        Owner::from_status(self.status())
    }

    /// Check if the controller owns this slot
    #[inline(always)]
    pub fn is_device_owned(&self) -> bool {
        self.owner() == Owner::Device
    }

    /// Check if this slot carries the ring wrap marker
    #[inline(always)]
    pub fn is_wrap(&self) -> bool {
        self.status() & sc::WRAP != 0
    }

    /// Set or clear the wrap marker, leaving other bits alone
    #[inline(always)]
    pub fn set_wrap(&self, wrap: bool) {
        self.status.update(|s| if wrap { s | sc::WRAP } else { s & !sc::WRAP });
    }

    /// Hand the slot to `owner`
    #[inline(always)]
    pub fn set_owner(&self, owner: Owner) {
        self.status.update(|s| match owner {
            Owner::Device => s | sc::OWN,
            Owner::Software => s & !sc::OWN,
        });
    }

    // -------------------------------------------------------------------------
    // Transmit
    // -------------------------------------------------------------------------

    /// Fill in a transmit slot: address, length and extended status.
    ///
    /// Ownership is not transferred here; the ring does that when the
    /// producer advances.
    pub fn prepare_tx(&self, addr: u32, len: usize, timestamp: bool) {
        self.set_addr(addr);
        self.set_len(len);
        let mut ext = esc::TX_INT;
        if timestamp {
            ext |= esc::TX_TS;
        }
        self.set_esc(ext);
        self.bdu.set(0);
        self.status.update(|s| (s & !tx::STATS) | tx::INTR | tx::LAST | tx::TC);
    }

    /// Reset a transmit slot to software-owned and empty, keeping the wrap marker
    pub fn clear_tx(&self) {
        let wrap = self.status() & sc::WRAP;
        self.set_status(wrap);
        self.set_addr(0);
        self.set_len(0);
        self.set_esc(0);
        self.bdu.set(0);
    }

    // -------------------------------------------------------------------------
    // Receive
    // -------------------------------------------------------------------------

    /// Hand a receive slot back to the controller, empty, at `addr`
    pub fn arm_rx(&self, addr: u32) {
        self.set_addr(addr);
        self.set_esc(esc::RX_INT);
        self.prot.set(0);
        self.bdu.set(0);
        self.status.update(|s| (s & !rx::STATS & !rx::LAST) | rx::EMPTY);
    }
}

impl Default for BufferDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_layout_is_32_bytes() {
        assert_eq!(BufferDescriptor::SIZE, 32);
        assert_eq!(core::mem::align_of::<BufferDescriptor>(), 16);
    }

    #[test]
    fn owner_tracks_the_ownership_bit() {
        let desc = BufferDescriptor::new();
        assert_eq!(desc.owner(), Owner::Software);

        desc.set_owner(Owner::Device);
        assert_eq!(desc.status(), 0x8000);
        assert!(desc.is_device_owned());

        desc.set_owner(Owner::Software);
        assert_eq!(desc.owner(), Owner::Software);
    }

    #[test]
    fn prepare_tx_sets_write_flags_and_keeps_wrap() {
        let desc = BufferDescriptor::new();
        desc.set_wrap(true);
        desc.set_status(desc.status() | tx::DEF | tx::LC);

        desc.prepare_tx(0x8000_1000, 64, false);

        assert_eq!(desc.status(), tx::WRAP | tx::INTR | tx::LAST | tx::TC);
        assert_eq!(desc.addr(), 0x8000_1000);
        assert_eq!(desc.len(), 64);
        assert_eq!(desc.esc(), esc::TX_INT);
        assert_eq!(desc.owner(), Owner::Software);
    }

    #[test]
    fn prepare_tx_requests_timestamp() {
        let desc = BufferDescriptor::new();
        desc.prepare_tx(0x100, 60, true);
        assert_eq!(desc.esc(), esc::TX_INT | esc::TX_TS);
    }

    #[test]
    fn arm_rx_clears_stats_and_sets_empty() {
        let desc = BufferDescriptor::new();
        desc.set_status(rx::WRAP | rx::LAST | rx::CR | rx::MISS);

        desc.arm_rx(0x2000);

        assert_eq!(desc.status(), rx::WRAP | rx::EMPTY);
        assert_eq!(desc.esc(), esc::RX_INT);
        assert!(desc.is_device_owned());
    }

    #[test]
    fn clear_tx_keeps_only_wrap() {
        let desc = BufferDescriptor::new();
        desc.set_wrap(true);
        desc.prepare_tx(0x100, 60, false);
        desc.set_owner(Owner::Device);

        desc.clear_tx();

        assert_eq!(desc.status(), sc::WRAP);
        assert_eq!(desc.addr(), 0);
        assert_eq!(desc.len(), 0);
    }
}
