//! Host-side test doubles
//!
//! Register file, buffer pool, network stack and delay mocks used by the
//! unit tests. The register mock models the few self-acting bits the driver
//! waits on (reset self-clear, graceful stop acknowledge, MII read data) so
//! that the bring-up and teardown paths run unchanged on the host.

#![allow(missing_docs)]

extern crate std;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::driver::{LinkState, NetStack};
use crate::hal::buffer::{BufferPool, DmaDirection, TxFrame};
use crate::hal::mdio::MiiBus;
use crate::internal::register::RegisterIo;
use crate::internal::register::fec::{
    ECNTRL, ECNTRL_RESET, EVENT_GRA, EVENT_MII, IEVENT, MII_DATA, MMFR_OP_MASK, MMFR_OP_READ,
    X_CNTRL, X_CNTRL_GTS,
};

// =============================================================================
// Mock Registers
// =============================================================================

/// In-memory FEC register file.
///
/// `IEVENT` is write-one-to-clear. Every write is logged in order.
pub struct MockRegisters {
    values: RefCell<HashMap<usize, u32>>,
    writes: RefCell<Vec<(usize, u32)>>,
    reset_self_clears: Cell<bool>,
    graceful_stop_ack: Cell<bool>,
    mii_raises_event: Cell<bool>,
    mii_reply: Cell<u16>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
            writes: RefCell::new(Vec::new()),
            reset_self_clears: Cell::new(true),
            graceful_stop_ack: Cell::new(true),
            mii_raises_event: Cell::new(false),
            mii_reply: Cell::new(0),
        }
    }

    /// Current register value
    pub fn get(&self, offset: usize) -> u32 {
        self.values.borrow().get(&offset).copied().unwrap_or(0)
    }

    /// Set a register value directly, bypassing the write log
    pub fn set(&self, offset: usize, value: u32) {
        self.values.borrow_mut().insert(offset, value);
    }

    /// Latch interrupt events as the controller would
    pub fn raise(&self, events: u32) {
        let current = self.get(IEVENT);
        self.set(IEVENT, current | events);
    }

    /// Every value written to `offset`, oldest first
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.writes
            .borrow()
            .iter()
            .filter(|(off, _)| *off == offset)
            .map(|(_, value)| *value)
            .collect()
    }

    /// Number of writes logged so far
    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }

    pub fn set_reset_self_clears(&self, enabled: bool) {
        self.reset_self_clears.set(enabled);
    }

    pub fn set_graceful_stop_ack(&self, enabled: bool) {
        self.graceful_stop_ack.set(enabled);
    }

    /// Latch `EVENT_MII` whenever a management frame is written
    pub fn set_mii_raises_event(&self, enabled: bool) {
        self.mii_raises_event.set(enabled);
    }

    /// Data returned in `MII_DATA` after a read frame
    pub fn set_mii_reply(&self, value: u16) {
        self.mii_reply.set(value);
    }
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterIo for MockRegisters {
    fn read(&self, offset: usize) -> u32 {
        self.get(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        self.writes.borrow_mut().push((offset, value));

        match offset {
            IEVENT => {
                let current = self.get(IEVENT);
                self.set(IEVENT, current & !value);
            }
            ECNTRL if self.reset_self_clears.get() => self.set(ECNTRL, value & !ECNTRL_RESET),
            X_CNTRL => {
                self.set(X_CNTRL, value);
                if value & X_CNTRL_GTS != 0 && self.graceful_stop_ack.get() {
                    self.raise(EVENT_GRA);
                }
            }
            MII_DATA => {
                let stored = if value & MMFR_OP_MASK == MMFR_OP_READ {
                    (value & !0xffff) | u32::from(self.mii_reply.get())
                } else {
                    value
                };
                self.set(MII_DATA, stored);
                if self.mii_raises_event.get() {
                    self.raise(EVENT_MII);
                }
            }
            _ => self.set(offset, value),
        }
    }
}

// =============================================================================
// Mock Buffer Pool
// =============================================================================

/// Heap-backed buffer that reports its release to the owning pool
pub struct MockBuffer {
    data: Vec<u8>,
    live: Rc<Cell<usize>>,
}

impl MockBuffer {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for MockBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl AsMut<[u8]> for MockBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for MockBuffer {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// Buffer pool with an optional capacity and scripted allocation failures
#[derive(Default)]
pub struct MockPool {
    live: Rc<Cell<usize>>,
    capacity: Option<usize>,
    fail_next: usize,
    maps: usize,
    unmaps: usize,
    map_lens: Vec<usize>,
}

impl MockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool that hands out at most `capacity` live buffers
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Fail the next `count` allocations
    pub fn fail_allocs(&mut self, count: usize) {
        self.fail_next = count;
    }

    /// Buffers handed out and not yet dropped
    pub fn outstanding(&self) -> usize {
        self.live.get()
    }

    /// Mappings created and not yet released
    pub fn mapped(&self) -> usize {
        self.maps - self.unmaps
    }

    pub fn maps(&self) -> usize {
        self.maps
    }

    /// Length of every slice mapped so far, in order
    pub fn map_lens(&self) -> &[usize] {
        &self.map_lens
    }
}

impl BufferPool for MockPool {
    type Buffer = MockBuffer;

    fn alloc(&mut self, len: usize) -> Option<MockBuffer> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return None;
        }
        if self.capacity.is_some_and(|cap| self.live.get() >= cap) {
            return None;
        }
        self.live.set(self.live.get() + 1);
        Some(MockBuffer {
            data: vec![0; len],
            live: Rc::clone(&self.live),
        })
    }

    fn map(&mut self, data: &[u8], _dir: DmaDirection) -> u32 {
        self.maps += 1;
        self.map_lens.push(data.len());
        data.as_ptr() as usize as u32
    }

    fn unmap(&mut self, _addr: u32, _len: usize, _dir: DmaDirection) {
        self.unmaps += 1;
    }
}

// =============================================================================
// Mock Network Stack
// =============================================================================

/// Records everything the driver pushes upward
pub struct MockStack<B> {
    pub delivered: Vec<B>,
    pub link_events: Vec<LinkState>,
    pub wakes: usize,
    pub stops: usize,
}

impl<B> MockStack<B> {
    pub fn new() -> Self {
        Self {
            delivered: Vec::new(),
            link_events: Vec::new(),
            wakes: 0,
            stops: 0,
        }
    }
}

impl<B> Default for MockStack<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> NetStack<B> for MockStack<B> {
    fn deliver(&mut self, frame: B) {
        self.delivered.push(frame);
    }

    fn link_changed(&mut self, state: LinkState) {
        self.link_events.push(state);
    }

    fn wake_queue(&mut self) {
        self.wakes += 1;
    }

    fn stop_queue(&mut self) {
        self.stops += 1;
    }
}

// =============================================================================
// Mock Frames
// =============================================================================

/// Outbound frame that counts its own release
pub struct CountedFrame {
    data: Vec<u8>,
    offset: usize,
    timestamp: bool,
    drops: Rc<Cell<usize>>,
}

impl CountedFrame {
    /// Frame of `len` bytes filled with `fill`
    pub fn new(len: usize, fill: u8, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            data: vec![fill; len],
            offset: 0,
            timestamp: false,
            drops: Rc::clone(drops),
        }
    }

    /// Frame whose payload starts `offset` bytes into its allocation
    pub fn misaligned(len: usize, offset: usize, drops: &Rc<Cell<usize>>) -> Self {
        let mut data = vec![0; len + offset];
        for (i, byte) in data[offset..].iter_mut().enumerate() {
            *byte = i as u8;
        }
        Self {
            data,
            offset,
            timestamp: false,
            drops: Rc::clone(drops),
        }
    }

    pub fn with_timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }
}

impl AsRef<[u8]> for CountedFrame {
    fn as_ref(&self) -> &[u8] {
        &self.data[self.offset..]
    }
}

impl TxFrame for CountedFrame {
    fn wants_timestamp(&self) -> bool {
        self.timestamp
    }
}

impl Drop for CountedFrame {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

// =============================================================================
// Mock Delays
// =============================================================================

/// Delay that only records how long it was asked to wait
#[derive(Default)]
pub struct MockDelay {
    total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }

    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Delay that signals MII completion on `bus` after a number of waits,
/// standing in for the interrupt dispatcher.
pub struct CompletingDelay<'a, R> {
    bus: &'a MiiBus<R>,
    after: u32,
    waits: u32,
}

impl<'a, R> CompletingDelay<'a, R> {
    pub fn new(bus: &'a MiiBus<R>, after: u32) -> Self {
        Self {
            bus,
            after,
            waits: 0,
        }
    }

    pub fn waits(&self) -> u32 {
        self.waits
    }
}

impl<R: RegisterIo> DelayNs for CompletingDelay<'_, R> {
    fn delay_ns(&mut self, _ns: u32) {
        self.waits += 1;
        if self.waits == self.after {
            self.bus.complete();
        }
    }
}
