//! FEC device
//!
//! [`Fec`] ties together the register block, the two descriptor rings, the
//! buffer pool and the bounce policy. Its behaviour is split across modules
//! the same way the hardware paths are:
//!
//! - lifecycle and accessors (here)
//! - [`tx`](super::tx): submission and completion
//! - [`rx`](super::rx): receive drain
//! - [`link`](super::link): restart, stop and link transitions
//! - [`interrupt`](super::interrupt): event dispatch
//! - [`filtering`](super::filtering): station address and receive filters

use embedded_hal::delay::DelayNs;

use super::config::{Duplex, FecConfig};
use super::error::{ConfigError, DmaError, DmaResult, IoError, Result};
use super::link::LinkState;
use super::stats::Statistics;
use crate::hal::bounce::{BounceBuffers, BouncePolicy};
use crate::hal::buffer::{BufferPool, DmaDirection, TxFrame};
use crate::hal::mdio::{MiiBus, MiiBusRef};
use crate::internal::constants::{
    DEFAULT_RX_RING_SIZE, DEFAULT_TX_RING_SIZE, RX_FRAME_SIZE, TX_FRAME_SIZE,
};
use crate::internal::dma::DescriptorRing;
use crate::internal::logging::{fec_debug, fec_info};
use crate::internal::register::RegisterIo;
use crate::internal::register::fec::FecRegs;

// =============================================================================
// Upward Interface
// =============================================================================

/// Network stack the driver hands received frames and queue state to
pub trait NetStack<B> {
    /// Accept one received frame (FCS removed), in device order
    fn deliver(&mut self, frame: B);

    /// The link changed state
    fn link_changed(&mut self, state: LinkState) {
        let _ = state;
    }

    /// The transmit queue can accept frames again
    fn wake_queue(&mut self) {}

    /// The transmit queue stopped accepting frames
    fn stop_queue(&mut self) {}
}

// =============================================================================
// Device
// =============================================================================

/// One FEC controller instance.
///
/// `RX` and `TX` are the descriptor ring sizes (powers of two).
///
/// The rings live inside this struct and their bus addresses are programmed
/// into the controller by [`open`](Self::open); the value must not move
/// while the device is open. Place it in a `static` (see
/// [`SharedFec`](crate::sync::SharedFec)) or pin it in place.
pub struct Fec<
    'bus,
    R,
    P: BufferPool,
    B,
    F,
    const RX: usize = DEFAULT_RX_RING_SIZE,
    const TX: usize = DEFAULT_TX_RING_SIZE,
> {
    pub(crate) regs: FecRegs<R>,
    pub(crate) pool: P,
    pub(crate) bounce: B,
    pub(crate) config: FecConfig,
    pub(crate) mii: Option<MiiBusRef<'bus, R>>,
    pub(crate) rx_ring: DescriptorRing<RX>,
    pub(crate) tx_ring: DescriptorRing<TX>,
    pub(crate) rx_buffers: [Option<P::Buffer>; RX],
    pub(crate) tx_bounce: BounceBuffers<P::Buffer, TX>,
    pub(crate) tx_frames: [Option<F>; TX],
    pub(crate) mac_address: [u8; 6],
    pub(crate) link: LinkState,
    pub(crate) duplex: Duplex,
    pub(crate) opened: bool,
    pub(crate) queue_stopped: bool,
    pub(crate) stats: Statistics,
}

impl<'bus, R, P, B, F, const RX: usize, const TX: usize> Fec<'bus, R, P, B, F, RX, TX>
where
    R: RegisterIo,
    P: BufferPool,
    B: BouncePolicy,
    F: TxFrame,
{
    /// Create a closed device.
    ///
    /// This is a const function suitable for static initialization. Nothing
    /// touches the hardware until [`open`](Self::open).
    pub const fn new(regs: R, pool: P, bounce: B, config: FecConfig) -> Self {
        let mac_address = config.mac_address;
        Self {
            regs: FecRegs::new(regs),
            pool,
            bounce,
            config,
            mii: None,
            rx_ring: DescriptorRing::new(),
            tx_ring: DescriptorRing::new(),
            rx_buffers: [const { None }; RX],
            tx_bounce: BounceBuffers::new(),
            tx_frames: [const { None }; TX],
            mac_address,
            link: LinkState::Down,
            duplex: Duplex::Half,
            opened: false,
            queue_stopped: true,
            stats: Statistics::new(),
        }
    }

    /// Attach the shared management bus whose completion this device's
    /// `MII` event signals
    pub fn attach_mii(&mut self, bus: MiiBusRef<'bus, R>) {
        self.mii = Some(bus);
    }

    /// Detach the management bus, dropping this device's reference
    pub fn detach_mii(&mut self) -> Option<MiiBusRef<'bus, R>> {
        self.mii.take()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bring the device up.
    ///
    /// Allocates one receive buffer per RX slot and one bounce buffer per TX
    /// slot, then programs the controller through
    /// [`restart`](Self::restart). Transmission stays blocked until the link
    /// is reported up.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::AlreadyOpen`] if the device is open
    /// - Any [`FecConfig::validate`] error
    /// - [`DmaError::OutOfBuffers`] if the pool runs dry; everything taken
    ///   so far is returned
    pub fn open<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        if self.opened {
            return Err(ConfigError::AlreadyOpen.into());
        }
        self.config.validate()?;

        if let Err(err) = self.alloc_buffers() {
            self.free_buffers();
            return Err(err.into());
        }

        self.restart(self.duplex, delay);
        self.opened = true;
        self.queue_stopped = !self.link.is_up();
        fec_info!("fec: opened, {} rx / {} tx slots", RX, TX);
        Ok(())
    }

    /// Take the device down.
    ///
    /// Stops the controller, drops every frame still in the transmit ring
    /// (counted in `tx_errors`) and returns all buffers to the pool.
    ///
    /// # Errors
    ///
    /// [`IoError::InvalidState`] if the device is not open.
    pub fn close<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        if !self.opened {
            return Err(IoError::InvalidState.into());
        }
        self.stop(delay);
        let lost = self.release_tx_frames();
        self.free_buffers();
        self.opened = false;
        fec_info!("fec: closed, {} frames dropped", lost);
        Ok(())
    }

    fn alloc_buffers(&mut self) -> DmaResult<()> {
        for slot in 0..RX {
            if self.rx_buffers[slot].is_some() {
                continue;
            }
            let buf = self.pool.alloc(RX_FRAME_SIZE).ok_or(DmaError::OutOfBuffers)?;
            let addr = self.pool.map(buf.as_ref(), DmaDirection::FromDevice);
            self.rx_ring.descriptor(slot).set_addr(addr);
            self.rx_buffers[slot] = Some(buf);
        }

        if !self.tx_bounce.fill(&mut self.pool, TX_FRAME_SIZE) {
            return Err(DmaError::OutOfBuffers);
        }
        fec_debug!("fec: ring buffers allocated");
        Ok(())
    }

    fn free_buffers(&mut self) {
        for slot in 0..RX {
            let desc = self.rx_ring.descriptor(slot);
            if let Some(buf) = self.rx_buffers[slot].take() {
                self.pool
                    .unmap(desc.addr(), buf.as_ref().len(), DmaDirection::FromDevice);
            }
            desc.set_status(0);
            desc.set_addr(0);
        }
        self.tx_bounce.release();
    }

    /// Drop every retained transmit frame and clear the TX descriptors.
    ///
    /// Returns the number of frames dropped; each counts as a transmit error.
    pub(super) fn release_tx_frames(&mut self) -> usize {
        let mut lost = 0;
        for slot in 0..TX {
            let desc = self.tx_ring.descriptor(slot);
            if let Some(frame) = self.tx_frames[slot].take() {
                self.pool.unmap(desc.addr(), desc.len(), DmaDirection::ToDevice);
                drop(frame);
                lost += 1;
            }
            desc.clear_tx();
        }
        self.stats.tx_errors += lost as u64;
        lost
    }

    // =========================================================================
    // Queue State
    // =========================================================================

    pub(super) fn wake_queue<S: NetStack<P::Buffer>>(&mut self, stack: &mut S) {
        if self.queue_stopped {
            self.queue_stopped = false;
            stack.wake_queue();
        }
    }

    pub(super) fn stop_queue<S: NetStack<P::Buffer>>(&mut self, stack: &mut S) {
        if !self.queue_stopped {
            self.queue_stopped = true;
            stack.stop_queue();
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Check if the device is open
    #[inline(always)]
    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// Current link state
    #[inline(always)]
    pub fn link_state(&self) -> LinkState {
        self.link
    }

    /// Duplex programmed at the last restart
    #[inline(always)]
    pub fn duplex(&self) -> Duplex {
        self.duplex
    }

    /// Check if the transmit queue is stopped (link down or ring full)
    #[inline(always)]
    pub fn is_queue_stopped(&self) -> bool {
        self.queue_stopped
    }

    /// Frames submitted and not yet reclaimed
    #[inline(always)]
    pub fn tx_in_flight(&self) -> usize {
        self.tx_ring.occupancy()
    }

    /// Interface counters
    #[inline(always)]
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Active configuration (the filter calls update `promiscuous`)
    #[inline(always)]
    pub fn config(&self) -> &FecConfig {
        &self.config
    }

    /// Station address programmed at the next restart
    #[inline(always)]
    pub fn mac_address(&self) -> &[u8; 6] {
        &self.mac_address
    }

    /// Register block
    #[inline(always)]
    pub fn regs(&self) -> &FecRegs<R> {
        &self.regs
    }

    /// Buffer pool
    #[inline(always)]
    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Attached management bus, if any
    pub fn mii(&self) -> Option<&'bus MiiBus<R>> {
        self.mii.as_ref().map(MiiBusRef::bus)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
