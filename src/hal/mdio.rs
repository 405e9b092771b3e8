//! MDIO (Management Data Input/Output) HAL
//!
//! PHY register access over the controller's MII management interface. A
//! transaction writes one management frame to `MII_DATA`; the controller
//! raises the `MII` event when the frame has been shifted out, and the
//! interrupt dispatcher forwards that event to [`MiiBus::complete`]. The
//! caller waits for it with a bounded poll.
//!
//! The bus is not protected by the device lock. Several controller instances
//! may share one bus (only the first instance's pins are wired to the PHYs);
//! each attaches with [`MiiBus::attach`] and holds the returned
//! [`MiiBusRef`] for as long as it uses the bus.

use core::ops::Deref;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use embedded_hal::delay::DelayNs;

use crate::driver::error::{ConfigError, IoError, Result};
use crate::internal::constants::{MDC_MAX_FREQ_HZ, MII_POLL_INTERVAL_US, MII_TIMEOUT_US};
use crate::internal::logging::fec_warn;
use crate::internal::register::RegisterIo;
use crate::internal::register::fec::{
    FecRegs, MMFR_DATA_MASK, MMFR_OP_READ, MMFR_OP_WRITE, MMFR_ST, MMFR_TA, mmfr_pa, mmfr_ra,
};

// =============================================================================
// MDIO Constants
// =============================================================================

/// Maximum valid PHY address (5-bit field)
pub const MAX_PHY_ADDR: u8 = 31;

/// Maximum valid register address (5-bit field)
pub const MAX_REG_ADDR: u8 = 31;

/// `MII_SPEED` value for a given module clock.
///
/// The MDC clock is `clk / (2 * MII_SPEED[6:1])` and must stay at or below
/// 2.5 MHz.
pub const fn mii_speed_for_clock(clk_hz: u32) -> u32 {
    clk_hz.div_ceil(MDC_MAX_FREQ_HZ * 2) << 1
}

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// This trait can be implemented by different backends, allowing
/// PHY drivers to work with various MDIO implementations.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;

    /// Check if the MDIO bus is busy
    fn is_busy(&self) -> bool;
}

// =============================================================================
// MII Bus
// =============================================================================

/// Shared MII management bus.
///
/// Transactions are serialized with an internal busy flag; a second caller
/// gets [`IoError::Busy`] instead of corrupting the frame in flight.
pub struct MiiBus<R> {
    regs: FecRegs<R>,
    done: AtomicBool,
    busy: AtomicBool,
    timed_out: AtomicBool,
    users: AtomicUsize,
    timeout_us: u32,
}

impl<R: RegisterIo> MiiBus<R> {
    /// Create a bus driven through `regs` with the default 1 ms timeout
    pub const fn new(regs: R) -> Self {
        Self::with_timeout_us(regs, MII_TIMEOUT_US)
    }

    /// Create a bus with a custom transaction timeout
    pub const fn with_timeout_us(regs: R, timeout_us: u32) -> Self {
        Self {
            regs: FecRegs::new(regs),
            done: AtomicBool::new(false),
            busy: AtomicBool::new(false),
            timed_out: AtomicBool::new(false),
            users: AtomicUsize::new(0),
            timeout_us,
        }
    }

    /// Register a device as a user of this bus
    pub fn attach(&self) -> MiiBusRef<'_, R> {
        self.users.fetch_add(1, Ordering::AcqRel);
        MiiBusRef { bus: self }
    }

    /// Number of live [`MiiBusRef`] handles
    pub fn users(&self) -> usize {
        self.users.load(Ordering::Acquire)
    }

    /// Program the management clock divisor
    pub fn set_mii_speed(&self, speed: u32) {
        self.regs.set_mii_speed(speed);
    }

    /// Signal that the controller finished the current management frame.
    ///
    /// Called by the interrupt dispatcher on the `MII` event.
    pub fn complete(&self) {
        self.done.store(true, Ordering::Release);
    }

    /// Check if a transaction is in progress
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Check if the most recent transaction timed out
    pub fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::Acquire)
    }

    /// Read a PHY register
    pub fn read<D: DelayNs>(&self, phy_addr: u8, reg_addr: u8, delay: &mut D) -> Result<u16> {
        let frame = MMFR_ST | MMFR_OP_READ | mmfr_pa(phy_addr) | mmfr_ra(reg_addr) | MMFR_TA;
        let value = self.transfer(phy_addr, reg_addr, frame, delay)?;
        Ok((value & MMFR_DATA_MASK) as u16)
    }

    /// Write a PHY register
    pub fn write<D: DelayNs>(
        &self,
        phy_addr: u8,
        reg_addr: u8,
        value: u16,
        delay: &mut D,
    ) -> Result<()> {
        let frame = MMFR_ST
            | MMFR_OP_WRITE
            | mmfr_pa(phy_addr)
            | mmfr_ra(reg_addr)
            | MMFR_TA
            | u32::from(value);
        self.transfer(phy_addr, reg_addr, frame, delay).map(|_| ())
    }

    fn transfer<D: DelayNs>(
        &self,
        phy_addr: u8,
        reg_addr: u8,
        frame: u32,
        delay: &mut D,
    ) -> Result<u32> {
        if phy_addr > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress.into());
        }
        if reg_addr > MAX_REG_ADDR {
            return Err(ConfigError::InvalidConfig.into());
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(IoError::Busy.into());
        }

        self.done.store(false, Ordering::Release);
        self.regs.set_mii_data(frame);
        let result = self.wait_done(delay).map(|()| self.regs.mii_data());

        self.timed_out.store(result.is_err(), Ordering::Release);
        self.busy.store(false, Ordering::Release);
        if result.is_err() {
            fec_warn!("MDIO timeout: phy {} reg {}", phy_addr, reg_addr);
        }
        result
    }

    /// Wait for the completion signal, bounded by `timeout_us`
    fn wait_done<D: DelayNs>(&self, delay: &mut D) -> Result<()> {
        let mut elapsed = 0u32;
        loop {
            if self.done.swap(false, Ordering::AcqRel) {
                return Ok(());
            }
            if elapsed >= self.timeout_us {
                return Err(IoError::Timeout.into());
            }
            delay.delay_us(MII_POLL_INTERVAL_US);
            elapsed += MII_POLL_INTERVAL_US;
        }
    }
}

/// Counted handle to a shared [`MiiBus`].
///
/// Dropping the handle releases the device's reference.
pub struct MiiBusRef<'a, R> {
    bus: &'a MiiBus<R>,
}

impl<'a, R> MiiBusRef<'a, R> {
    /// The shared bus
    pub fn bus(&self) -> &'a MiiBus<R> {
        self.bus
    }
}

impl<R> Deref for MiiBusRef<'_, R> {
    type Target = MiiBus<R>;

    fn deref(&self) -> &MiiBus<R> {
        self.bus
    }
}

impl<R> Clone for MiiBusRef<'_, R> {
    fn clone(&self) -> Self {
        self.bus.users.fetch_add(1, Ordering::AcqRel);
        Self { bus: self.bus }
    }
}

impl<R> Drop for MiiBusRef<'_, R> {
    fn drop(&mut self) {
        self.bus.users.fetch_sub(1, Ordering::AcqRel);
    }
}

// =============================================================================
// MDIO Controller
// =============================================================================

/// [`MdioBus`] implementation over a shared [`MiiBus`] and a delay provider
#[derive(Debug)]
pub struct MdioController<'a, R, D: DelayNs> {
    bus: &'a MiiBus<R>,
    delay: D,
}

impl<'a, R: RegisterIo, D: DelayNs> MdioController<'a, R, D> {
    /// Create a controller over `bus`
    pub fn new(bus: &'a MiiBus<R>, delay: D) -> Self {
        Self { bus, delay }
    }

    /// Give back the delay provider
    pub fn release(self) -> D {
        self.delay
    }
}

impl<R: RegisterIo, D: DelayNs> MdioBus for MdioController<'_, R, D> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        self.bus.read(phy_addr, reg_addr, &mut self.delay)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        self.bus.write(phy_addr, reg_addr, value, &mut self.delay)
    }

    fn is_busy(&self) -> bool {
        self.bus.is_busy()
    }
}

impl<R> core::fmt::Debug for MiiBus<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MiiBus")
            .field("busy", &self.busy.load(Ordering::Relaxed))
            .field("users", &self.users.load(Ordering::Relaxed))
            .field("timeout_us", &self.timeout_us)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
