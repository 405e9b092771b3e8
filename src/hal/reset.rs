//! Reset Controller HAL
//!
//! Soft reset and graceful transmit stop, each a register write followed by
//! a bounded poll for the controller's acknowledgement.

use embedded_hal::delay::DelayNs;

use crate::driver::error::{IoError, IoResult};
use crate::internal::constants::{
    GRACEFUL_STOP_TIMEOUT_US, RESET_POLL_INTERVAL_US, SOFT_RESET_TIMEOUT_US,
};
use crate::internal::register::RegisterIo;
use crate::internal::register::fec::{ECNTRL_RESET, EVENT_GRA, FecRegs, X_CNTRL_GTS};

// =============================================================================
// Reset Controller
// =============================================================================

/// Reset controller for one FEC instance
#[derive(Debug)]
pub struct ResetController<'a, R, D: DelayNs> {
    regs: &'a FecRegs<R>,
    delay: &'a mut D,
    reset_timeout_us: u32,
    stop_timeout_us: u32,
}

impl<'a, R: RegisterIo, D: DelayNs> ResetController<'a, R, D> {
    /// Create a reset controller with the default timeouts
    pub fn new(regs: &'a FecRegs<R>, delay: &'a mut D) -> Self {
        Self {
            regs,
            delay,
            reset_timeout_us: SOFT_RESET_TIMEOUT_US,
            stop_timeout_us: GRACEFUL_STOP_TIMEOUT_US,
        }
    }

    /// Perform a soft reset.
    ///
    /// Writes `ECNTRL.RESET` (which also clears `ETHER_EN`) and waits for the
    /// bit to self-clear. The controller forgets its station address and
    /// ring pointers.
    pub fn soft_reset(&mut self) -> IoResult<()> {
        self.regs.set_ecntrl(ECNTRL_RESET);
        let regs = self.regs;
        self.poll(self.reset_timeout_us, || regs.ecntrl() & ECNTRL_RESET == 0)
    }

    /// Request a graceful transmit stop and wait for `GRA`.
    ///
    /// Frames already in the transmit FIFO finish; nothing new is started.
    pub fn graceful_stop(&mut self) -> IoResult<()> {
        self.regs.set_x_cntrl(X_CNTRL_GTS);
        let regs = self.regs;
        self.poll(self.stop_timeout_us, || regs.ievent() & EVENT_GRA != 0)
    }

    /// Check if a reset is currently in progress
    pub fn is_reset_in_progress(&self) -> bool {
        self.regs.ecntrl() & ECNTRL_RESET != 0
    }

    fn poll<F: FnMut() -> bool>(&mut self, timeout_us: u32, mut done: F) -> IoResult<()> {
        let max_iterations = timeout_us / RESET_POLL_INTERVAL_US;
        for _ in 0..=max_iterations {
            if done() {
                return Ok(());
            }
            self.delay.delay_us(RESET_POLL_INTERVAL_US);
        }
        Err(IoError::Timeout)
    }
}
