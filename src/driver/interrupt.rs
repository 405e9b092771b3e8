//! Interrupt handling for the FEC.
//!
//! [`InterruptStatus`] decodes the event register; [`Fec::handle_interrupt`]
//! is the dispatcher called from the platform's interrupt handler.

use super::fec::{Fec, NetStack};
use crate::hal::bounce::BouncePolicy;
use crate::hal::buffer::{BufferPool, TxFrame};
use crate::internal::logging::{fec_error, fec_warn};
use crate::internal::register::RegisterIo;
use crate::internal::register::fec::{
    EVENT_BABR, EVENT_BABT, EVENT_EBERR, EVENT_GRA, EVENT_HBERR, EVENT_MII, EVENT_RXB, EVENT_RXF,
    EVENT_TS_AVAIL, EVENT_TS_TIMER, EVENT_TXB, EVENT_TXF,
};

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt events parsed from the `IEVENT` register.
///
/// # Example
///
/// ```ignore
/// let status = fec.handle_interrupt(&mut stack);
/// if status.has_error() {
///     // bus error or babbling
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// Heartbeat error
    pub heartbeat_error: bool,
    /// Babbling receiver
    pub babbling_rx: bool,
    /// Babbling transmitter
    pub babbling_tx: bool,
    /// Graceful stop complete
    pub graceful_stop: bool,
    /// Full frame transmitted
    pub tx_frame: bool,
    /// Transmit buffer done
    pub tx_buffer: bool,
    /// Full frame received
    pub rx_frame: bool,
    /// Receive buffer done
    pub rx_buffer: bool,
    /// MII management frame complete
    pub mii: bool,
    /// Ethernet bus error
    pub bus_error: bool,
    /// Timestamp available
    pub ts_avail: bool,
    /// Timestamp timer wrapped
    pub ts_timer: bool,
}

impl InterruptStatus {
    /// Create from a raw `IEVENT` value
    #[inline]
    pub fn from_raw(events: u32) -> Self {
        Self {
            heartbeat_error: (events & EVENT_HBERR) != 0,
            babbling_rx: (events & EVENT_BABR) != 0,
            babbling_tx: (events & EVENT_BABT) != 0,
            graceful_stop: (events & EVENT_GRA) != 0,
            tx_frame: (events & EVENT_TXF) != 0,
            tx_buffer: (events & EVENT_TXB) != 0,
            rx_frame: (events & EVENT_RXF) != 0,
            rx_buffer: (events & EVENT_RXB) != 0,
            mii: (events & EVENT_MII) != 0,
            bus_error: (events & EVENT_EBERR) != 0,
            ts_avail: (events & EVENT_TS_AVAIL) != 0,
            ts_timer: (events & EVENT_TS_TIMER) != 0,
        }
    }

    /// Convert back to a raw value (write 1 to clear)
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let bits = [
            (self.heartbeat_error, EVENT_HBERR),
            (self.babbling_rx, EVENT_BABR),
            (self.babbling_tx, EVENT_BABT),
            (self.graceful_stop, EVENT_GRA),
            (self.tx_frame, EVENT_TXF),
            (self.tx_buffer, EVENT_TXB),
            (self.rx_frame, EVENT_RXF),
            (self.rx_buffer, EVENT_RXB),
            (self.mii, EVENT_MII),
            (self.bus_error, EVENT_EBERR),
            (self.ts_avail, EVENT_TS_AVAIL),
            (self.ts_timer, EVENT_TS_TIMER),
        ];
        bits.iter()
            .filter(|(set, _)| *set)
            .fold(0, |acc, (_, bit)| acc | bit)
    }

    /// Check if any event occurred
    #[inline]
    pub fn any(&self) -> bool {
        self.to_raw() != 0
    }

    /// Check if any error occurred
    #[inline]
    pub fn has_error(&self) -> bool {
        self.bus_error || self.babbling_rx || self.babbling_tx || self.heartbeat_error
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

impl<'bus, R, P, B, F, const RX: usize, const TX: usize> Fec<'bus, R, P, B, F, RX, TX>
where
    R: RegisterIo,
    P: BufferPool,
    B: BouncePolicy,
    F: TxFrame,
{
    /// Service the controller's interrupt.
    ///
    /// Reads and acknowledges `IEVENT` until it reads zero. Receive events
    /// drain the RX ring into `stack`, transmit events reclaim completed
    /// slots, and the `MII` event completes the pending management
    /// transaction on the attached bus. Returns every event seen.
    pub fn handle_interrupt<S: NetStack<P::Buffer>>(&mut self, stack: &mut S) -> InterruptStatus {
        let mut seen = 0;
        loop {
            let events = self.regs.ievent();
            if events == 0 {
                break;
            }
            self.regs.clear_events(events);
            seen |= events;

            if events & EVENT_RXF != 0 {
                self.drain_rx(stack);
            }
            if events & EVENT_TXF != 0 {
                self.reclaim_tx(stack);
            }
            if events & EVENT_MII != 0 {
                if let Some(bus) = &self.mii {
                    bus.complete();
                }
            }
            if events & EVENT_EBERR != 0 {
                fec_error!("fec: bus error, events {}", events);
            }
            if events & (EVENT_BABR | EVENT_BABT) != 0 {
                fec_warn!("fec: babbling, events {}", events);
            }
        }
        InterruptStatus::from_raw(seen)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
