//! Link state, restart and stop
//!
//! The controller is fully reprogrammed whenever the link comes up or its
//! duplex changes; [`Fec::restart`] is the single bring-up sequence used at
//! open, on link changes and after a transmit timeout.

use embedded_hal::delay::DelayNs;

use super::config::{Duplex, PhyInterface};
use super::fec::{Fec, NetStack};
use crate::hal::bounce::BouncePolicy;
use crate::hal::buffer::{BufferPool, TxFrame};
use crate::hal::reset::ResetController;
use crate::internal::logging::{fec_debug, fec_info, fec_warn};
use crate::internal::register::RegisterIo;
use crate::internal::register::fec::{
    ECNTRL_ETHER_EN, EVENT_ALL, EVENT_MII, R_CNTRL_DRT, R_CNTRL_MAX_FL_SHIFT, R_CNTRL_MII_MODE,
    R_CNTRL_PROM, R_CNTRL_RMII_MODE, X_CNTRL_FDEN,
};

/// Link state as reported by the PHY layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No link
    #[default]
    Down,
    /// Link up, half duplex
    UpHalfDuplex,
    /// Link up, full duplex
    UpFullDuplex,
}

impl LinkState {
    /// Combine the PHY's link and duplex report
    pub const fn from_phy(link_up: bool, duplex: Duplex) -> Self {
        match (link_up, duplex) {
            (false, _) => Self::Down,
            (true, Duplex::Half) => Self::UpHalfDuplex,
            (true, Duplex::Full) => Self::UpFullDuplex,
        }
    }

    /// Check if the link is up
    #[inline(always)]
    pub const fn is_up(self) -> bool {
        !matches!(self, Self::Down)
    }

    /// Negotiated duplex, if the link is up
    pub const fn duplex(self) -> Option<Duplex> {
        match self {
            Self::Down => None,
            Self::UpHalfDuplex => Some(Duplex::Half),
            Self::UpFullDuplex => Some(Duplex::Full),
        }
    }
}

impl<'bus, R, P, B, F, const RX: usize, const TX: usize> Fec<'bus, R, P, B, F, RX, TX>
where
    R: RegisterIo,
    P: BufferPool,
    B: BouncePolicy,
    F: TxFrame,
{
    /// Apply a link report from the PHY layer.
    ///
    /// | from | to | action |
    /// |------|----|--------|
    /// | any | same state | nothing |
    /// | up | down | graceful stop, queue stopped |
    /// | down | up | restart with the new duplex, queue woken |
    /// | up | up, other duplex | restart with the new duplex |
    ///
    /// While the device is closed the state is only recorded; the next
    /// [`open`](Self::open) programs the recorded duplex.
    pub fn on_link_event<D, S>(
        &mut self,
        link_up: bool,
        duplex: Duplex,
        delay: &mut D,
        stack: &mut S,
    ) -> LinkState
    where
        D: DelayNs,
        S: NetStack<P::Buffer>,
    {
        let next = LinkState::from_phy(link_up, duplex);
        if next == self.link {
            return self.link;
        }

        if !self.opened {
            self.link = next;
            if let Some(duplex) = next.duplex() {
                self.duplex = duplex;
            }
            return next;
        }

        match next.duplex() {
            None => {
                fec_info!("fec: link down");
                self.stop_queue(stack);
                self.stop(delay);
            }
            Some(duplex) => {
                fec_info!("fec: link up, full duplex {}", duplex == Duplex::Full);
                self.restart(duplex, delay);
                self.link = next;
                self.wake_queue(stack);
            }
        }
        stack.link_changed(next);
        next
    }

    /// Reprogram the controller from scratch.
    ///
    /// Resets the controller, reloads the station address and both rings,
    /// re-arms every receive slot, drops every frame still in the transmit
    /// ring (counted in `tx_errors`), applies `duplex` and enables
    /// reception. Never fails: a reset that does not complete is logged and
    /// the sequence carries on.
    pub fn restart<D: DelayNs>(&mut self, duplex: Duplex, delay: &mut D) {
        {
            let mut reset = ResetController::new(&self.regs, delay);
            if reset.soft_reset().is_err() {
                fec_warn!("fec: soft reset did not complete");
            }
        }

        self.regs.set_station_address(&self.mac_address);
        self.regs.clear_events(EVENT_ALL);
        self.regs.clear_hash_tables();
        self.regs.set_r_buff_size(self.config.rx_buffer_size as u32);
        self.regs.set_r_des_start(self.rx_ring.base_addr_u32());
        self.regs.set_x_des_start(self.tx_ring.base_addr_u32());

        self.rx_ring.reset();
        self.tx_ring.reset();
        for (slot, desc) in self.rx_ring.iter() {
            if self.rx_buffers[slot].is_some() {
                desc.arm_rx(desc.addr());
            }
        }
        let lost = self.release_tx_frames();
        if lost > 0 {
            fec_debug!("fec: restart dropped {} queued frames", lost);
        }

        let mut r_cntrl = (self.config.max_frame_len as u32) << R_CNTRL_MAX_FL_SHIFT
            | R_CNTRL_MII_MODE;
        let mut x_cntrl = 0;
        match duplex {
            Duplex::Full => x_cntrl |= X_CNTRL_FDEN,
            Duplex::Half => r_cntrl |= R_CNTRL_DRT,
        }
        if self.config.phy_interface == PhyInterface::Rmii {
            r_cntrl |= R_CNTRL_RMII_MODE;
        }
        if self.config.promiscuous {
            r_cntrl |= R_CNTRL_PROM;
        }
        self.regs.set_r_cntrl(r_cntrl);
        self.regs.set_x_cntrl(x_cntrl);
        self.regs.set_mii_speed(self.config.mii_speed);

        self.regs.set_ecntrl(ECNTRL_ETHER_EN);
        self.regs.rx_doorbell();
        self.regs.set_imask(self.config.interrupt_mask);

        self.duplex = duplex;
    }

    /// Stop the controller.
    ///
    /// Lets the transmitter drain gracefully when the link is up, resets the
    /// controller and keeps the management interface usable. Frames still in
    /// the transmit ring stay retained until the next restart or close.
    pub fn stop<D: DelayNs>(&mut self, delay: &mut D) {
        {
            let mut reset = ResetController::new(&self.regs, delay);
            if self.link.is_up() && reset.graceful_stop().is_err() {
                fec_warn!("fec: graceful transmit stop did not complete");
            }
            if reset.soft_reset().is_err() {
                fec_warn!("fec: soft reset did not complete");
            }
        }

        if self.config.keep_mii_alive {
            self.regs.set_ecntrl(ECNTRL_ETHER_EN);
            if self.config.phy_interface == PhyInterface::Rmii {
                self.regs.update_r_cntrl(R_CNTRL_RMII_MODE, 0);
            }
        }
        self.regs.clear_events(EVENT_MII);
        self.regs.set_mii_speed(self.config.mii_speed);
        self.regs.set_imask(self.config.interrupt_mask);

        self.queue_stopped = true;
        self.link = LinkState::Down;
    }

    /// Transmit watchdog: the queue made no progress for too long.
    ///
    /// Counts one transmit error, restarts with the current duplex and
    /// wakes the queue.
    pub fn tx_timeout<D, S>(&mut self, delay: &mut D, stack: &mut S)
    where
        D: DelayNs,
        S: NetStack<P::Buffer>,
    {
        fec_warn!("fec: transmit timed out, {} in flight", self.tx_ring.occupancy());
        self.stats.tx_errors += 1;
        self.restart(self.duplex, delay);
        if self.opened && self.link.is_up() {
            self.wake_queue(stack);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
