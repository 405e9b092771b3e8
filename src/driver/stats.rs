//! Interface statistics
//!
//! Per-frame transfer errors never surface as `Err`; they are classified
//! from the descriptor status word into these counters.

use crate::internal::dma::descriptor::bits::{rx, tx};

/// Netdev-style interface counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Statistics {
    /// Frames received without error, including ones later dropped for
    /// lack of a buffer
    pub rx_packets: u64,
    /// Frames the controller reported sent without error
    pub tx_packets: u64,
    /// Received bytes, FCS included
    pub rx_bytes: u64,
    /// Bytes accepted for transmission
    pub tx_bytes: u64,
    /// Receive frames discarded because of an error
    pub rx_errors: u64,
    /// Transmit frames that failed or were lost in a restart
    pub tx_errors: u64,
    /// Good frames dropped for lack of a buffer
    pub rx_dropped: u64,
    /// Frames that needed at least one deferral
    pub collisions: u64,
    /// Frame too long or too short
    pub rx_length_errors: u64,
    /// Non-octet aligned frame or late collision
    pub rx_frame_errors: u64,
    /// Bad FCS
    pub rx_crc_errors: u64,
    /// Receive FIFO overrun
    pub rx_fifo_errors: u64,
    /// Frame spread over more than one descriptor
    pub rx_fragmented: u64,
    /// Retransmit limit reached
    pub tx_aborted_errors: u64,
    /// Carrier sense lost
    pub tx_carrier_errors: u64,
    /// Transmit underrun
    pub tx_fifo_errors: u64,
    /// Heartbeat missing
    pub tx_heartbeat_errors: u64,
    /// Late collision
    pub tx_window_errors: u64,
}

impl Statistics {
    /// Zeroed counters
    pub const fn new() -> Self {
        Self {
            rx_packets: 0,
            tx_packets: 0,
            rx_bytes: 0,
            tx_bytes: 0,
            rx_errors: 0,
            tx_errors: 0,
            rx_dropped: 0,
            collisions: 0,
            rx_length_errors: 0,
            rx_frame_errors: 0,
            rx_crc_errors: 0,
            rx_fifo_errors: 0,
            rx_fragmented: 0,
            tx_aborted_errors: 0,
            tx_carrier_errors: 0,
            tx_fifo_errors: 0,
            tx_heartbeat_errors: 0,
            tx_window_errors: 0,
        }
    }

    /// Account one completed transmit descriptor.
    ///
    /// Returns `true` when the frame went out without error.
    pub fn record_tx_completion(&mut self, status: u16) -> bool {
        let errors = status & tx::ERRORS;
        if errors != 0 {
            self.tx_errors += 1;
            if errors & tx::HB != 0 {
                self.tx_heartbeat_errors += 1;
            }
            if errors & tx::LC != 0 {
                self.tx_window_errors += 1;
            }
            if errors & tx::RL != 0 {
                self.tx_aborted_errors += 1;
            }
            if errors & tx::UN != 0 {
                self.tx_fifo_errors += 1;
            }
            if errors & tx::CSL != 0 {
                self.tx_carrier_errors += 1;
            }
        } else {
            self.tx_packets += 1;
        }

        if status & tx::DEF != 0 {
            self.collisions += 1;
        }
        errors == 0
    }

    /// Account the error bits of one received descriptor.
    ///
    /// Returns `true` when the frame must be discarded.
    pub fn record_rx_errors(&mut self, status: u16) -> bool {
        let errors = status & (rx::ERRORS | rx::CL);
        if errors == 0 {
            return false;
        }

        self.rx_errors += 1;
        if errors & (rx::LG | rx::SH) != 0 {
            self.rx_length_errors += 1;
        }
        if errors & (rx::NO | rx::CL) != 0 {
            self.rx_frame_errors += 1;
        }
        if errors & rx::CR != 0 {
            self.rx_crc_errors += 1;
        }
        if errors & rx::OV != 0 {
            self.rx_fifo_errors += 1;
        }
        true
    }

    /// Sum of receive and transmit errors
    #[inline]
    pub const fn total_errors(&self) -> u64 {
        self.rx_errors + self.tx_errors
    }
}
