//! Station address and receive filtering for the FEC.
//!
//! The controller accepts frames addressed to its station address, to
//! broadcast, and to group addresses whose hash bit is set in the 64-bit
//! group hash table. The hash index is the top six bits of the CRC-32 of the
//! destination address. Collisions are possible; the stack filters the rest.
//!
//! A restart clears both hash tables, so the stack must re-apply its
//! multicast filter after a link change. Promiscuous mode survives restarts.

use super::config::is_valid_unicast;
use super::error::{ConfigError, ConfigResult};
use super::fec::Fec;
use crate::hal::bounce::BouncePolicy;
use crate::hal::buffer::{BufferPool, TxFrame};
use crate::internal::logging::fec_debug;
use crate::internal::register::RegisterIo;
use crate::internal::register::fec::R_CNTRL_PROM;

/// Number of CRC bits used as the hash index
const HASH_BITS: u32 = 6;

/// Receive filter applied by [`Fec::set_rx_filter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxFilter<'a> {
    /// Accept every frame
    Promiscuous,
    /// Accept every group-addressed frame
    AllMulticast,
    /// Accept the listed group addresses (hash-filtered); an empty list
    /// accepts no multicast
    Multicast(&'a [[u8; 6]]),
}

/// Group hash table index (0-63) for a destination address
pub fn multicast_hash_index(addr: &[u8; 6]) -> u8 {
    const CRC32_POLY: u32 = 0xEDB8_8320;
    let mut crc: u32 = 0xFFFF_FFFF;

    for byte in addr {
        let mut data = *byte;
        for _ in 0..8 {
            if ((crc ^ data as u32) & 1) != 0 {
                crc = (crc >> 1) ^ CRC32_POLY;
            } else {
                crc >>= 1;
            }
            data >>= 1;
        }
    }
    ((crc >> (32 - HASH_BITS)) & 0x3F) as u8
}

impl<'bus, R, P, B, F, const RX: usize, const TX: usize> Fec<'bus, R, P, B, F, RX, TX>
where
    R: RegisterIo,
    P: BufferPool,
    B: BouncePolicy,
    F: TxFrame,
{
    /// Program the receive filter.
    ///
    /// # Example
    /// ```ignore
    /// // Subscribe to the all-hosts group 224.0.0.1
    /// fec.set_rx_filter(RxFilter::Multicast(&[[0x01, 0x00, 0x5e, 0x00, 0x00, 0x01]]));
    /// ```
    pub fn set_rx_filter(&mut self, filter: RxFilter<'_>) {
        if filter == RxFilter::Promiscuous {
            self.config.promiscuous = true;
            self.regs.update_r_cntrl(R_CNTRL_PROM, 0);
            return;
        }

        self.config.promiscuous = false;
        self.regs.update_r_cntrl(0, R_CNTRL_PROM);

        match filter {
            RxFilter::AllMulticast => {
                self.regs.set_grp_hash_high(0xFFFF_FFFF);
                self.regs.set_grp_hash_low(0xFFFF_FFFF);
            }
            RxFilter::Multicast(addrs) => {
                self.regs.set_grp_hash_high(0);
                self.regs.set_grp_hash_low(0);
                // Only group addresses are hashed
                for addr in addrs.iter().filter(|a| a[0] & 0x01 != 0) {
                    self.regs.set_group_hash_bit(multicast_hash_index(addr));
                }
            }
            RxFilter::Promiscuous => {}
        }
    }

    /// Current group hash table (high word in the upper 32 bits)
    pub fn group_hash(&self) -> u64 {
        (u64::from(self.regs.grp_hash_high()) << 32) | u64::from(self.regs.grp_hash_low())
    }

    /// Change the station address.
    ///
    /// Takes effect immediately and is reprogrammed at every restart.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidMacAddress`] for a multicast or all-zero address.
    pub fn set_mac_address(&mut self, addr: [u8; 6]) -> ConfigResult<()> {
        if !is_valid_unicast(&addr) {
            return Err(ConfigError::InvalidMacAddress);
        }
        self.mac_address = addr;
        self.regs.set_station_address(&addr);
        fec_debug!("fec: station address changed");
        Ok(())
    }

    /// Read the station address currently held by the controller
    pub fn read_hw_mac_address(&self) -> [u8; 6] {
        self.regs.station_address()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
