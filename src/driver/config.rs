//! Configuration types for the FEC driver

use super::error::{ConfigError, ConfigResult};
use crate::hal::mdio::mii_speed_for_clock;
use crate::internal::constants::{
    DEFAULT_MAC_ADDR, DEFAULT_MII_SPEED, PKT_MAXBLR_SIZE, PKT_MAXBUF_SIZE, PKT_MINBUF_SIZE,
    RX_FRAME_SIZE,
};
use crate::internal::register::fec::DEFAULT_IMASK;

/// Largest value the `R_CNTRL.MAX_FL` field can hold
const MAX_FL_LIMIT: usize = 0x7ff;

/// Largest divisor the `MII_SPEED` field (bits 6:1) can hold
const MII_SPEED_LIMIT: u32 = 0x7e;

/// Ethernet duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    #[default]
    Half,
    /// Full duplex
    Full,
}

/// PHY interface type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhyInterface {
    /// Media Independent Interface
    #[default]
    Mii,
    /// Reduced Media Independent Interface
    Rmii,
}

/// Complete FEC configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FecConfig {
    /// Station address programmed at every restart
    pub mac_address: [u8; 6],
    /// PHY interface type (MII or RMII)
    pub phy_interface: PhyInterface,
    /// Raw `MII_SPEED` register value
    pub mii_speed: u32,
    /// Interrupt sources enabled in `IMASK`
    pub interrupt_mask: u32,
    /// Longest frame the receiver accepts, FCS included
    pub max_frame_len: usize,
    /// Receive buffer size programmed into `R_BUFF_SIZE`
    pub rx_buffer_size: usize,
    /// Re-enable the controller after a stop so the MII management block
    /// keeps clocking (needed where the PHY is reached through this MAC)
    pub keep_mii_alive: bool,
    /// Receive all frames regardless of destination
    pub promiscuous: bool,
}

impl Default for FecConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FecConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mac_address: DEFAULT_MAC_ADDR,
            phy_interface: PhyInterface::Mii,
            mii_speed: DEFAULT_MII_SPEED,
            interrupt_mask: DEFAULT_IMASK,
            max_frame_len: PKT_MAXBUF_SIZE,
            rx_buffer_size: PKT_MAXBLR_SIZE,
            keep_mii_alive: false,
            promiscuous: false,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the MAC address
    #[must_use]
    pub const fn with_mac_address(mut self, addr: [u8; 6]) -> Self {
        self.mac_address = addr;
        self
    }

    /// Set the PHY interface type
    #[must_use]
    pub const fn with_phy_interface(mut self, interface: PhyInterface) -> Self {
        self.phy_interface = interface;
        self
    }

    /// Set the raw `MII_SPEED` divisor
    #[must_use]
    pub const fn with_mii_speed(mut self, speed: u32) -> Self {
        self.mii_speed = speed;
        self
    }

    /// Derive the `MII_SPEED` divisor from the module clock frequency
    #[must_use]
    pub const fn with_mii_clock_hz(mut self, clk_hz: u32) -> Self {
        self.mii_speed = mii_speed_for_clock(clk_hz);
        self
    }

    /// Set the interrupt mask
    #[must_use]
    pub const fn with_interrupt_mask(mut self, mask: u32) -> Self {
        self.interrupt_mask = mask;
        self
    }

    /// Set the maximum receive frame length
    #[must_use]
    pub const fn with_max_frame_len(mut self, len: usize) -> Self {
        self.max_frame_len = len;
        self
    }

    /// Set the receive buffer size (multiple of 16)
    #[must_use]
    pub const fn with_rx_buffer_size(mut self, size: usize) -> Self {
        self.rx_buffer_size = size;
        self
    }

    /// Keep the MII management block running while stopped
    #[must_use]
    pub const fn with_keep_mii_alive(mut self, enabled: bool) -> Self {
        self.keep_mii_alive = enabled;
        self
    }

    /// Enable or disable promiscuous mode
    #[must_use]
    pub const fn with_promiscuous(mut self, enabled: bool) -> Self {
        self.promiscuous = enabled;
        self
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check the configuration against controller limits.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidMacAddress`] for a multicast or all-zero address
    /// - [`ConfigError::InvalidConfig`] for sizes or divisors the hardware
    ///   cannot represent
    pub fn validate(&self) -> ConfigResult<()> {
        if !is_valid_unicast(&self.mac_address) {
            return Err(ConfigError::InvalidMacAddress);
        }

        let rx_size_ok = self.rx_buffer_size % 16 == 0
            && self.rx_buffer_size >= PKT_MINBUF_SIZE
            && self.rx_buffer_size <= RX_FRAME_SIZE;
        let frame_len_ok = self.max_frame_len >= PKT_MINBUF_SIZE
            && self.max_frame_len <= MAX_FL_LIMIT
            && self.max_frame_len <= self.rx_buffer_size;
        let mii_ok = self.mii_speed != 0 && self.mii_speed <= MII_SPEED_LIMIT;

        if rx_size_ok && frame_len_ok && mii_ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidConfig)
        }
    }
}

/// Check that `addr` is usable as a station address (not multicast, not zero)
pub fn is_valid_unicast(addr: &[u8; 6]) -> bool {
    addr[0] & 0x01 == 0 && addr.iter().any(|&b| b != 0)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_controller_reset_profile() {
        let config = FecConfig::new();
        assert_eq!(config, FecConfig::default());
        assert_eq!(config.mac_address, DEFAULT_MAC_ADDR);
        assert_eq!(config.max_frame_len, 1518);
        assert_eq!(config.rx_buffer_size, 1536);
        assert_eq!(config.interrupt_mask, DEFAULT_IMASK);
        assert_eq!(config.phy_interface, PhyInterface::Mii);
        assert!(!config.promiscuous);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder_sets_fields() {
        let config = FecConfig::new()
            .with_mac_address([0x00, 0x04, 0x9f, 0x01, 0x02, 0x03])
            .with_phy_interface(PhyInterface::Rmii)
            .with_mii_clock_hz(50_000_000)
            .with_promiscuous(true)
            .with_keep_mii_alive(true);

        assert_eq!(config.mac_address, [0x00, 0x04, 0x9f, 0x01, 0x02, 0x03]);
        assert_eq!(config.phy_interface, PhyInterface::Rmii);
        assert_eq!(config.mii_speed, 20);
        assert!(config.promiscuous);
        assert!(config.keep_mii_alive);
    }

    #[test]
    fn validate_rejects_multicast_and_zero_mac() {
        let multicast = FecConfig::new().with_mac_address([0x01, 0x00, 0x5e, 0, 0, 1]);
        assert_eq!(multicast.validate(), Err(ConfigError::InvalidMacAddress));

        let zero = FecConfig::new().with_mac_address([0; 6]);
        assert_eq!(zero.validate(), Err(ConfigError::InvalidMacAddress));
    }

    #[test]
    fn validate_rejects_unaligned_rx_buffer() {
        let config = FecConfig::new().with_rx_buffer_size(1530);
        assert_eq!(config.validate(), Err(ConfigError::InvalidConfig));
    }

    #[test]
    fn validate_rejects_frame_longer_than_buffer() {
        let config = FecConfig::new()
            .with_rx_buffer_size(1024)
            .with_max_frame_len(1518);
        assert_eq!(config.validate(), Err(ConfigError::InvalidConfig));
    }

    #[test]
    fn validate_rejects_zero_mii_speed() {
        let config = FecConfig::new().with_mii_speed(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidConfig));
    }

    #[test]
    fn unicast_check() {
        assert!(is_valid_unicast(&[0x02, 0, 0, 0, 0, 1]));
        assert!(!is_valid_unicast(&[0x03, 0, 0, 0, 0, 1]));
        assert!(!is_valid_unicast(&[0xff; 6]));
        assert!(!is_valid_unicast(&[0; 6]));
    }
}
