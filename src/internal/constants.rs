//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers used
//! throughout the FEC driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Frame/Buffer sizes**: Ethernet frame dimensions and DMA buffer sizes
//! - **Ring sizes**: Default descriptor counts
//! - **Timing**: Timeouts and polling intervals
//! - **Clock**: MII management clock limits
//!
//! # Note
//!
//! Register offsets and bit definitions live in `register/fec.rs`, and
//! descriptor bits in `dma/descriptor/bits.rs`.

// =============================================================================
// Frame and Buffer Sizes
// =============================================================================

/// Maximum Ethernet frame size including FCS
pub const PKT_MAXBUF_SIZE: usize = 1518;

/// Minimum Ethernet frame size including FCS
pub const PKT_MINBUF_SIZE: usize = 64;

/// Receive buffer size programmed into `R_BUFF_SIZE` (multiple of 16)
pub const PKT_MAXBLR_SIZE: usize = 1536;

/// Frame check sequence appended by the MAC
pub const CRC_SIZE: usize = 4;

/// MAC address length
pub const MAC_ADDR_LEN: usize = 6;

/// Size of each receive slot buffer
pub const RX_FRAME_SIZE: usize = 2048;

/// Size of each transmit bounce buffer, and the largest frame `submit` accepts
pub const TX_FRAME_SIZE: usize = 2048;

/// Alignment mask required by controllers that cannot DMA from unaligned
/// buffers (4-byte alignment)
pub const FEC_ALIGNMENT: usize = 0x3;

/// Alignment mask for the i.MX28-class controllers (16-byte alignment)
pub const FEC_ALIGNMENT_MXS: usize = 0xf;

// =============================================================================
// Ring Sizes
// =============================================================================

/// Default number of receive descriptors (8 pages of 2 frames each)
pub const DEFAULT_RX_RING_SIZE: usize = 16;

/// Default number of transmit descriptors
pub const DEFAULT_TX_RING_SIZE: usize = 16;

// =============================================================================
// Timing Constants
// =============================================================================

/// MII management frame completion timeout in microseconds
pub const MII_TIMEOUT_US: u32 = 1_000;

/// Polling interval while waiting on the MII completion flag
pub const MII_POLL_INTERVAL_US: u32 = 10;

/// Soft reset completion timeout in microseconds
pub const SOFT_RESET_TIMEOUT_US: u32 = 100;

/// Graceful transmit stop completion timeout in microseconds
pub const GRACEFUL_STOP_TIMEOUT_US: u32 = 100;

/// Polling interval for reset and graceful stop acknowledgements
pub const RESET_POLL_INTERVAL_US: u32 = 10;

// =============================================================================
// Clock Constants
// =============================================================================

/// Upper bound for the MDC management clock (IEEE 802.3 allows 2.5 MHz)
pub const MDC_MAX_FREQ_HZ: u32 = 2_500_000;

/// Default `MII_SPEED` value (divisor for a 66 MHz module clock)
pub const DEFAULT_MII_SPEED: u32 = 0x1c;

// =============================================================================
// Default Configuration
// =============================================================================

/// Default station address (locally administered)
pub const DEFAULT_MAC_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x12, 0x34, 0x56];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rx_buffer_size_is_burst_aligned() {
        assert_eq!(PKT_MAXBLR_SIZE % 16, 0);
        assert!(PKT_MAXBLR_SIZE >= PKT_MAXBUF_SIZE);
    }

    #[test]
    fn slot_buffers_hold_largest_frame() {
        assert!(RX_FRAME_SIZE >= PKT_MAXBLR_SIZE);
        assert!(TX_FRAME_SIZE >= PKT_MAXBUF_SIZE);
    }

    #[test]
    fn default_rings_are_powers_of_two() {
        assert!(DEFAULT_RX_RING_SIZE.is_power_of_two());
        assert!(DEFAULT_TX_RING_SIZE.is_power_of_two());
    }
}
