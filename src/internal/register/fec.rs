//! FEC Controller Register Definitions
//!
//! Register offsets and bit fields of the Fast Ethernet Controller, plus the
//! typed [`FecRegs`] accessor used by the driver.

use super::{RegisterIo, reg_rw, reg_wo};

// =============================================================================
// Register Offsets
// =============================================================================

/// Interrupt event register (write 1 to clear)
pub const IEVENT: usize = 0x004;
/// Interrupt mask register
pub const IMASK: usize = 0x008;
/// Receive descriptor active register (doorbell)
pub const R_DES_ACTIVE: usize = 0x010;
/// Transmit descriptor active register (doorbell)
pub const X_DES_ACTIVE: usize = 0x014;
/// Ethernet control register
pub const ECNTRL: usize = 0x024;
/// MII management frame register
pub const MII_DATA: usize = 0x040;
/// MII speed control register
pub const MII_SPEED: usize = 0x044;
/// MIB control/status register
pub const MIB_CTRLSTAT: usize = 0x064;
/// Receive control register
pub const R_CNTRL: usize = 0x084;
/// Transmit control register
pub const X_CNTRL: usize = 0x0c4;
/// Station address, bytes 0-3
pub const ADDR_LOW: usize = 0x0e4;
/// Station address, bytes 4-5 and pause type
pub const ADDR_HIGH: usize = 0x0e8;
/// Opcode/pause duration register
pub const OPD: usize = 0x0ec;
/// Individual address hash, upper 32 bits
pub const HASH_TABLE_HIGH: usize = 0x118;
/// Individual address hash, lower 32 bits
pub const HASH_TABLE_LOW: usize = 0x11c;
/// Group address hash, upper 32 bits
pub const GRP_HASH_TABLE_HIGH: usize = 0x120;
/// Group address hash, lower 32 bits
pub const GRP_HASH_TABLE_LOW: usize = 0x124;
/// Transmit FIFO watermark
pub const X_WMRK: usize = 0x144;
/// Receive descriptor ring start
pub const R_DES_START: usize = 0x180;
/// Transmit descriptor ring start
pub const X_DES_START: usize = 0x184;
/// Maximum receive buffer size
pub const R_BUFF_SIZE: usize = 0x188;

// =============================================================================
// Event / Mask Register Bits
// =============================================================================

/// Heartbeat error
pub const EVENT_HBERR: u32 = 0x8000_0000;
/// Babbling receiver
pub const EVENT_BABR: u32 = 0x4000_0000;
/// Babbling transmitter
pub const EVENT_BABT: u32 = 0x2000_0000;
/// Graceful stop complete
pub const EVENT_GRA: u32 = 0x1000_0000;
/// Full frame transmitted
pub const EVENT_TXF: u32 = 0x0800_0000;
/// Transmit buffer done
pub const EVENT_TXB: u32 = 0x0400_0000;
/// Full frame received
pub const EVENT_RXF: u32 = 0x0200_0000;
/// Receive buffer done
pub const EVENT_RXB: u32 = 0x0100_0000;
/// MII management frame complete
pub const EVENT_MII: u32 = 0x0080_0000;
/// Ethernet bus error
pub const EVENT_EBERR: u32 = 0x0040_0000;
/// Timestamp available
pub const EVENT_TS_AVAIL: u32 = 0x0001_0000;
/// Timestamp timer wrap
pub const EVENT_TS_TIMER: u32 = 0x0000_8000;

/// Every event bit the controller can latch (cleared during restart)
pub const EVENT_ALL: u32 = 0xffc0_0000;

/// Interrupts enabled by default
pub const DEFAULT_IMASK: u32 = EVENT_TXF | EVENT_RXF | EVENT_MII;

// =============================================================================
// ECNTRL Bits
// =============================================================================

/// Soft reset, self-clearing
pub const ECNTRL_RESET: u32 = 1 << 0;
/// Ethernet enable
pub const ECNTRL_ETHER_EN: u32 = 1 << 1;

// =============================================================================
// R_CNTRL Bits
// =============================================================================

/// Internal loopback
pub const R_CNTRL_LOOP: u32 = 1 << 0;
/// Disable receive on transmit (half duplex)
pub const R_CNTRL_DRT: u32 = 1 << 1;
/// MII mode enable
pub const R_CNTRL_MII_MODE: u32 = 1 << 2;
/// Promiscuous mode
pub const R_CNTRL_PROM: u32 = 1 << 3;
/// RMII mode select
pub const R_CNTRL_RMII_MODE: u32 = 1 << 8;
/// Maximum frame length field shift
pub const R_CNTRL_MAX_FL_SHIFT: u32 = 16;

// =============================================================================
// X_CNTRL Bits
// =============================================================================

/// Graceful transmit stop
pub const X_CNTRL_GTS: u32 = 1 << 0;
/// Full duplex enable
pub const X_CNTRL_FDEN: u32 = 1 << 2;

// =============================================================================
// MII Management Frame
// =============================================================================

/// Start of frame delimiter
pub const MMFR_ST: u32 = 0x01 << 30;
/// Read operation
pub const MMFR_OP_READ: u32 = 0x02 << 28;
/// Write operation
pub const MMFR_OP_WRITE: u32 = 0x01 << 28;
/// Operation field mask
pub const MMFR_OP_MASK: u32 = 0x03 << 28;
/// Turnaround
pub const MMFR_TA: u32 = 0x02 << 16;
/// Data field mask
pub const MMFR_DATA_MASK: u32 = 0xffff;

/// PHY address field
#[inline(always)]
pub const fn mmfr_pa(addr: u8) -> u32 {
    ((addr as u32) & 0x1f) << 23
}

/// Register address field
#[inline(always)]
pub const fn mmfr_ra(reg: u8) -> u32 {
    ((reg as u32) & 0x1f) << 18
}

// =============================================================================
// Register Block
// =============================================================================

/// Typed view of one controller's register block
#[derive(Debug, Clone, Copy)]
pub struct FecRegs<R> {
    io: R,
}

impl<R: RegisterIo> FecRegs<R> {
    /// Wrap a register backend
    pub const fn new(io: R) -> Self {
        Self { io }
    }

    /// Borrow the underlying backend
    pub fn io(&self) -> &R {
        &self.io
    }

    reg_rw!(ievent, set_ievent, IEVENT, "interrupt event register");
    reg_rw!(imask, set_imask, IMASK, "interrupt mask register");
    reg_rw!(ecntrl, set_ecntrl, ECNTRL, "Ethernet control register");
    reg_rw!(mii_data, set_mii_data, MII_DATA, "MII management frame register");
    reg_rw!(mii_speed, set_mii_speed, MII_SPEED, "MII speed register");
    reg_rw!(r_cntrl, set_r_cntrl, R_CNTRL, "receive control register");
    reg_rw!(x_cntrl, set_x_cntrl, X_CNTRL, "transmit control register");
    reg_rw!(addr_low, set_addr_low, ADDR_LOW, "station address low register");
    reg_rw!(addr_high, set_addr_high, ADDR_HIGH, "station address high register");
    reg_rw!(hash_high, set_hash_high, HASH_TABLE_HIGH, "individual hash high register");
    reg_rw!(hash_low, set_hash_low, HASH_TABLE_LOW, "individual hash low register");
    reg_rw!(grp_hash_high, set_grp_hash_high, GRP_HASH_TABLE_HIGH, "group hash high register");
    reg_rw!(grp_hash_low, set_grp_hash_low, GRP_HASH_TABLE_LOW, "group hash low register");
    reg_rw!(r_buff_size, set_r_buff_size, R_BUFF_SIZE, "receive buffer size register");
    reg_rw!(r_des_start, set_r_des_start, R_DES_START, "receive ring start register");
    reg_rw!(x_des_start, set_x_des_start, X_DES_START, "transmit ring start register");

    reg_wo!(kick_rx, R_DES_ACTIVE, "receive descriptor active (doorbell)");
    reg_wo!(kick_tx, X_DES_ACTIVE, "transmit descriptor active (doorbell)");

    /// Ring the receive doorbell
    #[inline(always)]
    pub fn rx_doorbell(&self) {
        self.kick_rx(0);
    }

    /// Ring the transmit doorbell
    #[inline(always)]
    pub fn tx_doorbell(&self) {
        self.kick_tx(0);
    }

    /// Clear the given event bits (write 1 to clear)
    #[inline(always)]
    pub fn clear_events(&self, events: u32) {
        self.set_ievent(events);
    }

    /// Program the station address (big-endian packing)
    pub fn set_station_address(&self, mac: &[u8; 6]) {
        let low = u32::from_be_bytes([mac[0], mac[1], mac[2], mac[3]]);
        let high = u32::from_be_bytes([mac[4], mac[5], 0, 0]);
        self.set_addr_low(low);
        self.set_addr_high(high);
    }

    /// Read back the station address
    pub fn station_address(&self) -> [u8; 6] {
        let low = self.addr_low().to_be_bytes();
        let high = self.addr_high().to_be_bytes();
        [low[0], low[1], low[2], low[3], high[0], high[1]]
    }

    /// Clear the individual and group hash tables
    pub fn clear_hash_tables(&self) {
        self.set_grp_hash_high(0);
        self.set_grp_hash_low(0);
        self.set_hash_high(0);
        self.set_hash_low(0);
    }

    /// Set one bit (0-63) in the group hash table
    pub fn set_group_hash_bit(&self, index: u8) {
        let index = index & 0x3f;
        if index > 31 {
            self.io.modify(GRP_HASH_TABLE_HIGH, |v| v | (1 << (index - 32)));
        } else {
            self.io.modify(GRP_HASH_TABLE_LOW, |v| v | (1 << index));
        }
    }

    /// Set or clear bits in the receive control register
    pub fn update_r_cntrl(&self, set: u32, clear: u32) {
        self.io.modify(R_CNTRL, |v| (v & !clear) | set);
    }
}
