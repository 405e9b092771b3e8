//! Buffer descriptor bit field constants.
//!
//! Encodings of the 16-bit `cbd_sc` status word and the 32-bit extended
//! status word. RX and TX share the ownership and wrap positions.

/// Bits common to RX and TX descriptors
pub mod sc {
    /// Slot owned by the controller (RX: empty, TX: ready)
    pub const OWN: u16 = 0x8000;
    /// Last descriptor in the ring
    pub const WRAP: u16 = 0x2000;
    /// Interrupt on completion
    pub const INTR: u16 = 0x1000;
    /// Last buffer of a frame
    pub const LAST: u16 = 0x0800;
}

/// Receive descriptor status bits
pub mod rx {
    /// Buffer empty, owned by the controller
    pub const EMPTY: u16 = 0x8000;
    /// Software-owned receive flag (RO1)
    pub const RO1: u16 = 0x4000;
    /// Last descriptor in the ring
    pub const WRAP: u16 = 0x2000;
    /// Interrupt on receive (RO2)
    pub const INTR: u16 = 0x1000;
    /// Last buffer of the frame
    pub const LAST: u16 = 0x0800;
    /// First buffer of the frame
    pub const FIRST: u16 = 0x0400;
    /// Received in promiscuous mode only
    pub const MISS: u16 = 0x0100;
    /// Frame length violation
    pub const LG: u16 = 0x0020;
    /// Non-octet aligned frame
    pub const NO: u16 = 0x0010;
    /// Short frame
    pub const SH: u16 = 0x0008;
    /// CRC error
    pub const CR: u16 = 0x0004;
    /// Receive FIFO overrun
    pub const OV: u16 = 0x0002;
    /// Late collision, frame truncated
    pub const CL: u16 = 0x0001;
    /// Status bits cleared when a slot is re-armed
    pub const STATS: u16 = 0x013f;
    /// Errors that count against the frame
    pub const ERRORS: u16 = LG | SH | NO | CR | OV;
}

/// Transmit descriptor status bits
pub mod tx {
    /// Buffer ready, owned by the controller
    pub const READY: u16 = 0x8000;
    /// Pad short frames
    pub const PAD: u16 = 0x4000;
    /// Last descriptor in the ring
    pub const WRAP: u16 = 0x2000;
    /// Interrupt on completion
    pub const INTR: u16 = 0x1000;
    /// Last buffer of the frame
    pub const LAST: u16 = 0x0800;
    /// Append CRC
    pub const TC: u16 = 0x0400;
    /// Deferred (collisions before success)
    pub const DEF: u16 = 0x0200;
    /// Heartbeat missing
    pub const HB: u16 = 0x0100;
    /// Late collision
    pub const LC: u16 = 0x0080;
    /// Retransmit limit reached
    pub const RL: u16 = 0x0040;
    /// Retry count mask
    pub const RCMASK: u16 = 0x003c;
    /// Transmit underrun
    pub const UN: u16 = 0x0002;
    /// Carrier sense lost
    pub const CSL: u16 = 0x0001;
    /// Status bits cleared before a slot is reused
    pub const STATS: u16 = 0x03ff;
    /// Errors that fail the frame
    pub const ERRORS: u16 = HB | LC | RL | UN | CSL;
}

/// Extended (enhanced descriptor) status bits
pub mod esc {
    /// TX: interrupt on completion
    pub const TX_INT: u32 = 0x4000_0000;
    /// TX: timestamp requested / available
    pub const TX_TS: u32 = 0x2000_0000;
    /// RX: interrupt on receive
    pub const RX_INT: u32 = 0x0080_0000;
}
