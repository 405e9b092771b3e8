//! Hardware Abstraction Layer
//!
//! This module provides higher-level abstractions over the raw registers and
//! over the platform services the driver depends on.
//!
//! # Modules
//!
//! - [`buffer`]: Buffer pool and DMA mapping traits, transmit frame trait
//! - [`bounce`]: Transmit bounce policies and per-slot bounce buffers
//! - [`mdio`]: Shared MII management bus for PHY communication
//! - [`reset`]: Soft reset and graceful transmit stop
//!
//! # Delay Integration
//!
//! All types that require delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod bounce;
pub mod buffer;
pub mod mdio;
pub mod reset;

// Re-export commonly used types
pub use bounce::{AlignMask, BounceBuffers, BouncePolicy, NoBounce, WordSwap};
#[cfg(feature = "alloc")]
pub use buffer::{HeapBuffer, HeapPool};
pub use buffer::{BufferPool, DmaDirection, TxFrame};
pub use mdio::{MdioBus, MdioController, MiiBus, MiiBusRef, mii_speed_for_clock};
pub use reset::ResetController;
