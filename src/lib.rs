//! FEC Ethernet Packet Engine
//!
//! A `no_std` driver core for the Freescale/NXP Fast Ethernet Controller
//! (FEC) found on ColdFire, i.MX and Vybrid parts.
//!
//! The crate implements the packet engine: a pair of fixed-size circular
//! descriptor rings shared with the controller's DMA, the interrupt
//! dispatcher that services them, and the link-state controller that
//! restarts the engine when the PHY reports a link or duplex change.
//!
//! # Architecture
//!
//! 1. **Driver** ([`driver`]): [`Fec`] with transmit submission, receive
//!    drain, interrupt dispatch, restart and receive filtering
//! 2. **HAL** ([`hal`]): buffer pool and bounce policies, the shared MII
//!    management bus, soft reset and graceful stop
//! 3. **Sync** (`sync`, feature `critical-section`): `SharedFec`, the
//!    per-device lock used by the interrupt handler and callers alike
//!
//! Platform probing, pin muxing, clocks and PHY management are left to the
//! platform crate. The PHY layer reports link changes through
//! [`Fec::on_link_event`] and reaches the PHY through [`hal::MiiBus`].
//!
//! # Features
//!
//! - `defmt`: log through `defmt` and derive `defmt::Format`
//! - `log`: log through the `log` facade
//! - `critical-section`: enable the ISR-safe `SharedFec` wrapper
//! - `alloc`: heap-backed buffer pool and `Vec`/`Box` transmit frames
//!
//! # Example
//!
//! ```ignore
//! use fec_mac::{Duplex, Fec, FecConfig, Mmio, NoBounce, PhyInterface};
//!
//! let regs = unsafe { Mmio::new(0x02188000) };
//! let config = FecConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
//!     .with_phy_interface(PhyInterface::Rmii)
//!     .with_mii_clock_hz(66_000_000);
//!
//! let mut fec: Fec<'_, Mmio, MyPool, NoBounce, MyFrame> =
//!     Fec::new(regs, MyPool::new(), NoBounce, config);
//! fec.open(&mut delay)?;
//!
//! // From the PHY poller
//! fec.on_link_event(true, Duplex::Full, &mut delay, &mut stack);
//!
//! // From the interrupt handler
//! fec.handle_interrupt(&mut stack);
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in clippy.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

// =============================================================================
// Modules
// =============================================================================

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod driver;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(any(feature = "critical-section", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Host-side mocks (only available during testing)
#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{Duplex, FecConfig, PhyInterface};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result,
};
pub use driver::fec::{Fec, NetStack};
pub use driver::filtering::RxFilter;
pub use driver::interrupt::InterruptStatus;
pub use driver::link::LinkState;
pub use driver::stats::Statistics;
pub use driver::tx::Transmit;
pub use hal::bounce::{AlignMask, BouncePolicy, NoBounce, WordSwap};
pub use hal::buffer::{BufferPool, DmaDirection, TxFrame};
pub use internal::register::{Mmio, RegisterIo};

#[cfg(any(feature = "critical-section", test))]
pub use sync::SharedFec;

/// Low-level register accessors for advanced use.
///
/// Most users should prefer the driver APIs instead of touching registers
/// directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Writing the control or
/// descriptor start registers while the device is open corrupts the rings.
pub mod unsafe_registers {
    pub use crate::internal::register::fec::*;
}

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{
        // Frame/buffer sizes
        CRC_SIZE,
        DEFAULT_MAC_ADDR,
        // Ring sizes
        DEFAULT_RX_RING_SIZE,
        DEFAULT_TX_RING_SIZE,
        MAC_ADDR_LEN,
        // Timing
        MII_TIMEOUT_US,
        PKT_MAXBLR_SIZE,
        PKT_MAXBUF_SIZE,
        PKT_MINBUF_SIZE,
        RX_FRAME_SIZE,
        TX_FRAME_SIZE,
    };
}
