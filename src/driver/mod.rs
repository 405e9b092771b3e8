//! FEC device driver.
//!
//! - [`config`] - configuration types and builder
//! - [`error`] - error types and result aliases
//! - [`fec`] - the device and its lifecycle
//! - [`tx`], [`rx`] - transmit submission/completion and receive drain
//! - [`link`] - link transitions, restart and stop
//! - [`interrupt`] - event decoding and dispatch
//! - [`filtering`] - station address and receive filters
//! - [`stats`] - interface counters
//!
//! # Example
//!
//! ```ignore
//! use fec_mac::driver::{Fec, FecConfig, PhyInterface};
//!
//! let config = FecConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01])
//!     .with_phy_interface(PhyInterface::Rmii);
//! ```

pub mod config;
pub mod error;
pub mod fec;
pub mod filtering;
pub mod interrupt;
pub mod link;
pub mod rx;
pub mod stats;
pub mod tx;

pub use config::{Duplex, FecConfig, PhyInterface};
pub use error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result};
pub use fec::{Fec, NetStack};
pub use filtering::{RxFilter, multicast_hash_index};
pub use interrupt::InterruptStatus;
pub use link::LinkState;
pub use stats::Statistics;
pub use tx::Transmit;
