//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: Register I/O backend and the FEC register map
//! - [`dma`]: Buffer descriptors and descriptor rings
//! - [`constants`]: Frame sizes, timeouts and defaults
//! - [`logging`]: `defmt`/`log` forwarding macros
//!
//! # Stability
//!
//! **WARNING:** Only the items re-exported from the crate root are public API.

pub(crate) mod constants;
pub(crate) mod dma;
pub(crate) mod logging;
pub(crate) mod register;
