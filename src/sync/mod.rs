//! Interrupt-safe sharing of a device.
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedFec`] - the per-device lock used by both the interrupt handler
//!   and caller paths
//!
//! Requires the `critical-section` feature; the implementation of the
//! critical section itself comes from the platform HAL.

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedFec;
