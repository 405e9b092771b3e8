//! Descriptor rings
//!
//! This module provides the buffer descriptor shared with the controller and
//! the circular ring that tracks it.
//!
//! # Architecture
//!
//! - [`BufferDescriptor`](descriptor::BufferDescriptor): one `#[repr(C)]` slot, accessed with volatile reads
//!   and writes
//! - [`DescriptorRing`]: fixed-size ring with producer/consumer cursors and a
//!   `full` flag
//!
//! The driver owns one ring per direction; the rings must not move once
//! their base addresses are programmed into the controller.

pub(crate) mod descriptor;
mod ring;

pub use ring::DescriptorRing;
