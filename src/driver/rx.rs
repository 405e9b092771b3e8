//! Receive path
//!
//! Every receive slot owns one mapped buffer for as long as the device is
//! open. Good frames are copied out into a fresh pool buffer and the slot is
//! handed straight back to the controller, so a slow consumer never starves
//! the ring.

use super::fec::{Fec, NetStack};
use crate::hal::bounce::BouncePolicy;
use crate::hal::buffer::{BufferPool, DmaDirection, TxFrame};
use crate::internal::constants::CRC_SIZE;
use crate::internal::dma::descriptor::bits::sc;
use crate::internal::logging::fec_warn;
use crate::internal::register::RegisterIo;

impl<'bus, R, P, B, F, const RX: usize, const TX: usize> Fec<'bus, R, P, B, F, RX, TX>
where
    R: RegisterIo,
    P: BufferPool,
    B: BouncePolicy,
    F: TxFrame,
{
    /// Process every slot the controller has filled, in ring order.
    ///
    /// Each slot is re-armed and the receive doorbell rung before moving on.
    /// Returns the number of slots processed. Does nothing while the device
    /// is closed.
    pub(super) fn drain_rx<S: NetStack<P::Buffer>>(&mut self, stack: &mut S) -> usize {
        if !self.opened {
            return 0;
        }

        let mut processed = 0;
        while let Some(slot) = self.rx_ring.next_received() {
            let desc = self.rx_ring.descriptor(slot);
            let status = desc.status();
            let len = desc.len();
            let addr = desc.addr();

            let addr = match self.receive_slot(slot, status, len, addr) {
                (Some(frame), addr) => {
                    stack.deliver(frame);
                    addr
                }
                (None, addr) => addr,
            };

            self.rx_ring.descriptor(slot).arm_rx(addr);
            self.rx_ring.advance_received();
            self.regs.rx_doorbell();
            processed += 1;
        }
        processed
    }

    /// Validate one filled slot and copy its frame out.
    ///
    /// Returns the deliverable frame, if any, and the bus address to re-arm
    /// the slot with.
    fn receive_slot(
        &mut self,
        slot: usize,
        status: u16,
        len: usize,
        addr: u32,
    ) -> (Option<P::Buffer>, u32) {
        if status & sc::LAST == 0 {
            fec_warn!("fec: rcv frame not last, status {}", status);
            self.stats.rx_errors += 1;
            self.stats.rx_fragmented += 1;
            return (None, addr);
        }
        if self.stats.record_rx_errors(status) {
            return (None, addr);
        }
        if len < CRC_SIZE {
            self.stats.rx_errors += 1;
            self.stats.rx_length_errors += 1;
            return (None, addr);
        }
        let Some(buf) = self.rx_buffers[slot].as_mut() else {
            return (None, addr);
        };

        let capacity = buf.as_ref().len();
        self.pool.unmap(addr, capacity, DmaDirection::FromDevice);
        let received = len.min(capacity);
        let padded = received.next_multiple_of(4).min(capacity);
        self.bounce.fixup_rx(&mut buf.as_mut()[..padded]);

        self.stats.rx_packets += 1;
        self.stats.rx_bytes += len as u64;

        let payload = received - CRC_SIZE;
        let frame = match self.pool.alloc(payload) {
            Some(mut frame) => {
                frame.as_mut()[..payload].copy_from_slice(&buf.as_ref()[..payload]);
                Some(frame)
            }
            None => {
                fec_warn!("fec: memory squeeze, dropping packet");
                self.stats.rx_dropped += 1;
                None
            }
        };

        let addr = self.pool.map(buf.as_ref(), DmaDirection::FromDevice);
        (frame, addr)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
