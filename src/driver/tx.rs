//! Transmit path
//!
//! [`Fec::submit`] never blocks: when the link is down or every slot is in
//! flight the frame is handed straight back as [`Transmit::Busy`]. Completed
//! slots are reclaimed by the interrupt dispatcher.

use super::error::{DmaError, IoError, Result};
use super::fec::{Fec, NetStack};
use crate::hal::bounce::BouncePolicy;
use crate::hal::buffer::{BufferPool, DmaDirection, TxFrame};
use crate::internal::constants::TX_FRAME_SIZE;
use crate::internal::logging::fec_debug;
use crate::internal::register::RegisterIo;

/// Outcome of [`Fec::submit`]
#[derive(Debug, PartialEq, Eq)]
pub enum Transmit<F> {
    /// The frame is queued; the ring keeps it until the controller is done
    Accepted,
    /// The frame was not queued and is returned unchanged
    Busy(F),
}

impl<F> Transmit<F> {
    /// Check if the frame was queued
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl<'bus, R, P, B, F, const RX: usize, const TX: usize> Fec<'bus, R, P, B, F, RX, TX>
where
    R: RegisterIo,
    P: BufferPool,
    B: BouncePolicy,
    F: TxFrame,
{
    /// Queue one frame for transmission.
    ///
    /// The frame is moved into its ring slot before anything is mapped, so
    /// the controller always sees the retained copy. Frames the bounce
    /// policy rejects are copied into the slot's bounce buffer; otherwise
    /// the frame's own memory is mapped. When the link is down or the ring
    /// becomes full the queue is stopped through `stack`; it is woken once
    /// completions free a slot.
    ///
    /// # Errors
    ///
    /// - [`DmaError::InvalidLength`] for an empty frame
    /// - [`DmaError::FrameTooLarge`] for a frame longer than a bounce buffer
    /// - [`IoError::InvalidState`] if the device is not open
    pub fn submit<S: NetStack<P::Buffer>>(
        &mut self,
        frame: F,
        stack: &mut S,
    ) -> Result<Transmit<F>> {
        let len = frame.as_ref().len();
        if len == 0 {
            return Err(DmaError::InvalidLength.into());
        }
        if len > TX_FRAME_SIZE {
            return Err(DmaError::FrameTooLarge.into());
        }
        if !self.opened {
            return Err(IoError::InvalidState.into());
        }

        if !self.link.is_up() {
            self.stop_queue(stack);
            return Ok(Transmit::Busy(frame));
        }
        let Ok(slot) = self.tx_ring.reserve_next_tx() else {
            fec_debug!("fec: tx ring full");
            self.stop_queue(stack);
            return Ok(Transmit::Busy(frame));
        };

        let wants_timestamp = frame.wants_timestamp();
        let Self {
            tx_frames,
            tx_bounce,
            bounce,
            pool,
            ..
        } = self;
        let data = (*tx_frames[slot].insert(frame)).as_ref();
        let addr = if bounce.needs_bounce(data) {
            let Some(staging) = tx_bounce.get_mut(slot) else {
                tx_frames[slot] = None;
                return Err(DmaError::OutOfBuffers.into());
            };
            let staged = bounce.staged_len(len).min(staging.as_ref().len());
            bounce.stage(data, staging.as_mut());
            pool.map(&staging.as_ref()[..staged], DmaDirection::ToDevice)
        } else {
            pool.map(data, DmaDirection::ToDevice)
        };

        self.tx_ring
            .descriptor(slot)
            .prepare_tx(addr, len, wants_timestamp);
        self.stats.tx_bytes += len as u64;

        self.tx_ring.advance_producer();
        self.regs.tx_doorbell();

        if self.tx_ring.is_full() {
            self.stop_queue(stack);
        }
        Ok(Transmit::Accepted)
    }

    /// Reclaim every transmit slot the controller has finished with.
    ///
    /// Classifies each slot's status into the statistics, releases the
    /// retained frame and wakes the queue if the ring had been full.
    /// Returns the number of reclaimed slots.
    pub(super) fn reclaim_tx<S: NetStack<P::Buffer>>(&mut self, stack: &mut S) -> usize {
        let was_full = self.tx_ring.is_full();

        let Self {
            tx_ring,
            tx_frames,
            pool,
            stats,
            ..
        } = self;
        let reclaimed = tx_ring.drain_completed(|slot, desc| {
            pool.unmap(desc.addr(), desc.len(), DmaDirection::ToDevice);
            stats.record_tx_completion(desc.status());
            drop(tx_frames[slot].take());
            desc.set_addr(0);
        });

        if reclaimed > 0 && (was_full || self.queue_stopped) && self.link.is_up() {
            self.wake_queue(stack);
        }
        reclaimed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use std::cell::Cell;
    use std::rc::Rc;
    use std::vec::Vec;

    use super::*;
    use crate::driver::config::{Duplex, FecConfig};
    use crate::driver::error::Error;
    use crate::driver::fec::tests::{TestFec, running_fec, running_fec_with};
    use crate::hal::bounce::{AlignMask, NoBounce, WordSwap};
    use crate::internal::dma::descriptor::bits::{esc, tx};
    use crate::internal::register::fec::X_DES_ACTIVE;
    use crate::testing::{
        CountedFrame, MockBuffer, MockDelay, MockPool, MockRegisters, MockStack,
    };

    /// Hand slots back to software as the controller would
    fn complete(fec: &TestFec<'_, impl BouncePolicy>, slots: core::ops::Range<usize>, status: u16) {
        for slot in slots {
            let desc = fec.tx_ring.descriptor(slot);
            desc.set_status((desc.status() & !tx::READY & !tx::STATS) | status);
        }
    }

    #[test]
    fn submit_queues_frame_and_rings_doorbell() {
        let mock = MockRegisters::new();
        let mut fec = running_fec(&mock);
        let mut stack = MockStack::new();
        let drops = Rc::new(Cell::new(0));
        mock.clear_writes();

        let result = fec
            .submit(CountedFrame::new(60, 0x5a, &drops), &mut stack)
            .unwrap();

        assert!(result.is_accepted());
        let desc = fec.tx_ring.descriptor(0);
        assert!(desc.is_device_owned());
        assert_eq!(desc.len(), 60);
        assert_eq!(
            desc.status() & (tx::INTR | tx::LAST | tx::TC),
            tx::INTR | tx::LAST | tx::TC
        );
        assert_eq!(desc.esc(), esc::TX_INT);
        assert_eq!(mock.writes_to(X_DES_ACTIVE), [0]);
        assert_eq!(fec.statistics().tx_bytes, 60);
        assert_eq!(fec.tx_in_flight(), 1);
        assert_eq!(drops.get(), 0);
        assert_eq!(stack.stops, 0);
    }

    #[test]
    fn inline_frame_is_mapped_where_it_is_retained() {
        let mock = MockRegisters::new();
        let mut fec: Fec<'_, &MockRegisters, MockPool, NoBounce, [u8; 64], 16, 16> =
            Fec::new(&mock, MockPool::new(), NoBounce, FecConfig::new());
        let mut delay = MockDelay::new();
        let mut stack: MockStack<MockBuffer> = MockStack::new();
        fec.open(&mut delay).unwrap();
        fec.on_link_event(true, Duplex::Full, &mut delay, &mut stack);

        fec.submit([0xab; 64], &mut stack).unwrap();

        let retained = fec.tx_frames[0].as_ref().unwrap();
        assert_eq!(
            fec.tx_ring.descriptor(0).addr(),
            retained.as_ptr() as usize as u32
        );
        assert_eq!(fec.pool().map_lens().last(), Some(&64));
    }

    #[test]
    fn timestamp_request_sets_extended_status() {
        let mock = MockRegisters::new();
        let mut fec = running_fec(&mock);
        let mut stack = MockStack::new();
        let drops = Rc::new(Cell::new(0));

        fec.submit(CountedFrame::new(60, 0, &drops).with_timestamp(), &mut stack)
            .unwrap();

        assert_eq!(fec.tx_ring.descriptor(0).esc(), esc::TX_INT | esc::TX_TS);
    }

    #[test]
    fn submit_rejects_bad_lengths() {
        let mock = MockRegisters::new();
        let mut fec = running_fec(&mock);
        let mut stack = MockStack::new();
        let drops = Rc::new(Cell::new(0));

        let empty = fec.submit(CountedFrame::new(0, 0, &drops), &mut stack);
        assert_eq!(empty.err(), Some(Error::Dma(DmaError::InvalidLength)));

        let huge = fec.submit(CountedFrame::new(TX_FRAME_SIZE + 1, 0, &drops), &mut stack);
        assert_eq!(huge.err(), Some(Error::Dma(DmaError::FrameTooLarge)));
        assert_eq!(fec.tx_in_flight(), 0);
    }

    #[test]
    fn submit_on_closed_device_is_invalid() {
        let mock = MockRegisters::new();
        let mut fec: TestFec<'_> = Fec::new(&mock, MockPool::new(), NoBounce, FecConfig::new());
        let mut stack = MockStack::new();
        let drops = Rc::new(Cell::new(0));

        let result = fec.submit(CountedFrame::new(60, 0, &drops), &mut stack);
        assert_eq!(result.err(), Some(Error::Io(IoError::InvalidState)));
    }

    #[test]
    fn link_down_returns_frame() {
        let mock = MockRegisters::new();
        let mut fec: TestFec<'_> = Fec::new(&mock, MockPool::new(), NoBounce, FecConfig::new());
        let mut delay = MockDelay::new();
        let mut stack = MockStack::new();
        fec.open(&mut delay).unwrap();
        let drops = Rc::new(Cell::new(0));

        let result = fec
            .submit(CountedFrame::new(60, 0, &drops), &mut stack)
            .unwrap();

        assert!(matches!(result, Transmit::Busy(_)));
        assert!(fec.is_queue_stopped());
        assert_eq!(fec.tx_in_flight(), 0);
        drop(result);
        assert_eq!(drops.get(), 1);
        assert_eq!(fec.statistics().tx_errors, 0);
    }

    #[test]
    fn full_ring_is_busy_until_completion() {
        let mock = MockRegisters::new();
        let mut fec = running_fec(&mock);
        let drops = Rc::new(Cell::new(0));
        let mut stack = MockStack::new();

        for i in 0..16 {
            let result = fec
                .submit(CountedFrame::new(64, i as u8, &drops), &mut stack)
                .unwrap();
            assert!(result.is_accepted(), "slot {}", i);
        }
        assert!(fec.tx_ring.is_full());
        assert!(fec.is_queue_stopped());
        assert_eq!(stack.stops, 1);

        let busy = fec
            .submit(CountedFrame::new(64, 0xff, &drops), &mut stack)
            .unwrap();
        assert!(matches!(busy, Transmit::Busy(_)));
        drop(busy);
        assert_eq!(drops.get(), 1);
        assert_eq!(stack.stops, 1);

        complete(&fec, 0..3, tx::LAST);
        assert_eq!(fec.reclaim_tx(&mut stack), 3);

        assert_eq!(fec.tx_in_flight(), 13);
        assert!(!fec.tx_ring.is_full());
        assert!(!fec.is_queue_stopped());
        assert_eq!(stack.wakes, 1);
        assert_eq!(drops.get(), 4);
        assert_eq!(fec.statistics().tx_packets, 3);

        let result = fec
            .submit(CountedFrame::new(64, 0, &drops), &mut stack)
            .unwrap();
        assert!(result.is_accepted());
    }

    #[test]
    fn stop_and_wake_notifications_pair_up() {
        let mock = MockRegisters::new();
        let mut fec = running_fec(&mock);
        let drops = Rc::new(Cell::new(0));
        let mut stack = MockStack::new();

        for _ in 0..16 {
            fec.submit(CountedFrame::new(64, 0, &drops), &mut stack)
                .unwrap();
        }
        complete(&fec, 0..1, tx::LAST);
        fec.reclaim_tx(&mut stack);
        fec.submit(CountedFrame::new(64, 0, &drops), &mut stack)
            .unwrap();
        complete(&fec, 1..2, tx::LAST);
        fec.reclaim_tx(&mut stack);

        assert_eq!(stack.stops, 2);
        assert_eq!(stack.wakes, 2);
    }

    #[test]
    fn completion_stops_at_device_owned_slot() {
        let mock = MockRegisters::new();
        let mut fec = running_fec(&mock);
        let drops = Rc::new(Cell::new(0));
        let mut stack = MockStack::new();
        for _ in 0..4 {
            fec.submit(CountedFrame::new(64, 0, &drops), &mut stack)
                .unwrap();
        }

        complete(&fec, 0..1, tx::LAST);
        complete(&fec, 2..3, tx::LAST);

        assert_eq!(fec.reclaim_tx(&mut stack), 1);
        assert_eq!(fec.tx_ring.consumer(), 1);
        assert_eq!(drops.get(), 1);
        assert_eq!(stack.wakes, 0);
    }

    #[test]
    fn completion_classifies_errors_once() {
        let mock = MockRegisters::new();
        let mut fec = running_fec(&mock);
        let drops = Rc::new(Cell::new(0));
        let mut stack = MockStack::new();
        fec.submit(CountedFrame::new(64, 0, &drops), &mut stack)
            .unwrap();
        fec.submit(CountedFrame::new(64, 0, &drops), &mut stack)
            .unwrap();

        complete(&fec, 0..1, tx::LAST | tx::LC);
        complete(&fec, 1..2, tx::LAST | tx::DEF);
        fec.reclaim_tx(&mut stack);
        fec.reclaim_tx(&mut stack);

        let stats = fec.statistics();
        assert_eq!(stats.tx_errors, 1);
        assert_eq!(stats.tx_window_errors, 1);
        assert_eq!(stats.tx_packets, 1);
        assert_eq!(stats.collisions, 1);
        assert_eq!(drops.get(), 2);
        assert_eq!(fec.pool().mapped(), 16);
    }

    #[test]
    fn misaligned_frame_goes_through_bounce_buffer() {
        let mock = MockRegisters::new();
        let mut fec = running_fec_with(&mock, AlignMask::WORD);
        let mut stack = MockStack::new();
        let drops = Rc::new(Cell::new(0));

        // Vec allocations are at least word aligned, so offset 1 is not
        let frame = CountedFrame::misaligned(61, 1, &drops);
        let expected: Vec<u8> = frame.as_ref().to_vec();
        fec.submit(frame, &mut stack).unwrap();

        assert_eq!(fec.pool().map_lens().last(), Some(&61));
        let addr = fec.tx_ring.descriptor(0).addr();
        let bounce = fec.tx_bounce.get_mut(0).unwrap();
        assert_eq!(addr, bounce.as_ref().as_ptr() as usize as u32);
        assert_eq!(&bounce.as_ref()[..61], &expected[..]);
    }

    #[test]
    fn aligned_frame_is_mapped_in_place() {
        let mock = MockRegisters::new();
        let mut fec = running_fec_with(&mock, AlignMask::WORD);
        let mut stack = MockStack::new();
        let drops = Rc::new(Cell::new(0));

        let frame = CountedFrame::new(64, 7, &drops);
        let ptr = frame.as_ref().as_ptr() as usize as u32;
        fec.submit(frame, &mut stack).unwrap();

        assert_eq!(fec.tx_ring.descriptor(0).addr(), ptr);
    }

    #[test]
    fn word_swap_stages_every_frame() {
        let mock = MockRegisters::new();
        let mut fec = running_fec_with(&mock, WordSwap);
        let mut stack = MockStack::new();
        let drops = Rc::new(Cell::new(0));

        fec.submit(CountedFrame::misaligned(8, 0, &drops), &mut stack)
            .unwrap();

        let bounce = fec.tx_bounce.get_mut(0).unwrap();
        assert_eq!(&bounce.as_ref()[..8], &[3, 2, 1, 0, 7, 6, 5, 4]);
    }

    #[test]
    fn word_swap_maps_trailing_partial_word() {
        let mock = MockRegisters::new();
        let mut fec = running_fec_with(&mock, WordSwap);
        let mut stack = MockStack::new();
        let drops = Rc::new(Cell::new(0));

        fec.submit(CountedFrame::misaligned(5, 0, &drops), &mut stack)
            .unwrap();

        assert_eq!(fec.pool().map_lens().last(), Some(&8));
        assert_eq!(fec.tx_ring.descriptor(0).len(), 5);
        let bounce = fec.tx_bounce.get_mut(0).unwrap();
        assert_eq!(&bounce.as_ref()[..8], &[3, 2, 1, 0, 0, 0, 0, 4]);
    }

    #[test]
    fn link_drop_with_full_ring_keeps_queue_stopped() {
        let mock = MockRegisters::new();
        let mut fec = running_fec(&mock);
        let drops = Rc::new(Cell::new(0));
        let mut delay = MockDelay::new();
        let mut stack = MockStack::new();
        for _ in 0..16 {
            fec.submit(CountedFrame::new(64, 0, &drops), &mut stack)
                .unwrap();
        }

        fec.on_link_event(false, Duplex::Full, &mut delay, &mut stack);
        complete(&fec, 0..1, tx::LAST);
        fec.reclaim_tx(&mut stack);

        assert!(fec.is_queue_stopped());
        assert_eq!(stack.wakes, 0);
        assert_eq!(stack.stops, 1);
    }
}
