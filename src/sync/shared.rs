//! ISR-safe device wrapper using critical sections.

use embedded_hal::delay::DelayNs;

use super::primitives::CriticalSectionCell;
use crate::driver::config::Duplex;
use crate::driver::error::Result;
use crate::driver::fec::{Fec, NetStack};
use crate::driver::interrupt::InterruptStatus;
use crate::driver::link::LinkState;
use crate::driver::tx::Transmit;
use crate::hal::bounce::BouncePolicy;
use crate::hal::buffer::{BufferPool, TxFrame};
use crate::internal::register::RegisterIo;

/// ISR-safe FEC wrapper.
///
/// This is the device lock: the interrupt handler and every caller path go
/// through it, so at most one of them touches the rings at a time. All
/// access goes through `critical_section::with()`, disabling interrupts for
/// the duration of the closure.
///
/// # Example
///
/// ```ignore
/// static FEC: SharedFec<'static, Mmio, Pool, NoBounce, Frame> =
///     SharedFec::new(Fec::new(Mmio::new(FEC_BASE), Pool::new(), NoBounce, CONFIG));
///
/// #[interrupt]
/// fn ENET() {
///     FEC.handle_interrupt(&mut STACK);
/// }
/// ```
pub struct SharedFec<'bus, R, P: BufferPool, B, F, const RX: usize, const TX: usize> {
    inner: CriticalSectionCell<Fec<'bus, R, P, B, F, RX, TX>>,
}

impl<'bus, R, P: BufferPool, B, F, const RX: usize, const TX: usize>
    SharedFec<'bus, R, P, B, F, RX, TX>
{
    /// Wrap a device (const, suitable for static initialization)
    pub const fn new(fec: Fec<'bus, R, P, B, F, RX, TX>) -> Self {
        Self {
            inner: CriticalSectionCell::new(fec),
        }
    }

    /// Execute a closure with exclusive access to the device.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<T, C>(&self, f: C) -> T
    where
        C: FnOnce(&mut Fec<'bus, R, P, B, F, RX, TX>) -> T,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<T, C>(&self, f: C) -> Option<T>
    where
        C: FnOnce(&mut Fec<'bus, R, P, B, F, RX, TX>) -> T,
    {
        self.inner.try_with(f)
    }
}

impl<'bus, R, P, B, F, const RX: usize, const TX: usize> SharedFec<'bus, R, P, B, F, RX, TX>
where
    R: RegisterIo,
    P: BufferPool,
    B: BouncePolicy,
    F: TxFrame,
{
    /// Run the interrupt dispatcher under the lock.
    ///
    /// Returns an empty status if the device is already borrowed, which only
    /// happens when the handler interrupts a caller that is inside
    /// [`with`](Self::with) on a platform whose critical section does not
    /// mask this interrupt.
    pub fn handle_interrupt<S: NetStack<P::Buffer>>(&self, stack: &mut S) -> InterruptStatus {
        self.inner
            .try_with(|fec| fec.handle_interrupt(stack))
            .unwrap_or_default()
    }

    /// Submit a frame under the lock
    pub fn submit<S: NetStack<P::Buffer>>(&self, frame: F, stack: &mut S) -> Result<Transmit<F>> {
        self.inner.with(|fec| fec.submit(frame, stack))
    }

    /// Report a PHY link change under the lock
    pub fn on_link_event<D, S>(
        &self,
        link_up: bool,
        duplex: Duplex,
        delay: &mut D,
        stack: &mut S,
    ) -> LinkState
    where
        D: DelayNs,
        S: NetStack<P::Buffer>,
    {
        self.inner
            .with(|fec| fec.on_link_event(link_up, duplex, delay, stack))
    }
}
