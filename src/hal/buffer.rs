//! Frame buffers and DMA mapping
//!
//! The driver never allocates on its own: receive slot buffers, transmit
//! bounce buffers and delivered frames all come from a [`BufferPool`]
//! supplied by the platform. The pool also owns the DMA mapping policy
//! (address translation and cache maintenance).

/// Direction of a DMA mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaDirection {
    /// CPU writes, controller reads (transmit)
    ToDevice,
    /// Controller writes, CPU reads (receive)
    FromDevice,
}

/// Source of frame buffers and DMA mappings.
///
/// # Example
///
/// ```ignore
/// struct SramPool { /* free list over a DMA-capable region */ }
///
/// impl BufferPool for SramPool {
///     type Buffer = SramBuf;
///
///     fn alloc(&mut self, len: usize) -> Option<SramBuf> {
///         self.take(len)
///     }
///
///     fn map(&mut self, data: &[u8], dir: DmaDirection) -> u32 {
///         cache::clean_or_invalidate(data, dir);
///         phys_addr(data)
///     }
/// }
/// ```
pub trait BufferPool {
    /// Owned buffer handed out by the pool; dropping it returns it.
    type Buffer: AsRef<[u8]> + AsMut<[u8]>;

    /// Allocate a buffer of exactly `len` bytes, 16-byte aligned, or `None`
    /// when the pool is exhausted.
    fn alloc(&mut self, len: usize) -> Option<Self::Buffer>;

    /// Make `data` visible to the controller and return its bus address.
    ///
    /// The default is an identity mapping for cache-coherent systems with a
    /// 32-bit address space.
    fn map(&mut self, data: &[u8], dir: DmaDirection) -> u32 {
        let _ = dir;
        data.as_ptr() as usize as u32
    }

    /// Release a mapping created by [`map`](Self::map).
    fn unmap(&mut self, addr: u32, len: usize, dir: DmaDirection) {
        let _ = (addr, len, dir);
    }
}

/// Outbound frame retained by the transmit ring until the controller is done
/// with it.
///
/// Dropping the frame releases it back to its owner.
///
/// The bytes are mapped from the slot that holds the frame, so they must not
/// move while it sits in the ring. Heap and `'static` frames satisfy this on
/// their own; inline arrays do because the device does not move once open.
pub trait TxFrame: AsRef<[u8]> {
    /// Ask the controller to capture a transmit timestamp
    fn wants_timestamp(&self) -> bool {
        false
    }
}

impl TxFrame for &'static [u8] {}

impl<const N: usize> TxFrame for [u8; N] {}

#[cfg(feature = "alloc")]
impl TxFrame for alloc::vec::Vec<u8> {}

#[cfg(feature = "alloc")]
impl TxFrame for alloc::boxed::Box<[u8]> {}

// =============================================================================
// Heap Pool
// =============================================================================

#[cfg(feature = "alloc")]
pub use heap::{HeapBuffer, HeapPool};

#[cfg(feature = "alloc")]
mod heap {
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    use super::BufferPool;

    #[derive(Clone, Copy)]
    #[repr(C, align(16))]
    struct Chunk([u8; 16]);

    /// 16-byte aligned heap buffer
    pub struct HeapBuffer {
        chunks: Box<[Chunk]>,
        len: usize,
    }

    impl AsRef<[u8]> for HeapBuffer {
        fn as_ref(&self) -> &[u8] {
            // SAFETY: `chunks` holds at least `len` initialized bytes
            unsafe { core::slice::from_raw_parts(self.chunks.as_ptr().cast::<u8>(), self.len) }
        }
    }

    impl AsMut<[u8]> for HeapBuffer {
        fn as_mut(&mut self) -> &mut [u8] {
            // SAFETY: `chunks` holds at least `len` initialized bytes
            unsafe {
                core::slice::from_raw_parts_mut(self.chunks.as_mut_ptr().cast::<u8>(), self.len)
            }
        }
    }

    /// Buffer pool backed by the global allocator, with identity DMA mapping.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct HeapPool;

    impl BufferPool for HeapPool {
        type Buffer = HeapBuffer;

        fn alloc(&mut self, len: usize) -> Option<HeapBuffer> {
            let count = len.div_ceil(16);
            let mut chunks = Vec::new();
            chunks.try_reserve_exact(count).ok()?;
            chunks.resize(count, Chunk([0; 16]));
            Some(HeapBuffer {
                chunks: chunks.into_boxed_slice(),
                len,
            })
        }
    }
}
