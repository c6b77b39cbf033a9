//! Reference-counted byte buffer
//!
//! `Buffer` satisfies exactly the contract the pool needs: a
//! queryable/mutable `data` pointer, a `size`, and a backing-allocation
//! pointer distinct from `data` to accommodate alignment slack. It does
//! not participate in format/caps negotiation or cross-process sharing.

use std::alloc::Layout;
use std::fmt;
use std::sync::Arc;

struct BufferInner {
    /// Raw allocation pointer as returned by the allocator, or null when
    /// `layout` is `None` (zero-size buffer).
    backing: *mut u8,
    /// Layout used to allocate `backing`, for `dealloc`. `None` for a
    /// zero-size buffer (nothing to free).
    layout: Option<Layout>,
    /// Payload pointer: `backing` advanced past alignment slack and
    /// `prefix` bytes. Equal to `backing` (null) for a zero-size buffer.
    data: *mut u8,
    /// Payload size in bytes (excludes prefix/postfix).
    size: usize,
}

// SAFETY: `BufferInner` owns its allocation exclusively (no aliasing pointer
// escapes this module without going through `Buffer`'s accessors), so it is
// safe to send/share the pointer across threads the same way `Vec<u8>` is.
unsafe impl Send for BufferInner {}
unsafe impl Sync for BufferInner {}

impl Drop for BufferInner {
    fn drop(&mut self) {
        if let Some(layout) = self.layout {
            // SAFETY: `backing` was allocated with this exact layout in
            // `allocator::alloc_buffer` and has not been freed yet (this is
            // the only `Drop` impl that frees it).
            unsafe { std::alloc::dealloc(self.backing, layout) };
        }
    }
}

/// A reference-counted, alignment-aware byte buffer.
///
/// Cloning a `Buffer` increments its reference count (`Arc` semantics); the
/// backing allocation is freed when the last clone is dropped.
#[derive(Clone)]
pub struct Buffer {
    inner: Arc<BufferInner>,
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("size", &self.size())
            .field("data", &self.data_ptr())
            .field("backing", &self.backing_ptr())
            .field("strong_count", &Arc::strong_count(&self.inner))
            .finish()
    }
}

impl Buffer {
    /// Construct a buffer from a raw allocation. `data` must lie within
    /// `[backing, backing + layout.size())` when `layout` is `Some`, and
    /// both must be null when `layout` is `None`.
    ///
    /// Used internally by `allocator::alloc_buffer`; exposed so a custom
    /// `PoolHooks::alloc_buffer` can build buffers with the same
    /// guarantees.
    #[must_use]
    pub(crate) fn from_raw_parts(
        backing: *mut u8,
        layout: Option<Layout>,
        data: *mut u8,
        size: usize,
    ) -> Self {
        Self {
            inner: Arc::new(BufferInner {
                backing,
                layout,
                data,
                size,
            }),
        }
    }

    /// A zero-size buffer with null `data`/`backing`, returned by the
    /// allocator when the computed layout has zero total size.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_raw_parts(std::ptr::null_mut(), None, std::ptr::null_mut(), 0)
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inner.size
    }

    /// Payload pointer. May be null for a zero-size buffer.
    #[must_use]
    pub fn data_ptr(&self) -> *mut u8 {
        self.inner.data
    }

    /// Backing-allocation pointer, distinct from `data_ptr()` whenever
    /// alignment padding or a `prefix` is configured. May be null for a
    /// zero-size buffer.
    #[must_use]
    pub fn backing_ptr(&self) -> *mut u8 {
        self.inner.backing
    }

    /// Borrow the payload as a shared slice.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is zero-size (`data_ptr()` is null); callers
    /// should check `size() == 0` first.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        if self.inner.size == 0 {
            return &[];
        }
        // SAFETY: `data` points to `size` initialized bytes for the
        // lifetime of `self` (the backing allocation outlives every clone
        // via the `Arc`).
        unsafe { std::slice::from_raw_parts(self.inner.data, self.inner.size) }
    }

    /// Borrow the payload as a mutable slice, if this is the sole owner.
    ///
    /// Returns `None` when other clones of this `Buffer` exist (mirrors
    /// `Arc::get_mut`), since a pool-issued buffer may be cloned by a
    /// `PoolHooks` implementation that tracks buffers separately from the
    /// caller that will mutate them.
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        if self.inner.size == 0 {
            return Some(&mut []);
        }
        let inner = Arc::get_mut(&mut self.inner)?;
        // SAFETY: `Arc::get_mut` proved unique ownership of `inner`, and
        // `data` points to `size` initialized bytes.
        Some(unsafe { std::slice::from_raw_parts_mut(inner.data, inner.size) })
    }

    /// Number of outstanding references to this buffer's storage.
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::alloc_buffer;
    use crate::config::PoolConfig;

    #[test]
    fn empty_buffer_has_null_pointers_and_zero_size() {
        let buf = Buffer::empty();
        assert_eq!(buf.size(), 0);
        assert!(buf.data_ptr().is_null());
        assert!(buf.backing_ptr().is_null());
        assert_eq!(buf.as_slice(), &[] as &[u8]);
    }

    #[test]
    fn clone_shares_storage_and_bumps_refcount() {
        let cfg = PoolConfig::default().with_size(16);
        let buf = alloc_buffer(&cfg).expect("alloc");
        assert_eq!(buf.strong_count(), 1);
        let clone = buf.clone();
        assert_eq!(buf.strong_count(), 2);
        assert_eq!(clone.data_ptr(), buf.data_ptr());
        drop(clone);
        assert_eq!(buf.strong_count(), 1);
    }

    #[test]
    fn mutable_access_requires_sole_ownership() {
        let cfg = PoolConfig::default().with_size(16);
        let mut buf = alloc_buffer(&cfg).expect("alloc");
        let clone = buf.clone();
        assert!(buf.as_mut_slice().is_none());
        drop(clone);
        assert!(buf.as_mut_slice().is_some());
    }

    #[test]
    fn mutation_is_visible_through_shared_view() {
        let cfg = PoolConfig::default().with_size(4);
        let mut buf = alloc_buffer(&cfg).expect("alloc");
        buf.as_mut_slice().expect("sole owner")[0] = 0xAB;
        assert_eq!(buf.as_slice()[0], 0xAB);
    }
}
