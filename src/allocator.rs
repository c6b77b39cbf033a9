//! Default buffer allocation
//!
//! Given configured `(size, prefix, postfix, align)`, allocates
//! `prefix + size + postfix + (align - 1)` raw bytes, aligns the payload
//! pointer up to `align`, and places the payload at `aligned + prefix` —
//! the extra `align - 1` bytes are slack to guarantee an aligned offset
//! exists somewhere in the allocation. `align == 0` is normalized to `1`
//! before doing arithmetic.

use std::alloc::{alloc, Layout};

use crate::buffer::Buffer;
use crate::config::PoolConfig;
use crate::error::{PoolError, Result};

/// Normalize a configured alignment: `0` becomes `1`; anything else must
/// already be a power of two for the alignment arithmetic to be valid.
#[must_use]
pub fn normalize_align(align: usize) -> usize {
    if align == 0 {
        1
    } else {
        align
    }
}

/// Allocate a buffer honoring `cfg`'s `size`, `prefix`, `postfix`, `align`.
///
/// # Errors
///
/// Returns `PoolError::AllocFailed` if the underlying allocator cannot
/// satisfy the computed layout, or if `align` (after normalization) is not
/// a power of two.
pub fn alloc_buffer(cfg: &PoolConfig) -> Result<Buffer> {
    let align = normalize_align(cfg.align);
    if !align.is_power_of_two() {
        return Err(PoolError::AllocFailed(format!(
            "align {align} is not a power of two"
        )));
    }

    let slack = align - 1;
    let total = cfg
        .prefix
        .checked_add(cfg.size)
        .and_then(|v| v.checked_add(cfg.postfix))
        .and_then(|v| v.checked_add(slack))
        .ok_or_else(|| PoolError::AllocFailed("buffer layout overflows usize".to_string()))?;

    if total == 0 {
        return Ok(Buffer::empty());
    }

    let layout = Layout::from_size_align(total, align.max(1))
        .map_err(|e| PoolError::AllocFailed(e.to_string()))?;

    // SAFETY: `layout` has non-zero size (checked above).
    let raw = unsafe { alloc(layout) };
    if raw.is_null() {
        return Err(PoolError::AllocFailed(format!(
            "allocator returned null for {total} bytes"
        )));
    }

    // SAFETY: `raw` is valid for `total` bytes; `(raw as usize + slack) &
    // !slack` lies within `[raw, raw + slack]` and therefore within the
    // allocation.
    let aligned = {
        let addr = raw as usize;
        let aligned_addr = addr.wrapping_add(slack) & !slack;
        unsafe { raw.add(aligned_addr - addr) }
    };

    // SAFETY: `aligned + prefix` lies within `[aligned, aligned + slack +
    // size + postfix]`, which is within the allocation since
    // `total = prefix + size + postfix + slack`.
    let data = unsafe { aligned.add(cfg.prefix) };

    Ok(Buffer::from_raw_parts(raw, Some(layout), data, cfg.size))
}

/// Release a buffer's outer reference. The backing allocation is freed
/// when the last reference drops (see `buffer::BufferInner`'s `Drop`).
///
/// Takes `buffer` by value so the caller cannot accidentally keep using it
/// after "freeing" it — mirrors `default_free_buffer`'s `gst_buffer_unref`.
pub fn free_buffer(buffer: Buffer) {
    drop(buffer);
}
