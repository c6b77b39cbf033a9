//! Typed configuration store for a buffer pool
//!
//! `PoolConfig` holds the six recognized parameters from the data model:
//! `size`, `min_buffers`, `max_buffers`, `prefix`, `postfix`, `align`. It is
//! a plain value type — copying it is `Clone::clone`, and there is no
//! explicit `free()` operation because Rust's ownership model already frees
//! the store when it is dropped.

/// Pool configuration parameters.
///
/// # Examples
///
/// ```
/// use bufferpool::PoolConfig;
///
/// let cfg = PoolConfig::default()
///     .with_size(1400)
///     .with_min_buffers(4)
///     .with_align(8);
///
/// let (size, min, max, prefix, postfix, align) = cfg.get();
/// assert_eq!((size, min, max, prefix, postfix, align), (1400, 4, 0, 0, 0, 8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Payload bytes per buffer.
    pub size: usize,
    /// Buffers preallocated on activation.
    pub min_buffers: usize,
    /// Upper bound on buffers; `0` means unlimited.
    pub max_buffers: usize,
    /// Bytes reserved before the payload.
    pub prefix: usize,
    /// Bytes reserved after the payload.
    pub postfix: usize,
    /// Payload alignment; must be a power of two (`0` is normalized to `1`
    /// by the allocator, not here — see `allocator::normalize_align`).
    pub align: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: 0,
            min_buffers: 0,
            max_buffers: 0,
            prefix: 0,
            postfix: 0,
            align: 1,
        }
    }
}

impl PoolConfig {
    /// Write all six keys at once.
    pub fn set(
        &mut self,
        size: usize,
        min_buffers: usize,
        max_buffers: usize,
        prefix: usize,
        postfix: usize,
        align: usize,
    ) {
        self.size = size;
        self.min_buffers = min_buffers;
        self.max_buffers = max_buffers;
        self.prefix = prefix;
        self.postfix = postfix;
        self.align = align;
    }

    /// Read all six keys at once, matching `config_get`.
    #[must_use]
    pub fn get(&self) -> (usize, usize, usize, usize, usize, usize) {
        (
            self.size,
            self.min_buffers,
            self.max_buffers,
            self.prefix,
            self.postfix,
            self.align,
        )
    }

    /// Builder-style setter for `size`.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Builder-style setter for `min_buffers`.
    #[must_use]
    pub fn with_min_buffers(mut self, min_buffers: usize) -> Self {
        self.min_buffers = min_buffers;
        self
    }

    /// Builder-style setter for `max_buffers`.
    #[must_use]
    pub fn with_max_buffers(mut self, max_buffers: usize) -> Self {
        self.max_buffers = max_buffers;
        self
    }

    /// Builder-style setter for `prefix`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: usize) -> Self {
        self.prefix = prefix;
        self
    }

    /// Builder-style setter for `postfix`.
    #[must_use]
    pub fn with_postfix(mut self, postfix: usize) -> Self {
        self.postfix = postfix;
        self
    }

    /// Builder-style setter for `align`.
    #[must_use]
    pub fn with_align(mut self, align: usize) -> Self {
        self.align = align;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_defaults() {
        let cfg = PoolConfig::default();
        assert_eq!(cfg.get(), (0, 0, 0, 0, 0, 1));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut cfg = PoolConfig::default();
        cfg.set(1400, 2, 8, 4, 4, 16);
        assert_eq!(cfg.get(), (1400, 2, 8, 4, 4, 16));
    }

    #[test]
    fn builder_chain_round_trips() {
        let cfg = PoolConfig::default()
            .with_size(64)
            .with_min_buffers(4)
            .with_max_buffers(4)
            .with_align(8);
        assert_eq!(cfg.get(), (64, 4, 4, 0, 0, 8));
    }

    #[test]
    fn copy_is_a_deep_value_copy() {
        let cfg = PoolConfig::default().with_size(100);
        let copy = cfg;
        assert_eq!(cfg.get(), copy.get());
    }
}
