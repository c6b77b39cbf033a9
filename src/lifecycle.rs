//! State machine over `(configured, active, flushing)`
//!
//! Four observable states result from the two persistent flags plus the
//! out-of-band `flushing` bit. This module holds the pure state-transition
//! predicates; the actual transitions — which must also drive the free
//! list, the allocator, and the subclass hooks — are orchestrated by
//! `Pool` under its reentrant lock rather than by a separate controller
//! object.

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No successful `set_config` call yet.
    Unconfigured,
    /// Configured but not serving acquisitions.
    Configured,
    /// Configured and serving acquisitions.
    Active,
    /// Deactivation in progress; acquisitions are refused until the last
    /// outstanding buffer is released and the free list drains.
    Draining,
}

/// The two persistent boolean flags the lock protects. `flushing` is
/// tracked separately as an `AtomicBool` on `Pool` so the acquire fast path
/// can read it without taking the lock.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LifecycleFlags {
    pub configured: bool,
    pub active: bool,
}

impl LifecycleFlags {
    /// Resolve the observable lifecycle state from the two flags plus the
    /// out-of-band `flushing` bit.
    #[must_use]
    pub fn state(&self, flushing: bool) -> LifecycleState {
        match (self.configured, self.active, flushing) {
            (false, _, _) => LifecycleState::Unconfigured,
            (true, false, _) => LifecycleState::Configured,
            (true, true, false) => LifecycleState::Active,
            (true, true, true) => LifecycleState::Draining,
        }
    }

    /// `set_config` succeeds only when the pool is inactive and no
    /// buffers are outstanding, so a reconfiguration can never invalidate
    /// a buffer a caller is still holding.
    #[must_use]
    pub fn can_configure(&self, outstanding: usize) -> bool {
        !self.active && outstanding == 0
    }

    /// Activation requires prior configuration: `set_active(true)` before
    /// any successful `set_config` call fails rather than activating with
    /// default (empty, zero-size) parameters.
    #[must_use]
    pub fn can_activate(&self) -> bool {
        self.configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_flags_are_unconfigured() {
        let flags = LifecycleFlags::default();
        assert_eq!(flags.state(false), LifecycleState::Unconfigured);
    }

    #[test]
    fn configured_inactive_is_configured_state() {
        let flags = LifecycleFlags {
            configured: true,
            active: false,
        };
        assert_eq!(flags.state(false), LifecycleState::Configured);
    }

    #[test]
    fn configured_active_not_flushing_is_active_state() {
        let flags = LifecycleFlags {
            configured: true,
            active: true,
        };
        assert_eq!(flags.state(false), LifecycleState::Active);
    }

    #[test]
    fn configured_active_flushing_is_draining_state() {
        let flags = LifecycleFlags {
            configured: true,
            active: true,
        };
        assert_eq!(flags.state(true), LifecycleState::Draining);
    }

    #[test]
    fn configure_guard_rejects_while_active_or_outstanding() {
        let active = LifecycleFlags {
            configured: true,
            active: true,
        };
        assert!(!active.can_configure(0));

        let inactive = LifecycleFlags {
            configured: true,
            active: false,
        };
        assert!(!inactive.can_configure(1));
        assert!(inactive.can_configure(0));
    }

    #[test]
    fn activate_requires_prior_configuration() {
        assert!(!LifecycleFlags::default().can_activate());
        let configured = LifecycleFlags {
            configured: true,
            active: false,
        };
        assert!(configured.can_activate());
    }
}
