//! Once-per-mount gating for the render setup.
//!
//! The host calls its after-render callback on every render. Only the
//! first call may start the setup; every later call is a no-op, including
//! after a failure.

/// Lifecycle of the one-shot setup for a single mounted component.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MountState {
    #[default]
    Pending,
    Running,
    Done,
    Failed(String),
}

/// Tracks whether the setup has been started for this mount.
#[derive(Debug, Default)]
pub struct MountHook {
    state: MountState,
}

impl MountHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the setup for this render callback.
    ///
    /// Returns true exactly once: on the first call with `first_render`
    /// set while still pending. A callback that is not the first render
    /// never starts the setup.
    pub fn begin(&mut self, first_render: bool) -> bool {
        if first_render && self.state == MountState::Pending {
            self.state = MountState::Running;
            true
        } else {
            false
        }
    }

    /// Records the outcome of the run started by [`MountHook::begin`].
    ///
    /// Ignored unless a run is in progress.
    pub fn finish<T, E: std::fmt::Display>(&mut self, result: &Result<T, E>) {
        if self.state != MountState::Running {
            return;
        }
        self.state = match result {
            Ok(_) => MountState::Done,
            Err(e) => MountState::Failed(e.to_string()),
        };
    }

    pub fn state(&self) -> &MountState {
        &self.state
    }
}
