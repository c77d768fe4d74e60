use tracing::{debug, info};

/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseState {
    Open,
    ConfirmPending,
    Closing,
    Closed,
}

/// What reaching `Closed` means for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosePolicy {
    #[default]
    TerminateProcess,
    DisposeWindow,
}

/// Invoked by the coordinator on reaching `Closed`.
pub trait AppLifecycle {
    fn terminate(&mut self);
    fn restart(&mut self);
}

/// A dialog dismissed without choosing counts as `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

/// Close/confirmation state machine. The presentation layer renders the
/// prompt and feeds the answer back via [`CloseCoordinator::confirm`]; an
/// observer callback is notified on every transition.
pub struct CloseCoordinator {
    state: CloseState,
    policy: ClosePolicy,
    observer: Option<Box<dyn FnMut(CloseState)>>,
}

impl std::fmt::Debug for CloseCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseCoordinator")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CloseCoordinator {
    pub fn new(policy: ClosePolicy) -> Self {
        Self {
            state: CloseState::Open,
            policy,
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: impl FnMut(CloseState) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn state(&self) -> CloseState {
        self.state
    }

    pub fn policy(&self) -> ClosePolicy {
        self.policy
    }

    /// With every task done the window closes immediately; otherwise a
    /// confirmation is requested. Requests while a confirmation is pending
    /// or after closing began are ignored.
    #[tracing::instrument(skip(self))]
    pub fn request_close(&mut self, all_done: bool) -> CloseState {
        match self.state {
            CloseState::Open => {
                if all_done {
                    self.transition(CloseState::Closing);
                } else {
                    self.transition(CloseState::ConfirmPending);
                }
            }
            CloseState::ConfirmPending => {
                debug!("close requested while confirmation pending; ignored");
            }
            CloseState::Closing | CloseState::Closed => {
                debug!("close requested after closing began; ignored");
            }
        }
        self.state
    }

    /// Ignored outside `ConfirmPending`.
    #[tracing::instrument(skip(self))]
    pub fn confirm(&mut self, answer: Confirmation) -> CloseState {
        if self.state == CloseState::ConfirmPending {
            match answer {
                Confirmation::Yes => self.transition(CloseState::Closing),
                Confirmation::No => self.transition(CloseState::Open),
            }
        } else {
            debug!(state = ?self.state, "confirmation received outside prompt; ignored");
        }
        self.state
    }

    /// Called after each task update. When the last task completes while
    /// the window is open, closing starts with no prompt.
    #[tracing::instrument(skip(self))]
    pub fn task_completed(&mut self, all_done: bool) -> CloseState {
        if self.state == CloseState::Open && all_done {
            info!("all tasks done; closing without prompt");
            self.transition(CloseState::Closing);
        }
        self.state
    }

    /// Transitions to `Closed` and applies the configured policy.
    #[tracing::instrument(skip(self, lifecycle))]
    pub fn finish_teardown(&mut self, lifecycle: &mut dyn AppLifecycle) -> CloseState {
        if self.state == CloseState::Closing {
            self.transition(CloseState::Closed);
            match self.policy {
                ClosePolicy::TerminateProcess => lifecycle.terminate(),
                ClosePolicy::DisposeWindow => {
                    debug!("window disposed; process stays alive");
                }
            }
        } else {
            debug!(state = ?self.state, "teardown reported outside closing; ignored");
        }
        self.state
    }

    fn transition(&mut self, next: CloseState) {
        debug!(from = ?self.state, to = ?next, "close state transition");
        self.state = next;
        if let Some(observer) = &mut self.observer {
            observer(next);
        }
    }
}
