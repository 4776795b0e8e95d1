//! Capability permission gate.
//!
//! The host reports the platform's authorization status for a capability
//! (camera, location) and gets back what to do next. A denial raises an
//! alert flag for the presentation layer to show; there is no retry.

/// Platform authorization status for a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// The user has not been asked yet.
    NotDetermined,
    /// Access is blocked by policy and cannot be requested.
    Restricted,
    /// The user refused access.
    Denied,
    /// Access granted.
    Authorized,
}

/// What the host should do after a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupAction {
    /// Start the capture session or feed.
    Setup,
    /// Prompt the user, then report the answer to [`PermissionGate::access_response`].
    RequestAccess,
    /// Do nothing.
    Skip,
}

/// Tracks the alert state for one capability.
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    alert: bool,
}

impl PermissionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what to do for the given authorization status.
    pub fn check(&mut self, status: AuthorizationStatus) -> SetupAction {
        match status {
            AuthorizationStatus::Authorized => SetupAction::Setup,
            AuthorizationStatus::NotDetermined => SetupAction::RequestAccess,
            AuthorizationStatus::Denied => {
                tracing::warn!("permission denied");
                self.alert = true;
                SetupAction::Skip
            }
            AuthorizationStatus::Restricted => SetupAction::Skip,
        }
    }

    /// Handle the user's answer to an access prompt.
    #[must_use]
    pub fn access_response(&self, granted: bool) -> SetupAction {
        if granted {
            SetupAction::Setup
        } else {
            SetupAction::Skip
        }
    }

    /// Whether the presentation layer should show a permission alert.
    #[must_use]
    pub fn alert(&self) -> bool {
        self.alert
    }

    /// Clear the alert once the user has seen it.
    pub fn dismiss_alert(&mut self) {
        self.alert = false;
    }
}
