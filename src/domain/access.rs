//! Capability checks for guarded screens.

use super::entities::{Role, User};

/// What a screen demands of the signed-in user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Any signed-in user, no role required.
    Authenticated,
    User,
    Admin,
    Warehouse,
}

impl Capability {
    pub fn permits(&self, role: Role) -> bool {
        match self {
            Capability::Authenticated | Capability::User => true,
            Capability::Admin => role == Role::Admin,
            Capability::Warehouse => role == Role::Warehouse,
        }
    }
}

/// Who is using the app right now.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    /// The identity provider has not answered yet.
    #[default]
    Resolving,
    SignedOut,
    SignedIn(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self, SessionState::Resolving)
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }

    /// Whether the current user could open a screen guarded by `capability`.
    pub fn allows(&self, capability: Capability) -> bool {
        self.role().is_some_and(|role| capability.permits(role))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redirect {
    SignIn,
    Landing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a placeholder and decide once the identity resolves.
    Pending,
    Render,
    Redirect(Redirect),
}

pub fn evaluate(capability: Capability, session: &SessionState) -> GuardDecision {
    match session {
        SessionState::Resolving => GuardDecision::Pending,
        SessionState::SignedOut => GuardDecision::Redirect(Redirect::SignIn),
        SessionState::SignedIn(user) if capability.permits(user.role) => GuardDecision::Render,
        SessionState::SignedIn(_) => GuardDecision::Redirect(Redirect::Landing),
    }
}
