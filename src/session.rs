//! Per-screen authentication gate.
//!
//! Each screen owns one gate with one scope. Scopes never share credentials:
//! the site-admin password, a team's viewer password and a team's admin
//! password are entered and held separately.

use derive_more::Display;
use std::fmt;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum AuthScope {
    #[display(fmt = "site admin")]
    SiteAdmin,
    #[display(fmt = "team viewer")]
    TeamViewer,
    #[display(fmt = "team admin")]
    TeamAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Error(String),
}

impl AuthState {
    fn name(&self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::Authenticating => "authenticating",
            AuthState::Authenticated => "authenticated",
            AuthState::Error(_) => "error",
        }
    }
}

pub enum AuthEvent {
    Submit(String),
    Accepted,
    Rejected(String),
    SignOut,
}

impl AuthEvent {
    fn name(&self) -> &'static str {
        match self {
            AuthEvent::Submit(_) => "submit",
            AuthEvent::Accepted => "accepted",
            AuthEvent::Rejected(_) => "rejected",
            AuthEvent::SignOut => "sign out",
        }
    }
}

// Never print the submitted credential
impl fmt::Debug for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthEvent::Submit(_) => write!(f, "Submit(<redacted>)"),
            AuthEvent::Rejected(message) => write!(f, "Rejected({:?})", message),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display(fmt = "cannot {} a {} session while {}", event, scope, state)]
pub struct InvalidTransition {
    pub scope: AuthScope,
    pub event: &'static str,
    pub state: &'static str,
}

impl std::error::Error for InvalidTransition {}

/// The transition table. Pure; `AuthGate::apply` is the stateful wrapper.
pub fn transition(
    scope: AuthScope,
    state: &AuthState,
    event: &AuthEvent,
) -> Result<AuthState, InvalidTransition> {
    let next = match (state, event) {
        (AuthState::Unauthenticated, AuthEvent::Submit(_))
        | (AuthState::Error(_), AuthEvent::Submit(_)) => AuthState::Authenticating,
        (AuthState::Authenticating, AuthEvent::Accepted) => AuthState::Authenticated,
        (AuthState::Authenticating, AuthEvent::Rejected(message)) => {
            AuthState::Error(message.clone())
        }
        // Only the viewer screen can sign out
        (AuthState::Authenticated, AuthEvent::SignOut) if scope == AuthScope::TeamViewer => {
            AuthState::Unauthenticated
        }
        _ => {
            return Err(InvalidTransition {
                scope,
                event: event.name(),
                state: state.name(),
            })
        }
    };
    Ok(next)
}

pub struct AuthGate {
    scope: AuthScope,
    state: AuthState,
    pending: Option<String>,
    credential: Option<String>,
}

impl AuthGate {
    pub fn new(scope: AuthScope) -> Self {
        AuthGate {
            scope,
            state: AuthState::Unauthenticated,
            pending: None,
            credential: None,
        }
    }

    pub fn apply(&mut self, event: AuthEvent) -> Result<&AuthState, InvalidTransition> {
        let next = transition(self.scope, &self.state, &event)?;

        match event {
            AuthEvent::Submit(credential) => self.pending = Some(credential),
            AuthEvent::Accepted => self.credential = self.pending.take(),
            AuthEvent::Rejected(_) => self.pending = None,
            AuthEvent::SignOut => self.credential = None,
        }

        self.state = next;
        Ok(&self.state)
    }

    pub fn scope(&self) -> AuthScope {
        self.scope
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// Credential being checked while authenticating.
    pub fn pending_credential(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Credential to attach to requests. Only set once authenticated.
    pub fn credential(&self) -> Option<&str> {
        match self.state {
            AuthState::Authenticated => self.credential.as_deref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            AuthState::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("scope", &self.scope)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_keeps_the_credential() {
        let mut gate = AuthGate::new(AuthScope::SiteAdmin);
        assert_eq!(gate.credential(), None);

        gate.apply(AuthEvent::Submit("secret".into())).unwrap();
        assert_eq!(gate.state(), &AuthState::Authenticating);
        assert_eq!(gate.credential(), None);

        gate.apply(AuthEvent::Accepted).unwrap();
        assert!(gate.is_authenticated());
        assert_eq!(gate.credential(), Some("secret"));
    }

    #[test]
    fn rejection_then_resubmit() {
        let mut gate = AuthGate::new(AuthScope::TeamViewer);
        gate.apply(AuthEvent::Submit("wrong".into())).unwrap();
        gate.apply(AuthEvent::Rejected("Invalid team password".into())).unwrap();

        assert_eq!(gate.error(), Some("Invalid team password"));
        assert_eq!(gate.pending_credential(), None);

        gate.apply(AuthEvent::Submit("right".into())).unwrap();
        gate.apply(AuthEvent::Accepted).unwrap();
        assert_eq!(gate.credential(), Some("right"));
    }

    #[test]
    fn only_viewers_sign_out() {
        let mut viewer = AuthGate::new(AuthScope::TeamViewer);
        viewer.apply(AuthEvent::Submit("pw".into())).unwrap();
        viewer.apply(AuthEvent::Accepted).unwrap();
        viewer.apply(AuthEvent::SignOut).unwrap();
        assert_eq!(viewer.state(), &AuthState::Unauthenticated);
        assert_eq!(viewer.credential(), None);

        let mut admin = AuthGate::new(AuthScope::TeamAdmin);
        admin.apply(AuthEvent::Submit("pw".into())).unwrap();
        admin.apply(AuthEvent::Accepted).unwrap();
        let err = admin.apply(AuthEvent::SignOut).unwrap_err();
        assert_eq!(err.to_string(), "cannot sign out a team admin session while authenticated");
        assert!(admin.is_authenticated());
    }

    #[test]
    fn out_of_order_events_are_refused() {
        let state = AuthState::Unauthenticated;
        assert!(transition(AuthScope::SiteAdmin, &state, &AuthEvent::Accepted).is_err());
        assert!(transition(AuthScope::SiteAdmin, &AuthState::Authenticating, &AuthEvent::Submit("x".into())).is_err());
        assert!(transition(AuthScope::SiteAdmin, &AuthState::Authenticated, &AuthEvent::Submit("x".into())).is_err());
    }

    #[test]
    fn debug_output_hides_passwords() {
        let mut gate = AuthGate::new(AuthScope::TeamAdmin);
        gate.apply(AuthEvent::Submit("hunter2".into())).unwrap();

        assert!(!format!("{:?}", gate).contains("hunter2"));
        assert!(!format!("{:?}", AuthEvent::Submit("hunter2".into())).contains("hunter2"));
    }
}
