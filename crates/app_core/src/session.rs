//! Authentication gate. A single enum carries both the flag and the user
//! record, so `is_authenticated()` and `user()` can never disagree.

use shared::{domain::User, error::AppError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(User),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a user is already signed in")]
    AlreadyAuthenticated,
    #[error("no user is signed in")]
    NotAuthenticated,
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        AppError::invalid_state(value.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Unauthenticated => None,
        }
    }

    pub(crate) fn ensure_signed_out(&self) -> Result<(), SessionError> {
        if self.is_authenticated() {
            Err(SessionError::AlreadyAuthenticated)
        } else {
            Ok(())
        }
    }

    pub(crate) fn sign_in(&mut self, user: User) -> Result<(), SessionError> {
        self.ensure_signed_out()?;
        self.state = SessionState::Authenticated(user);
        Ok(())
    }

    pub(crate) fn sign_out(&mut self) -> Result<User, SessionError> {
        match std::mem::take(&mut self.state) {
            SessionState::Authenticated(user) => Ok(user),
            SessionState::Unauthenticated => Err(SessionError::NotAuthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn sign_in_and_out_keep_flag_and_user_in_step() {
        let mut session = Session::new();
        session
            .sign_in(User::new("Анна", "anna@example.com"))
            .expect("sign in");
        assert!(session.is_authenticated());
        assert_eq!(session.user().map(|u| u.name.as_str()), Some("Анна"));

        let user = session.sign_out().expect("sign out");
        assert_eq!(user.email, "anna@example.com");
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn transitions_from_the_wrong_state_are_rejected() {
        let mut session = Session::new();
        assert_eq!(session.sign_out(), Err(SessionError::NotAuthenticated));

        session
            .sign_in(User::new("a", "a@example.com"))
            .expect("sign in");
        assert_eq!(
            session.sign_in(User::new("b", "b@example.com")),
            Err(SessionError::AlreadyAuthenticated)
        );
        assert_eq!(session.user().map(|u| u.name.as_str()), Some("a"));
    }
}
