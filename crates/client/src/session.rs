//! Current session, passed explicitly to the views that need it.
//!
//! [`SessionContext`] owns the session and fans out [`AuthEvent`]s over a
//! `tokio::sync::broadcast` channel so any number of subscribers see every
//! sign-in and sign-out.

use careerkey_core::types::DbId;
use tokio::sync::{broadcast, watch};

use crate::backend::{Backend, Session, SignUpForm};
use crate::error::ClientError;

/// Buffer capacity for the auth event channel.
const EVENT_CAPACITY: usize = 16;

/// Published whenever the current session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { user_id: DbId },
    SignedOut,
}

pub struct SessionContext {
    current: watch::Sender<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            current: watch::Sender::new(None),
            events,
        }
    }

    /// The current session, if signed in.
    pub fn session(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// Bearer token of the current session.
    pub fn access_token(&self) -> Result<String, ClientError> {
        self.current
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .ok_or(ClientError::Unauthenticated)
    }

    /// Receive every subsequent [`AuthEvent`].
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Install a session and announce the sign-in.
    pub fn set_session(&self, session: Session) {
        let user_id = session.user.id;
        self.current.send_replace(Some(session));
        // No subscribers is not an error.
        let _ = self.events.send(AuthEvent::SignedIn { user_id });
    }

    /// Drop the session. Announces the sign-out only if one was present.
    pub fn clear(&self) {
        if self.current.send_replace(None).is_some() {
            let _ = self.events.send(AuthEvent::SignedOut);
        }
    }

    /// Register and sign in.
    pub async fn sign_up<B>(&self, backend: &B, form: &SignUpForm) -> Result<Session, ClientError>
    where
        B: Backend + ?Sized,
    {
        let session = backend.sign_up(form).await?;
        tracing::info!(user_id = %session.user.id, role = %form.role, "Signed up");
        self.set_session(session.clone());
        Ok(session)
    }

    pub async fn sign_in<B>(
        &self,
        backend: &B,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError>
    where
        B: Backend + ?Sized,
    {
        let session = backend.sign_in(email, password).await?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.set_session(session.clone());
        Ok(session)
    }

    /// Revoke the session remotely and drop it locally.
    ///
    /// The local session is dropped even when the remote call fails.
    pub async fn sign_out<B>(&self, backend: &B) -> Result<(), ClientError>
    where
        B: Backend + ?Sized,
    {
        let Ok(token) = self.access_token() else {
            return Ok(());
        };
        let result = backend.sign_out(&token).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Remote sign-out failed");
        }
        self.clear();
        result
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use careerkey_core::profile::SignupMetadata;
    use careerkey_core::roles::Role;
    use uuid::Uuid;

    use super::*;
    use crate::backend::SessionUser;

    pub(crate) fn session_for(user_id: DbId) -> Session {
        Session {
            access_token: format!("access-{user_id}"),
            refresh_token: "refresh".to_string(),
            expires_in: 900,
            user: SessionUser {
                id: user_id,
                email: "jordan@utk.edu".to_string(),
                metadata: SignupMetadata::new(Role::Student, Some("Jordan")),
            },
        }
    }

    #[test]
    fn starts_signed_out() {
        let ctx = SessionContext::new();
        assert!(ctx.session().is_none());
        assert!(matches!(ctx.access_token(), Err(ClientError::Unauthenticated)));
    }

    #[tokio::test]
    async fn publishes_sign_in_and_sign_out() {
        let ctx = SessionContext::new();
        let mut events = ctx.subscribe();
        let user_id = Uuid::new_v4();

        ctx.set_session(session_for(user_id));
        assert_eq!(ctx.access_token().unwrap(), format!("access-{user_id}"));
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedIn { user_id });

        ctx.clear();
        assert!(ctx.session().is_none());
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedOut);
    }

    #[test]
    fn clearing_without_session_is_silent() {
        let ctx = SessionContext::new();
        let mut events = ctx.subscribe();

        ctx.clear();
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn sign_out_drops_session_even_when_remote_fails() {
        let backend = crate::fake::FakeBackend::default();
        backend.fail("sign_out", "network down");
        let ctx = SessionContext::new();
        ctx.set_session(session_for(Uuid::new_v4()));
        let mut events = ctx.subscribe();

        let result = ctx.sign_out(&backend).await;

        assert!(result.is_err());
        assert!(ctx.session().is_none());
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedOut);
        assert_eq!(backend.calls(), ["sign_out"]);
    }

    #[tokio::test]
    async fn sign_out_without_session_makes_no_call() {
        let backend = crate::fake::FakeBackend::default();
        let ctx = SessionContext::new();

        ctx.sign_out(&backend).await.unwrap();

        assert!(backend.calls().is_empty());
    }
}
