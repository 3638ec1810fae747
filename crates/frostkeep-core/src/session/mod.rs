//! Session state machine.
//!
//! One `Session` instance per process, constructed in `main` and passed by
//! reference to whatever needs it. It owns the token store; nothing else
//! writes there. Phases move `Initializing -> {Authenticated |
//! Unauthenticated}` once at startup, then only `login`/`logout` (or a 401
//! from a protected call) move between the two settled phases.

pub mod store;

use anyhow::{Context, Result};

use crate::api::auth::AuthClient;
use crate::api::types::{Credentials, User};
use crate::api::{ApiError, ApiErrorKind};
use store::{PersistedSession, SessionStore};

/// Coarse session phase, for route decisions and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup rehydration has not finished yet.
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// Internal state. The user/token pair lives only inside `Authenticated`,
/// so "both present or both absent" holds structurally.
#[derive(Debug, Clone)]
enum State {
    Initializing,
    Unauthenticated,
    Authenticated { user: User, token: String },
}

/// The in-memory session, synchronized with the token store.
#[derive(Debug)]
pub struct Session {
    state: State,
    store: SessionStore,
}

impl Session {
    /// Creates a session in the `Initializing` phase.
    pub fn new(store: SessionStore) -> Self {
        Self {
            state: State::Initializing,
            store,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Initializing => SessionPhase::Initializing,
            State::Unauthenticated => SessionPhase::Unauthenticated,
            State::Authenticated { .. } => SessionPhase::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, State::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            State::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            State::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Rehydrates the session from the token store.
    ///
    /// Must run to completion before the first route decision. A persisted
    /// record is revalidated against the backend; a rejected token clears
    /// the store, while a transport failure keeps the session (the backend
    /// being unreachable says nothing about token validity). An absent or
    /// unreadable record leaves the store cleared.
    pub async fn initialize(&mut self, auth: &AuthClient) {
        let Some(record) = self.store.load() else {
            // Drop any partial or unreadable record so the next boot starts clean.
            if let Err(err) = self.store.clear() {
                tracing::warn!("could not clear stored session: {err:#}");
            }
            self.state = State::Unauthenticated;
            return;
        };

        match auth.current_user(&record.token).await {
            Ok(user) => {
                tracing::debug!(username = %user.username, "restored session");
                if user != record.user {
                    // Keep the persisted profile in sync with the backend.
                    let refreshed = PersistedSession {
                        token: record.token.clone(),
                        user: user.clone(),
                    };
                    if let Err(err) = self.store.save(&refreshed) {
                        tracing::warn!("could not refresh stored session: {err:#}");
                    }
                }
                self.state = State::Authenticated {
                    user,
                    token: record.token,
                };
            }
            Err(err) if err.kind == ApiErrorKind::Auth => {
                tracing::info!("stored session rejected by the backend; signing out");
                if let Err(err) = self.store.clear() {
                    tracing::warn!("could not clear stored session: {err:#}");
                }
                self.state = State::Unauthenticated;
            }
            Err(err) => {
                tracing::warn!("could not revalidate stored session ({err}); keeping it");
                self.state = State::Authenticated {
                    user: record.user,
                    token: record.token,
                };
            }
        }
    }

    /// Signs in. Memory and store are both committed before this returns
    /// success; on failure neither changes and the error surfaces to the
    /// caller for display.
    ///
    /// Calling this while already authenticated re-enters with the new
    /// identity (last write wins).
    pub async fn login(&mut self, auth: &AuthClient, credentials: &Credentials) -> Result<User> {
        let auth_session = auth.sign_in(credentials).await?;

        self.store
            .save(&PersistedSession {
                token: auth_session.token.clone(),
                user: auth_session.user.clone(),
            })
            .context("persist session")?;

        tracing::info!(username = %auth_session.user.username, "signed in");
        self.state = State::Authenticated {
            user: auth_session.user.clone(),
            token: auth_session.token,
        };

        Ok(auth_session.user)
    }

    /// Signs out and clears the store. Idempotent.
    pub fn logout(&mut self) -> Result<()> {
        self.state = State::Unauthenticated;
        self.store.clear().context("clear stored session")?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Reacts to a failed protected call: a 401 means the session expired
    /// server-side, which forces a logout. Returns true when that happened.
    ///
    /// Non-401 errors and errors arriving after a logout (stale in-flight
    /// responses) leave the state untouched.
    pub fn handle_unauthorized(&mut self, err: &ApiError) -> bool {
        if !err.is_unauthorized() || !self.is_authenticated() {
            return false;
        }
        tracing::info!("session expired server-side; signing out");
        self.state = State::Unauthenticated;
        if let Err(err) = self.store.clear() {
            tracing::warn!("could not clear stored session: {err:#}");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use tempfile::{TempDir, tempdir};
    use wiremock::matchers::{body_json_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::Backend;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "admin".to_string(),
            email: "a@x.com".to_string(),
            roles: vec!["ROLE_ADMIN".to_string()],
        }
    }

    fn session_in(dir: &TempDir) -> Session {
        Session::new(SessionStore::at(dir.path().join("session.json")))
    }

    fn seeded_session_in(dir: &TempDir, token: &str) -> Session {
        let store = SessionStore::at(dir.path().join("session.json"));
        store
            .save(&PersistedSession {
                token: token.to_string(),
                user: sample_user(),
            })
            .unwrap();
        Session::new(store)
    }

    fn auth_client(server: &MockServer) -> AuthClient {
        AuthClient::new(Backend::new(server.uri()))
    }

    const ME_BODY: &str =
        r#"{"id":1,"username":"admin","email":"a@x.com","roles":["ROLE_ADMIN"]}"#;

    /// Startup with an empty store lands in Unauthenticated.
    #[tokio::test]
    async fn test_initialize_empty_store() {
        let dir = tempdir().unwrap();
        let server = MockServer::start().await;
        let mut session = session_in(&dir);

        assert_eq!(session.phase(), SessionPhase::Initializing);
        session.initialize(&auth_client(&server)).await;

        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert_eq!(session.user(), None);
        assert_eq!(session.token(), None);
    }

    /// Startup with a malformed record lands in Unauthenticated and leaves
    /// the store cleared.
    #[tokio::test]
    async fn test_initialize_malformed_record_clears_store() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("session.json");
        std::fs::write(&store_path, "{corrupt").unwrap();
        let server = MockServer::start().await;

        let mut session = Session::new(SessionStore::at(store_path.clone()));
        session.initialize(&auth_client(&server)).await;

        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(!store_path.exists());
    }

    /// Startup with a well-formed record reaches Authenticated with the
    /// persisted identity.
    #[tokio::test]
    async fn test_initialize_restores_session() {
        let dir = tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ME_BODY))
            .mount(&server)
            .await;

        let mut session = seeded_session_in(&dir, "stored-token");
        session.initialize(&auth_client(&server)).await;

        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert_eq!(session.token(), Some("stored-token"));
        assert_eq!(session.user().unwrap().username, "admin");
    }

    /// A token the backend rejects clears the store and signs out.
    #[tokio::test]
    async fn test_initialize_rejected_token_clears_store() {
        let dir = tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"message":"Token expired"}"#),
            )
            .mount(&server)
            .await;

        let mut session = seeded_session_in(&dir, "stale-token");
        session.initialize(&auth_client(&server)).await;

        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(!dir.path().join("session.json").exists());
    }

    /// An unreachable backend keeps the persisted session.
    #[tokio::test]
    async fn test_initialize_unreachable_backend_keeps_session() {
        let dir = tempdir().unwrap();
        let mut session = seeded_session_in(&dir, "stored-token");

        // Nothing listens on this port.
        let auth = AuthClient::new(Backend::new("http://127.0.0.1:9/api"));
        session.initialize(&auth).await;

        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert_eq!(session.token(), Some("stored-token"));
    }

    /// Successful login commits memory and store before returning.
    #[tokio::test]
    async fn test_login_success() {
        let dir = tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signin"))
            .and(body_json_string(
                r#"{"username":"admin","password":"admin123"}"#,
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"token":"abc","id":1,"username":"admin","email":"a@x.com","roles":["ROLE_ADMIN"]}"#,
            ))
            .mount(&server)
            .await;

        let mut session = session_in(&dir);
        session.initialize(&auth_client(&server)).await;

        let user = session
            .login(
                &auth_client(&server),
                &Credentials {
                    username: "admin".to_string(),
                    password: "admin123".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(user.roles.contains(&"ROLE_ADMIN".to_string()));
        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert_eq!(session.token(), Some("abc"));

        let stored = SessionStore::at(dir.path().join("session.json"))
            .load()
            .unwrap();
        assert_eq!(stored.token, "abc");
        assert_eq!(stored.user.username, "admin");
    }

    /// Rejected credentials leave state and store untouched and surface the
    /// backend's message.
    #[tokio::test]
    async fn test_login_rejected_leaves_state_unchanged() {
        let dir = tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signin"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"message":"Bad credentials"}"#),
            )
            .mount(&server)
            .await;

        let mut session = session_in(&dir);
        session.initialize(&auth_client(&server)).await;

        let err = session
            .login(
                &auth_client(&server),
                &Credentials {
                    username: "user".to_string(),
                    password: "wrong".to_string(),
                },
            )
            .await
            .unwrap_err();

        let api_err = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api_err.kind, ApiErrorKind::Auth);
        assert_eq!(api_err.message, "Bad credentials");
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(!dir.path().join("session.json").exists());
    }

    /// Logout always lands in Unauthenticated with the store cleared.
    #[tokio::test]
    async fn test_logout_clears_store() {
        let dir = tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ME_BODY))
            .mount(&server)
            .await;

        let mut session = seeded_session_in(&dir, "stored-token");
        session.initialize(&auth_client(&server)).await;
        assert!(session.is_authenticated());

        session.logout().unwrap();

        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(!dir.path().join("session.json").exists());
        // Idempotent.
        session.logout().unwrap();
    }

    /// A 401 from a protected call forces a logout; other failures don't.
    #[tokio::test]
    async fn test_handle_unauthorized() {
        let dir = tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ME_BODY))
            .mount(&server)
            .await;

        let mut session = seeded_session_in(&dir, "stored-token");
        session.initialize(&auth_client(&server)).await;

        let server_error = ApiError::http_status(500, "");
        assert!(!session.handle_unauthorized(&server_error));
        assert!(session.is_authenticated());

        let expired = ApiError::http_status(401, r#"{"message":"Token expired"}"#);
        assert!(session.handle_unauthorized(&expired));
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(!dir.path().join("session.json").exists());

        // Stale responses after the logout are ignored.
        assert!(!session.handle_unauthorized(&expired));
    }
}
