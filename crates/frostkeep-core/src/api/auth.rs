//! Authentication client for the backend's sign-in and identity endpoints.
//!
//! Tokens are never logged or displayed in full.

use serde::Deserialize;

use crate::api::types::{Credentials, User};
use crate::api::{ApiError, ApiResult, Backend, expect_json};

/// A freshly issued session: bearer token plus the normalized identity.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Client for `/auth/*` endpoints. Holds no session state; persistence is
/// the session's responsibility.
#[derive(Debug, Clone)]
pub struct AuthClient {
    backend: Backend,
}

impl AuthClient {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Exchanges credentials for a bearer token and user profile.
    ///
    /// Non-success statuses surface as auth/http errors carrying the body's
    /// `message` when present; responses missing a token or identity are
    /// rejected as parse errors.
    pub async fn sign_in(&self, credentials: &Credentials) -> ApiResult<AuthSession> {
        let raw: SignInResponse =
            expect_json(self.backend.post("/auth/signin").json(credentials)).await?;
        raw.normalize()
    }

    /// Fetches the identity behind a token ("who am I").
    ///
    /// Used to revalidate a rehydrated session at startup.
    pub async fn current_user(&self, token: &str) -> ApiResult<User> {
        let raw: SignInResponse =
            expect_json(self.backend.get("/auth/me").bearer_auth(token)).await?;
        let SignInResponse {
            id,
            username,
            email,
            roles,
            role,
            ..
        } = raw;
        normalize_user(id, username, email, roles, role)
    }
}

/// Raw sign-in payload. The backend prototypes disagree on the field names
/// (`token` vs `accessToken`, `roles[]` vs `role`), so everything is optional
/// here and checked in [`SignInResponse::normalize`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    id: Option<i64>,
    username: Option<String>,
    email: Option<String>,
    #[serde(default)]
    roles: Option<Vec<String>>,
    #[serde(default)]
    role: Option<String>,
}

impl SignInResponse {
    fn normalize(self) -> ApiResult<AuthSession> {
        let token = self
            .token
            .or(self.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::parse("Sign-in response is missing a token"))?;

        let user = normalize_user(self.id, self.username, self.email, self.roles, self.role)?;

        Ok(AuthSession { token, user })
    }
}

fn normalize_user(
    id: Option<i64>,
    username: Option<String>,
    email: Option<String>,
    roles: Option<Vec<String>>,
    role: Option<String>,
) -> ApiResult<User> {
    let id = id.ok_or_else(|| ApiError::parse("User payload is missing an id"))?;
    let username = username
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::parse("User payload is missing a username"))?;
    let email = email.unwrap_or_default();

    let roles = match (roles, role) {
        (Some(roles), _) if !roles.is_empty() => roles,
        (_, Some(role)) if !role.is_empty() => vec![qualify_role(&role)],
        _ => return Err(ApiError::parse("User payload carries no role information")),
    };

    Ok(User {
        id,
        username,
        email,
        roles,
    })
}

/// Coerces the single-`role` shape ("ADMIN") onto the `roles[]` convention
/// ("ROLE_ADMIN").
fn qualify_role(role: &str) -> String {
    if role.starts_with("ROLE_") {
        role.to_string()
    } else {
        format!("ROLE_{role}")
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}
