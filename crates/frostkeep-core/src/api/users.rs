//! Client for the `/users` administration endpoints.

use crate::api::types::{CreateUserRequest, UserAccount};
use crate::api::{ApiResult, Backend, expect_json, expect_ok};

/// Authenticated client for account administration. Every operation except
/// reading one's own account requires the administrator role server-side.
#[derive(Debug, Clone)]
pub struct UsersClient {
    backend: Backend,
    token: String,
}

impl UsersClient {
    pub fn new(backend: Backend, token: impl Into<String>) -> Self {
        Self {
            backend,
            token: token.into(),
        }
    }

    pub async fn list(&self) -> ApiResult<Vec<UserAccount>> {
        expect_json(self.backend.get("/users").bearer_auth(&self.token)).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<UserAccount> {
        expect_json(
            self.backend
                .get(&format!("/users/{id}"))
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn create(&self, request: &CreateUserRequest) -> ApiResult<UserAccount> {
        expect_json(
            self.backend
                .post("/users")
                .json(request)
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn update(&self, id: i64, account: &UserAccount) -> ApiResult<UserAccount> {
        expect_json(
            self.backend
                .put(&format!("/users/{id}"))
                .json(account)
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        expect_ok(
            self.backend
                .delete(&format!("/users/{id}"))
                .bearer_auth(&self.token),
        )
        .await
    }
}
