//! Client for the `/categories` endpoints.
//!
//! Reads are open to every authenticated user; create/update/delete are
//! restricted to administrators server-side (and gated in the client UI).

use crate::api::types::{Category, CategoryPayload};
use crate::api::{ApiResult, Backend, expect_json, expect_ok};

#[derive(Debug, Clone)]
pub struct CategoriesClient {
    backend: Backend,
    token: String,
}

impl CategoriesClient {
    pub fn new(backend: Backend, token: impl Into<String>) -> Self {
        Self {
            backend,
            token: token.into(),
        }
    }

    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        expect_json(self.backend.get("/categories").bearer_auth(&self.token)).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Category> {
        expect_json(
            self.backend
                .get(&format!("/categories/{id}"))
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn by_name(&self, name: &str) -> ApiResult<Category> {
        expect_json(
            self.backend
                .get(&format!("/categories/name/{name}"))
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn create(&self, payload: &CategoryPayload) -> ApiResult<Category> {
        expect_json(
            self.backend
                .post("/categories")
                .json(payload)
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn update(&self, id: i64, payload: &CategoryPayload) -> ApiResult<Category> {
        expect_json(
            self.backend
                .put(&format!("/categories/{id}"))
                .json(payload)
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        expect_ok(
            self.backend
                .delete(&format!("/categories/{id}"))
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn exists(&self, id: i64) -> ApiResult<bool> {
        expect_json(
            self.backend
                .get(&format!("/categories/{id}/exists"))
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn name_exists(&self, name: &str) -> ApiResult<bool> {
        expect_json(
            self.backend
                .get(&format!("/categories/name/{name}/exists"))
                .bearer_auth(&self.token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn json_response(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/json")
            .set_body_string(body.to_string())
    }

    /// Categories parse with their quantity constraints.
    #[tokio::test]
    async fn test_by_name_parses_constraints() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/name/Fleisch"))
            .respond_with(json_response(
                r#"{"id":1,"name":"Fleisch","icon":"🥩","defaultUnit":"kg","unitStep":0.5,"minValue":0.0,"maxValue":50.0}"#,
            ))
            .mount(&server)
            .await;

        let client = CategoriesClient::new(Backend::new(server.uri()), "tok");
        let category = client.by_name("Fleisch").await.unwrap();
        assert_eq!(category.id, 1);
        assert_eq!(category.default_unit, "kg");
        assert_eq!(category.unit_step, 0.5);
        assert_eq!(category.max_value, 50.0);
    }

    /// The exists endpoints return bare booleans.
    #[tokio::test]
    async fn test_exists_parses_bare_bool() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/7/exists"))
            .respond_with(json_response("true"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories/name/Obst/exists"))
            .respond_with(json_response("false"))
            .mount(&server)
            .await;

        let client = CategoriesClient::new(Backend::new(server.uri()), "tok");
        assert!(client.exists(7).await.unwrap());
        assert!(!client.name_exists("Obst").await.unwrap());
    }

    /// Deletes succeed on an empty 204 body.
    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/categories/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = CategoriesClient::new(Backend::new(server.uri()), "tok");
        client.delete(7).await.unwrap();
    }
}
