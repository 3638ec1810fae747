//! Client for the `/items` endpoints.

use crate::api::types::{
    CsvImportRequest, CsvImportResponse, Item, ItemFilter, ItemPage, ItemPayload, ItemStats,
};
use crate::api::{ApiResult, Backend, expect_json, expect_ok};

/// Authenticated client for item CRUD, filtering, and bulk import.
#[derive(Debug, Clone)]
pub struct ItemsClient {
    backend: Backend,
    token: String,
}

impl ItemsClient {
    pub fn new(backend: Backend, token: impl Into<String>) -> Self {
        Self {
            backend,
            token: token.into(),
        }
    }

    /// Lists all items of the signed-in user.
    pub async fn list(&self) -> ApiResult<Vec<Item>> {
        expect_json(self.backend.get("/items").bearer_auth(&self.token)).await
    }

    /// Lists one page of items.
    pub async fn paginated(&self, filter: &ItemFilter) -> ApiResult<ItemPage> {
        expect_json(
            self.backend
                .get("/items/paginated")
                .query(&filter.to_query())
                .bearer_auth(&self.token),
        )
        .await
    }

    /// Lists one page of items matching the filter.
    pub async fn filter(&self, filter: &ItemFilter) -> ApiResult<ItemPage> {
        expect_json(
            self.backend
                .get("/items/filter")
                .query(&filter.to_query())
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Item> {
        expect_json(
            self.backend
                .get(&format!("/items/{id}"))
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn create(&self, payload: &ItemPayload) -> ApiResult<Item> {
        expect_json(
            self.backend
                .post("/items")
                .json(payload)
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn update(&self, id: i64, payload: &ItemPayload) -> ApiResult<Item> {
        expect_json(
            self.backend
                .put(&format!("/items/{id}"))
                .json(payload)
                .bearer_auth(&self.token),
        )
        .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        expect_ok(
            self.backend
                .delete(&format!("/items/{id}"))
                .bearer_auth(&self.token),
        )
        .await
    }

    /// Searches items by name.
    pub async fn search(&self, query: &str) -> ApiResult<Vec<Item>> {
        expect_json(
            self.backend
                .get("/items/search")
                .query(&[("q", query)])
                .bearer_auth(&self.token),
        )
        .await
    }

    /// Lists items in a category.
    pub async fn by_category(&self, category_id: i64) -> ApiResult<Vec<Item>> {
        expect_json(
            self.backend
                .get(&format!("/items/category/{category_id}"))
                .bearer_auth(&self.token),
        )
        .await
    }

    /// Lists items expiring within the given number of days.
    pub async fn expiring(&self, days: u32) -> ApiResult<Vec<Item>> {
        expect_json(
            self.backend
                .get("/items/expiring")
                .query(&[("days", days.to_string())])
                .bearer_auth(&self.token),
        )
        .await
    }

    /// Lists items past their expiry date.
    pub async fn expired(&self) -> ApiResult<Vec<Item>> {
        expect_json(self.backend.get("/items/expired").bearer_auth(&self.token)).await
    }

    /// Fetches aggregate counts for the overview.
    pub async fn stats(&self) -> ApiResult<ItemStats> {
        expect_json(self.backend.get("/items/stats").bearer_auth(&self.token)).await
    }

    /// Counts items expiring within the given number of days.
    pub async fn expiring_count(&self, days: u32) -> ApiResult<i64> {
        expect_json(
            self.backend
                .get("/items/stats/expiring")
                .query(&[("days", days.to_string())])
                .bearer_auth(&self.token),
        )
        .await
    }

    /// Imports previewed CSV rows in bulk.
    pub async fn import_csv(&self, request: &CsvImportRequest) -> ApiResult<CsvImportResponse> {
        expect_json(
            self.backend
                .post("/items/import/csv")
                .json(request)
                .bearer_auth(&self.token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ApiErrorKind;

    fn json_response(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/json")
            .set_body_string(body.to_string())
    }

    /// Every request carries the bearer token.
    #[tokio::test]
    async fn test_list_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(json_response("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ItemsClient::new(Backend::new(server.uri()), "tok-123");
        let items = client.list().await.unwrap();
        assert!(items.is_empty());
    }

    /// Pagination filters render as camelCase query parameters.
    #[tokio::test]
    async fn test_paginated_renders_filter_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/paginated"))
            .and(query_param("categoryId", "4"))
            .and(query_param("sortBy", "expiry"))
            .and(query_param("page", "0"))
            .and(query_param("size", "20"))
            .respond_with(json_response(
                r#"{"content":[],"totalElements":0,"totalPages":0,"number":0,"size":20}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = ItemsClient::new(Backend::new(server.uri()), "tok");
        let page = client
            .paginated(&ItemFilter {
                category_id: Some(4),
                sort_by: Some("expiry".to_string()),
                page: Some(0),
                size: Some(20),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.size, 20);
        assert!(page.content.is_empty());
    }

    /// A 401 on a protected call surfaces as an unauthorized auth error.
    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"message":"Token expired"}"#),
            )
            .mount(&server)
            .await;

        let client = ItemsClient::new(Backend::new(server.uri()), "stale");
        let err = client.list().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Auth);
        assert!(err.is_unauthorized());
        assert_eq!(err.message, "Token expired");
    }

    /// Bulk import posts the preview rows and the skip flag.
    #[tokio::test]
    async fn test_import_csv_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/items/import/csv"))
            .respond_with(json_response(
                r#"{"importedCount":2,"skippedCount":1,"errors":["row 3: unknown category"]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = ItemsClient::new(Backend::new(server.uri()), "tok");
        let report = client
            .import_csv(&CsvImportRequest {
                items: Vec::new(),
                skip_invalid_items: true,
            })
            .await
            .unwrap();
        assert_eq!(report.imported_count, 2);
        assert_eq!(report.skipped_count, 1);
        assert_eq!(report.errors.len(), 1);
    }

    /// The expiring count endpoint returns a bare number.
    #[tokio::test]
    async fn test_expiring_count_parses_bare_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/stats/expiring"))
            .and(query_param("days", "14"))
            .respond_with(json_response("5"))
            .mount(&server)
            .await;

        let client = ItemsClient::new(Backend::new(server.uri()), "tok");
        assert_eq!(client.expiring_count(14).await.unwrap(), 5);
    }
}
