//! Wire types shared across the backend clients.
//!
//! Field names follow the backend's camelCase JSON; structs keep Rust naming
//! and map at the serde boundary.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Role granted to administrators.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
/// Role granted to every account.
pub const ROLE_USER: &str = "ROLE_USER";

/// The authenticated identity, normalized from the backend's duck-typed
/// `roles[]` / `role` response shapes at the auth-client boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl User {
    /// Returns true when the user carries the administrator role.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == ROLE_ADMIN)
    }
}

/// Sign-in credentials. Request-scoped; never persisted.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Credentials must never leak into logs; Debug redacts the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Expiry semantics of an item date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryType {
    /// Hard limit ("use by")
    UseBy,
    /// Quality guideline ("best before")
    BestBefore,
}

impl fmt::Display for ExpiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryType::UseBy => write!(f, "use by"),
            ExpiryType::BestBefore => write!(f, "best before"),
        }
    }
}

/// An inventory item as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    pub expiry_type: ExpiryType,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Server-computed expiry flags.
    #[serde(default)]
    pub expiring_soon: bool,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub days_until_expiry: Option<i64>,
}

/// Payload for creating or replacing an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub name: String,
    pub category_id: i64,
    pub quantity: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    pub expiry_type: ExpiryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An item category with its quantity constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub default_unit: String,
    /// Quantity increment; valid quantities sit on this grid.
    pub unit_step: f64,
    pub min_value: f64,
    pub max_value: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub default_unit: String,
    pub unit_step: f64,
    pub min_value: f64,
    pub max_value: f64,
}

/// Aggregate item counts for the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    pub total_items: i64,
    pub expiring_soon: i64,
    pub expired: i64,
}

/// One page of items (server-side pagination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub content: Vec<Item>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub number: i64,
    pub size: i64,
}

/// Filter and pagination options for item queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub category_id: Option<i64>,
    pub search_term: Option<String>,
    pub expiring_soon: Option<bool>,
    pub expiry_days: Option<u32>,
    pub sort_by: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ItemFilter {
    /// Renders the filter as query parameters, omitting unset fields.
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.category_id {
            query.push(("categoryId", id.to_string()));
        }
        if let Some(term) = &self.search_term {
            query.push(("searchTerm", term.clone()));
        }
        if let Some(expiring) = self.expiring_soon {
            query.push(("expiringSoon", expiring.to_string()));
        }
        if let Some(days) = self.expiry_days {
            query.push(("expiryDays", days.to_string()));
        }
        if let Some(sort) = &self.sort_by {
            query.push(("sortBy", sort.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            query.push(("size", size.to_string()));
        }
        query
    }
}

/// One CSV row in the import preview, with per-row validation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRow {
    #[serde(default)]
    pub row_number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub valid: bool,
}

/// Parsed CSV preview returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvPreview {
    pub items: Vec<CsvRow>,
    #[serde(default)]
    pub total_rows: Option<u32>,
}

/// Envelope of the CSV upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvUploadResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<CsvPreview>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body of the bulk import endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImportRequest {
    pub items: Vec<CsvRow>,
    pub skip_invalid_items: bool,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImportResponse {
    #[serde(default)]
    pub imported_count: u32,
    #[serde(default)]
    pub skipped_count: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope of the image upload and delete endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResponse {
    pub success: bool,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// An account as managed through the admin endpoints.
///
/// Unlike the session [`User`], accounts carry the backend's single `role`
/// field; normalization only happens for the signed-in identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub notifications_enabled: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Items deserialize from the backend's camelCase JSON.
    #[test]
    fn test_item_from_wire_json() {
        let json = r#"{
            "id": 3,
            "name": "Chicken Breast",
            "categoryId": 1,
            "categoryName": "Fleisch",
            "quantity": 1.5,
            "unit": "kg",
            "expiryDate": "2026-09-01",
            "expiryType": "USE_BY",
            "userId": 1,
            "username": "admin",
            "expiringSoon": true,
            "expired": false,
            "daysUntilExpiry": 25
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.name, "Chicken Breast");
        assert_eq!(item.category_name, "Fleisch");
        assert_eq!(item.expiry_type, ExpiryType::UseBy);
        assert_eq!(
            item.expiry_date,
            Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())
        );
        assert!(item.expiring_soon);
        assert_eq!(item.days_until_expiry, Some(25));
    }

    /// Item payloads serialize camelCase and omit unset optionals.
    #[test]
    fn test_item_payload_to_wire_json() {
        let payload = ItemPayload {
            name: "Peas".to_string(),
            category_id: 2,
            quantity: 0.5,
            unit: "kg".to_string(),
            expiry_date: None,
            expiry_type: ExpiryType::BestBefore,
            photo_path: None,
            description: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["categoryId"], 2);
        assert_eq!(json["expiryType"], "BEST_BEFORE");
        assert!(json.get("expiryDate").is_none());
        assert!(json.get("photoPath").is_none());
    }

    /// Admin detection looks for ROLE_ADMIN.
    #[test]
    fn test_user_is_admin() {
        let admin = User {
            id: 1,
            username: "admin".to_string(),
            email: "a@x.com".to_string(),
            roles: vec![ROLE_USER.to_string(), ROLE_ADMIN.to_string()],
        };
        let user = User {
            id: 2,
            username: "user".to_string(),
            email: "u@x.com".to_string(),
            roles: vec![ROLE_USER.to_string()],
        };
        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }

    /// Passwords never appear in Debug output.
    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("admin123"));
        assert!(rendered.contains("<redacted>"));
    }

    /// Filters render only the fields that are set.
    #[test]
    fn test_item_filter_to_query() {
        let filter = ItemFilter {
            category_id: Some(4),
            expiry_days: Some(14),
            ..Default::default()
        };
        let query = filter.to_query();
        assert_eq!(
            query,
            vec![
                ("categoryId", "4".to_string()),
                ("expiryDays", "14".to_string()),
            ]
        );
    }
}
