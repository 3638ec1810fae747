//! Client for the `/files` upload endpoints (item photos and CSV files).

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::api::types::{CsvUploadResponse, FileUploadResponse};
use crate::api::{ApiError, ApiResult, Backend, expect_json};

#[derive(Debug, Clone)]
pub struct FilesClient {
    backend: Backend,
    token: String,
}

impl FilesClient {
    pub fn new(backend: Backend, token: impl Into<String>) -> Self {
        Self {
            backend,
            token: token.into(),
        }
    }

    /// Uploads an item photo. The backend compresses it server-side.
    pub async fn upload_image(&self, path: &Path) -> ApiResult<FileUploadResponse> {
        let part = file_part(path, image_mime(path))?;
        expect_json(
            self.backend
                .post("/files/upload/image")
                .multipart(Form::new().part("file", part))
                .bearer_auth(&self.token),
        )
        .await
    }

    /// Uploads a CSV file and returns the parsed import preview.
    pub async fn upload_csv(&self, path: &Path) -> ApiResult<CsvUploadResponse> {
        let part = file_part(path, "text/csv")?;
        expect_json(
            self.backend
                .post("/files/upload/csv")
                .multipart(Form::new().part("file", part))
                .bearer_auth(&self.token),
        )
        .await
    }

    /// Deletes a previously uploaded image.
    pub async fn delete_image(&self, file_path: &str) -> ApiResult<FileUploadResponse> {
        expect_json(
            self.backend
                .delete("/files/image")
                .query(&[("filePath", file_path)])
                .bearer_auth(&self.token),
        )
        .await
    }
}

fn file_part(path: &Path, mime: &str) -> ApiResult<Part> {
    let bytes = std::fs::read(path)
        .map_err(|err| ApiError::parse(format!("Could not read {}: {err}", path.display())))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime)
        .map_err(|err| ApiError::parse(format!("Invalid MIME type {mime}: {err}")))
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}
