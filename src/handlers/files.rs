use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::config;
use crate::error::ApiError;

/// GET /files/sample - Download the configured sample file
pub async fn sample() -> Result<Response, ApiError> {
    let path = &config::config().files.sample_path;

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::not_found("Sample file not found")
        } else {
            tracing::error!("failed to read {}: {}", path, e);
            ApiError::internal("Failed to read file")
        }
    })?;

    let filename = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("sample");

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, bytes).into_response())
}
