use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use catalog_core::DomainError;
use catalog_products::CatalogError;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.class().http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match &err {
        CatalogError::NotFound { .. } => json_error(status, "product_not_found", err.to_string()),
        CatalogError::BulkNotFound => json_error(status, "products_not_found", err.to_string()),
        CatalogError::Store(e) => {
            tracing::error!(error = %e, "product store failure");
            json_error(status, "store_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(err.class().http_status()).unwrap_or(StatusCode::BAD_REQUEST);
    let code = match &err {
        DomainError::Validation(_) => "validation_error",
        DomainError::InvalidId(_) => "invalid_id",
    };
    json_error(status, code, err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            "status": status.as_u16(),
        })),
    )
        .into_response()
}
