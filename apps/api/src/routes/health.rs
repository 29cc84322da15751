use axum::Json;
use serde_json::{json, Value};

const SERVICE_NAME: &str = "PDF Parser Microservice";

/// GET /health
/// Returns a simple liveness object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /
/// Describes the service and its endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /parse-resume (multipart field 'file', PDF only)",
            "GET /health",
            "GET /"
        ]
    }))
}
