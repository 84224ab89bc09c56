use actix_web::{http::StatusCode, HttpResponse};

/// `{"success": false, "message": ...}`, the failure shape of the JSON API.
pub fn json_failure(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "success": false,
        "message": message
    }))
}
