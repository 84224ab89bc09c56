use actix_web::{get, http::header::ContentType, web, HttpRequest, HttpResponse};
use askama::Template;
use chrono::{Datelike, Utc};

use crate::{api_errors::ApiError, templates::IndexTemplate, AppState};

#[get("/")]
pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let page = IndexTemplate {
        site_name: &state.config.site_name,
        owner: &state.config.site_owner,
        year: Utc::now().year(),
        contact_enabled: state.config.contact_enabled(),
    }
    .render()?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(req.path().to_string()))
}
