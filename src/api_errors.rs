use askama::Template;
use derive_more::Display;
use actix_web::{
    http::{header::{self, ContentType}, StatusCode},
    HttpResponse, ResponseError,
};

use crate::{handlers::json_error::json_failure, templates::ErrorPageTemplate};

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";

#[derive(Debug, Display)]
pub enum ApiError {
    #[display("Not found: {}", _0)]
    NotFound(String),

    #[display("Rate limited: retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[display("Internal server error: {}", _0)]
    Internal(String),
}

impl ApiError {
    fn render_page(&self, title: &str, detail: &str) -> HttpResponse {
        let status = self.status_code();
        let page = ErrorPageTemplate {
            status: status.as_u16(),
            title,
            detail,
        };

        match page.render() {
            Ok(html) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(html),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                HttpResponse::build(status)
                    .content_type(ContentType::plaintext())
                    .body(title.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::NotFound(path) => {
                tracing::warn!(%path, "404 error");
                self.render_page("Page not found", "The page you are looking for does not exist.")
            }
            ApiError::RateLimited { retry_after } => {
                let mut response = json_failure(self.status_code(), RATE_LIMITED_MESSAGE);
                response.headers_mut().insert(
                    header::RETRY_AFTER,
                    header::HeaderValue::from(*retry_after),
                );
                response
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "500 error");
                self.render_page("Internal server error", "Something went wrong on our side. Please try again later.")
            }
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        ApiError::Internal(format!("template error: {}", err))
    }
}
