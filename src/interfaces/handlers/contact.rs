use std::panic::AssertUnwindSafe;

use actix_web::{http::header, web, HttpRequest, HttpResponse, ResponseError};
use futures_util::FutureExt;

use crate::{
    entities::submission::{ContactForm, RequestOrigin},
    errors::{ContactError, ValidationError},
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Largest accepted contact body.
pub const CONTACT_BODY_LIMIT: usize = 64 * 1024;

/// Reads the body up to `CONTACT_BODY_LIMIT`; anything larger is a
/// validation failure.
async fn read_body(payload: web::Payload) -> Result<web::Bytes, ContactError> {
    match payload.to_bytes_limited(CONTACT_BODY_LIMIT).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(_)) => Err(ValidationError::TooLarge(CONTACT_BODY_LIMIT).into()),
        Err(e) => Err(ContactError::Internal(format!("failed to read request body: {}", e))),
    }
}

pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Payload,
) -> HttpResponse {
    let body = match read_body(payload).await {
        Ok(body) => body,
        Err(e) => {
            tracing::info!(reason = %e, "Contact body rejected");
            return e.error_response();
        }
    };

    let form = ContactForm::from_body(&body);
    let origin = RequestOrigin {
        source_ip: Some(get_client_ip(&req, state.config.trust_x_forwarded_for)),
        user_agent: req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    };

    let outcome = AssertUnwindSafe(state.contact_handler.submit(form, origin))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            tracing::error!("Contact submission panicked");
            Err(ContactError::Internal("contact pipeline panicked".into()))
        });

    match outcome {
        Ok(receipt) => HttpResponse::Ok().json(receipt),
        Err(e) => {
            if let ContactError::Internal(detail) = &e {
                tracing::error!(%detail, "Error processing contact form");
            }
            e.error_response()
        }
    }
}
