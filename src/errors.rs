use actix_web::{
    error::ResponseError,
    http::StatusCode,
    HttpResponse
};
use derive_more::{Display, From};

use crate::{entities::submission::ContactField, handlers::json_error::json_failure};

pub const DELIVERY_FAILED_MESSAGE: &str = "Failed to send message. Please try again later.";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again later.";

/// Why a contact form was rejected. The display text is shown to the caller.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[display("{_0} is required")]
    MissingField(ContactField),

    #[display("{_0}")]
    InvalidEmail(EmailSyntaxError),

    #[display("Your message is too long. Please keep it under {} KiB.", _0 / 1024)]
    TooLarge(usize),
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum EmailSyntaxError {
    #[display("The email address is not valid. It must have exactly one @-sign.")]
    AtSign,

    #[display("There must be something before the @-sign.")]
    EmptyLocalPart,

    #[display("There must be something after the @-sign.")]
    EmptyDomain,

    #[display("The domain name {_0} is not valid. It should have a period.")]
    MissingPeriod(String),

    #[display("The domain name {_0} is not valid.")]
    InvalidDomain(String),

    #[display("The email address is not valid.")]
    Malformed,
}

/// Failure to write a submission record. Never surfaces to the caller.
#[derive(Debug, Display, From)]
pub enum PersistenceError {
    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    #[display("Serialization error: {_0}")]
    Serialize(serde_json::Error),
}

impl std::error::Error for PersistenceError {}

/// Failure to relay a notification over SMTP.
#[derive(Debug, Display)]
pub enum DeliveryError {
    #[display("Email configuration is incomplete")]
    NotConfigured,

    #[display("Invalid mail address: {_0}")]
    InvalidAddress(String),

    #[display("Failed to build message: {_0}")]
    Message(String),

    #[display("SMTP transport error: {_0}")]
    Transport(String),
}

impl std::error::Error for DeliveryError {}

impl From<lettre::address::AddressError> for DeliveryError {
    fn from(err: lettre::address::AddressError) -> Self {
        DeliveryError::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for DeliveryError {
    fn from(err: lettre::error::Error) -> Self {
        DeliveryError::Message(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for DeliveryError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        DeliveryError::Transport(err.to_string())
    }
}

/// Terminal failure states of a contact submission.
#[derive(Debug, Display)]
pub enum ContactError {
    #[display("validation error: {_0}")]
    Validation(ValidationError),

    #[display("delivery error: {_0}")]
    Delivery(DeliveryError),

    #[display("internal error: {_0}")]
    Internal(String),
}

impl std::error::Error for ContactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContactError::Delivery(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ContactError {
    fn from(err: ValidationError) -> Self {
        ContactError::Validation(err)
    }
}

impl From<DeliveryError> for ContactError {
    fn from(err: DeliveryError) -> Self {
        ContactError::Delivery(err)
    }
}

impl From<askama::Error> for ContactError {
    fn from(err: askama::Error) -> Self {
        ContactError::Internal(format!("template error: {}", err))
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::Delivery(_) | ContactError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ContactError::Validation(reason) => reason.to_string(),
            ContactError::Delivery(_) => DELIVERY_FAILED_MESSAGE.to_string(),
            ContactError::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
        };
        json_failure(self.status_code(), &message)
    }
}
