use validator::ValidateEmail;

use crate::{
    entities::submission::{ContactField, ContactForm, ValidContact},
    errors::{EmailSyntaxError, ValidationError},
};

/// Checks the required fields in order (name, email, subject, message), then
/// the email syntax. The first failure wins.
pub fn validate_contact(form: &ContactForm) -> Result<ValidContact, ValidationError> {
    let values = ContactField::ORDER.map(|field| form.get(field).map(str::trim).unwrap_or(""));

    if let Some(missing) = ContactField::ORDER
        .iter()
        .zip(values.iter())
        .find_map(|(field, value)| value.is_empty().then_some(*field))
    {
        return Err(ValidationError::MissingField(missing));
    }

    let [name, email, subject, message] = values;
    let email = normalize_email(email).map_err(ValidationError::InvalidEmail)?;

    Ok(ValidContact::new(
        name.to_string(),
        email,
        subject.to_string(),
        message.to_string(),
    ))
}

/// Validates address syntax and lowercases the domain part.
pub fn normalize_email(raw: &str) -> Result<String, EmailSyntaxError> {
    let address = raw.trim();

    let mut parts = address.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(EmailSyntaxError::AtSign),
    };

    if local.is_empty() {
        return Err(EmailSyntaxError::EmptyLocalPart);
    }
    if domain.is_empty() {
        return Err(EmailSyntaxError::EmptyDomain);
    }

    let domain = domain.to_lowercase();
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(EmailSyntaxError::MissingPeriod(domain));
    }
    if labels.iter().any(|label| label.is_empty()) {
        return Err(EmailSyntaxError::InvalidDomain(domain));
    }

    let candidate = format!("{}@{}", local, domain);
    if !candidate.validate_email() {
        return Err(EmailSyntaxError::Malformed);
    }

    Ok(candidate)
}
