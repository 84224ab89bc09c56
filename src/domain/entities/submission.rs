use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Required contact form fields, in the order they are validated.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    #[display("Name")]
    Name,
    #[display("Email")]
    Email,
    #[display("Subject")]
    Subject,
    #[display("Message")]
    Message,
}

impl ContactField {
    pub const ORDER: [ContactField; 4] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Subject,
        ContactField::Message,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Subject => "subject",
            ContactField::Message => "message",
        }
    }
}

/// Raw contact form as submitted. Fields that are absent or not strings are `None`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactForm {
    /// Reads a JSON request body. Anything that is not a JSON object is
    /// treated as an empty form.
    pub fn from_body(body: &[u8]) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) else {
            return ContactForm::default();
        };

        let field = |key: ContactField| {
            map.get(key.key())
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        ContactForm {
            name: field(ContactField::Name),
            email: field(ContactField::Email),
            subject: field(ContactField::Subject),
            message: field(ContactField::Message),
        }
    }

    pub fn get(&self, field: ContactField) -> Option<&str> {
        match field {
            ContactField::Name => self.name.as_deref(),
            ContactField::Email => self.email.as_deref(),
            ContactField::Subject => self.subject.as_deref(),
            ContactField::Message => self.message.as_deref(),
        }
    }
}

/// A contact form that passed validation: trimmed fields and a canonical email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl ValidContact {
    pub(crate) fn new(name: String, email: String, subject: String, message: String) -> Self {
        ValidContact { name, email, subject, message }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Request metadata captured alongside a submission.
#[derive(Debug, Default, Clone)]
pub struct RequestOrigin {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl Submission {
    /// Stamps an accepted contact with a fresh identifier.
    pub fn accept(contact: ValidContact, origin: RequestOrigin) -> Self {
        let timestamp = Utc::now();
        let id = format!("contact_{}_{}", timestamp.timestamp(), Uuid::new_v4().simple());

        Submission {
            id,
            timestamp,
            name: contact.name,
            email: contact.email,
            subject: contact.subject,
            message: contact.message,
            source_ip: origin.source_ip,
            user_agent: origin.user_agent,
        }
    }

    /// Identifier reported when the record could not be written.
    pub fn fallback_id(&self) -> String {
        format!("contact_{}", self.timestamp.timestamp())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactReceipt {
    pub success: bool,
    pub message: String,
    pub submission_id: String,
}

impl ContactReceipt {
    pub fn sent(submission_id: String) -> Self {
        ContactReceipt {
            success: true,
            message: "Message sent successfully! I'll get back to you soon.".to_string(),
            submission_id,
        }
    }
}
