use std::sync::Arc;

use askama::Template;
use chrono::Local;

use crate::{
    entities::submission::{ContactForm, ContactReceipt, RequestOrigin, Submission},
    errors::ContactError,
    mail::smtp::Notifier,
    repositories::submission::SubmissionStore,
    templates::ContactEmailTemplate,
    validation::validate_contact,
};

/// Runs a contact submission through validation, best-effort persistence and
/// notification.
pub struct ContactHandler {
    pub store: Arc<dyn SubmissionStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl ContactHandler {
    pub fn new(store: Arc<dyn SubmissionStore>, notifier: Arc<dyn Notifier>) -> Self {
        ContactHandler { store, notifier }
    }

    #[tracing::instrument(name = "contact_submission", skip_all, fields(source_ip = ?origin.source_ip))]
    pub async fn submit(
        &self,
        form: ContactForm,
        origin: RequestOrigin,
    ) -> Result<ContactReceipt, ContactError> {
        let contact = validate_contact(&form).inspect_err(|reason| {
            tracing::info!(%reason, "Contact submission rejected");
        })?;

        let submission = Submission::accept(contact, origin);

        let submission_id = match self.store.save(&submission).await {
            Ok(path) => {
                tracing::info!(submission_id = %submission.id, path = %path.display(), "Contact submission saved");
                submission.id.clone()
            }
            Err(e) => {
                tracing::error!(error = %e, submission_id = %submission.id, "Failed to save contact submission");
                submission.fallback_id()
            }
        };

        let (subject, body) = compose_notification(&submission, &submission_id)?;

        self.notifier
            .notify(&subject, &body)
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, email = %submission.email, "Failed to send contact form email");
            })?;

        tracing::info!(
            name = %submission.name,
            email = %submission.email,
            %submission_id,
            "Contact form submitted successfully"
        );

        Ok(ContactReceipt::sent(submission_id))
    }
}

/// Builds the subject line and plain-text body sent to the site owner.
pub fn compose_notification(
    submission: &Submission,
    submission_id: &str,
) -> Result<(String, String), askama::Error> {
    let subject = format!("Portfolio Contact: {}", submission.subject);

    let body = ContactEmailTemplate {
        name: &submission.name,
        email: &submission.email,
        subject: &submission.subject,
        message: &submission.message,
        submitted_at: submission
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        submission_id,
    }
    .render()?;

    Ok((subject, body))
}
