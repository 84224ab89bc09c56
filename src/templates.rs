use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub site_name: &'a str,
    pub owner: &'a str,
    pub year: i32,
    pub contact_enabled: bool,
}

/// Shared HTML page for 404 and 500 responses.
#[derive(Template)]
#[template(path = "errors/error.html")]
pub struct ErrorPageTemplate<'a> {
    pub status: u16,
    pub title: &'a str,
    pub detail: &'a str,
}

#[derive(Template)]
#[template(path = "emails/contact.txt")]
pub struct ContactEmailTemplate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
    pub submitted_at: String,
    pub submission_id: &'a str,
}
