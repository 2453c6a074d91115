use askama::Template;
use chrono::{DateTime, Utc};

use jglobal_site::types::ContactRequest;

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "admin_login.html")]
pub struct AdminLoginTemplate {
    pub key: String,
}

#[derive(Template)]
#[template(path = "emails/contact.html")]
pub struct ContactEmailTemplate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub received_at: String,
}

impl ContactEmailTemplate {
    pub fn new(request: &ContactRequest, received_at: DateTime<Utc>) -> Self {
        let trimmed = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: trimmed(&request.phone),
            subject: trimmed(&request.subject),
            message: request.message.trim().to_string(),
            received_at: received_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}
