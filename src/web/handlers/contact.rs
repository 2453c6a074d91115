use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, post, web};
use askama::Template;
use chrono::Utc;

use jglobal_site::common::MailError;
use jglobal_site::log_err;
use jglobal_site::services::OutgoingEmail;
use jglobal_site::types::{ApiResponse, ContactRequest};

use crate::web::helpers::{form_error, json_error};
use crate::web::security::{CONTACT_RULE, client_ip};
use crate::web::state::AppState;
use crate::web::templates::ContactEmailTemplate;

#[post("/api/contact")]
pub async fn contact(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ContactRequest>,
) -> impl Responder {
    let request = body.into_inner();
    if let Err(e) = request.validate() {
        return form_error(&e);
    }

    let ip = client_ip(&req);
    if !state.rate_limiter.check("contact", &ip, CONTACT_RULE) {
        return json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many messages. Please try again later.",
        );
    }

    let Some(mailer) = state.mailer.as_ref() else {
        log::error!("{}", MailError::NotConfigured);
        return json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Message delivery is unavailable right now.",
        );
    };

    let html = match ContactEmailTemplate::new(&request, Utc::now()).render() {
        Ok(html) => html,
        Err(e) => {
            log::error!("{}", MailError::Template(e.to_string()));
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message.");
        }
    };

    let email = OutgoingEmail {
        subject: request.subject_line(),
        html,
        reply_to: Some(request.email.trim().to_string()),
    };

    match mailer.send(&email).await {
        Ok(id) => {
            log::info!("Contact message {id} sent for {}", request.email.trim());
            HttpResponse::Ok()
                .json(ApiResponse::message("Thank you. We will be in touch shortly."))
        }
        Err(e) => {
            log_err!("send contact email", &request, e);
            json_error(StatusCode::BAD_GATEWAY, "Failed to send message.")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(contact);
}
