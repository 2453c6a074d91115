use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::http::StatusCode;
use actix_web::http::header::COOKIE;
use actix_web::{HttpRequest, HttpResponse, error, web};
use askama::Template;

use jglobal_site::backend::BackendClient;
use jglobal_site::common::{BackendError, FormError, SubmitError};
use jglobal_site::types::ApiResponse;

use crate::web::multipart::UploadError;
use crate::web::state::AppState;
use crate::web::templates::NotFoundTemplate;

pub fn render<T: Template>(t: T) -> HttpResponse {
    render_status(StatusCode::OK, t)
}

pub fn render_status<T: Template>(status: StatusCode, t: T) -> HttpResponse {
    match t.render() {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Template error: {e}");
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(format!("Template error: {e}"))
        }
    }
}

pub fn not_found() -> HttpResponse {
    render_status(StatusCode::NOT_FOUND, NotFoundTemplate)
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error(message))
}

/// Client errors from the backend keep their status; anything else is a 502.
pub fn backend_error(err: &BackendError, fallback: &str) -> HttpResponse {
    let status = match err {
        BackendError::Status { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        BackendError::Rejected { .. } | BackendError::InvalidSegment(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    json_error(status, err.user_message(fallback))
}

pub fn form_error(err: &FormError) -> HttpResponse {
    json_error(StatusCode::BAD_REQUEST, err.to_string())
}

pub fn submit_error(err: &SubmitError, fallback: &str) -> HttpResponse {
    match err {
        SubmitError::Invalid(e) => form_error(e),
        SubmitError::Backend(e) => backend_error(e, fallback),
    }
}

pub fn upload_error(err: &UploadError) -> HttpResponse {
    json_error(err.status(), err.to_string())
}

pub fn forwarded_cookies(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Backend client carrying the operator's session cookies.
pub fn admin_backend(state: &AppState, req: &HttpRequest) -> BackendClient {
    match forwarded_cookies(req) {
        Some(header) => state.backend.with_cookies(header),
        None => state.backend.clone(),
    }
}

pub fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build(name, "")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// Malformed JSON bodies answer in the same envelope as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err, _req| {
            let message = format!("Invalid request body: {err}");
            error::InternalError::from_response(err, json_error(StatusCode::BAD_REQUEST, message))
                .into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid query: {err}");
        error::InternalError::from_response(err, json_error(StatusCode::BAD_REQUEST, message))
            .into()
    })
}
