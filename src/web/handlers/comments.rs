use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};

use jglobal_site::common::CommentsError;
use jglobal_site::services::{CommentsClient, CommentsQuery};

use crate::web::helpers::json_error;
use crate::web::state::AppState;

fn respond(result: Result<serde_json::Value, CommentsError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        // WordPress errors go back with their own status and body.
        Err(CommentsError::Status { status, body }) => {
            HttpResponse::build(StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY))
                .json(body)
        }
        Err(e) => {
            log::error!("Comments proxy failed: {e}");
            json_error(StatusCode::BAD_GATEWAY, "Failed to reach the comments service.")
        }
    }
}

fn client(state: &AppState) -> Result<&CommentsClient, HttpResponse> {
    state.comments.as_ref().ok_or_else(|| {
        log::warn!("{}", CommentsError::NotConfigured);
        json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            CommentsError::NotConfigured.to_string(),
        )
    })
}

#[get("/api/comments")]
pub async fn list(state: web::Data<AppState>, query: web::Query<CommentsQuery>) -> impl Responder {
    match client(&state) {
        Ok(comments) => respond(comments.list(&query).await),
        Err(res) => res,
    }
}

#[post("/api/comments")]
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    match client(&state) {
        Ok(comments) => respond(comments.create(&body).await),
        Err(res) => res,
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list).service(create);
}
