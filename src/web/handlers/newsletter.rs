use actix_web::http::StatusCode;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use chrono::Utc;

use jglobal_site::backend::ListQuery;
use jglobal_site::log_err;
use jglobal_site::services::newsletter::{self, ack_summary, export_csv, export_filename};
use jglobal_site::services::{CampaignDraft, ListingView};
use jglobal_site::types::ApiResponse;

use crate::web::helpers::{admin_backend, backend_error, json_error, submit_error};
use crate::web::state::AppState;

#[get("/admin/newsletter/subscribers")]
pub async fn subscribers(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> impl Responder {
    match newsletter::subscribers(&admin_backend(&state, &req), &query).await {
        Ok(page) => HttpResponse::Ok().json(ListingView::new(&query, page)),
        Err(e) => {
            log::error!("Listing subscribers failed: {e}");
            backend_error(&e, "Failed to fetch subscribers")
        }
    }
}

#[get("/admin/newsletter/subscribers/export")]
pub async fn export(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let all = match newsletter::all_subscribers(&admin_backend(&state, &req)).await {
        Ok(all) => all,
        Err(e) => {
            log::error!("Subscriber export failed: {e}");
            return backend_error(&e, "Failed to export subscribers");
        }
    };

    let csv = match export_csv(&all) {
        Ok(csv) => csv,
        Err(e) => {
            log::error!("Writing subscriber CSV failed: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to export subscribers");
        }
    };

    log::info!("Exported {} subscribers", all.len());
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export_filename(Utc::now()))],
        })
        .body(csv)
}

#[get("/admin/newsletter/campaigns")]
pub async fn campaigns(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> impl Responder {
    match newsletter::campaign_history(&admin_backend(&state, &req), &query).await {
        Ok(page) => HttpResponse::Ok().json(ListingView::new(&query, page)),
        Err(e) => {
            log::error!("Listing campaigns failed: {e}");
            backend_error(&e, "Failed to fetch campaigns")
        }
    }
}

/// Creates a campaign and queues it in one step.
#[post("/admin/newsletter/campaigns")]
pub async fn send_new(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CampaignDraft>,
) -> impl Responder {
    let draft = body.into_inner();
    match newsletter::send_campaign(&admin_backend(&state, &req), &draft).await {
        Ok(ack) => {
            let summary = ack_summary(&ack);
            HttpResponse::Ok().json(ApiResponse::ok(ack).with_message(summary))
        }
        Err(e) => {
            log_err!("send campaign", &draft, e);
            submit_error(&e, "Failed to send campaign")
        }
    }
}

#[post("/admin/newsletter/campaigns/{id}/send")]
pub async fn resend(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match admin_backend(&state, &req).send_campaign(&id).await {
        Ok(ack) => {
            let summary = ack_summary(&ack);
            HttpResponse::Ok().json(ApiResponse::ok(ack).with_message(summary))
        }
        Err(e) => {
            log::error!("Sending campaign {id} failed: {e}");
            backend_error(&e, "Failed to send campaign")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(export)
        .service(subscribers)
        .service(campaigns)
        .service(send_new)
        .service(resend);
}
