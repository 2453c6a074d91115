use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde::Serialize;

use jglobal_site::backend::{ListQuery, Resource};
use jglobal_site::models::{Review, ReviewStatus};
use jglobal_site::services::{ReviewBoard, ReviewCounts};
use jglobal_site::types::ApiResponse;

use crate::web::helpers::{admin_backend, backend_error, json_error, not_found};
use crate::web::state::AppState;

#[derive(Serialize)]
struct ModerationView<'a> {
    reviews: &'a [Review],
    counts: ReviewCounts,
}

/// `all` and an empty tab mean no filter; anything else must name a status.
fn parse_status(status: Option<&str>) -> Result<Option<ReviewStatus>, HttpResponse> {
    match status.filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all")) {
        None => Ok(None),
        Some(s) => s
            .parse::<ReviewStatus>()
            .map(Some)
            .map_err(|_| json_error(StatusCode::BAD_REQUEST, format!("Unknown review status {s}"))),
    }
}

/// The status tab is filtered by the backend; counts cover every page.
#[get("/admin/reviews")]
pub async fn review_board(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let mut query = query.into_inner();
    query.status = match parse_status(query.status.as_deref()) {
        Ok(filter) => filter.map(|status| status.as_str().to_string()),
        Err(res) => return res,
    };

    let backend = admin_backend(&state, &req);
    let (loaded, counts) = futures_util::join!(
        ReviewBoard::load(&backend, &query),
        ReviewCounts::fetch(&backend),
    );
    let board = match loaded {
        Ok(board) => board,
        Err(toast) => return json_error(StatusCode::BAD_GATEWAY, toast),
    };

    HttpResponse::Ok().json(ApiResponse::ok(ModerationView {
        reviews: board.rows(),
        counts,
    }))
}

#[post("/admin/reviews/{id}/{action}")]
pub async fn moderate(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (id, action) = path.into_inner();
    let backend = admin_backend(&state, &req);

    let review = match backend.get::<Review>(Resource::Reviews, &id).await {
        Ok(review) => review,
        Err(e) => return backend_error(&e, "Failed to fetch review"),
    };
    let mut board = ReviewBoard::new(vec![review]);

    let result = match action.as_str() {
        "approve" => board.approve(&backend, &id).await,
        "reject" => board.reject(&backend, &id).await,
        _ => return not_found(),
    };

    match (result, board.get(&id)) {
        (Ok(()), Some(updated)) => {
            log::info!("Review {id} is now {}", updated.status.as_str());
            HttpResponse::Ok().json(ApiResponse::ok(updated))
        }
        (Ok(()), None) => not_found(),
        (Err(toast), _) => json_error(StatusCode::BAD_GATEWAY, toast),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(review_board).service(moderate);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::web::handlers::testing::{spawn_backend, test_state};
    use actix_web::{App, test};
    use serde_json::json;

    fn review_row(id: &str, status: &str, comment: &str) -> serde_json::Value {
        json!({
            "id": id, "rating": 5, "comment": comment, "reviewerName": "Ngozi",
            "status": status, "houseId": "house-7"
        })
    }

    fn fake_reviews(cfg: &mut web::ServiceConfig) {
        cfg.route(
            "/reviews",
            web::get().to(|q: web::Query<HashMap<String, String>>| async move {
                let status = q.get("status").cloned();
                // One-item pages are count requests
                if q.get("limit").map(String::as_str) == Some("1") {
                    let total = match status.as_deref() {
                        Some("PENDING") => 12,
                        Some("APPROVED") => 30,
                        Some("REJECTED") => 4,
                        _ => 46,
                    };
                    return HttpResponse::Ok().json(json!({
                        "success": true,
                        "data": [],
                        "pagination": {
                            "currentPage": 1, "totalPages": total, "totalItems": total,
                            "itemsPerPage": 1, "hasNext": total > 1, "hasPrevious": false
                        }
                    }));
                }
                let row_status = status.clone().unwrap_or_else(|| "PENDING".to_string());
                let echo = status.unwrap_or_else(|| "none".to_string());
                HttpResponse::Ok().json(json!({
                    "success": true,
                    "data": [review_row("r1", &row_status, &echo)],
                    "pagination": {
                        "currentPage": 1, "totalPages": 1, "totalItems": 1,
                        "itemsPerPage": 10, "hasNext": false, "hasPrevious": false
                    }
                }))
            }),
        )
        .route(
            "/reviews/{id}",
            web::get().to(|path: web::Path<String>| async move {
                HttpResponse::Ok().json(json!({
                    "success": true,
                    "data": review_row(&path, "PENDING", "Lovely site visit")
                }))
            }),
        )
        .route(
            "/reviews/{id}/approve",
            web::patch().to(|| async { HttpResponse::Ok().json(json!({ "success": true })) }),
        );
    }

    #[actix_web::test]
    async fn test_status_tab_is_filtered_by_backend() {
        let backend = spawn_backend(fake_reviews).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/admin/reviews?status=approved&page=1")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["reviews"][0]["comment"], "APPROVED");
        assert_eq!(body["data"]["reviews"][0]["status"], "APPROVED");
    }

    #[actix_web::test]
    async fn test_counts_cover_every_page() {
        let backend = spawn_backend(fake_reviews).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/admin/reviews?status=all").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["reviews"][0]["comment"], "none");
        assert_eq!(body["data"]["counts"], json!({ "pending": 12, "approved": 30, "rejected": 4 }));
    }

    #[actix_web::test]
    async fn test_unknown_status_tab_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state("http://127.0.0.1:9")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/admin/reviews?status=spam").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_approve_returns_updated_row() {
        let backend = spawn_backend(fake_reviews).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/admin/reviews/r9/approve").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["id"], "r9");
        assert_eq!(body["data"]["status"], "APPROVED");
    }
}
