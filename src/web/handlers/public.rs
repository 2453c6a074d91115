use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use jglobal_site::backend::{BackendClient, ListQuery, Resource};
use jglobal_site::common::BackendError;
use jglobal_site::models::{Blog, BlogStatus, Event, House, Land, NewReview};
use jglobal_site::services::ListingView;
use jglobal_site::types::{ApiResponse, SubscribeRequest};

use crate::web::forms::ReviewSubmission;
use crate::web::helpers::{backend_error, form_error, json_error, not_found};
use crate::web::security::{SUBSCRIBE_RULE, client_ip};
use crate::web::state::AppState;

async fn list_view<T: DeserializeOwned + Serialize>(
    backend: &BackendClient,
    resource: Resource,
    query: ListQuery,
) -> HttpResponse {
    match backend.list::<T>(resource, &query).await {
        Ok(page) => HttpResponse::Ok().json(ListingView::new(&query, page)),
        Err(e) => {
            log::error!("Listing {resource} failed: {e}");
            backend_error(&e, &format!("Failed to fetch {resource}"))
        }
    }
}

fn detail<T: Serialize>(resource: Resource, slug: &str, result: Result<T, BackendError>) -> HttpResponse {
    match result {
        Ok(item) => HttpResponse::Ok().json(ApiResponse::ok(item)),
        Err(BackendError::Status { status: 404, .. }) => not_found(),
        Err(e) => {
            log::error!("Fetching {resource} {slug} failed: {e}");
            backend_error(&e, &format!("Failed to fetch {resource}"))
        }
    }
}

#[get("/api/lands")]
pub async fn list_lands(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    list_view::<Land>(&state.backend, Resource::Lands, query.into_inner()).await
}

#[get("/api/houses")]
pub async fn list_houses(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    list_view::<House>(&state.backend, Resource::Houses, query.into_inner()).await
}

/// The public blog only ever lists published posts.
#[get("/api/blogs")]
pub async fn list_blogs(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    let query = ListQuery {
        status: Some(BlogStatus::Published.as_str().to_string()),
        ..query.into_inner()
    };
    list_view::<Blog>(&state.backend, Resource::Blogs, query).await
}

#[get("/api/events")]
pub async fn list_events(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    list_view::<Event>(&state.backend, Resource::Events, query.into_inner()).await
}

#[get("/api/lands/{slug}")]
pub async fn land(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let result = state.backend.get_by_slug::<Land>(Resource::Lands, &path).await;
    detail(Resource::Lands, &path, result)
}

#[get("/api/houses/{slug}")]
pub async fn house(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let result = state.backend.get_by_slug::<House>(Resource::Houses, &path).await;
    detail(Resource::Houses, &path, result)
}

#[get("/api/blogs/{slug}")]
pub async fn blog(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let result = state.backend.get_by_slug::<Blog>(Resource::Blogs, &path).await;
    match result {
        Ok(blog) if !blog.is_visible_at(Utc::now()) => not_found(),
        other => detail(Resource::Blogs, &path, other),
    }
}

#[get("/api/events/{slug}")]
pub async fn event(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let result = state.backend.get_by_slug::<Event>(Resource::Events, &path).await;
    detail(Resource::Events, &path, result)
}

#[post("/api/reviews")]
pub async fn submit_review(
    state: web::Data<AppState>,
    body: web::Json<ReviewSubmission>,
) -> impl Responder {
    let review = match NewReview::try_from(body.into_inner()) {
        Ok(review) => review,
        Err(e) => return form_error(&e),
    };

    match state.backend.submit_review(&review).await {
        Ok(created) => HttpResponse::Created().json(
            ApiResponse::ok(created)
                .with_message("Thank you! Your review will appear once it has been approved."),
        ),
        Err(e) => {
            log::error!("Review submission for {} {} failed: {e}", review.subject.kind(), review.subject.id());
            backend_error(&e, "Failed to submit review")
        }
    }
}

#[post("/api/newsletter/subscribe")]
pub async fn subscribe(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SubscribeRequest>,
) -> impl Responder {
    let request = body.into_inner();
    if let Err(e) = request.validate() {
        return form_error(&e);
    }

    let ip = client_ip(&req);
    if !state.rate_limiter.check("subscribe", &ip, SUBSCRIBE_RULE) {
        return json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many signup attempts. Please try again later.",
        );
    }

    match state.backend.subscribe(&request).await {
        Ok(subscriber) => HttpResponse::Ok()
            .json(ApiResponse::ok(subscriber).with_message("Thanks for subscribing!")),
        Err(e) => {
            log::error!("Newsletter signup failed: {e}");
            backend_error(&e, "Failed to subscribe")
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_lands)
        .service(list_houses)
        .service(list_blogs)
        .service(list_events)
        .service(land)
        .service(house)
        .service(blog)
        .service(event)
        .service(submit_review)
        .service(subscribe);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::handlers::testing::{spawn_backend, test_state};
    use actix_web::{App, HttpRequest as Req, test};

    fn fake_blogs(cfg: &mut web::ServiceConfig) {
        cfg.route(
            "/blogs",
            web::get().to(|req: Req| async move {
                // Echo the status filter back as the only item's title
                let status = req
                    .query_string()
                    .split('&')
                    .find_map(|p| p.strip_prefix("status="))
                    .unwrap_or("none")
                    .to_string();
                HttpResponse::Ok().json(serde_json::json!({
                    "success": true,
                    "data": [{ "id": "b1", "slug": "hello", "title": status, "status": "PUBLISHED" }],
                    "pagination": {
                        "currentPage": 1, "totalPages": 3, "totalItems": 25,
                        "itemsPerPage": 10, "hasNext": true, "hasPrevious": false
                    }
                }))
            }),
        )
        .route(
            "/blogs/slug/{slug}",
            web::get().to(|path: web::Path<String>| async move {
                let status = if path.as_str() == "draft-post" { "DRAFT" } else { "PUBLISHED" };
                HttpResponse::Ok().json(serde_json::json!({
                    "success": true,
                    "data": { "id": "b2", "slug": path.into_inner(), "title": "Post", "status": status }
                }))
            }),
        );
    }

    #[actix_web::test]
    async fn test_public_blog_listing_forces_published() {
        let backend = spawn_backend(fake_blogs).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/blogs?status=DRAFT&page=1")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["items"][0]["title"], "PUBLISHED");
        assert_eq!(body["controls"]["canNext"], true);
        assert_eq!(body["controls"]["canPrev"], false);
    }

    #[actix_web::test]
    async fn test_unpublished_blog_detail_is_not_found() {
        let backend = spawn_backend(fake_blogs).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/blogs/draft-post").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/blogs/hello").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_review_without_subject_never_reaches_backend() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state("http://127.0.0.1:9")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/reviews")
            .set_json(serde_json::json!({ "rating": 5, "reviewerName": "Ada" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
