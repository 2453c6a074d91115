mod common;

#[cfg(test)]
pub mod moderation_tests {
    use actix_web::{HttpResponse, web};
    use serde_json::json;

    use super::common::*;

    use jglobal_site::backend::ListQuery;
    use jglobal_site::models::{Review, ReviewStatus};
    use jglobal_site::services::{ReviewBoard, ReviewCounts};

    fn review(id: &str, status: &str) -> Review {
        serde_json::from_value(review_json(id, status)).unwrap()
    }

    fn board() -> ReviewBoard {
        ReviewBoard::new(vec![
            review("r1", "PENDING"),
            review("r2", "APPROVED"),
            review("r3", "PENDING"),
        ])
    }

    fn moderation_backend(cfg: &mut web::ServiceConfig) {
        cfg.route(
            "/reviews/{id}/approve",
            web::patch().to(|path: web::Path<String>| async move {
                if path.as_str() == "r1" {
                    HttpResponse::Ok().json(json!({ "success": true, "message": "Review approved" }))
                } else {
                    HttpResponse::InternalServerError().json(json!({ "message": "Database unavailable" }))
                }
            }),
        )
        .route(
            "/reviews/{id}/reject",
            web::patch().to(|| async { HttpResponse::Ok().json(json!({ "success": true })) }),
        )
        .route(
            "/reviews/{id}",
            web::delete().to(|path: web::Path<String>| async move {
                if path.as_str() == "r3" {
                    HttpResponse::Ok().json(json!({ "success": true }))
                } else {
                    HttpResponse::NotFound().json(json!({ "success": false }))
                }
            }),
        )
        .route(
            "/reviews",
            web::get().to(|| async {
                HttpResponse::Ok().json(paged(
                    json!([review_json("r1", "PENDING"), review_json("r2", "REJECTED")]),
                    1,
                    1,
                    2,
                ))
            }),
        );
    }

    #[test]
    fn test_filter_and_counts() {
        let mut board = board();
        assert_eq!(board.visible().count(), 3);
        assert_eq!(board.count(ReviewStatus::Pending), 2);

        board.set_filter(Some(ReviewStatus::Approved));
        let ids: Vec<&str> = board.visible().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2"]);
    }

    #[actix_web::test]
    async fn test_approve_updates_row_after_confirmation() {
        let client = spawn_backend(moderation_backend).await;
        let mut board = board();

        board.approve(&client, "r1").await.unwrap();
        assert_eq!(board.get("r1").unwrap().status, ReviewStatus::Approved);

        board.reject(&client, "r3").await.unwrap();
        assert_eq!(board.get("r3").unwrap().status, ReviewStatus::Rejected);
    }

    #[actix_web::test]
    async fn test_failed_approve_leaves_row_untouched() {
        let client = spawn_backend(moderation_backend).await;
        let mut board = board();

        let toast = board.approve(&client, "r3").await.unwrap_err();
        assert_eq!(toast, "Database unavailable");
        assert_eq!(board.get("r3").unwrap().status, ReviewStatus::Pending);
    }

    #[actix_web::test]
    async fn test_delete_removes_only_confirmed_rows() {
        let client = spawn_backend(moderation_backend).await;
        let mut board = board();

        board.delete(&client, "r3").await.unwrap();
        assert!(board.get("r3").is_none());

        assert_eq!(board.delete(&client, "r1").await.unwrap_err(), "Failed to delete review");
        assert!(board.get("r1").is_some());
        assert_eq!(board.rows().len(), 2);
    }

    #[actix_web::test]
    async fn test_load_and_unreachable_backend() {
        let client = spawn_backend(moderation_backend).await;
        let board = ReviewBoard::load(&client, &ListQuery::default()).await.unwrap();
        assert_eq!(board.count(ReviewStatus::Rejected), 1);

        let toast = ReviewBoard::load(&unreachable_backend(), &ListQuery::default())
            .await
            .unwrap_err();
        assert_eq!(toast, "Failed to fetch reviews");
    }

    fn counting_backend(cfg: &mut web::ServiceConfig) {
        cfg.route(
            "/reviews",
            web::get().to(|req: actix_web::HttpRequest| async move {
                let query = req.query_string();
                if query.contains("status=REJECTED") {
                    return HttpResponse::ServiceUnavailable().finish();
                }
                let total = if query.contains("status=PENDING") { 14 } else { 52 };
                HttpResponse::Ok().json(paged(json!([]), 1, total as u32, total))
            }),
        );
    }

    #[actix_web::test]
    async fn test_counts_read_backend_totals() {
        let client = spawn_backend(counting_backend).await;
        let counts = ReviewCounts::fetch(&client).await;

        assert_eq!(counts.pending, Some(14));
        assert_eq!(counts.approved, Some(52));
        assert_eq!(counts.rejected, None);
    }
}
