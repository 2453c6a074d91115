mod common;

#[cfg(test)]
pub mod newsletter_tests {
    use actix_web::{HttpResponse, web};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    use super::common::*;

    use jglobal_site::common::{FormError, SubmitError};
    use jglobal_site::models::{NewsletterSubscriber, SendAck};
    use jglobal_site::services::CampaignDraft;
    use jglobal_site::services::newsletter::*;

    fn subscriber(email: &str, name: Option<&str>, active: bool) -> NewsletterSubscriber {
        NewsletterSubscriber {
            id: email.to_string(),
            email: email.to_string(),
            name: name.map(str::to_string),
            source: Some("footer".to_string()),
            is_active: active,
            subscribed_at: Some(Utc.with_ymd_and_hms(2026, 3, 14, 8, 30, 0).unwrap()),
        }
    }

    #[test]
    fn test_export_csv_columns_and_quoting() {
        let csv = export_csv(&[
            subscriber("ada@example.com", Some("Ada, L."), true),
            subscriber("bo@example.com", None, false),
        ])
        .unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "email,name,source,status,subscribed_at");
        assert_eq!(lines[1], "ada@example.com,\"Ada, L.\",footer,active,2026-03-14T08:30:00+00:00");
        assert_eq!(lines[2], "bo@example.com,,footer,unsubscribed,2026-03-14T08:30:00+00:00");
    }

    #[test]
    fn test_export_filename_is_dated() {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        assert_eq!(export_filename(now), "newsletter-subscribers-2026-10-14.csv");
    }

    #[test]
    fn test_draft_validation() {
        let draft = CampaignDraft {
            subject: "October listings".into(),
            content: "<p>New plots</p>".into(),
        };
        assert!(draft.validate().is_ok());

        let long = CampaignDraft {
            subject: "x".repeat(201),
            ..draft.clone()
        };
        assert!(matches!(long.validate(), Err(FormError::Invalid { field: "subject", .. })));

        let empty = CampaignDraft {
            content: " ".into(),
            ..draft
        };
        assert_eq!(empty.validate(), Err(FormError::Required("content")));
    }

    #[test]
    fn test_ack_summary_mentions_batches() {
        let ack = SendAck {
            campaign_id: Some("c1".into()),
            total_recipients: 250,
            batch_size: Some(50),
            message: None,
        };
        assert_eq!(
            ack_summary(&ack),
            "Campaign queued for 250 recipients. Emails go out in batches of 50."
        );
        assert_eq!(
            ack_summary(&SendAck { batch_size: None, ..ack }),
            "Campaign queued for 250 recipients."
        );
    }

    #[actix_web::test]
    async fn test_send_campaign_creates_then_sends() {
        let calls: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let log = calls.clone();

        let client = spawn_backend(move |cfg: &mut web::ServiceConfig| {
            let on_create = log.clone();
            let on_send = log.clone();
            cfg.route(
                "/newsletter/campaigns",
                web::post().to(move |body: web::Json<serde_json::Value>| {
                    let on_create = on_create.clone();
                    async move {
                        on_create.lock().unwrap().push(format!("create:{}", body["subject"]));
                        HttpResponse::Created().json(envelope(json!({ "id": "c9", "subject": body["subject"] })))
                    }
                }),
            )
            .route(
                "/newsletter/campaigns/{id}/send",
                web::post().to(move |path: web::Path<String>| {
                    let on_send = on_send.clone();
                    async move {
                        on_send.lock().unwrap().push(format!("send:{}", path.into_inner()));
                        HttpResponse::Ok().json(envelope(json!({ "totalRecipients": 3 })))
                    }
                }),
            );
        })
        .await;

        let draft = CampaignDraft {
            subject: " Hello ".into(),
            content: "<p>Hi</p>".into(),
        };
        let ack = send_campaign(&client, &draft).await.unwrap();

        assert_eq!(ack.campaign_id.as_deref(), Some("c9"));
        assert_eq!(ack.total_recipients, 3);
        assert_eq!(
            calls.lock().unwrap().clone(),
            vec!["create:\"Hello\"".to_string(), "send:c9".to_string()]
        );
    }

    #[actix_web::test]
    async fn test_invalid_draft_is_never_sent() {
        let draft = CampaignDraft::default();
        let err = send_campaign(&unreachable_backend(), &draft).await.unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(FormError::Required("subject"))));
    }
}
