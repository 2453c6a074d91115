use actix_web::http::StatusCode;
use actix_web::http::header::SET_COOKIE;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};

use jglobal_site::backend::RelayedResponse;
use jglobal_site::types::{ApiResponse, LoginRequest};

use crate::web::forms::AdminLoginQuery;
use crate::web::helpers::{admin_backend, backend_error, expired_cookie, form_error, json_error, render};
use crate::web::security::{LOGIN_RULE, client_ip};
use crate::web::state::AppState;
use crate::web::templates::AdminLoginTemplate;

/// Every cookie the backend may have set for a session.
pub const SESSION_COOKIES: [&str; 5] = [
    "access_token",
    "refresh_token",
    "user_id",
    "is_authenticated",
    "user_role",
];

// Reached only through the gate, which already checked the key.
#[get("/admin-login")]
pub async fn login_page(query: web::Query<AdminLoginQuery>) -> impl Responder {
    render(AdminLoginTemplate {
        key: query.into_inner().key,
    })
}

fn relay(relayed: RelayedResponse) -> HttpResponse {
    let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = HttpResponse::build(status);
    for cookie in relayed.set_cookies {
        builder.append_header((SET_COOKIE, cookie));
    }
    builder.json(relayed.body)
}

#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> impl Responder {
    let ip = client_ip(&req);
    if !state.rate_limiter.check("login", &ip, LOGIN_RULE) {
        log::warn!("Login rate limit hit for {ip}");
        return json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many login attempts. Please try again later.",
        );
    }

    let credentials = body.into_inner();
    if let Err(e) = credentials.validate() {
        return form_error(&e);
    }

    match state.backend.signin(&credentials).await {
        Ok(relayed) => {
            if relayed.status >= 400 {
                log::info!("Sign-in refused for {} ({})", credentials.email, relayed.status);
            }
            relay(relayed)
        }
        Err(e) => {
            log::error!("Sign-in request failed: {e}");
            backend_error(&e, "Login failed. Please try again.")
        }
    }
}

#[post("/api/auth/logout")]
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    // Local cookies are cleared whatever the backend says.
    if let Err(e) = admin_backend(&state, &req).logout().await {
        log::warn!("Backend logout failed: {e}");
    }

    let secure = state.config.secure_cookies;
    let mut builder = HttpResponse::Ok();
    for name in SESSION_COOKIES {
        builder.cookie(expired_cookie(name, secure));
    }
    builder.json(ApiResponse::message("Logged out"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login_page).service(login).service(logout);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::handlers::testing::{spawn_backend, test_state};
    use actix_web::{App, test};

    fn fake_auth(cfg: &mut web::ServiceConfig) {
        cfg.route(
            "/auth/signin",
            web::post().to(|body: web::Json<serde_json::Value>| async move {
                if body["password"] == "correct" {
                    HttpResponse::Ok()
                        .append_header((SET_COOKIE, "access_token=abc; Path=/; HttpOnly"))
                        .append_header((SET_COOKIE, "user_id=u1; Path=/"))
                        .json(serde_json::json!({ "success": true, "message": "Signed in" }))
                } else {
                    HttpResponse::Unauthorized()
                        .json(serde_json::json!({ "success": false, "message": "Invalid credentials" }))
                }
            }),
        )
        .route(
            "/auth/logout",
            web::post().to(|| async { HttpResponse::InternalServerError().finish() }),
        );
    }

    #[actix_web::test]
    async fn test_login_relays_every_set_cookie() {
        let backend = spawn_backend(fake_auth).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "email": "ops@example.com", "password": "correct" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let cookies: Vec<_> = res
            .headers()
            .get_all(SET_COOKIE)
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        assert_eq!(
            cookies,
            vec!["access_token=abc; Path=/; HttpOnly", "user_id=u1; Path=/"]
        );
    }

    #[actix_web::test]
    async fn test_login_passes_backend_refusal_through() {
        let backend = spawn_backend(fake_auth).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "email": "ops@example.com", "password": "wrong" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[actix_web::test]
    async fn test_login_rejects_blank_credentials_locally() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state("http://127.0.0.1:9")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "email": "", "password": "x" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_logout_clears_session_cookies_even_when_backend_fails() {
        let backend = spawn_backend(fake_auth).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/auth/logout").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cleared: Vec<_> = res.response().cookies().collect();
        assert_eq!(cleared.len(), SESSION_COOKIES.len());
        for name in SESSION_COOKIES {
            let cookie = cleared
                .iter()
                .find(|c| c.name() == name)
                .unwrap_or_else(|| panic!("{name} was not cleared"));
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
        }
    }
}
