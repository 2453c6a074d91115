pub mod admin;
pub mod auth;
pub mod comments;
pub mod contact;
pub mod newsletter;
pub mod public;
pub mod reviews;

use actix_web::web;

use crate::web::helpers::not_found;

/// Registers every route. The generic `/admin/{resource}` routes go last so the
/// newsletter and review routes win over them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    auth::configure(cfg);
    contact::configure(cfg);
    comments::configure(cfg);
    public::configure(cfg);
    reviews::configure(cfg);
    newsletter::configure(cfg);
    admin::configure(cfg);
    cfg.default_service(web::to(|| async { not_found() }));
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::handlers::testing::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn test_unknown_routes_render_not_found_page() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state("http://127.0.0.1:9")))
                .configure(configure),
        )
        .await;

        for uri in ["/nope", "/admin/settings", "/admin/settings/1"] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }
}
