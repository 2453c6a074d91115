mod web;

use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use tracing_subscriber::EnvFilter;

use jglobal_site::config::SiteConfig;

use crate::web::helpers::{json_config, query_config};
use crate::web::middleware::{AdminGate, SecurityHeaders};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SiteConfig::from_env().map_err(std::io::Error::other)?;
    let bind_addr = config.bind_addr.clone();
    let admin_key = config.admin_key.clone();

    let state = web::AppState::from_config(config).map_err(std::io::Error::other)?;
    log::info!(
        "Serving on {bind_addr}, backend at {}",
        state.backend.base_url()
    );
    let state = Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .app_data(query_config())
            .wrap(AdminGate::new(admin_key.clone()))
            .wrap(SecurityHeaders)
            .wrap(Logger::default())
            .service(Files::new("/static", "./static").prefer_utf8(true))
            .configure(web::handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
