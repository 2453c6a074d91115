#![allow(dead_code)]

use actix_web::{App, HttpServer, web};
use serde_json::{Value, json};

use jglobal_site::backend::{BackendClient, UploadFile};
use jglobal_site::models::*;

pub fn image(id: &str, order: i32, is_primary: bool) -> Image {
    Image {
        id: id.to_string(),
        url: format!("https://cdn.jglobal.test/{id}.jpg"),
        caption: None,
        is_primary,
        order,
    }
}

/// `[{id:"a", order:0, primary}, {id:"b", order:1}]`
pub fn seed_images() -> Vec<Image> {
    vec![image("a", 0, true), image("b", 1, false)]
}

pub fn upload(name: &str) -> UploadFile {
    UploadFile::new(name, "image/jpeg", name.as_bytes().to_vec())
}

pub fn unit(size: f64, price: f64) -> Unit {
    Unit {
        id: None,
        size,
        unit: "sqm".to_string(),
        price,
        available: true,
    }
}

pub fn location() -> Location {
    Location {
        location: "Plot 12, Lekki Phase 1".to_string(),
        city: Some("Lagos".to_string()),
        state: Some("Lagos".to_string()),
        country: Some("Nigeria".to_string()),
        latitude: Some(6.4474),
        longitude: Some(3.4720),
    }
}

pub fn land_json(id: &str) -> Value {
    json!({
        "id": id,
        "slug": format!("land-{id}"),
        "title": format!("Land {id}"),
        "description": "Dry land with C of O",
        "location": "Plot 12, Lekki Phase 1",
        "city": "Lagos",
        "status": "AVAILABLE",
        "units": [{ "size": 600.0, "unit": "sqm", "price": 25000000.0 }],
        "images": [
            { "id": "a", "url": "https://cdn.jglobal.test/a.jpg", "isPrimary": true, "order": 0 },
            { "id": "b", "url": "https://cdn.jglobal.test/b.jpg", "isPrimary": false, "order": 1 }
        ]
    })
}

pub fn review_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "rating": 4,
        "comment": "Smooth inspection",
        "reviewerName": "Tolu",
        "status": status,
        "landId": "land-1"
    })
}

pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub fn paged(data: Value, current_page: u32, total_pages: u32, total_items: u64) -> Value {
    json!({
        "success": true,
        "data": data,
        "pagination": {
            "currentPage": current_page,
            "totalPages": total_pages,
            "totalItems": total_items,
            "itemsPerPage": 10,
            "hasNext": current_page < total_pages,
            "hasPrevious": current_page > 1
        }
    })
}

/// Serves `routes` on an ephemeral port; returns a client pointed at it.
pub async fn spawn_backend<F>(routes: F) -> BackendClient
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let server = HttpServer::new(move || App::new().configure(routes.clone()))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind fake backend");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    BackendClient::new(&format!("http://{addr}"), None).expect("backend client")
}

/// A base URL nothing listens on.
pub fn unreachable_backend() -> BackendClient {
    BackendClient::new("http://127.0.0.1:9", None).expect("backend client")
}
