use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, patch, post, web};
use serde::Serialize;
use serde::de::DeserializeOwned;

use jglobal_site::backend::{BackendClient, ListQuery, ProgressFn, Resource, UploadFile, UploadProgress};
use jglobal_site::common::{BackendError, SubmitError};
use jglobal_site::forms::{BlogForm, CategoryForm, EventForm, HouseForm, LandForm, TagForm};
use jglobal_site::models::{Blog, Category, Event, House, Image, Land, MediaItem, Review, Tag};
use jglobal_site::services::{DashboardStats, ImageStaging, ListingView};
use jglobal_site::types::ApiResponse;

use crate::web::forms::ListingEdit;
use crate::web::helpers::{
    admin_backend, backend_error, json_error, not_found, submit_error, upload_error,
};
use crate::web::multipart::{UploadError, is_multipart, read_data_form, read_form};
use crate::web::state::AppState;

fn parse_resource(segment: &str) -> Option<Resource> {
    segment
        .parse::<Resource>()
        .ok()
        .filter(|r| !matches!(r, Resource::Subscribers | Resource::Campaigns))
}

async fn list_view<T: DeserializeOwned + Serialize>(
    backend: &BackendClient,
    resource: Resource,
    query: &ListQuery,
) -> HttpResponse {
    match backend.list::<T>(resource, query).await {
        Ok(page) => HttpResponse::Ok().json(ListingView::new(query, page)),
        Err(e) => {
            log::error!("Admin listing of {resource} failed: {e}");
            backend_error(&e, &format!("Failed to fetch {resource}"))
        }
    }
}

async fn item<T: DeserializeOwned + Serialize>(
    backend: &BackendClient,
    resource: Resource,
    id: &str,
) -> HttpResponse {
    match backend.get::<T>(resource, id).await {
        Ok(item) => HttpResponse::Ok().json(ApiResponse::ok(item)),
        Err(e) => {
            log::error!("Fetching {resource} {id} failed: {e}");
            backend_error(&e, &format!("Failed to fetch {resource}"))
        }
    }
}

fn saved<T: Serialize>(resource: Resource, created: bool, result: Result<T, SubmitError>) -> HttpResponse {
    let (status, verb) = if created {
        (StatusCode::CREATED, "created")
    } else {
        (StatusCode::OK, "updated")
    };

    match result {
        Ok(item) => HttpResponse::build(status)
            .json(ApiResponse::ok(item).with_message(format!("{resource} {verb}"))),
        Err(e) => {
            if let SubmitError::Backend(inner) = &e {
                log::error!("Saving {resource} failed: {inner}");
            }
            submit_error(&e, &format!("Failed to save {resource}"))
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, HttpResponse> {
    serde_json::from_value(body)
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, format!("Invalid form: {e}")))
}

#[get("/admin")]
pub async fn dashboard(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let stats = DashboardStats::fetch(&admin_backend(&state, &req)).await;
    HttpResponse::Ok().json(ApiResponse::ok(stats))
}

#[get("/admin/{resource}")]
pub async fn list(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let Some(resource) = parse_resource(&path) else {
        return not_found();
    };
    let backend = admin_backend(&state, &req);

    match resource {
        Resource::Lands => list_view::<Land>(&backend, resource, &query).await,
        Resource::Houses => list_view::<House>(&backend, resource, &query).await,
        Resource::Blogs => list_view::<Blog>(&backend, resource, &query).await,
        Resource::Events => list_view::<Event>(&backend, resource, &query).await,
        Resource::Categories => list_view::<Category>(&backend, resource, &query).await,
        Resource::Tags => list_view::<Tag>(&backend, resource, &query).await,
        Resource::Reviews => list_view::<Review>(&backend, resource, &query).await,
        Resource::Media => list_view::<MediaItem>(&backend, resource, &query).await,
        Resource::Subscribers | Resource::Campaigns => not_found(),
    }
}

#[get("/admin/{resource}/{id}")]
pub async fn show(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (segment, id) = path.into_inner();
    let Some(resource) = parse_resource(&segment) else {
        return not_found();
    };
    let backend = admin_backend(&state, &req);

    match resource {
        Resource::Lands => item::<Land>(&backend, resource, &id).await,
        Resource::Houses => item::<House>(&backend, resource, &id).await,
        Resource::Blogs => item::<Blog>(&backend, resource, &id).await,
        Resource::Events => item::<Event>(&backend, resource, &id).await,
        Resource::Categories => item::<Category>(&backend, resource, &id).await,
        Resource::Tags => item::<Tag>(&backend, resource, &id).await,
        Resource::Reviews => item::<Review>(&backend, resource, &id).await,
        Resource::Media => item::<MediaItem>(&backend, resource, &id).await,
        Resource::Subscribers | Resource::Campaigns => not_found(),
    }
}

#[delete("/admin/{resource}/{id}")]
pub async fn remove(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (segment, id) = path.into_inner();
    let Some(resource) = parse_resource(&segment) else {
        return not_found();
    };

    match admin_backend(&state, &req).delete(resource, &id).await {
        Ok(()) => {
            log::info!("Deleted {resource} {id}");
            HttpResponse::Ok().json(ApiResponse::message(format!("{resource} deleted")))
        }
        Err(e) => {
            log::error!("Deleting {resource} {id} failed: {e}");
            backend_error(&e, &format!("Failed to delete {resource}"))
        }
    }
}

/// Multipart creates: the JSON form in the `data` part, files in the rest.
#[post("/admin/{resource}", guard = "is_multipart")]
pub async fn create_upload(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: Multipart,
) -> impl Responder {
    let Some(resource) = parse_resource(&path) else {
        return not_found();
    };
    let backend = admin_backend(&state, &req);

    match resource {
        Resource::Lands => match read_data_form::<ListingEdit<LandForm>>(payload).await {
            Ok((edit, files)) => match stage(ImageStaging::empty(), &edit, files) {
                Ok(staging) => saved(resource, true, backend.create_land(&edit.form, &staging).await),
                Err(res) => res,
            },
            Err(e) => upload_error(&e),
        },
        Resource::Houses => match read_data_form::<ListingEdit<HouseForm>>(payload).await {
            Ok((edit, files)) => match stage(ImageStaging::empty(), &edit, files) {
                Ok(staging) => {
                    saved(resource, true, backend.create_house(&edit.form, &staging).await)
                }
                Err(res) => res,
            },
            Err(e) => upload_error(&e),
        },
        Resource::Blogs => match read_data_form::<BlogForm>(payload).await {
            Ok((mut form, files)) => {
                form.cover = files.into_iter().next();
                saved(resource, true, backend.create_blog(&form).await)
            }
            Err(e) => upload_error(&e),
        },
        Resource::Events => match read_data_form::<EventForm>(payload).await {
            Ok((mut form, files)) => {
                form.images = files;
                saved(resource, true, backend.create_event(&form).await)
            }
            Err(e) => upload_error(&e),
        },
        Resource::Media => upload_media(&backend, payload).await,
        _ => not_found(),
    }
}

/// Each file becomes its own media record; progress is logged per chunk.
async fn upload_media(backend: &BackendClient, payload: Multipart) -> HttpResponse {
    let files = match read_form::<serde_json::Value>(payload).await {
        Ok((_, files)) if files.is_empty() => return upload_error(&UploadError::NoFiles),
        Ok((_, files)) => files,
        Err(e) => return upload_error(&e),
    };

    let mut uploaded: Vec<MediaItem> = Vec::with_capacity(files.len());
    for file in &files {
        let name = file.file_name.clone();
        let on_progress: ProgressFn = Arc::new(move |progress: UploadProgress| {
            log::debug!("Uploading {name}: {}%", progress.percent());
        });
        match backend.upload_media(file, Some(on_progress)).await {
            Ok(item) => uploaded.push(item),
            Err(e) => {
                log::error!("Uploading {} failed: {e}", file.file_name);
                return backend_error(&e, "Failed to upload media");
            }
        }
    }

    log::info!("Uploaded {} media files", uploaded.len());
    let message = format!("{} files uploaded", uploaded.len());
    HttpResponse::Created().json(ApiResponse::ok(uploaded).with_message(message))
}

/// JSON creates, for forms without files.
#[post("/admin/{resource}")]
pub async fn create(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let Some(resource) = parse_resource(&path) else {
        return not_found();
    };
    let backend = admin_backend(&state, &req);
    let body = body.into_inner();

    match resource {
        Resource::Lands => match parse_body::<LandForm>(body) {
            Ok(form) => saved(resource, true, backend.create_land(&form, &ImageStaging::empty()).await),
            Err(res) => res,
        },
        Resource::Houses => match parse_body::<HouseForm>(body) {
            Ok(form) => {
                saved(resource, true, backend.create_house(&form, &ImageStaging::empty()).await)
            }
            Err(res) => res,
        },
        Resource::Blogs => match parse_body::<BlogForm>(body) {
            Ok(form) => saved(resource, true, backend.create_blog(&form).await),
            Err(res) => res,
        },
        Resource::Events => match parse_body::<EventForm>(body) {
            Ok(form) => saved(resource, true, backend.create_event(&form).await),
            Err(res) => res,
        },
        Resource::Categories => match parse_body::<CategoryForm>(body) {
            Ok(form) => saved(resource, true, backend.create_category(&form).await),
            Err(res) => res,
        },
        Resource::Tags => match parse_body::<TagForm>(body) {
            Ok(form) => saved(resource, true, backend.create_tag(&form).await),
            Err(res) => res,
        },
        _ => not_found(),
    }
}

/// Replays the edit and the uploaded files over `staging`.
fn stage<F>(
    mut staging: ImageStaging,
    edit: &ListingEdit<F>,
    files: Vec<UploadFile>,
) -> Result<ImageStaging, HttpResponse> {
    edit.stage(&mut staging)
        .and_then(|()| edit.stage_uploads(&mut staging, files))
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(staging)
}

/// Loads the current images so the edit can be reconciled against them.
async fn staged_edit<T, F>(
    backend: &BackendClient,
    resource: Resource,
    id: &str,
    edit: &ListingEdit<F>,
    files: Vec<UploadFile>,
    images: impl FnOnce(T) -> Vec<Image>,
) -> Result<ImageStaging, HttpResponse>
where
    T: DeserializeOwned,
{
    let current: T = backend
        .get(resource, id)
        .await
        .map_err(|e: BackendError| backend_error(&e, &format!("Failed to fetch {resource}")))?;

    stage(ImageStaging::new(images(current)), edit, files)
}

#[patch("/admin/{resource}/{id}", guard = "is_multipart")]
pub async fn update_upload(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    payload: Multipart,
) -> impl Responder {
    let (segment, id) = path.into_inner();
    let Some(resource) = parse_resource(&segment) else {
        return not_found();
    };
    let backend = admin_backend(&state, &req);

    match resource {
        Resource::Lands => {
            let (edit, files) = match read_data_form::<ListingEdit<LandForm>>(payload).await {
                Ok(parsed) => parsed,
                Err(e) => return upload_error(&e),
            };
            match staged_edit(&backend, resource, &id, &edit, files, |land: Land| land.images).await {
                Ok(staging) => saved(resource, false, backend.update_land(&id, &edit.form, &staging).await),
                Err(res) => res,
            }
        }
        Resource::Houses => {
            let (edit, files) = match read_data_form::<ListingEdit<HouseForm>>(payload).await {
                Ok(parsed) => parsed,
                Err(e) => return upload_error(&e),
            };
            match staged_edit(&backend, resource, &id, &edit, files, |house: House| house.images)
                .await
            {
                Ok(staging) => {
                    saved(resource, false, backend.update_house(&id, &edit.form, &staging).await)
                }
                Err(res) => res,
            }
        }
        Resource::Blogs => match read_data_form::<BlogForm>(payload).await {
            Ok((mut form, files)) => {
                form.cover = files.into_iter().next();
                saved(resource, false, backend.update_blog(&id, &form).await)
            }
            Err(e) => upload_error(&e),
        },
        Resource::Events => match read_data_form::<EventForm>(payload).await {
            Ok((mut form, files)) => {
                form.images = files;
                saved(resource, false, backend.update_event(&id, &form).await)
            }
            Err(e) => upload_error(&e),
        },
        _ => not_found(),
    }
}

#[patch("/admin/{resource}/{id}")]
pub async fn update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let (segment, id) = path.into_inner();
    let Some(resource) = parse_resource(&segment) else {
        return not_found();
    };
    let backend = admin_backend(&state, &req);
    let body = body.into_inner();

    match resource {
        Resource::Lands => {
            let edit = match parse_body::<ListingEdit<LandForm>>(body) {
                Ok(edit) => edit,
                Err(res) => return res,
            };
            match staged_edit(&backend, resource, &id, &edit, Vec::new(), |land: Land| land.images).await {
                Ok(staging) => saved(resource, false, backend.update_land(&id, &edit.form, &staging).await),
                Err(res) => res,
            }
        }
        Resource::Houses => {
            let edit = match parse_body::<ListingEdit<HouseForm>>(body) {
                Ok(edit) => edit,
                Err(res) => return res,
            };
            match staged_edit(&backend, resource, &id, &edit, Vec::new(), |house: House| house.images)
                .await
            {
                Ok(staging) => {
                    saved(resource, false, backend.update_house(&id, &edit.form, &staging).await)
                }
                Err(res) => res,
            }
        }
        Resource::Blogs => match parse_body::<BlogForm>(body) {
            Ok(form) => saved(resource, false, backend.update_blog(&id, &form).await),
            Err(res) => res,
        },
        Resource::Events => match parse_body::<EventForm>(body) {
            Ok(form) => saved(resource, false, backend.update_event(&id, &form).await),
            Err(res) => res,
        },
        Resource::Categories => match parse_body::<CategoryForm>(body) {
            Ok(form) => saved(resource, false, backend.update_category(&id, &form).await),
            Err(res) => res,
        },
        Resource::Tags => match parse_body::<TagForm>(body) {
            Ok(form) => saved(resource, false, backend.update_tag(&id, &form).await),
            Err(res) => res,
        },
        _ => not_found(),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard)
        .service(list)
        .service(create_upload)
        .service(create)
        .service(show)
        .service(update_upload)
        .service(update)
        .service(remove);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::web::handlers::testing::{spawn_backend, test_state};
    use crate::web::multipart::testing::{multipart_body, multipart_request};
    use actix_web::http::Method;
    use actix_web::{App, test};
    use futures_util::TryStreamExt;
    use serde_json::json;

    /// Parts received by the fake backend as (field name, file name or text).
    type Seen = Arc<Mutex<Vec<(String, String)>>>;

    fn land(id: &str) -> serde_json::Value {
        json!({
            "id": id, "slug": "ibeju-plots", "title": "Ibeju plots", "description": "Dry land",
            "location": "Ibeju-Lekki", "status": "AVAILABLE",
            "units": [{ "size": 600.0, "unit": "sqm", "price": 9000000.0 }],
            "images": [
                { "id": "a", "url": "https://cdn.test/a.jpg", "isPrimary": true, "order": 0 },
                { "id": "b", "url": "https://cdn.test/b.jpg", "isPrimary": false, "order": 1 }
            ]
        })
    }

    async fn record_parts(mut payload: Multipart, seen: Seen) {
        while let Ok(Some(mut field)) = payload.try_next().await {
            let (name, file_name) = field
                .content_disposition()
                .map(|cd| {
                    (
                        cd.get_name().unwrap_or_default().to_string(),
                        cd.get_filename().map(str::to_string),
                    )
                })
                .unwrap_or_default();
            let mut bytes = Vec::new();
            while let Ok(Some(chunk)) = field.try_next().await {
                bytes.extend_from_slice(&chunk);
            }
            let value = file_name.unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            seen.lock().unwrap().push((name, value));
        }
    }

    fn fake_backend(seen: Seen) -> impl Fn(&mut web::ServiceConfig) + Send + Clone + 'static {
        move |cfg: &mut web::ServiceConfig| {
            let on_land = seen.clone();
            let on_media = seen.clone();
            cfg.route(
                "/lands/{id}",
                web::get().to(|path: web::Path<String>| async move {
                    HttpResponse::Ok().json(json!({ "success": true, "data": land(&path) }))
                }),
            )
            .route(
                "/lands/{id}",
                web::patch().to(move |path: web::Path<String>, payload: Multipart| {
                    let seen = on_land.clone();
                    async move {
                        record_parts(payload, seen).await;
                        HttpResponse::Ok().json(json!({ "success": true, "data": land(&path) }))
                    }
                }),
            )
            .route(
                "/media",
                web::post().to(move |payload: Multipart| {
                    let seen = on_media.clone();
                    async move {
                        record_parts(payload, seen).await;
                        HttpResponse::Created().json(json!({
                            "success": true,
                            "data": { "id": "m1", "url": "https://cdn.test/m1.jpg" }
                        }))
                    }
                }),
            );
        }
    }

    fn part<'a>(seen: &'a [(String, String)], name: &str) -> Vec<&'a str> {
        seen.iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[actix_web::test]
    async fn test_land_edit_sends_one_change_set_with_files() {
        let seen = Seen::default();
        let backend = spawn_backend(fake_backend(seen.clone())).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let data = json!({
            "title": "Ibeju plots", "description": "Dry land", "location": "Ibeju-Lekki",
            "units": [{ "size": 600.0, "unit": "sqm", "price": 9000000.0 }],
            "imagesToDelete": ["a"],
            "newImageDetails": [{ "caption": "Porch", "isPrimary": true }]
        });
        let body = multipart_body(Some(data), &[("porch.jpg", &b"jpeg-bytes"[..])]);
        let req = multipart_request(Method::PATCH, body)
            .uri("/admin/lands/l1")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let seen = seen.lock().unwrap().clone();
        assert_eq!(part(&seen, "images"), vec!["porch.jpg"]);

        let manage: serde_json::Value =
            serde_json::from_str(part(&seen, "manageImages")[0]).unwrap();
        assert_eq!(manage["delete"], json!(["a"]));
        let kept: Vec<&str> = manage["keep"]
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k["id"].as_str().unwrap())
            .collect();
        assert_eq!(kept, vec!["b"]);
        assert_eq!(manage["newImageDetails"][0]["caption"], "Porch");
        assert_eq!(manage["newImageDetails"][0]["isPrimary"], true);
        assert_eq!(manage["newImageDetails"][0]["order"], 2);
    }

    #[actix_web::test]
    async fn test_upload_without_data_part_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state("http://127.0.0.1:9")))
                .configure(configure),
        )
        .await;

        let body = multipart_body(None, &[("porch.jpg", &b"x"[..])]);
        let req = multipart_request(Method::POST, body).uri("/admin/lands").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_media_upload_forwards_each_file() {
        let seen = Seen::default();
        let backend = spawn_backend(fake_backend(seen.clone())).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&backend)))
                .configure(configure),
        )
        .await;

        let body = multipart_body(None, &[("one.jpg", &b"1"[..]), ("two.jpg", &b"22"[..])]);
        let req = multipart_request(Method::POST, body).uri("/admin/media").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

        let seen = seen.lock().unwrap().clone();
        assert_eq!(part(&seen, "file"), vec!["one.jpg", "two.jpg"]);

        let empty = multipart_body(None, &[]);
        let req = multipart_request(Method::POST, empty).uri("/admin/media").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_json_land_create_still_accepted() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state("http://127.0.0.1:9")))
                .configure(configure),
        )
        .await;

        // Blank title fails validation before any backend call
        let req = test::TestRequest::post()
            .uri("/admin/lands")
            .set_json(json!({ "title": "", "description": "", "location": "" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
