use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{Ready, ok};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::web::helpers::not_found;

const SECURITY_HEADERS: [(&str, &str); 6] = [
    // Prevent clickjacking
    ("x-frame-options", "DENY"),
    // Prevent MIME sniffing
    ("x-content-type-options", "nosniff"),
    ("x-xss-protection", "1; mode=block"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    (
        "content-security-policy",
        "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; connect-src 'self'; frame-ancestors 'none'",
    ),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

/// Security headers middleware
pub struct SecurityHeaders;

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SecurityHeadersMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityHeadersMiddleware { service })
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            let headers = res.headers_mut();
            for (name, value) in SECURITY_HEADERS {
                headers.insert(
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                );
            }

            Ok(res)
        })
    }
}

/// Cookies that must all be present and non-empty to reach `/admin`.
pub const AUTH_COOKIES: [&str; 3] = ["access_token", "user_id", "is_authenticated"];

/// What the gate decided for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    NotFound,
}

fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}

fn query_key(query: &str) -> Option<&str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == "key")
        .map(|(_, value)| value)
}

/// Route guard for the dashboard and the hidden login page.
///
/// Both failure modes answer with the plain 404 page so the admin surface
/// is indistinguishable from a missing route.
pub fn decide(path: &str, query: &str, has_cookie: impl Fn(&str) -> bool, admin_key: &str) -> GateDecision {
    if is_admin_path(path) {
        if AUTH_COOKIES.iter().all(|name| has_cookie(name)) {
            return GateDecision::Allow;
        }
        return GateDecision::NotFound;
    }

    if path == "/admin-login" {
        return match query_key(query) {
            Some(key) if !admin_key.is_empty() && key == admin_key => GateDecision::Allow,
            _ => GateDecision::NotFound,
        };
    }

    GateDecision::Allow
}

pub struct AdminGate {
    admin_key: Arc<String>,
}

impl AdminGate {
    pub fn new(admin_key: impl Into<String>) -> Self {
        Self {
            admin_key: Arc::new(admin_key.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdminGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdminGateMiddleware {
            service: Rc::new(service),
            admin_key: Arc::clone(&self.admin_key),
        })
    }
}

pub struct AdminGateMiddleware<S> {
    service: Rc<S>,
    admin_key: Arc<String>,
}

impl<S, B> Service<ServiceRequest> for AdminGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let decision = decide(
            req.path(),
            req.query_string(),
            |name| {
                req.cookie(name)
                    .is_some_and(|c| !c.value().trim().is_empty())
            },
            &self.admin_key,
        );

        if decision == GateDecision::NotFound {
            log::debug!("Gate hid {} from unauthenticated request", req.path());
            let (req, _) = req.into_parts();
            let res: HttpResponse = not_found();
            return Box::pin(async move {
                Ok(ServiceResponse::new(req, res).map_into_right_body())
            });
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
