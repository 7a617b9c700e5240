//! Security middleware adding response headers and HTTPS enforcement.
//!
//! Every response gets `X-Content-Type-Options` and `X-Frame-Options`.
//! Production additionally rejects plain-HTTP requests and sends HSTS.

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use tracing::warn;

use tn_shared::config::Environment;
use tn_shared::errors::{error_codes, ErrorResponse};

/// Security middleware factory
pub struct SecurityMiddleware {
    /// Whether plain-HTTP requests are rejected
    enforce_https: bool,
    /// Whether HSTS is sent along with the baseline headers
    strict_headers: bool,
}

impl SecurityMiddleware {
    /// Environment-based configuration
    pub fn new() -> Self {
        let environment = Environment::from_env();
        Self {
            enforce_https: environment.is_production(),
            strict_headers: environment.is_production(),
        }
    }

    /// No HTTPS enforcement, baseline headers only
    pub fn development() -> Self {
        Self {
            enforce_https: false,
            strict_headers: false,
        }
    }

    /// HTTPS enforcement plus HSTS
    pub fn production() -> Self {
        Self {
            enforce_https: true,
            strict_headers: true,
        }
    }
}

impl Default for SecurityMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

// Boxes the response body; the factory in `app.rs` relies on this being
// the outermost middleware so the application type stays nameable.
impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            enforce_https: self.enforce_https,
            strict_headers: self.strict_headers,
        }))
    }
}

/// Security middleware service implementation
pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    enforce_https: bool,
    strict_headers: bool,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let enforce_https = self.enforce_https;
        let strict_headers = self.strict_headers;

        Box::pin(async move {
            if enforce_https && !is_secure_request(&req) {
                warn!(
                    method = %req.method(),
                    path = %req.path(),
                    "insecure request blocked"
                );
                let forbidden = HttpResponse::Forbidden()
                    .json(ErrorResponse::new(error_codes::FORBIDDEN, "HTTPS is required"));
                let mut response = req.into_response(forbidden);
                add_security_headers(&mut response, strict_headers);
                return Ok(response);
            }

            let mut response = service.call(req).await?.map_into_boxed_body();

            add_security_headers(&mut response, strict_headers);

            Ok(response)
        })
    }
}

/// Checks if the request arrived over HTTPS, directly or via proxy
fn is_secure_request(req: &ServiceRequest) -> bool {
    let conn_info = req.connection_info();
    if conn_info.scheme() == "https" {
        return true;
    }

    // connection_info already folds in Forwarded/X-Forwarded-Proto; keep
    // localhost usable for health probes behind the load balancer
    let host = conn_info.host();
    matches!(host, "localhost" | "127.0.0.1" | "[::1]")
        || host.starts_with("localhost:")
        || host.starts_with("127.0.0.1:")
        || host.starts_with("[::1]:")
}

fn add_security_headers<B>(response: &mut ServiceResponse<B>, strict: bool) {
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    if strict {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};

    #[actix_web::test]
    async fn test_baseline_headers_are_added() {
        let app = test::init_service(
            App::new()
                .wrap(SecurityMiddleware::development())
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let response = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
        assert_eq!(response.headers().get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert!(response.headers().get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[actix_web::test]
    async fn test_production_blocks_plain_http() {
        let app = test::init_service(
            App::new()
                .wrap(SecurityMiddleware::production())
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/")
            .insert_header((header::HOST, "api.tradenest.example"))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        // The rejection itself carries the security headers
        assert_eq!(response.headers().get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    }

    #[actix_web::test]
    async fn test_production_accepts_forwarded_https_and_sends_hsts() {
        let app = test::init_service(
            App::new()
                .wrap(SecurityMiddleware::production())
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/")
            .insert_header((header::HOST, "api.tradenest.example"))
            .insert_header(("X-Forwarded-Proto", "https"))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::STRICT_TRANSPORT_SECURITY).unwrap(),
            "max-age=31536000; includeSubDomains"
        );
    }
}
