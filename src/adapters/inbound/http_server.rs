//! Lookup HTTP Server
//!
//! JSON API exposing IP geolocation lookups, a health check and a
//! welcome page, wrapped in CORS, timeout and tracing middleware.

use crate::application::LookupService;
use crate::domain::entities::{ErrorResponse, LookupRequestContext, LookupResponse};
use crate::domain::errors::LookupError;
use crate::domain::services::CorsPolicy;
use crate::infrastructure::ShutdownController;
use axum::{
    extract::{rejection::PathRejection, ConnectInfo, Path, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Upper bound on handling a single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";
const LOOKUP_PREFIX: &str = "/lookup/";

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Welcome response for `/`.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub example_usage: String,
}

/// Shared handler state. Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub service: LookupService,
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    pub fn new(service: LookupService, cors: CorsPolicy) -> Self {
        Self {
            service,
            cors: Arc::new(cors),
        }
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::new(self.to_string(), code))).into_response()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = state.cors.clone();

    Router::new()
        .route("/", get(root_handler).options(root_handler))
        .route("/healthz", get(healthz_handler).options(healthz_handler))
        .route("/lookup", get(lookup_self_handler).options(lookup_self_handler))
        .route("/lookup/", get(lookup_self_handler).options(lookup_self_handler))
        .route("/lookup/:ip", get(lookup_path_handler).options(lookup_path_handler))
        .route(
            "/lookup/:ip/*rest",
            get(lookup_path_handler).options(lookup_path_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::map_response(timeout_as_json))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(middleware::from_fn_with_state(cors, cors_middleware)),
        )
}

/// Serve on an already bound listener until `shutdown` fires.
///
/// In-flight requests are allowed to finish; the caller bounds how long
/// that may take.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: ShutdownController,
) -> anyhow::Result<()> {
    let app = router(state);
    let mut shutdown_rx = shutdown.subscribe();

    tracing::info!("lookup server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        // Subscribed above, so a signal sent before this point is only
        // visible through the flag.
        if !shutdown.is_shutdown() {
            let _ = shutdown_rx.recv().await;
        }
    })
    .await?;

    tracing::info!("lookup server stopped");
    Ok(())
}

/// HTTP server for the lookup API.
pub struct HttpServer {
    listen_addr: String,
    state: AppState,
}

impl HttpServer {
    pub fn new(listen_addr: String, state: AppState) -> Self {
        Self { listen_addr, state }
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(self, shutdown: ShutdownController) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.listen_addr).await?;
        serve(listener, self.state, shutdown).await
    }
}

// Middleware

/// `TimeoutLayer` answers an expired request with a bare 408; give it the
/// same JSON error body as every other failure.
async fn timeout_as_json(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(ErrorResponse::new("Request Timeout", 408)),
    )
        .into_response()
}

async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());
    let decision = policy.decide(origin, req.method() == Method::OPTIONS);

    let mut response = if decision.terminate {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    for (name, value) in decision.headers {
        let Ok(value) = HeaderValue::from_str(&value) else {
            tracing::warn!("skipping unencodable CORS header {}: {}", name, value);
            continue;
        };
        let name = HeaderName::from_static(name);
        if name == header::VARY {
            headers.append(name, value);
        } else {
            headers.insert(name, value);
        }
    }

    response
}

// Handler functions

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn request_context(
    path_ip: Option<String>,
    headers: &HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> LookupRequestContext {
    LookupRequestContext {
        path_ip,
        forwarded_for: header_str(headers, X_FORWARDED_FOR),
        real_ip: header_str(headers, X_REAL_IP),
        peer_addr: connect_info.map(|ConnectInfo(addr)| addr.to_string()),
    }
}

async fn root_handler() -> impl IntoResponse {
    Json(WelcomeResponse {
        message: "Welcome to the IP Lookup Service. Please use the /lookup endpoint to find GeoIP information.".to_string(),
        example_usage: "/lookup/8.8.8.8 or /lookup/".to_string(),
    })
}

async fn healthz_handler(State(state): State<AppState>) -> Response {
    if !state.service.is_ready() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("GeoIP database not loaded", 500)),
        )
            .into_response();
    }
    Json(HealthResponse {
        status: "ok".to_string(),
    })
    .into_response()
}

async fn lookup_self_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Result<Json<LookupResponse>, LookupError> {
    let ctx = request_context(None, &headers, connect_info);
    state.service.lookup(&ctx).map(Json)
}

/// First segment after `/lookup/`, still percent-encoded.
fn raw_lookup_segment(uri: &Uri) -> &str {
    let rest = uri.path().strip_prefix(LOOKUP_PREFIX).unwrap_or_default();
    rest.split('/').next().unwrap_or_default()
}

/// Serves `/lookup/{ip}` and `/lookup/{ip}/...`; only the first segment
/// names the address.
async fn lookup_path_handler(
    State(state): State<AppState>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    uri: Uri,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Result<Json<LookupResponse>, LookupError> {
    let ip = match params {
        Ok(Path(mut params)) => params.remove("ip").unwrap_or_default(),
        Err(rejection) => {
            // e.g. a segment that does not decode to UTF-8
            tracing::debug!("undecodable lookup path {}: {}", uri.path(), rejection);
            return Err(LookupError::invalid_ip(raw_lookup_segment(&uri)));
        }
    };
    let ctx = request_context(Some(ip), &headers, connect_info);
    state.service.lookup(&ctx).map(Json)
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Not Found", 404)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::GeoRecord;
    use crate::domain::errors::GeoLookupError;
    use crate::domain::ports::GeoResolver;
    use crate::domain::value_objects::AllowedOrigins;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use http_body_util::BodyExt;
    use std::collections::HashMap;
    use std::net::IpAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    // ===== Mock Implementations =====

    #[derive(Default)]
    struct MockGeoResolver {
        records: HashMap<IpAddr, GeoRecord>,
        calls: AtomicUsize,
    }

    impl MockGeoResolver {
        fn with(mut self, ip: &str, record: GeoRecord) -> Self {
            self.records.insert(ip.parse().unwrap(), record);
            self
        }
    }

    impl GeoResolver for MockGeoResolver {
        fn lookup(&self, ip: IpAddr) -> Result<GeoRecord, GeoLookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.records.get(&ip).cloned().ok_or(GeoLookupError::NotFound)
        }
    }

    fn us_record() -> GeoRecord {
        GeoRecord {
            city: "Mountain View".to_string(),
            country_code: "US".to_string(),
            country_name: "United States".to_string(),
            continent: "North America".to_string(),
            latitude: 37.386,
            longitude: -122.0838,
            time_zone: "America/Los_Angeles".to_string(),
            postal_code: "94035".to_string(),
            subdivision_name: Some("California".to_string()),
        }
    }

    fn resolver() -> Arc<MockGeoResolver> {
        Arc::new(
            MockGeoResolver::default()
                .with("8.8.8.8", us_record())
                .with("1.2.3.4", GeoRecord {
                    country_code: "AU".to_string(),
                    ..Default::default()
                })
                .with("9.9.9.9", GeoRecord::default())
                .with("203.0.113.5", GeoRecord::default()),
        )
    }

    fn create_test_app(resolver: Arc<MockGeoResolver>, origins: &str) -> Router {
        let service = LookupService::new(Some(resolver as Arc<dyn GeoResolver>));
        router(AppState::new(
            service,
            CorsPolicy::new(AllowedOrigins::parse(origins)),
        ))
    }

    fn create_unloaded_app() -> Router {
        router(AppState::new(LookupService::new(None), CorsPolicy::default()))
    }

    fn get(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ===== Routes =====

    #[tokio::test]
    async fn test_root_handler() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["example_usage"], "/lookup/8.8.8.8 or /lookup/");
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/nope")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"message": "Not Found", "code": 404})
        );
    }

    #[tokio::test]
    async fn test_healthz_ok() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/healthz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_healthz_without_database() {
        let response = create_unloaded_app().oneshot(get("/healthz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            &bytes[..],
            br#"{"message":"GeoIP database not loaded","code":500}"#
        );
    }

    // ===== Lookup =====

    #[tokio::test]
    async fn test_lookup_path_success() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/lookup/8.8.8.8")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "ip": "8.8.8.8",
                "city": "Mountain View",
                "country_code": "US",
                "country_name": "United States",
                "continent": "North America",
                "latitude": 37.386,
                "longitude": -122.0838,
                "time_zone": "America/Los_Angeles",
                "postal_code": "94035",
                "subdivision_name": "California"
            })
        );
    }

    #[tokio::test]
    async fn test_lookup_omits_subdivision_when_absent() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/lookup/9.9.9.9")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body.get("subdivision_name").is_none());
        assert_eq!(body["city"], "");
    }

    #[tokio::test]
    async fn test_lookup_invalid_ip() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/lookup/999.999.999.999")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "message": "Invalid IP address format: 999.999.999.999",
                "code": 400
            })
        );
    }

    #[tokio::test]
    async fn test_lookup_undecodable_segment_is_json_400() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/lookup/%FF")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "message": "Invalid IP address format: %FF",
                "code": 400
            })
        );
    }

    #[tokio::test]
    async fn test_lookup_ignores_extra_segments() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/lookup/8.8.8.8/extra/more")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ip"], "8.8.8.8");
        assert_eq!(body["country_code"], "US");
    }

    #[tokio::test]
    async fn test_lookup_mapped_ipv4_reports_plain_ipv4() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/lookup/::ffff:8.8.8.8")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ip"], "8.8.8.8");
        assert_eq!(body["city"], "Mountain View");
    }

    #[test]
    fn test_raw_lookup_segment() {
        let uri: Uri = "/lookup/%FF/x?q=1".parse().unwrap();
        assert_eq!(raw_lookup_segment(&uri), "%FF");
        let uri: Uri = "/elsewhere".parse().unwrap();
        assert_eq!(raw_lookup_segment(&uri), "");
    }

    // ===== Timeout =====

    #[tokio::test]
    async fn test_timeout_as_json_rewrites_408() {
        let response = timeout_as_json(StatusCode::REQUEST_TIMEOUT.into_response()).await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"message": "Request Timeout", "code": 408})
        );
    }

    #[tokio::test]
    async fn test_timeout_as_json_passes_other_responses() {
        let response = timeout_as_json(StatusCode::NO_CONTENT.into_response()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_json() {
        let app = Router::new()
            .route(
                "/slow",
                axum::routing::get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::map_response(timeout_as_json))
                    .layer(TimeoutLayer::new(Duration::from_millis(20))),
            );

        let response = app.oneshot(get("/slow")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_json(response).await["code"], 408);
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/lookup/10.0.0.1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "message": "GeoIP data not found for IP: 10.0.0.1",
                "code": 404
            })
        );
    }

    #[tokio::test]
    async fn test_lookup_forwarded_for() {
        let app = create_test_app(resolver(), "");
        let request = HttpRequest::builder()
            .uri("/lookup/")
            .header("X-Forwarded-For", "1.2.3.4, 5.6.7.8")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ip"], "1.2.3.4");
        assert_eq!(body["country_code"], "AU");
    }

    #[tokio::test]
    async fn test_lookup_real_ip() {
        let app = create_test_app(resolver(), "");
        let request = HttpRequest::builder()
            .uri("/lookup")
            .header("X-Forwarded-For", "")
            .header("X-Real-IP", "9.9.9.9")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ip"], "9.9.9.9");
    }

    #[tokio::test]
    async fn test_lookup_peer_address() {
        let app = create_test_app(resolver(), "");
        let mut request = get("/lookup/");
        let peer: SocketAddr = "203.0.113.5:54321".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ip"], "203.0.113.5");
    }

    #[tokio::test]
    async fn test_lookup_nothing_to_resolve() {
        let app = create_test_app(resolver(), "");
        let response = app.oneshot(get("/lookup/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Could not determine IP address from request"
        );
    }

    #[tokio::test]
    async fn test_lookup_without_database() {
        let response = create_unloaded_app()
            .oneshot(get("/lookup/8.8.8.8"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"message": "GeoIP service not available", "code": 500})
        );
    }

    // ===== CORS =====

    #[tokio::test]
    async fn test_cors_wildcard_without_credentials() {
        let app = create_test_app(resolver(), "*");
        let request = HttpRequest::builder()
            .uri("/lookup/8.8.8.8")
            .header("Origin", "http://x.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert!(headers.get("access-control-allow-credentials").is_none());
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET, POST, OPTIONS, PUT, DELETE"
        );
    }

    #[tokio::test]
    async fn test_cors_exact_match() {
        let app = create_test_app(resolver(), "http://a.com");
        let request = HttpRequest::builder()
            .uri("/healthz")
            .header("Origin", "http://a.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "http://a.com"
        );
        assert_eq!(headers.get("vary").unwrap(), "Origin");
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
        assert!(headers.get("access-control-max-age").is_none());
    }

    #[tokio::test]
    async fn test_cors_disallowed_origin_still_served() {
        let app = create_test_app(resolver(), "http://a.com");
        let request = HttpRequest::builder()
            .uri("/lookup/8.8.8.8")
            .header("Origin", "http://b.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .keys()
            .all(|k| !k.as_str().starts_with("access-control-")));
    }

    #[tokio::test]
    async fn test_cors_preflight_short_circuits() {
        let resolver = resolver();
        let app = create_test_app(resolver.clone(), "http://a.com");
        let request = HttpRequest::builder()
            .method("OPTIONS")
            .uri("/lookup/8.8.8.8")
            .header("Origin", "http://a.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get("access-control-allow-credentials").unwrap(),
            "true"
        );
        assert_eq!(
            response.headers().get("access-control-max-age").unwrap(),
            "86400"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cors_preflight_on_unknown_path() {
        let app = create_test_app(resolver(), "*");
        let request = HttpRequest::builder()
            .method("OPTIONS")
            .uri("/anything")
            .header("Origin", "http://x.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_cors_disallowed_preflight_passes_through() {
        let resolver = resolver();
        let app = create_test_app(resolver.clone(), "http://a.com");
        let request = HttpRequest::builder()
            .method("OPTIONS")
            .uri("/lookup/8.8.8.8")
            .header("Origin", "http://b.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("access-control-allow-origin").is_none());
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cors_without_configured_origins() {
        let app = create_test_app(resolver(), "");
        let request = HttpRequest::builder()
            .uri("/")
            .header("Origin", "http://a.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    // ===== Serve =====

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let controller = ShutdownController::new();
        let service = LookupService::new(Some(resolver() as Arc<dyn GeoResolver>));

        let handle = tokio::spawn(serve(
            listener,
            AppState::new(service, CorsPolicy::default()),
            controller.clone(),
        ));

        controller.shutdown();

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(result.unwrap().unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_http_server_run_reports_bind_failure() {
        let server = HttpServer::new(
            "not-an-address".to_string(),
            AppState::new(LookupService::new(None), CorsPolicy::default()),
        );
        assert!(server.run(ShutdownController::new()).await.is_err());
    }
}
