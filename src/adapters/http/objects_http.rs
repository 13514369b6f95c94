//! Objects HTTP server.
//!
//! Exposes the registry service under `/v1/rmq/objects`. Credentials travel
//! in the request body; create and update embed them next to the object as
//! `{"credentials": {...}, "obj": {...}}`. Errors are returned as
//! `{"detail": "..."}`.

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::errors::RegistryError;
use crate::domain::models::{
    AccessCredentials, CallerOrigin, ConnectionRecord, ConnectionRecordPatch, NewConnectionRecord,
    ServerConfig,
};
use crate::services::RegistryService;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Configuration for the objects HTTP server.
#[derive(Debug, Clone)]
pub struct ObjectsHttpConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable CORS.
    pub enable_cors: bool,
}

impl Default for ObjectsHttpConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for ObjectsHttpConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            enable_cors: config.enable_cors,
        }
    }
}

/// Body of a create request.
#[derive(Debug, Deserialize)]
pub struct CreateObjectRequest {
    pub credentials: AccessCredentials,
    pub obj: NewConnectionRecord,
}

/// Body of an update request. Fields left out of `obj` are kept.
#[derive(Debug, Deserialize)]
pub struct UpdateObjectRequest {
    pub credentials: AccessCredentials,
    pub obj: ConnectionRecordPatch,
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Handler error carrying the HTTP status and the caller-facing detail.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self {
            status,
            detail: err.public_detail(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { detail: self.detail })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Shared state for the objects HTTP server.
struct AppState {
    service: RegistryService,
}

/// Objects HTTP Server.
pub struct ObjectsHttpServer {
    config: ObjectsHttpConfig,
    service: RegistryService,
}

impl ObjectsHttpServer {
    pub const fn new(service: RegistryService, config: ObjectsHttpConfig) -> Self {
        Self { config, service }
    }

    /// Build the router.
    ///
    /// Handlers read the peer address through `ConnectInfo<SocketAddr>`, so
    /// the router must be served with connect info (or given a
    /// `MockConnectInfo` layer in tests).
    pub fn build_router(self) -> Router {
        let state = Arc::new(AppState {
            service: self.service,
        });

        let app = Router::new()
            .route("/", get(connectivity_check))
            .route("/health", get(health_check))
            .route("/v1/rmq/objects", get(list_objects).post(create_object))
            .route("/v1/rmq/objects/", get(list_objects).post(create_object))
            .route("/v1/rmq/objects/internal/{cluster_name}", get(get_object_bypass))
            .route(
                "/v1/rmq/objects/{cluster_name}",
                get(get_object).patch(update_object).delete(delete_object),
            )
            .with_state(state);

        if self.config.enable_cors {
            app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        tracing::info!("Objects HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

/// Echo the proxy headers back; 404 when the request did not come through
/// a proxy.
async fn connectivity_check(headers: HeaderMap) -> Response {
    let real_ip = header_value(&headers, X_REAL_IP);
    let forwarded_for = header_value(&headers, X_FORWARDED_FOR);

    if real_ip.is_none() && forwarded_for.is_none() {
        return ApiError::from(RegistryError::NotFound("connectivity".to_string())).into_response();
    }

    Json(json!({
        "message": "Connected succesfully",
        "x_real_ip": real_ip,
        "x_forwarded_for": forwarded_for,
    }))
    .into_response()
}

async fn list_objects(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AccessCredentials>, JsonRejection>,
) -> ApiResult<Vec<ConnectionRecord>> {
    let Json(credentials) = body?;
    let records = state.service.list_objects(&credentials).await?;
    Ok(Json(records))
}

async fn create_object(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateObjectRequest>, JsonRejection>,
) -> ApiResult<ConnectionRecord> {
    let Json(req) = body?;
    let record = state.service.create_object(&req.credentials, req.obj).await?;
    Ok(Json(record))
}

async fn get_object(
    State(state): State<Arc<AppState>>,
    Path(cluster_name): Path<String>,
    body: Result<Json<AccessCredentials>, JsonRejection>,
) -> ApiResult<ConnectionRecord> {
    let Json(credentials) = body?;
    let record = state.service.get_object(&credentials, &cluster_name).await?;
    Ok(Json(record))
}

async fn get_object_bypass(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(cluster_name): Path<String>,
) -> ApiResult<ConnectionRecord> {
    let mut origin = CallerOrigin::from_peer(peer.ip());
    if let Some(forwarded_for) = header_value(&headers, X_FORWARDED_FOR) {
        origin = origin.with_forwarded_for(forwarded_for);
    }

    let record = state.service.get_object_bypass(&origin, &cluster_name).await?;
    Ok(Json(record))
}

async fn update_object(
    State(state): State<Arc<AppState>>,
    Path(cluster_name): Path<String>,
    body: Result<Json<UpdateObjectRequest>, JsonRejection>,
) -> ApiResult<ConnectionRecord> {
    let Json(req) = body?;
    let record = state
        .service
        .update_object(&req.credentials, &cluster_name, req.obj)
        .await?;
    Ok(Json(record))
}

async fn delete_object(
    State(state): State<Arc<AppState>>,
    Path(cluster_name): Path<String>,
    body: Result<Json<AccessCredentials>, JsonRejection>,
) -> ApiResult<serde_json::Value> {
    let Json(credentials) = body?;
    state.service.delete_object(&credentials, &cluster_name).await?;
    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ObjectsHttpConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert!(!config.enable_cors);
    }

    #[test]
    fn test_create_request_deserialization() {
        let json = r#"{
            "credentials": {"cluster": "c1", "username": "admin", "password": "admin"},
            "obj": {
                "cluster_name": "c1", "certificate": "Y2VydA==", "filer_id": 1,
                "server": "rmq.example", "port": 5671, "vhost": "/",
                "exchange": "events", "username": "publisher", "password": "s3cret"
            }
        }"#;

        let req: CreateObjectRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.credentials.cluster, "c1");
        assert_eq!(req.obj.port, 5671);
    }

    #[test]
    fn test_update_request_accepts_partial_obj() {
        let json = r#"{
            "credentials": {"cluster": "c1", "username": "admin", "password": "admin"},
            "obj": {"port": 5672}
        }"#;

        let req: UpdateObjectRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.obj.port, Some(5672));
        assert!(req.obj.server.is_none());
    }

    #[test]
    fn test_access_denied_maps_to_generic_401() {
        let err = ApiError::from(RegistryError::AccessDenied);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.detail, "Authentication failure");
    }

    #[test]
    fn test_not_found_hides_cluster_name() {
        let err = ApiError::from(RegistryError::NotFound("secret-cluster".to_string()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.detail, "Object not found");
    }
}
