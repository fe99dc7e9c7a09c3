//! HTTP API for the CookShare backend
//!
//! All JSON endpoints answer with the `{success, message, data}` envelope:
//!
//! - `POST /api/validaterecipe`   - multipart upload (`username`, `recipeFile`)
//! - `GET  /api/leaderboard`      - current standings
//! - `POST /api/adminleaderboard` - admin score override + flag reveal
//! - `GET  /health`               - liveness and storage stats

use crate::admin::AdminGateway;
use crate::blob_store::BlobStorage;
use crate::error::ApiError;
use crate::leaderboard::Leaderboard;
use crate::recipes::{RecipeService, UploadedFile};
use crate::response;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Request body for `POST /api/adminleaderboard`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminLeaderboardRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    points: i64,
    #[serde(default)]
    admin_password: String,
}

/// HTTP server state
pub struct HttpServer {
    recipes: Arc<RecipeService>,
    admin: Arc<AdminGateway>,
    leaderboard: Arc<Leaderboard>,
    storage: Arc<dyn BlobStorage>,
    bind_addr: SocketAddr,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(
        recipes: Arc<RecipeService>,
        admin: Arc<AdminGateway>,
        leaderboard: Arc<Leaderboard>,
        storage: Arc<dyn BlobStorage>,
        bind_addr: SocketAddr,
    ) -> Self {
        Self {
            recipes,
            admin,
            leaderboard,
            storage,
            bind_addr,
        }
    }

    /// Bind the configured address and serve until cancelled.
    pub async fn run(self: Arc<Self>) -> Result<(), ApiError> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        info!(addr = %self.bind_addr, "HTTP server listening");
        self.serve_on(listener).await
    }

    /// Serve connections from an already-bound listener.
    pub async fn serve_on(self: Arc<Self>, listener: TcpListener) -> Result<(), ApiError> {
        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let server = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let server = server.clone();
                    async move { server.handle_request(req).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    warn!(addr = %remote_addr, error = %err, "Connection error");
                }
            });
        }
    }

    /// Route requests to handlers
    async fn handle_request(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let path = req.uri().path().to_string();
        let method = req.method().clone();

        debug!(method = %method, path = %path, "Incoming request");

        let result = match (method, path.as_str()) {
            (Method::POST, "/api/validaterecipe") => self.handle_validate_recipe(req).await,
            (Method::GET, "/api/leaderboard") => self.handle_leaderboard().await,
            (Method::POST, "/api/adminleaderboard") => self.handle_admin_leaderboard(req).await,
            (Method::GET, "/health") => self.handle_health().await,

            // CORS preflight
            (Method::OPTIONS, _) => Ok(response::preflight_response()),

            _ => Ok(response::not_found("Endpoint not found")),
        };

        Ok(result.unwrap_or_else(|err| {
            error!(error = %err, "Request error");
            response::error_response(&err, "An unexpected error occurred")
        }))
    }

    /// POST /api/validaterecipe - score and store an uploaded recipe
    async fn handle_validate_recipe(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, ApiError> {
        let result = match self.read_upload_form(req).await {
            Ok((username, file)) => self.recipes.validate_and_store(&username, file).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(outcome) => Ok(response::ok(
                "Recipe uploaded and validated successfully!",
                outcome,
            )),
            Err(err) => {
                match &err {
                    ApiError::Validation(reason) => debug!(reason = %reason, "Upload rejected"),
                    other => error!(error = %other, "Recipe upload failed"),
                }
                Ok(response::error_response(
                    &err,
                    "An error occurred while processing your recipe",
                ))
            }
        }
    }

    /// Pull `username` and `recipeFile` out of a multipart form.
    async fn read_upload_form(
        &self,
        req: Request<Incoming>,
    ) -> Result<(String, Option<UploadedFile>), ApiError> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let boundary = multer::parse_boundary(&content_type).map_err(|_| {
            ApiError::Validation("Expected a multipart/form-data request".to_string())
        })?;

        let body = req
            .collect()
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to read request body: {}", e)))?
            .to_bytes();

        let stream = futures_util::stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut username = String::new();
        let mut file: Option<UploadedFile> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?
        {
            let field_name = field.name().map(str::to_string);
            match field_name.as_deref() {
                Some("username") => {
                    username = field.text().await.map_err(|e| {
                        ApiError::Validation(format!("Invalid multipart payload: {}", e))
                    })?;
                }
                Some("recipeFile") => {
                    let name = field
                        .file_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| "recipe.txt".to_string());
                    let content = field.bytes().await.map_err(|e| {
                        ApiError::Validation(format!("Invalid multipart payload: {}", e))
                    })?;
                    file = Some(UploadedFile { name, content });
                }
                // Unknown fields are drained and ignored.
                _ => {
                    let _ = field.bytes().await;
                }
            }
        }

        Ok((username, file))
    }

    /// GET /api/leaderboard - current standings
    async fn handle_leaderboard(&self) -> Result<Response<Full<Bytes>>, ApiError> {
        let snapshot = self.leaderboard.snapshot();
        debug!(entries = snapshot.len(), "Serving leaderboard");
        Ok(response::ok("Leaderboard retrieved successfully", snapshot))
    }

    /// POST /api/adminleaderboard - admin score override
    async fn handle_admin_leaderboard(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, ApiError> {
        let body = req
            .collect()
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to read request body: {}", e)))?
            .to_bytes();

        let request: AdminLeaderboardRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "Admin request with invalid JSON");
                return Ok(response::failure(
                    StatusCode::BAD_REQUEST,
                    &format!("Invalid JSON: {}", e),
                ));
            }
        };

        match self
            .admin
            .update(&request.username, request.points, &request.admin_password)
        {
            Ok(update) => Ok(response::ok(update.message, update.data)),
            Err(err) => Ok(response::error_response(&err, "Failed to update leaderboard")),
        }
    }

    /// GET /health - liveness and storage stats
    async fn handle_health(&self) -> Result<Response<Full<Bytes>>, ApiError> {
        let stats = self.storage.stats().await?;
        let body = serde_json::json!({
            "status": "ok",
            "leaderboardEntries": self.leaderboard.len(),
            "storedRecipes": stats.total_blobs,
            "storedBytes": stats.total_bytes,
        });
        Ok(response::json_response(StatusCode::OK, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_request_parses_camel_case() {
        let request: AdminLeaderboardRequest = serde_json::from_str(
            r#"{"username":"alice","points":50,"adminPassword":"secret"}"#,
        )
        .unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.points, 50);
        assert_eq!(request.admin_password, "secret");
    }

    #[test]
    fn admin_request_defaults_missing_fields() {
        let request: AdminLeaderboardRequest = serde_json::from_str("{}").unwrap();
        assert!(request.username.is_empty());
        assert_eq!(request.points, 0);
        assert!(request.admin_password.is_empty());
    }
}
