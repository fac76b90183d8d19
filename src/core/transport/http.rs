//! HTTP transport implementation.
//!
//! Serves the file listing as JSON and streams individual files as
//! attachments. Filenames are resolved through the security layer before any
//! file is opened.

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State, rejection::PathRejection as PathExtractRejection},
    http::{HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::io;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, instrument, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::error::Error;
use crate::core::security::{PathRejection, ResolvedPath, RootError};
use crate::core::FilePickerServer;
use crate::domains::files::FileEntry;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Run the HTTP transport until Ctrl-C.
    pub async fn run(self, server: FilePickerServer) -> TransportResult<()> {
        let addr = self.address();
        let app = build_router(server, &self.config);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {}", self.config.description());
        info!("  → List:     GET /files");
        info!("  → Download: GET /files/{{filename}}");
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

/// Build the application router.
///
/// Exposed separately from [`HttpTransport::run`] so tests can drive it
/// without binding a socket.
pub fn build_router(server: FilePickerServer, config: &HttpConfig) -> Router {
    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/files", get(list_files))
        .route("/files/{filename}", get(download_file))
        .with_state(server);

    if config.enable_cors {
        app = app.layer(cors_layer(config));
    }

    app.layer(TraceLayer::new_for_http())
}

/// Build the CORS layer for the configured origins.
///
/// Browsers refuse credentials together with wildcards, so credentials are
/// only allowed for an explicit origin list, with methods and headers
/// mirrored from the preflight request.
fn cors_layer(config: &HttpConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Root handler - provides API info.
async fn root_handler(State(server): State<FilePickerServer>) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "File Picker API",
        "name": server.name(),
        "version": server.version(),
        "endpoints": {
            "/files": "List all files",
            "/files/{filename}": "Download a specific file",
            "/health": "Health check"
        }
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET /files - list the files root.
#[instrument(skip_all)]
async fn list_files(State(server): State<FilePickerServer>) -> Result<Json<Vec<FileEntry>>, Error> {
    let entries = server.list_files().await.inspect_err(log_error)?;
    info!("Listed {} entries", entries.len());
    Ok(Json(entries))
}

/// GET /files/{filename} - stream a single file as an attachment.
///
/// A segment that does not decode to UTF-8 never reaches the resolver; it is
/// refused as an invalid name with the raw, still-encoded segment logged.
#[instrument(skip_all, fields(filename))]
async fn download_file(
    State(server): State<FilePickerServer>,
    uri: Uri,
    filename: Result<Path<String>, PathExtractRejection>,
) -> Result<Response, Error> {
    let filename = match filename {
        Ok(Path(name)) => name,
        Err(rejection) => {
            let raw = uri.path().rsplit('/').next().unwrap_or_default().to_string();
            debug!("Path extraction failed: {}", rejection.body_text());
            let err = Error::Rejected(PathRejection::InvalidName { name: raw });
            log_error(&err);
            return Err(err);
        }
    };
    tracing::Span::current().record("filename", filename.as_str());

    let resolved = server.resolve_file(&filename).await.inspect_err(log_error)?;

    debug!("Streaming file: {}", resolved.as_path().display());

    let (file, file_size) = open_resolved(&resolved, &filename)
        .await
        .inspect_err(log_error)?;
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_LENGTH, file_size.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        body,
    )
        .into_response())
}

/// Open a resolved file and read its length.
///
/// The file may be removed between resolution and open; that is a miss, not
/// a server error.
async fn open_resolved(resolved: &ResolvedPath, name: &str) -> Result<(File, u64), Error> {
    let not_found = |e: io::Error| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::Rejected(PathRejection::NotFound {
                name: name.to_string(),
            })
        } else {
            Error::Io(e)
        }
    };

    let file = File::open(resolved.as_path()).await.map_err(not_found)?;
    let file_size = file.metadata().await.map_err(not_found)?.len();
    Ok((file, file_size))
}

/// Security rejections are logged apart from ordinary misses.
fn log_error(err: &Error) {
    match err {
        Error::Rejected(PathRejection::InvalidName { name }) => {
            warn!("Rejected invalid filename {:?}", name);
        }
        Error::Rejected(PathRejection::SecurityViolation { name }) => {
            warn!("Security violation: {:?} resolves outside the files directory", name);
        }
        Error::Rejected(PathRejection::NotFound { name }) => {
            debug!("File not found: {:?}", name);
        }
        other => error!("{}", other),
    }
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == filename {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded: String = filename
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{:02X}", b)
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

fn root_detail(err: &RootError) -> &'static str {
    match err {
        RootError::Missing { .. } => "Files directory not found",
        RootError::NotADirectory { .. } => "Files path is not a directory",
        RootError::Unreadable { .. } | RootError::CreateFailed { .. } => {
            "Files directory is unreadable"
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            Error::Rejected(PathRejection::InvalidName { .. }) => {
                (StatusCode::BAD_REQUEST, "INVALID_NAME", "Invalid filename".to_string())
            }
            Error::Rejected(PathRejection::SecurityViolation { .. }) => {
                (StatusCode::FORBIDDEN, "SECURITY_VIOLATION", "Invalid filename".to_string())
            }
            Error::Rejected(PathRejection::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "File not found".to_string())
            }
            Error::Rejected(PathRejection::Configuration(root)) | Error::Root(root) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                root_detail(root).to_string(),
            ),
            Error::Io(_) | Error::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                self.to_string(),
            ),
        };

        (status, Json(ErrorResponse { detail, code })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::security::{FilesRoot, resolve};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_resolved_reads_length() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "0123456789").unwrap();
        let root = FilesRoot::open(temp_dir.path()).unwrap();
        let resolved = resolve(&root, "a.txt").unwrap();

        let (_file, size) = open_resolved(&resolved, "a.txt").await.unwrap();
        assert_eq!(size, 10);
    }

    #[tokio::test]
    async fn test_file_removed_after_resolve_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("gone.txt");
        std::fs::write(&file, "short-lived").unwrap();
        let root = FilesRoot::open(temp_dir.path()).unwrap();
        let resolved = resolve(&root, "gone.txt").unwrap();

        std::fs::remove_file(&file).unwrap();

        let err = open_resolved(&resolved, "gone.txt").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Rejected(PathRejection::NotFound { ref name }) if name == "gone.txt"
        ));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("report.pdf"),
            "attachment; filename=\"report.pdf\""
        );
    }

    #[test]
    fn test_content_disposition_escapes_quotes_and_unicode() {
        let value = content_disposition("отчёт \"v2\".txt");
        assert!(value.starts_with("attachment; filename=\"_____ _v2_.txt\"; filename*=UTF-8''"));
        assert!(value.contains("%22v2%22.txt"));
        assert!(HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn test_error_status_codes() {
        let name = "x".to_string();
        let cases = [
            (
                Error::Rejected(PathRejection::InvalidName { name: name.clone() }),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::Rejected(PathRejection::SecurityViolation { name: name.clone() }),
                StatusCode::FORBIDDEN,
            ),
            (
                Error::Rejected(PathRejection::NotFound { name }),
                StatusCode::NOT_FOUND,
            ),
            (
                Error::Root(RootError::Missing {
                    path: PathBuf::from("/nowhere"),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_cors_layer_accepts_explicit_origins() {
        let mut config = HttpConfig::default();
        config.cors_origins = vec!["http://localhost:3000".to_string(), "bad\norigin".to_string()];
        // Building must not panic with credentials enabled
        let _layer = cors_layer(&config);
    }
}
