//! HTTP API for book-inventory
//!
//! axum Router <-> application::InventoryService
//!
//! GET/POST `/api/books`, GET/PATCH/DELETE `/api/books/:id`.
//! Every request reads the whole store fresh; mutations write it back.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::application::error::AppError;
use crate::application::service::InventoryService;
use crate::domain::error::DomainError;
use crate::domain::model::book::Book;
use crate::domain::model::id::BookId;
use crate::domain::model::inventory::{BookPatch, NewBook};
use crate::domain::repository::BookRepository;
use crate::infra::config::Settings;
use crate::infra::json_store::JsonBookRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// HTTPサーバを起動する。終了するまで戻らない。
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let repo = JsonBookRepository::new(&settings.data_file);
    let service = Arc::new(InventoryService::new(repo));
    let app = router(service, settings.static_dir.as_deref());

    let addr = settings.addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Server listening on http://{} (data file: {})",
        listener.local_addr()?,
        settings.data_file.display()
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// APIルータを組み立てる。static_dirがあれば、API以外のパスは静的ファイルとして返す。
pub fn router<R>(service: Arc<InventoryService<R>>, static_dir: Option<&FsPath>) -> Router
where
    R: BookRepository + Send + Sync + 'static,
{
    let api = Router::new()
        .route("/api/books", get(list_books::<R>).post(create_book::<R>))
        .route(
            "/api/books/:id",
            get(get_book::<R>)
                .patch(update_book::<R>)
                .delete(delete_book::<R>),
        )
        .with_state(service);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// パスのIDが数値でない。未知のIDと同じく扱う。
    #[error("unknown id: '{0}'")]
    UnknownId(String),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::App(AppError::Domain(DomainError::BookNotFound(_))) | ApiError::UnknownId(_) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            ApiError::App(AppError::Domain(e @ DomainError::MissingField { .. })) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Body(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, "Invalid book".to_string())
            }
            ApiError::App(e @ AppError::Storage(_)) => {
                error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unable to access data".to_string(),
                )
            }
            ApiError::Task(e) => {
                error!("Service task failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unable to access data".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

fn parse_id(raw: &str) -> Result<BookId, ApiError> {
    raw.parse::<BookId>()
        .map_err(|_| ApiError::UnknownId(raw.to_string()))
}

// =============================================================================
// Handlers
// =============================================================================

type Shared<R> = State<Arc<InventoryService<R>>>;

/// ファイルI/Oを伴うService呼び出しはブロッキングスレッドで実行する。
async fn blocking<R, T, F>(svc: Arc<InventoryService<R>>, f: F) -> Result<T, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&InventoryService<R>) -> Result<T, AppError> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || f(&svc)).await??)
}

async fn list_books<R>(State(svc): Shared<R>) -> Result<Json<Vec<Book>>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    Ok(Json(blocking(svc, |svc| svc.list()).await?))
}

async fn get_book<R>(
    State(svc): Shared<R>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    Ok(Json(blocking(svc, move |svc| svc.get(id)).await?))
}

async fn create_book<R>(
    State(svc): Shared<R>,
    body: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let Json(req) = body?;
    let book = blocking(svc, move |svc| svc.create(req)).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book<R>(
    State(svc): Shared<R>,
    Path(id): Path<String>,
    body: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let Json(patch) = body?;
    Ok(Json(blocking(svc, move |svc| svc.update(id, patch)).await?))
}

async fn delete_book<R>(
    State(svc): Shared<R>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError>
where
    R: BookRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    Ok(Json(blocking(svc, move |svc| svc.delete(id)).await?))
}
