use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::model::book::Book;
use crate::domain::model::id::BookId;
use crate::domain::model::inventory::{BookPatch, NewBook};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(e) => e.status(),
            Self::Status { status, .. } => Some(*status),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `/api/books` のHTTPクライアント。1操作 = 1リクエスト、リトライなし。
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: Client,
    base_url: String,
}

impl InventoryClient {
    /// base_url 例: `http://127.0.0.1:3000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list(&self) -> Result<Vec<Book>, ClientError> {
        let resp = self.http.get(self.books_url()).send().await?;
        decode(resp).await
    }

    pub async fn get(&self, id: BookId) -> Result<Book, ClientError> {
        let resp = self.http.get(self.book_url(id)).send().await?;
        decode(resp).await
    }

    pub async fn create(&self, req: &NewBook) -> Result<Book, ClientError> {
        let resp = self.http.post(self.books_url()).json(req).send().await?;
        decode(resp).await
    }

    pub async fn update(&self, id: BookId, patch: &BookPatch) -> Result<Book, ClientError> {
        let resp = self.http.patch(self.book_url(id)).json(patch).send().await?;
        decode(resp).await
    }

    pub async fn delete(&self, id: BookId) -> Result<Book, ClientError> {
        let resp = self.http.delete(self.book_url(id)).send().await?;
        decode(resp).await
    }

    // --- private ---

    fn books_url(&self) -> String {
        format!("{}/api/books", self.base_url)
    }

    fn book_url(&self, id: BookId) -> String {
        format!("{}/api/books/{}", self.base_url, id)
    }
}

/// 2xxならJSONを復元し、それ以外はサーバのエラーメッセージを取り出す。
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(ClientError::Status { status, message })
}
