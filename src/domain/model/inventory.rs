use serde::{Deserialize, Serialize};

use super::book::Book;
use super::id::BookId;
use super::status::BookStatus;
use crate::domain::error::DomainError;

/// 追加リクエスト。statusがNoneならavailable。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookStatus>,
}

/// 部分更新リクエスト（Noneのフィールドは変更しない）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookStatus>,
}

impl BookPatch {
    pub fn status(status: BookStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Inventory: 集約ルート。ファイル全体 = 1つのJSON配列。
/// 全レコード操作はここを経由し、IDの一意性を保つ。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    books: Vec<Book>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    /// 次に採番されるID（最大ID + 1）
    pub fn next_id(&self) -> BookId {
        BookId::next_after(self.books.iter().map(Book::id))
    }

    /// レコード追加。検証に失敗した場合はIDを消費しない。
    pub fn add(&mut self, req: NewBook) -> Result<&Book, DomainError> {
        let title = required("title", &req.title)?;
        let author = required("author", &req.author)?;

        let book = Book::new(
            self.next_id(),
            title,
            author,
            req.status.unwrap_or_default(),
        );
        self.books.push(book);

        let last = self.books.len() - 1;
        Ok(&self.books[last])
    }

    /// 部分更新。idは変更しない。
    pub fn update(&mut self, id: BookId, patch: BookPatch) -> Result<&Book, DomainError> {
        let book = self
            .books
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or(DomainError::BookNotFound(id))?;

        // 適用前に全フィールドを検証して、途中まで書き換わった状態を残さない
        let title = patch
            .title
            .as_deref()
            .map(|t| required("title", t))
            .transpose()?;
        let author = patch
            .author
            .as_deref()
            .map(|a| required("author", a))
            .transpose()?;

        if let Some(title) = title {
            book.set_title(title);
        }
        if let Some(author) = author {
            book.set_author(author);
        }
        if let Some(status) = patch.status {
            book.set_status(status);
        }

        Ok(&*book)
    }

    /// レコード削除。削除したレコードを返す。
    pub fn remove(&mut self, id: BookId) -> Result<Book, DomainError> {
        let idx = self
            .books
            .iter()
            .position(|b| b.id() == id)
            .ok_or(DomainError::BookNotFound(id))?;
        Ok(self.books.remove(idx))
    }
}

impl From<Vec<Book>> for Inventory {
    fn from(books: Vec<Book>) -> Self {
        Self { books }
    }
}

fn required(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField { field });
    }
    Ok(trimmed.to_string())
}
