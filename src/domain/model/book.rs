use serde::{Deserialize, Serialize};

use super::id::BookId;
use super::status::BookStatus;

/// 在庫の1レコード。Inventoryが所有し、Inventoryを通じて変更する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    #[serde(default)]
    status: BookStatus,
}

impl Book {
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        status: BookStatus,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            status,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }

    // --- 内部操作（Inventory経由でのみ呼ばれる） ---

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_author(&mut self, author: String) {
        self.author = author;
    }

    pub(crate) fn set_status(&mut self, status: BookStatus) {
        self.status = status;
    }
}
