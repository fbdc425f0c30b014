//! Table view for the client.
//!
//! `ViewModel` holds the latest fetched list and the current controls; `render`
//! is a pure function from it to a `TableView`. Nothing here talks to the
//! network, the client controller in `interface::app` owns that.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::model::book::Book;
use crate::domain::model::id::BookId;
use crate::domain::model::status::BookStatus;

// =============================================================================
// Controls
// =============================================================================

/// 並び替えキー。id は数値順、それ以外は大文字小文字を無視した辞書順。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Title,
    Author,
    Status,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Author => "author",
            Self::Status => "status",
        }
    }

    fn compare(&self, a: &Book, b: &Book) -> Ordering {
        match self {
            Self::Id => a.id().cmp(&b.id()),
            Self::Title => cmp_ignore_case(a.title(), b.title()),
            Self::Author => cmp_ignore_case(a.author(), b.author()),
            Self::Status => cmp_ignore_case(a.status().as_str(), b.status().as_str()),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "status" => Ok(Self::Status),
            other => Err(format!(
                "Unknown sort key: '{other}'. Use: id, title, author, status"
            )),
        }
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// 絞り込み・並び替えの入力値。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    /// 検索テキスト（title + author に対する部分一致）
    pub search: String,
    /// Noneなら全status
    pub status: Option<BookStatus>,
    pub sort_by: SortKey,
}

impl TableQuery {
    pub fn matches(&self, book: &Book) -> bool {
        let status_ok = self.status.map_or(true, |s| book.status() == s);
        let needle = self.search.trim().to_lowercase();
        let text_ok = needle.is_empty() || {
            let haystack = format!("{} {}", book.title(), book.author()).to_lowercase();
            haystack.contains(&needle)
        };
        status_ok && text_ok
    }

    /// 条件に一致するレコードを並び替えて返す。
    pub fn apply<'a>(&self, books: &'a [Book]) -> Vec<&'a Book> {
        let mut filtered: Vec<&Book> = books.iter().filter(|b| self.matches(b)).collect();
        filtered.sort_by(|a, b| self.sort_by.compare(a, b));
        filtered
    }
}

// =============================================================================
// Row actions
// =============================================================================

/// 行ごとのアクションメニュー項目。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    Edit,
    Borrow,
    Return,
    Sell,
    Delete,
}

impl RowAction {
    /// 現在のstatusで選択可能なアクション（表示順）。
    pub fn available_for(status: BookStatus) -> Vec<RowAction> {
        let mut actions = vec![Self::Edit];
        if status == BookStatus::Available {
            actions.push(Self::Borrow);
        }
        if status == BookStatus::Borrowed {
            actions.push(Self::Return);
        }
        if status != BookStatus::Sold {
            actions.push(Self::Sell);
            actions.push(Self::Delete);
        }
        actions
    }

    pub fn is_available_for(&self, status: BookStatus) -> bool {
        Self::available_for(status).contains(self)
    }

    /// 実行前に確認が必要ならそのメッセージ。
    pub fn confirmation(&self) -> Option<&'static str> {
        match self {
            Self::Borrow => Some("Mark this book as borrowed?"),
            Self::Sell => Some("Mark this book as sold? This cannot be undone."),
            Self::Delete => {
                Some("Are you sure you want to delete this book? This action cannot be undone.")
            }
            Self::Edit | Self::Return => None,
        }
    }

    /// status変更アクションの遷移先。
    pub fn target_status(&self) -> Option<BookStatus> {
        match self {
            Self::Borrow => Some(BookStatus::Borrowed),
            Self::Return => Some(BookStatus::Available),
            Self::Sell => Some(BookStatus::Sold),
            Self::Edit | Self::Delete => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Borrow => "borrow",
            Self::Return => "return",
            Self::Sell => "sell",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// View model & render
// =============================================================================

/// 最新の取得結果と現在の操作値。取得のたびに丸ごと置き換える。
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub books: Vec<Book>,
    pub load_failed: bool,
    pub query: TableQuery,
}

impl ViewModel {
    pub fn loaded(&mut self, books: Vec<Book>) {
        self.books = books;
        self.load_failed = false;
    }

    pub fn failed(&mut self) {
        self.books.clear();
        self.load_failed = true;
    }

    pub fn find(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    pub actions: Vec<RowAction>,
}

impl TableRow {
    fn from_book(book: &Book) -> Self {
        Self {
            id: book.id(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            status: book.status(),
            actions: RowAction::available_for(book.status()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum TableView {
    Rows(Vec<TableRow>),
    Empty,
    LoadFailed,
}

impl TableView {
    pub const EMPTY_NOTICE: &'static str = "No books found.";
    pub const LOAD_FAILED_NOTICE: &'static str =
        "Unable to load books. Ensure the server is running.";

    pub fn rows(&self) -> &[TableRow] {
        match self {
            Self::Rows(rows) => rows,
            Self::Empty | Self::LoadFailed => &[],
        }
    }

    /// プレーンテキストの表として描画する。
    pub fn render_text(&self) -> String {
        match self {
            Self::Empty => Self::EMPTY_NOTICE.to_string(),
            Self::LoadFailed => Self::LOAD_FAILED_NOTICE.to_string(),
            Self::Rows(rows) => {
                let mut lines = vec!["ID | Title | Author | Status | Actions".to_string()];
                for row in rows {
                    let actions: Vec<&str> = row.actions.iter().map(RowAction::as_str).collect();
                    lines.push(format!(
                        "{} | {} | {} | {} | {}",
                        row.id,
                        row.title,
                        row.author,
                        row.status.label(),
                        actions.join(", ")
                    ));
                }
                lines.join("\n")
            }
        }
    }
}

/// ViewModel → TableView。毎回フィルタと並び替えをやり直す。
pub fn render(model: &ViewModel) -> TableView {
    if model.load_failed {
        return TableView::LoadFailed;
    }
    let rows: Vec<TableRow> = model
        .query
        .apply(&model.books)
        .into_iter()
        .map(TableRow::from_book)
        .collect();
    if rows.is_empty() {
        TableView::Empty
    } else {
        TableView::Rows(rows)
    }
}
