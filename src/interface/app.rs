//! Client controller for the inventory table.
//!
//! Owns the `ViewModel`, the add form and the edit modal, and turns user
//! actions into API calls. After every successful mutation it reloads the full
//! list and re-renders; on failure it shows a notice and leaves the view as is.
//! Dialogs (confirm / notice) go through the `Interaction` trait so any front
//! end can drive it.

use tokio::time::Instant;
use tracing::{error, warn};

use crate::application::debounce::Debounce;
use crate::application::view::{render, RowAction, SortKey, TableView, ViewModel};
use crate::domain::model::id::BookId;
use crate::domain::model::inventory::{BookPatch, NewBook};
use crate::domain::model::status::BookStatus;

use super::client::InventoryClient;

pub const FILL_BOTH_NOTICE: &str = "Please fill in both title and author.";
pub const ADD_FAILED_NOTICE: &str = "Failed to add book.";
pub const STATUS_FAILED_NOTICE: &str = "Failed to update book status.";
pub const EDIT_FAILED_NOTICE: &str = "Failed to update book.";
pub const DELETE_FAILED_NOTICE: &str = "Failed to delete book.";

/// ユーザとの対話（確認ダイアログ・通知）。
pub trait Interaction {
    /// true なら続行
    fn confirm(&mut self, message: &str) -> bool;
    fn notify(&mut self, message: &str);
}

/// 操作の結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// リクエスト成功、一覧を再取得済み
    Applied,
    /// 編集モーダルを開いた（リクエストなし）
    Opened,
    /// 確認ダイアログで中止された
    Cancelled,
    /// 送信前に弾いた（入力不備・選択不可のアクション）
    Rejected,
    /// 通信失敗またはサーバエラー
    Failed,
}

/// 追加フォーム・編集モーダルの入力値。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub status: BookStatus,
}

impl BookForm {
    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.author.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditModal {
    pub id: BookId,
    pub form: BookForm,
}

pub struct ClientApp<I: Interaction> {
    client: InventoryClient,
    ui: I,
    model: ViewModel,
    view: TableView,
    search: Debounce,
    add_form: BookForm,
    edit: Option<EditModal>,
}

impl<I: Interaction> ClientApp<I> {
    pub fn new(client: InventoryClient, ui: I) -> Self {
        Self {
            client,
            ui,
            model: ViewModel::default(),
            view: TableView::Empty,
            search: Debounce::default(),
            add_form: BookForm::default(),
            edit: None,
        }
    }

    pub fn with_search_delay(mut self, delay: std::time::Duration) -> Self {
        self.search = Debounce::new(delay);
        self
    }

    pub fn ui(&self) -> &I {
        &self.ui
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    /// 最後に描画した表
    pub fn view(&self) -> &TableView {
        &self.view
    }

    pub fn add_form(&self) -> &BookForm {
        &self.add_form
    }

    pub fn add_form_mut(&mut self) -> &mut BookForm {
        &mut self.add_form
    }

    pub fn edit(&self) -> Option<&EditModal> {
        self.edit.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut BookForm> {
        self.edit.as_mut().map(|m| &mut m.form)
    }

    // =========================================================================
    // Load & render
    // =========================================================================

    /// 一覧を丸ごと取得し直して描画する。失敗時は「読み込めない」表示に切り替える。
    pub async fn load(&mut self) -> &TableView {
        match self.client.list().await {
            Ok(books) => self.model.loaded(books),
            Err(e) => {
                error!("Failed to load books: {}", e);
                self.model.failed();
            }
        }
        self.render()
    }

    pub fn render(&mut self) -> &TableView {
        self.view = render(&self.model);
        &self.view
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// 検索欄の入力。描画は間引かれ、poll_search / settle_search で行う。
    pub fn input_search(&mut self, text: impl Into<String>, now: Instant) {
        self.model.query.search = text.into();
        self.search.trigger(now);
    }

    /// 待ち時間が経過していれば描画して true。
    pub fn poll_search(&mut self, now: Instant) -> bool {
        if self.search.fire(now) {
            self.render();
            true
        } else {
            false
        }
    }

    /// 保留中の検索描画を待って実行する。
    pub async fn settle_search(&mut self) -> bool {
        if self.search.settle().await {
            self.render();
            true
        } else {
            false
        }
    }

    pub fn select_status(&mut self, status: Option<BookStatus>) -> &TableView {
        self.model.query.status = status;
        self.render()
    }

    pub fn select_sort(&mut self, sort_by: SortKey) -> &TableView {
        self.model.query.sort_by = sort_by;
        self.render()
    }

    /// 検索・status・並び替えを初期値に戻す。
    pub fn clear_filters(&mut self) -> &TableView {
        self.search.cancel();
        self.model.query = Default::default();
        self.render()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// 追加フォームの内容で本を登録する。成功したらフォームを空に戻す。
    pub async fn add_book(&mut self) -> Outcome {
        if !self.add_form.is_complete() {
            self.ui.notify(FILL_BOTH_NOTICE);
            return Outcome::Rejected;
        }
        let req = NewBook {
            title: self.add_form.title.trim().to_string(),
            author: self.add_form.author.trim().to_string(),
            status: Some(self.add_form.status),
        };
        match self.client.create(&req).await {
            Ok(_) => {
                self.load().await;
                self.add_form = BookForm::default();
                Outcome::Applied
            }
            Err(e) => {
                error!("Failed to add book: {}", e);
                self.ui.notify(ADD_FAILED_NOTICE);
                Outcome::Failed
            }
        }
    }

    /// 行のアクションメニューから選ばれた操作を実行する。
    pub async fn handle_action(&mut self, id: BookId, action: RowAction) -> Outcome {
        let Some(status) = self.model.find(id).map(|b| b.status()) else {
            warn!("Action {} on unknown book {}", action, id);
            return Outcome::Rejected;
        };
        if !action.is_available_for(status) {
            warn!("Action {} not available for {} book {}", action, status, id);
            return Outcome::Rejected;
        }

        match action {
            RowAction::Edit => {
                self.open_edit(id);
                Outcome::Opened
            }
            RowAction::Delete => self.delete_book(id).await,
            RowAction::Borrow | RowAction::Return | RowAction::Sell => {
                if let Some(message) = action.confirmation() {
                    if !self.ui.confirm(message) {
                        return Outcome::Cancelled;
                    }
                }
                match action.target_status() {
                    Some(target) => self.change_status(id, target).await,
                    None => Outcome::Rejected,
                }
            }
        }
    }

    /// status だけを更新する（確認は呼び出し側で済ませる）。
    pub async fn change_status(&mut self, id: BookId, status: BookStatus) -> Outcome {
        match self.client.update(id, &BookPatch::status(status)).await {
            Ok(_) => {
                self.load().await;
                Outcome::Applied
            }
            Err(e) => {
                error!("Failed to update status of book {}: {}", id, e);
                self.ui.notify(STATUS_FAILED_NOTICE);
                Outcome::Failed
            }
        }
    }

    /// 確認のうえ削除する。
    pub async fn delete_book(&mut self, id: BookId) -> Outcome {
        let message = RowAction::Delete.confirmation().unwrap_or_default();
        if !self.ui.confirm(message) {
            return Outcome::Cancelled;
        }
        match self.client.delete(id).await {
            Ok(_) => {
                self.load().await;
                Outcome::Applied
            }
            Err(e) => {
                error!("Failed to delete book {}: {}", id, e);
                self.ui.notify(DELETE_FAILED_NOTICE);
                Outcome::Failed
            }
        }
    }

    // =========================================================================
    // Edit modal
    // =========================================================================

    /// 現在の値を入れた編集モーダルを開く。
    pub fn open_edit(&mut self, id: BookId) -> bool {
        let Some(book) = self.model.find(id) else {
            return false;
        };
        self.edit = Some(EditModal {
            id,
            form: BookForm {
                title: book.title().to_string(),
                author: book.author().to_string(),
                status: book.status(),
            },
        });
        true
    }

    pub fn close_edit(&mut self) {
        self.edit = None;
    }

    /// title / author / status をまとめて部分更新する。成功したらモーダルを閉じる。
    pub async fn save_edit(&mut self) -> Outcome {
        let Some(modal) = self.edit.as_ref() else {
            return Outcome::Rejected;
        };
        if !modal.form.is_complete() {
            self.ui.notify(FILL_BOTH_NOTICE);
            return Outcome::Rejected;
        }

        let id = modal.id;
        let patch = BookPatch {
            title: Some(modal.form.title.trim().to_string()),
            author: Some(modal.form.author.trim().to_string()),
            status: Some(modal.form.status),
        };
        match self.client.update(id, &patch).await {
            Ok(_) => {
                self.load().await;
                self.close_edit();
                Outcome::Applied
            }
            Err(e) => {
                error!("Failed to update book {}: {}", id, e);
                self.ui.notify(EDIT_FAILED_NOTICE);
                Outcome::Failed
            }
        }
    }
}
