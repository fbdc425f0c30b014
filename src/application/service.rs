use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::model::book::Book;
use crate::domain::model::id::BookId;
use crate::domain::model::inventory::{BookPatch, Inventory, NewBook};
use crate::domain::repository::BookRepository;

use super::error::AppError;

/// 在庫に対するユースケース。
/// 毎回 load → mutate → save のパターンで操作する（リクエスト間のキャッシュなし）。
pub struct InventoryService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> InventoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// 全件を保存順のまま返す。絞り込み・並び替えはクライアント側の責務。
    pub fn list(&self) -> Result<Vec<Book>, AppError> {
        Ok(self.load()?.into_books())
    }

    pub fn get(&self, id: BookId) -> Result<Book, AppError> {
        let inventory = self.load()?;
        inventory
            .get(id)
            .cloned()
            .ok_or(AppError::Domain(DomainError::BookNotFound(id)))
    }

    /// 本を追加する。IDは最大ID + 1。
    pub fn create(&self, req: NewBook) -> Result<Book, AppError> {
        let mut inventory = self.load()?;
        let book = inventory.add(req)?.clone();
        self.persist(&inventory)?;
        info!(id = %book.id(), title = book.title(), "book added");
        Ok(book)
    }

    /// 指定フィールドのみ上書きする。
    pub fn update(&self, id: BookId, patch: BookPatch) -> Result<Book, AppError> {
        let mut inventory = self.load()?;
        let book = inventory.update(id, patch)?.clone();
        self.persist(&inventory)?;
        info!(id = %book.id(), status = %book.status(), "book updated");
        Ok(book)
    }

    /// 削除して、削除したレコードを返す。
    pub fn delete(&self, id: BookId) -> Result<Book, AppError> {
        let mut inventory = self.load()?;
        let removed = inventory.remove(id)?;
        self.persist(&inventory)?;
        info!(id = %removed.id(), "book deleted");
        Ok(removed)
    }

    // --- private ---

    fn load(&self) -> Result<Inventory, AppError> {
        self.repo
            .load()
            .map_err(|e| AppError::Storage(Box::new(e)))
    }

    fn persist(&self, inventory: &Inventory) -> Result<(), AppError> {
        self.repo
            .save(inventory)
            .map_err(|e| AppError::Storage(Box::new(e)))
    }
}
