//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use book_inventory::application::service::InventoryService;
use book_inventory::domain::model::book::Book;
use book_inventory::domain::model::id::BookId;
use book_inventory::domain::model::inventory::Inventory;
use book_inventory::domain::model::status::BookStatus;
use book_inventory::domain::repository::BookRepository;
use book_inventory::infra::json_store::JsonBookRepository;
use book_inventory::interface::app::Interaction;
use book_inventory::interface::http::router;

// =============================================================================
// InMemoryRepo: テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error")]
pub struct InMemoryError;

/// ファイルI/O不要のインメモリリポジトリ。JSON文字列で保持する。
pub struct InMemoryRepo {
    store: Mutex<Option<String>>,
    fail: bool,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(None),
            fail: false,
        }
    }

    /// load / save が常に失敗するリポジトリ
    pub fn failing() -> Self {
        Self {
            store: Mutex::new(None),
            fail: true,
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.store.lock().unwrap().clone()
    }
}

impl BookRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Inventory, Self::Error> {
        if self.fail {
            return Err(InMemoryError);
        }
        match self.store.lock().unwrap().as_deref() {
            Some(json) => Ok(serde_json::from_str(json).unwrap()),
            None => Ok(Inventory::new()),
        }
    }

    fn save(&self, inventory: &Inventory) -> Result<(), Self::Error> {
        if self.fail {
            return Err(InMemoryError);
        }
        let json = serde_json::to_string(inventory).unwrap();
        *self.store.lock().unwrap() = Some(json);
        Ok(())
    }
}

// =============================================================================
// TestInventory: 既定データ
// =============================================================================

pub struct TestInventory;

impl TestInventory {
    /// 標準的なテスト用在庫:
    /// ```text
    /// 1. Dune / Frank Herbert (available)
    /// 2. Beloved / Toni Morrison (borrowed)
    /// 3. emma / Jane Austen (sold)
    /// 5. The Hobbit / J.R.R. Tolkien (available)
    /// ```
    pub fn standard() -> Inventory {
        Inventory::from(vec![
            Book::new(BookId::new(1), "Dune", "Frank Herbert", BookStatus::Available),
            Book::new(BookId::new(2), "Beloved", "Toni Morrison", BookStatus::Borrowed),
            Book::new(BookId::new(3), "emma", "Jane Austen", BookStatus::Sold),
            Book::new(
                BookId::new(5),
                "The Hobbit",
                "J.R.R. Tolkien",
                BookStatus::Available,
            ),
        ])
    }

    /// InMemoryRepoに在庫を保存してServiceを返す。
    pub fn service_with(inventory: &Inventory) -> InventoryService<InMemoryRepo> {
        let repo = InMemoryRepo::new();
        repo.save(inventory).unwrap();
        InventoryService::new(repo)
    }

    /// dir/inventory.json に在庫を書き込み、そのパスを返す。
    pub fn write_file(dir: &Path, inventory: &Inventory) -> std::path::PathBuf {
        let path = dir.join("inventory.json");
        JsonBookRepository::new(&path).save(inventory).unwrap();
        path
    }
}

// =============================================================================
// Live server
// =============================================================================

/// ファイルを指すサーバをエフェメラルポートで起動し、base URLを返す。
pub async fn spawn_server(data_file: &Path) -> String {
    let repo = JsonBookRepository::new(data_file);
    let app = router(Arc::new(InventoryService::new(repo)), None);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// 接続を受け付けないアドレス（バインドしてすぐ解放する）。
pub async fn dead_server_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// =============================================================================
// ScriptedUi: 確認ダイアログの応答を事前に決めておく
// =============================================================================

#[derive(Debug, Default)]
pub struct ScriptedUi {
    answers: VecDeque<bool>,
    pub prompts: Vec<String>,
    pub notices: Vec<String>,
}

impl ScriptedUi {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Interaction for ScriptedUi {
    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        // 応答が尽きたら承認
        self.answers.pop_front().unwrap_or(true)
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
