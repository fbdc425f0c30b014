use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::model::inventory::Inventory;
use crate::domain::repository::BookRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSONファイルによるBookRepository実装。
/// 1 Inventory = 1 JSONファイル（レコードの配列）。
#[derive(Debug, Clone)]
pub struct JsonBookRepository {
    path: PathBuf,
}

impl JsonBookRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BookRepository for JsonBookRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Inventory, Self::Error> {
        if !self.path.exists() {
            return Ok(Inventory::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        // 空ファイルは空配列として扱う
        if content.trim().is_empty() {
            return Ok(Inventory::new());
        }
        let inventory: Inventory = serde_json::from_str(&content)?;
        Ok(inventory)
    }

    fn save(&self, inventory: &Inventory) -> Result<(), Self::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(inventory)?;
        // 書き込みごとに別の一時ファイルを作り、同じディレクトリ内でrenameする
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
