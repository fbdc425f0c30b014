use super::model::inventory::Inventory;

/// 永続化の抽象。Infra層が実装する。
/// 保存先が存在しない場合、loadは空のInventoryを返す。
pub trait BookRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<Inventory, Self::Error>;
    fn save(&self, inventory: &Inventory) -> Result<(), Self::Error>;
}
