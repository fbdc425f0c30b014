pub mod book;
pub mod id;
pub mod inventory;
pub mod status;
