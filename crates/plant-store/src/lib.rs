//! # Plant Store
//!
//! 紀錄儲存層：JSON 檔案與 SQLite 兩種後端，共用 [`RecordRepository`] 介面。

pub mod config;
pub mod error;
pub mod json_store;
pub mod repository;
pub mod seed;
pub mod snapshot;
pub mod sqlite_store;

pub use config::{StoreBackend, StoreConfig};
pub use error::{RepositoryError, RepositoryResult};
pub use json_store::JsonFileRepository;
pub use repository::{InventoryUpdate, MachineUpdate, NewProductionRecord, RecordRepository};
pub use snapshot::{load_snapshot, open_repository};
pub use sqlite_store::SqliteRepository;
