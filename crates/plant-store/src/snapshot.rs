//! 讀取儲存庫快照與建立後端

use plant_core::RecordSnapshot;

use crate::{
    JsonFileRepository, RecordRepository, RepositoryResult, SqliteRepository, StoreBackend,
    StoreConfig,
};

/// 依設定開啟儲存庫
pub fn open_repository(config: &StoreConfig) -> RepositoryResult<Box<dyn RecordRepository>> {
    let repo: Box<dyn RecordRepository> = match &config.backend {
        StoreBackend::JsonFiles { data_dir } => {
            Box::new(JsonFileRepository::open(data_dir, config.seed_defaults)?)
        }
        StoreBackend::Sqlite { path } => {
            Box::new(SqliteRepository::open(path, config.seed_defaults)?)
        }
    };
    Ok(repo)
}

/// 讀取全部紀錄
///
/// 任一集合讀取失敗時記錄警告並以空集合代替，讓報表仍可產出。
pub fn load_snapshot(repo: &dyn RecordRepository) -> RecordSnapshot {
    let backend = repo.backend_name();

    let machines = repo.machines().unwrap_or_else(|e| {
        tracing::warn!("[{}] 讀取機台失敗，使用空集合: {}", backend, e);
        Vec::new()
    });
    let production = repo.production_history().unwrap_or_else(|e| {
        tracing::warn!("[{}] 讀取生產紀錄失敗，使用空集合: {}", backend, e);
        Vec::new()
    });
    let sales = repo.sales_history().unwrap_or_else(|e| {
        tracing::warn!("[{}] 讀取銷售紀錄失敗，使用空集合: {}", backend, e);
        Vec::new()
    });
    let inventory = repo.inventory().unwrap_or_else(|e| {
        tracing::warn!("[{}] 讀取庫存失敗，使用空集合: {}", backend, e);
        Default::default()
    });

    tracing::debug!(
        "[{}] 快照: 機台 {} 生產 {} 銷售 {} 庫存 {}",
        backend,
        machines.len(),
        production.len(),
        sales.len(),
        inventory.len()
    );

    RecordSnapshot::new(machines, production, sales, inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case::json(false)]
    #[case::sqlite(true)]
    fn test_open_seeded_backends(#[case] use_sqlite: bool) {
        let dir = TempDir::new().unwrap();
        let config = if use_sqlite {
            StoreConfig::sqlite(dir.path().join("plant.db"))
        } else {
            StoreConfig::json_files(dir.path())
        }
        .with_seed_defaults(true);

        let repo = open_repository(&config).unwrap();
        let snapshot = load_snapshot(repo.as_ref());

        assert_eq!(snapshot.machines.len(), 3);
        assert_eq!(snapshot.production.len(), 3);
        assert_eq!(snapshot.sales.len(), 12);
        assert_eq!(snapshot.inventory.len(), 6);
    }

    #[test]
    fn test_corrupt_collection_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::open(dir.path(), true).unwrap();
        std::fs::write(dir.path().join(crate::json_store::SALES_FILE), "[[[").unwrap();

        let snapshot = load_snapshot(&repo);

        assert!(snapshot.sales.is_empty());
        assert_eq!(snapshot.machines.len(), 3);
    }
}
