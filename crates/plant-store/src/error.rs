//! 儲存層錯誤類型

use thiserror::Error;

/// 儲存層錯誤類型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("紀錄未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("檔案存取失敗: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析失敗: {0}")]
    Json(#[from] serde_json::Error),

    #[error("資料庫查詢失敗: {0}")]
    DatabaseQueryError(String),

    #[error("資料庫鎖獲取失敗: {0}")]
    LockError(String),

    #[error("資料驗證失敗: {0}")]
    Validation(#[from] plant_core::PlantError),

    #[error("設定錯誤: {0}")]
    Config(String),
}

impl RepositoryError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 類型別名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
