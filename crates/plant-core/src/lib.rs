//! # Plant Core
//!
//! 核心資料模型與類型定義

pub mod config;
pub mod inventory;
pub mod machine;
pub mod metrics;
pub mod production;
pub mod sales;
pub mod snapshot;

// Re-export 主要類型
pub use config::AnalyticsConfig;
pub use inventory::{Inventory, InventoryCategory, InventoryItem};
pub use machine::{Machine, MachineStatus, DEFAULT_PLANNED_PRODUCTION_MINUTES};
pub use metrics::{ForecastPoint, LowStockAlert, MachineOee, OeeResult};
pub use production::ProductionRecord;
pub use sales::SalesRecord;
pub use snapshot::RecordSnapshot;

/// 資料模型錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlantError {
    #[error("無效的紀錄 ({field}): {message}")]
    InvalidRecord { field: String, message: String },

    #[error("未知的機台狀態: {0}")]
    UnknownStatus(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

impl PlantError {
    pub(crate) fn negative(field: &str, value: rust_decimal::Decimal) -> Self {
        PlantError::InvalidRecord {
            field: field.to_string(),
            message: format!("不可為負值: {}", value),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlantError>;

/// 檢查數值非負
pub(crate) fn ensure_non_negative(field: &str, value: rust_decimal::Decimal) -> Result<()> {
    if value < rust_decimal::Decimal::ZERO {
        return Err(PlantError::negative(field, value));
    }
    Ok(())
}
