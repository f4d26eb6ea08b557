//! # Plant Analytics
//!
//! 製造現場分析：設備綜合效率（OEE）、銷售預測與低庫存警示。
//!
//! ## 模組
//! - [`plant_core`]: 資料模型與分析參數
//! - [`plant_calc`]: OEE、預測與庫存監控計算
//! - [`plant_store`]: JSON 檔案 / SQLite 儲存庫
//!
//! ## 範例
//! ```no_run
//! use plant_analytics::prelude::*;
//!
//! let repo = open_repository(&StoreConfig::json_files("data")).unwrap();
//! let snapshot = load_snapshot(repo.as_ref());
//! let report = ReportAssembler::default().dashboard(&snapshot);
//! println!("{} alerts", report.alerts.len());
//! ```

pub mod cli;
pub mod commands;
pub mod logging;

pub use plant_calc;
pub use plant_core;
pub use plant_store;

pub mod prelude {
    pub use plant_calc::{ForecastEngine, InventoryMonitor, OeeCalculator, ReportAssembler};
    pub use plant_core::{
        AnalyticsConfig, Inventory, InventoryCategory, InventoryItem, Machine, MachineStatus,
        OeeResult, ProductionRecord, RecordSnapshot, SalesRecord,
    };
    pub use plant_store::{
        load_snapshot, open_repository, RecordRepository, StoreBackend, StoreConfig,
    };
}
