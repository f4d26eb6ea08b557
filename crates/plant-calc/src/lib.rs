//! # Plant Calculation Engine
//!
//! 核心分析計算：OEE、需求預測、低庫存警示。
//! 所有計算皆為純函數，不持有可變狀態，可在多個執行緒同時呼叫。

pub mod forecast;
pub mod inventory_monitor;
pub mod oee;
pub mod report;

// Re-export 主要類型
pub use forecast::{ForecastEngine, LinearTrend};
pub use inventory_monitor::InventoryMonitor;
pub use oee::{OeeCalculator, ProductionTotals};
pub use report::{AnalysisView, DashboardReport, InventoryView, ProductionView, ReportAssembler};
