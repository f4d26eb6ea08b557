//! 分析結果模型（每次請求重新計算，不持久化）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{InventoryCategory, InventoryItem, MachineStatus};

/// OEE 計算結果（百分比，兩位小數）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OeeResult {
    /// 可用率 %
    pub availability: Decimal,
    /// 表現性 %
    pub performance: Decimal,
    /// 良率 %
    pub quality: Decimal,
    /// 設備綜合效率 %
    pub oee: Decimal,
}

impl OeeResult {
    /// 零值狀態（無生產紀錄或找不到機台）
    pub const fn zero() -> Self {
        Self {
            availability: Decimal::ZERO,
            performance: Decimal::ZERO,
            quality: Decimal::ZERO,
            oee: Decimal::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl Default for OeeResult {
    fn default() -> Self {
        Self::zero()
    }
}

/// 單一機台的 OEE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineOee {
    pub machine_id: i64,
    pub name: String,
    pub status: MachineStatus,
    #[serde(flatten)]
    pub result: OeeResult,
}

/// 預測點
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 預測期（相對於歷史末端，從 1 起算）
    pub period: u32,

    /// 預測數量（整數，可能為負）
    pub forecast: Decimal,
}

impl ForecastPoint {
    pub fn new(period: u32, forecast: Decimal) -> Self {
        Self { period, forecast }
    }
}

/// 低庫存警示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub category: InventoryCategory,
    pub item_id: i64,
    pub name: String,
    pub stock: Decimal,
    pub unit: String,
    pub min_stock: Decimal,

    /// 補足到最低庫存所需的數量
    pub shortage: Decimal,

    /// 警示訊息
    pub message: String,
}

impl LowStockAlert {
    /// 從庫存品項創建警示
    pub fn for_item(category: InventoryCategory, item: &InventoryItem) -> Self {
        Self {
            category,
            item_id: item.id,
            name: item.name.clone(),
            stock: item.stock,
            unit: item.unit.clone(),
            min_stock: item.min_stock,
            shortage: item.replenishment_needed(),
            message: format!("{} 庫存偏低: {} {}", item.name, item.stock, item.unit),
        }
    }
}

impl fmt::Display for LowStockAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
