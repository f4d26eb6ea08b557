//! 紀錄快照

use serde::{Deserialize, Serialize};

use crate::{Inventory, Machine, ProductionRecord, SalesRecord};

/// 一次請求使用的全部紀錄（不可變快照）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub machines: Vec<Machine>,
    pub production: Vec<ProductionRecord>,
    pub sales: Vec<SalesRecord>,
    pub inventory: Inventory,
}

impl RecordSnapshot {
    pub fn new(
        machines: Vec<Machine>,
        production: Vec<ProductionRecord>,
        sales: Vec<SalesRecord>,
        inventory: Inventory,
    ) -> Self {
        Self {
            machines,
            production,
            sales,
            inventory,
        }
    }

    /// 依ID查找機台
    pub fn machine(&self, machine_id: i64) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == machine_id)
    }

    /// 檢查是否完全沒有資料
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
            && self.production.is_empty()
            && self.sales.is_empty()
            && self.inventory.is_empty()
    }
}
