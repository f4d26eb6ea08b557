//! 紀錄儲存庫介面

use chrono::NaiveDate;
use plant_core::{
    Inventory, InventoryCategory, InventoryItem, Machine, MachineStatus, PlantError,
    ProductionRecord, SalesRecord,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::RepositoryResult;

/// 紀錄儲存庫
///
/// 讀取回傳完整集合（銷售紀錄依日期排序）；每次寫入呼叫為全有或全無。
pub trait RecordRepository: Send + Sync {
    /// 後端名稱（用於日誌）
    fn backend_name(&self) -> &'static str;

    fn machines(&self) -> RepositoryResult<Vec<Machine>>;

    fn production_history(&self) -> RepositoryResult<Vec<ProductionRecord>>;

    fn sales_history(&self) -> RepositoryResult<Vec<SalesRecord>>;

    fn inventory(&self) -> RepositoryResult<Inventory>;

    /// 批次更新庫存；任一ID不存在時整批失敗
    fn update_inventory(&self, updates: &[InventoryUpdate]) -> RepositoryResult<()>;

    /// 批次更新機台；任一ID不存在時整批失敗
    fn update_machines(&self, updates: &[MachineUpdate]) -> RepositoryResult<()>;

    /// 以今天日期新增一筆生產紀錄
    fn append_production(&self, record: NewProductionRecord) -> RepositoryResult<ProductionRecord>;
}

/// 庫存更新
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub category: InventoryCategory,
    pub id: i64,
    #[serde(default)]
    pub stock: Option<Decimal>,
    #[serde(default)]
    pub min_stock: Option<Decimal>,
}

impl InventoryUpdate {
    pub fn new(category: InventoryCategory, id: i64) -> Self {
        Self {
            category,
            id,
            stock: None,
            min_stock: None,
        }
    }

    pub fn with_stock(mut self, stock: Decimal) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn with_min_stock(mut self, min_stock: Decimal) -> Self {
        self.min_stock = Some(min_stock);
        self
    }

    pub fn validate(&self) -> Result<(), PlantError> {
        check_non_negative("stock", self.stock)?;
        check_non_negative("min_stock", self.min_stock)
    }

    /// 套用到品項
    pub fn apply(&self, item: &mut InventoryItem) {
        if let Some(stock) = self.stock {
            item.stock = stock;
        }
        if let Some(min_stock) = self.min_stock {
            item.min_stock = min_stock;
        }
    }
}

/// 機台更新
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineUpdate {
    pub id: i64,
    #[serde(default)]
    pub status: Option<MachineStatus>,
    #[serde(default)]
    pub planned_production_time: Option<Decimal>,
    #[serde(default)]
    pub downtime: Option<Decimal>,
}

impl MachineUpdate {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            status: None,
            planned_production_time: None,
            downtime: None,
        }
    }

    pub fn with_status(mut self, status: MachineStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_planned_production_time(mut self, minutes: Decimal) -> Self {
        self.planned_production_time = Some(minutes);
        self
    }

    pub fn with_downtime(mut self, minutes: Decimal) -> Self {
        self.downtime = Some(minutes);
        self
    }

    pub fn validate(&self) -> Result<(), PlantError> {
        check_non_negative("planned_production_time", self.planned_production_time)?;
        check_non_negative("downtime", self.downtime)
    }

    /// 套用到機台
    pub fn apply(&self, machine: &mut Machine) {
        if let Some(status) = self.status {
            machine.status = status;
        }
        if let Some(planned) = self.planned_production_time {
            machine.planned_production_time = planned;
        }
        if let Some(downtime) = self.downtime {
            machine.downtime = downtime;
        }
    }
}

/// 新增生產紀錄（日期由儲存庫填入）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProductionRecord {
    pub machine_id: i64,
    pub product_id: i64,
    pub quantity: Decimal,
    #[serde(default)]
    pub defects: Decimal,
}

impl NewProductionRecord {
    pub fn new(machine_id: i64, product_id: i64, quantity: Decimal) -> Self {
        Self {
            machine_id,
            product_id,
            quantity,
            defects: Decimal::ZERO,
        }
    }

    pub fn with_defects(mut self, defects: Decimal) -> Self {
        self.defects = defects;
        self
    }

    /// 以指定日期建立生產紀錄並驗證
    pub fn into_record(self, date: NaiveDate) -> Result<ProductionRecord, PlantError> {
        let record = ProductionRecord::new(date, self.machine_id, self.product_id, self.quantity)
            .with_defects(self.defects);
        record.validate()?;
        Ok(record)
    }
}

/// 今天日期（本地時區）
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn check_non_negative(field: &str, value: Option<Decimal>) -> Result<(), PlantError> {
    match value {
        Some(v) if v < Decimal::ZERO => Err(PlantError::InvalidRecord {
            field: field.to_string(),
            message: format!("不可為負值: {}", v),
        }),
        _ => Ok(()),
    }
}
