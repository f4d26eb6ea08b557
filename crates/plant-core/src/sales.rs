//! 銷售紀錄模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ensure_non_negative;

/// 銷售紀錄（預測引擎以輸入順序作為時間軸）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// 銷售日期
    pub date: NaiveDate,

    /// 產品ID
    pub product_id: i64,

    /// 銷售數量
    #[serde(default)]
    pub quantity: Decimal,
}

impl SalesRecord {
    pub fn new(date: NaiveDate, product_id: i64, quantity: Decimal) -> Self {
        Self {
            date,
            product_id,
            quantity,
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        ensure_non_negative("quantity", self.quantity)
    }
}
