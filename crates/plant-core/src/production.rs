//! 生產紀錄模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ensure_non_negative;

/// 每日生產紀錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// 生產日期
    pub date: NaiveDate,

    /// 機台ID
    pub machine_id: i64,

    /// 產品ID
    pub product_id: i64,

    /// 生產數量
    #[serde(default)]
    pub quantity: Decimal,

    /// 不良數量
    #[serde(default)]
    pub defects: Decimal,
}

impl ProductionRecord {
    /// 創建新的生產紀錄（不良數量為 0）
    pub fn new(date: NaiveDate, machine_id: i64, product_id: i64, quantity: Decimal) -> Self {
        Self {
            date,
            machine_id,
            product_id,
            quantity,
            defects: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置不良數量
    pub fn with_defects(mut self, defects: Decimal) -> Self {
        self.defects = defects;
        self
    }

    /// 良品數量（不良數超過產量時為負值），溢位時回傳 `None`
    pub fn good_quantity(&self) -> Option<Decimal> {
        self.quantity.checked_sub(self.defects)
    }

    /// 邊界驗證（不良數量超過生產數量不視為錯誤）
    pub fn validate(&self) -> crate::Result<()> {
        ensure_non_negative("quantity", self.quantity)?;
        ensure_non_negative("defects", self.defects)?;
        Ok(())
    }
}
