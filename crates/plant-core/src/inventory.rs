//! 庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ensure_non_negative;

/// 庫存類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryCategory {
    /// 原物料
    RawMaterial,
    /// 成品
    FinishedProduct,
}

impl InventoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryCategory::RawMaterial => "raw_material",
            InventoryCategory::FinishedProduct => "finished_product",
        }
    }
}

impl fmt::Display for InventoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 庫存品項（原物料或成品）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// 品項ID（同類別內唯一）
    pub id: i64,

    /// 品名
    pub name: String,

    /// 現有庫存
    #[serde(default)]
    pub stock: Decimal,

    /// 單位
    #[serde(default)]
    pub unit: String,

    /// 最低庫存
    #[serde(default)]
    pub min_stock: Decimal,
}

impl InventoryItem {
    /// 創建新的庫存品項
    pub fn new(
        id: i64,
        name: impl Into<String>,
        stock: Decimal,
        unit: impl Into<String>,
        min_stock: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            stock,
            unit: unit.into(),
            min_stock,
        }
    }

    /// 檢查庫存是否低於最低庫存（嚴格小於）
    pub fn is_low_stock(&self) -> bool {
        self.stock < self.min_stock
    }

    /// 獲取需要補充的數量
    pub fn replenishment_needed(&self) -> Decimal {
        if self.is_low_stock() {
            self.min_stock.saturating_sub(self.stock)
        } else {
            Decimal::ZERO
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        ensure_non_negative("stock", self.stock)?;
        ensure_non_negative("min_stock", self.min_stock)?;
        Ok(())
    }
}

/// 庫存快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub raw_materials: Vec<InventoryItem>,

    #[serde(default)]
    pub finished_products: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new(raw_materials: Vec<InventoryItem>, finished_products: Vec<InventoryItem>) -> Self {
        Self {
            raw_materials,
            finished_products,
        }
    }

    /// 依慣例順序（原物料在前、成品在後）走訪所有品項
    pub fn iter(&self) -> impl Iterator<Item = (InventoryCategory, &InventoryItem)> {
        self.raw_materials
            .iter()
            .map(|item| (InventoryCategory::RawMaterial, item))
            .chain(
                self.finished_products
                    .iter()
                    .map(|item| (InventoryCategory::FinishedProduct, item)),
            )
    }

    /// 取得指定類別的品項
    pub fn items(&self, category: InventoryCategory) -> &[InventoryItem] {
        match category {
            InventoryCategory::RawMaterial => &self.raw_materials,
            InventoryCategory::FinishedProduct => &self.finished_products,
        }
    }

    /// 取得指定類別的品項（可變）
    pub fn items_mut(&mut self, category: InventoryCategory) -> &mut Vec<InventoryItem> {
        match category {
            InventoryCategory::RawMaterial => &mut self.raw_materials,
            InventoryCategory::FinishedProduct => &mut self.finished_products,
        }
    }

    pub fn len(&self) -> usize {
        self.raw_materials.len() + self.finished_products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_create_item() {
        let item = InventoryItem::new(
            1,
            "Wood Pulp",
            Decimal::from(15000),
            "kg",
            Decimal::from(5000),
        );

        assert_eq!(item.name, "Wood Pulp");
        assert!(!item.is_low_stock());
        assert_eq!(item.replenishment_needed(), Decimal::ZERO);
    }

    #[rstest]
    #[case(4000, 5000, true)]
    #[case(5000, 5000, false)]
    #[case(5001, 5000, false)]
    #[case(0, 0, false)]
    fn test_low_stock_is_strict(#[case] stock: i64, #[case] min: i64, #[case] low: bool) {
        let item = InventoryItem::new(1, "X", Decimal::from(stock), "kg", Decimal::from(min));
        assert_eq!(item.is_low_stock(), low);
    }

    #[test]
    fn test_replenishment_needed() {
        let item = InventoryItem::new(
            2,
            "Chemicals",
            Decimal::from(400),
            "kg",
            Decimal::from(1000),
        );

        assert_eq!(item.replenishment_needed(), Decimal::from(600));
    }

    #[test]
    fn test_iteration_order() {
        let inventory = Inventory::new(
            vec![InventoryItem::new(1, "A", Decimal::ONE, "kg", Decimal::ZERO)],
            vec![
                InventoryItem::new(1, "B", Decimal::ONE, "ream", Decimal::ZERO),
                InventoryItem::new(2, "C", Decimal::ONE, "ream", Decimal::ZERO),
            ],
        );

        let names: Vec<_> = inventory
            .iter()
            .map(|(category, item)| (category, item.name.as_str()))
            .collect();

        assert_eq!(
            names,
            vec![
                (InventoryCategory::RawMaterial, "A"),
                (InventoryCategory::FinishedProduct, "B"),
                (InventoryCategory::FinishedProduct, "C"),
            ]
        );
        assert_eq!(inventory.len(), 3);
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let inventory: Inventory = serde_json::from_str(r#"{"raw_materials": []}"#).unwrap();
        assert!(inventory.is_empty());
    }
}
