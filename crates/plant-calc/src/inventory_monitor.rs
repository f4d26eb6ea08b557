//! 低庫存監控

use plant_core::{Inventory, InventoryCategory, InventoryItem, LowStockAlert};

/// 低庫存監控器
pub struct InventoryMonitor;

impl InventoryMonitor {
    /// 掃描庫存快照（原物料在前、成品在後）
    pub fn find_low_stock_alerts(inventory: &Inventory) -> Vec<LowStockAlert> {
        let alerts = Self::scan(inventory.iter());

        tracing::debug!("庫存品項 {} 筆，低庫存警示 {} 筆", inventory.len(), alerts.len());

        alerts
    }

    /// 依輸入順序掃描品項，庫存嚴格小於最低庫存時產生警示
    pub fn scan<'a, I>(items: I) -> Vec<LowStockAlert>
    where
        I: IntoIterator<Item = (InventoryCategory, &'a InventoryItem)>,
    {
        items
            .into_iter()
            .filter(|(_, item)| item.is_low_stock())
            .map(|(category, item)| LowStockAlert::for_item(category, item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(id: i64, name: &str, stock: i64, unit: &str, min_stock: i64) -> InventoryItem {
        InventoryItem::new(id, name, Decimal::from(stock), unit, Decimal::from(min_stock))
    }

    #[test]
    fn test_strict_threshold() {
        let inventory = Inventory::new(
            vec![
                item(1, "Wood Pulp", 4000, "kg", 5000),
                item(2, "Recycled Pulp", 5000, "kg", 5000),
            ],
            vec![],
        );

        let alerts = InventoryMonitor::find_low_stock_alerts(&inventory);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].name, "Wood Pulp");
        assert!(alerts[0].message.contains("Wood Pulp"));
        assert!(alerts[0].message.contains("4000"));
        assert!(alerts[0].message.contains("kg"));
        assert_eq!(alerts[0].shortage, Decimal::from(1000));
    }

    #[test]
    fn test_alert_order_follows_input() {
        let inventory = Inventory::new(
            vec![
                item(1, "Wood Pulp", 100, "kg", 5000),
                item(3, "Chemicals", 10, "kg", 1000),
            ],
            vec![
                item(2, "Newsprint", 10, "ream", 8000),
                item(1, "HVS A4 Paper", 50000, "ream", 10000),
            ],
        );

        let alerts = InventoryMonitor::find_low_stock_alerts(&inventory);

        let summary: Vec<_> = alerts
            .iter()
            .map(|a| (a.category, a.item_id))
            .collect();
        assert_eq!(
            summary,
            vec![
                (InventoryCategory::RawMaterial, 1),
                (InventoryCategory::RawMaterial, 3),
                (InventoryCategory::FinishedProduct, 2),
            ]
        );
    }

    #[test]
    fn test_empty_inventory() {
        assert!(InventoryMonitor::find_low_stock_alerts(&Inventory::default()).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let inventory = Inventory::new(vec![item(1, "Wood Pulp", 1, "kg", 2)], vec![]);

        assert_eq!(
            InventoryMonitor::find_low_stock_alerts(&inventory),
            InventoryMonitor::find_low_stock_alerts(&inventory)
        );
    }
}
