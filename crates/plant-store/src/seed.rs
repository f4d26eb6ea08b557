//! 預設範例資料（造紙廠）

use chrono::{Duration, NaiveDate};
use plant_core::{
    Inventory, InventoryItem, Machine, MachineStatus, ProductionRecord, RecordSnapshot,
    SalesRecord,
};
use rust_decimal::Decimal;

/// 預設範例資料
pub fn default_snapshot() -> RecordSnapshot {
    RecordSnapshot::new(machines(), production(), sales(), inventory())
}

pub fn inventory() -> Inventory {
    Inventory::new(
        vec![
            item(1, "Wood Pulp", 15000, "kg", 5000),
            item(2, "Recycled Pulp", 8000, "kg", 3000),
            item(3, "Chemicals", 2000, "kg", 1000),
        ],
        vec![
            item(1, "HVS A4 Paper", 50000, "ream", 10000),
            item(2, "Newsprint", 30000, "ream", 8000),
            item(3, "Packaging Paper", 20000, "ream", 5000),
        ],
    )
}

pub fn machines() -> Vec<Machine> {
    vec![
        Machine::new(1, "Paper Machine 1", MachineStatus::Running).with_downtime(Decimal::from(45)),
        Machine::new(2, "Paper Machine 2", MachineStatus::Maintenance)
            .with_downtime(Decimal::from(120)),
        Machine::new(3, "Coating Machine 1", MachineStatus::Running).with_downtime(Decimal::from(30)),
    ]
}

pub fn production() -> Vec<ProductionRecord> {
    vec![
        record((2024, 1, 1), 1, 1, 12000, 120),
        record((2024, 1, 1), 2, 2, 8000, 160),
        record((2024, 1, 2), 1, 1, 11500, 115),
    ]
}

/// 過去 12 個月的銷售紀錄（每 30 天一筆，每期成長 1000）
pub fn sales() -> Vec<SalesRecord> {
    let base_date = date((2023, 1, 1));
    (0..12i64)
        .map(|i| {
            SalesRecord::new(
                base_date + Duration::days(30 * i),
                1,
                Decimal::from(12000 + i * 1000),
            )
        })
        .collect()
}

fn item(id: i64, name: &str, stock: i64, unit: &str, min_stock: i64) -> InventoryItem {
    InventoryItem::new(id, name, Decimal::from(stock), unit, Decimal::from(min_stock))
}

fn record(
    ymd: (i32, u32, u32),
    machine_id: i64,
    product_id: i64,
    quantity: i64,
    defects: i64,
) -> ProductionRecord {
    ProductionRecord::new(date(ymd), machine_id, product_id, Decimal::from(quantity))
        .with_defects(Decimal::from(defects))
}

fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}
