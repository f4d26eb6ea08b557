//! 報表組裝

use chrono::NaiveDate;
use plant_core::{
    AnalyticsConfig, ForecastPoint, Inventory, LowStockAlert, Machine, MachineOee,
    ProductionRecord, RecordSnapshot,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{ForecastEngine, InventoryMonitor, OeeCalculator};

/// 總覽報表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub inventory: Inventory,
    pub machines: Vec<Machine>,
    pub oee: Vec<MachineOee>,
    pub alerts: Vec<LowStockAlert>,
    pub forecast: Vec<ForecastPoint>,
}

/// 庫存報表（全部品項與低庫存警示）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryView {
    pub inventory: Inventory,
    pub alerts: Vec<LowStockAlert>,
}

/// 生產報表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionView {
    pub machines: Vec<Machine>,
    pub production: Vec<ProductionRecord>,
    pub oee: Vec<MachineOee>,
}

/// 銷售分析報表（圖表序列 + 預測）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView {
    pub sales_dates: Vec<NaiveDate>,
    pub sales_quantities: Vec<Decimal>,
    pub forecast: Vec<ForecastPoint>,
}

/// 報表組裝器
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    oee: OeeCalculator,
    forecast: ForecastEngine,
}

impl ReportAssembler {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            oee: OeeCalculator::new(config.clone()),
            forecast: ForecastEngine::new(config),
        }
    }

    /// 組裝總覽報表
    pub fn dashboard(&self, snapshot: &RecordSnapshot) -> DashboardReport {
        tracing::info!(
            "組裝總覽報表：機台 {} 台，庫存品項 {} 筆，銷售紀錄 {} 筆",
            snapshot.machines.len(),
            snapshot.inventory.len(),
            snapshot.sales.len()
        );

        DashboardReport {
            inventory: snapshot.inventory.clone(),
            machines: snapshot.machines.clone(),
            oee: self.oee.compute_all(&snapshot.machines, &snapshot.production),
            alerts: InventoryMonitor::find_low_stock_alerts(&snapshot.inventory),
            forecast: self.forecast.forecast(&snapshot.sales),
        }
    }

    /// 組裝庫存報表
    pub fn inventory_view(&self, inventory: &Inventory) -> InventoryView {
        InventoryView {
            inventory: inventory.clone(),
            alerts: InventoryMonitor::find_low_stock_alerts(inventory),
        }
    }

    /// 組裝生產報表
    pub fn production_view(&self, snapshot: &RecordSnapshot) -> ProductionView {
        ProductionView {
            machines: snapshot.machines.clone(),
            production: snapshot.production.clone(),
            oee: self.oee.compute_all(&snapshot.machines, &snapshot.production),
        }
    }

    /// 組裝銷售分析報表
    pub fn analysis_view(&self, snapshot: &RecordSnapshot) -> AnalysisView {
        AnalysisView {
            sales_dates: snapshot.sales.iter().map(|s| s.date).collect(),
            sales_quantities: snapshot.sales.iter().map(|s| s.quantity).collect(),
            forecast: self.forecast.forecast(&snapshot.sales),
        }
    }

    pub fn oee_calculator(&self) -> &OeeCalculator {
        &self.oee
    }

    pub fn forecast_engine(&self) -> &ForecastEngine {
        &self.forecast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plant_core::{Inventory, InventoryItem, MachineStatus, SalesRecord};

    fn snapshot() -> RecordSnapshot {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();

        RecordSnapshot::new(
            vec![
                Machine::new(1, "PM-1", MachineStatus::Running).with_downtime(Decimal::from(45)),
                Machine::new(2, "PM-2", MachineStatus::Maintenance).with_downtime(Decimal::from(120)),
            ],
            vec![ProductionRecord::new(day(1), 1, 1, Decimal::from(12000))
                .with_defects(Decimal::from(120))],
            vec![
                SalesRecord::new(day(1), 1, Decimal::from(100)),
                SalesRecord::new(day(2), 1, Decimal::from(200)),
                SalesRecord::new(day(3), 1, Decimal::from(300)),
            ],
            Inventory::new(
                vec![InventoryItem::new(1, "Wood Pulp", Decimal::from(4000), "kg", Decimal::from(5000))],
                vec![],
            ),
        )
    }

    #[test]
    fn test_dashboard() {
        let assembler = ReportAssembler::default();
        let report = assembler.dashboard(&snapshot());

        assert_eq!(report.machines.len(), 2);
        assert_eq!(report.inventory.len(), 1);
        assert_eq!(report.oee.len(), 2);
        assert_eq!(report.oee[0].result.oee, Decimal::new(8972, 2));
        assert!(report.oee[1].result.is_zero());
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.forecast[0].forecast, Decimal::from(400));
    }

    #[test]
    fn test_inventory_view_lists_every_item() {
        let assembler = ReportAssembler::default();
        let inventory = Inventory::new(
            vec![
                InventoryItem::new(1, "Wood Pulp", Decimal::from(4000), "kg", Decimal::from(5000)),
                InventoryItem::new(2, "Recycled Pulp", Decimal::from(8000), "kg", Decimal::from(3000)),
            ],
            vec![InventoryItem::new(1, "Newsprint", Decimal::from(30000), "ream", Decimal::from(8000))],
        );

        let view = assembler.inventory_view(&inventory);

        assert_eq!(view.inventory.len(), 3);
        assert_eq!(view.inventory.items(plant_core::InventoryCategory::FinishedProduct)[0].name, "Newsprint");
        assert_eq!(view.alerts.len(), 1);
        assert_eq!(view.alerts[0].item_id, 1);
    }

    #[test]
    fn test_empty_snapshot_is_no_data() {
        let assembler = ReportAssembler::default();
        let report = assembler.dashboard(&RecordSnapshot::default());

        assert!(report.oee.is_empty());
        assert!(report.alerts.is_empty());
        assert!(report.forecast.is_empty());
    }

    #[test]
    fn test_analysis_view_series() {
        let assembler = ReportAssembler::new(AnalyticsConfig::new().with_forecast_periods(1));
        let view = assembler.analysis_view(&snapshot());

        assert_eq!(view.sales_dates.len(), 3);
        assert_eq!(view.sales_quantities[2], Decimal::from(300));
        assert_eq!(view.forecast.len(), 1);
    }

    #[test]
    fn test_production_view() {
        let assembler = ReportAssembler::default();
        let view = assembler.production_view(&snapshot());

        assert_eq!(view.machines.len(), 2);
        assert_eq!(view.production.len(), 1);
        assert_eq!(view.oee[0].machine_id, 1);
    }
}
