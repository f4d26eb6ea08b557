//! 子命令執行
//!
//! 每個子命令回傳一個 JSON 值，由 `main` 輸出到 stdout。

use plant_calc::{InventoryMonitor, ReportAssembler};
use plant_core::AnalyticsConfig;
use plant_store::{
    load_snapshot, InventoryUpdate, MachineUpdate, NewProductionRecord, RecordRepository,
};
use serde_json::{json, Value};

use crate::cli::Command;

/// 執行子命令
pub fn execute(
    command: &Command,
    repo: &dyn RecordRepository,
    config: AnalyticsConfig,
) -> anyhow::Result<Value> {
    let assembler = ReportAssembler::new(config);

    let output = match command {
        Command::Dashboard => {
            let snapshot = load_snapshot(repo);
            serde_json::to_value(assembler.dashboard(&snapshot))?
        }
        Command::Oee { machine: None } => {
            let snapshot = load_snapshot(repo);
            let oee = assembler
                .oee_calculator()
                .compute_all(&snapshot.machines, &snapshot.production);
            serde_json::to_value(oee)?
        }
        Command::Oee {
            machine: Some(machine_id),
        } => {
            let snapshot = load_snapshot(repo);
            let result = assembler.oee_calculator().compute_for(
                *machine_id,
                &snapshot.production,
                &snapshot.machines,
            );
            let mut value = serde_json::to_value(result)?;
            value["machine_id"] = json!(machine_id);
            value
        }
        Command::Inventory => {
            let inventory = repo.inventory().unwrap_or_else(|e| {
                tracing::warn!("讀取庫存失敗，使用空集合: {}", e);
                Default::default()
            });
            serde_json::to_value(assembler.inventory_view(&inventory))?
        }
        Command::Production => {
            let snapshot = load_snapshot(repo);
            serde_json::to_value(assembler.production_view(&snapshot))?
        }
        Command::Analysis => {
            let snapshot = load_snapshot(repo);
            serde_json::to_value(assembler.analysis_view(&snapshot))?
        }
        Command::Forecast { periods } => {
            let snapshot = load_snapshot(repo);
            let engine = assembler.forecast_engine();
            let forecast = match periods {
                Some(periods) => engine.forecast_periods(&snapshot.sales, *periods),
                None => engine.forecast(&snapshot.sales),
            };
            serde_json::to_value(forecast)?
        }
        Command::Alerts => {
            let inventory = repo.inventory().unwrap_or_else(|e| {
                tracing::warn!("讀取庫存失敗，使用空集合: {}", e);
                Default::default()
            });
            serde_json::to_value(InventoryMonitor::find_low_stock_alerts(&inventory))?
        }
        Command::Init => {
            let snapshot = load_snapshot(repo);
            json!({
                "backend": repo.backend_name(),
                "machines": snapshot.machines.len(),
                "production": snapshot.production.len(),
                "sales": snapshot.sales.len(),
                "inventory": snapshot.inventory.len(),
            })
        }
        Command::AddProduction {
            machine,
            product,
            quantity,
            defects,
        } => {
            let record = repo.append_production(
                NewProductionRecord::new(*machine, *product, *quantity).with_defects(*defects),
            )?;
            serde_json::to_value(record)?
        }
        Command::UpdateMachine {
            id,
            status,
            planned,
            downtime,
        } => {
            let update = MachineUpdate {
                id: *id,
                status: *status,
                planned_production_time: *planned,
                downtime: *downtime,
            };
            repo.update_machines(std::slice::from_ref(&update))?;
            serde_json::to_value(update)?
        }
        Command::UpdateStock {
            category,
            id,
            stock,
            min_stock,
        } => {
            let update = InventoryUpdate {
                category: (*category).into(),
                id: *id,
                stock: *stock,
                min_stock: *min_stock,
            };
            repo.update_inventory(std::slice::from_ref(&update))?;
            serde_json::to_value(update)?
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CategoryArg;
    use plant_store::SqliteRepository;
    use rust_decimal::Decimal;

    fn repo() -> SqliteRepository {
        SqliteRepository::in_memory(true).unwrap()
    }

    #[test]
    fn test_single_machine_oee() {
        let value = execute(
            &Command::Oee { machine: Some(1) },
            &repo(),
            AnalyticsConfig::default(),
        )
        .unwrap();

        assert_eq!(value["machine_id"], json!(1));
        let availability: Decimal = serde_json::from_value(value["availability"].clone()).unwrap();
        assert_eq!(availability, Decimal::new(9063, 2));
        assert!(value["availability"].is_number());
    }

    #[test]
    fn test_unknown_machine_oee_is_zero() {
        let value = execute(
            &Command::Oee { machine: Some(99) },
            &repo(),
            AnalyticsConfig::default(),
        )
        .unwrap();

        let result: plant_core::OeeResult = serde_json::from_value(value).unwrap();
        assert!(result.is_zero());
    }

    #[test]
    fn test_inventory_reports_all_items() {
        let value = execute(&Command::Inventory, &repo(), AnalyticsConfig::default()).unwrap();

        assert_eq!(value["inventory"]["raw_materials"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["inventory"]["finished_products"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["alerts"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["inventory"]["raw_materials"][0]["stock"], json!(15000));
    }

    #[test]
    fn test_dashboard_includes_inventory_and_machines() {
        let value = execute(&Command::Dashboard, &repo(), AnalyticsConfig::default()).unwrap();

        assert_eq!(value["machines"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["inventory"]["finished_products"][0]["name"], json!("HVS A4 Paper"));
    }

    #[test]
    fn test_forecast_periods_override() {
        let value = execute(
            &Command::Forecast { periods: Some(5) },
            &repo(),
            AnalyticsConfig::default(),
        )
        .unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(5));
    }

    #[test]
    fn test_update_stock_raises_alert() {
        let repo = repo();
        execute(
            &Command::UpdateStock {
                category: CategoryArg::Raw,
                id: 1,
                stock: Some(Decimal::from(4000)),
                min_stock: None,
            },
            &repo,
            AnalyticsConfig::default(),
        )
        .unwrap();

        let alerts = execute(&Command::Alerts, &repo, AnalyticsConfig::default()).unwrap();
        assert_eq!(alerts.as_array().map(Vec::len), Some(1));
        assert_eq!(alerts[0]["name"], json!("Wood Pulp"));
    }

    #[test]
    fn test_update_unknown_machine_fails() {
        let result = execute(
            &Command::UpdateMachine {
                id: 77,
                status: None,
                planned: None,
                downtime: Some(Decimal::ONE),
            },
            &repo(),
            AnalyticsConfig::default(),
        );

        assert!(result.is_err());
    }
}
