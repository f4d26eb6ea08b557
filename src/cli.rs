//! plant-report 命令列參數

use clap::{Parser, Subcommand, ValueEnum};
use plant_core::{AnalyticsConfig, InventoryCategory, MachineStatus};
use plant_store::{RepositoryResult, StoreBackend, StoreConfig};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// 製造現場分析報表
#[derive(Debug, Parser)]
#[command(
    name = "plant-report",
    version,
    about = "OEE, sales forecast and low-stock alerts for a manufacturing plant"
)]
pub struct Cli {
    /// 儲存後端（覆寫 PLANT_STORE_BACKEND）
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendArg>,

    /// JSON 資料目錄（覆寫 PLANT_DATA_DIR）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// SQLite 檔案路徑（覆寫 PLANT_DB_PATH）
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// 不寫入預設資料
    #[arg(long, global = true)]
    pub no_seed: bool,

    /// 理想產出速率（件/小時）
    #[arg(long, global = true)]
    pub ideal_rate: Option<Decimal>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Raw,
    Finished,
}

impl From<CategoryArg> for InventoryCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Raw => InventoryCategory::RawMaterial,
            CategoryArg::Finished => InventoryCategory::FinishedProduct,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 儀表板：全部機台 OEE、低庫存警示與銷售預測
    Dashboard,

    /// 機台 OEE
    Oee {
        /// 只計算指定機台
        #[arg(long)]
        machine: Option<i64>,
    },

    /// 庫存報表：全部品項與低庫存警示
    Inventory,

    /// 生產報表：機台、生產紀錄與 OEE
    Production,

    /// 銷售分析：銷售序列與預測
    Analysis,

    /// 銷售預測
    Forecast {
        /// 預測期數
        #[arg(long)]
        periods: Option<u32>,
    },

    /// 低庫存警示
    Alerts,

    /// 建立資料檔案 / 資料表並寫入預設資料
    Init,

    /// 以今天日期新增生產紀錄
    AddProduction {
        #[arg(long)]
        machine: i64,
        #[arg(long)]
        product: i64,
        #[arg(long)]
        quantity: Decimal,
        #[arg(long, default_value_t = Decimal::ZERO)]
        defects: Decimal,
    },

    /// 更新機台狀態或時間
    UpdateMachine {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        status: Option<MachineStatus>,
        #[arg(long)]
        planned: Option<Decimal>,
        #[arg(long)]
        downtime: Option<Decimal>,
    },

    /// 更新庫存量或安全庫存
    UpdateStock {
        #[arg(long, value_enum)]
        category: CategoryArg,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        stock: Option<Decimal>,
        #[arg(long)]
        min_stock: Option<Decimal>,
    },
}

impl Cli {
    /// 合併環境設定與命令列參數
    pub fn store_config(&self) -> RepositoryResult<StoreConfig> {
        let mut config = StoreConfig::from_env()?;

        let data_dir = self.data_dir.clone();
        let db_path = self.db_path.clone();

        config.backend = match (self.backend, config.backend) {
            (Some(BackendArg::Json), _) => StoreBackend::JsonFiles {
                data_dir: data_dir.unwrap_or_else(|| PathBuf::from(plant_store::config::DEFAULT_DATA_DIR)),
            },
            (Some(BackendArg::Sqlite), _) => StoreBackend::Sqlite {
                path: db_path.unwrap_or_else(|| default_db_path(data_dir)),
            },
            (None, StoreBackend::JsonFiles { data_dir: env_dir }) => StoreBackend::JsonFiles {
                data_dir: data_dir.unwrap_or(env_dir),
            },
            (None, StoreBackend::Sqlite { path }) => StoreBackend::Sqlite {
                path: db_path.unwrap_or(path),
            },
        };

        if self.no_seed {
            config.seed_defaults = false;
        }
        Ok(config)
    }

    pub fn analytics_config(&self) -> AnalyticsConfig {
        let config = AnalyticsConfig::default();
        match self.ideal_rate {
            Some(rate) => config.with_ideal_rate_per_hour(rate),
            None => config,
        }
    }
}

fn default_db_path(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir
        .unwrap_or_else(|| PathBuf::from(plant_store::config::DEFAULT_DATA_DIR))
        .join(plant_store::config::DEFAULT_DB_FILE)
}
