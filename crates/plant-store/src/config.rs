//! 儲存設定

use std::env;
use std::path::PathBuf;

use crate::{RepositoryError, RepositoryResult};

pub const ENV_BACKEND: &str = "PLANT_STORE_BACKEND";
pub const ENV_DATA_DIR: &str = "PLANT_DATA_DIR";
pub const ENV_DB_PATH: &str = "PLANT_DB_PATH";
pub const ENV_SEED_DEFAULTS: &str = "PLANT_SEED_DEFAULTS";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DB_FILE: &str = "plant.db";

/// 儲存後端
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// JSON 檔案目錄（inventory.json / machines.json / production.json / sales.json）
    JsonFiles { data_dir: PathBuf },
    /// SQLite 資料庫檔案
    Sqlite { path: PathBuf },
}

/// 儲存設定（在建立儲存庫時傳入）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// 缺少資料時是否寫入預設範例資料
    pub seed_defaults: bool,
}

impl StoreConfig {
    pub fn json_files(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::JsonFiles {
                data_dir: data_dir.into(),
            },
            seed_defaults: true,
        }
    }

    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::Sqlite { path: path.into() },
            seed_defaults: true,
        }
    }

    /// 建構器模式：設置是否寫入預設資料
    pub fn with_seed_defaults(mut self, seed: bool) -> Self {
        self.seed_defaults = seed;
        self
    }

    /// 從環境變數讀取設定
    ///
    /// - `PLANT_STORE_BACKEND`: `json`（預設）或 `sqlite`
    /// - `PLANT_DATA_DIR`: JSON 資料目錄（預設 `data`）
    /// - `PLANT_DB_PATH`: SQLite 檔案（預設 `data/plant.db`）
    /// - `PLANT_SEED_DEFAULTS`: `true`（預設）/ `false`
    pub fn from_env() -> RepositoryResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> RepositoryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(ENV_DATA_DIR).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        let backend = match lookup(ENV_BACKEND)
            .unwrap_or_else(|| "json".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => StoreBackend::JsonFiles {
                data_dir: PathBuf::from(&data_dir),
            },
            "sqlite" => StoreBackend::Sqlite {
                path: lookup(ENV_DB_PATH)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(&data_dir).join(DEFAULT_DB_FILE)),
            },
            other => {
                return Err(RepositoryError::Config(format!(
                    "無效的 {}: {}",
                    ENV_BACKEND, other
                )))
            }
        };

        let seed_defaults = match lookup(ENV_SEED_DEFAULTS) {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                RepositoryError::Config(format!("無效的 {}: {}", ENV_SEED_DEFAULTS, raw))
            })?,
        };

        Ok(Self {
            backend,
            seed_defaults,
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::json_files(DEFAULT_DATA_DIR)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
