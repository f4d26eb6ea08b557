//! JSON 檔案儲存後端

use plant_core::{Inventory, Machine, ProductionRecord, SalesRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::repository::today;
use crate::{
    seed, InventoryUpdate, MachineUpdate, NewProductionRecord, RecordRepository, RepositoryError,
    RepositoryResult,
};

pub const INVENTORY_FILE: &str = "inventory.json";
pub const MACHINES_FILE: &str = "machines.json";
pub const PRODUCTION_FILE: &str = "production.json";
pub const SALES_FILE: &str = "sales.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct MachinesFile {
    #[serde(default)]
    machines: Vec<Machine>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProductionFile {
    #[serde(default)]
    daily_production: Vec<ProductionRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SalesFile {
    #[serde(default)]
    sales: Vec<SalesRecord>,
}

/// JSON 檔案儲存庫
///
/// 檔案不存在視為空集合；寫入經由暫存檔再改名，並以互斥鎖串行化。
pub struct JsonFileRepository {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// 開啟資料目錄（不存在則建立）
    pub fn open(data_dir: impl Into<PathBuf>, seed_defaults: bool) -> RepositoryResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let repo = Self {
            data_dir,
            write_lock: Mutex::new(()),
        };

        if seed_defaults {
            repo.seed_missing_files()?;
        }

        tracing::info!("開啟 JSON 儲存庫: {}", repo.data_dir.display());
        Ok(repo)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 為缺少的檔案寫入預設資料
    fn seed_missing_files(&self) -> RepositoryResult<()> {
        let _guard = self.lock()?;

        if !self.path(INVENTORY_FILE).exists() {
            tracing::info!("寫入預設庫存資料");
            self.write_file(INVENTORY_FILE, &seed::inventory())?;
        }
        if !self.path(MACHINES_FILE).exists() {
            tracing::info!("寫入預設機台資料");
            self.write_file(MACHINES_FILE, &MachinesFile { machines: seed::machines() })?;
        }
        if !self.path(PRODUCTION_FILE).exists() {
            tracing::info!("寫入預設生產資料");
            self.write_file(
                PRODUCTION_FILE,
                &ProductionFile {
                    daily_production: seed::production(),
                },
            )?;
        }
        if !self.path(SALES_FILE).exists() {
            tracing::info!("寫入預設銷售資料");
            self.write_file(SALES_FILE, &SalesFile { sales: seed::sales() })?;
        }

        Ok(())
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn read_file<T>(&self, file_name: &str) -> RepositoryResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(file_name);
        if !path.exists() {
            tracing::debug!("檔案不存在，視為空集合: {}", path.display());
            return Ok(T::default());
        }

        let reader = BufReader::new(File::open(&path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn write_file<T: Serialize>(&self, file_name: &str, value: &T) -> RepositoryResult<()> {
        let path = self.path(file_name);
        let tmp_path = path.with_extension("json.tmp");

        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn load_machines(&self) -> RepositoryResult<Vec<Machine>> {
        let file: MachinesFile = self.read_file(MACHINES_FILE)?;
        for machine in &file.machines {
            machine.validate()?;
        }
        Ok(file.machines)
    }

    fn load_production(&self) -> RepositoryResult<Vec<ProductionRecord>> {
        let file: ProductionFile = self.read_file(PRODUCTION_FILE)?;
        for record in &file.daily_production {
            record.validate()?;
        }
        Ok(file.daily_production)
    }

    fn load_inventory(&self) -> RepositoryResult<Inventory> {
        let inventory: Inventory = self.read_file(INVENTORY_FILE)?;
        for (_, item) in inventory.iter() {
            item.validate()?;
        }
        Ok(inventory)
    }
}

impl RecordRepository for JsonFileRepository {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    fn machines(&self) -> RepositoryResult<Vec<Machine>> {
        self.load_machines()
    }

    fn production_history(&self) -> RepositoryResult<Vec<ProductionRecord>> {
        self.load_production()
    }

    fn sales_history(&self) -> RepositoryResult<Vec<SalesRecord>> {
        let mut file: SalesFile = self.read_file(SALES_FILE)?;
        for sale in &file.sales {
            sale.validate()?;
        }
        file.sales.sort_by_key(|s| s.date);
        Ok(file.sales)
    }

    fn inventory(&self) -> RepositoryResult<Inventory> {
        self.load_inventory()
    }

    fn update_inventory(&self, updates: &[InventoryUpdate]) -> RepositoryResult<()> {
        let _guard = self.lock()?;
        let mut inventory = self.load_inventory()?;

        for update in updates {
            update.validate()?;
            let item = inventory
                .items_mut(update.category)
                .iter_mut()
                .find(|item| item.id == update.id)
                .ok_or_else(|| RepositoryError::not_found(update.category.as_str(), update.id))?;
            update.apply(item);
        }

        self.write_file(INVENTORY_FILE, &inventory)?;
        tracing::info!("更新庫存 {} 筆", updates.len());
        Ok(())
    }

    fn update_machines(&self, updates: &[MachineUpdate]) -> RepositoryResult<()> {
        let _guard = self.lock()?;
        let mut machines = self.load_machines()?;

        for update in updates {
            update.validate()?;
            let machine = machines
                .iter_mut()
                .find(|m| m.id == update.id)
                .ok_or_else(|| RepositoryError::not_found("machine", update.id))?;
            update.apply(machine);
        }

        self.write_file(MACHINES_FILE, &MachinesFile { machines })?;
        tracing::info!("更新機台 {} 筆", updates.len());
        Ok(())
    }

    fn append_production(&self, record: NewProductionRecord) -> RepositoryResult<ProductionRecord> {
        let record = record.into_record(today())?;

        let _guard = self.lock()?;
        let mut daily_production = self.load_production()?;
        daily_production.push(record.clone());
        self.write_file(PRODUCTION_FILE, &ProductionFile { daily_production })?;

        tracing::info!(
            "新增生產紀錄: 機台 {} 產品 {} 數量 {}",
            record.machine_id,
            record.product_id,
            record.quantity
        );
        Ok(record)
    }
}
