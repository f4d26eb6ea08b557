//! SQLite 儲存後端

use plant_core::{
    Inventory, InventoryCategory, InventoryItem, Machine, MachineStatus, ProductionRecord,
    SalesRecord, DEFAULT_PLANNED_PRODUCTION_MINUTES,
};
use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, Connection, Row, Transaction};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::repository::today;
use crate::{
    seed, InventoryUpdate, MachineUpdate, NewProductionRecord, RecordRepository, RepositoryError,
    RepositoryResult,
};

/// 預設 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS machines (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL DEFAULT '',
  status TEXT NOT NULL DEFAULT 'idle',
  planned_production_time TEXT,
  downtime TEXT
);

CREATE TABLE IF NOT EXISTS raw_materials (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  stock TEXT,
  unit TEXT NOT NULL DEFAULT '',
  min_stock TEXT
);

CREATE TABLE IF NOT EXISTS finished_products (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  stock TEXT,
  unit TEXT NOT NULL DEFAULT '',
  min_stock TEXT
);

CREATE TABLE IF NOT EXISTS daily_production (
  record_id INTEGER PRIMARY KEY AUTOINCREMENT,
  date TEXT NOT NULL,
  machine_id INTEGER NOT NULL,
  product_id INTEGER NOT NULL,
  quantity TEXT,
  defects TEXT
);

CREATE INDEX IF NOT EXISTS idx_daily_production_machine
  ON daily_production(machine_id);

CREATE TABLE IF NOT EXISTS sales (
  sale_id INTEGER PRIMARY KEY AUTOINCREMENT,
  date TEXT NOT NULL,
  product_id INTEGER NOT NULL,
  quantity TEXT
);

CREATE INDEX IF NOT EXISTS idx_sales_date
  ON sales(date);
"#;

/// 配置 SQLite 連接的統一 PRAGMA（每個連接各自設定）
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打開 SQLite 連接並應用統一配置
pub fn open_sqlite_connection(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

fn table_for(category: InventoryCategory) -> &'static str {
    match category {
        InventoryCategory::RawMaterial => "raw_materials",
        InventoryCategory::FinishedProduct => "finished_products",
    }
}

/// 讀取數值欄位（TEXT / INTEGER / REAL 皆可，NULL 使用預設值）
fn decimal_column(row: &Row<'_>, idx: usize, default: Decimal) -> rusqlite::Result<Decimal> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(default),
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Real, Box::new(e))),
        ValueRef::Text(bytes) => {
            let raw = std::str::from_utf8(bytes).map_err(rusqlite::Error::Utf8Error)?;
            Decimal::from_str(raw.trim())
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        }
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "decimal".to_string(),
            Type::Blob,
        )),
    }
}

fn status_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<MachineStatus> {
    let raw: String = row.get(idx)?;
    raw.parse::<MachineStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn decimal_param(value: Option<Decimal>) -> Option<String> {
    value.map(|v| v.to_string())
}

/// SQLite 儲存庫
pub struct SqliteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    /// 開啟資料庫檔案（必要時建立目錄與資料表）
    pub fn open(path: impl AsRef<Path>, seed_defaults: bool) -> RepositoryResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = open_sqlite_connection(path)?;
        let repo = Self::from_connection(Arc::new(Mutex::new(conn)), seed_defaults)?;

        tracing::info!("開啟 SQLite 儲存庫: {}", path.display());
        Ok(repo)
    }

    /// 記憶體資料庫
    pub fn in_memory(seed_defaults: bool) -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure_sqlite_connection(&conn)?;
        Self::from_connection(Arc::new(Mutex::new(conn)), seed_defaults)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>, seed_defaults: bool) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_schema()?;
        if seed_defaults {
            repo.seed_empty_tables()?;
        }
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 確保資料表存在
    fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// 為空的資料表寫入預設資料
    fn seed_empty_tables(&self) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        if Self::is_empty(&tx, "machines")? {
            tracing::info!("寫入預設機台資料");
            for machine in seed::machines() {
                tx.execute(
                    "INSERT INTO machines (id, name, status, planned_production_time, downtime)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        machine.id,
                        machine.name,
                        machine.status.as_str(),
                        machine.planned_production_time.to_string(),
                        machine.downtime.to_string(),
                    ],
                )?;
            }
        }

        let inventory = seed::inventory();
        for category in [InventoryCategory::RawMaterial, InventoryCategory::FinishedProduct] {
            let table = table_for(category);
            if Self::is_empty(&tx, table)? {
                tracing::info!("寫入預設庫存資料: {}", table);
                for item in inventory.items(category) {
                    tx.execute(
                        &format!(
                            "INSERT INTO {} (id, name, stock, unit, min_stock) VALUES (?1, ?2, ?3, ?4, ?5)",
                            table
                        ),
                        params![
                            item.id,
                            item.name,
                            item.stock.to_string(),
                            item.unit,
                            item.min_stock.to_string(),
                        ],
                    )?;
                }
            }
        }

        if Self::is_empty(&tx, "daily_production")? {
            tracing::info!("寫入預設生產資料");
            for record in seed::production() {
                Self::insert_production(&tx, &record)?;
            }
        }

        if Self::is_empty(&tx, "sales")? {
            tracing::info!("寫入預設銷售資料");
            for sale in seed::sales() {
                tx.execute(
                    "INSERT INTO sales (date, product_id, quantity) VALUES (?1, ?2, ?3)",
                    params![sale.date, sale.product_id, sale.quantity.to_string()],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn is_empty(tx: &Transaction<'_>, table: &str) -> RepositoryResult<bool> {
        let count: i64 = tx.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(count == 0)
    }

    fn insert_production(conn: &Connection, record: &ProductionRecord) -> RepositoryResult<()> {
        conn.execute(
            "INSERT INTO daily_production (date, machine_id, product_id, quantity, defects)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.date,
                record.machine_id,
                record.product_id,
                record.quantity.to_string(),
                record.defects.to_string(),
            ],
        )?;
        Ok(())
    }

    fn load_items(conn: &Connection, category: InventoryCategory) -> RepositoryResult<Vec<InventoryItem>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, name, stock, unit, min_stock FROM {} ORDER BY id",
            table_for(category)
        ))?;

        let items = stmt
            .query_map([], |row| {
                Ok(InventoryItem {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    stock: decimal_column(row, 2, Decimal::ZERO)?,
                    unit: row.get(3)?,
                    min_stock: decimal_column(row, 4, Decimal::ZERO)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for item in &items {
            item.validate()?;
        }
        Ok(items)
    }
}

impl RecordRepository for SqliteRepository {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn machines(&self) -> RepositoryResult<Vec<Machine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, status, planned_production_time, downtime FROM machines ORDER BY id",
        )?;

        let machines = stmt
            .query_map([], |row| {
                Ok(Machine {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    status: status_column(row, 2)?,
                    planned_production_time: decimal_column(
                        row,
                        3,
                        Decimal::from(DEFAULT_PLANNED_PRODUCTION_MINUTES),
                    )?,
                    downtime: decimal_column(row, 4, Decimal::ZERO)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for machine in &machines {
            machine.validate()?;
        }
        Ok(machines)
    }

    fn production_history(&self) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT date, machine_id, product_id, quantity, defects
             FROM daily_production ORDER BY record_id",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(ProductionRecord {
                    date: row.get(0)?,
                    machine_id: row.get(1)?,
                    product_id: row.get(2)?,
                    quantity: decimal_column(row, 3, Decimal::ZERO)?,
                    defects: decimal_column(row, 4, Decimal::ZERO)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for record in &records {
            record.validate()?;
        }
        Ok(records)
    }

    fn sales_history(&self) -> RepositoryResult<Vec<SalesRecord>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT date, product_id, quantity FROM sales ORDER BY date, sale_id")?;

        let sales = stmt
            .query_map([], |row| {
                Ok(SalesRecord {
                    date: row.get(0)?,
                    product_id: row.get(1)?,
                    quantity: decimal_column(row, 2, Decimal::ZERO)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for sale in &sales {
            sale.validate()?;
        }
        Ok(sales)
    }

    fn inventory(&self) -> RepositoryResult<Inventory> {
        let conn = self.get_conn()?;
        Ok(Inventory::new(
            Self::load_items(&conn, InventoryCategory::RawMaterial)?,
            Self::load_items(&conn, InventoryCategory::FinishedProduct)?,
        ))
    }

    fn update_inventory(&self, updates: &[InventoryUpdate]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        for update in updates {
            update.validate()?;
            let affected = tx.execute(
                &format!(
                    "UPDATE {} SET stock = COALESCE(?1, stock), min_stock = COALESCE(?2, min_stock)
                     WHERE id = ?3",
                    table_for(update.category)
                ),
                params![
                    decimal_param(update.stock),
                    decimal_param(update.min_stock),
                    update.id
                ],
            )?;
            if affected == 0 {
                return Err(RepositoryError::not_found(update.category.as_str(), update.id));
            }
        }

        tx.commit()?;
        tracing::info!("更新庫存 {} 筆", updates.len());
        Ok(())
    }

    fn update_machines(&self, updates: &[MachineUpdate]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        for update in updates {
            update.validate()?;
            let affected = tx.execute(
                "UPDATE machines SET
                   status = COALESCE(?1, status),
                   planned_production_time = COALESCE(?2, planned_production_time),
                   downtime = COALESCE(?3, downtime)
                 WHERE id = ?4",
                params![
                    update.status.map(|s| s.as_str()),
                    decimal_param(update.planned_production_time),
                    decimal_param(update.downtime),
                    update.id
                ],
            )?;
            if affected == 0 {
                return Err(RepositoryError::not_found("machine", update.id));
            }
        }

        tx.commit()?;
        tracing::info!("更新機台 {} 筆", updates.len());
        Ok(())
    }

    fn append_production(&self, record: NewProductionRecord) -> RepositoryResult<ProductionRecord> {
        let record = record.into_record(today())?;

        let conn = self.get_conn()?;
        Self::insert_production(&conn, &record)?;

        tracing::info!(
            "新增生產紀錄: 機台 {} 產品 {} 數量 {}",
            record.machine_id,
            record.product_id,
            record.quantity
        );
        Ok(record)
    }
}
