//! 機台模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ensure_non_negative, PlantError};

/// 預設計劃生產時間（分鐘，一個 8 小時班次）
pub const DEFAULT_PLANNED_PRODUCTION_MINUTES: u32 = 480;

fn default_planned_production_time() -> Decimal {
    Decimal::from(DEFAULT_PLANNED_PRODUCTION_MINUTES)
}

/// 機台狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    /// 運轉中
    Running,
    /// 待機
    #[default]
    Idle,
    /// 保養中
    Maintenance,
    /// 故障
    Breakdown,
    /// 停機
    Offline,
}

impl MachineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineStatus::Running => "running",
            MachineStatus::Idle => "idle",
            MachineStatus::Maintenance => "maintenance",
            MachineStatus::Breakdown => "breakdown",
            MachineStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineStatus {
    type Err = PlantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(MachineStatus::Running),
            "idle" => Ok(MachineStatus::Idle),
            "maintenance" => Ok(MachineStatus::Maintenance),
            "breakdown" => Ok(MachineStatus::Breakdown),
            "offline" => Ok(MachineStatus::Offline),
            other => Err(PlantError::UnknownStatus(other.to_string())),
        }
    }
}

/// 機台
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// 機台ID
    pub id: i64,

    /// 機台名稱
    #[serde(default)]
    pub name: String,

    /// 狀態
    #[serde(default)]
    pub status: MachineStatus,

    /// 計劃生產時間（分鐘）
    #[serde(default = "default_planned_production_time")]
    pub planned_production_time: Decimal,

    /// 停機時間（分鐘）
    #[serde(default)]
    pub downtime: Decimal,
}

impl Machine {
    /// 創建新的機台（預設計劃時間 480 分鐘、無停機）
    pub fn new(id: i64, name: impl Into<String>, status: MachineStatus) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            planned_production_time: default_planned_production_time(),
            downtime: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置計劃生產時間
    pub fn with_planned_production_time(mut self, minutes: Decimal) -> Self {
        self.planned_production_time = minutes;
        self
    }

    /// 建構器模式：設置停機時間
    pub fn with_downtime(mut self, minutes: Decimal) -> Self {
        self.downtime = minutes;
        self
    }

    /// 實際運轉時間（計劃時間 - 停機時間，可能為負）
    pub fn operating_time(&self) -> Decimal {
        self.planned_production_time - self.downtime
    }

    /// 邊界驗證
    ///
    /// 停機時間超過計劃時間不視為錯誤。
    pub fn validate(&self) -> crate::Result<()> {
        ensure_non_negative("planned_production_time", self.planned_production_time)?;
        ensure_non_negative("downtime", self.downtime)?;
        Ok(())
    }
}
