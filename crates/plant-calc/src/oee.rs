//! OEE 計算

use plant_core::{AnalyticsConfig, Machine, MachineOee, OeeResult, ProductionRecord};
use rayon::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const MINUTES_PER_HOUR: i64 = 60;

/// 單機台的生產彙總
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductionTotals {
    pub records: usize,
    pub quantity: Decimal,
    pub defects: Decimal,
    /// 良品數（產量 - 不良數）
    pub good: Decimal,
}

impl ProductionTotals {
    /// 彙總指定機台的生產紀錄，累加溢位時回傳 `None`
    pub fn for_machine(machine_id: i64, production: &[ProductionRecord]) -> Option<Self> {
        production
            .iter()
            .filter(|p| p.machine_id == machine_id)
            .try_fold(Self::default(), |acc, p| {
                Some(Self {
                    records: acc.records + 1,
                    quantity: acc.quantity.checked_add(p.quantity)?,
                    defects: acc.defects.checked_add(p.defects)?,
                    good: acc.good.checked_add(p.good_quantity()?)?,
                })
            })
    }
}

/// OEE 計算器
#[derive(Debug, Clone, Default)]
pub struct OeeCalculator {
    config: AnalyticsConfig,
}

impl OeeCalculator {
    /// 創建新的 OEE 計算器
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// 計算單一機台的 OEE
    ///
    /// 沒有該機台的生產紀錄，或 `machine` 為空（或 ID 不符）時回傳零值。
    /// 停機時間超過計劃時間時可用率為負值，不做截斷。
    /// 數值溢位時記錄警告並回傳零值。
    pub fn compute(
        &self,
        machine_id: i64,
        production: &[ProductionRecord],
        machine: Option<&Machine>,
    ) -> OeeResult {
        let totals = match ProductionTotals::for_machine(machine_id, production) {
            Some(totals) => totals,
            None => {
                tracing::warn!("機台 {} 生產數量累加溢位", machine_id);
                return OeeResult::zero();
            }
        };
        if totals.records == 0 {
            tracing::debug!("機台 {} 無生產紀錄", machine_id);
            return OeeResult::zero();
        }

        let machine = match machine.filter(|m| m.id == machine_id) {
            Some(machine) => machine,
            None => {
                tracing::debug!("找不到機台 {}", machine_id);
                return OeeResult::zero();
            }
        };

        match self.checked_compute(machine, &totals) {
            Some(result) => result,
            None => {
                tracing::warn!("機台 {} OEE 計算溢位", machine_id);
                OeeResult::zero()
            }
        }
    }

    /// 從機台清單中查找機台後計算 OEE
    pub fn compute_for(
        &self,
        machine_id: i64,
        production: &[ProductionRecord],
        machines: &[Machine],
    ) -> OeeResult {
        let machine = machines.iter().find(|m| m.id == machine_id);
        self.compute(machine_id, production, machine)
    }

    /// 計算所有機台的 OEE（保持機台順序）
    pub fn compute_all(&self, machines: &[Machine], production: &[ProductionRecord]) -> Vec<MachineOee> {
        tracing::info!(
            "開始 OEE 計算：機台 {} 台，生產紀錄 {} 筆",
            machines.len(),
            production.len()
        );

        machines
            .par_iter()
            .map(|machine| MachineOee {
                machine_id: machine.id,
                name: machine.name.clone(),
                status: machine.status,
                result: self.compute(machine.id, production, Some(machine)),
            })
            .collect()
    }

    fn checked_compute(&self, machine: &Machine, totals: &ProductionTotals) -> Option<OeeResult> {
        let availability = self.availability(machine)?;
        let performance = self.performance(machine, totals.quantity)?;
        let quality = Self::quality(totals)?;
        let oee = availability
            .checked_mul(performance)?
            .checked_mul(quality)?
            .checked_div(HUNDRED * HUNDRED)?;

        tracing::debug!(
            "機台 {} OEE: A={} P={} Q={} OEE={}",
            machine.id,
            availability,
            performance,
            quality,
            oee
        );

        Some(OeeResult {
            availability: self.round(availability),
            performance: self.round(performance),
            quality: self.round(quality),
            oee: self.round(oee),
        })
    }

    /// 可用率 = (計劃時間 - 停機時間) / 計劃時間 × 100
    fn availability(&self, machine: &Machine) -> Option<Decimal> {
        if machine.planned_production_time.is_zero() {
            return Some(Decimal::ZERO);
        }
        percent(
            machine.planned_production_time.checked_sub(machine.downtime)?,
            machine.planned_production_time,
        )
    }

    /// 表現性 = 總產量 / (理想速率 × 運轉小時) × 100，上限 100
    fn performance(&self, machine: &Machine, total_quantity: Decimal) -> Option<Decimal> {
        let operating_time = machine.planned_production_time.checked_sub(machine.downtime)?;
        if operating_time <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }

        let capacity = self
            .config
            .ideal_rate_per_hour
            .checked_mul(operating_time)?
            .checked_div(Decimal::from(MINUTES_PER_HOUR))?;
        if capacity <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }

        percent(total_quantity, capacity).map(|p| p.min(HUNDRED))
    }

    /// 良率 = 良品數 / 總產量 × 100
    fn quality(totals: &ProductionTotals) -> Option<Decimal> {
        if totals.quantity <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }
        percent(totals.good, totals.quantity)
    }

    fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(
            self.config.percent_scale,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }
}

/// numerator / denominator × 100
fn percent(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator.checked_div(denominator)?.checked_mul(HUNDRED)
}
