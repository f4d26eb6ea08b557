//! 需求預測（線性迴歸）

use plant_core::{AnalyticsConfig, ForecastPoint, SalesRecord};
use rust_decimal::{Decimal, RoundingStrategy};

/// 最小平方法擬合出的線性趨勢
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: Decimal,
    pub intercept: Decimal,
    /// 樣本數
    pub n: usize,
}

impl LinearTrend {
    /// 趨勢在指定時間索引的值（未取整），溢位時回傳 `None`
    pub fn value_at(&self, index: u64) -> Option<Decimal> {
        self.slope
            .checked_mul(Decimal::from(index))
            .and_then(|offset| self.intercept.checked_add(offset))
    }

    /// 水平趨勢（slope = 0）
    pub fn flat(level: Decimal, n: usize) -> Self {
        Self {
            slope: Decimal::ZERO,
            intercept: level,
            n,
        }
    }
}

/// 需求預測引擎
///
/// 以輸入順序為時間軸 `x[i] = i`，不處理季節性與離群值。
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: AnalyticsConfig,
}

impl ForecastEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// 依配置的預測期數進行預測
    pub fn forecast(&self, sales: &[SalesRecord]) -> Vec<ForecastPoint> {
        self.forecast_periods(sales, self.config.forecast_periods)
    }

    /// 預測未來 `periods` 期
    ///
    /// 預測值以銀行家捨入法（四捨六入五成雙）取整數，負值不截斷。
    pub fn forecast_periods(&self, sales: &[SalesRecord], periods: u32) -> Vec<ForecastPoint> {
        let quantities: Vec<Decimal> = sales.iter().map(|s| s.quantity).collect();

        let trend = match Self::fit(&quantities) {
            Some(trend) => trend,
            None => {
                tracing::debug!("無銷售紀錄，略過預測");
                return Vec::new();
            }
        };

        tracing::debug!(
            "線性趨勢: n={}, slope={}, intercept={}",
            trend.n,
            trend.slope,
            trend.intercept
        );

        let n = trend.n as u64;
        (0..periods)
            .map(|offset| {
                let index = n + u64::from(offset);
                let value = trend
                    .value_at(index)
                    .unwrap_or_else(|| {
                        tracing::warn!("預測值溢位（索引 {}），改用截距", index);
                        trend.intercept
                    })
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
                ForecastPoint::new(offset + 1, value)
            })
            .collect()
    }

    /// 普通最小平方法擬合
    ///
    /// slope = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)，分母為 0 時 slope = 0。
    /// 以置中的 x 計算（分子、分母同除以 n），累加量級為 n³ 而非 n⁴。
    /// 任何中間值溢位時退化為水平趨勢（slope = 0，截距為平均值）。
    pub fn fit(quantities: &[Decimal]) -> Option<LinearTrend> {
        if quantities.is_empty() {
            return None;
        }

        let trend = Self::checked_fit(quantities).unwrap_or_else(|| {
            tracing::warn!("線性迴歸溢位（n={}），改用水平趨勢", quantities.len());
            LinearTrend::flat(Self::running_mean(quantities), quantities.len())
        });
        Some(trend)
    }

    /// slope = Σ(x−x̄)·y / Σ(x−x̄)²，intercept = (Σy − slope·Σx) / n
    fn checked_fit(quantities: &[Decimal]) -> Option<LinearTrend> {
        let n = Decimal::from(quantities.len() as u64);
        let sum_x = Decimal::from(quantities.len() as u64 - 1)
            .checked_mul(n)?
            .checked_div(Decimal::TWO)?;
        let mean_x = sum_x.checked_div(n)?;

        let mut sum_y = Decimal::ZERO;
        let mut sum_dxy = Decimal::ZERO;
        let mut sum_dx2 = Decimal::ZERO;

        for (i, &y) in quantities.iter().enumerate() {
            let dx = Decimal::from(i as u64).checked_sub(mean_x)?;
            sum_y = sum_y.checked_add(y)?;
            sum_dxy = sum_dxy.checked_add(dx.checked_mul(y)?)?;
            sum_dx2 = sum_dx2.checked_add(dx.checked_mul(dx)?)?;
        }

        let slope = if sum_dx2.is_zero() {
            Decimal::ZERO
        } else {
            sum_dxy.checked_div(sum_dx2)?
        };
        let intercept = sum_y.checked_sub(slope.checked_mul(sum_x)?)?.checked_div(n)?;

        Some(LinearTrend {
            slope,
            intercept,
            n: quantities.len(),
        })
    }

    /// 逐步平均（不累加總和），溢位時回傳 0
    fn running_mean(quantities: &[Decimal]) -> Decimal {
        quantities
            .iter()
            .enumerate()
            .try_fold(Decimal::ZERO, |mean, (i, &y)| {
                let step = y.checked_sub(mean)?.checked_div(Decimal::from(i as u64 + 1))?;
                mean.checked_add(step)
            })
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use rstest::rstest;

    fn sales(quantities: &[i64]) -> Vec<SalesRecord> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| SalesRecord::new(start + Duration::days(30 * i as i64), 1, Decimal::from(q)))
            .collect()
    }

    fn sales_from(quantities: &[Decimal]) -> Vec<SalesRecord> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| SalesRecord::new(start + Duration::days(i as i64), 1, q))
            .collect()
    }

    fn values(points: &[ForecastPoint]) -> Vec<Decimal> {
        points.iter().map(|p| p.forecast).collect()
    }

    #[test]
    fn test_empty_history() {
        let engine = ForecastEngine::default();
        assert!(engine.forecast(&[]).is_empty());
        assert!(ForecastEngine::fit(&[]).is_none());
    }

    #[test]
    fn test_constant_series() {
        let engine = ForecastEngine::default();
        let points = engine.forecast(&sales(&[100, 100, 100, 100]));

        assert_eq!(points.len(), 3);
        assert_eq!(values(&points), vec![Decimal::from(100); 3]);
    }

    #[test]
    fn test_linear_series() {
        let trend = ForecastEngine::fit(&[Decimal::from(100), Decimal::from(200), Decimal::from(300)])
            .unwrap();
        assert_eq!(trend.slope, Decimal::from(100));
        assert_eq!(trend.intercept, Decimal::from(100));

        let engine = ForecastEngine::default();
        let points = engine.forecast(&sales(&[100, 200, 300]));

        assert_eq!(points[0], ForecastPoint::new(1, Decimal::from(400)));
        assert_eq!(points[1], ForecastPoint::new(2, Decimal::from(500)));
        assert_eq!(points[2], ForecastPoint::new(3, Decimal::from(600)));
    }

    #[test]
    fn test_single_point_is_flat() {
        let engine = ForecastEngine::default();
        let points = engine.forecast_periods(&sales(&[250]), 2);

        assert_eq!(values(&points), vec![Decimal::from(250), Decimal::from(250)]);
    }

    #[test]
    fn test_negative_forecast_not_clamped() {
        let engine = ForecastEngine::default();
        let points = engine.forecast(&sales(&[300, 200, 100]));

        assert_eq!(
            values(&points),
            vec![Decimal::ZERO, Decimal::from(-100), Decimal::from(-200)]
        );
    }

    #[test]
    fn test_midpoint_rounds_to_even() {
        // slope = 0.4, intercept = 0.9：索引 4 → 2.5，索引 5 → 2.9，索引 6 → 3.3
        let engine = ForecastEngine::default();
        let points = engine.forecast(&sales(&[1, 1, 2, 2]));

        assert_eq!(
            values(&points),
            vec![Decimal::from(2), Decimal::from(3), Decimal::from(3)]
        );
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(12)]
    fn test_period_labels(#[case] periods: u32) {
        let engine = ForecastEngine::default();
        let points = engine.forecast_periods(&sales(&[10, 20, 30, 45]), periods);

        assert_eq!(points.len(), periods as usize);
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.period, i as u32 + 1);
        }
    }

    #[test]
    fn test_seed_history_trend() {
        // 每月成長 1000 的銷售序列
        let history: Vec<i64> = (0..12).map(|i| 12000 + i * 1000).collect();
        let engine = ForecastEngine::default();

        assert_eq!(
            values(&engine.forecast(&sales(&history))),
            vec![Decimal::from(24000), Decimal::from(25000), Decimal::from(26000)]
        );
    }

    #[test]
    fn test_large_quantities_fit_without_overflow() {
        let level = Decimal::from_str_exact("20000000000000000000000000000").unwrap();
        let trend = ForecastEngine::fit(&[level; 3]).unwrap();

        assert_eq!(trend.slope, Decimal::ZERO);
        assert_eq!(trend.intercept, level);
    }

    #[test]
    fn test_overflow_degrades_to_flat_trend() {
        // 中間累加超出 Decimal 範圍
        let huge = Decimal::from_str_exact("70000000000000000000000000000").unwrap();
        let history = [huge, Decimal::ZERO];

        let trend = ForecastEngine::fit(&history).unwrap();
        assert_eq!(trend.slope, Decimal::ZERO);
        assert_eq!(trend.intercept, Decimal::from_str_exact("35000000000000000000000000000").unwrap());

        let engine = ForecastEngine::default();
        let points = engine.forecast_periods(&sales_from(&history), 2);
        assert_eq!(values(&points), vec![trend.intercept; 2]);
    }

    #[test]
    fn test_long_history_stays_exact() {
        let history = vec![Decimal::from(1000); 200_000];
        let trend = ForecastEngine::fit(&history).unwrap();

        assert_eq!(trend.slope, Decimal::ZERO);
        assert_eq!(trend.intercept, Decimal::from(1000));
        assert_eq!(trend.value_at(200_000), Some(Decimal::from(1000)));
    }

    #[test]
    fn test_value_at_overflow_is_none() {
        let trend = LinearTrend {
            slope: Decimal::MAX,
            intercept: Decimal::ZERO,
            n: 2,
        };
        assert_eq!(trend.value_at(2), None);
        assert_eq!(trend.value_at(0), Some(Decimal::ZERO));
    }

    proptest! {
        #[test]
        fn prop_constant_series_is_flat(level in 0i64..1_000_000, n in 1usize..40) {
            let engine = ForecastEngine::default();
            let history = sales(&vec![level; n]);

            let first = engine.forecast(&history);
            prop_assert_eq!(&first, &engine.forecast(&history));
            for point in first {
                prop_assert_eq!(point.forecast, Decimal::from(level));
            }
        }
    }
}
