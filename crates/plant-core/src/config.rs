//! 分析參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 理想產出速率（件/小時）
pub const DEFAULT_IDEAL_RATE_PER_HOUR: u32 = 1000;

/// 預設預測期數
pub const DEFAULT_FORECAST_PERIODS: u32 = 3;

/// 分析參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// 理想產出速率（件/小時），表現性的分母
    pub ideal_rate_per_hour: Decimal,

    /// 預測期數
    pub forecast_periods: u32,

    /// 百分比小數位數
    pub percent_scale: u32,
}

impl AnalyticsConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            ideal_rate_per_hour: Decimal::from(DEFAULT_IDEAL_RATE_PER_HOUR),
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            percent_scale: 2,
        }
    }

    /// 建構器模式：設置理想產出速率
    pub fn with_ideal_rate_per_hour(mut self, rate: Decimal) -> Self {
        self.ideal_rate_per_hour = rate;
        self
    }

    /// 建構器模式：設置預測期數
    pub fn with_forecast_periods(mut self, periods: u32) -> Self {
        self.forecast_periods = periods;
        self
    }

    /// 建構器模式：設置百分比小數位數
    pub fn with_percent_scale(mut self, scale: u32) -> Self {
        self.percent_scale = scale;
        self
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyticsConfig::default();

        assert_eq!(config.ideal_rate_per_hour, Decimal::from(1000));
        assert_eq!(config.forecast_periods, 3);
        assert_eq!(config.percent_scale, 2);
    }

    #[test]
    fn test_config_builder() {
        let config = AnalyticsConfig::new()
            .with_ideal_rate_per_hour(Decimal::from(1200))
            .with_forecast_periods(6);

        assert_eq!(config.ideal_rate_per_hour, Decimal::from(1200));
        assert_eq!(config.forecast_periods, 6);
    }
}
