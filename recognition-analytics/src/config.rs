// src/config.rs
use chrono::{FixedOffset, Offset, Utc};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::features::analytics::models::DEFAULT_TOP_N;
use crate::features::analytics::services::aggregator::{AggregationSettings, FailurePolicy};

pub const DEFAULT_MAX_TOP_N: u32 = 100;
pub const DEFAULT_AGGREGATION_TIMEOUT_MS: u64 = 5_000;

/// オフセットの上限 (分)
const MAX_UTC_OFFSET_MINUTES: i32 = 23 * 60 + 59;

#[derive(Clone, Debug)]
pub struct AnalyticsConfig {
    pub default_top_n: u32,
    pub max_top_n: u32,
    pub aggregation_timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub strict_period_kind: bool,
    pub utc_offset: FixedOffset,
    pub dataset_path: Option<String>,
}

impl AnalyticsConfig {
    pub fn from_env() -> AnalyticsResult<Self> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let default_top_n = parse_var("ANALYTICS_DEFAULT_TOP_N", DEFAULT_TOP_N)?;
        let max_top_n = parse_var("ANALYTICS_MAX_TOP_N", DEFAULT_MAX_TOP_N)?;
        let timeout_ms = parse_var(
            "ANALYTICS_AGGREGATION_TIMEOUT_MS",
            DEFAULT_AGGREGATION_TIMEOUT_MS,
        )?;
        let failure_policy = env::var("ANALYTICS_FAILURE_POLICY")
            .unwrap_or_else(|_| "degrade".to_string())
            .parse::<FailurePolicy>()
            .map_err(AnalyticsError::Config)?;
        let strict_period_kind = parse_var("ANALYTICS_STRICT_PERIOD_KIND", false)?;
        let offset_minutes: i32 = parse_var("ANALYTICS_UTC_OFFSET_MINUTES", 0)?;

        let config = Self {
            default_top_n,
            max_top_n,
            aggregation_timeout: Duration::from_millis(timeout_ms),
            failure_policy,
            strict_period_kind,
            utc_offset: utc_offset_from_minutes(offset_minutes)?,
            dataset_path: env::var("ANALYTICS_DATASET_PATH").ok(),
        };
        config.validate()?;
        Ok(config)
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
            max_top_n: DEFAULT_MAX_TOP_N,
            aggregation_timeout: Duration::from_millis(1_000),
            failure_policy: FailurePolicy::Degrade,
            strict_period_kind: false,
            utc_offset: Utc.fix(),
            dataset_path: None,
        }
    }

    pub fn aggregation_settings(&self) -> AggregationSettings {
        AggregationSettings {
            timeout: self.aggregation_timeout,
            policy: self.failure_policy,
        }
    }

    fn validate(&self) -> AnalyticsResult<()> {
        if self.default_top_n == 0 || self.max_top_n == 0 {
            return Err(AnalyticsError::Config(
                "top N limits must be at least 1".to_string(),
            ));
        }
        if self.default_top_n > self.max_top_n {
            return Err(AnalyticsError::Config(format!(
                "ANALYTICS_DEFAULT_TOP_N ({}) exceeds ANALYTICS_MAX_TOP_N ({})",
                self.default_top_n, self.max_top_n
            )));
        }
        if self.aggregation_timeout.is_zero() {
            return Err(AnalyticsError::Config(
                "ANALYTICS_AGGREGATION_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            aggregation_timeout: Duration::from_millis(DEFAULT_AGGREGATION_TIMEOUT_MS),
            ..Self::for_testing()
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> AnalyticsResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AnalyticsError::Config(format!("Invalid {} value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

pub fn utc_offset_from_minutes(minutes: i32) -> AnalyticsResult<FixedOffset> {
    if minutes.abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(AnalyticsError::Config(format!(
            "UTC offset out of range: {} minutes",
            minutes
        )));
    }
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| AnalyticsError::Config(format!("Invalid UTC offset: {} minutes", minutes)))
}
