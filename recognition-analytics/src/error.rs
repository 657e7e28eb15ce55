// recognition-analytics/src/error.rs

use crate::features::analytics::models::metrics::MetricKind;
use thiserror::Error;
use validator::ValidationErrors;

/// MetricsStore 境界で発生するエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataStoreError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query timed out after {0}ms")]
    Timeout(u64),
}

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Unknown period kind: {0}")]
    UnknownPeriodKind(String),

    #[error("Aggregation incomplete: {metric} failed ({source})")]
    PartialAggregation {
        metric: MetricKind,
        source: DataStoreError,
    },

    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalyticsError {
    /// 外部レイヤー向けの安定したエラーコード
    pub fn error_type(&self) -> &'static str {
        match self {
            AnalyticsError::InvalidRange(_) => "invalid_range",
            AnalyticsError::UnknownPeriodKind(_) => "unknown_period_kind",
            AnalyticsError::PartialAggregation { .. } => "partial_aggregation",
            AnalyticsError::Validation(_) => "validation_errors",
            AnalyticsError::Config(_) => "config_error",
        }
    }

    /// リクエスト側の入力に起因するエラーかどうか
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InvalidRange(_)
                | AnalyticsError::UnknownPeriodKind(_)
                | AnalyticsError::Validation(_)
        )
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
