use crate::error::{AnalyticsError, AnalyticsResult};
use crate::features::analytics::models::metrics::MetricsFilter;
use crate::types::canonical_timestamp;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 上位N件のデフォルト件数
pub const DEFAULT_TOP_N: u32 = 5;

/// 集計期間の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl PeriodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
            PeriodKind::Quarterly => "quarterly",
            PeriodKind::Yearly => "yearly",
        }
    }

    /// 未知の値は MONTHLY として扱う
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!(
                period = %value,
                fallback = %PeriodKind::Monthly,
                "Unknown period kind, falling back to monthly"
            );
            PeriodKind::Monthly
        })
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(PeriodKind::Weekly),
            "monthly" | "month" => Ok(PeriodKind::Monthly),
            "quarterly" | "quarter" => Ok(PeriodKind::Quarterly),
            "yearly" | "year" => Ok(PeriodKind::Yearly),
            _ => Err(AnalyticsError::UnknownPeriodKind(s.to_string())),
        }
    }
}

/// 両端を含む期間 (ミリ秒精度)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "canonical_timestamp")]
    pub start: DateTime<Utc>,
    #[serde(with = "canonical_timestamp")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AnalyticsResult<Self> {
        if end < start {
            return Err(AnalyticsError::InvalidRange(format!(
                "end ({}) must not be before start ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start <= *at && *at <= self.end
    }
}

/// 今期 (to-date) と前期 (完全な期間) の組
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPeriods {
    pub current: DateRange,
    pub previous: DateRange,
}

/// レポート計算リクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsRequest {
    pub period: PeriodKind,
    pub custom_start: Option<DateTime<Utc>>,
    pub custom_end: Option<DateTime<Utc>>,
    pub team_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub top_n: u32,
}

impl Default for AnalyticsRequest {
    fn default() -> Self {
        Self::new(PeriodKind::default())
    }
}

impl AnalyticsRequest {
    pub fn new(period: PeriodKind) -> Self {
        Self {
            period,
            custom_start: None,
            custom_end: None,
            team_id: None,
            category_id: None,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_custom_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.custom_start = Some(start);
        self.custom_end = Some(end);
        self
    }

    pub fn with_team(mut self, team_id: Uuid) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_top_n(mut self, top_n: u32) -> Self {
        self.top_n = top_n;
        self
    }

    /// 開始・終了の両方が指定されている場合のみカスタム期間とみなす
    pub fn custom_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.custom_start, self.custom_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn filter(&self) -> MetricsFilter {
        MetricsFilter {
            team_id: self.team_id,
            category_id: self.category_id,
        }
    }
}
