use serde::{Deserialize, Serialize};

use crate::features::analytics::models::{DayActivity, MetricKind, RankedEntity};

/// ダッシュボード向けの分析レポート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub top_individuals: Vec<RankedEntity>,
    pub top_teams: Vec<RankedEntity>,
    pub total_count: u64,
    pub avg_per_person: f64,
    pub previous_total_count: u64,
    pub previous_avg_per_person: f64,
    pub total_percentage_change: f64,
    pub avg_percentage_change: f64,
    pub most_active_day: DayActivity,
    pub period_start: String,
    pub period_end: String,
    pub previous_period_start: String,
    pub previous_period_end: String,
    /// 失敗してデフォルト値で埋めた指標
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_metrics: Vec<MetricKind>,
}

impl AnalyticsReport {
    pub fn is_degraded(&self) -> bool {
        !self.degraded_metrics.is_empty()
    }
}
