// recognition-analytics/src/features/analytics/services/aggregator.rs

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::error::{AnalyticsError, AnalyticsResult, DataStoreError};
use crate::features::analytics::models::{MetricKind, MetricsFilter, RawMetrics, ResolvedPeriods};
use crate::features::analytics::repositories::{MetricsStore, StoreResult};
use crate::log_with_context;

/// サブクエリ失敗時の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// 失敗した指標をデフォルト値 (0, 空, N/A) に置き換えてレポートを返す
    #[default]
    Degrade,
    /// 最初の失敗で残りのサブクエリを中断し、リクエストを失敗させる
    Strict,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "degrade" => Ok(FailurePolicy::Degrade),
            "strict" => Ok(FailurePolicy::Strict),
            other => Err(format!("Invalid failure policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AggregationSettings {
    /// 全サブクエリに共通の締め切り
    pub timeout: Duration,
    pub policy: FailurePolicy,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5_000),
            policy: FailurePolicy::Degrade,
        }
    }
}

#[derive(Debug)]
struct MetricFailure {
    metric: MetricKind,
    source: DataStoreError,
}

/// 1リクエスト分のサブクエリを並行発行し、すべての完了を待つ
pub struct MetricsAggregator {
    store: Arc<dyn MetricsStore>,
    settings: AggregationSettings,
}

impl MetricsAggregator {
    pub fn new(store: Arc<dyn MetricsStore>, settings: AggregationSettings) -> Self {
        Self { store, settings }
    }

    pub async fn aggregate(
        &self,
        periods: &ResolvedPeriods,
        filter: &MetricsFilter,
        top_n: usize,
    ) -> AnalyticsResult<RawMetrics> {
        let started = Instant::now();
        let deadline = started + self.settings.timeout;
        let timeout_ms = self.settings.timeout.as_millis() as u64;
        let store = self.store.as_ref();

        let top_individuals = guarded(
            MetricKind::TopIndividuals,
            deadline,
            timeout_ms,
            store.top_receivers(&periods.current, top_n, filter),
        );
        // チームランキングはチーム自身では絞り込まない
        let top_teams = guarded(
            MetricKind::TopTeams,
            deadline,
            timeout_ms,
            store.top_teams(&periods.current, top_n, filter.category_id),
        );
        let total_count = guarded(
            MetricKind::TotalCount,
            deadline,
            timeout_ms,
            store.count_in_range(&periods.current, filter),
        );
        let total_users = guarded(
            MetricKind::TotalUsers,
            deadline,
            timeout_ms,
            store.total_users(filter.team_id),
        );
        let most_active_day = guarded(
            MetricKind::MostActiveDay,
            deadline,
            timeout_ms,
            store.most_active_day(&periods.current, filter),
        );
        let previous_total_count = guarded(
            MetricKind::PreviousTotalCount,
            deadline,
            timeout_ms,
            store.count_in_range(&periods.previous, filter),
        );

        let metrics = match self.settings.policy {
            FailurePolicy::Degrade => {
                let (
                    top_individuals,
                    top_teams,
                    total_count,
                    total_users,
                    most_active_day,
                    previous_total_count,
                ) = tokio::join!(
                    top_individuals,
                    top_teams,
                    total_count,
                    total_users,
                    most_active_day,
                    previous_total_count
                );

                let mut degraded = Vec::new();
                RawMetrics {
                    top_individuals: settle(top_individuals, &mut degraded),
                    top_teams: settle(top_teams, &mut degraded),
                    total_count: settle(total_count, &mut degraded),
                    total_users: settle(total_users, &mut degraded),
                    most_active_day: settle(most_active_day, &mut degraded),
                    previous_total_count: settle(previous_total_count, &mut degraded),
                    degraded,
                }
            }
            FailurePolicy::Strict => {
                // try_join! は最初のエラーで残りの future を破棄する
                let (
                    top_individuals,
                    top_teams,
                    total_count,
                    total_users,
                    most_active_day,
                    previous_total_count,
                ) = tokio::try_join!(
                    top_individuals,
                    top_teams,
                    total_count,
                    total_users,
                    most_active_day,
                    previous_total_count
                )
                .map_err(|failure| {
                    error!(
                        metric = %failure.metric,
                        error = %failure.source,
                        "Metric query failed, cancelling remaining queries"
                    );
                    AnalyticsError::PartialAggregation {
                        metric: failure.metric,
                        source: failure.source,
                    }
                })?;

                RawMetrics {
                    top_individuals,
                    top_teams,
                    total_count,
                    total_users,
                    most_active_day,
                    previous_total_count,
                    degraded: Vec::new(),
                }
            }
        };

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            degraded = metrics.degraded.len(),
            "Metrics aggregation completed"
        );

        Ok(metrics)
    }
}

/// 共通の締め切りでサブクエリを打ち切る
async fn guarded<T, F>(
    metric: MetricKind,
    deadline: Instant,
    timeout_ms: u64,
    query: F,
) -> Result<T, MetricFailure>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout_at(deadline, query).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(MetricFailure { metric, source }),
        Err(_) => Err(MetricFailure {
            metric,
            source: DataStoreError::Timeout(timeout_ms),
        }),
    }
}

/// 失敗をデフォルト値に置き換え、置き換えた指標を記録する
fn settle<T: Default>(result: Result<T, MetricFailure>, degraded: &mut Vec<MetricKind>) -> T {
    match result {
        Ok(value) => value,
        Err(failure) => {
            log_with_context!(
                tracing::Level::WARN,
                "Metric query failed, substituting default value",
                metric => failure.metric,
                error => failure.source,
            );
            degraded.push(failure.metric);
            T::default()
        }
    }
}
