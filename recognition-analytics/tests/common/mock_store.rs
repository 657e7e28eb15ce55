// tests/common/mock_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recognition_analytics::error::DataStoreError;
use recognition_analytics::features::analytics::models::{
    DateRange, DayActivity, MetricKind, MetricsFilter, RankedEntity,
};
use recognition_analytics::features::analytics::repositories::{MetricsStore, StoreResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;
use tokio::time::Instant;
use uuid::Uuid;

/// ストアに届いた呼び出しの記録
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Count {
        range: DateRange,
        filter: MetricsFilter,
    },
    TopReceivers {
        range: DateRange,
        limit: usize,
        filter: MetricsFilter,
    },
    TopTeams {
        range: DateRange,
        limit: usize,
        category_id: Option<Uuid>,
    },
    MostActiveDay {
        range: DateRange,
        filter: MetricsFilter,
    },
    TotalUsers {
        team_id: Option<Uuid>,
    },
}

/// テスト用のモック集計ストア
///
/// `pivot` を含む期間の件数を現在期間、それ以外を前期間として返す。
#[derive(Clone)]
pub struct MockMetricsStore {
    pivot: DateTime<Utc>,
    pub current_count: u64,
    pub previous_count: u64,
    pub total_users: u64,
    pub top_receivers: Vec<RankedEntity>,
    pub top_teams: Vec<RankedEntity>,
    pub most_active_day: DayActivity,
    failures: HashMap<MetricKind, DataStoreError>,
    hanging: HashSet<MetricKind>,
    barrier: Option<Arc<Barrier>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    started: Arc<Mutex<Vec<(MetricKind, Instant)>>>,
}

impl MockMetricsStore {
    pub fn new(pivot: DateTime<Utc>) -> Self {
        Self {
            pivot,
            current_count: 0,
            previous_count: 0,
            total_users: 0,
            top_receivers: Vec::new(),
            top_teams: Vec::new(),
            most_active_day: DayActivity::none(),
            failures: HashMap::new(),
            hanging: HashSet::new(),
            barrier: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            started: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_counts(mut self, current: u64, previous: u64, users: u64) -> Self {
        self.current_count = current;
        self.previous_count = previous;
        self.total_users = users;
        self
    }

    pub fn with_top_receivers(mut self, entries: Vec<RankedEntity>) -> Self {
        self.top_receivers = entries;
        self
    }

    pub fn with_top_teams(mut self, entries: Vec<RankedEntity>) -> Self {
        self.top_teams = entries;
        self
    }

    pub fn with_most_active_day(mut self, activity: DayActivity) -> Self {
        self.most_active_day = activity;
        self
    }

    /// 指定した指標のクエリを失敗させる
    pub fn failing(mut self, metric: MetricKind, error: DataStoreError) -> Self {
        self.failures.insert(metric, error);
        self
    }

    /// 指定した指標のクエリを応答させない
    pub fn hanging(mut self, metric: MetricKind) -> Self {
        self.hanging.insert(metric);
        self
    }

    /// すべての呼び出しがバリアに揃うまで待たせる
    pub fn with_barrier(mut self, parties: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn started(&self) -> Vec<(MetricKind, Instant)> {
        self.started.lock().unwrap().clone()
    }

    fn count_metric(&self, range: &DateRange) -> MetricKind {
        if range.contains(&self.pivot) {
            MetricKind::TotalCount
        } else {
            MetricKind::PreviousTotalCount
        }
    }

    async fn enter(&self, metric: MetricKind, call: RecordedCall) -> StoreResult<()> {
        self.started.lock().unwrap().push((metric, Instant::now()));
        self.calls.lock().unwrap().push(call);

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.hanging.contains(&metric) {
            std::future::pending::<()>().await;
        }
        match self.failures.get(&metric) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetricsStore for MockMetricsStore {
    async fn count_in_range(&self, range: &DateRange, filter: &MetricsFilter) -> StoreResult<u64> {
        let metric = self.count_metric(range);
        self.enter(
            metric,
            RecordedCall::Count {
                range: *range,
                filter: *filter,
            },
        )
        .await?;

        Ok(match metric {
            MetricKind::TotalCount => self.current_count,
            _ => self.previous_count,
        })
    }

    async fn top_receivers(
        &self,
        range: &DateRange,
        limit: usize,
        filter: &MetricsFilter,
    ) -> StoreResult<Vec<RankedEntity>> {
        self.enter(
            MetricKind::TopIndividuals,
            RecordedCall::TopReceivers {
                range: *range,
                limit,
                filter: *filter,
            },
        )
        .await?;
        Ok(self.top_receivers.iter().take(limit).cloned().collect())
    }

    async fn top_teams(
        &self,
        range: &DateRange,
        limit: usize,
        category_id: Option<Uuid>,
    ) -> StoreResult<Vec<RankedEntity>> {
        self.enter(
            MetricKind::TopTeams,
            RecordedCall::TopTeams {
                range: *range,
                limit,
                category_id,
            },
        )
        .await?;
        Ok(self.top_teams.iter().take(limit).cloned().collect())
    }

    async fn most_active_day(
        &self,
        range: &DateRange,
        filter: &MetricsFilter,
    ) -> StoreResult<DayActivity> {
        self.enter(
            MetricKind::MostActiveDay,
            RecordedCall::MostActiveDay {
                range: *range,
                filter: *filter,
            },
        )
        .await?;
        Ok(self.most_active_day)
    }

    async fn total_users(&self, team_id: Option<Uuid>) -> StoreResult<u64> {
        self.enter(MetricKind::TotalUsers, RecordedCall::TotalUsers { team_id })
            .await?;
        Ok(self.total_users)
    }
}
