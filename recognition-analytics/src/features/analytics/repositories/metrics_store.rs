// recognition-analytics/src/features/analytics/repositories/metrics_store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DataStoreError;
use crate::features::analytics::models::{DateRange, DayActivity, MetricsFilter, RankedEntity};

pub type StoreResult<T> = Result<T, DataStoreError>;

/// 集計クエリを提供するストアのトレイト定義
///
/// 読み取り専用で、複数リクエストから同時に呼ばれても安全であること。
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// 期間内の表彰件数
    async fn count_in_range(&self, range: &DateRange, filter: &MetricsFilter)
        -> StoreResult<u64>;

    /// 受賞者ランキング (件数の降順、名前を解決できないエントリは除外)
    async fn top_receivers(
        &self,
        range: &DateRange,
        limit: usize,
        filter: &MetricsFilter,
    ) -> StoreResult<Vec<RankedEntity>>;

    /// チームランキング (カテゴリでのみ絞り込み)
    async fn top_teams(
        &self,
        range: &DateRange,
        limit: usize,
        category_id: Option<Uuid>,
    ) -> StoreResult<Vec<RankedEntity>>;

    /// 最も表彰の多い曜日
    async fn most_active_day(
        &self,
        range: &DateRange,
        filter: &MetricsFilter,
    ) -> StoreResult<DayActivity>;

    /// ユーザー総数 (期間に依存しない)
    async fn total_users(&self, team_id: Option<Uuid>) -> StoreResult<u64>;
}
