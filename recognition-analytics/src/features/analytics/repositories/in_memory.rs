// recognition-analytics/src/features/analytics/repositories/in_memory.rs

use async_trait::async_trait;
use chrono::{Datelike, FixedOffset, Offset, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::features::analytics::models::metrics::rank_entities;
use crate::features::analytics::models::{
    DateRange, DayActivity, DayOfWeek, Member, MetricsFilter, RankedEntity, Recognition,
    RecognitionDataset, Team,
};
use crate::features::analytics::repositories::metrics_store::{MetricsStore, StoreResult};

/// メモリ上のデータに対して集計クエリを実行するストア
///
/// 構築後は変更されないため、ロックなしで共有できる。
pub struct InMemoryMetricsStore {
    members: HashMap<Uuid, Member>,
    teams: HashMap<Uuid, Team>,
    recognitions: Vec<Recognition>,
    utc_offset: FixedOffset,
}

impl InMemoryMetricsStore {
    pub fn new(dataset: RecognitionDataset) -> Self {
        Self {
            members: dataset.members.into_iter().map(|m| (m.id, m)).collect(),
            teams: dataset.teams.into_iter().map(|t| (t.id, t)).collect(),
            recognitions: dataset.recognitions,
            utc_offset: Utc.fix(),
        }
    }

    /// 曜日の判定に使うオフセットを設定
    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn recognition_count(&self) -> usize {
        self.recognitions.len()
    }

    fn recipient_team(&self, recognition: &Recognition) -> Option<Uuid> {
        self.members
            .get(&recognition.recipient_id)
            .and_then(|m| m.team_id)
    }

    fn matches(&self, recognition: &Recognition, filter: &MetricsFilter) -> bool {
        if let Some(category_id) = filter.category_id {
            if recognition.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(team_id) = filter.team_id {
            if self.recipient_team(recognition) != Some(team_id) {
                return false;
            }
        }
        true
    }

    fn in_scope<'a>(
        &'a self,
        range: &'a DateRange,
        filter: &'a MetricsFilter,
    ) -> impl Iterator<Item = &'a Recognition> + 'a {
        self.recognitions
            .iter()
            .filter(move |r| range.contains(&r.created_at) && self.matches(r, filter))
    }
}

#[async_trait]
impl MetricsStore for InMemoryMetricsStore {
    async fn count_in_range(
        &self,
        range: &DateRange,
        filter: &MetricsFilter,
    ) -> StoreResult<u64> {
        Ok(self.in_scope(range, filter).count() as u64)
    }

    async fn top_receivers(
        &self,
        range: &DateRange,
        limit: usize,
        filter: &MetricsFilter,
    ) -> StoreResult<Vec<RankedEntity>> {
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for recognition in self.in_scope(range, filter) {
            *counts.entry(recognition.recipient_id).or_insert(0) += 1;
        }

        let entries = counts
            .into_iter()
            .filter_map(|(id, count)| {
                self.members
                    .get(&id)
                    .map(|m| RankedEntity::new(id, m.name.clone(), count))
            })
            .collect();

        Ok(rank_entities(entries, limit))
    }

    async fn top_teams(
        &self,
        range: &DateRange,
        limit: usize,
        category_id: Option<Uuid>,
    ) -> StoreResult<Vec<RankedEntity>> {
        let filter = MetricsFilter {
            team_id: None,
            category_id,
        };

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for recognition in self.in_scope(range, &filter) {
            if let Some(team_id) = self.recipient_team(recognition) {
                *counts.entry(team_id).or_insert(0) += 1;
            }
        }

        let entries = counts
            .into_iter()
            .filter_map(|(id, count)| {
                self.teams
                    .get(&id)
                    .map(|t| RankedEntity::new(id, t.name.clone(), count))
            })
            .collect();

        Ok(rank_entities(entries, limit))
    }

    async fn most_active_day(
        &self,
        range: &DateRange,
        filter: &MetricsFilter,
    ) -> StoreResult<DayActivity> {
        let mut counts = [0u64; 7];
        for recognition in self.in_scope(range, filter) {
            let day = DayOfWeek::from(
                recognition
                    .created_at
                    .with_timezone(&self.utc_offset)
                    .weekday(),
            );
            counts[usize::from(day.index() - 1)] += 1;
        }

        Ok(DayActivity::from_weekday_counts(&counts))
    }

    async fn total_users(&self, team_id: Option<Uuid>) -> StoreResult<u64> {
        let count = match team_id {
            Some(team_id) => self
                .members
                .values()
                .filter(|m| m.team_id == Some(team_id))
                .count(),
            None => self.members.len(),
        };
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone};

    struct Fixture {
        store: InMemoryMetricsStore,
        alpha: Uuid,
        beta: Uuid,
        ann: Uuid,
        bob: Uuid,
        kudos: Uuid,
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        // 2024-06-02 は日曜日
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn recognition(
        recipient_id: Uuid,
        category_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Recognition {
        Recognition {
            id: Uuid::new_v4(),
            sender_id: None,
            recipient_id,
            category_id,
            created_at: at,
        }
    }

    fn fixture() -> Fixture {
        let alpha = Uuid::from_u128(0xa);
        let beta = Uuid::from_u128(0xb);
        let ann = Uuid::from_u128(1);
        let bob = Uuid::from_u128(2);
        let cid = Uuid::from_u128(3);
        let ghost = Uuid::from_u128(99);
        let kudos = Uuid::from_u128(0xc0);

        let dataset = RecognitionDataset {
            members: vec![
                Member {
                    id: ann,
                    name: "Ann".to_string(),
                    team_id: Some(alpha),
                },
                Member {
                    id: bob,
                    name: "Bob".to_string(),
                    team_id: Some(beta),
                },
                Member {
                    id: cid,
                    name: "Cid".to_string(),
                    team_id: Some(alpha),
                },
            ],
            teams: vec![
                Team {
                    id: alpha,
                    name: "Alpha".to_string(),
                },
                Team {
                    id: beta,
                    name: "Beta".to_string(),
                },
            ],
            recognitions: vec![
                recognition(ann, Some(kudos), at(3, 9)),
                recognition(ann, None, at(3, 10)),
                recognition(ann, Some(kudos), at(4, 9)),
                recognition(bob, Some(kudos), at(3, 11)),
                recognition(bob, None, at(5, 11)),
                recognition(ghost, Some(kudos), at(3, 12)),
                // 範囲外
                recognition(bob, Some(kudos), at(20, 12)),
            ],
        };

        Fixture {
            store: InMemoryMetricsStore::new(dataset),
            alpha,
            beta,
            ann,
            bob,
            kudos,
        }
    }

    fn june_first_week() -> DateRange {
        let start = at(2, 0);
        DateRange::new(start, start + Duration::days(7) - Duration::milliseconds(1)).unwrap()
    }

    #[tokio::test]
    async fn test_count_applies_team_and_category() {
        let f = fixture();
        let range = june_first_week();

        let all = f
            .store
            .count_in_range(&range, &MetricsFilter::default())
            .await
            .unwrap();
        assert_eq!(all, 6);

        let alpha_kudos = MetricsFilter {
            team_id: Some(f.alpha),
            category_id: Some(f.kudos),
        };
        assert_eq!(f.store.count_in_range(&range, &alpha_kudos).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_top_receivers_drops_unresolved_recipients() {
        let f = fixture();
        let ranked = f
            .store
            .top_receivers(&june_first_week(), 5, &MetricsFilter::default())
            .await
            .unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, f.ann);
        assert_eq!(ranked[0].count, 3);
        assert_eq!(ranked[1].id, f.bob);
        assert_eq!(ranked[1].name, "Bob");
    }

    #[tokio::test]
    async fn test_top_teams_filters_by_category_only() {
        let f = fixture();
        let ranked = f
            .store
            .top_teams(&june_first_week(), 5, Some(f.kudos))
            .await
            .unwrap();

        assert_eq!(ranked.len(), 2);
        // Alpha=2, Beta=1 (同数なら ID 昇順)
        assert_eq!(ranked[0].id, f.alpha);
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[1].id, f.beta);

        let limited = f
            .store
            .top_teams(&june_first_week(), 1, None)
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].name, "Alpha");
    }

    #[tokio::test]
    async fn test_most_active_day_uses_offset() {
        let f = fixture();
        let activity = f
            .store
            .most_active_day(&june_first_week(), &MetricsFilter::default())
            .await
            .unwrap();
        assert_eq!(activity.day, Some(DayOfWeek::Monday));
        assert_eq!(activity.count, 4);
        assert_eq!(activity.percentage, 67);

        // UTC-12 では月曜9時〜11時のイベントが日曜になる
        let shifted = fixture()
            .store
            .with_utc_offset(FixedOffset::west_opt(12 * 3600).unwrap());
        let activity = shifted
            .most_active_day(&june_first_week(), &MetricsFilter::default())
            .await
            .unwrap();
        assert_eq!(activity.day, Some(DayOfWeek::Sunday));
    }

    #[tokio::test]
    async fn test_most_active_day_empty_range() {
        let f = fixture();
        let start = at(10, 0);
        let range = DateRange::new(start, start + Duration::days(1)).unwrap();
        let activity = f
            .store
            .most_active_day(&range, &MetricsFilter::default())
            .await
            .unwrap();
        assert_eq!(activity, DayActivity::none());
    }

    #[tokio::test]
    async fn test_total_users_by_team() {
        let f = fixture();
        assert_eq!(f.store.total_users(None).await.unwrap(), 3);
        assert_eq!(f.store.total_users(Some(f.alpha)).await.unwrap(), 2);
        assert_eq!(f.store.total_users(Some(Uuid::nil())).await.unwrap(), 0);
    }
}
