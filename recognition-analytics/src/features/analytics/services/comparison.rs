// recognition-analytics/src/features/analytics/services/comparison.rs

/// 前期が 0 のときに報告する変化率
pub const ZERO_BASELINE_CHANGE: f64 = 100.0;

/// 小数点以下1桁に丸める (0.5 は 0 から遠い方へ)
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 前期比の変化率 (%)
///
/// 前期が 0 の場合は今期の値に関係なく常に 100.0 を返す。
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return ZERO_BASELINE_CHANGE;
    }
    round1((current - previous) / previous * 100.0)
}

/// 1人あたりの件数。ユーザーがいなければ 0
pub fn avg_per_person(total_count: u64, total_users: u64) -> f64 {
    if total_users == 0 {
        return 0.0;
    }
    round1(total_count as f64 / total_users as f64)
}
