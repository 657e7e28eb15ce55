// tests/common/test_data.rs

use chrono::{DateTime, Duration, TimeZone, Utc};
use recognition_analytics::features::analytics::models::{
    Member, RankedEntity, Recognition, RecognitionDataset, Team,
};
use uuid::Uuid;

/// 2024-06-15 (土) 12:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn ranked(name: &str, count: u64) -> RankedEntity {
    RankedEntity::new(Uuid::new_v4(), name, count)
}

/// レポート計算用の小さなデータセット
pub struct SampleDataset {
    pub dataset: RecognitionDataset,
    pub platform_team: Uuid,
    pub design_team: Uuid,
    pub alice: Uuid,
    pub bob: Uuid,
    pub carol: Uuid,
    pub kudos: Uuid,
    pub teamwork: Uuid,
}

/// 2024年5月と6月に表彰イベントを持つデータセット
///
/// 6月 (15日まで): alice 3件, bob 2件, carol 1件 / 5月: 4件
pub fn sample_dataset() -> SampleDataset {
    let platform_team = Uuid::new_v4();
    let design_team = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let carol = Uuid::new_v4();
    let kudos = Uuid::new_v4();
    let teamwork = Uuid::new_v4();

    let members = vec![
        Member {
            id: alice,
            name: "Alice".to_string(),
            team_id: Some(platform_team),
        },
        Member {
            id: bob,
            name: "Bob".to_string(),
            team_id: Some(platform_team),
        },
        Member {
            id: carol,
            name: "Carol".to_string(),
            team_id: Some(design_team),
        },
        Member {
            id: Uuid::new_v4(),
            name: "Dave".to_string(),
            team_id: Some(design_team),
        },
    ];
    let teams = vec![
        Team {
            id: platform_team,
            name: "Platform".to_string(),
        },
        Team {
            id: design_team,
            name: "Design".to_string(),
        },
    ];

    let event = |recipient: Uuid, category: Uuid, created_at: DateTime<Utc>| Recognition {
        id: Uuid::new_v4(),
        sender_id: Some(carol),
        recipient_id: recipient,
        category_id: Some(category),
        created_at,
    };

    let recognitions = vec![
        // 6月: 日曜 (2日) に3件
        event(alice, kudos, at(2024, 6, 2, 9)),
        event(alice, kudos, at(2024, 6, 2, 10)),
        event(bob, teamwork, at(2024, 6, 2, 11)),
        event(alice, teamwork, at(2024, 6, 4, 9)),
        event(bob, kudos, at(2024, 6, 11, 9)),
        event(carol, kudos, at(2024, 6, 12, 9)),
        // 今期の範囲外 (16日)
        event(carol, kudos, at(2024, 6, 16, 9)),
        // 5月
        event(alice, kudos, at(2024, 5, 3, 9)),
        event(bob, kudos, at(2024, 5, 10, 9)),
        event(carol, teamwork, at(2024, 5, 20, 9)),
        event(carol, kudos, at(2024, 5, 31, 23) + Duration::minutes(59)),
    ];

    SampleDataset {
        dataset: RecognitionDataset {
            members,
            teams,
            recognitions,
        },
        platform_team,
        design_team,
        alice,
        bob,
        carol,
        kudos,
        teamwork,
    }
}
