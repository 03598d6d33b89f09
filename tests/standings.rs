//! Standings and progression computed from live rows

mod common;

use common::{create_arena, create_user, submission, test_pool};
use talentsroyale::{
    ranking::Achievement,
    services::{ArenaService, StandingsService, VotingService},
};

const VOTE_COST: i64 = 1;

#[tokio::test]
async fn test_arena_standings_follow_vote_counts() {
    let pool = test_pool().await;
    let arena = create_arena(&pool, 0, 10).await;

    let mut entries = Vec::new();
    for title in ["Acrobatics", "Beatbox", "Cello", "Drums"] {
        let performer = create_user(&pool, 0).await;
        let entry = ArenaService::join_arena(&pool, &performer.id, &arena.id, &submission(title))
            .await
            .unwrap();
        entries.push(entry);
    }

    // Drums: 3 votes, Beatbox: 2, Cello: 1, Acrobatics: 0
    for (entry, votes) in entries.iter().zip([0, 2, 1, 3]) {
        for _ in 0..votes {
            let voter = create_user(&pool, 0).await;
            VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &entry.id, false)
                .await
                .unwrap();
        }
    }

    let (loaded, standings) = StandingsService::arena_standings(&pool, &arena.id)
        .await
        .unwrap();
    assert_eq!(loaded.id, arena.id);

    let titles: Vec<_> = standings.iter().map(|e| e.entry.title.as_str()).collect();
    assert_eq!(titles, ["Drums", "Beatbox", "Cello", "Acrobatics"]);
    assert_eq!(
        standings.iter().map(|e| e.rank).collect::<Vec<_>>(),
        [1, 2, 3, 4]
    );
    assert!(standings[2].finale_eligible);
    assert!(!standings[3].finale_eligible);

    let finale = StandingsService::finale(&pool).await.unwrap();
    assert!(finale.iter().any(|e| e.entry.id == entries[3].id));
    assert!(!finale.iter().any(|e| e.entry.id == entries[0].id));
}

#[tokio::test]
async fn test_progression_reports_rank_and_gap() {
    let pool = test_pool().await;
    let arena = create_arena(&pool, 0, 10).await;
    let user = create_user(&pool, 0).await;

    let mine = ArenaService::join_arena(&pool, &user.id, &arena.id, &submission("Mine"))
        .await
        .unwrap();
    for votes in [4, 3, 2] {
        let rival = create_user(&pool, 0).await;
        let entry = ArenaService::join_arena(&pool, &rival.id, &arena.id, &submission("Rival"))
            .await
            .unwrap();
        for _ in 0..votes {
            let voter = create_user(&pool, 0).await;
            VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &entry.id, false)
                .await
                .unwrap();
        }
    }
    let fan = create_user(&pool, 0).await;
    VotingService::cast_vote(&pool, VOTE_COST, &fan.id, &mine.id, false)
        .await
        .unwrap();

    let summary = StandingsService::progression(&pool, &user.id).await.unwrap();

    assert_eq!(summary.user_id, user.id);
    assert_eq!(summary.displayed_tier, Some(arena.tier));
    assert_eq!(summary.total_votes, 1);
    assert_eq!(summary.entries.len(), 1);
    assert_eq!(summary.entries[0].rank, 4);
    assert_eq!(summary.entries[0].participants, 4);
    assert_eq!(summary.entries[0].votes_to_podium, 2);
    assert!(summary.achievements.contains(&Achievement::FirstEntry));
    assert!(summary.achievements.contains(&Achievement::FirstVote));
    assert!(!summary.achievements.contains(&Achievement::Finalist));
}

#[tokio::test]
async fn test_progression_without_entries_is_empty() {
    let pool = test_pool().await;
    let user = create_user(&pool, 0).await;

    let summary = StandingsService::progression(&pool, &user.id).await.unwrap();

    assert!(summary.displayed_tier.is_none());
    assert!(summary.entries.is_empty());
    assert!(summary.achievements.is_empty());
}
