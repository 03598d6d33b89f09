//! Free and paid votes against a real database

mod common;

use common::{balance, create_arena, create_user, ledger_sum, submission, test_pool};
use talentsroyale::{
    db::repositories::{TransactionRepository, VoteRepository},
    error::AppError,
    models::{TransactionType, VoteKind},
    services::{ArenaService, VotingService},
};

const VOTE_COST: i64 = 5;

async fn entry(pool: &sqlx::PgPool) -> talentsroyale::models::Contestant {
    let performer = create_user(pool, 0).await;
    let arena = create_arena(pool, 0, 10).await;
    ArenaService::join_arena(pool, &performer.id, &arena.id, &submission("Juggling"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_free_then_paid_then_rejected() {
    let pool = test_pool().await;
    let contestant = entry(&pool).await;
    let voter = create_user(&pool, 7).await;

    let free = VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &contestant.id, false)
        .await
        .unwrap();
    assert_eq!(free.kind, VoteKind::Free);
    assert_eq!(free.tokens_spent, 0);
    assert_eq!(free.votes, 1);
    assert_eq!(balance(&pool, &voter.id).await, 7);

    let second = VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &contestant.id, false).await;
    assert!(matches!(second, Err(AppError::AlreadyVoted)));

    let paid = VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &contestant.id, true)
        .await
        .unwrap();
    assert_eq!(paid.kind, VoteKind::Paid);
    assert_eq!(paid.tokens_spent, VOTE_COST);
    assert_eq!(paid.votes, 2);
    assert_eq!(paid.balance, Some(2));

    let broke = VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &contestant.id, true).await;
    assert!(matches!(
        broke,
        Err(AppError::InsufficientFunds {
            required: VOTE_COST,
            available: 2
        })
    ));

    let contestant = ArenaService::get_contestant(&pool, &contestant.id).await.unwrap();
    assert_eq!(contestant.votes, 2);
    assert_eq!(ledger_sum(&pool, &voter.id).await, balance(&pool, &voter.id).await);
}

#[tokio::test]
async fn test_spend_tokens_on_first_vote_is_free() {
    let pool = test_pool().await;
    let contestant = entry(&pool).await;
    let voter = create_user(&pool, 20).await;

    let receipt = VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &contestant.id, true)
        .await
        .unwrap();

    assert_eq!(receipt.kind, VoteKind::Free);
    assert_eq!(balance(&pool, &voter.id).await, 20);
}

#[tokio::test]
async fn test_vote_for_missing_or_withdrawn_entry() {
    let pool = test_pool().await;
    let voter = create_user(&pool, 0).await;

    let missing =
        VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &uuid::Uuid::new_v4(), false).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let contestant = entry(&pool).await;
    ArenaService::withdraw_entry(&pool, &contestant.user_id, &contestant.id)
        .await
        .unwrap();
    let withdrawn =
        VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &contestant.id, false).await;
    assert!(matches!(withdrawn, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_concurrent_free_votes_count_once() {
    let pool = test_pool().await;
    let contestant = entry(&pool).await;
    let voter = create_user(&pool, 0).await;

    let attempts = (0..8).map(|_| {
        VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &contestant.id, false)
    });
    let results = futures::future::join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, AppError::AlreadyVoted)));

    let contestant = ArenaService::get_contestant(&pool, &contestant.id).await.unwrap();
    assert_eq!(contestant.votes, 1);
}

#[tokio::test]
async fn test_vote_counter_reconciles_with_votes_and_ledger() {
    let pool = test_pool().await;
    let contestant = entry(&pool).await;

    for _ in 0..3 {
        let voter = create_user(&pool, 2 * VOTE_COST).await;
        VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &contestant.id, false)
            .await
            .unwrap();
        for _ in 0..2 {
            VotingService::cast_vote(&pool, VOTE_COST, &voter.id, &contestant.id, true)
                .await
                .unwrap();
        }
        assert_eq!(balance(&pool, &voter.id).await, 0);
    }

    let free_votes = VoteRepository::count_for_contestant(&pool, &contestant.id)
        .await
        .unwrap();
    let paid_votes =
        TransactionRepository::count_for_contestant(&pool, &contestant.id, TransactionType::Vote)
            .await
            .unwrap();
    let contestant = ArenaService::get_contestant(&pool, &contestant.id).await.unwrap();

    assert_eq!(free_votes, 3);
    assert_eq!(paid_votes, 6);
    assert_eq!(contestant.votes, free_votes + paid_votes);
}
