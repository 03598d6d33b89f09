//! Arena entry against a real database

mod common;

use common::{balance, create_arena, create_user, ledger_sum, submission, test_pool};
use talentsroyale::{
    db::repositories::ArenaRepository,
    error::AppError,
    models::{Arena, TransactionType},
    services::{ArenaService, LedgerService},
};

#[tokio::test]
async fn test_join_charges_entry_fee_once() {
    let pool = test_pool().await;
    let user = create_user(&pool, 120).await;
    let arena = create_arena(&pool, 100, 10).await;

    let contestant = ArenaService::join_arena(&pool, &user.id, &arena.id, &submission("Opera"))
        .await
        .unwrap();
    assert_eq!(contestant.votes, 0);
    assert!(contestant.is_active);
    assert_eq!(balance(&pool, &user.id).await, 20);

    let fees = LedgerService::history(&pool, &user.id, Some(TransactionType::ArenaEntry), 1, 20)
        .await
        .unwrap();
    assert_eq!(fees.total, 1);
    assert_eq!(fees.transactions[0].amount, -100);
    assert_eq!(fees.transactions[0].arena_id, Some(arena.id));
    assert_eq!(fees.transactions[0].contestant_id, Some(contestant.id));

    let again = ArenaService::join_arena(&pool, &user.id, &arena.id, &submission("Encore")).await;
    assert!(matches!(again, Err(AppError::AlreadyJoined)));
    assert_eq!(balance(&pool, &user.id).await, 20);
}

#[tokio::test]
async fn test_join_without_funds_creates_nothing() {
    let pool = test_pool().await;
    let user = create_user(&pool, 99).await;
    let arena = create_arena(&pool, 100, 10).await;

    let result = ArenaService::join_arena(&pool, &user.id, &arena.id, &submission("Mime")).await;

    assert!(matches!(
        result,
        Err(AppError::InsufficientFunds {
            required: 100,
            available: 99
        })
    ));
    assert_eq!(balance(&pool, &user.id).await, 99);
    assert_eq!(
        ArenaRepository::count_active_contestants(&pool, &arena.id)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_free_arena_writes_no_ledger_row() {
    let pool = test_pool().await;
    let user = create_user(&pool, 0).await;
    let arena = create_arena(&pool, 0, 10).await;

    ArenaService::join_arena(&pool, &user.id, &arena.id, &submission("Poetry"))
        .await
        .unwrap();

    let ledger = LedgerService::history(&pool, &user.id, None, 1, 20)
        .await
        .unwrap();
    assert_eq!(ledger.total, 0);
}

#[tokio::test]
async fn test_inactive_arena_and_bad_media_kind_are_rejected() {
    let pool = test_pool().await;
    let user = create_user(&pool, 100).await;
    let arena = create_arena(&pool, 10, 10).await;

    let mut bad = submission("Sculpture");
    bad.media_kind = "hologram".to_string();
    let result = ArenaService::join_arena(&pool, &user.id, &arena.id, &bad).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    ArenaService::deactivate_arena(&pool, &arena.id).await.unwrap();
    let result = ArenaService::join_arena(&pool, &user.id, &arena.id, &submission("Magic")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(balance(&pool, &user.id).await, 100);
}

#[tokio::test]
async fn test_last_spot_goes_to_exactly_one_user() {
    let pool = test_pool().await;
    let arena = create_arena(&pool, 30, 1).await;
    let mut users = Vec::new();
    for _ in 0..6 {
        users.push(create_user(&pool, 30).await);
    }

    let attempts = users.iter().map(|user| {
        let pool = pool.clone();
        let user_id = user.id;
        let arena_id = arena.id;
        async move {
            ArenaService::join_arena(&pool, &user_id, &arena_id, &submission("Race")).await
        }
    });
    let results = futures::future::join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, AppError::ArenaFull)));

    let mut charged = 0;
    for user in &users {
        let left = balance(&pool, &user.id).await;
        assert_eq!(ledger_sum(&pool, &user.id).await, left);
        if left == 0 {
            charged += 1;
        }
    }
    assert_eq!(charged, 1);
}

#[tokio::test]
async fn test_concurrent_joins_by_one_user_charge_once() {
    let pool = test_pool().await;
    let user = create_user(&pool, 500).await;
    let arena = create_arena(&pool, 50, 10).await;

    let entry = submission("Twins");
    let attempts =
        (0..5).map(|_| ArenaService::join_arena(&pool, &user.id, &arena.id, &entry));
    let results = futures::future::join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, AppError::AlreadyJoined)));
    assert_eq!(balance(&pool, &user.id).await, 450);
}

#[tokio::test]
async fn test_withdrawn_entry_frees_the_spot_without_refund() {
    let pool = test_pool().await;
    let first = create_user(&pool, 10).await;
    let second = create_user(&pool, 10).await;
    let arena = create_arena(&pool, 10, 1).await;

    let entry = ArenaService::join_arena(&pool, &first.id, &arena.id, &submission("Dance"))
        .await
        .unwrap();
    let full = ArenaService::join_arena(&pool, &second.id, &arena.id, &submission("Song")).await;
    assert!(matches!(full, Err(AppError::ArenaFull)));

    let stranger = ArenaService::withdraw_entry(&pool, &second.id, &entry.id).await;
    assert!(matches!(stranger, Err(AppError::NotFound(_))));

    ArenaService::withdraw_entry(&pool, &first.id, &entry.id)
        .await
        .unwrap();
    assert_eq!(balance(&pool, &first.id).await, 0);

    ArenaService::join_arena(&pool, &second.id, &arena.id, &submission("Song"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reseeding_keeps_existing_arenas_untouched() {
    let pool = test_pool().await;
    talentsroyale::db::seed_default_arenas(&pool).await.unwrap();

    let recruit: Arena = sqlx::query_as("SELECT * FROM arenas WHERE name = 'Recruit Arena'")
        .fetch_one(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE arenas SET token_cost = 99 WHERE id = $1")
        .bind(recruit.id)
        .execute(&pool)
        .await
        .unwrap();
    ArenaService::deactivate_arena(&pool, &recruit.id)
        .await
        .unwrap();

    talentsroyale::db::seed_default_arenas(&pool).await.unwrap();

    let after = ArenaRepository::find_by_id(&pool, &recruit.id)
        .await
        .unwrap()
        .unwrap();
    let seeded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM arenas WHERE name = 'Recruit Arena'")
        .fetch_one(&pool)
        .await
        .unwrap();

    sqlx::query("UPDATE arenas SET token_cost = 15, is_active = TRUE WHERE id = $1")
        .bind(recruit.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(!after.is_active);
    assert_eq!(after.token_cost, 99);
    assert_eq!(seeded, 1);
}
