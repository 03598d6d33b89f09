//! Ledger rows outlive the records they point at

mod common;

use common::{create_arena, create_user, submission, test_pool};
use sqlx::PgPool;
use uuid::Uuid;

use talentsroyale::{
    notifications::{LogTransport, Notifier},
    services::{ArenaService, UserService, VotingService},
    storage::MediaStorage,
};

type LedgerRow = (Uuid, Option<Uuid>, Option<Uuid>, Option<Uuid>, i64, i64);

async fn ledger_rows(pool: &PgPool, user_ids: &[Uuid]) -> Vec<LedgerRow> {
    sqlx::query_as(
        r#"
        SELECT id, contestant_id, arena_id, payment_id, amount, balance_after
        FROM token_transactions
        WHERE user_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await
    .unwrap()
}

fn storage() -> MediaStorage {
    MediaStorage::new(std::env::temp_dir().join(format!("media-{}", Uuid::new_v4())))
}

#[tokio::test]
async fn test_removing_an_entry_leaves_its_ledger_rows_alone() {
    let pool = test_pool().await;
    let performer = create_user(&pool, 40).await;
    let voter = create_user(&pool, 20).await;
    let arena = create_arena(&pool, 25, 10).await;

    let entry = ArenaService::join_arena(&pool, &performer.id, &arena.id, &submission("Ballad"))
        .await
        .unwrap();
    VotingService::cast_vote(&pool, 5, &voter.id, &entry.id, false)
        .await
        .unwrap();
    VotingService::cast_vote(&pool, 5, &voter.id, &entry.id, true)
        .await
        .unwrap();

    let users = [performer.id, voter.id];
    let before = ledger_rows(&pool, &users).await;
    let linked = before
        .iter()
        .filter(|row| row.1 == Some(entry.id))
        .count();
    assert_eq!(linked, 2);

    ArenaService::remove_entry(&pool, &storage(), &entry.id)
        .await
        .unwrap();

    assert!(ArenaService::get_contestant(&pool, &entry.id).await.is_err());
    assert_eq!(ledger_rows(&pool, &users).await, before);
}

#[tokio::test]
async fn test_deleting_an_account_keeps_its_ledger() {
    let pool = test_pool().await;
    let user = create_user(&pool, 30).await;
    let arena = create_arena(&pool, 10, 10).await;
    ArenaService::join_arena(&pool, &user.id, &arena.id, &submission("Tap dance"))
        .await
        .unwrap();

    let before = ledger_rows(&pool, &[user.id]).await;
    assert_eq!(before.len(), 2);

    let notifier = Notifier::new(Box::new(LogTransport), "noreply@example.test");
    UserService::delete_account(&pool, &notifier, &storage(), &user.id, "correct-horse-battery")
        .await
        .unwrap();

    assert!(UserService::get_user_by_id(&pool, &user.id).await.is_err());
    assert_eq!(ledger_rows(&pool, &[user.id]).await, before);
}
