//! Purchase settlement against a real database

mod common;

use std::sync::{atomic::Ordering, Arc};

use chrono::Utc;
use serde_json::json;

use common::{
    balance, create_user, ledger_sum, payment_service, test_pool, FakeProvider, WEBHOOK_SECRET,
};
use talentsroyale::{
    db::repositories::{PaymentRepository, TransactionRepository},
    error::AppError,
    models::{PaymentStatus, TransactionType},
    payments::webhook,
    services::{CompletionOutcome, PaymentService, WebhookOutcome},
};

fn signed(event: &serde_json::Value) -> (Vec<u8>, String) {
    let payload = serde_json::to_vec(event).unwrap();
    let header = webhook::sign(&payload, WEBHOOK_SECRET, Utc::now().timestamp()).unwrap();
    (payload, header)
}

fn completed_event(session_id: &str, payment_id: &uuid::Uuid) -> serde_json::Value {
    json!({
        "id": format!("evt_{}", uuid::Uuid::new_v4().simple()),
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": session_id,
                "payment_status": "paid",
                "payment_intent": FakeProvider::intent_for(session_id),
                "metadata": { "payment_id": payment_id.to_string() }
            }
        }
    })
}

#[tokio::test]
async fn test_checkout_then_redirect_credits_once() {
    let pool = test_pool().await;
    let service = payment_service(FakeProvider::paying());
    let user = create_user(&pool, 0).await;

    let checkout = service.create_payment(&pool, &user, 100).await.unwrap();
    assert_eq!(checkout.payment.status, PaymentStatus::Pending);
    assert_eq!(checkout.payment.tokens, 100);
    assert_eq!(checkout.payment.amount_cents, 899);
    let session_id = checkout.payment.checkout_session_id.clone().unwrap();
    assert!(checkout.checkout_url.ends_with(&session_id));

    let first = service.complete_payment(&pool, &session_id).await.unwrap();
    let CompletionOutcome::Completed { payment, balance: after } = first else {
        panic!("expected the first completion to credit tokens");
    };
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert!(payment.completed_at.is_some());
    assert_eq!(after, 100);

    let second = service.complete_payment(&pool, &session_id).await.unwrap();
    assert!(matches!(second, CompletionOutcome::AlreadyCompleted(_)));

    assert_eq!(balance(&pool, &user.id).await, 100);
    let credits = TransactionRepository::list_for_payment(&pool, &payment.id)
        .await
        .unwrap();
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].transaction_type, TransactionType::Purchase);
}

#[tokio::test]
async fn test_unknown_package_is_rejected() {
    let pool = test_pool().await;
    let service = payment_service(FakeProvider::paying());
    let user = create_user(&pool, 0).await;

    let result = service.create_payment(&pool, &user, 42).await;

    assert!(matches!(result, Err(AppError::InvalidPackage(42))));
}

#[tokio::test]
async fn test_provider_outage_marks_payment_failed() {
    let pool = test_pool().await;
    let provider = FakeProvider::paying();
    provider.unavailable.store(true, Ordering::SeqCst);
    let service = payment_service(provider);
    let user = create_user(&pool, 0).await;

    let result = service.create_payment(&pool, &user, 50).await;
    assert!(matches!(result, Err(AppError::PaymentProviderUnavailable(_))));

    let failed = PaymentService::history(&pool, &user.id, 10)
        .await
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].status, PaymentStatus::Failed);
    assert_eq!(balance(&pool, &user.id).await, 0);
}

#[tokio::test]
async fn test_unpaid_session_stays_pending() {
    let pool = test_pool().await;
    let provider = Arc::new(FakeProvider::default());
    let service = payment_service(provider.clone());
    let user = create_user(&pool, 0).await;

    let checkout = service.create_payment(&pool, &user, 50).await.unwrap();
    let session_id = checkout.payment.checkout_session_id.unwrap();

    let outcome = service.complete_payment(&pool, &session_id).await.unwrap();
    assert!(matches!(outcome, CompletionOutcome::NotPaid(_)));
    assert_eq!(outcome.payment().status, PaymentStatus::Pending);
    assert_eq!(provider.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(balance(&pool, &user.id).await, 0);
}

#[tokio::test]
async fn test_concurrent_redirect_and_webhook_credit_once() {
    let pool = test_pool().await;
    let service = Arc::new(payment_service(FakeProvider::paying()));
    let user = create_user(&pool, 0).await;

    let checkout = service.create_payment(&pool, &user, 250).await.unwrap();
    let session_id = checkout.payment.checkout_session_id.clone().unwrap();
    let (payload, header) = signed(&completed_event(&session_id, &checkout.payment.id));

    let redirects = (0..4).map(|_| {
        let service = service.clone();
        let pool = pool.clone();
        let session_id = session_id.clone();
        async move { service.complete_payment(&pool, &session_id).await.map(|_| ()) }
    });
    let webhooks = (0..4).map(|_| {
        let service = service.clone();
        let pool = pool.clone();
        let (payload, header) = (payload.clone(), header.clone());
        async move {
            service
                .handle_webhook(&pool, &payload, &header)
                .await
                .map(|_| ())
        }
    });
    let (redirects, webhooks) = futures::join!(
        futures::future::join_all(redirects),
        futures::future::join_all(webhooks)
    );
    assert!(redirects.iter().chain(webhooks.iter()).all(|r| r.is_ok()));

    assert_eq!(balance(&pool, &user.id).await, 250);
    assert_eq!(ledger_sum(&pool, &user.id).await, 250);
    let credits = TransactionRepository::list_for_payment(&pool, &checkout.payment.id)
        .await
        .unwrap();
    assert_eq!(credits.len(), 1);
}

#[tokio::test]
async fn test_duplicate_webhook_is_a_no_op() {
    let pool = test_pool().await;
    let service = payment_service(FakeProvider::paying());
    let user = create_user(&pool, 0).await;

    let checkout = service.create_payment(&pool, &user, 50).await.unwrap();
    let session_id = checkout.payment.checkout_session_id.clone().unwrap();
    let (payload, header) = signed(&completed_event(&session_id, &checkout.payment.id));

    let first = service.handle_webhook(&pool, &payload, &header).await.unwrap();
    assert!(matches!(
        first,
        WebhookOutcome::Settled(CompletionOutcome::Completed { .. })
    ));

    let replay = service.handle_webhook(&pool, &payload, &header).await.unwrap();
    assert!(matches!(
        replay,
        WebhookOutcome::Settled(CompletionOutcome::AlreadyCompleted(_))
    ));
    assert_eq!(balance(&pool, &user.id).await, 50);
}

#[tokio::test]
async fn test_bad_signature_changes_nothing() {
    let pool = test_pool().await;
    let service = payment_service(FakeProvider::paying());
    let user = create_user(&pool, 0).await;

    let checkout = service.create_payment(&pool, &user, 50).await.unwrap();
    let session_id = checkout.payment.checkout_session_id.clone().unwrap();
    let payload = serde_json::to_vec(&completed_event(&session_id, &checkout.payment.id)).unwrap();
    let forged = webhook::sign(&payload, "whsec_wrong", Utc::now().timestamp()).unwrap();

    let result = service.handle_webhook(&pool, &payload, &forged).await;
    assert!(matches!(result, Err(AppError::PaymentSignatureInvalid)));

    let garbage = service.handle_webhook(&pool, &payload, "not-a-signature").await;
    assert!(matches!(garbage, Err(AppError::PaymentSignatureInvalid)));

    let payment = PaymentRepository::find_by_id(&pool, &checkout.payment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(balance(&pool, &user.id).await, 0);
}

#[tokio::test]
async fn test_expired_session_fails_payment_for_good() {
    let pool = test_pool().await;
    let service = payment_service(FakeProvider::paying());
    let user = create_user(&pool, 0).await;

    let checkout = service.create_payment(&pool, &user, 50).await.unwrap();
    let session_id = checkout.payment.checkout_session_id.clone().unwrap();
    let (payload, header) = signed(&json!({
        "id": "evt_expired",
        "type": "checkout.session.expired",
        "data": { "object": { "id": session_id } }
    }));

    let outcome = service.handle_webhook(&pool, &payload, &header).await.unwrap();
    assert!(matches!(outcome, WebhookOutcome::MarkedFailed(_)));

    let late = service.complete_payment(&pool, &session_id).await.unwrap();
    assert!(matches!(late, CompletionOutcome::NotPaid(_)));
    assert_eq!(late.payment().status, PaymentStatus::Failed);
    assert_eq!(balance(&pool, &user.id).await, 0);
}

#[tokio::test]
async fn test_refund_takes_tokens_back_unless_spent() {
    let pool = test_pool().await;
    let service = payment_service(FakeProvider::paying());

    let refund_event = |intent: &str| {
        signed(&json!({
            "id": format!("evt_{}", uuid::Uuid::new_v4().simple()),
            "type": "charge.refunded",
            "data": { "object": { "id": "ch_1", "payment_intent": intent } }
        }))
    };

    let keeper = create_user(&pool, 0).await;
    let checkout = service.create_payment(&pool, &keeper, 50).await.unwrap();
    let session_id = checkout.payment.checkout_session_id.clone().unwrap();
    service.complete_payment(&pool, &session_id).await.unwrap();

    let (payload, header) = refund_event(&FakeProvider::intent_for(&session_id));
    let outcome = service.handle_webhook(&pool, &payload, &header).await.unwrap();
    assert!(matches!(outcome, WebhookOutcome::Refunded { balance: 0, .. }));
    assert_eq!(ledger_sum(&pool, &keeper.id).await, 0);

    let spender = create_user(&pool, 0).await;
    let checkout = service.create_payment(&pool, &spender, 50).await.unwrap();
    let session_id = checkout.payment.checkout_session_id.clone().unwrap();
    service.complete_payment(&pool, &session_id).await.unwrap();
    {
        let mut tx = pool.begin().await.unwrap();
        talentsroyale::services::LedgerService::debit(
            &mut *tx,
            &spender.id,
            30,
            TransactionType::Vote,
            &talentsroyale::models::LedgerContext::new("Extra votes"),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
    }

    let (payload, header) = refund_event(&FakeProvider::intent_for(&session_id));
    let outcome = service.handle_webhook(&pool, &payload, &header).await.unwrap();
    assert!(matches!(outcome, WebhookOutcome::RefundRejected(_)));
    assert_eq!(balance(&pool, &spender.id).await, 20);

    let payment = PaymentRepository::find_by_id(&pool, &checkout.payment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
}
