//! Shared fixtures for database-backed tests
//!
//! Tests run against `TEST_DATABASE_URL` when it is set, otherwise against a
//! PostgreSQL container started lazily on first use and shared by every test
//! in the binary. Fixtures use random names so tests never collide.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use talentsroyale::{
    config::{PaymentConfig, TokenCatalog},
    constants::roles,
    models::{Arena, ArenaTier, User},
    payments::{
        CheckoutRequest, CheckoutSession, PaymentProvider, ProviderError, SessionStatus,
    },
    services::{ArenaService, AuthService, EntrySubmission, LedgerService, PaymentService},
};

pub const WEBHOOK_SECRET: &str = "whsec_test_secret";

struct TestDatabase {
    url: String,
    _container: Option<ContainerAsync<Postgres>>,
}

static DATABASE: OnceCell<TestDatabase> = OnceCell::const_new();

async fn database() -> &'static TestDatabase {
    DATABASE
        .get_or_init(|| async {
            let (url, container) = match std::env::var("TEST_DATABASE_URL") {
                Ok(url) => (url, None),
                Err(_) => {
                    let container = Postgres::default()
                        .start()
                        .await
                        .expect("Failed to start PostgreSQL container");
                    let host = container.get_host().await.unwrap();
                    let port = container.get_host_port_ipv4(5432).await.unwrap();
                    (
                        format!("postgres://postgres:postgres@{}:{}/postgres", host, port),
                        Some(container),
                    )
                }
            };

            let pool = PgPool::connect(&url)
                .await
                .expect("Failed to connect to test database");
            talentsroyale::db::run_migrations(&pool)
                .await
                .expect("Failed to run migrations");
            pool.close().await;

            TestDatabase {
                url,
                _container: container,
            }
        })
        .await
}

/// A fresh pool for the calling test's runtime
pub async fn test_pool() -> PgPool {
    let db = database().await;
    PgPoolOptions::new()
        .max_connections(16)
        .connect(&db.url)
        .await
        .expect("Failed to connect to test database")
}

fn suffix() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Insert a member, crediting `tokens` as a bonus so the ledger stays complete
pub async fn create_user(pool: &PgPool, tokens: i64) -> User {
    let name = format!("user_{}", suffix());
    let hash = AuthService::hash_password("correct-horse-battery").unwrap();
    let user = talentsroyale::db::repositories::UserRepository::create(
        pool,
        &name,
        &format!("{}@example.test", name),
        &hash,
        roles::MEMBER,
    )
    .await
    .unwrap();

    if tokens > 0 {
        LedgerService::grant_bonus(pool, &user.id, tokens, "Test funds")
            .await
            .unwrap();
    }

    user
}

pub async fn create_arena(pool: &PgPool, token_cost: i64, max_participants: i32) -> Arena {
    ArenaService::create_arena(
        pool,
        &format!("Arena {}", suffix()),
        ArenaTier::Recruit,
        None,
        token_cost,
        max_participants,
    )
    .await
    .unwrap()
}

pub fn submission(title: &str) -> EntrySubmission {
    EntrySubmission {
        title: title.to_string(),
        description: None,
        media_kind: "video".to_string(),
        media_path: Some(format!("entries/{}.mp4", suffix())),
    }
}

pub async fn balance(pool: &PgPool, user_id: &Uuid) -> i64 {
    LedgerService::balance(pool, user_id).await.unwrap()
}

/// Sum of every ledger row of a user
pub async fn ledger_sum(pool: &PgPool, user_id: &Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM token_transactions WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// In-memory stand-in for the payment processor
#[derive(Default)]
pub struct FakeProvider {
    pub paid: AtomicBool,
    pub unavailable: AtomicBool,
    pub lookups: AtomicUsize,
}

impl FakeProvider {
    pub fn paying() -> Arc<Self> {
        let provider = Self::default();
        provider.paid.store(true, Ordering::SeqCst);
        Arc::new(provider)
    }

    pub fn intent_for(session_id: &str) -> String {
        format!("pi_{}", session_id.trim_start_matches("cs_"))
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, ProviderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::Api {
                status: 503,
                message: "provider down".to_string(),
            });
        }
        assert!(request.metadata.contains_key("payment_id"));

        let id = format!("cs_{}", suffix());
        Ok(CheckoutSession {
            url: format!("https://checkout.example.test/{}", id),
            id,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionStatus, ProviderError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let paid = self.paid.load(Ordering::SeqCst);
        Ok(SessionStatus {
            id: session_id.to_string(),
            paid,
            payment_intent_id: paid.then(|| Self::intent_for(session_id)),
        })
    }
}

pub fn payment_config() -> PaymentConfig {
    PaymentConfig {
        api_base: "http://127.0.0.1:1".to_string(),
        secret_key: "sk_test".to_string(),
        webhook_secret: WEBHOOK_SECRET.to_string(),
        webhook_tolerance_secs: 300,
        currency: "usd".to_string(),
        success_url: "http://localhost/success?session_id={CHECKOUT_SESSION_ID}".to_string(),
        cancel_url: "http://localhost/tokens".to_string(),
    }
}

pub fn payment_service(provider: Arc<FakeProvider>) -> PaymentService {
    PaymentService::new(TokenCatalog::default(), provider, payment_config())
}
