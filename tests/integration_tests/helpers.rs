use std::{
    collections::HashMap,
    sync::{LazyLock, Mutex},
};

use async_trait::async_trait;
use moneris_gateway::{
    client::{
        moneris::{MonerisClient, Response, Server},
        postgres,
    },
    config::{self, MonerisConfig},
    repository::{credit_card::CreateCreditCardArgs, db::Repository},
    service::gateway::{
        error::StoreError,
        reporter::{ErrorReporter, LogEntryReporter},
        source::{CreditCard, PgSourceStore, SourceStore},
    },
    telemetry::{get_subscriber, init_subscriber},
};
use secrecy::Secret;
use sqlx::{Connection, Executor, PgConnection, Pool, Postgres};
use uuid::Uuid;
use wiremock::MockServer;

pub const MPG_PATH: &str = "/gateway2/servlet/MpgRequest";

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub moneris_server: MockServer,
    pub preferences: MonerisConfig,
    pub client: MonerisClient,
}

pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let moneris_server = MockServer::start().await;
    let preferences = MonerisConfig {
        login: "store3".to_string(),
        password: Secret::new("yesguy".to_string()),
        server: Server::Test,
        url: Some(format!("{}{}", moneris_server.uri(), MPG_PATH)),
        timeout_secs: 5,
    };
    let client = MonerisClient::new(&preferences).expect("cannot build moneris client");
    TestApp {
        moneris_server,
        preferences,
        client,
    }
}

/// A fresh, migrated database per test.
pub struct TestDb {
    pub db: Pool<Postgres>,
    pub repo: Repository,
}

impl TestDb {
    pub fn source_store(&self) -> PgSourceStore {
        PgSourceStore::new(self.db.clone(), self.repo.clone())
    }

    pub fn log_entry_reporter(&self) -> LogEntryReporter {
        LogEntryReporter::new(self.db.clone(), self.repo.clone())
    }

    pub async fn create_credit_card(&self, name: &str) -> i64 {
        let mut conn = self.db.acquire().await.unwrap();
        self.repo
            .create_credit_card(
                &mut conn,
                CreateCreditCardArgs {
                    month: 9,
                    year: 2030,
                    name,
                    cc_type: Some("visa"),
                    last_digits: Some("4242"),
                },
            )
            .await
            .unwrap()
            .id
    }
}

pub async fn spawn_db() -> TestDb {
    LazyLock::force(&TRACING);

    let cfg = config::Settings::new().expect("cannot parse configuration");
    let db_dsn = configure_db(&cfg.db).await;
    let db = postgres::new_pg_pool(&db_dsn)
        .await
        .expect("cannot create db_pool");
    TestDb {
        db,
        repo: Repository::default(),
    }
}

async fn configure_db(db_cfg: &config::DbConfig) -> String {
    let db_name = Uuid::new_v4().to_string();
    let db_url = url::Url::parse(&db_cfg.dsn).expect("cannot parse db dsn");
    let db_dsn_without_database = format!(
        "postgres://{username}:{password}@{host}:{port}?sslmode=disable",
        username = db_url.username(),
        password = db_url.password().expect("empty password"),
        host = db_url.host().expect("empty host"),
        port = db_url.port().expect("empty port"),
    );

    let mut conn = PgConnection::connect(&db_dsn_without_database)
        .await
        .expect("cannot connect without db");
    conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
        .await
        .expect("failed to create database");

    let db_dsn = format!(
        "postgres://{username}:{password}@{host}:{port}/{db}?sslmode=disable",
        username = db_url.username(),
        password = db_url.password().expect("empty password"),
        host = db_url.host().expect("empty host"),
        port = db_url.port().expect("empty port"),
        db = db_name,
    );
    let db_pool = postgres::new_pg_pool(&db_dsn)
        .await
        .expect("cannot create db_pool");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("failed to migrate the database");
    db_dsn
}

/// Renders a Moneris `<response>` carrying the given receipt fields.
pub fn receipt(fields: &[(&str, &str)]) -> String {
    let body: String = fields
        .iter()
        .map(|(name, value)| format!("<{name}>{value}</{name}>"))
        .collect();
    format!(r#"<?xml version="1.0" standalone="yes"?><response><receipt>{body}</receipt></response>"#)
}

pub fn approved_receipt(trans_id: &str, receipt_id: &str) -> String {
    receipt(&[
        ("ReceiptId", receipt_id),
        ("ReferenceNum", "660021190016820050"),
        ("ResponseCode", "027"),
        ("ISO", "01"),
        ("AuthCode", "587263"),
        ("Complete", "true"),
        ("Message", "APPROVED           *                    ="),
        ("TransID", trans_id),
        ("TimedOut", "false"),
    ])
}

pub fn declined_receipt() -> String {
    receipt(&[
        ("ReceiptId", "ord_declined"),
        ("ResponseCode", "481"),
        ("Complete", "true"),
        ("Message", "DECLINED           *                    ="),
        ("TransID", "99-0_10"),
    ])
}

pub fn credit_card(id: i64) -> CreditCard {
    CreditCard {
        id,
        number: Secret::new("4242424242424242".to_string()),
        month: 9,
        year: 2030,
        name: "John Doe".to_string(),
        cc_type: Some("visa".to_string()),
        verification_value: Some(Secret::new("123".to_string())),
        gateway_customer_profile_id: None,
        gateway_payment_profile_id: None,
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub cards: Mutex<HashMap<i64, CreditCard>>,
}

impl MemoryStore {
    pub fn with_card(card: CreditCard) -> Self {
        let store = MemoryStore::default();
        store.cards.lock().unwrap().insert(card.id, card);
        store
    }

    pub fn get(&self, id: i64) -> Option<CreditCard> {
        self.cards.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl SourceStore for MemoryStore {
    async fn save_profile_ids(&self, card: &CreditCard) -> Result<(), StoreError> {
        let mut cards = self.cards.lock().unwrap();
        match cards.get_mut(&card.id) {
            Some(stored) => {
                stored.gateway_customer_profile_id = card.gateway_customer_profile_id.clone();
                stored.gateway_payment_profile_id = card.gateway_payment_profile_id.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound { id: card.id }),
        }
    }

    async fn destroy(&self, card_id: i64) -> Result<(), StoreError> {
        match self.cards.lock().unwrap().remove(&card_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound { id: card_id }),
        }
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub errors: Mutex<Vec<(String, Response)>>,
}

impl RecordingReporter {
    pub fn operations(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap()
            .iter()
            .map(|(operation, _)| operation.clone())
            .collect()
    }
}

#[async_trait]
impl ErrorReporter for RecordingReporter {
    async fn gateway_error(&self, operation: &str, response: &Response) {
        self.errors
            .lock()
            .unwrap()
            .push((operation.to_string(), response.clone()));
    }
}
