use builders_hub::{
    app_state::AppState,
    domain::Email,
    get_postgres_pool, get_redis_client,
    services::{
        data_stores::{
            PostgresProjectStore, PostgresUserStore, RedisRateLimitStore,
        },
        postmark_email_client::PostmarkEmailClient,
    },
    utils::{
        constants::{
            invitations, prod, DATABASE_URL, POSTMARK_AUTH_TOKEN,
            POSTMARK_EMAIL_SENDER_ADDRESS, REDIS_HOST_NAME,
        },
        tracing::init_tracing,
    },
    Application,
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialize tracing");

    let pg_pool = configure_postgresql().await;
    let user_store =
        Arc::new(RwLock::new(PostgresUserStore::new(pg_pool.clone())));
    let project_store =
        Arc::new(RwLock::new(PostgresProjectStore::new(pg_pool)));

    let redis_connection = Arc::new(RwLock::new(configure_redis()));
    let rate_limit_store = Arc::new(RwLock::new(RedisRateLimitStore::new(
        redis_connection,
        invitations::RATE_LIMIT_MAX_REQUESTS.into(),
        invitations::RATE_LIMIT_WINDOW.as_secs(),
    )));

    let email_client = Arc::new(configure_postmark_email_client());

    let app_state = AppState::new(
        user_store,
        project_store,
        email_client,
        rate_limit_store,
    );

    let app = Application::build(app_state, prod::APP_ADDRESS)
        .await
        .expect("Failed to build app");

    app.run().await.expect("Failed to run app");
}

async fn configure_postgresql() -> PgPool {
    let pg_pool = get_postgres_pool(&DATABASE_URL)
        .await
        .expect("Failed to create Postgres connection pool!");

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .expect("Failed to run migrations");

    pg_pool
}

fn configure_redis() -> redis::Connection {
    get_redis_client(REDIS_HOST_NAME.to_owned())
        .expect("Failed to get Redis client")
        .get_connection()
        .expect("Failed to get Redis connection")
}

fn configure_postmark_email_client() -> PostmarkEmailClient {
    let http_client = Client::builder()
        .timeout(prod::email_client::TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");

    let sender = Email::parse(POSTMARK_EMAIL_SENDER_ADDRESS.to_owned())
        .expect("Invalid sender email address");

    PostmarkEmailClient::new(
        prod::email_client::BASE_URL.to_owned(),
        sender,
        POSTMARK_AUTH_TOKEN.to_owned(),
        http_client,
    )
}
