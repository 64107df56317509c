use axum::{
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    serve::Serve,
    Json, Router,
};

use redis::{Client, RedisResult};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::error::Error;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use domain::{AuthAPIError, FieldError, ProjectAPIError};
pub mod routes;
use crate::utils::tracing::*;
use routes::projects::{
    check_invitation, create_project, get_members, get_project,
    get_user_project, invite_member, list_projects, new_project,
    update_member_role, update_member_status, update_project,
};
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::AppState;
pub mod utils;
use utils::constants::APP_SERVICE_EXTERNAL_ADDRESS;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl IntoResponse for ProjectAPIError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            ProjectAPIError::ValidationError(e) => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::BAD_REQUEST,
                    e.message().to_owned(),
                    e.details().to_vec(),
                )
            }
            ProjectAPIError::BadRequest(message) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, message.clone(), vec![])
            }
            ProjectAPIError::IDNotFoundError(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, self.to_string(), vec![])
            }
            ProjectAPIError::AuthenticationError(
                AuthAPIError::UnexpectedError(_),
            )
            | ProjectAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                    vec![],
                )
            }
            ProjectAPIError::AuthenticationError(auth_error) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::UNAUTHORIZED, auth_error.to_string(), vec![])
            }
            ProjectAPIError::RateLimited => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::TOO_MANY_REQUESTS, self.to_string(), vec![])
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });
        (status, body).into_response()
    }
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(
        app_state: AppState,
        address: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let allowed_origins = [
            "http://localhost:3000".parse()?,
            "http://127.0.0.1:3000".parse()?,
            APP_SERVICE_EXTERNAL_ADDRESS.parse()?,
        ];

        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
            .allow_headers([CONTENT_TYPE])
            .allow_credentials(true)
            .allow_origin(allowed_origins);

        let router = Router::new()
            .route("/api/projects", post(create_project).get(list_projects))
            .route("/api/projects/:id", get(get_project).put(update_project))
            .route("/api/project", post(new_project).get(get_user_project))
            .route("/api/project/check-invitation", get(check_invitation))
            .route("/api/project/invite-member", post(invite_member))
            .route(
                "/api/project/:project_id/members",
                get(get_members).patch(update_member_role),
            )
            .route(
                "/api/project/:project_id/members/status",
                patch(update_member_status),
            )
            .with_state(app_state)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}

pub fn get_redis_client(redis_hostname: String) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}
