mod routes;
mod ui;

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use axum::{http::StatusCode, routing::get, Router};
use tower_http::trace::TraceLayer;
use url::Url;

use crate::{
    deploy::DeployTarget,
    source::{fauna::FaunaClient, lister::CollectionLister, Db},
};

pub struct CtxBuilder {
    pub fauna_secret: Option<String>,
    pub fauna_endpoint: Url,
    pub deploy_target: DeployTarget,
}

impl CtxBuilder {
    pub fn new() -> Self {
        Self {
            fauna_secret: None,
            fauna_endpoint: crate::source::fauna::DEFAULT_ENDPOINT.parse().unwrap(),
            deploy_target: DeployTarget::Vercel,
        }
    }

    pub fn fauna_secret(mut self, secret: Option<String>) -> Self {
        self.fauna_secret = secret;
        self
    }

    pub fn fauna_endpoint(mut self, endpoint: Url) -> Self {
        self.fauna_endpoint = endpoint;
        self
    }

    pub fn deploy_target(mut self, target: DeployTarget) -> Self {
        self.deploy_target = target;
        self
    }

    pub fn build(self) -> Result<Ctx, anyhow::Error> {
        // Without a secret no client exists at all; the collections endpoint
        // reports the missing configuration instead of attempting a query.
        let db = self
            .fauna_secret
            .as_deref()
            .map(|secret| Db::Fauna(FaunaClient::with_endpoint(secret, self.fauna_endpoint)));

        if db.is_none() {
            tracing::warn!("FAUNADB_SECRET not configured, collection listing is disabled");
        }

        Ok(Ctx::new(db, self.deploy_target))
    }
}

impl Default for CtxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Server context.
#[derive(Clone)]
pub struct Ctx {
    lister: Option<CollectionLister>,
    http: reqwest::Client,
    deploy: DeployTarget,
}

impl Ctx {
    pub fn new(db: Option<Db>, deploy: DeployTarget) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("faunalist")
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        Ctx {
            lister: db.map(CollectionLister::new),
            http,
            deploy,
        }
    }

    pub async fn run_server(self, port: u16) -> Result<(), anyhow::Error> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        run_server(addr, self).await
    }
}

pub const DEFAULT_PORT: u16 = 3333;

fn build_router(ctx: Ctx) -> Router {
    Router::new()
        .route("/", get(routes::homepage::handler_homepage))
        // API
        .route(
            routes::api_collections::PATH_API_COLLECTIONS,
            get(routes::api_collections::handler_api_collections),
        )
        .with_state(ctx)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .layer(
            // Graceful shutdown will wait for outstanding requests to complete.
            // Add a timeout so requests don't hang forever.
            tower_http::timeout::TimeoutLayer::new(Duration::from_secs(30)),
        )
}

async fn run_server(addr: SocketAddr, ctx: Ctx) -> Result<(), anyhow::Error> {
    tracing::info!("starting server: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("could not bind port")?;

    let app = build_router(ctx);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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

    tracing::info!("received shutdown signal");
}

struct ApiError {
    message: String,
    status: StatusCode,
    source: Option<anyhow::Error>,
}

impl ApiError {
    pub fn msg(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
            source: None,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(source: anyhow::Error) -> Self {
        Self {
            message: source.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            source: Some(source),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response<axum::body::Body> {
        let data = serde_json::json!({
            "error": {
                "message": &self.message,
                "source": self.source.as_ref().map(|x| format!("{:#?}", x))
            }
        });

        let body = serde_json::to_vec(&data).unwrap();

        axum::http::Response::builder()
            .status(self.status)
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body))
            .unwrap()
    }
}

/// Error envelope emitted by [`ApiError`], as read back by the page when it
/// calls the collections endpoint through the public deployment URL.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(serde::Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
async fn test_client_with_db(db: Option<Db>) -> axum_test_helper::TestClient {
    let ctx = Ctx::new(db, DeployTarget::Vercel);
    let app = build_router(ctx);
    axum_test_helper::TestClient::new(app).await
}

/// Serves the app on an OS-assigned local port, for tests that exercise the
/// page's self-fetch through a real socket.
#[cfg(test)]
async fn spawn_test_server(ctx: Ctx) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind test listener");
    let addr = listener.local_addr().expect("listener has no local addr");

    let app = build_router(ctx);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });

    addr
}
