use anyhow::Context;
use axum::{extract::State, http::HeaderMap, response::Html};
use url::Url;

use crate::{
    server::{
        routes::api_collections::{CollectionsResponse, PATH_API_COLLECTIONS},
        ui, Ctx, ErrorEnvelope,
    },
    source::Collection,
};

/// Outcome of the per-request deployment check.
///
/// "Not deployed" is an expected state, not a fault, so it is a variant of
/// its own rather than an error: the view renders deployment instructions
/// for it and an error notification only for a deployed-but-broken app.
#[derive(Clone, Debug)]
pub enum Resolved {
    NotDeployed,
    Deployed(Result<Vec<Collection>, String>),
}

pub async fn handler_homepage(State(ctx): State<Ctx>, headers: HeaderMap) -> Html<String> {
    let resolved = resolve_deployment(&ctx, &headers).await;

    Html(ui::render_page(&resolved, ctx.deploy))
}

/// Decides between the deployed and not-deployed views.
///
/// The sole signal is the platform header carrying the public deployment
/// URL. When it is absent no network call is made at all.
async fn resolve_deployment(ctx: &Ctx, headers: &HeaderMap) -> Resolved {
    let raw = headers
        .get(ctx.deploy.header_name())
        .and_then(|value| value.to_str().ok());

    let Some(raw) = raw else {
        return Resolved::NotDeployed;
    };

    let result = fetch_collections(&ctx.http, raw)
        .await
        .map_err(|err| err.to_string());

    if let Err(message) = &result {
        tracing::warn!("failed to fetch collections from deployment: {}", message);
    }

    Resolved::Deployed(result)
}

/// Fetches the collection listing through the deployment's public URL.
async fn fetch_collections(
    client: &reqwest::Client,
    raw_host: &str,
) -> Result<Vec<Collection>, anyhow::Error> {
    let url = deployment_url(raw_host)?;

    let res = client.get(url).send().await?;
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        // The endpoint always wraps failures in an error envelope, but a
        // network layer in between may answer with something else entirely.
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| format!("request failed with status {}", status));
        anyhow::bail!(message);
    }

    let data: CollectionsResponse =
        serde_json::from_str(&body).context("malformed collections response")?;

    Ok(data.collections)
}

/// Builds the collections endpoint URL from the header value.
///
/// Platform headers carry a bare host; a value with an explicit scheme is
/// used as-is so preview setups can point at plain-http deployments.
fn deployment_url(raw: &str) -> Result<Url, anyhow::Error> {
    let base = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let mut url: Url = base
        .parse()
        .with_context(|| format!("invalid deployment url: '{}'", raw))?;
    url.set_path(PATH_API_COLLECTIONS);

    Ok(url)
}
