use std::time::Duration;

use anyhow::Context;
use base64::Engine;
use url::Url;
use wire::QueryResponse;

use super::{CollectionDescriptor, CollectionRef, Cursor, Database, Page};

pub const DEFAULT_ENDPOINT: &str = "https://db.fauna.com";

/// Client for the FaunaDB core HTTP API.
///
/// Queries are FQL expressions in the JSON wire format, POSTed to the
/// endpoint root. The secret acts as the username of an HTTP Basic
/// credential with an empty password.
#[derive(Clone)]
pub struct FaunaClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl FaunaClient {
    pub fn new(secret: &str) -> Self {
        Self::with_endpoint(secret, DEFAULT_ENDPOINT.parse().unwrap())
    }

    pub fn with_endpoint(secret: &str, endpoint: Url) -> Self {
        let credential = base64::engine::general_purpose::STANDARD.encode(format!("{}:", secret));

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Basic {}", credential)
                .parse()
                .expect("Invalid Fauna secret"),
        );

        let client = reqwest::Client::builder()
            .user_agent("faunalist")
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        FaunaClient { client, endpoint }
    }

    async fn query<D>(&self, expr: serde_json::Value) -> Result<D, anyhow::Error>
    where
        D: serde::de::DeserializeOwned,
    {
        let res = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&expr)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = deserialize_json::<wire::ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.errors.into_iter().next())
                .map(|e| e.description)
                .unwrap_or_else(|| format!("query failed with status {}", status));
            anyhow::bail!("FaunaDB query failed: {}", message);
        }

        let data: QueryResponse<D> = match deserialize_json(&body) {
            Ok(v) => v,
            Err(err) => Err(err).context("failed to parse json response")?,
        };

        Ok(data.resource)
    }
}

impl Database for FaunaClient {
    async fn collection_refs(
        &self,
        after: Option<Cursor>,
    ) -> Result<Page<CollectionRef>, anyhow::Error> {
        let page: wire::PageData<CollectionRef> =
            self.query(wire::paginate_collections(after.as_ref())).await?;

        Ok(Page {
            data: page.data,
            after: page.after,
        })
    }

    async fn resolve_refs(
        &self,
        refs: Vec<CollectionRef>,
    ) -> Result<Vec<CollectionDescriptor>, anyhow::Error> {
        if refs.is_empty() {
            return Ok(Vec::new());
        }

        self.query(wire::get_refs(&refs)).await
    }
}

mod wire {
    use serde::Deserialize;
    use serde_json::json;

    use crate::source::{CollectionRef, Cursor};

    /// `Paginate(Collections())`, continuing from `after` if given.
    pub fn paginate_collections(after: Option<&Cursor>) -> serde_json::Value {
        let mut expr = json!({ "paginate": { "collections": null } });
        if let Some(after) = after {
            expr["after"] = after.0.clone();
        }
        expr
    }

    /// `Map(refs, Lambda("ref", Get(Var("ref"))))`.
    pub fn get_refs(refs: &[CollectionRef]) -> serde_json::Value {
        json!({
            "map": { "lambda": "ref", "expr": { "get": { "var": "ref" } } },
            "collection": refs,
        })
    }

    #[derive(Deserialize, Debug)]
    pub struct QueryResponse<T> {
        pub resource: T,
    }

    #[derive(Deserialize, Debug)]
    pub struct PageData<T> {
        pub data: Vec<T>,
        #[serde(default)]
        pub after: Option<Cursor>,
    }

    #[derive(Deserialize, Debug)]
    pub struct ErrorResponse {
        pub errors: Vec<Error>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Error {
        #[allow(dead_code)]
        pub code: Option<String>,
        pub description: String,
    }
}

fn deserialize_json<T>(raw: &str) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
    T: serde::de::DeserializeOwned,
{
    let jd = &mut serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(jd)
}
