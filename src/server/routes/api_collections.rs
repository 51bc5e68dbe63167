use axum::{extract::State, http::StatusCode, Json};

use crate::{
    server::{ApiError, Ctx},
    source::Collection,
};

pub const PATH_API_COLLECTIONS: &str = "/api/collections";

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct CollectionsResponse {
    pub collections: Vec<Collection>,
}

pub async fn handler_api_collections(
    State(ctx): State<Ctx>,
) -> Result<Json<CollectionsResponse>, ApiError> {
    let Some(lister) = &ctx.lister else {
        return Err(ApiError::msg(
            "Missing secret to connect to FaunaDB",
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    };

    let collections = lister.list_collections().await?;

    Ok(Json(CollectionsResponse { collections }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        server::test_client_with_db,
        source::{mock::MockDb, Db},
    };

    use super::*;

    #[tokio::test]
    async fn test_api_collections_without_secret() {
        let client = test_client_with_db(None).await;

        let res = client.get(PATH_API_COLLECTIONS).send().await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = res.json().await;
        assert_eq!(
            body["error"]["message"],
            "Missing secret to connect to FaunaDB"
        );
        assert!(body.get("collections").is_none());
    }

    #[tokio::test]
    async fn test_api_collections_concatenates_pages_in_order() {
        let mock = MockDb::with_pages(vec![vec!["A"], vec!["B", "C"]]);
        let client = test_client_with_db(Some(Db::Mock(mock.clone()))).await;

        let res = client.get(PATH_API_COLLECTIONS).send().await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: CollectionsResponse = res.json().await;
        let names: Vec<_> = body.collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(mock.collection_refs_calls(), 2);
    }

    #[tokio::test]
    async fn test_api_collections_upstream_failure_returns_no_partial_data() {
        let mock = MockDb::with_pages(vec![vec!["A"], vec!["B"]]);
        mock.fail_refs_at_page(1);
        let client = test_client_with_db(Some(Db::Mock(mock))).await;

        let res = client.get(PATH_API_COLLECTIONS).send().await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = res.json().await;
        assert!(body.get("collections").is_none());
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("transaction aborted"));
    }
}
