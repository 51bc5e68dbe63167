use super::{Collection, Database, Db};

/// Fetches the complete collection listing from the database.
///
/// One logical transaction with no retry. Pages are fetched sequentially and
/// each page's refs are resolved with a single batched query before the next
/// page is requested. Any failure aborts the whole listing; partial results
/// are never returned.
#[derive(Clone)]
pub struct CollectionLister {
    db: Db,
}

impl CollectionLister {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>, anyhow::Error> {
        let mut collections = Vec::new();
        let mut after = None;

        loop {
            let page = self.db.collection_refs(after).await?;
            tracing::trace!(refs = page.data.len(), "fetched collection refs page");

            let descriptors = self.db.resolve_refs(page.data).await?;
            collections.extend(descriptors.into_iter().map(|d| Collection { name: d.name }));

            match page.after {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        tracing::debug!(count = collections.len(), "collection listing complete");

        Ok(collections)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::source::mock::MockDb;

    use super::*;

    fn names(collections: &[Collection]) -> Vec<&str> {
        collections.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_collections_preserves_page_order() {
        let mock = MockDb::with_pages(vec![vec!["A"], vec!["B", "C"]]);
        let lister = CollectionLister::new(Db::Mock(mock.clone()));

        let collections = lister.list_collections().await.unwrap();

        assert_eq!(names(&collections), vec!["A", "B", "C"]);
        // One refs call and one batched resolve call per page.
        assert_eq!(mock.collection_refs_calls(), 2);
        assert_eq!(mock.resolve_refs_calls(), 2);
    }

    #[tokio::test]
    async fn test_list_collections_empty() {
        let mock = MockDb::with_pages(vec![vec![]]);
        let lister = CollectionLister::new(Db::Mock(mock.clone()));

        let collections = lister.list_collections().await.unwrap();

        assert!(collections.is_empty());
        assert_eq!(mock.collection_refs_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_collections_aborts_on_page_failure() {
        let mock = MockDb::with_pages(vec![vec!["A"], vec!["B"]]);
        mock.fail_refs_at_page(1);
        let lister = CollectionLister::new(Db::Mock(mock.clone()));

        let err = lister.list_collections().await.unwrap_err();

        assert!(err.to_string().contains("transaction aborted"));
        // The first page was fetched and resolved, the second failed before
        // any resolve.
        assert_eq!(mock.collection_refs_calls(), 2);
        assert_eq!(mock.resolve_refs_calls(), 1);
    }

    #[tokio::test]
    async fn test_list_collections_aborts_on_resolve_failure() {
        let mock = MockDb::with_pages(vec![vec!["A"]]);
        mock.fail_resolve();
        let lister = CollectionLister::new(Db::Mock(mock.clone()));

        assert!(lister.list_collections().await.is_err());
        assert_eq!(mock.resolve_refs_calls(), 1);
    }
}
