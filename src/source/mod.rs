use std::future::Future;

pub mod fauna;
pub mod lister;
#[cfg(test)]
pub mod mock;

/// A named collection as exposed through the API contract.
///
/// The upstream documents carry more fields; `name` is the only one that is
/// part of this app's contract.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
}

/// Opaque reference to a collection, as returned by the paginated listing.
///
/// The wire shape belongs to the upstream service and is passed back verbatim
/// when resolving references to full descriptors.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct CollectionRef(pub serde_json::Value);

/// Fully resolved collection document. Unknown wire fields are ignored.
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CollectionDescriptor {
    pub name: String,
}

/// Opaque pagination continuation token.
///
/// Never exposed through this app's own API; only handed back to the
/// upstream service to request the next page.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cursor(pub serde_json::Value);

/// One page of a paginated upstream result set.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub after: Option<Cursor>,
}

/// Query operations of the upstream document database.
pub trait Database {
    /// List one page of collection references, continuing from `after` if
    /// given.
    fn collection_refs(
        &self,
        after: Option<Cursor>,
    ) -> impl Future<Output = Result<Page<CollectionRef>, anyhow::Error>> + Send;

    /// Resolve a batch of references to full descriptors, in the order given.
    fn resolve_refs(
        &self,
        refs: Vec<CollectionRef>,
    ) -> impl Future<Output = Result<Vec<CollectionDescriptor>, anyhow::Error>> + Send;
}

#[derive(Clone)]
pub enum Db {
    Fauna(fauna::FaunaClient),
    #[cfg(test)]
    Mock(mock::MockDb),
}

impl From<fauna::FaunaClient> for Db {
    fn from(client: fauna::FaunaClient) -> Self {
        Db::Fauna(client)
    }
}

impl Database for Db {
    async fn collection_refs(
        &self,
        after: Option<Cursor>,
    ) -> Result<Page<CollectionRef>, anyhow::Error> {
        match self {
            Db::Fauna(fauna) => fauna.collection_refs(after).await,
            #[cfg(test)]
            Db::Mock(mock) => mock.collection_refs(after).await,
        }
    }

    async fn resolve_refs(
        &self,
        refs: Vec<CollectionRef>,
    ) -> Result<Vec<CollectionDescriptor>, anyhow::Error> {
        match self {
            Db::Fauna(fauna) => fauna.resolve_refs(refs).await,
            #[cfg(test)]
            Db::Mock(mock) => mock.resolve_refs(refs).await,
        }
    }
}
