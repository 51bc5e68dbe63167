use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{CollectionDescriptor, CollectionRef, Cursor, Database, Page};

#[derive(Default)]
struct MockState {
    pages: Vec<Vec<String>>,
    refs_calls: usize,
    resolve_calls: usize,
    fail_refs_at_page: Option<usize>,
    fail_resolve: bool,
}

/// Scripted in-memory database with call counters.
///
/// Pages are served in order; the cursor is the index of the next page.
#[derive(Clone, Default)]
pub struct MockDb {
    state: Arc<Mutex<MockState>>,
}

impl MockDb {
    pub fn with_pages(pages: Vec<Vec<&str>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| page.into_iter().map(|name| name.to_string()).collect())
            .collect();

        Self {
            state: Arc::new(Mutex::new(MockState {
                pages,
                ..MockState::default()
            })),
        }
    }

    pub fn fail_refs_at_page(&self, index: usize) {
        self.state.lock().expect("mutex poisoned").fail_refs_at_page = Some(index);
    }

    pub fn fail_resolve(&self) {
        self.state.lock().expect("mutex poisoned").fail_resolve = true;
    }

    pub fn collection_refs_calls(&self) -> usize {
        self.state.lock().expect("mutex poisoned").refs_calls
    }

    pub fn resolve_refs_calls(&self) -> usize {
        self.state.lock().expect("mutex poisoned").resolve_calls
    }

    fn ref_for(name: &str) -> CollectionRef {
        CollectionRef(json!({ "@ref": { "id": name } }))
    }

    fn ref_name(r: &CollectionRef) -> String {
        r.0["@ref"]["id"]
            .as_str()
            .expect("malformed mock collection ref")
            .to_string()
    }
}

impl Database for MockDb {
    async fn collection_refs(
        &self,
        after: Option<Cursor>,
    ) -> Result<Page<CollectionRef>, anyhow::Error> {
        let mut state = self.state.lock().expect("mutex poisoned");
        state.refs_calls += 1;

        let index = after
            .and_then(|c| c.0.as_u64())
            .map(|i| i as usize)
            .unwrap_or(0);

        if state.fail_refs_at_page == Some(index) {
            anyhow::bail!("transaction aborted");
        }

        let page = state
            .pages
            .get(index)
            .cloned()
            .unwrap_or_default();

        let after = if index + 1 < state.pages.len() {
            Some(Cursor(json!(index as u64 + 1)))
        } else {
            None
        };

        Ok(Page {
            data: page.iter().map(|name| Self::ref_for(name)).collect(),
            after,
        })
    }

    async fn resolve_refs(
        &self,
        refs: Vec<CollectionRef>,
    ) -> Result<Vec<CollectionDescriptor>, anyhow::Error> {
        let mut state = self.state.lock().expect("mutex poisoned");
        state.resolve_calls += 1;

        if state.fail_resolve {
            anyhow::bail!("resolve rejected");
        }

        Ok(refs
            .iter()
            .map(|r| CollectionDescriptor {
                name: Self::ref_name(r),
            })
            .collect())
    }
}
