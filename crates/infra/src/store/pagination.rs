//! Offset pagination.
//!
//! Pages are requested sequentially with `limit = page_size` and a growing
//! offset until a page comes back shorter than `page_size`. A fetch that would
//! need more than `max_pages` requests fails with
//! [`StoreError::PageLimitExceeded`] instead of looping forever.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::config::PageLimits;

use super::{DocumentStore, Query, StoreError};

/// Drive `fetch_page(offset, limit)` until a short page.
pub async fn paginate<T, F, Fut>(limits: PageLimits, mut fetch_page: F) -> Result<Vec<T>, StoreError>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, StoreError>>,
{
    let page_size = limits.page_size.max(1);
    let mut out = Vec::new();
    let mut offset = 0;

    for _ in 0..limits.max_pages {
        let page = fetch_page(offset, page_size).await?;
        let len = page.len();
        out.extend(page);
        if len < page_size {
            return Ok(out);
        }
        offset += len;
    }

    Err(StoreError::PageLimitExceeded {
        max_pages: limits.max_pages,
    })
}

/// Fetch every document of a collection matching `filters`, decoded as `T`.
pub async fn fetch_all<T, S>(
    store: &S,
    database_id: &str,
    collection_id: &str,
    filters: &[Query],
    limits: PageLimits,
) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    let raw = paginate(limits, |offset, limit| {
        let mut queries = filters.to_vec();
        queries.push(Query::limit(limit));
        queries.push(Query::offset(offset));
        async move {
            let page = store.list_documents(database_id, collection_id, &queries).await?;
            tracing::trace!(
                collection = collection_id,
                offset,
                returned = page.documents.len(),
                total = page.total,
                "fetched page"
            );
            Ok(page.documents)
        }
    })
    .await?;

    raw.into_iter()
        .enumerate()
        .map(|(i, doc)| {
            serde_json::from_value(doc)
                .map_err(|e| StoreError::decode(format!("{collection_id} document #{i}"), e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn limits(page_size: usize, max_pages: usize) -> PageLimits {
        PageLimits { page_size, max_pages }
    }

    /// Serves `total` integers and records each requested (offset, limit).
    struct Source {
        total: usize,
        calls: Mutex<Vec<(usize, usize)>>,
    }

    impl Source {
        fn new(total: usize) -> Self {
            Self {
                total,
                calls: Mutex::new(Vec::new()),
            }
        }

        async fn page(&self, offset: usize, limit: usize) -> Result<Vec<usize>, StoreError> {
            self.calls.lock().unwrap().push((offset, limit));
            Ok((offset..(offset + limit).min(self.total)).collect())
        }
    }

    #[tokio::test]
    async fn two_hundred_fifty_items_take_three_calls() {
        let src = Source::new(250);
        let items = paginate(limits(100, 1000), |o, l| src.page(o, l)).await.unwrap();

        assert_eq!(items.len(), 250);
        assert_eq!(items, (0..250).collect::<Vec<_>>());
        assert_eq!(*src.calls.lock().unwrap(), vec![(0, 100), (100, 100), (200, 100)]);
    }

    #[tokio::test]
    async fn exact_multiple_needs_a_trailing_empty_page() {
        let src = Source::new(200);
        let items = paginate(limits(100, 1000), |o, l| src.page(o, l)).await.unwrap();
        assert_eq!(items.len(), 200);
        assert_eq!(src.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn empty_source_takes_one_call() {
        let src = Source::new(0);
        let items = paginate(limits(100, 1000), |o, l| src.page(o, l)).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(src.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn always_full_pages_hit_the_cap() {
        let src = Source::new(usize::MAX);
        let err = paginate(limits(10, 5), |o, l| src.page(o, l)).await.unwrap_err();
        assert!(matches!(err, StoreError::PageLimitExceeded { max_pages: 5 }));
        assert_eq!(src.calls.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn failed_page_aborts_the_fetch() {
        let mut calls = 0;
        let result: Result<Vec<u8>, _> = paginate(limits(1, 10), |_, _| {
            calls += 1;
            let fail = calls == 2;
            async move {
                if fail {
                    Err(StoreError::Transport("connection reset".to_string()))
                } else {
                    Ok(vec![1])
                }
            }
        })
        .await;

        assert!(matches!(result, Err(StoreError::Transport(_))));
        assert_eq!(calls, 2);
    }
}
