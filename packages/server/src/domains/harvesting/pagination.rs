//! Paging strategies over an in-memory source set.
//!
//! - [`OffsetPager`]: skip/take windows; stops after the first short page
//! - [`BulkBatches`]: fixed-size batches; stops once `(page+1)*size >= total`
//! - [`drain_cursor`]: token-threaded calls for one source item

use std::future::Future;

use anyhow::{bail, Result};
use dataforseo_client::CursorPage;

/// One window of the source set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub index: usize,
    pub items: &'a [T],
}

impl<T> Page<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Offset-window pages.
///
/// Yields full pages while they stay full, then the final short page. When
/// the source length is an exact multiple of the page size (or zero), the
/// final page yielded is empty; callers skip the provider call for it.
#[derive(Debug)]
pub struct OffsetPager<'a, T> {
    items: &'a [T],
    page_size: usize,
    page: usize,
    done: bool,
}

impl<'a, T> OffsetPager<'a, T> {
    pub fn new(items: &'a [T], page_size: usize) -> Result<Self> {
        if page_size == 0 {
            bail!("Page size must be greater than zero");
        }
        Ok(Self {
            items,
            page_size,
            page: 0,
            done: false,
        })
    }
}

impl<'a, T> Iterator for OffsetPager<'a, T> {
    type Item = Page<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = (self.page * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        let items = &self.items[start..end];

        if items.len() < self.page_size {
            self.done = true;
        }

        let page = Page {
            index: self.page,
            items,
        };
        self.page += 1;
        Some(page)
    }
}

/// Fixed-size batches for bulk calls. An empty source yields nothing.
#[derive(Debug)]
pub struct BulkBatches<'a, T> {
    items: &'a [T],
    max_per_call: usize,
    page: usize,
}

impl<'a, T> BulkBatches<'a, T> {
    pub fn new(items: &'a [T], max_per_call: usize) -> Result<Self> {
        if max_per_call == 0 {
            bail!("Batch size must be greater than zero");
        }
        Ok(Self {
            items,
            max_per_call,
            page: 0,
        })
    }
}

impl<'a, T> Iterator for BulkBatches<'a, T> {
    type Item = Page<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.page * self.max_per_call;
        if start >= self.items.len() {
            return None;
        }

        let end = (start + self.max_per_call).min(self.items.len());
        let page = Page {
            index: self.page,
            items: &self.items[start..end],
        };
        self.page += 1;
        Some(page)
    }
}

/// Everything returned by one item's cursor session.
#[derive(Debug, Default)]
pub struct CursorDrain {
    pub payloads: Vec<String>,
    pub calls: usize,
    /// Running count reported by the last call
    pub count: u64,
}

/// Call `fetch(count, token)` until the provider says there is nothing more.
///
/// There is no iteration cap: a provider that never ends the cursor keeps
/// this loop running.
pub async fn drain_cursor<F, Fut>(mut fetch: F) -> Result<CursorDrain>
where
    F: FnMut(u64, Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage>>,
{
    let mut drain = CursorDrain::default();
    let mut token: Option<String> = None;

    loop {
        let page = fetch(drain.count, token.take()).await?;
        drain.calls += 1;
        drain.count = page.count;
        drain.payloads.push(page.payload);

        if !page.has_more {
            return Ok(drain);
        }
        token = page.next_token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes<'a, T: 'a>(pages: impl Iterator<Item = Page<'a, T>>) -> Vec<usize> {
        pages.map(|p| p.items.len()).collect()
    }

    #[test]
    fn offset_pager_processes_short_last_page() {
        let items: Vec<u32> = (0..250).collect();
        let pages: Vec<_> = OffsetPager::new(&items, 100).unwrap().collect();

        assert_eq!(sizes(pages.iter().copied()), vec![100, 100, 50]);
        let visited: Vec<u32> = pages.iter().flat_map(|p| p.items.iter().copied()).collect();
        assert_eq!(visited, items);
    }

    #[test]
    fn offset_pager_observes_trailing_empty_page_on_exact_multiple() {
        let items: Vec<u32> = (0..300).collect();
        let pages = OffsetPager::new(&items, 100).unwrap();

        assert_eq!(sizes(pages), vec![100, 100, 100, 0]);
    }

    #[test]
    fn offset_pager_on_empty_source_yields_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let pages: Vec<_> = OffsetPager::new(&items, 100).unwrap().collect();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let items = [1, 2, 3];
        assert!(OffsetPager::new(&items, 0).is_err());
        assert!(BulkBatches::new(&items, 0).is_err());
    }

    #[test]
    fn bulk_batches_split_2500_into_three() {
        let items: Vec<u32> = (0..2500).collect();
        let batches = BulkBatches::new(&items, 1000).unwrap();

        assert_eq!(sizes(batches), vec![1000, 1000, 500]);
    }

    #[test]
    fn bulk_batches_exact_multiple_has_no_empty_batch() {
        let items: Vec<u32> = (0..2000).collect();
        assert_eq!(sizes(BulkBatches::new(&items, 1000).unwrap()), vec![1000, 1000]);
    }

    #[test]
    fn bulk_batches_on_empty_source_yield_nothing() {
        let items: Vec<u32> = Vec::new();
        assert_eq!(BulkBatches::new(&items, 1000).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn drain_cursor_threads_token_and_count() {
        let mut seen = Vec::new();
        let drain = drain_cursor(|count, token| {
            seen.push((count, token.clone()));
            let step = seen.len() as u64;
            async move {
                Ok(CursorPage {
                    payload: format!("page-{}", step),
                    has_more: step < 3,
                    next_token: Some(format!("t{}", step)),
                    count: count + 10,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(drain.calls, 3);
        assert_eq!(drain.count, 30);
        assert_eq!(drain.payloads, vec!["page-1", "page-2", "page-3"]);
        assert_eq!(
            seen,
            vec![
                (0, None),
                (10, Some("t1".to_string())),
                (20, Some("t2".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn drain_cursor_stops_at_first_error() {
        let mut calls = 0;
        let result = drain_cursor(|count, _| {
            calls += 1;
            let call = calls;
            async move {
                if call == 2 {
                    anyhow::bail!("provider exploded");
                }
                Ok(CursorPage {
                    payload: "p".to_string(),
                    has_more: true,
                    next_token: None,
                    count: count + 1,
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 2);
    }
}
