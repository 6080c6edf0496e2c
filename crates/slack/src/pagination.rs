//! One pagination contract over Slack's two paging styles.
//!
//! Most list endpoints hand back an opaque `next_cursor`; `reactions.list`
//! counts pages instead. Both are adapted to [`PageFetcher`] so the
//! auto-fetch-all loop in [`paginate`] is written once.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ClassifiedError, ServiceResult};

pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRequest {
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub fetch_all: bool,
}

impl PaginationRequest {
    pub fn page(cursor: impl Into<String>, limit: i64) -> Self {
        Self { cursor: cursor.into(), limit, fetch_all: false }
    }

    pub fn all(limit: i64) -> Self {
        Self { cursor: String::new(), limit, fetch_all: true }
    }

    /// Page size actually sent upstream.
    pub fn effective_limit(&self) -> u32 {
        normalize_limit(self.limit)
    }
}

/// Non-positive limits fall back to [`DEFAULT_PAGE_SIZE`].
pub fn normalize_limit(limit: i64) -> u32 {
    if limit <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        u32::try_from(limit).unwrap_or(u32::MAX)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_cursor: String,
    pub has_more: bool,
}

impl<T> PaginatedResult<T> {
    pub fn complete(items: Vec<T>) -> Self {
        Self { items, next_cursor: String::new(), has_more: false }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

/// Fetches exactly one page at `cursor`. An empty cursor means the first page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Send + 'static;

    async fn fetch_page(&self, cursor: &str, limit: u32)
        -> ServiceResult<PaginatedResult<Self::Item>>;
}

/// A page from a cursor-token endpoint. `has_more` is the provider flag when
/// the endpoint reports one.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: String,
    pub has_more: Option<bool>,
}

#[async_trait]
pub trait CursorSource: Send + Sync {
    type Item: Send + 'static;

    async fn fetch_cursor_page(&self, cursor: &str, limit: u32)
        -> ServiceResult<CursorPage<Self::Item>>;
}

pub struct CursorPaging<S>(pub S);

#[async_trait]
impl<S: CursorSource> PageFetcher for CursorPaging<S> {
    type Item = S::Item;

    async fn fetch_page(
        &self,
        cursor: &str,
        limit: u32,
    ) -> ServiceResult<PaginatedResult<Self::Item>> {
        let page = self.0.fetch_cursor_page(cursor, limit).await?;
        let has_more = page.has_more.unwrap_or(!page.next_cursor.is_empty());
        Ok(PaginatedResult { items: page.items, next_cursor: page.next_cursor, has_more })
    }
}

/// Page `page` of `pages` from a page-numbered endpoint (1-based).
#[derive(Clone, Debug, PartialEq)]
pub struct NumberedPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub pages: u32,
}

#[async_trait]
pub trait NumberedSource: Send + Sync {
    type Item: Send + 'static;

    async fn fetch_numbered_page(&self, page: u32, limit: u32)
        -> ServiceResult<NumberedPage<Self::Item>>;
}

/// Presents a page-numbered endpoint through the cursor contract. The cursor
/// is the decimal page number to fetch next.
pub struct PageNumberPaging<S>(pub S);

fn parse_page_cursor(cursor: &str) -> ServiceResult<u32> {
    if cursor.is_empty() {
        return Ok(1);
    }
    match cursor.parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(ClassifiedError::invalid_input(
            "invalid_cursor",
            format!("cursor `{cursor}` is not a page number"),
        )),
    }
}

#[async_trait]
impl<S: NumberedSource> PageFetcher for PageNumberPaging<S> {
    type Item = S::Item;

    async fn fetch_page(
        &self,
        cursor: &str,
        limit: u32,
    ) -> ServiceResult<PaginatedResult<Self::Item>> {
        let requested = parse_page_cursor(cursor)?;
        let page = self.0.fetch_numbered_page(requested, limit).await?;
        let current = if page.page == 0 { requested } else { page.page };
        if current < page.pages {
            Ok(PaginatedResult {
                items: page.items,
                next_cursor: (current + 1).to_string(),
                has_more: true,
            })
        } else {
            Ok(PaginatedResult::complete(page.items))
        }
    }
}

/// Fetches one page, or every page from the request cursor onward when
/// `fetch_all` is set. Pages are appended strictly in cursor order.
pub async fn paginate<F>(
    fetcher: &F,
    request: &PaginationRequest,
) -> ServiceResult<PaginatedResult<F::Item>>
where
    F: PageFetcher + ?Sized,
{
    let limit = request.effective_limit();
    if !request.fetch_all {
        return fetcher.fetch_page(&request.cursor, limit).await;
    }

    let mut items = Vec::new();
    let mut cursor = request.cursor.clone();
    let mut pages = 0_u32;
    loop {
        let page = fetcher.fetch_page(&cursor, limit).await?;
        pages += 1;
        items.extend(page.items);
        if !page.has_more || page.next_cursor.is_empty() {
            break;
        }
        cursor = page.next_cursor;
    }

    debug!(pages, items = items.len(), "fetched all pages");
    Ok(PaginatedResult::complete(items))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{
        paginate, CursorPage, CursorPaging, CursorSource, NumberedPage, NumberedSource,
        PageFetcher, PageNumberPaging, PaginatedResult, PaginationRequest, DEFAULT_PAGE_SIZE,
    };
    use crate::errors::{ErrorCategory, ServiceResult};

    /// Pages keyed by the cursor that requests them, recording every call.
    struct ScriptedCursorSource {
        pages: Vec<(&'static str, Vec<&'static str>, &'static str)>,
        seen: Mutex<Vec<(String, u32)>>,
    }

    impl ScriptedCursorSource {
        fn three_pages() -> Self {
            Self {
                pages: vec![
                    ("", vec!["a", "b"], "C1"),
                    ("C1", vec!["c", "d"], "C2"),
                    ("C2", vec!["e"], ""),
                ],
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<(String, u32)> {
            self.seen.lock().expect("seen lock").clone()
        }
    }

    #[async_trait]
    impl CursorSource for ScriptedCursorSource {
        type Item = String;

        async fn fetch_cursor_page(
            &self,
            cursor: &str,
            limit: u32,
        ) -> ServiceResult<CursorPage<String>> {
            self.seen.lock().expect("seen lock").push((cursor.to_owned(), limit));
            let (_, items, next) = self
                .pages
                .iter()
                .find(|(key, _, _)| *key == cursor)
                .cloned()
                .unwrap_or(("", Vec::new(), ""));
            Ok(CursorPage {
                items: items.into_iter().map(str::to_owned).collect(),
                next_cursor: next.to_owned(),
                has_more: None,
            })
        }
    }

    struct Reactionish {
        pages: u32,
    }

    #[async_trait]
    impl NumberedSource for Reactionish {
        type Item = u32;

        async fn fetch_numbered_page(
            &self,
            page: u32,
            _limit: u32,
        ) -> ServiceResult<NumberedPage<u32>> {
            Ok(NumberedPage { items: vec![page * 10, page * 10 + 1], page, pages: self.pages })
        }
    }

    #[test]
    fn non_positive_limits_normalize_to_default() {
        assert_eq!(PaginationRequest::page("", 0).effective_limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(PaginationRequest::page("", -5).effective_limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(PaginationRequest::page("", 25).effective_limit(), 25);
    }

    #[tokio::test]
    async fn single_page_mode_passes_cursor_and_limit_through() {
        let fetcher = CursorPaging(ScriptedCursorSource::three_pages());
        let result =
            paginate(&fetcher, &PaginationRequest::page("C1", 2)).await.expect("page");

        assert_eq!(result.items, vec!["c", "d"]);
        assert_eq!(result.next_cursor, "C2");
        assert!(result.has_more);
        assert_eq!(fetcher.0.seen(), vec![("C1".to_owned(), 2)]);
    }

    #[tokio::test]
    async fn fetch_all_aggregates_pages_in_cursor_order() {
        let fetcher = CursorPaging(ScriptedCursorSource::three_pages());
        let result = paginate(&fetcher, &PaginationRequest::all(0)).await.expect("all pages");

        assert_eq!(result.items, vec!["a", "b", "c", "d", "e"]);
        assert!(!result.has_more);
        assert!(result.next_cursor.is_empty());
        assert_eq!(
            fetcher.0.seen(),
            vec![("".to_owned(), 100), ("C1".to_owned(), 100), ("C2".to_owned(), 100)]
        );
    }

    #[tokio::test]
    async fn fetch_all_with_empty_first_page_returns_nothing() {
        let fetcher = CursorPaging(ScriptedCursorSource {
            pages: Vec::new(),
            seen: Mutex::new(Vec::new()),
        });
        let result = paginate(&fetcher, &PaginationRequest::all(10)).await.expect("empty");

        assert!(result.items.is_empty());
        assert!(!result.has_more);
        assert_eq!(fetcher.0.seen().len(), 1);
    }

    #[tokio::test]
    async fn provider_has_more_flag_wins_over_cursor_presence() {
        struct Flagged;

        #[async_trait]
        impl CursorSource for Flagged {
            type Item = u8;

            async fn fetch_cursor_page(&self, _: &str, _: u32) -> ServiceResult<CursorPage<u8>> {
                Ok(CursorPage { items: vec![1], next_cursor: "stale".into(), has_more: Some(false) })
            }
        }

        let page = CursorPaging(Flagged).fetch_page("", 10).await.expect("page");
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn page_numbers_drive_the_loop() {
        let fetcher = PageNumberPaging(Reactionish { pages: 3 });

        let first = paginate(&fetcher, &PaginationRequest::page("", 2)).await.expect("first");
        assert_eq!(first, PaginatedResult { items: vec![10, 11], next_cursor: "2".into(), has_more: true });

        let last = paginate(&fetcher, &PaginationRequest::page("3", 2)).await.expect("last");
        assert!(!last.has_more);
        assert!(last.next_cursor.is_empty());

        let all = paginate(&fetcher, &PaginationRequest::all(2)).await.expect("all");
        assert_eq!(all.items, vec![10, 11, 20, 21, 30, 31]);
        assert!(!all.has_more);
    }

    #[tokio::test]
    async fn non_numeric_page_cursor_is_a_validation_error() {
        let fetcher = PageNumberPaging(Reactionish { pages: 3 });
        let error = paginate(&fetcher, &PaginationRequest::page("dXNlcjpVMDYx", 10))
            .await
            .expect_err("cursor should be rejected");
        assert_eq!(error.category, ErrorCategory::Validation);
    }

    #[test]
    fn empty_next_cursor_is_omitted_from_json() {
        let result = PaginatedResult::complete(vec![1, 2]);
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json, serde_json::json!({ "items": [1, 2], "has_more": false }));
    }
}
