//! Pure DataForSEO v3 REST API client.
//!
//! A minimal client covering the bulk endpoints used for harvesting: SERP task
//! queueing, live backlinks with cursor paging, the three bulk backlink
//! lookups, and on-page task posting with summary polling.
//!
//! Every call returns the raw response body so callers can persist it
//! verbatim; envelope status is checked before the body is handed back.
//!
//! # Example
//!
//! ```rust,ignore
//! use dataforseo_client::DataForSeoClient;
//!
//! let client = DataForSeoClient::new("login".into(), "password".into());
//!
//! let body = client.bulk_ranks(&["example.com".to_string()]).await?;
//! println!("{}", body);
//! ```

pub mod error;
pub mod types;

pub use error::{DataForSeoError, Result};
pub use types::{
    BacklinksMode, BacklinksQuery, BacklinksStatusType, CursorPage, Envelope, SerpTaskOptions,
    TaskEnvelope, BACKLINKS_PAGE_LIMIT, DEFAULT_MAX_CRAWL_PAGES, MAX_TASKS_PER_POST,
};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use types::{
    BacklinksResult, BacklinksTask, BulkTargetsTask, OnPageTask, SerpTask, STATUS_OK,
    STATUS_TASK_CREATED,
};

pub const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com/v3";

pub struct DataForSeoClient {
    client: reqwest::Client,
    base_url: String,
    login: String,
    password: String,
}

impl DataForSeoClient {
    pub fn new(login: String, password: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            login,
            password,
        }
    }

    /// Point the client at another host (sandbox, proxy, test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Queue one SERP task per keyword. Returns the raw `task_post` response.
    pub async fn post_serp_tasks(
        &self,
        keywords: &[String],
        options: &SerpTaskOptions,
    ) -> Result<String> {
        let tasks: Vec<SerpTask<'_>> = keywords
            .iter()
            .map(|keyword| SerpTask {
                keyword,
                location_code: options.location_code,
                language_code: &options.language_code,
                depth: options.depth,
                priority: options.priority,
            })
            .collect();

        let (body, envelope) = self.post("/serp/google/organic/task_post", &tasks).await?;

        let rejected = envelope
            .tasks
            .iter()
            .filter(|t| t.status_code != STATUS_TASK_CREATED)
            .count();
        if rejected > 0 {
            tracing::warn!(rejected, total = tasks.len(), "Some SERP tasks were not created");
        }

        Ok(body)
    }

    /// Fetch one page of live backlinks for a target.
    ///
    /// `count` is the number of items already received for this target and
    /// `token` the `search_after_token` from the previous page.
    pub async fn backlinks_live(
        &self,
        query: &BacklinksQuery,
        count: u64,
        token: Option<&str>,
    ) -> Result<CursorPage> {
        let task = BacklinksTask {
            target: &query.target,
            mode: query.mode,
            include_subdomains: query.include_subdomains,
            backlinks_status_type: query.status_type,
            limit: query.limit,
            search_after_token: token,
        };

        let (body, envelope) = self.post("/backlinks/backlinks/live", &[task]).await?;
        let (has_more, next_token, count) = backlinks_cursor(&envelope, count)?;

        tracing::debug!(domain = %query.target, count, has_more, "Fetched backlinks page");

        Ok(CursorPage {
            payload: body,
            has_more,
            next_token,
            count,
        })
    }

    /// Rank overview for up to 1000 targets in one call.
    pub async fn bulk_ranks(&self, targets: &[String]) -> Result<String> {
        self.bulk("/backlinks/bulk_ranks/live", targets, None).await
    }

    /// Referring domain counts for up to 1000 targets in one call.
    pub async fn bulk_referring_domains(&self, targets: &[String]) -> Result<String> {
        self.bulk("/backlinks/bulk_referring_domains/live", targets, None)
            .await
    }

    /// New and lost referring domains since `from_month` (`YYYY-MM` or `YYYY-MM-DD`).
    pub async fn bulk_new_lost_referring_domains(
        &self,
        targets: &[String],
        from_month: &str,
    ) -> Result<String> {
        let date_from = normalize_month(from_month)?;
        self.bulk(
            "/backlinks/bulk_new_lost_referring_domains/live",
            targets,
            Some(date_from),
        )
        .await
    }

    /// Post one on-page crawl task per target. Returns the created task ids.
    pub async fn post_on_page_tasks(
        &self,
        targets: &[String],
        max_crawl_pages: u32,
    ) -> Result<Vec<String>> {
        let tasks: Vec<OnPageTask<'_>> = targets
            .iter()
            .map(|target| OnPageTask {
                target,
                max_crawl_pages,
            })
            .collect();

        let (_, envelope) = self.post("/on_page/task_post", &tasks).await?;
        created_task_ids(&envelope)
    }

    /// Fetch the crawl summary of one on-page task.
    pub async fn on_page_summary(&self, task_id: &str) -> Result<String> {
        let url = format!("{}/on_page/summary/{}", self.base_url, task_id);
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.login, Some(&self.password))
            .send()
            .await?;

        let (body, _) = read_response(resp).await?;
        Ok(body)
    }

    async fn bulk(
        &self,
        path: &str,
        targets: &[String],
        date_from: Option<String>,
    ) -> Result<String> {
        let task = BulkTargetsTask { targets, date_from };
        let (body, envelope) = self.post(path, &[task]).await?;
        first_task(&envelope)?;
        Ok(body)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(String, Envelope)> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.login, Some(&self.password))
            .json(body)
            .send()
            .await?;

        read_response(resp).await
    }
}

async fn read_response(resp: reqwest::Response) -> Result<(String, Envelope)> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(DataForSeoError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = resp.text().await?;
    let envelope = parse_envelope(&body)?;
    Ok((body, envelope))
}

/// Parse a response body and reject envelopes whose status is not 20000.
pub fn parse_envelope(body: &str) -> Result<Envelope> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if envelope.status_code != STATUS_OK {
        return Err(DataForSeoError::Api {
            status: 200,
            message: format!("{} {}", envelope.status_code, envelope.status_message),
        });
    }
    Ok(envelope)
}

fn first_task(envelope: &Envelope) -> Result<&TaskEnvelope> {
    let task = envelope.tasks.first().ok_or_else(|| DataForSeoError::Api {
        status: 200,
        message: "response contained no tasks".to_string(),
    })?;

    if task.status_code != STATUS_OK {
        return Err(DataForSeoError::Task {
            status: task.status_code,
            message: task.status_message.clone(),
        });
    }
    Ok(task)
}

/// Work out `(has_more, next_token, count)` from a backlinks page.
fn backlinks_cursor(envelope: &Envelope, running_count: u64) -> Result<(bool, Option<String>, u64)> {
    let task = first_task(envelope)?;
    let result = match task.result.as_ref().and_then(|r| r.first()) {
        Some(value) => serde_json::from_value::<BacklinksResult>(value.clone())?,
        None => return Ok((false, None, running_count)),
    };

    let count = running_count + result.items_count;
    let has_more =
        result.search_after_token.is_some() && result.items_count > 0 && count < result.total_count;

    Ok((has_more, result.search_after_token, count))
}

fn created_task_ids(envelope: &Envelope) -> Result<Vec<String>> {
    envelope
        .tasks
        .iter()
        .map(|task| {
            if task.status_code == STATUS_TASK_CREATED {
                Ok(task.id.clone())
            } else {
                Err(DataForSeoError::Task {
                    status: task.status_code,
                    message: task.status_message.clone(),
                })
            }
        })
        .collect()
}

/// Normalize `YYYY-MM` or `YYYY-MM-DD` to the first day of that month.
pub fn normalize_month(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d"))
        .map_err(|_| DataForSeoError::InvalidDate(input.to_string()))?;

    let first = date
        .with_day(1)
        .ok_or_else(|| DataForSeoError::InvalidDate(input.to_string()))?;
    Ok(first.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: serde_json::Value) -> Envelope {
        parse_envelope(&body.to_string()).unwrap()
    }

    #[test]
    fn rejects_envelope_with_error_status() {
        let body = r#"{"status_code": 40100, "status_message": "Unauthorized", "tasks": []}"#;
        let err = parse_envelope(body).unwrap_err();
        assert!(matches!(err, DataForSeoError::Api { .. }));
        assert!(err.to_string().contains("40100"));
    }

    #[test]
    fn backlinks_cursor_continues_until_total_reached() {
        let page = envelope(serde_json::json!({
            "status_code": 20000,
            "tasks": [{
                "id": "t1",
                "status_code": 20000,
                "result": [{"total_count": 2500, "items_count": 1000, "search_after_token": "abc"}]
            }]
        }));

        let (has_more, token, count) = backlinks_cursor(&page, 1000).unwrap();
        assert!(has_more);
        assert_eq!(token.as_deref(), Some("abc"));
        assert_eq!(count, 2000);

        let (has_more, _, count) = backlinks_cursor(&page, 1500).unwrap();
        assert!(!has_more);
        assert_eq!(count, 2500);
    }

    #[test]
    fn backlinks_cursor_stops_on_empty_page() {
        let page = envelope(serde_json::json!({
            "status_code": 20000,
            "tasks": [{
                "id": "t1",
                "status_code": 20000,
                "result": [{"total_count": 10, "items_count": 0, "search_after_token": "abc"}]
            }]
        }));

        let (has_more, _, count) = backlinks_cursor(&page, 4).unwrap();
        assert!(!has_more);
        assert_eq!(count, 4);
    }

    #[test]
    fn failed_task_is_an_error() {
        let page = envelope(serde_json::json!({
            "status_code": 20000,
            "tasks": [{"id": "t1", "status_code": 40501, "status_message": "Invalid Field"}]
        }));

        let err = backlinks_cursor(&page, 0).unwrap_err();
        assert!(matches!(err, DataForSeoError::Task { status: 40501, .. }));
    }

    #[test]
    fn created_task_ids_require_every_task_created() {
        let ok = envelope(serde_json::json!({
            "status_code": 20000,
            "tasks": [
                {"id": "a", "status_code": 20100},
                {"id": "b", "status_code": 20100}
            ]
        }));
        assert_eq!(created_task_ids(&ok).unwrap(), vec!["a", "b"]);

        let partial = envelope(serde_json::json!({
            "status_code": 20000,
            "tasks": [
                {"id": "a", "status_code": 20100},
                {"id": "b", "status_code": 40006, "status_message": "too many tasks"}
            ]
        }));
        assert!(created_task_ids(&partial).is_err());
    }

    #[test]
    fn normalizes_month_inputs() {
        assert_eq!(normalize_month("2024-03").unwrap(), "2024-03-01");
        assert_eq!(normalize_month("2024-03-17").unwrap(), "2024-03-01");
        assert!(normalize_month("March").is_err());
    }

    #[test]
    fn backlinks_task_omits_missing_token() {
        let task = BacklinksTask {
            target: "example.com",
            mode: BacklinksMode::OnePerDomain,
            include_subdomains: true,
            backlinks_status_type: BacklinksStatusType::Live,
            limit: BACKLINKS_PAGE_LIMIT,
            search_after_token: None,
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["mode"], "one_per_domain");
        assert_eq!(json["backlinks_status_type"], "live");
        assert!(json.get("search_after_token").is_none());
    }
}
