use anyhow::{Context, Result};
use async_trait::async_trait;
use dataforseo_client::{BacklinksQuery, CursorPage, DataForSeoClient, SerpTaskOptions};

use super::BaseDataProvider;

/// DataForSEO client implementation of BaseDataProvider
pub struct DataForSeoProvider {
    client: DataForSeoClient,
}

impl DataForSeoProvider {
    pub fn new(login: String, password: String, base_url: Option<String>) -> Self {
        let client = DataForSeoClient::new(login, password);
        let client = match base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        };

        Self { client }
    }
}

#[async_trait]
impl BaseDataProvider for DataForSeoProvider {
    async fn queue_serp_tasks(
        &self,
        keywords: &[String],
        options: &SerpTaskOptions,
    ) -> Result<String> {
        self.client
            .post_serp_tasks(keywords, options)
            .await
            .context("DataForSEO SERP task_post failed")
    }

    async fn backlinks_page(
        &self,
        query: &BacklinksQuery,
        count: u64,
        token: Option<&str>,
    ) -> Result<CursorPage> {
        self.client
            .backlinks_live(query, count, token)
            .await
            .with_context(|| format!("DataForSEO backlinks live failed for {}", query.target))
    }

    async fn bulk_ranks(&self, targets: &[String]) -> Result<String> {
        self.client
            .bulk_ranks(targets)
            .await
            .context("DataForSEO bulk ranks failed")
    }

    async fn bulk_referring_domains(&self, targets: &[String]) -> Result<String> {
        self.client
            .bulk_referring_domains(targets)
            .await
            .context("DataForSEO bulk referring domains failed")
    }

    async fn bulk_new_lost(&self, targets: &[String], from_month: &str) -> Result<String> {
        self.client
            .bulk_new_lost_referring_domains(targets, from_month)
            .await
            .context("DataForSEO bulk new/lost referring domains failed")
    }

    async fn post_on_page_tasks(
        &self,
        targets: &[String],
        max_crawl_pages: u32,
    ) -> Result<Vec<String>> {
        self.client
            .post_on_page_tasks(targets, max_crawl_pages)
            .await
            .context("DataForSEO on-page task_post failed")
    }

    async fn fetch_on_page_results(&self, task_ids: &[String]) -> Result<Vec<(String, String)>> {
        let mut results = Vec::with_capacity(task_ids.len());
        for task_id in task_ids {
            let payload = self
                .client
                .on_page_summary(task_id)
                .await
                .with_context(|| format!("DataForSEO on-page summary failed for task {}", task_id))?;
            results.push((task_id.clone(), payload));
        }
        Ok(results)
    }
}
