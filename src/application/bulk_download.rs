use std::fmt::Display;
use std::future::Future;

use bytes::Bytes;
use futures::future::join_all;

use crate::api::{ApiClient, RetryPolicy};
use crate::domain::{DownloadRequest, RetrievalOutcome};

use super::archive::{Archive, ArchiveError};
use super::retry::fetch_with_retry;

pub const DEFAULT_ENTRY_PREFIX: &str = "item";

#[derive(Debug, Clone)]
pub struct BulkDownloadReport {
    pub archive: Vec<u8>,
    pub requested: usize,
    pub archived: usize,
    /// 1-based positions of the URLs that could not be retrieved
    pub failed: Vec<usize>,
}

/// Fetches every URL concurrently and packs the successes into one zip.
#[derive(Clone)]
pub struct BulkDownloader {
    api_client: ApiClient,
    policy: RetryPolicy,
    entry_prefix: String,
}

impl BulkDownloader {
    pub fn new(api_client: ApiClient) -> Self {
        let policy = api_client.retry_policy();
        Self {
            api_client,
            policy,
            entry_prefix: DEFAULT_ENTRY_PREFIX.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_entry_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.entry_prefix = prefix.into();
        self
    }

    /// Launch one retrying fetch per request and wait for all of them to
    /// settle. Outcomes come back in request order.
    pub async fn retrieve_all(&self, requests: &[DownloadRequest]) -> Vec<RetrievalOutcome> {
        let client = &self.api_client;
        let policy = self.policy;

        settle_all(requests, |request| async move {
            fetch_with_retry(client, &request.url, policy).await
        })
        .await
    }

    /// Individual failures are skipped, so the archive may hold fewer entries
    /// than `urls`, down to none at all.
    pub async fn assemble<S: AsRef<str>>(
        &self,
        urls: &[S],
    ) -> Result<BulkDownloadReport, ArchiveError> {
        let requests = DownloadRequest::from_urls(urls);
        let outcomes = self.retrieve_all(&requests).await;

        let mut archive = Archive::new();
        let mut failed = Vec::new();

        for outcome in outcomes {
            match outcome {
                RetrievalOutcome::Retrieved { request, payload } => {
                    archive.insert(request.entry_name(&self.entry_prefix), payload)?;
                }
                RetrievalOutcome::Failed { request, error } => {
                    tracing::debug!(item = request.index + 1, %error, "skipped in archive");
                    failed.push(request.index + 1);
                }
            }
        }

        let requested = requests.len();
        let archived = archive.len();
        if archived == 0 && requested > 0 {
            tracing::warn!(requested, "no images could be retrieved, archive is empty");
        }

        let archive = archive.finalize()?;
        tracing::info!(requested, archived, bytes = archive.len(), "archive assembled");

        Ok(BulkDownloadReport {
            archive,
            requested,
            archived,
            failed,
        })
    }
}

/// Start `fetch` for every request at once and collect each result, failures
/// included, in request order.
async fn settle_all<F, Fut, E>(requests: &[DownloadRequest], fetch: F) -> Vec<RetrievalOutcome>
where
    F: Fn(DownloadRequest) -> Fut,
    Fut: Future<Output = Result<Bytes, E>>,
    E: Display,
{
    let fetches = requests.iter().cloned().map(|request| {
        let pending = fetch(request.clone());
        async move {
            match pending.await {
                Ok(payload) => RetrievalOutcome::Retrieved { request, payload },
                Err(e) => {
                    tracing::error!(
                        item = request.index + 1,
                        url = %request.url,
                        error = %e,
                        "giving up on image after retries"
                    );
                    RetrievalOutcome::Failed {
                        request,
                        error: e.to_string(),
                    }
                }
            }
        }
    });

    join_all(fetches).await
}
