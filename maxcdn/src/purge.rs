//! Cache purges, single and batched.
//!
//! Batch purges are a fixed-shape fan-out: one spawned task per item, no
//! bounded concurrency, no cancellation. Results come back in input order
//! and partial success is reported as such: every response that made it is
//! kept even when a later item failed.

use futures::future::join_all;
use tracing::debug;

use crate::client::MaxCdn;
use crate::error::Error;
use crate::response::ApiResponse;

/// Outcome of a batch purge.
///
/// Mirrors the single-item calls as closely as a batch can: all collected
/// responses plus the error of the last item that failed, if any.
#[derive(Debug, Default)]
pub struct PurgeSummary {
    /// Responses of the items that succeeded, in input order.
    pub responses: Vec<ApiResponse>,
    /// Error of the last failed item, `None` when everything went through.
    pub last_error: Option<Error>,
}

impl PurgeSummary {
    /// Whether every item purged cleanly.
    pub fn is_ok(&self) -> bool {
        self.last_error.is_none()
    }

    /// Collapse into a `Result`, dropping partial responses on error.
    pub fn into_result(self) -> Result<Vec<ApiResponse>, Error> {
        match self.last_error {
            Some(err) => Err(err),
            None => Ok(self.responses),
        }
    }
}

impl MaxCdn {
    /// Purge a zone's entire cache.
    pub async fn purge_zone(&self, zone: i64) -> Result<ApiResponse, Error> {
        self.delete(&format!("/zones/pull.json/{zone}/cache")).await
    }

    /// Purge a single cached file from a zone.
    pub async fn purge_file(
        &self,
        zone: i64,
        file: &str,
    ) -> Result<ApiResponse, Error> {
        self.delete_form(
            &format!("/zones/pull.json/{zone}/cache"),
            &[("file", file)],
        )
        .await
    }

    /// Purge several zones' caches concurrently.
    pub async fn purge_zones(&self, zones: &[i64]) -> PurgeSummary {
        debug!(count = zones.len(), "purging zones");
        let tasks: Vec<_> = zones
            .iter()
            .map(|&zone| {
                let client = self.clone();
                tokio::spawn(async move { client.purge_zone(zone).await })
            })
            .collect();
        collect_summary(join_all(tasks).await)
    }

    /// Purge several cached files from one zone concurrently.
    pub async fn purge_files(
        &self,
        zone: i64,
        files: &[String],
    ) -> PurgeSummary {
        debug!(zone, count = files.len(), "purging files");
        let tasks: Vec<_> = files
            .iter()
            .map(|file| {
                let client = self.clone();
                let file = file.clone();
                tokio::spawn(
                    async move { client.purge_file(zone, &file).await },
                )
            })
            .collect();
        collect_summary(join_all(tasks).await)
    }
}

fn collect_summary(
    joined: Vec<Result<Result<ApiResponse, Error>, tokio::task::JoinError>>,
) -> PurgeSummary {
    let mut summary = PurgeSummary::default();
    for item in joined {
        match item {
            Ok(Ok(response)) => summary.responses.push(response),
            Ok(Err(err)) => summary.last_error = Some(err),
            // A panicked task is an error like any other, not a reason to
            // unwind the caller.
            Err(join_err) => {
                summary.last_error = Some(Error::Batch(join_err.to_string()));
            }
        }
    }
    summary
}
