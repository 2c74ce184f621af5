//! Paginated client for the USGS FDSN event service.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use super::EventQuery;
use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::models::{Event, EventCollection};

/// Fetches every event matching a query, page by page
pub struct UsgsClient {
    client: Client,
    base_url: Url,
    limit: usize,
    max_attempts: u32,
    retry_delay: Duration,
}

impl UsgsClient {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            limit: config.limit.max(1),
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetch all pages, starting at offset 1, until a short page arrives
    pub async fn fetch_all(&self, query: &EventQuery) -> Result<Vec<Event>, FetchError> {
        info!(
            "Fetching events from {} to {} within {}",
            query.start_time, query.end_time, query.bbox
        );

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));

        let events = paginate(self.limit, |offset| {
            let pb = pb.clone();
            async move {
                let batch = self.fetch_page(query, offset).await?;
                pb.set_message(format!("offset {}: {} events", offset, batch.len()));
                Ok(batch)
            }
        })
        .await;

        match &events {
            Ok(all) => pb.finish_with_message(format!("Fetched {} events", all.len())),
            Err(_) => pb.abandon_with_message("Fetch failed"),
        }

        events
    }

    /// Fetch a single page, retrying transport errors and bad statuses
    pub async fn fetch_page(
        &self,
        query: &EventQuery,
        offset: usize,
    ) -> Result<Vec<Event>, FetchError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.try_fetch_page(query, offset).await {
                Ok(events) => return Ok(events),
                Err(e) if attempts < self.max_attempts => {
                    warn!(
                        "Event request at offset {} failed (attempt {}/{}): {}",
                        offset, attempts, self.max_attempts, e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    return Err(FetchError::Exhausted {
                        offset,
                        attempts,
                        last: e.to_string(),
                    });
                }
            }
        }
    }

    async fn try_fetch_page(
        &self,
        query: &EventQuery,
        offset: usize,
    ) -> Result<Vec<Event>, FetchError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .extend_pairs(query.params(self.limit, offset));

        let response = self.client.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let page: EventCollection = serde_json::from_str(&body)?;
        debug!("Offset {} returned {} events", offset, page.features.len());
        Ok(page.features)
    }
}

/// Drive an offset-paged source to the end.
///
/// Offsets start at 1 and advance by `limit`. The first page shorter than
/// `limit` ends the walk.
pub async fn paginate<F, Fut>(limit: usize, mut fetch_page: F) -> Result<Vec<Event>, FetchError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<Event>, FetchError>>,
{
    let mut all = Vec::new();
    let mut offset = 1;

    loop {
        let batch = fetch_page(offset).await?;
        let count = batch.len();
        all.extend(batch);

        info!("Fetched {} events (total so far: {})", count, all.len());

        if count < limit {
            break;
        }
        offset += limit;
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pip::BoundingBox;
    use serde_json::json;
    use std::cell::RefCell;

    fn page(start: usize, len: usize) -> Vec<Event> {
        (start..start + len)
            .map(|i| Event::new(json!({"id": i.to_string()})))
            .collect()
    }

    #[tokio::test]
    async fn test_paginate_stops_on_short_page() {
        let offsets = RefCell::new(Vec::new());
        let events = paginate(3, |offset| {
            offsets.borrow_mut().push(offset);
            let len = if offset < 7 { 3 } else { 1 };
            async move { Ok(page(offset, len)) }
        })
        .await
        .unwrap();

        assert_eq!(*offsets.borrow(), vec![1, 4, 7]);
        assert_eq!(events.len(), 7);
        assert_eq!(events[6].id(), Some("7"));
    }

    #[tokio::test]
    async fn test_paginate_full_last_page_needs_empty_follow_up() {
        let offsets = RefCell::new(Vec::new());
        let events = paginate(2, |offset| {
            offsets.borrow_mut().push(offset);
            let len = if offset < 5 { 2 } else { 0 };
            async move { Ok(page(offset, len)) }
        })
        .await
        .unwrap();

        assert_eq!(*offsets.borrow(), vec![1, 3, 5]);
        assert_eq!(events.len(), 4);
    }

    #[tokio::test]
    async fn test_paginate_propagates_errors() {
        let result = paginate(2, |offset| async move {
            if offset == 1 {
                Ok(page(1, 2))
            } else {
                Err(FetchError::Status {
                    status: 503,
                    body: "busy".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
    }

    #[test]
    fn test_page_decoding() {
        let body = r#"{"type":"FeatureCollection","metadata":{"count":1},"features":[
            {"type":"Feature","id":"us1","geometry":{"type":"Point","coordinates":[1.0,2.0,3.0]}}
        ]}"#;
        let page: EventCollection = serde_json::from_str(body).unwrap();
        assert_eq!(page.features.len(), 1);
        assert_eq!(page.features[0].id(), Some("us1"));
    }

    #[test]
    fn test_client_rejects_bad_url() {
        let config = FetchConfig {
            base_url: "::not a url::".to_string(),
            ..FetchConfig::default()
        };
        assert!(matches!(UsgsClient::new(&config), Err(FetchError::Url(_))));
    }

    #[tokio::test]
    async fn test_fetch_page_gives_up_after_max_attempts() {
        // Nothing listens on port 1, so every attempt fails to connect
        let config = FetchConfig {
            base_url: "http://127.0.0.1:1/fdsnws/event/1/query".to_string(),
            max_attempts: 2,
            retry_delay_secs: 0,
            timeout_secs: 5,
            ..FetchConfig::default()
        };
        let client = UsgsClient::new(&config).unwrap();
        let query = EventQuery::new(
            "2025-03-28",
            "2025-10-19T00:00:00",
            BoundingBox::new(92.0, 9.0, 102.0, 29.0),
        );

        let result = client.fetch_page(&query, 1).await;
        match result {
            Err(FetchError::Exhausted {
                offset,
                attempts,
                last,
            }) => {
                assert_eq!(offset, 1);
                assert_eq!(attempts, 2);
                assert!(!last.is_empty());
            }
            other => panic!("unexpected result: {:?}", other.map(|events| events.len())),
        }
    }
}
