use std::time::Duration;

use async_trait::async_trait;
use devlink_shared::ErrorResponse;
use devlink_shared::dto::{FeedPage, FeedQuery, PostSummaryResponse};

use crate::error::ClientError;
use crate::loader::FeedSource;

/// Fetches feed pages from `GET {base_url}/api/posts`.
#[derive(Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpFeedSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn feed_url(&self) -> String {
        format!("{}/api/posts", self.base_url)
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<FeedPage<PostSummaryResponse>, ClientError> {
        let query = FeedQuery {
            limit: Some(limit),
            offset: Some(offset),
        };
        let mut request = self.client.get(self.feed_url()).query(&query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let problem = response.json::<ErrorResponse>().await.ok();
            tracing::debug!(status = status.as_u16(), "Feed page rejected");
            return Err(ClientError::Api {
                status: status.as_u16(),
                problem,
            });
        }

        Ok(response.json().await?)
    }
}
