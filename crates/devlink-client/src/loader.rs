use std::sync::Arc;

use async_trait::async_trait;
use devlink_shared::dto::{FeedPage, PostSummaryResponse};
use devlink_shared::feed::{CursorConfig, FeedCommand, FeedState, PageRequest};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::ClientError;

/// Where feed pages come from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<FeedPage<PostSummaryResponse>, ClientError>;
}

struct Shared {
    state: Mutex<FeedState>,
    source: Arc<dyn FeedSource>,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Owns a [`FeedState`] and runs the page fetches it asks for.
///
/// At most one fetch task exists at a time; a page that leads straight into
/// another is fetched on the same task. `Cancel` aborts that task, and so does
/// any command that re-issues the page it was fetching.
#[derive(Clone)]
pub struct FeedLoader {
    shared: Arc<Shared>,
}

impl FeedLoader {
    pub fn new(source: Arc<dyn FeedSource>, config: CursorConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(FeedState::new(config)),
                source,
                task: Mutex::new(None),
            }),
        }
    }

    /// Apply `command` and start any fetch it makes due.
    pub async fn dispatch(&self, command: FeedCommand) {
        let cancelling = matches!(command, FeedCommand::Cancel);
        let request = self.shared.state.lock().await.apply(command);

        let mut task = self.shared.task.lock().await;
        if cancelling {
            if let Some(handle) = task.take() {
                handle.abort();
                tracing::debug!("Feed fetch cancelled");
            }
        }
        if let Some(request) = request {
            // A new request supersedes whatever the old task is waiting on.
            if let Some(handle) = task.take() {
                handle.abort();
            }
            let shared = Arc::clone(&self.shared);
            *task = Some(tokio::spawn(fetch_chain(shared, request)));
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> FeedState {
        self.shared.state.lock().await.clone()
    }

    /// Wait for the running fetch task, if any, to finish or be aborted.
    pub async fn settle(&self) {
        let handle = self.shared.task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "Feed fetch task failed");
                }
            }
        }
    }
}

async fn fetch_chain(shared: Arc<Shared>, mut request: PageRequest) {
    loop {
        let command = match shared.source.fetch_page(request.offset, request.limit).await {
            Ok(page) => {
                tracing::debug!(
                    offset = request.offset,
                    received = page.items.len(),
                    total = page.total,
                    "Feed page loaded"
                );
                FeedCommand::PageLoaded { request, page }
            }
            Err(e) => {
                tracing::warn!(offset = request.offset, error = %e, "Feed page failed");
                FeedCommand::PageFailed {
                    request,
                    error: e.to_string(),
                }
            }
        };

        match shared.state.lock().await.apply(command) {
            Some(next) => request = next,
            None => break,
        }
    }
}
