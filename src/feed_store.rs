use crate::{
    auth::AuthToken,
    domain::MemeApi,
    errors::FeedError,
    feed::{self, FeedOptions, FIRST_PAGE},
    models::{CommentWithAuthor, FeedPage, User},
};
use backoff::{future::retry, ExponentialBackoffBuilder};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::{Mutex, OnceCell, RwLock};

/// Retry schedule for page loads. Comment submissions are never retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct ViewState {
    opened_comment_section: Option<String>,
    drafts: HashMap<String, String>,
}

/// Accumulated feed pages and view state of one authenticated session.
///
/// Pages are append-only except for the optimistic comment splice, which
/// mutates a single meme entry under the write lock.
pub struct FeedStore {
    api: Arc<dyn MemeApi>,
    token: AuthToken,
    options: FeedOptions,
    retry: RetryPolicy,
    pages: RwLock<Vec<FeedPage>>,
    fetch_lock: Mutex<()>,
    current_user: OnceCell<User>,
    view: Mutex<ViewState>,
}

impl FeedStore {
    pub fn new(
        api: Arc<dyn MemeApi>,
        token: AuthToken,
        options: FeedOptions,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            api,
            token,
            options,
            retry,
            pages: RwLock::new(Vec::new()),
            fetch_lock: Mutex::new(()),
            current_user: OnceCell::new(),
            view: Mutex::new(ViewState::default()),
        }
    }

    /// Loads the page after the last loaded one (page 1 when empty).
    ///
    /// Returns the index of the appended page, or `None` once the cursor is
    /// exhausted. Concurrent callers are serialized and re-read the cursor.
    pub async fn fetch_next_page(&self) -> Result<Option<usize>, FeedError> {
        let _guard = self.fetch_lock.lock().await;

        let cursor = {
            let pages = self.pages.read().await;
            match pages.last() {
                None => Some(FIRST_PAGE),
                Some(last) => last.next_cursor,
            }
        };
        let Some(page_number) = cursor else {
            tracing::debug!("FeedStore: No more pages to load");
            return Ok(None);
        };

        let page = self.fetch_with_retry(page_number).await?;

        let mut pages = self.pages.write().await;
        pages.push(page);
        let index = pages.len() - 1;
        tracing::info!(page_number, page_index = index, "FeedStore: Page appended");
        Ok(Some(index))
    }

    pub async fn has_next_page(&self) -> bool {
        let pages = self.pages.read().await;
        pages.last().is_none_or(|last| last.next_cursor.is_some())
    }

    pub async fn pages(&self) -> Vec<FeedPage> {
        self.pages.read().await.clone()
    }

    pub async fn page(&self, page_index: usize) -> Option<FeedPage> {
        self.pages.read().await.get(page_index).cloned()
    }

    /// The authenticated user, resolved from the token's id claim once.
    pub async fn current_user(&self) -> Result<&User, FeedError> {
        self.current_user
            .get_or_try_init(|| async {
                let user_id = self.token.user_id()?;
                tracing::debug!(%user_id, "FeedStore: Resolving current user");
                let user = self.api.get_user_by_id(&self.token, &user_id).await?;
                Ok::<_, FeedError>(user)
            })
            .await
    }

    /// Posts a comment and, once the API confirms it, echoes it at the head of
    /// the meme's comment list on `page_index`.
    pub async fn submit_comment(
        &self,
        meme_id: &str,
        content: &str,
        page_index: usize,
    ) -> Result<CommentWithAuthor, FeedError> {
        if content.is_empty() {
            return Err(FeedError::InvalidInput(
                "comment content must not be empty".to_string(),
            ));
        }
        {
            let pages = self.pages.read().await;
            let page = pages
                .get(page_index)
                .ok_or(FeedError::PageNotLoaded(page_index))?;
            if page.meme(meme_id).is_none() {
                return Err(FeedError::MemeNotOnPage {
                    meme_id: meme_id.to_string(),
                    page_index,
                });
            }
        }

        let author = self.current_user().await?.clone();
        let comment = self
            .api
            .create_comment(&self.token, meme_id, content)
            .await?;
        let created = CommentWithAuthor { comment, author };

        let mut pages = self.pages.write().await;
        feed::insert_comment(pages.as_mut_slice(), page_index, meme_id, created.clone())?;
        tracing::info!(%meme_id, page_index, comment_id = %created.comment.id, "FeedStore: Comment inserted");
        Ok(created)
    }

    /// Opens the comment section of `meme_id`, or closes it if already open.
    /// Returns the section that is open afterwards.
    pub async fn toggle_comment_section(&self, meme_id: &str) -> Option<String> {
        let mut view = self.view.lock().await;
        view.opened_comment_section = match view.opened_comment_section.take() {
            Some(open) if open == meme_id => None,
            _ => Some(meme_id.to_string()),
        };
        view.opened_comment_section.clone()
    }

    pub async fn opened_comment_section(&self) -> Option<String> {
        self.view.lock().await.opened_comment_section.clone()
    }

    pub async fn set_draft(&self, meme_id: &str, content: String) {
        self.view
            .lock()
            .await
            .drafts
            .insert(meme_id.to_string(), content);
    }

    pub async fn draft(&self, meme_id: &str) -> Option<String> {
        self.view.lock().await.drafts.get(meme_id).cloned()
    }

    /// Submits the draft for `meme_id` and clears it on success.
    pub async fn submit_draft(
        &self,
        meme_id: &str,
        page_index: usize,
    ) -> Result<CommentWithAuthor, FeedError> {
        let content = self.draft(meme_id).await.unwrap_or_default();
        let created = self.submit_comment(meme_id, &content, page_index).await?;
        self.view.lock().await.drafts.remove(meme_id);
        Ok(created)
    }

    async fn fetch_with_retry(&self, page: u32) -> Result<FeedPage, FeedError> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.retry.initial_interval)
            .with_max_interval(self.retry.max_interval)
            .with_max_elapsed_time(None)
            .build();
        let max_retries = self.retry.max_retries;
        let mut attempt: u32 = 0;

        retry(policy, || {
            attempt += 1;
            let current = attempt;
            async move {
                match feed::fetch_page(self.api.as_ref(), &self.token, page, self.options).await {
                    Ok(assembled) => Ok(assembled),
                    Err(FeedError::Api(e)) if e.is_transient() && current <= max_retries => {
                        tracing::warn!(page, attempt = current, error = %e, "FeedStore: Transient failure, retrying page fetch");
                        Err(backoff::Error::transient(FeedError::Api(e)))
                    }
                    Err(e) => {
                        tracing::error!(page, attempt = current, error = %e, "FeedStore: Page fetch failed");
                        Err(backoff::Error::permanent(e))
                    }
                }
            }
        })
        .await
    }
}
