use crate::{
    auth::AuthToken,
    domain::MemeApi,
    errors::ApiError,
    models::{Comment, Meme, Paginated, User},
};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{self, info};

#[derive(Serialize)]
struct CreateCommentBody<'a> {
    content: &'a str,
}

/// `MemeApi` over the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpMemeApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpMemeApi {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("{} cannot be a base URL", base_url)));
        }
        info!(%base_url, "Initializing HttpMemeApi");
        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request and decodes a JSON body, mapping 404 to `NotFound`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &AuthToken,
        resource: &str,
    ) -> Result<T, ApiError> {
        let resp = request.bearer_auth(token.as_str()).send().await.map_err(|e| {
            tracing::error!(%resource, error = %e, "HTTP API: Request failed");
            ApiError::from(e)
        })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            tracing::warn!(%resource, "HTTP API: Resource not found");
            return Err(ApiError::NotFound(resource.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|e| {
                tracing::warn!(%resource, error = %e, "HTTP API: Failed to read error response body");
                String::new()
            });
            tracing::error!(%resource, status = status.as_u16(), "HTTP API: Non-success response");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        resp.json::<T>().await.map_err(|e| {
            tracing::error!(%resource, error = %e, "HTTP API: Failed to read response body");
            ApiError::from(e)
        })
    }
}

#[async_trait]
impl MemeApi for HttpMemeApi {
    async fn list_memes(&self, token: &AuthToken, page: u32) -> Result<Paginated<Meme>, ApiError> {
        tracing::debug!(page, "HTTP API: Listing memes");
        let url = self.url(&["memes"])?;
        let request = self.client.get(url).query(&[("page", page)]);
        let listing: Paginated<Meme> = self.send_json(request, token, "/memes").await?;
        tracing::debug!(page, count = listing.results.len(), total = listing.total, "HTTP API: Listed memes");
        Ok(listing)
    }

    async fn get_user_by_id(&self, token: &AuthToken, id: &str) -> Result<User, ApiError> {
        tracing::debug!(user_id = %id, "HTTP API: Fetching user");
        let url = self.url(&["users", id])?;
        let resource = url.path().to_string();
        self.send_json(self.client.get(url), token, &resource).await
    }

    async fn list_comments(
        &self,
        token: &AuthToken,
        meme_id: &str,
        page: u32,
    ) -> Result<Paginated<Comment>, ApiError> {
        tracing::debug!(%meme_id, page, "HTTP API: Listing comments");
        let url = self.url(&["memes", meme_id, "comments"])?;
        let resource = url.path().to_string();
        let request = self.client.get(url).query(&[("page", page)]);
        self.send_json(request, token, &resource).await
    }

    async fn create_comment(
        &self,
        token: &AuthToken,
        meme_id: &str,
        content: &str,
    ) -> Result<Comment, ApiError> {
        tracing::debug!(%meme_id, "HTTP API: Creating comment");
        let url = self.url(&["memes", meme_id, "comments"])?;
        let resource = url.path().to_string();
        let request = self.client.post(url).json(&CreateCommentBody { content });
        let comment: Comment = self.send_json(request, token, &resource).await?;
        tracing::info!(%meme_id, comment_id = %comment.id, "HTTP API: Comment created");
        Ok(comment)
    }
}
