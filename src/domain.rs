use crate::auth::AuthToken;
use crate::errors::ApiError;
use crate::models::{Comment, Meme, Paginated, User};
use async_trait::async_trait;

/// Operations the remote meme API offers to the feed.
///
/// The session token is passed explicitly on every call.
#[async_trait]
pub trait MemeApi: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Lists one page (1-based) of memes.
    async fn list_memes(&self, token: &AuthToken, page: u32) -> Result<Paginated<Meme>, ApiError>;

    /// Fetches a user. Fails with `ApiError::NotFound` when the id is unknown.
    async fn get_user_by_id(&self, token: &AuthToken, id: &str) -> Result<User, ApiError>;

    /// Lists one page (1-based) of a meme's comments, newest first.
    async fn list_comments(
        &self,
        token: &AuthToken,
        meme_id: &str,
        page: u32,
    ) -> Result<Paginated<Comment>, ApiError>;

    /// Creates a comment authored by the token's user.
    async fn create_comment(
        &self,
        token: &AuthToken,
        meme_id: &str,
        content: &str,
    ) -> Result<Comment, ApiError>;
}
