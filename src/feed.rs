//! Feed page assembly.
//!
//! A page is built in four fan-out steps, each a join-all barrier that fails
//! as soon as one request fails: meme authors, first comment page per meme,
//! then the authors of every comment. Nothing is cached here.

use crate::{
    auth::AuthToken,
    domain::MemeApi,
    errors::{ApiError, FeedError},
    models::{CommentWithAuthor, EnrichedMeme, FeedPage, User},
};
use futures::future::try_join_all;
use std::collections::HashMap;

/// Index of the first feed page.
pub const FIRST_PAGE: u32 = 1;

/// Only the first page of each meme's comments is loaded with the feed.
const COMMENTS_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedOptions {
    /// Request each distinct user id once per fan-out step.
    pub dedupe_authors: bool,
}

/// Cursor of the page following `page`, or `None` once
/// `page >= ceil(total / page_size) - 1`.
pub fn next_cursor(page: u32, total: u64, page_size: u64) -> Option<u32> {
    if page_size == 0 {
        return None;
    }
    let page_count = total.div_ceil(page_size);
    if u64::from(page) + 1 < page_count {
        page.checked_add(1)
    } else {
        None
    }
}

/// Fetches and assembles one page of the feed.
pub async fn fetch_page<A>(
    api: &A,
    token: &AuthToken,
    page: u32,
    options: FeedOptions,
) -> Result<FeedPage, FeedError>
where
    A: MemeApi + ?Sized,
{
    if page < FIRST_PAGE {
        return Err(FeedError::InvalidInput(format!(
            "page numbers start at {}, got {}",
            FIRST_PAGE, page
        )));
    }

    tracing::debug!(page, "Feed: Fetching meme listing");
    let listing = api.list_memes(token, page).await?;
    let next_cursor = next_cursor(page, listing.total, listing.page_size);
    let memes = listing.results;

    let author_ids: Vec<&str> = memes.iter().map(|m| m.author_id.as_str()).collect();
    let authors = fetch_users(api, token, &author_ids, options.dedupe_authors).await?;

    let comment_pages = try_join_all(
        memes
            .iter()
            .map(|meme| api.list_comments(token, &meme.id, COMMENTS_PAGE)),
    )
    .await?;

    let comments = try_join_all(comment_pages.into_iter().map(|listing| async move {
        let ids: Vec<&str> = listing.results.iter().map(|c| c.author_id.as_str()).collect();
        let comment_authors = fetch_users(api, token, &ids, options.dedupe_authors).await?;
        Ok::<_, ApiError>(
            listing
                .results
                .into_iter()
                .zip(comment_authors)
                .map(|(comment, author)| CommentWithAuthor { comment, author })
                .collect::<Vec<_>>(),
        )
    }))
    .await?;

    let memes: Vec<EnrichedMeme> = memes
        .into_iter()
        .zip(comments)
        .map(|(meme, comments)| {
            let author = resolve_author(&authors, &meme.author_id);
            EnrichedMeme {
                meme,
                author,
                comments,
            }
        })
        .collect();

    tracing::info!(page, memes = memes.len(), ?next_cursor, "Feed: Page assembled");
    Ok(FeedPage { memes, next_cursor })
}

/// Splices `comment` at the head of one meme's comment list and bumps its
/// counter. The page is not re-synchronized with the API.
pub fn insert_comment(
    pages: &mut [FeedPage],
    page_index: usize,
    meme_id: &str,
    comment: CommentWithAuthor,
) -> Result<(), FeedError> {
    let page = pages
        .get_mut(page_index)
        .ok_or(FeedError::PageNotLoaded(page_index))?;
    let meme = page
        .meme_mut(meme_id)
        .ok_or_else(|| FeedError::MemeNotOnPage {
            meme_id: meme_id.to_string(),
            page_index,
        })?;
    meme.comments.insert(0, comment);
    meme.meme.comments_count += 1;
    Ok(())
}

fn resolve_author(authors: &[User], author_id: &str) -> User {
    authors
        .iter()
        .find(|author| author.id == author_id)
        .cloned()
        .unwrap_or_else(User::anonymous)
}

/// Fetches the users for `ids`, returned in the same positions as `ids`.
async fn fetch_users<A>(
    api: &A,
    token: &AuthToken,
    ids: &[&str],
    dedupe: bool,
) -> Result<Vec<User>, ApiError>
where
    A: MemeApi + ?Sized,
{
    if !dedupe {
        return try_join_all(ids.iter().map(|id| api.get_user_by_id(token, id))).await;
    }

    let mut distinct: Vec<&str> = Vec::with_capacity(ids.len());
    for id in ids {
        if !distinct.contains(id) {
            distinct.push(*id);
        }
    }
    tracing::debug!(requested = ids.len(), distinct = distinct.len(), "Feed: Deduplicated user fetches");

    let fetched = try_join_all(distinct.iter().map(|id| api.get_user_by_id(token, id))).await?;
    let by_id: HashMap<&str, User> = distinct.into_iter().zip(fetched).collect();
    Ok(ids
        .iter()
        .map(|id| by_id.get(id).cloned().unwrap_or_else(User::anonymous))
        .collect())
}
