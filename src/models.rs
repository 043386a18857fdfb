use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A caption drawn over the meme picture at a pixel position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MemeText {
    pub content: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meme {
    pub id: String,
    pub author_id: String,
    pub picture_url: String,
    pub texts: Vec<MemeText>,
    pub description: String,
    pub comments_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub picture_url: String,
}

impl User {
    /// Placeholder shown when a meme's author is missing from the fetched batch.
    pub fn anonymous() -> Self {
        Self {
            id: String::new(),
            username: "Anonymous".to_string(),
            picture_url: String::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Envelope returned by the listing endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub total: u64,
    pub page_size: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: User,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnrichedMeme {
    #[serde(flatten)]
    pub meme: Meme,
    pub author: User,
    pub comments: Vec<CommentWithAuthor>,
}

/// One pagination step of the feed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub memes: Vec<EnrichedMeme>,
    pub next_cursor: Option<u32>,
}

impl FeedPage {
    pub fn meme(&self, meme_id: &str) -> Option<&EnrichedMeme> {
        self.memes.iter().find(|m| m.meme.id == meme_id)
    }

    pub fn meme_mut(&mut self, meme_id: &str) -> Option<&mut EnrichedMeme> {
        self.memes.iter_mut().find(|m| m.meme.id == meme_id)
    }
}
