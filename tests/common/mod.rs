#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use meme_feed::{
    auth::AuthToken,
    domain::MemeApi,
    errors::ApiError,
    models::{Comment, Meme, MemeText, Paginated, User},
};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

pub const CURRENT_USER_ID: &str = "dummy_user_id";

/// In-memory meme API with call recording and failure injection.
#[derive(Default)]
pub struct FakeApi {
    pub meme_pages: HashMap<u32, Paginated<Meme>>,
    pub users: HashMap<String, User>,
    pub comments: Mutex<HashMap<String, Vec<Comment>>>,
    pub failing_users: HashSet<String>,
    pub failing_comment_lists: HashSet<String>,
    pub failing_creates: HashSet<String>,
    pub transient_list_failures: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub user_calls: Mutex<Vec<String>>,
    pub comment_list_calls: Mutex<Vec<(String, u32)>>,
    pub created: Mutex<Vec<(String, String)>>,
}

impl FakeApi {
    pub fn user_calls_for(&self, id: &str) -> usize {
        self.user_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == id)
            .count()
    }

    pub fn total_user_calls(&self) -> usize {
        self.user_calls.lock().unwrap().len()
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl MemeApi for FakeApi {
    async fn list_memes(&self, _token: &AuthToken, page: u32) -> Result<Paginated<Meme>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let pending = self.transient_list_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.transient_list_failures.store(pending - 1, Ordering::SeqCst);
            return Err(ApiError::Network("connection reset".to_string()));
        }
        self.meme_pages
            .get(&page)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("/memes?page={}", page)))
    }

    async fn get_user_by_id(&self, _token: &AuthToken, id: &str) -> Result<User, ApiError> {
        self.user_calls.lock().unwrap().push(id.to_string());
        if self.failing_users.contains(id) {
            return Err(ApiError::Network(format!("user {} unreachable", id)));
        }
        self.users
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("/users/{}", id)))
    }

    async fn list_comments(
        &self,
        _token: &AuthToken,
        meme_id: &str,
        page: u32,
    ) -> Result<Paginated<Comment>, ApiError> {
        self.comment_list_calls
            .lock()
            .unwrap()
            .push((meme_id.to_string(), page));
        if self.failing_comment_lists.contains(meme_id) {
            return Err(ApiError::Api {
                status: 500,
                message: format!("comments of {} unavailable", meme_id),
            });
        }
        let results = self
            .comments
            .lock()
            .unwrap()
            .get(meme_id)
            .cloned()
            .unwrap_or_default();
        let total = results.len() as u64;
        Ok(Paginated {
            results,
            total,
            page_size: 10,
        })
    }

    async fn create_comment(
        &self,
        _token: &AuthToken,
        meme_id: &str,
        content: &str,
    ) -> Result<Comment, ApiError> {
        if self.failing_creates.contains(meme_id) {
            return Err(ApiError::Api {
                status: 500,
                message: "comment rejected".to_string(),
            });
        }
        let mut created = self.created.lock().unwrap();
        created.push((meme_id.to_string(), content.to_string()));
        Ok(Comment {
            id: format!("new_comment_{}", created.len()),
            author_id: CURRENT_USER_ID.to_string(),
            content: content.to_string(),
            created_at: timestamp(10),
        })
    }
}

pub fn timestamp(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
}

pub fn user(id: &str, username: &str) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        picture_url: format!("https://dummy.url/user/{}", id),
    }
}

pub fn meme(id: &str, author_id: &str, description: &str, comments_count: u64) -> Meme {
    Meme {
        id: id.to_string(),
        author_id: author_id.to_string(),
        picture_url: format!("https://dummy.url/meme/{}", id),
        texts: vec![
            MemeText {
                content: "dummy text 1".to_string(),
                x: 0.0,
                y: 0.0,
            },
            MemeText {
                content: "dummy text 2".to_string(),
                x: 100.0,
                y: 100.0,
            },
        ],
        description: description.to_string(),
        comments_count,
        created_at: timestamp(8),
    }
}

pub fn comment(id: &str, author_id: &str, content: &str) -> Comment {
    Comment {
        id: id.to_string(),
        author_id: author_id.to_string(),
        content: content.to_string(),
        created_at: timestamp(9),
    }
}

/// Two feed pages: `[m1, m2, m3]` then `[m4]`, 25 memes total at 10 per page.
///
/// `m1` has three comments by three different users, `m2` shares its author
/// with `m1`, `m3` has none.
pub fn fixture() -> FakeApi {
    let mut api = FakeApi::default();
    for (id, name) in [
        ("dummy_user_id_1", "dummy_user_1"),
        ("dummy_user_id_2", "dummy_user_2"),
        ("dummy_user_id_3", "dummy_user_3"),
        (CURRENT_USER_ID, "dummy_user"),
    ] {
        api.users.insert(id.to_string(), user(id, name));
    }

    api.meme_pages.insert(
        1,
        Paginated {
            results: vec![
                meme("dummy_meme_id_1", "dummy_user_id_1", "dummy meme 1", 3),
                meme("dummy_meme_id_2", "dummy_user_id_1", "dummy meme 2", 1),
                meme("dummy_meme_id_3", "dummy_user_id_2", "dummy meme 3", 0),
            ],
            total: 25,
            page_size: 10,
        },
    );
    api.meme_pages.insert(
        2,
        Paginated {
            results: vec![meme("dummy_meme_id_4", "dummy_user_id_3", "dummy meme 4", 0)],
            total: 25,
            page_size: 10,
        },
    );

    {
        let mut comments = api.comments.lock().unwrap();
        comments.insert(
            "dummy_meme_id_1".to_string(),
            vec![
                comment("dummy_comment_id_1", "dummy_user_id_1", "dummy comment 1"),
                comment("dummy_comment_id_2", "dummy_user_id_2", "dummy comment 2"),
                comment("dummy_comment_id_3", "dummy_user_id_3", "dummy comment 3"),
            ],
        );
        comments.insert(
            "dummy_meme_id_2".to_string(),
            vec![comment("dummy_comment_id_4", "dummy_user_id_3", "dummy comment 4")],
        );
    }
    api
}

/// A JWT whose payload carries `{"id": user_id}`.
pub fn session_token(user_id: &str) -> AuthToken {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":"{}"}}"#, user_id));
    AuthToken::new(format!("{}.{}.dummy_signature", header, payload))
}
