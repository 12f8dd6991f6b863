//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Blog.
//! We use UUID v7 for time-ordered, globally unique identification.
//!
//! Relationships are stored as foreign keys on the child (`Post::owner_id`,
//! `Comment::post_id`, `View::post_id`). A user's post list and a post's
//! comment/view lists are resolved on read through the repository ports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved username of the fallback identity used on read paths.
pub const ANONYMOUS_USERNAME: &str = "anonymous";

/// Well-known id of the anonymous user, seeded once per store.
pub const ANONYMOUS_ID: Uuid = Uuid::nil();

/// The form usernames are compared in. Full Unicode lowercasing, so `Ä`
/// and `ä` name the same user.
pub fn username_key(username: &str) -> String {
    username.to_lowercase()
}

/// A registered author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique, compared case-insensitively by the stores.
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Opaque; compared by exact equality at login.
    pub password: String,
    /// `true` means logged out. A locked user cannot mutate anything.
    pub locked: bool,
    pub registered_at: DateTime<Utc>,
}

impl User {
    /// Builds a freshly registered, unlocked user.
    pub fn new(
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
            locked: false,
            registered_at: Utc::now(),
        }
    }

    /// The canonical anonymous identity. Always locked.
    pub fn anonymous() -> Self {
        Self {
            id: ANONYMOUS_ID,
            username: ANONYMOUS_USERNAME.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password: String::new(),
            locked: true,
            registered_at: DateTime::<Utc>::default(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.id == ANONYMOUS_ID
    }
}

/// A blog post. Ownership lives in `owner_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Set on the first edit that changes a field.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(owner_id: Uuid, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            owner_id,
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// A comment left on a post by an identified user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub commenter_id: Uuid,
    /// Username of the author at the time of commenting. Usernames are immutable,
    /// so this always resolves the author for the delete check.
    pub commenter: String,
    pub commented_at: DateTime<Utc>,
}

/// An immutable record of someone reading (or commenting on) a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Resolved username, possibly `"anonymous"`.
    pub viewer: String,
    pub viewed_at: DateTime<Utc>,
}

/// Who is asking, as supplied by the caller. No nullable usernames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Caller {
    Anonymous,
    Named(String),
}

impl Caller {
    pub fn named(username: impl Into<String>) -> Self {
        Caller::Named(username.into())
    }
}

impl From<Option<String>> for Caller {
    fn from(username: Option<String>) -> Self {
        match username {
            Some(name) => Caller::Named(name),
            None => Caller::Anonymous,
        }
    }
}

/// Input for registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

/// Partial update for a post. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostEdit {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// What remains to report after a post is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
}

/// What remains to report after a comment is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedComment {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub text: String,
}

/// A post together with its ordered comments and views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostThread {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub views: Vec<View>,
}

/// Public projection of a user. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub locked: bool,
    pub registered_at: DateTime<Utc>,
    /// In creation order.
    pub post_ids: Vec<Uuid>,
}
