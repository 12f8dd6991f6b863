//! # Core Traits (Ports)
//!
//! Any store adapter must implement these traits to be used by the services.
//! All list operations return records in insertion order.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{Comment, Post, User, View};

/// Persistence contract for users.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts or replaces the user with the same id.
    async fn save_user(&self, user: &User) -> Result<()>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    /// Case-insensitive lookup.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn count_users(&self) -> Result<u64>;
    /// Wipes every table, since all other records hang off a user.
    async fn delete_all_users(&self) -> Result<()>;
}

/// Persistence contract for posts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Inserts or replaces the post with the same id.
    async fn save_post(&self, post: &Post) -> Result<()>;
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>>;
    /// The owner's posts in creation order.
    async fn list_posts_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>>;
    async fn list_posts(&self) -> Result<Vec<Post>>;
    /// Removes the post together with its views and comments.
    /// Children go first so no dangling reference is ever observable.
    async fn delete_post(&self, id: Uuid) -> Result<()>;
    async fn count_posts(&self) -> Result<u64>;
    async fn delete_all_posts(&self) -> Result<()>;
}

/// Persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn save_comment(&self, comment: &Comment) -> Result<()>;
    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>>;
    async fn list_comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> Result<()>;
    async fn count_comments(&self) -> Result<u64>;
}

/// Persistence contract for views. Views are append-only.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ViewRepository: Send + Sync {
    async fn save_view(&self, view: &View) -> Result<()>;
    async fn list_views_for_post(&self, post_id: Uuid) -> Result<Vec<View>>;
    async fn count_views(&self) -> Result<u64>;
}
