//! # Comment Manager
//!
//! Construction and removal of comments. Lookup within a post is a pure
//! linear scan shared by every caller.

use std::sync::Arc;

use chrono::Utc;
use domains::errors::{DomainError, Result};
use domains::models::{Comment, User};
use domains::ports::CommentRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct CommentManager {
    comments: Arc<dyn CommentRepository>,
}

/// First comment in `comments` with the given id, in insertion order.
pub fn find_comment_by_id(id: Uuid, comments: &[Comment]) -> Result<&Comment> {
    comments
        .iter()
        .find(|comment| comment.id == id)
        .ok_or(DomainError::CommentNotFound(id))
}

/// Only the author may remove a comment; the post owner has no say.
/// `requester` is the name as the caller supplied it, compared byte for byte.
pub fn ensure_author(comment: &Comment, requester: &str) -> Result<()> {
    if comment.commenter != requester {
        return Err(DomainError::Unauthorized(format!(
            "{requester} did not make comment {}",
            comment.id
        )));
    }
    Ok(())
}

impl CommentManager {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    pub async fn create_comment(&self, post_id: Uuid, text: String, author: &User) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::now_v7(),
            post_id,
            text,
            commenter_id: author.id,
            commenter: author.username.clone(),
            commented_at: Utc::now(),
        };
        self.comments.save_comment(&comment).await?;
        Ok(comment)
    }

    pub async fn delete_comment(&self, comment: &Comment) -> Result<()> {
        self.comments.delete_comment(comment.id).await
    }

    pub async fn comments_of(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.comments.list_comments_for_post(post_id).await
    }
}
