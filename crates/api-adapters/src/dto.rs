//! # Request/response shapes
//!
//! JSON bodies use camelCase keys. Response timestamps are rendered for
//! humans, e.g. `"Oct 19, 2026 03:04:05 PM"`.

use chrono::{DateTime, Utc};
use domains::models::{
    Comment, DeletedComment, Post, PostEdit, PostSummary, PostThread, Registration, User,
    UserProfile, View,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DISPLAY_TIME_FORMAT: &str = "%b %d, %Y %I:%M:%S %p";

pub fn display_time(at: DateTime<Utc>) -> String {
    at.format(DISPLAY_TIME_FORMAT).to_string()
}

// ── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            first_name: req.first_name,
            last_name: req.last_name,
            username: req.username,
            password: req.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub username: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPostRequest {
    pub username: String,
    pub edited_title: Option<String>,
    pub edited_content: Option<String>,
}

impl EditPostRequest {
    pub fn into_edit(self) -> (String, PostEdit) {
        (
            self.username,
            PostEdit {
                title: self.edited_title,
                content: self.edited_content,
            },
        )
    }
}

/// Body for owner- or author-scoped deletes.
#[derive(Debug, Deserialize)]
pub struct UsernameRequest {
    pub username: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewPostRequest {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub username: String,
    pub comment: String,
}

// ── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub date_of_registration: String,
}

impl From<&User> for RegisterResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            date_of_registration: display_time(user.registered_at),
        }
    }
}

/// Returned by login and logout.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub username: String,
    pub locked: bool,
}

impl From<&User> for SessionResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            locked: user.locked,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub locked: bool,
    pub date_of_registration: String,
    pub post_ids: Vec<Uuid>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            locked: profile.locked,
            date_of_registration: display_time(profile.registered_at),
            post_ids: profile.post_ids,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub id: Uuid,
    pub title: String,
    pub date_created: String,
}

impl From<&Post> for CreatePostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            date_created: display_time(post.created_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Creation time when the edit changed nothing.
    pub date_edited: String,
}

impl From<&Post> for EditPostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            date_edited: display_time(post.updated_at.unwrap_or(post.created_at)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePostResponse {
    pub id: Uuid,
    pub title: String,
}

impl From<PostSummary> for DeletePostResponse {
    fn from(summary: PostSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPostResponse {
    pub view_id: Uuid,
    pub viewer: String,
    pub time_of_view: String,
}

impl From<&View> for ViewPostResponse {
    fn from(view: &View) -> Self {
        Self {
            view_id: view.id,
            viewer: view.viewer.clone(),
            time_of_view: display_time(view.viewed_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: Uuid,
    pub comment: String,
    pub commenter_username: String,
    pub time_of_comment: String,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            comment_id: comment.id,
            comment: comment.text.clone(),
            commenter_username: comment.commenter.clone(),
            time_of_comment: display_time(comment.commented_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentResponse {
    pub comment_id: Uuid,
    pub comment: String,
    pub post_id: Uuid,
}

impl From<DeletedComment> for DeleteCommentResponse {
    fn from(deleted: DeletedComment) -> Self {
        Self {
            comment_id: deleted.comment_id,
            comment: deleted.text,
            post_id: deleted.post_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub date_created: String,
    pub comments: Vec<CommentResponse>,
    pub views: Vec<ViewPostResponse>,
}

impl From<PostThread> for PostResponse {
    fn from(thread: PostThread) -> Self {
        Self {
            id: thread.post.id,
            title: thread.post.title,
            content: thread.post.content,
            date_created: display_time(thread.post.created_at),
            comments: thread.comments.iter().map(CommentResponse::from).collect(),
            views: thread.views.iter().map(ViewPostResponse::from).collect(),
        }
    }
}
