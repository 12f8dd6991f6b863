//! # Post Manager
//!
//! Owns the post lifecycle and orchestrates comments and views.
//!
//! Every mutation resolves its actor through [`SessionGate::require_active`]
//! and performs all checks before the first write, so a rejected operation
//! leaves the store untouched. Edit and delete find the post inside the
//! owner's own collection: a post that exists under someone else is
//! `PostNotFound` for them.

use std::sync::Arc;

use chrono::Utc;
use domains::errors::{DomainError, Result};
use domains::models::{
    Caller, Comment, DeletedComment, Post, PostEdit, PostSummary, PostThread, User, View,
};
use domains::ports::PostRepository;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::comment::{ensure_author, find_comment_by_id, CommentManager};
use crate::session::SessionGate;
use crate::view::ViewRecorder;

#[derive(Clone)]
pub struct PostManager {
    posts: Arc<dyn PostRepository>,
    gate: SessionGate,
    comments: CommentManager,
    views: ViewRecorder,
}

impl PostManager {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        gate: SessionGate,
        comments: CommentManager,
        views: ViewRecorder,
    ) -> Self {
        Self {
            posts,
            gate,
            comments,
            views,
        }
    }

    #[instrument(skip(self, title, content))]
    pub async fn create_post(&self, title: String, content: String, owner: &str) -> Result<Post> {
        let owner = self.gate.require_active(owner).await?;
        let post = Post::new(owner.id, title, content);
        self.posts.save_post(&post).await?;
        info!(post_id = %post.id, "post created");
        Ok(post)
    }

    #[instrument(skip(self, edit))]
    pub async fn edit_post(&self, post_id: Uuid, owner: &str, edit: PostEdit) -> Result<Post> {
        let owner = self.gate.require_active(owner).await?;
        let mut post = self.find_owned_post(&owner, post_id).await?;

        let mut changed = false;
        if let Some(title) = edit.title {
            changed |= post.title != title;
            post.title = title;
        }
        if let Some(content) = edit.content {
            changed |= post.content != content;
            post.content = content;
        }
        if changed {
            post.updated_at = Some(Utc::now());
            self.posts.save_post(&post).await?;
            info!("post edited");
        }
        Ok(post)
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: Uuid, owner: &str) -> Result<PostSummary> {
        let owner = self.gate.require_active(owner).await?;
        let post = self.find_owned_post(&owner, post_id).await?;
        self.posts.delete_post(post.id).await?;
        info!("post deleted");
        Ok(PostSummary {
            id: post.id,
            title: post.title,
        })
    }

    /// Any post can be viewed by anyone; the viewer degrades to anonymous.
    #[instrument(skip(self))]
    pub async fn view_post(&self, post_id: Uuid, caller: &Caller) -> Result<View> {
        let actor = self.gate.resolve_actor(caller).await?;
        let post = self.find_post(post_id).await?;
        self.views.record_view(post.id, &actor).await
    }

    /// Comments require an identified, logged-in user. A comment also counts
    /// as a view of the post.
    #[instrument(skip(self, text))]
    pub async fn comment_on_post(&self, post_id: Uuid, text: String, commenter: &str) -> Result<Comment> {
        let commenter = self.gate.require_active(commenter).await?;
        let post = self.find_post(post_id).await?;
        let comment = self.comments.create_comment(post.id, text, &commenter).await?;
        self.views.record_view(post.id, &commenter).await?;
        info!(comment_id = %comment.id, "comment added");
        Ok(comment)
    }

    #[instrument(skip(self))]
    pub async fn delete_comment_in_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        requester: &str,
    ) -> Result<DeletedComment> {
        self.gate.require_active(requester).await?;
        let post = self.find_post(post_id).await?;
        let comments = self.comments.comments_of(post.id).await?;
        let comment = find_comment_by_id(comment_id, &comments)?;
        if let Err(err) = ensure_author(comment, requester) {
            warn!("rejected: requester is not the author");
            return Err(err);
        }

        self.comments.delete_comment(comment).await?;
        info!("comment deleted");
        Ok(DeletedComment {
            comment_id: comment.id,
            post_id: post.id,
            text: comment.text.clone(),
        })
    }

    /// The post with its comments and views. Does not count as a view.
    pub async fn get_post(&self, post_id: Uuid) -> Result<PostThread> {
        let post = self.find_post(post_id).await?;
        let comments = self.comments.comments_of(post.id).await?;
        let views = self.views.views_of(post.id).await?;
        debug!(%post_id, comments = comments.len(), views = views.len(), "post loaded");
        Ok(PostThread {
            post,
            comments,
            views,
        })
    }

    /// The user's posts in creation order. Lock state is irrelevant here.
    pub async fn list_user_posts(&self, username: &str) -> Result<Vec<Post>> {
        let user = self.gate.find_user(username).await?;
        self.posts.list_posts_by_owner(user.id).await
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post> {
        self.posts
            .find_post(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    async fn find_owned_post(&self, owner: &User, post_id: Uuid) -> Result<Post> {
        self.posts
            .list_posts_by_owner(owner.id)
            .await?
            .into_iter()
            .find(|post| post.id == post_id)
            .ok_or(DomainError::PostNotFound(post_id))
    }
}
