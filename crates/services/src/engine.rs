//! # BlogEngine
//!
//! Facade that wires the Session Gate, Post Manager, Comment Manager and
//! View Recorder over a set of store ports. Cheap to clone.

use std::sync::Arc;

use domains::errors::Result;
use domains::models::{
    Caller, Comment, DeletedComment, Post, PostEdit, PostSummary, PostThread, Registration, User,
    UserProfile, View,
};
use domains::ports::{CommentRepository, PostRepository, UserRepository, ViewRepository};
use uuid::Uuid;

use crate::comment::CommentManager;
use crate::post::PostManager;
use crate::session::SessionGate;
use crate::view::ViewRecorder;

/// Handles to every port the engine needs.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub views: Arc<dyn ViewRepository>,
}

impl Stores {
    /// Uses one adapter that implements all four ports.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + PostRepository + CommentRepository + ViewRepository + 'static,
    {
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            views: store,
        }
    }
}

#[derive(Clone)]
pub struct BlogEngine {
    gate: SessionGate,
    posts: PostManager,
}

impl BlogEngine {
    /// Builds the engine without touching the store.
    pub fn new(stores: Stores) -> Self {
        let gate = SessionGate::new(stores.users);
        let comments = CommentManager::new(stores.comments);
        let views = ViewRecorder::new(stores.views);
        let posts = PostManager::new(stores.posts, gate.clone(), comments, views);
        Self { gate, posts }
    }

    /// Builds the engine and seeds the anonymous identity.
    pub async fn bootstrap(stores: Stores) -> Result<Self> {
        let engine = Self::new(stores);
        engine.gate.seed_anonymous().await?;
        Ok(engine)
    }

    pub fn session(&self) -> &SessionGate {
        &self.gate
    }

    pub async fn register(&self, registration: Registration) -> Result<User> {
        self.gate.register(registration).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        self.gate.login(username, password).await
    }

    pub async fn logout(&self, username: &str) -> Result<User> {
        self.gate.logout(username).await
    }

    pub async fn resolve_actor(&self, caller: &Caller) -> Result<User> {
        self.gate.resolve_actor(caller).await
    }

    pub async fn user_profile(&self, username: &str) -> Result<UserProfile> {
        let user = self.gate.find_user(username).await?;
        let posts = self.posts.list_user_posts(&user.username).await?;
        Ok(UserProfile {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            locked: user.locked,
            registered_at: user.registered_at,
            post_ids: posts.into_iter().map(|post| post.id).collect(),
        })
    }

    pub async fn create_post(&self, title: String, content: String, owner: &str) -> Result<Post> {
        self.posts.create_post(title, content, owner).await
    }

    pub async fn edit_post(&self, post_id: Uuid, owner: &str, edit: PostEdit) -> Result<Post> {
        self.posts.edit_post(post_id, owner, edit).await
    }

    pub async fn delete_post(&self, post_id: Uuid, owner: &str) -> Result<PostSummary> {
        self.posts.delete_post(post_id, owner).await
    }

    pub async fn view_post(&self, post_id: Uuid, caller: &Caller) -> Result<View> {
        self.posts.view_post(post_id, caller).await
    }

    pub async fn comment_on_post(&self, post_id: Uuid, text: String, commenter: &str) -> Result<Comment> {
        self.posts.comment_on_post(post_id, text, commenter).await
    }

    pub async fn delete_comment_in_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        requester: &str,
    ) -> Result<DeletedComment> {
        self.posts
            .delete_comment_in_post(post_id, comment_id, requester)
            .await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostThread> {
        self.posts.get_post(post_id).await
    }

    pub async fn list_user_posts(&self, username: &str) -> Result<Vec<Post>> {
        self.posts.list_user_posts(username).await
    }
}
