//! Shared fixtures for the cross-crate test suites.

use std::sync::Arc;

use domains::models::{Comment, Post, Registration, User, View};
use domains::ports::{CommentRepository, PostRepository, UserRepository, ViewRepository};
use services::{BlogEngine, Stores};
use storage_adapters::MemoryStore;

/// Engine plus a direct handle on its backing store for assertions.
pub struct Harness<S> {
    pub engine: BlogEngine,
    pub store: Arc<S>,
}

pub async fn harness<S>(store: S) -> Harness<S>
where
    S: UserRepository + PostRepository + CommentRepository + ViewRepository + 'static,
{
    let store = Arc::new(store);
    let engine = BlogEngine::bootstrap(Stores::from_store(store.clone()))
        .await
        .expect("bootstrap");
    Harness { engine, store }
}

pub async fn memory_harness() -> Harness<MemoryStore> {
    harness(MemoryStore::new()).await
}

pub fn registration(username: &str) -> Registration {
    Registration {
        first_name: "john".into(),
        last_name: "doe".into(),
        username: username.into(),
        password: "password".into(),
    }
}

/// Everything observable in a store, for "nothing changed" assertions.
#[derive(Debug, PartialEq)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub views: Vec<View>,
}

pub async fn snapshot<S>(store: &S) -> Snapshot
where
    S: UserRepository + PostRepository + CommentRepository + ViewRepository,
{
    let posts = store.list_posts().await.expect("list posts");
    let mut comments = Vec::new();
    let mut views = Vec::new();
    for post in &posts {
        comments.extend(store.list_comments_for_post(post.id).await.expect("comments"));
        views.extend(store.list_views_for_post(post.id).await.expect("views"));
    }
    Snapshot {
        users: store.list_users().await.expect("list users"),
        posts,
        comments,
        views,
    }
}

impl<S> Harness<S>
where
    S: UserRepository + PostRepository + CommentRepository + ViewRepository,
{
    /// Registers `username` and creates one post as them.
    pub async fn user_with_post(&self, username: &str) -> Post {
        self.engine
            .register(registration(username))
            .await
            .expect("register");
        self.engine
            .create_post("the prestige".into(), "magician illusion.".into(), username)
            .await
            .expect("create post")
    }
}
