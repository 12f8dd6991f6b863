//! # In-memory store
//!
//! `DashMap`-backed implementation of every repository port. Used by the
//! `db-memory` build of the binary and by the test suites.
//!
//! Each row carries a monotonically increasing sequence number assigned on
//! first insert; list operations sort by it to preserve insertion order.
//! Re-saving an existing id replaces the record but keeps its position.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use domains::errors::Result;
use domains::models::{username_key, Comment, Post, User, View};
use domains::ports::{CommentRepository, PostRepository, UserRepository, ViewRepository};
use uuid::Uuid;

struct Row<T> {
    seq: u64,
    record: T,
}

type Table<T> = DashMap<Uuid, Row<T>>;

#[derive(Default)]
pub struct MemoryStore {
    seq: AtomicU64,
    users: Table<User>,
    posts: Table<Post>,
    comments: Table<Comment>,
    views: Table<View>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn upsert<T: Clone>(&self, table: &Table<T>, id: Uuid, record: &T) {
        table
            .entry(id)
            .and_modify(|row| row.record = record.clone())
            .or_insert_with(|| Row {
                seq: self.seq.fetch_add(1, Ordering::Relaxed),
                record: record.clone(),
            });
    }
}

fn ordered<T: Clone>(table: &Table<T>, keep: impl Fn(&T) -> bool) -> Vec<T> {
    let mut rows: Vec<(u64, T)> = table
        .iter()
        .filter(|entry| keep(&entry.value().record))
        .map(|entry| (entry.value().seq, entry.value().record.clone()))
        .collect();
    rows.sort_by_key(|(seq, _)| *seq);
    rows.into_iter().map(|(_, record)| record).collect()
}

fn fetch<T: Clone>(table: &Table<T>, id: Uuid) -> Option<T> {
    table.get(&id).map(|row| row.record.clone())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn save_user(&self, user: &User) -> Result<()> {
        self.upsert(&self.users, user.id, user);
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(fetch(&self.users, id))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let key = username_key(username);
        Ok(self
            .users
            .iter()
            .find(|entry| username_key(&entry.value().record.username) == key)
            .map(|entry| entry.value().record.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(ordered(&self.users, |_| true))
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.users.len() as u64)
    }

    async fn delete_all_users(&self) -> Result<()> {
        self.views.clear();
        self.comments.clear();
        self.posts.clear();
        self.users.clear();
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn save_post(&self, post: &Post) -> Result<()> {
        self.upsert(&self.posts, post.id, post);
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(fetch(&self.posts, id))
    }

    async fn list_posts_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>> {
        Ok(ordered(&self.posts, |post| post.owner_id == owner_id))
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        Ok(ordered(&self.posts, |_| true))
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        self.views.retain(|_, row| row.record.post_id != id);
        self.comments.retain(|_, row| row.record.post_id != id);
        self.posts.remove(&id);
        Ok(())
    }

    async fn count_posts(&self) -> Result<u64> {
        Ok(self.posts.len() as u64)
    }

    async fn delete_all_posts(&self) -> Result<()> {
        self.views.clear();
        self.comments.clear();
        self.posts.clear();
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn save_comment(&self, comment: &Comment) -> Result<()> {
        self.upsert(&self.comments, comment.id, comment);
        Ok(())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(fetch(&self.comments, id))
    }

    async fn list_comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        Ok(ordered(&self.comments, |comment| comment.post_id == post_id))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        self.comments.remove(&id);
        Ok(())
    }

    async fn count_comments(&self) -> Result<u64> {
        Ok(self.comments.len() as u64)
    }
}

#[async_trait]
impl ViewRepository for MemoryStore {
    async fn save_view(&self, view: &View) -> Result<()> {
        self.upsert(&self.views, view.id, view);
        Ok(())
    }

    async fn list_views_for_post(&self, post_id: Uuid) -> Result<Vec<View>> {
        Ok(ordered(&self.views, |view| view.post_id == post_id))
    }

    async fn count_views(&self) -> Result<u64> {
        Ok(self.views.len() as u64)
    }
}
