//! # SQLite store
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `domains` entities. Ids are stored as 16-byte BLOBs, timestamps as
//! RFC 3339 TEXT. Insertion order is the `seq` rowid alias.

use std::str::FromStr;

use async_trait::async_trait;
use domains::errors::{DomainError, Result};
use domains::models::{username_key, Comment, Post, User, View};
use domains::ports::{CommentRepository, PostRepository, UserRepository, ViewRepository};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

pub struct SqliteStore {
    pool: SqlitePool,
}

fn db_err(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "sqlite query failed");
    DomainError::storage(err)
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url` and applies migrations.
    ///
    /// `sqlite::memory:` databases live only as long as their connection, so
    /// they get a single connection that is never recycled.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await.map_err(db_err)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DomainError::storage)?;

        tracing::info!(url, "sqlite store ready");
        Ok(Self { pool })
    }

    async fn count(&self, table: &str) -> Result<u64> {
        let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        let n: i64 = row.try_get("n").map_err(db_err)?;
        Ok(n as u64)
    }
}

fn user_from_row(row: &SqliteRow) -> std::result::Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        password: row.try_get("password")?,
        locked: row.try_get("locked")?,
        registered_at: row.try_get("registered_at")?,
    })
}

fn post_from_row(row: &SqliteRow) -> std::result::Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn comment_from_row(row: &SqliteRow) -> std::result::Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        text: row.try_get("text")?,
        commenter_id: row.try_get("commenter_id")?,
        commenter: row.try_get("commenter")?,
        commented_at: row.try_get("commented_at")?,
    })
}

fn view_from_row(row: &SqliteRow) -> std::result::Result<View, sqlx::Error> {
    Ok(View {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        viewer: row.try_get("viewer")?,
        viewed_at: row.try_get("viewed_at")?,
    })
}

fn collect<T>(
    rows: Vec<SqliteRow>,
    map: fn(&SqliteRow) -> std::result::Result<T, sqlx::Error>,
) -> Result<Vec<T>> {
    rows.iter().map(|row| map(row).map_err(db_err)).collect()
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn save_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, username_key, first_name, last_name, password, locked, registered_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                 username = excluded.username,
                 username_key = excluded.username_key,
                 first_name = excluded.first_name,
                 last_name = excluded.last_name,
                 password = excluded.password,
                 locked = excluded.locked",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(username_key(&user.username))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password)
        .bind(user.locked)
        .bind(user.registered_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(user_from_row).transpose().map_err(db_err)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username_key = ?")
            .bind(username_key(username))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(user_from_row).transpose().map_err(db_err)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, user_from_row)
    }

    async fn count_users(&self) -> Result<u64> {
        self.count("users").await
    }

    async fn delete_all_users(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        for table in ["views", "comments", "posts", "users"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)
    }
}

#[async_trait]
impl PostRepository for SqliteStore {
    async fn save_post(&self, post: &Post) -> Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, owner_id, title, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                 title = excluded.title,
                 content = excluded.content,
                 updated_at = excluded.updated_at",
        )
        .bind(post.id)
        .bind(post.owner_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(post_from_row).transpose().map_err(db_err)
    }

    async fn list_posts_by_owner(&self, owner_id: Uuid) -> Result<Vec<Post>> {
        let rows = sqlx::query("SELECT * FROM posts WHERE owner_id = ? ORDER BY seq")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, post_from_row)
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query("SELECT * FROM posts ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, post_from_row)
    }

    /// Children and parent go in one transaction, children first.
    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        for statement in [
            "DELETE FROM views WHERE post_id = ?",
            "DELETE FROM comments WHERE post_id = ?",
            "DELETE FROM posts WHERE id = ?",
        ] {
            sqlx::query(statement)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)
    }

    async fn count_posts(&self) -> Result<u64> {
        self.count("posts").await
    }

    async fn delete_all_posts(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        for table in ["views", "comments", "posts"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)
    }
}

#[async_trait]
impl CommentRepository for SqliteStore {
    async fn save_comment(&self, comment: &Comment) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, commenter_id, commenter, text, commented_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET text = excluded.text",
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.commenter_id)
        .bind(&comment.commenter)
        .bind(&comment.text)
        .bind(comment.commented_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(comment_from_row).transpose().map_err(db_err)
    }

    async fn list_comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query("SELECT * FROM comments WHERE post_id = ? ORDER BY seq")
            .bind(post_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, comment_from_row)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn count_comments(&self) -> Result<u64> {
        self.count("comments").await
    }
}

#[async_trait]
impl ViewRepository for SqliteStore {
    async fn save_view(&self, view: &View) -> Result<()> {
        sqlx::query(
            "INSERT INTO views (id, post_id, viewer, viewed_at) VALUES (?, ?, ?, ?)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(view.id)
        .bind(view.post_id)
        .bind(&view.viewer)
        .bind(view.viewed_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_views_for_post(&self, post_id: Uuid) -> Result<Vec<View>> {
        let rows = sqlx::query("SELECT * FROM views WHERE post_id = ? ORDER BY seq")
            .bind(post_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, view_from_row)
    }

    async fn count_views(&self) -> Result<u64> {
        self.count("views").await
    }
}
