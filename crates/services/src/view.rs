//! # View Recorder

use std::sync::Arc;

use chrono::Utc;
use domains::errors::Result;
use domains::models::{User, View};
use domains::ports::ViewRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct ViewRecorder {
    views: Arc<dyn ViewRepository>,
}

impl ViewRecorder {
    pub fn new(views: Arc<dyn ViewRepository>) -> Self {
        Self { views }
    }

    /// Stamps `actor.username` on a new view of `post_id` and persists it.
    /// The actor is already resolved, so only the store can fail.
    pub async fn record_view(&self, post_id: Uuid, actor: &User) -> Result<View> {
        let view = View {
            id: Uuid::now_v7(),
            post_id,
            viewer: actor.username.clone(),
            viewed_at: Utc::now(),
        };
        self.views.save_view(&view).await?;
        tracing::debug!(%post_id, viewer = %view.viewer, "view recorded");
        Ok(view)
    }

    pub async fn views_of(&self, post_id: Uuid) -> Result<Vec<View>> {
        self.views.list_views_for_post(post_id).await
    }
}
