//! # services
//!
//! The domain-state engine of Rusty-Blog.
//!
//! Control flow: Session Gate → Post Manager → {Comment Manager, View Recorder}
//! → store ports. Operations are request-scoped: each reads current state from
//! the store, decides, and writes back. Nothing is cached in-process.

pub mod comment;
pub mod engine;
pub mod post;
pub mod session;
pub mod view;

pub use comment::CommentManager;
pub use engine::{BlogEngine, Stores};
pub use post::PostManager;
pub use session::SessionGate;
pub use view::ViewRecorder;
