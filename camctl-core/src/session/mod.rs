//! Session management

pub mod cache;
pub mod manager;
pub mod state;

// Re-export key types for convenience
pub use cache::SessionCache;
pub use manager::SessionManager;
pub use state::{Session, SessionStatus};
