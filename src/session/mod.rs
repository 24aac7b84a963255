pub mod base;
pub mod cookie_store;
pub mod memory_store;

// Re-export the primary session items so code outside can do
// "use crate::session::{SessionStore, CookieSessionStore};"
pub use base::{SessionCookieSettings, SessionError, SessionStore};
pub use cookie_store::CookieSessionStore;
pub use memory_store::MemorySessionStore;
