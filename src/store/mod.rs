pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::app::Result;

pub use memory::MemoryTokenStorage;
pub use sqlite::SqliteTokenStorage;

/// Storage key holding the bearer token for API requests.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Persisted string values shared by the whole process.
///
/// Read on every outgoing request, written only by login and logout.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
