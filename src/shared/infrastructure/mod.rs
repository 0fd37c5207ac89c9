/// Shared infrastructure concerns
///
/// Infrastructure implementations shared across bounded contexts.
pub mod database;
pub mod http_client;

pub use database::{Database, DbConnection, DbPool};
pub use http_client::RateLimitClient;
