// Shared Kernel
// Cross-cutting pieces used by every bounded context

pub mod application; // Shared application layer patterns
pub mod config; // Environment-driven configuration
pub mod errors; // Shared error types
pub mod infrastructure; // Shared infrastructure (database, http)
pub mod utils; // Logging and validation helpers

pub use config::AppConfig;
pub use infrastructure::database::Database;
