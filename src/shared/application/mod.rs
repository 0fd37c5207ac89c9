/// Shared application layer patterns
pub mod use_case;

pub use use_case::UseCase;
