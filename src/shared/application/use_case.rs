use crate::shared::errors::AppResult;
/// Base trait for all use cases following CQRS pattern
///
/// This trait provides a standard interface for command handlers
/// following the Single Responsibility Principle.
///
/// # Example
///
/// ```rust,ignore
/// struct ImportGuardiansHandler {
///     person_repository: Arc<dyn PersonRepository>,
/// }
///
/// #[async_trait]
/// impl UseCase<ImportGuardiansCommand, ImportGuardiansResult> for ImportGuardiansHandler {
///     async fn execute(&self, command: ImportGuardiansCommand) -> AppResult<ImportGuardiansResult> {
///         // Use case logic here
///     }
/// }
/// ```
use async_trait::async_trait;

/// Base trait for use cases (command handlers)
#[async_trait]
pub trait UseCase<TCommand, TResult> {
    /// Execute the use case with the given command
    async fn execute(&self, command: TCommand) -> AppResult<TResult>;
}
