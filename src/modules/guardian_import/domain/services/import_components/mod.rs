pub mod async_notifier;
pub mod batch_deduplicator;
pub mod existing_record_checker;
pub mod payload_reader;
pub mod row_validator;
pub mod transactional_committer;

pub use async_notifier::AsyncNotifier;
pub use batch_deduplicator::BatchDeduplicator;
pub use existing_record_checker::ExistingRecordChecker;
pub use payload_reader::PayloadReader;
pub use row_validator::{RowOutcome, RowValidator};
pub use transactional_committer::{CommitOutcome, TransactionalCommitter};
