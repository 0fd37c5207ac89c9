pub mod import_components;

pub use import_components::{
    AsyncNotifier, BatchDeduplicator, CommitOutcome, ExistingRecordChecker, PayloadReader,
    RowValidator, TransactionalCommitter,
};
