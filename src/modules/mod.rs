pub mod guardian_import;
pub mod jobs;
