pub mod job_task_queue;

pub use job_task_queue::JobTaskQueue;
