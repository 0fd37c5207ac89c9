pub mod webhook_event_publisher;

pub use webhook_event_publisher::{LoggingEventPublisher, WebhookEventPublisher};
