pub mod identity_platform_client;

pub use identity_platform_client::IdentityPlatformClient;
