//! HTTP client with client-side rate limiting and retry logic
//!
//! Shared by every outbound integration so retry and throttling rules live
//! in one place.

use super::retry_policy::{is_retryable_error, RateLimitInfo, RetryPolicy};
use crate::shared::errors::{AppError, AppResult};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

const USER_AGENT: &str = "usermgmt/0.1";

pub struct RateLimitClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    retry_policy: RetryPolicy,
    service_name: String,
}

impl RateLimitClient {
    pub fn for_identity_platform() -> Self {
        Self::new(
            "IdentityPlatform",
            RetryPolicy::identity_platform(),
            Self::create_rate_limiter(10, 20),
        )
    }

    pub fn for_event_webhook() -> Self {
        Self::new(
            "EventWebhook",
            RetryPolicy::event_webhook(),
            Self::create_rate_limiter(20, 40),
        )
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    fn create_rate_limiter(requests_per_second: u32, burst_size: u32) -> DirectRateLimiter {
        let rate = NonZeroU32::new(requests_per_second.max(1)).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst_size.max(1)).unwrap_or(NonZeroU32::MIN);

        GovernorRateLimiter::direct(Quota::per_second(rate).allow_burst(burst))
    }

    pub fn new(service_name: &str, retry_policy: RetryPolicy, rate_limiter: DirectRateLimiter) -> Self {
        Self {
            client: Client::new(),
            rate_limiter,
            retry_policy,
            service_name: service_name.to_string(),
        }
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post_json<T>(&self, url: &str, body: &Value) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response_text = self.request_with_retries(Method::POST, url, Some(body)).await?;
        self.parse_body(&response_text)
    }

    /// POST a JSON body, ignoring whatever the server answers with on success
    pub async fn post_json_ignore_body(&self, url: &str, body: &Value) -> AppResult<()> {
        self.request_with_retries(Method::POST, url, Some(body))
            .await
            .map(|_| ())
    }

    async fn request_with_retries(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> AppResult<String> {
        let max_attempts = self.retry_policy.max_retries + 1;

        for attempt in 0..=self.retry_policy.max_retries {
            self.rate_limiter.until_ready().await;

            match self.build_and_send_request(&method, url, body).await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        if attempt < self.retry_policy.max_retries {
                            let info = RateLimitInfo::from_headers(response.headers());
                            let delay = self.calculate_retry_delay(attempt, &info);
                            warn!(
                                "{} rate limited (attempt {}/{}). Waiting {:?} before retry.",
                                self.service_name,
                                attempt + 1,
                                max_attempts,
                                delay
                            );
                            sleep(delay).await;
                            continue;
                        }
                        return Err(AppError::RateLimitError(format!(
                            "{} rate limit exceeded after {} attempts",
                            self.service_name, max_attempts
                        )));
                    }

                    if status.is_server_error() && attempt < self.retry_policy.max_retries {
                        let delay = self.retry_policy.calculate_delay(attempt, None);
                        warn!(
                            "{} returned {} (attempt {}/{}). Retrying in {:?}",
                            self.service_name,
                            status,
                            attempt + 1,
                            max_attempts,
                            delay
                        );
                        sleep(delay).await;
                        continue;
                    }

                    if !status.is_success() {
                        return Err(self.status_error(status, response).await);
                    }

                    return response.text().await.map_err(|e| {
                        AppError::SerializationError(format!(
                            "Failed to read {} response: {}",
                            self.service_name, e
                        ))
                    });
                }
                Err(e) => {
                    if is_retryable_error(&e) && attempt < self.retry_policy.max_retries {
                        let delay = self.retry_policy.calculate_delay(attempt, None);
                        warn!(
                            "{} request failed (attempt {}/{}): {}. Retrying in {:?}",
                            self.service_name,
                            attempt + 1,
                            max_attempts,
                            e,
                            delay
                        );
                        sleep(delay).await;
                        continue;
                    }
                    return Err(AppError::from(e));
                }
            }
        }

        Err(AppError::ExternalServiceError(format!(
            "{} request failed after {} attempts",
            self.service_name, max_attempts
        )))
    }

    async fn build_and_send_request(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Response, reqwest::Error> {
        let mut request_builder = self
            .client
            .request(method.clone(), url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");

        if let Some(json_body) = body {
            request_builder = request_builder.json(json_body);
        }

        request_builder.send().await
    }

    /// Map a non-success status to the matching error kind, keeping a snippet of the body
    async fn status_error(&self, status: StatusCode, response: Response) -> AppError {
        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(200).collect();
        let message = format!("{} returned {}: {}", self.service_name, status, snippet);

        match status.as_u16() {
            404 => AppError::NotFound(message),
            401 | 403 => AppError::Unauthorized(message),
            400 | 409 | 422 => AppError::InvalidInput(message),
            _ => AppError::ApiError(message),
        }
    }

    fn parse_body<T>(&self, response_text: &str) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        // No content reads as an empty object
        let text = if response_text.trim().is_empty() { "{}" } else { response_text };

        serde_json::from_str(text).map_err(|e| {
            let snippet: String = response_text.chars().take(200).collect();
            AppError::SerializationError(format!(
                "Failed to parse {} response: {}. Response: {}",
                self.service_name, e, snippet
            ))
        })
    }

    fn calculate_retry_delay(&self, attempt: u32, rate_limit_info: &RateLimitInfo) -> Duration {
        if let Some(server_delay) = rate_limit_info.recommended_delay() {
            return server_delay.min(self.retry_policy.max_delay);
        }

        self.retry_policy.calculate_delay(attempt, None)
    }

    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}
