use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::transport::BoxedTransport;
use crate::errors::StudioResult;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default delay before the first retry (milliseconds).
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1000;

/// Exponential backoff without jitter or cap.
///
/// A call makes at most `1 + max_retries` attempts. The delay before retry
/// `n` (zero-based) is `initial_backoff * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
        }
    }

    /// Delay slept before the zero-based `retry`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(retry))
    }

    /// Total time slept before the attempt that follows `failures` failures.
    pub fn total_delay(&self, failures: u32) -> Duration {
        (0..failures.min(self.max_retries))
            .map(|retry| self.delay_for(retry))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Stateless JSON client that retries every failure with exponential backoff.
///
/// Cloning is cheap; clones share the transport. Each call owns its own retry
/// budget, so concurrent calls do not affect each other.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use voiceover_studio::core::client::{ReqwestTransport, ResilientClient, RetryPolicy};
///
/// let transport = Arc::new(ReqwestTransport::new(Some(api_key))?);
/// let client = ResilientClient::new(transport, RetryPolicy::default());
/// let reply = client.call(&endpoint, &serde_json::json!({"contents": []})).await?;
/// ```
#[derive(Clone)]
pub struct ResilientClient {
    transport: BoxedTransport,
    policy: RetryPolicy,
}

impl ResilientClient {
    pub fn new(transport: BoxedTransport, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// POST `payload` to `endpoint` with the client's default policy.
    pub async fn call(&self, endpoint: &str, payload: &Value) -> StudioResult<Value> {
        self.call_with_policy(endpoint, payload, self.policy).await
    }

    /// POST `payload` to `endpoint`, retrying per `policy`.
    ///
    /// Retries are unconditional: client errors, server errors and transport
    /// failures are all retried alike. The last failure is returned once the
    /// budget is spent.
    pub async fn call_with_policy(
        &self,
        endpoint: &str,
        payload: &Value,
        policy: RetryPolicy,
    ) -> StudioResult<Value> {
        let mut retries_left = policy.max_retries;
        let mut backoff = policy.initial_backoff;
        let mut attempt: u32 = 1;

        loop {
            debug!(endpoint, attempt, "Sending request");

            match self.transport.post_json(endpoint, payload).await {
                Ok(value) => return Ok(value),
                Err(e) if retries_left > 0 => {
                    warn!(
                        endpoint,
                        attempt,
                        retries_left,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying after backoff"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    retries_left -= 1;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        endpoint,
                        attempts = attempt,
                        waited_ms = policy.total_delay(attempt - 1).as_millis() as u64,
                        error = %e,
                        "Request failed, retries exhausted"
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Typed variant of [`ResilientClient::call`].
    pub async fn call_json<Req, Resp>(&self, endpoint: &str, request: &Req) -> StudioResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_value(request)?;
        let value = self.call(endpoint, &payload).await?;
        Ok(serde_json::from_value(value)?)
    }
}
