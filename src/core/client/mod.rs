//! Resilient request client.
//!
//! Every remote call in the studio (tone analysis, script refinement, speech
//! synthesis) goes through [`ResilientClient`], which retries any failure with
//! exponential backoff before giving up.
//!
//! The HTTP layer sits behind the [`Transport`] trait so the retry loop can be
//! exercised without a network.

mod retry;
mod transport;

pub use retry::{ResilientClient, RetryPolicy};
pub use transport::{BoxedTransport, ReqwestTransport, Transport, USER_AGENT};
