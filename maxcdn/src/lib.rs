//! maxcdn
//!
//! Client library for the MaxCDN (NetDNA) REST API.
//!
//! Requests are signed with two-legged OAuth 1.0a (HMAC-SHA1) and sent to
//! a single REST host; responses share one JSON envelope. On top of the
//! generic verbs the crate ships purge helpers, including a concurrent
//! batch variant that fans out one task per zone or file.
//!
//! ```no_run
//! # async fn demo() -> Result<(), maxcdn::Error> {
//! let max = maxcdn::MaxCdn::new("alias", "consumer-token", "consumer-secret");
//!
//! // Whole-zone purge.
//! let response = max.purge_zone(12345).await?;
//! assert_eq!(response.code, 200);
//!
//! // Several zones at once; partial failures keep the successes.
//! let summary = max.purge_zones(&[12345, 12346]).await;
//! for response in &summary.responses {
//!     println!("purged: {}", response.code);
//! }
//! # Ok(()) }
//! ```
//!
//! Anything the helpers do not cover goes through [`MaxCdn::request`] and
//! the raw `data` value of the envelope.

pub mod client;
pub mod error;
pub mod purge;
pub mod response;
pub mod signer;

pub use client::{API_HOST, MaxCdn};
pub use error::Error;
pub use purge::PurgeSummary;
pub use response::{ApiErrorBody, ApiResponse};
pub use signer::{Credentials, Signer};

// The verb methods take this directly.
pub use reqwest::Method;
