//! Call context
//!
//! Carries request-scoped metadata (e.g. headers forwarded by a receiver),
//! a cancellation token and an optional deadline alongside each batch.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::ProtocolError;

/// Per-invocation context passed with every batch
///
/// Metadata keys are case-insensitive: they are folded to lowercase on
/// insert and on lookup, the way gRPC metadata behaves.
///
/// # Example
///
/// ```
/// use telroute_protocol::CallContext;
///
/// let ctx = CallContext::new().with_metadata("X-Tenant", "acme");
/// assert_eq!(ctx.metadata("x-tenant"), Some("acme"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    metadata: HashMap<String, String>,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Create an empty context with a fresh cancellation token and no deadline
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style metadata insert
    #[must_use]
    pub fn with_metadata(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert_metadata(key, value);
        self
    }

    /// Insert or replace a metadata entry
    pub fn insert_metadata(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.metadata
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Parse and insert a `key=value` metadata entry
    pub fn insert_metadata_pair(&mut self, entry: &str) -> Result<(), ProtocolError> {
        match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                self.insert_metadata(key.trim(), value.trim());
                Ok(())
            }
            _ => Err(ProtocolError::invalid_metadata(entry)),
        }
    }

    /// Look up a metadata value by key (case-insensitive)
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Number of metadata entries
    #[inline]
    pub fn metadata_len(&self) -> usize {
        self.metadata.len()
    }

    /// Use the given cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Set an absolute deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The cancellation token for this call
    #[inline]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// The deadline for this call, if any
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Check if the call was cancelled
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Check if the deadline has passed
    #[inline]
    pub fn deadline_exceeded(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Check if the call should not proceed (cancelled or past deadline)
    #[inline]
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.deadline_exceeded()
    }
}
