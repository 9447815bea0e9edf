//! Error Reporting Module
//!
//! External error-tracking collaborator consumed by the cache handle.
//! A reporter receives internal faults together with a context payload
//! naming the operation and key; it must never fail back into the cache.

use std::fmt;

use serde::Serialize;
use tracing::error;

// == Error Context ==
/// Context payload attached to every reported fault.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorContext {
    /// Operation that failed, e.g. "cache.set"
    pub operation: &'static str,
    /// Key involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ErrorContext {
    /// Creates a context for the named operation.
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            key: None,
        }
    }

    /// Attaches the key the operation was acting on.
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }
}

// == Error Reporter Trait ==
/// External error-tracking collaborator.
///
/// Implementations forward the fault to whatever telemetry backend the
/// application uses. Reporting is infallible by construction so that an
/// observability failure can never affect cache correctness.
pub trait ErrorReporter: Send + Sync {
    /// Reports a cache fault with its context. The error is any
    /// displayable value: an internal bookkeeping fault or a failure from
    /// a caller-supplied populate function.
    fn report(&self, error: &dyn fmt::Display, context: &ErrorContext);
}

// == Tracing Reporter ==
/// Default reporter that logs faults through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &dyn fmt::Display, context: &ErrorContext) {
        let payload =
            serde_json::to_string(context).unwrap_or_else(|_| context.operation.to_string());
        error!(error = %error, context = %payload, "cache internal fault");
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{} (key: {})", self.operation, key),
            None => write!(f, "{}", self.operation),
        }
    }
}
