use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::trusted_headers::TrustedHeaders;

static EMPTY_TRUSTED_HEADERS: TrustedHeaders = TrustedHeaders::new();

/// Why a context stopped a computation before it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// `RequestContext` is the execution context of a single request.
///
/// It carries the [`TrustedHeaders`] attached by a successful authentication,
/// the request deadline and a cancellation token. Contexts are never mutated:
/// every `with_*` method derives a new context and leaves the parent intact.
/// Cancellation flows from a parent to every context derived from it, never
/// the other way.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    trusted_headers: Option<Arc<TrustedHeaders>>,
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Create a root context with no deadline and a fresh cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root context bound to an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancellation: token,
            ..Self::default()
        }
    }

    /// Derive a context carrying `headers`.
    ///
    /// The headers are frozen: later changes to the caller's copy are not
    /// visible through the derived context.
    #[must_use]
    pub fn with_trusted_headers(&self, headers: TrustedHeaders) -> Self {
        Self {
            trusted_headers: Some(Arc::new(headers)),
            ..self.derive()
        }
    }

    /// Trusted headers attached to this context, or an empty set if the
    /// request was never authenticated.
    #[must_use]
    pub fn trusted_headers(&self) -> &TrustedHeaders {
        self.trusted_headers
            .as_deref()
            .unwrap_or(&EMPTY_TRUSTED_HEADERS)
    }

    /// Whether an authenticator attached trusted headers to this context.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.trusted_headers.is_some()
    }

    /// Derive a context that expires at `deadline`, or at the parent's
    /// deadline if that one is earlier.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
            ..self.derive()
        }
    }

    /// Derive a context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.derive(),
        }
    }

    /// Child context with its own cancellation token linked to this one.
    fn derive(&self) -> Self {
        Self {
            trusted_headers: self.trusted_headers.clone(),
            deadline: self.deadline,
            cancellation: self.cancellation.child_token(),
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline. `Some(Duration::ZERO)` once it has passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Cancel this context and every context derived from it.
    ///
    /// The parent and sibling contexts are unaffected. Clones share the token
    /// and are cancelled too.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Drive `fut` until it completes, the context is canceled, or the
    /// deadline passes, whichever happens first.
    ///
    /// # Errors
    ///
    /// - [`ContextError::Canceled`] if the context was canceled first
    /// - [`ContextError::DeadlineExceeded`] if the deadline passed first
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        let cancelled = self.cancellation.cancelled();
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = cancelled => Err(ContextError::Canceled),
                    () = tokio::time::sleep_until(deadline) => Err(ContextError::DeadlineExceeded),
                    out = fut => Ok(out),
                }
            }
            None => {
                tokio::select! {
                    biased;
                    () = cancelled => Err(ContextError::Canceled),
                    out = fut => Ok(out),
                }
            }
        }
    }
}
