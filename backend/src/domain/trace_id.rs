//! Request-scoped trace identifier for correlating logs and errors.
//!
//! The identifier lives in Tokio task-local storage. Task-locals are not
//! inherited by spawned tasks or blocking threads, so password hashing and
//! other CPU-bound work goes through [`TraceId::spawn_blocking`], which
//! re-enters the scope on the worker thread.

use std::future::Future;

use tokio::task::JoinError;
use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use workout_backend::TraceId;
///
/// async fn handler() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(trace_id = %id, "handling request");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a new random trace identifier.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the current trace identifier if one is in scope.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Execute the future with the supplied trace identifier in scope.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Run `work` on Tokio's blocking pool, carrying the current trace
    /// identifier (if any) onto the worker thread.
    pub async fn spawn_blocking<F, R>(work: F) -> Result<R, JoinError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let current = Self::current();
        tokio::task::spawn_blocking(move || match current {
            Some(id) => TRACE_ID.sync_scope(id, work),
            None => work(),
        })
        .await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async move { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn spawn_blocking_carries_trace_onto_worker() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async move {
            TraceId::spawn_blocking(TraceId::current).await
        })
        .await
        .expect("blocking task completes");
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn spawn_blocking_without_scope_has_no_trace() {
        let observed = TraceId::spawn_blocking(TraceId::current)
            .await
            .expect("blocking task completes");
        assert!(observed.is_none());
    }

    #[test]
    fn parses_uuid_text() {
        let trace_id: TraceId = Uuid::nil().to_string().parse().expect("parse uuid");
        assert_eq!(trace_id.to_string(), Uuid::nil().to_string());
    }
}
