use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::Config;
use crate::errors::TokenError;

/// Per-call cancellation and deadline for operations that reach the session store.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl OpContext {
    /// No deadline, cancellable through [`OpContext::cancel_token`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fresh context carrying the configured default store timeout, if any.
    pub fn from_config(config: &Config) -> Self {
        match config.store_timeout_ms() {
            Some(ms) => Self::new().with_timeout(Duration::from_millis(ms)),
            None => Self::new(),
        }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `fut` unless the caller cancels or the deadline passes first.
    /// Cancellation wins ties so an already-canceled context never starts I/O.
    pub async fn run<T, E, F>(&self, fut: F) -> Result<T, E>
    where
        E: From<TokenError>,
        F: Future<Output = Result<T, E>>,
    {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(TokenError::Canceled.into()),
                res = tokio::time::timeout_at(deadline, fut) => {
                    res.unwrap_or_else(|_| Err(TokenError::Timeout.into()))
                }
            },
            None => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(TokenError::Canceled.into()),
                res = fut => res,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_result_through() {
        let ctx = OpContext::new();
        let res = ctx.run(async { Ok::<_, TokenError>(7) }).await;
        assert_eq!(res, Ok(7));
    }

    #[tokio::test]
    async fn canceled_context_never_runs() {
        let ctx = OpContext::new();
        ctx.cancel_token().cancel();
        let res = ctx.run(async { Ok::<_, TokenError>(()) }).await;
        assert_eq!(res, Err(TokenError::Canceled));
    }

    #[test]
    fn from_config_applies_store_timeout() {
        let cfg = Config::new("iss", "aud", 5, 60, [0u8; 32], vec![("k".into(), vec![0u8; 32])], "k")
            .unwrap();
        assert!(OpContext::from_config(&cfg).deadline.is_none());

        let cfg = cfg.with_store_timeout_ms(Some(250));
        assert!(OpContext::from_config(&cfg).deadline.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_turns_into_timeout() {
        let ctx = OpContext::new().with_timeout(Duration::from_millis(50));
        let res = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, TokenError>(())
            })
            .await;
        assert_eq!(res, Err(TokenError::Timeout));
    }
}
