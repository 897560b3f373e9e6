use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::error::PlatformError;

/// Run a platform call, retrying it once after `delay` when `should_retry` accepts the error
pub async fn retry_once<T, F, Fut>(
    action: &str,
    delay: Duration,
    should_retry: impl Fn(&PlatformError) -> bool,
    mut call: F,
) -> Result<T, PlatformError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlatformError>>,
{
    match call().await {
        Ok(value) => Ok(value),
        Err(e) if should_retry(&e) => {
            warn!("{} failed ({}), retrying in {:?}", action, e, delay);
            sleep(delay).await;
            call().await
        }
        Err(e) => Err(e),
    }
}

/// Retry predicate for calls where any failure other than "gone" is worth a second try
pub fn unless_not_found(err: &PlatformError) -> bool {
    !err.is_not_found()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_retry_once_recovers() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = retry_once("test", Duration::from_secs(1), |_| true, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(PlatformError::RateLimited)
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_once_gives_up_after_second_failure() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = retry_once("test", Duration::from_secs(1), |_| true, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(PlatformError::RateLimited)
        })
        .await;

        assert!(matches!(result, Err(PlatformError::RateLimited)));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_once_skips_unretryable_errors() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = retry_once(
            "test",
            Duration::from_secs(1),
            PlatformError::is_rate_limited,
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(PlatformError::Request("bad request".into()))
            },
        )
        .await;

        assert!(matches!(result, Err(PlatformError::Request(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unless_not_found() {
        assert!(unless_not_found(&PlatformError::RateLimited));
        assert!(unless_not_found(&PlatformError::Request("x".into())));
        assert!(!unless_not_found(&PlatformError::NotFound("channel".into())));
    }
}
