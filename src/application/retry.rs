use std::fmt::Display;
use std::future::Future;

use bytes::Bytes;

use crate::api::{ApiClient, RetryPolicy};

/// Run `operation` until it succeeds or the policy's attempt budget is spent.
///
/// The closure receives the 1-based attempt number. Between failed attempts
/// the loop sleeps for `policy.delay`; the delay never grows. A budget of 0
/// is treated as a single attempt. The last error is returned on exhaustion.
pub async fn retry_fixed<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                tracing::debug!(
                    attempt,
                    max_attempts,
                    delay = ?policy.delay,
                    error = %e,
                    "retrying after delay"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// GET `url` with a fixed-delay retry budget.
pub async fn fetch_with_retry(
    client: &ApiClient,
    url: &str,
    policy: RetryPolicy,
) -> crate::api::Result<Bytes> {
    retry_fixed(policy, |attempt| async move {
        let result = client.fetch_bytes(url).await;
        if let Err(e) = &result {
            tracing::warn!(url = %url, attempt, error = %e, "image fetch failed");
        }
        result
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiConfig, ApiError};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn policy(max_attempts: u32, delay_ms: u64) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(delay_ms))
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_uses_every_attempt() {
        for k in 1..=5 {
            let calls = AtomicU32::new(0);
            let result: Result<(), &str> = retry_fixed(policy(k, 10), |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("boom") }
            })
            .await;

            assert_eq!(result, Err("boom"));
            assert_eq!(calls.load(Ordering::SeqCst), k);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_first_success() {
        for k in 1..=5 {
            for j in 1..=k {
                let calls = AtomicU32::new(0);
                let result = retry_fixed(policy(k, 10), |attempt| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if attempt >= j {
                            Ok(attempt)
                        } else {
                            Err("not yet")
                        }
                    }
                })
                .await;

                assert_eq!(result, Ok(j));
                assert_eq!(calls.load(Ordering::SeqCst), j);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_constant_between_attempts() {
        let start = tokio::time::Instant::now();
        let result: Result<(), &str> =
            retry_fixed(policy(3, 100), |_| async { Err("HTTP 500") }).await;

        assert!(result.is_err());
        // Two sleeps between three attempts
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_still_tries_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> = retry_fixed(policy(0, 10), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("boom") }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_with_retry_gives_up_on_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/img.png")
            .with_status(500)
            .expect(3)
            .create_async()
            .await;

        let client = ApiClient::new(ApiConfig::with_base_url(&server.url()).unwrap());
        let err = fetch_with_retry(
            &client,
            &format!("{}/img.png", server.url()),
            policy(3, 5),
        )
        .await
        .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_fetch_with_retry_returns_first_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/img.png")
            .with_status(200)
            .with_body("png-bytes")
            .expect(1)
            .create_async()
            .await;

        let client = ApiClient::new(ApiConfig::with_base_url(&server.url()).unwrap());
        let bytes = fetch_with_retry(
            &client,
            &format!("{}/img.png", server.url()),
            policy(3, 5),
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(&bytes[..], b"png-bytes");
    }
}
