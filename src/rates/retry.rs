use crate::config::RatesConfig;
use crate::error::Error;
use anyhow::Result;
use std::thread::sleep;
use std::time::Duration;

/// Exponential backoff for rate-service calls: `base_delay`, then twice
/// that, and so on, for at most `max_retries` extra attempts.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Backoff {
    pub fn from_config(settings: &RatesConfig) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: settings.retry_backoff(),
        }
    }

    pub fn delay(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2_u32.saturating_pow(retry))
    }

    pub fn run<F, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let mut retry = 0;
        loop {
            let error = match operation() {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if retry >= self.max_retries || !is_transient(&error) {
                tracing::debug!(attempts = retry + 1, "giving up on rate service");
                return Err(error);
            }

            let delay = self.delay(retry);
            tracing::warn!(
                retry = retry + 1,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                "rate request failed: {:#}",
                error
            );
            sleep(delay);
            retry += 1;
        }
    }
}

/// A 4xx answer will not change on retry; network errors and 5xx may.
fn is_transient(error: &anyhow::Error) -> bool {
    !matches!(
        error.downcast_ref::<Error>(),
        Some(Error::RateService(status)) if (400..500).contains(status)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backoff(max_retries: u32) -> Backoff {
        Backoff {
            max_retries,
            base_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_delay_doubles() {
        let b = Backoff {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(b.delay(0), Duration::from_millis(100));
        assert_eq!(b.delay(2), Duration::from_millis(400));
    }

    #[test]
    fn test_succeeds_after_failures() {
        let mut calls = 0;
        let result = backoff(3).run(|| {
            calls += 1;
            if calls < 3 {
                Err(Error::RateService(502).into())
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_exhausts_retries() {
        let mut calls = 0;
        let result: Result<()> = backoff(2).run(|| {
            calls += 1;
            anyhow::bail!("connection refused")
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let mut calls = 0;
        let result: Result<()> = backoff(5).run(|| {
            calls += 1;
            Err(Error::RateService(404).into())
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
