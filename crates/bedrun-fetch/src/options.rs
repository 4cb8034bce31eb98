use std::sync::Arc;
use std::time::Duration;

/// Progress of a single transfer.
#[derive(Clone, Debug)]
pub struct Progress {
    pub bytes_fetched: u64,
    pub total_bytes: Option<u64>,
}

impl Progress {
    pub fn percentage(&self) -> Option<f32> {
        self.total_bytes.map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.bytes_fetched as f32 / total as f32) * 100.0
            }
        })
    }
}

pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

#[derive(Clone, Default)]
pub struct FetchOptions {
    pub min_bytes: u64,
    pub sha256: Option<String>,
    pub max_retries: u32,
    pub retry_base: Duration,
    pub on_progress: Option<ProgressFn>,
}

impl FetchOptions {
    pub fn min_bytes(mut self, bytes: u64) -> Self {
        self.min_bytes = bytes;
        self
    }

    pub fn sha256(mut self, hex_digest: impl Into<String>) -> Self {
        self.sha256 = Some(hex_digest.into());
        self
    }

    pub fn max_retries(mut self, count: u32) -> Self {
        self.max_retries = count;
        self
    }

    pub fn retry_base(mut self, base: Duration) -> Self {
        self.retry_base = base;
        self
    }

    pub fn on_progress(mut self, callback: ProgressFn) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// At least one attempt is always made.
    pub(crate) fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chains() {
        let options = FetchOptions::default()
            .min_bytes(1024)
            .max_retries(5)
            .retry_base(Duration::from_secs(2))
            .sha256("ab".repeat(32));

        assert_eq!(options.min_bytes, 1024);
        assert_eq!(options.max_retries, 5);
        assert_eq!(options.retry_base, Duration::from_secs(2));
        assert!(options.sha256.is_some());
    }

    #[test]
    fn zero_retries_still_attempts_once() {
        assert_eq!(FetchOptions::default().attempts(), 1);
        assert_eq!(FetchOptions::default().max_retries(3).attempts(), 3);
    }

    #[test]
    fn percentage_with_known_total() {
        let p = Progress {
            bytes_fetched: 50,
            total_bytes: Some(200),
        };
        assert_eq!(p.percentage(), Some(25.0));
    }

    #[test]
    fn percentage_unknown_total() {
        let p = Progress {
            bytes_fetched: 50,
            total_bytes: None,
        };
        assert_eq!(p.percentage(), None);
    }
}
