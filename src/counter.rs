use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic count of served operations.
///
/// Only ever incremented by one; never reset for the life of the process.
#[derive(Debug, Default)]
pub struct RequestCounter {
    total: AtomicU64,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to the counter
    pub fn increment(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value
    pub fn load(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(RequestCounter::new().load(), 0);
    }

    #[test]
    fn test_increment_adds_one() {
        let counter = RequestCounter::new();
        counter.increment();
        counter.increment();
        assert_eq!(counter.load(), 2);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counter = RequestCounter::new();
        let workers = 50;
        let per_worker = 200;

        std::thread::scope(|s| {
            for _ in 0..workers {
                s.spawn(|| {
                    for _ in 0..per_worker {
                        counter.increment();
                    }
                });
            }
        });

        assert_eq!(counter.load(), 10_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_from_tasks() {
        let counter = Arc::new(RequestCounter::new());
        let mut tasks = Vec::new();

        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            tasks.push(tokio::spawn(async move {
                for _ in 0..100 {
                    counter.increment();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(counter.load(), 10_000);
    }
}
