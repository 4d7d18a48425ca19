use std::{
    sync::{
        atomic::{AtomicBool, Ordering::SeqCst},
        Arc,
    },
    thread,
    time::Duration,
};

/// How to wait for a long-running operation.
#[derive(Clone, Debug, PartialEq)]
pub struct PollConfig {
    /// Amount of time to wait before the second poll.
    pub interval: Duration,
    /// Amount to scale the wait by after every poll. The wait after poll N (counting from zero)
    /// is `interval * backoff_factor^N`. Factors below 1 or not finite are treated as 1.
    pub backoff_factor: f64,
    /// Upper bound on a single wait, if any.
    pub max_interval: Option<Duration>,
    /// Give up once the operation has been running for this long, if set.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: Duration::from_secs(1),
            backoff_factor: 1.0,
            max_interval: None,
            timeout: None,
        }
    }
}

impl PollConfig {
    pub fn wait_after(&self, i_poll: u32) -> Duration {
        if self.interval.is_zero() {
            return Duration::ZERO;
        }
        let wait_factor = self
            .effective_backoff_factor()
            .powi(i_poll.try_into().unwrap_or(i32::MAX));
        let wait = Duration::try_from_secs_f64(self.interval.as_secs_f64() * wait_factor)
            .unwrap_or(Duration::MAX);
        match self.max_interval {
            Some(max_interval) => wait.min(max_interval),
            None => wait,
        }
    }

    /// `backoff_factor`, or 1 when it is below 1 or not finite.
    pub fn effective_backoff_factor(&self) -> f64 {
        if self.backoff_factor.is_finite() && self.backoff_factor >= 1.0 {
            self.backoff_factor
        } else {
            1.0
        }
    }
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

impl<SleeperT: Sleeper + ?Sized> Sleeper for &SleeperT {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Blocks the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}

/// Cooperative stop signal, checked before every poll. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(SeqCst)
    }
}
