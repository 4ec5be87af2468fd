use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use tracing::{error, info, warn};

use crate::config::SchedulerConfig;

/// Time source the scheduler runs against. Production uses [`SystemClock`];
/// tests drive the loop with a mock that advances instantly.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Delay from `now` to the next 00:00:00 UTC. Always strictly positive and
/// at most 24 hours: at midnight exactly, the next boundary is tomorrow's.
pub fn delay_until_next_midnight_utc(now: DateTime<Utc>) -> Duration {
    let tomorrow = now.date_naive() + Days::new(1);
    let next_midnight = tomorrow.and_time(NaiveTime::MIN).and_utc();
    (next_midnight - now).to_std().unwrap_or(Duration::from_secs(1))
}

pub fn format_delay(delay: Duration) -> String {
    let total = delay.as_secs();
    format!(
        "{} hours, {} minutes, and {} seconds",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Cloneable stop switch for a running scheduler. Stopping is cooperative:
/// the flag is observed at the top of the next loop iteration and never
/// interrupts an in-flight publish or sleep.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    running: Arc<AtomicBool>,
}

impl SchedulerHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Drives a publish callback at most once per UTC calendar day, as soon as
/// possible after midnight, indefinitely.
pub struct DailyScheduler<C: Clock> {
    clock: C,
    backoff: Duration,
    running: Arc<AtomicBool>,
    last_published: Option<NaiveDate>,
}

impl<C: Clock> DailyScheduler<C> {
    pub fn new(clock: C, config: &SchedulerConfig) -> Self {
        Self {
            clock,
            backoff: Duration::from_secs(config.backoff_secs),
            running: Arc::new(AtomicBool::new(false)),
            last_published: None,
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            running: self.running.clone(),
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Runs the daily loop until [`stop`](Self::stop) is observed. Each
    /// iteration publishes if today's post has not happened yet, then
    /// sleeps through the next UTC midnight. A publish error never kills
    /// the loop; it is logged and retried after a fixed backoff.
    ///
    /// The `last_published` guard is what makes a restart of the loop on
    /// the same day (or a publish that straddles midnight) safe: the date
    /// check, not the sleep cadence, enforces at-most-once per day.
    pub async fn run<F, Fut, E>(&mut self, mut publish: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: std::fmt::Display,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("scheduler is already running");
            return;
        }

        info!("starting daily post scheduler");

        while self.running.load(Ordering::SeqCst) {
            let today = self.clock.now().date_naive();
            if self.last_published == Some(today) {
                info!("already posted today, waiting for the next UTC midnight");
            } else {
                match publish().await {
                    Ok(()) => {
                        self.last_published = Some(today);
                        info!("published post for {}", today);
                    }
                    Err(err) => {
                        error!("publish failed, retrying after backoff: {}", err);
                        self.clock.sleep(self.backoff).await;
                        continue;
                    }
                }
            }

            let delay = delay_until_next_midnight_utc(self.clock.now());
            info!(
                "next post scheduled in {} (at 00:00 UTC)",
                format_delay(delay)
            );
            self.clock.sleep(delay).await;
        }

        info!("scheduler stopped");
    }
}
