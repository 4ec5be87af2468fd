use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use moonbot::config::SchedulerConfig;
use moonbot::scheduler::{delay_until_next_midnight_utc, format_delay, Clock, DailyScheduler};

/// Virtual clock: `sleep` advances time instantly and records the
/// requested duration.
#[derive(Clone)]
struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl MockClock {
    fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(duration).unwrap();
        self.sleeps.lock().unwrap().push(duration);
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn delay_reaches_exactly_the_next_midnight() {
    let just_before = Utc.with_ymd_and_hms(2025, 1, 1, 23, 59, 59).unwrap();
    assert_eq!(
        delay_until_next_midnight_utc(just_before),
        Duration::from_secs(1)
    );

    let at_midnight = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
    assert_eq!(
        delay_until_next_midnight_utc(at_midnight),
        Duration::from_secs(24 * 3600)
    );

    let across_month_end = Utc.with_ymd_and_hms(2025, 2, 28, 18, 0, 0).unwrap();
    assert_eq!(
        delay_until_next_midnight_utc(across_month_end),
        Duration::from_secs(6 * 3600)
    );
}

#[test]
fn delay_formats_like_a_countdown() {
    assert_eq!(
        format_delay(Duration::from_secs(3661)),
        "1 hours, 1 minutes, and 1 seconds"
    );
    assert_eq!(
        format_delay(Duration::from_secs(86400)),
        "24 hours, 0 minutes, and 0 seconds"
    );
}

#[tokio::test]
async fn scheduler_publishes_exactly_once_per_utc_day() {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap();
    let clock = MockClock::new(start);
    let mut scheduler = DailyScheduler::new(clock.clone(), &SchedulerConfig::default());
    let handle = scheduler.handle();

    let published: Arc<Mutex<Vec<NaiveDate>>> = Arc::new(Mutex::new(Vec::new()));

    {
        let published = published.clone();
        let clock = clock.clone();
        scheduler
            .run(move || {
                let published = published.clone();
                let clock = clock.clone();
                let handle = handle.clone();
                async move {
                    let mut days = published.lock().unwrap();
                    days.push(clock.now().date_naive());
                    if days.len() == 3 {
                        handle.stop();
                    }
                    Ok::<(), String>(())
                }
            })
            .await;
    }

    let days = published.lock().unwrap().clone();
    assert_eq!(
        days,
        vec![date(2025, 1, 1), date(2025, 1, 2), date(2025, 1, 3)]
    );

    // First sleep bridges the partial day, the rest are full days.
    let sleeps = clock.sleeps();
    assert_eq!(sleeps[0], Duration::from_secs(18 * 3600));
    assert_eq!(sleeps[1], Duration::from_secs(24 * 3600));
}

#[tokio::test]
async fn scheduler_retries_on_backoff_until_publish_succeeds() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap();
    let clock = MockClock::new(start);
    let config = SchedulerConfig { backoff_secs: 300 };
    let mut scheduler = DailyScheduler::new(clock.clone(), &config);
    let handle = scheduler.handle();

    let attempts = Arc::new(Mutex::new(0u32));

    {
        let attempts = attempts.clone();
        scheduler
            .run(move || {
                let attempts = attempts.clone();
                let handle = handle.clone();
                async move {
                    let mut count = attempts.lock().unwrap();
                    *count += 1;
                    if *count <= 2 {
                        return Err("transmission failed".to_string());
                    }
                    handle.stop();
                    Ok(())
                }
            })
            .await;
    }

    assert_eq!(*attempts.lock().unwrap(), 3);

    // Two fixed backoffs, then the midnight-aligned sleep resumes.
    let sleeps = clock.sleeps();
    assert_eq!(sleeps[0], Duration::from_secs(300));
    assert_eq!(sleeps[1], Duration::from_secs(300));
    assert_eq!(sleeps[2], Duration::from_secs(18 * 3600 - 600));
    assert_eq!(sleeps.len(), 3);
}

#[tokio::test]
async fn stopped_scheduler_does_not_publish_again() {
    let start = Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap();
    let clock = MockClock::new(start);
    let mut scheduler = DailyScheduler::new(clock.clone(), &SchedulerConfig::default());
    let handle = scheduler.handle();

    let attempts = Arc::new(Mutex::new(0u32));

    {
        let attempts = attempts.clone();
        let handle = handle.clone();
        scheduler
            .run(move || {
                let attempts = attempts.clone();
                let handle = handle.clone();
                async move {
                    *attempts.lock().unwrap() += 1;
                    handle.stop();
                    Ok::<(), String>(())
                }
            })
            .await;
    }

    assert_eq!(*attempts.lock().unwrap(), 1);
    assert!(!handle.is_running());

    // Stopping again is a no-op.
    handle.stop();
    assert!(!handle.is_running());
}
