use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chef_engine::TickDriver;
use tokio::runtime::Handle;

#[tokio::test(start_paused = true)]
async fn ticks_once_per_period_until_stopped() {
    let count = Arc::new(AtomicU64::new(0));
    let seen = count.clone();
    let driver = TickDriver::start(&Handle::current(), Duration::from_secs(1), move |tick| {
        seen.store(tick, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(count.load(Ordering::SeqCst), 3);

    driver.stop();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(count.load(Ordering::SeqCst), 3);
    assert!(driver.is_finished());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_driver_stops_ticking() {
    let count = Arc::new(AtomicU64::new(0));
    let seen = count.clone();
    let driver = TickDriver::start(&Handle::current(), Duration::from_secs(1), move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_millis(1500)).await;
    drop(driver);
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(count.load(Ordering::SeqCst), 1);
}
