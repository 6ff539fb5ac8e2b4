use crate::config::TimerConfig;
use crate::service::TimerService;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_shutdown_discards_pending_timers() {
    let timer = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));

    for _ in 0..10 {
        let counter_clone = Arc::clone(&counter);
        timer.add(Duration::from_millis(100), move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
    }

    timer.shutdown();
    thread::sleep(Duration::from_millis(250));
    // 未到期的回调被丢弃，永不执行 (Pending callbacks are dropped, never run)
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn test_shutdown_waits_for_in_flight_handler() {
    let timer = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = Arc::clone(&counter);

    timer.add(Duration::from_millis(10), move |_| {
        thread::sleep(Duration::from_millis(150));
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });

    // 让处理函数先开始执行 (Let the handler start running first)
    thread::sleep(Duration::from_millis(50));

    let start = Instant::now();
    timer.shutdown();
    // shutdown 阻塞到进行中的处理函数完成 (shutdown blocks until the
    // in-flight handler completes)
    assert!(start.elapsed() >= Duration::from_millis(100));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_drop_stops_worker() {
    let counter = Arc::new(AtomicU32::new(0));
    {
        let timer = TimerService::with_defaults().unwrap();
        let counter_clone = Arc::clone(&counter);
        timer.add(Duration::from_millis(100), move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        // 作用域结束即隐式关闭 (Going out of scope shuts down implicitly)
    }
    thread::sleep(Duration::from_millis(250));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn test_shutdown_with_no_timers() {
    let timer = TimerService::with_defaults().unwrap();
    timer.shutdown();
}

#[test]
fn test_multiple_instances_do_not_interfere() {
    let a = TimerService::with_defaults().unwrap();
    let b = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));

    let counter_clone = Arc::clone(&counter);
    a.add(Duration::from_millis(30), move |_| {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });
    let counter_clone = Arc::clone(&counter);
    b.add(Duration::from_millis(30), move |_| {
        counter_clone.fetch_add(10, Ordering::SeqCst);
    });

    // 关闭一个实例不影响另一个 (Shutting one instance down does not affect
    // the other)
    a.shutdown();
    thread::sleep(Duration::from_millis(150));
    let fired = counter.load(Ordering::SeqCst);
    assert!(fired == 10 || fired == 11, "unexpected count {}", fired);

    b.shutdown();
}

#[test]
fn test_named_worker_thread() {
    let config = TimerConfig::builder()
        .thread_name("goshawk-test-worker")
        .build()
        .unwrap();
    let timer = TimerService::new(config).unwrap();

    let name = Arc::new(parking_lot::Mutex::new(None::<String>));
    let name_clone = Arc::clone(&name);
    timer.add(Duration::from_millis(10), move |_| {
        *name_clone.lock() = thread::current().name().map(String::from);
    });

    thread::sleep(Duration::from_millis(100));
    assert_eq!(name.lock().as_deref(), Some("goshawk-test-worker"));
}
