use crate::service::TimerService;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_periodic_fires_repeatedly() {
    let timer = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = Arc::clone(&counter);

    let id = timer.add_periodic(
        Duration::from_millis(20),
        Duration::from_millis(20),
        move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        },
    );

    thread::sleep(Duration::from_millis(250));
    let fired = counter.load(Ordering::SeqCst);
    assert!(fired >= 5, "periodic timer should keep firing, got {}", fired);

    // 移除后不再触发 (No more firings after removal)
    assert!(timer.remove(id));
    thread::sleep(Duration::from_millis(60));
    let after_remove = counter.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(counter.load(Ordering::SeqCst), after_remove);
}

#[test]
fn test_periodic_first_fire_at_start() {
    let timer = TimerService::with_defaults().unwrap();
    let start = Instant::now();
    let fired_at = Arc::new(parking_lot::Mutex::new(Vec::<Instant>::new()));
    let fired_clone = Arc::clone(&fired_at);

    let id = timer.add_periodic(
        Duration::from_millis(50),
        Duration::from_millis(30),
        move |_| {
            fired_clone.lock().push(Instant::now());
        },
    );

    thread::sleep(Duration::from_millis(200));
    timer.remove(id);

    let fired = fired_at.lock();
    assert!(fired.len() >= 3);
    // 首次触发不早于起始时刻 (The first firing is not before the start instant)
    assert!(fired[0].duration_since(start) >= Duration::from_millis(50));
    // 后续触发按周期推进 (Later firings advance by the period)
    assert!(fired[1].duration_since(start) >= Duration::from_millis(80));
}

#[test]
fn test_remove_from_own_handler_stops_firing() {
    let timer = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = Arc::clone(&counter);

    // 处理函数在第 3 次调用时移除自己的 ID
    // (The handler removes its own id on its 3rd invocation)
    let timer = Arc::new(timer);
    let timer_clone = Arc::clone(&timer);

    timer.add_periodic(
        Duration::from_millis(20),
        Duration::from_millis(20),
        move |own_id| {
            let fired = counter_clone.fetch_add(1, Ordering::SeqCst) + 1;
            if fired == 3 {
                // 自我移除返回 true (Self-removal returns true)
                assert!(timer_clone.remove(own_id));
            }
        },
    );

    thread::sleep(Duration::from_millis(300));
    // 当前调用完成后不再触发 (No further firings after the current call)
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[test]
fn test_zero_period_is_oneshot() {
    let timer = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = Arc::clone(&counter);

    timer.add_periodic(Duration::from_millis(30), 0u64, move |_| {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });

    thread::sleep(Duration::from_millis(200));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_slow_handler_delays_later_expirations() {
    let timer = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));

    // 一个慢处理函数阻塞工作线程，另一个定时器的触发被推迟
    // (A slow handler blocks the worker thread; the other timer's firing is
    // delayed)
    timer.add(Duration::from_millis(10), |_| {
        thread::sleep(Duration::from_millis(100));
    });

    let start = Instant::now();
    let fired_at = Arc::new(parking_lot::Mutex::new(None::<Instant>));
    let fired_clone = Arc::clone(&fired_at);
    timer.add(Duration::from_millis(20), move |_| {
        *fired_clone.lock() = Some(Instant::now());
    });

    thread::sleep(Duration::from_millis(300));
    let at = fired_at.lock().expect("second timer should fire eventually");
    // 第二个定时器在慢处理函数完成之后才触发
    // (The second timer fires only after the slow handler finished)
    assert!(at.duration_since(start) >= Duration::from_millis(100));
    let _ = counter;
}
