use crate::service::TimerService;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_remove_before_expiration_suppresses_handler() {
    let timer = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = Arc::clone(&counter);

    let id = timer.add(Duration::from_millis(100), move |_| {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });

    assert!(timer.remove(id));
    thread::sleep(Duration::from_millis(250));
    // 被移除的定时器永不触发 (A removed timer never fires)
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn test_remove_is_idempotent() {
    let timer = TimerService::with_defaults().unwrap();
    let id = timer.add(Duration::from_millis(200), |_| {});

    assert!(timer.remove(id));
    // 重复移除同一 ID 仍返回 true (Removing the same id again still returns
    // true)
    assert!(timer.remove(id));
    assert!(timer.remove(id));
}

#[test]
fn test_remove_after_oneshot_retired() {
    let timer = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = Arc::clone(&counter);

    let id = timer.add(Duration::from_millis(20), move |_| {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });

    thread::sleep(Duration::from_millis(150));
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    // 已触发并退役的 ID 在分配范围内，移除是无害的空操作
    // (A fired-and-retired id is within the allocated range; removing it is a
    // harmless no-op)
    assert!(timer.remove(id));
    thread::sleep(Duration::from_millis(100));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_remove_never_allocated_id_returns_false() {
    let timer = TimerService::with_defaults().unwrap();
    timer.add(Duration::from_millis(500), |_| {});

    // 另一个实例分配的更大 ID 超出本实例的分配范围
    // (A larger id allocated by another instance is outside this instance's
    // allocated range)
    let other = TimerService::with_defaults().unwrap();
    other.add(Duration::from_millis(500), |_| {});
    let foreign = other.add(Duration::from_millis(500), |_| {});

    assert!(!timer.remove(foreign));
}

#[test]
fn test_remove_from_another_thread() {
    let timer = Arc::new(TimerService::with_defaults().unwrap());
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = Arc::clone(&counter);

    let id = timer.add(Duration::from_millis(150), move |_| {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });

    let timer_clone = Arc::clone(&timer);
    let remover = thread::spawn(move || timer_clone.remove(id));
    assert!(remover.join().unwrap());

    thread::sleep(Duration::from_millis(300));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn test_remove_one_of_many() {
    let timer = TimerService::with_defaults().unwrap();
    let counter = Arc::new(AtomicU32::new(0));

    let mut ids = Vec::new();
    for _ in 0..5 {
        let counter_clone = Arc::clone(&counter);
        ids.push(timer.add(Duration::from_millis(50), move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        }));
    }

    // 只移除中间那个，其余照常触发 (Only the middle one is removed; the rest
    // fire normally)
    assert!(timer.remove(ids[2]));

    thread::sleep(Duration::from_millis(200));
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}
