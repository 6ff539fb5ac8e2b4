//! Worker loop
//!
//! One background thread per service instance, driven by a single mutex and a
//! single condition variable. Three states:
//!
//! - Idle: queue empty, wait indefinitely for a signal.
//! - Waiting: soonest entry in the future, timed-wait until its deadline; any
//!   wake (signal, timeout, spurious) re-evaluates from scratch.
//! - Firing: soonest deadline passed, pop-validate-invoke-revalidate.
//!
//! The handler runs with the lock released, so it may call `add`/`remove` on
//! the same instance without deadlock; the event is re-validated once the
//! lock is reacquired. All timed waits use `Instant` (monotonic clock).
//!
//! 工作循环
//!
//! 每个服务实例一个后台线程，由一个互斥锁和一个条件变量驱动。三种状态：
//!
//! - 空闲：队列为空，无限期等待信号。
//! - 等待：最早的条目在未来，定时等待至其到期时刻；任何唤醒
//!   （信号、超时、虚假唤醒）都会重新评估。
//! - 触发：最早的到期时刻已过，弹出-校验-调用-再校验。
//!
//! 处理函数在释放锁的情况下运行，因此可以对同一实例调用 `add`/`remove`
//! 而不会死锁；重新获得锁后会再次校验事件。所有定时等待都使用
//! `Instant`（单调时钟）。

use crate::queue::{Expiration, ExpirationQueue};
use crate::store::EventStore;
use crate::task::{CallbackWrapper, TimerId};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Mutable service state, all of it behind the one mutex
///
/// 服务的可变状态，全部在这一个互斥锁之后
pub(crate) struct State {
    pub(crate) store: EventStore,
    pub(crate) queue: ExpirationQueue,
    /// 停止标志；由 shutdown 设置 (Stop flag; set by shutdown)
    pub(crate) stopped: bool,
}

/// State shared between the service front end and its worker thread
///
/// 服务前端与其工作线程之间共享的状态
pub(crate) struct Shared {
    pub(crate) state: Mutex<State>,
    /// Signaled for "new or earlier work" and for "stop requested"
    ///
    /// 在"有新的或更早的任务"和"请求停止"时被唤醒
    pub(crate) cond: Condvar,
}

impl Shared {
    pub(crate) fn new(capacity_hint: usize) -> Self {
        Self {
            state: Mutex::new(State {
                store: EventStore::with_capacity(capacity_hint),
                queue: ExpirationQueue::new(),
                stopped: false,
            }),
            cond: Condvar::new(),
        }
    }
}

/// The worker thread body. Holds the lock except while a handler runs.
///
/// 工作线程主体。除处理函数运行期间外始终持有锁。
pub(crate) fn run(shared: Arc<Shared>) {
    let mut state = shared.state.lock();

    while !state.stopped {
        let Some(head) = state.queue.peek().copied() else {
            // Idle: nothing scheduled.
            // 空闲：没有已排程的任务。
            shared.cond.wait(&mut state);
            continue;
        };

        if Instant::now() < head.deadline {
            // Waiting: soonest entry not due yet. An earlier add, a remove or
            // a stop request wakes us early; re-evaluate either way.
            // 等待：最早的条目尚未到期。更早的 add、remove 或停止请求
            // 会提前唤醒我们；无论如何都重新评估。
            shared.cond.wait_until(&mut state, head.deadline);
            continue;
        }

        // Firing: consume the entry and validate it against the store.
        // 触发：消耗该条目并根据存储进行校验。
        let Some(entry) = state.queue.pop() else {
            continue;
        };

        let callback = state
            .store
            .get(entry.id)
            .filter(|event| event.valid)
            .and_then(|event| event.callback.clone());

        let Some(callback) = callback else {
            // Stale entry: the event was invalidated while queued. Discard
            // without invoking anything; the id becomes reusable only now.
            // 陈旧条目：事件在排队期间已失效。直接丢弃，不调用任何处理
            // 函数；其 ID 此刻才变得可复用。
            state.store.release(entry.id);
            continue;
        };

        fire(&mut state, entry.id, callback);

        // Re-validate: the handler may have removed its own id.
        // 再次校验：处理函数可能已移除了自己的 ID。
        match state.store.get(entry.id) {
            Some(event) if event.valid => {
                if let Some(interval) = event.period.interval() {
                    // Re-arm drift-free: period added to the scheduled
                    // instant, not to "now".
                    // 无漂移地重新装载：周期加在排程时刻上，而不是"现在"。
                    state.queue.push(Expiration {
                        deadline: entry.deadline + interval,
                        id: entry.id,
                    });
                } else {
                    // One-shot retirement.
                    // 一次性定时器退役。
                    state.store.release(entry.id);
                }
            }
            _ => state.store.release(entry.id),
        }
    }
}

/// Invoke one handler with the lock released, capturing panics. A panicking
/// handler is reported through the `log` facade and the worker carries on
/// with invariants restored exactly as for a normal return.
///
/// 在释放锁的情况下调用一个处理函数，并捕获 panic。处理函数 panic 时
/// 通过 `log` 门面上报，工作线程继续运行，不变量的恢复与正常返回完全一致。
fn fire(state: &mut MutexGuard<'_, State>, id: TimerId, callback: CallbackWrapper) {
    MutexGuard::unlocked(state, || {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback.call(id))) {
            log::error!(
                "timer {} handler panicked: {}",
                id.as_u64(),
                panic_message(payload.as_ref())
            );
        }
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
