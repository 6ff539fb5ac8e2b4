use crate::config::TimerConfig;
use crate::error::TimerError;
use crate::queue::Expiration;
use crate::task::{CallbackWrapper, Deadline, Period, TimerCallback, TimerId};
use crate::worker::{self, Shared};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// TimerService - 基于专用工作线程的定时器服务
/// (TimerService - timer service based on a dedicated worker thread)
///
/// 管理一组一次性或周期性的定时回调，由单个后台线程在到期时刻或其后触发。
/// (Manages a set of one-shot or periodic scheduled callbacks, fired by a
/// single background thread at or after their target instant.)
///
/// # 特性 (Features)
/// - 每个实例独享一个工作线程、一个互斥锁和一个条件变量；任意多个实例
///   可以互不干扰地并存
///      (Each instance owns one worker thread, one mutex and one condition
///      variable; arbitrarily many instances coexist without interference)
/// - 处理函数在释放锁的情况下顺序执行，可以对同一实例调用
///   `add`/`remove`，包括在自身调用期间移除自己的 ID
///      (Handlers run sequentially with the lock released and may call
///      `add`/`remove` on the same instance, including removing their own id
///      from within their own invocation)
/// - 取消是惰性的：`remove` 只翻转一个标志，陈旧的队列条目在下次弹出时
///   被丢弃，取消操作为 O(1)
///      (Cancellation is lazy: `remove` flips a flag and the stale queue
///      entry is discarded on its next pop, making cancellation O(1))
/// - 定时器 ID 在退役后回收复用
///      (Timer ids are recycled after retirement)
///
/// # 注意 (Notes)
/// 处理函数之间没有抢占：同一实例上先触发的慢处理函数会推迟后续所有到期。
/// 不要在本实例工作线程上执行的处理函数中丢弃或关闭该实例（自我 join 死锁），
/// 这是调用方的责任。
///      (There is no preemption between handlers: a slow handler delays every
///      later expiration of the same instance. Do not drop or shut down an
///      instance from a handler executing on that instance's own worker
///      thread (self-join deadlock); this is the caller's responsibility.)
///
/// # 示例 (Examples)
/// ```no_run
/// use goshawk_timer::{TimerId, TimerService};
/// use std::time::Duration;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let timer = TimerService::with_defaults()?;
///
///     // 一次性定时器 (One-shot timer)
///     timer.add(Duration::from_millis(100), |id: TimerId| {
///         println!("Timer {} fired!", id.as_u64());
///     });
///
///     // 周期性定时器 (Periodic timer)
///     let id = timer.add_periodic(
///         Duration::from_millis(100),
///         Duration::from_millis(10),
///         |_| println!("tick"),
///     );
///
///     std::thread::sleep(Duration::from_millis(200));
///     timer.remove(id);
///     timer.shutdown();
///     Ok(())
/// }
/// ```
pub struct TimerService {
    /// 与工作线程共享的状态 (State shared with the worker thread)
    shared: Arc<Shared>,
    /// 工作线程句柄 (Worker thread handle)
    worker: Option<JoinHandle<()>>,
}

impl TimerService {
    /// 使用给定配置创建定时器服务并启动其工作线程
    /// (Create a timer service with the given configuration and start its
    /// worker thread)
    ///
    /// # 参数 (Parameters)
    /// - `config`: 服务配置（容量提示、线程名称）
    ///      (Service configuration: capacity hint, thread name)
    ///
    /// # 返回 (Returns)
    /// - `Ok(TimerService)`: 服务已启动 (Service started)
    /// - `Err(TimerError::SpawnFailed)`: 工作线程创建失败（资源耗尽），
    ///   同步返回给调用方
    ///      (Worker thread creation failed (resource exhaustion), surfaced
    ///      synchronously to the caller)
    ///
    /// # 注意 (Notes)
    /// `config` 应通过 `TimerConfig::builder().build()` 构建，线程名称在
    /// 那里得到验证。
    ///      (`config` should come from `TimerConfig::builder().build()`,
    ///      which validates the thread name.)
    pub fn new(config: TimerConfig) -> Result<Self, TimerError> {
        let shared = Arc::new(Shared::new(config.capacity_hint));

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(config.thread_name)
            .spawn(move || worker::run(worker_shared))
            .map_err(|e| TimerError::SpawnFailed {
                reason: e.to_string(),
            })?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// 使用默认配置创建定时器服务
    /// (Create a timer service with the default configuration)
    ///
    /// # 示例 (Examples)
    /// ```
    /// use goshawk_timer::TimerService;
    ///
    /// let timer = TimerService::with_defaults().unwrap();
    /// timer.shutdown();
    /// ```
    pub fn with_defaults() -> Result<Self, TimerError> {
        Self::new(TimerConfig::default())
    }

    /// 使用容量提示创建定时器服务（为事件存储预分配空间）
    /// (Create a timer service with a capacity hint, pre-sizing the event
    /// store)
    ///
    /// 提示仅影响性能，不影响语义。
    /// (The hint is performance-only, no semantic effect.)
    pub fn with_capacity(capacity_hint: usize) -> Result<Self, TimerError> {
        Self::new(TimerConfig {
            capacity_hint,
            ..TimerConfig::default()
        })
    }

    /// 添加一次性定时器 (Add a one-shot timer)
    ///
    /// # 参数 (Parameters)
    /// - `when`: 触发时刻；绝对 `Instant`、相对 `Duration` 或相对微秒数
    ///   `u64` 均可
    ///      (Firing time; an absolute `Instant`, a relative `Duration`, or a
    ///      relative microsecond count `u64`)
    /// - `callback`: 处理函数，在工作线程上以触发定时器的 ID 同步调用
    ///      (Handler, invoked synchronously on the worker thread with the
    ///      firing timer's id)
    ///
    /// # 返回 (Returns)
    /// 新定时器的 ID。本方法立即返回，不等待回调执行。
    ///      (The new timer's id. Returns immediately without waiting for the
    ///      callback.)
    ///
    /// # 示例 (Examples)
    /// ```no_run
    /// # use goshawk_timer::TimerService;
    /// # use std::time::{Duration, Instant};
    /// let timer = TimerService::with_defaults().unwrap();
    ///
    /// // 三种等价的时间表达 (Three equivalent time forms)
    /// timer.add(Duration::from_millis(100), |_| {});
    /// timer.add(Instant::now() + Duration::from_millis(100), |_| {});
    /// timer.add(100_000u64, |_| {});
    /// ```
    #[inline]
    pub fn add<W, C>(&self, when: W, callback: C) -> TimerId
    where
        W: Into<Deadline>,
        C: TimerCallback,
    {
        self.schedule(when.into(), Period::NONE, CallbackWrapper::new(callback))
    }

    /// 添加周期性定时器 (Add a periodic timer)
    ///
    /// 首次在 `when` 触发，此后每次在上一次排程时刻加上 `period` 时触发
    /// （周期加在排程时刻上而非"现在"，避免漂移），直到被移除。
    ///      (Fires first at `when`, then at the previous scheduled instant
    ///      plus `period` each time (added to the scheduled instant rather
    ///      than "now", avoiding drift), until removed.)
    ///
    /// # 参数 (Parameters)
    /// - `when`: 首次触发时刻 (First firing time)
    /// - `period`: 周期；`Duration` 或微秒数 `u64`。零周期等价于一次性
    ///   定时器。
    ///      (Period; a `Duration` or a microsecond count `u64`. A zero
    ///      period is equivalent to a one-shot timer.)
    /// - `callback`: 处理函数 (Handler)
    ///
    /// # 示例 (Examples)
    /// ```no_run
    /// # use goshawk_timer::TimerService;
    /// # use std::time::Duration;
    /// let timer = TimerService::with_defaults().unwrap();
    ///
    /// let id = timer.add_periodic(
    ///     Duration::from_millis(100),
    ///     Duration::from_millis(10),
    ///     |_| println!("tick"),
    /// );
    ///
    /// std::thread::sleep(Duration::from_millis(150));
    /// timer.remove(id);
    /// ```
    #[inline]
    pub fn add_periodic<W, P, C>(&self, when: W, period: P, callback: C) -> TimerId
    where
        W: Into<Deadline>,
        P: Into<Period>,
        C: TimerCallback,
    {
        self.schedule(when.into(), period.into(), CallbackWrapper::new(callback))
    }

    /// 分配 ID、存储事件、压入首个到期条目并唤醒工作线程
    /// (Allocate an id, store the event, push its first expiration entry and
    /// wake the worker)
    fn schedule(&self, deadline: Deadline, period: Period, callback: CallbackWrapper) -> TimerId {
        let id = {
            let mut state = self.shared.state.lock();
            let id = state.store.insert(period, callback);
            state.queue.push(Expiration {
                deadline: deadline.instant(),
                id,
            });
            id
        };
        // The new entry may be earlier than whatever the worker is waiting on.
        // 新条目可能比工作线程正在等待的条目更早。
        self.shared.cond.notify_all();
        log::trace!("scheduled timer {}", id.as_u64());
        id
    }

    /// 移除定时器 (Remove a timer)
    ///
    /// # 返回 (Returns)
    /// - `false`: `id` 超出本实例曾经分配过的范围
    ///      (`id` is outside the range this instance has ever allocated)
    /// - `true`: 事件已被标记失效（对已失效的 ID 重复调用也返回 `true`，
    ///   是安全的空操作）
    ///      (The event was marked invalid; calling again on an
    ///      already-invalid id also returns `true` as a safe no-op)
    ///
    /// # 保证 (Guarantees)
    /// 返回 `true` 后该处理函数不会再运行——即使其条目已经排队即将触发，
    /// 甚至在该 ID 自己的处理函数内部调用也同样有效。陈旧的队列条目会在
    /// 其排程时刻被弹出并丢弃，ID 在那之后才可复用。
    ///      (After `true` is returned the handler never runs again — even if
    ///      an entry for it is already queued for imminent firing, and even
    ///      when called from within that id's own executing handler. The
    ///      stale queue entry is popped and discarded at its scheduled
    ///      instant; only then does the id become reusable.)
    ///
    /// # 示例 (Examples)
    /// ```no_run
    /// # use goshawk_timer::TimerService;
    /// # use std::time::Duration;
    /// let timer = TimerService::with_defaults().unwrap();
    ///
    /// let id = timer.add(Duration::from_secs(10), |_| {});
    /// assert!(timer.remove(id));
    /// assert!(timer.remove(id)); // 幂等 (idempotent)
    /// ```
    pub fn remove(&self, id: TimerId) -> bool {
        let removed = {
            let mut state = self.shared.state.lock();
            state.store.mark_invalid(id)
        };
        if removed {
            self.shared.cond.notify_all();
            log::trace!("removed timer {}", id.as_u64());
        }
        removed
    }

    /// 关闭定时器服务 (Shut down the timer service)
    ///
    /// 设置停止标志，唤醒所有等待者，阻塞直到工作线程完全终止，然后清空
    /// 存储、队列和空闲池。尚未触发的回调会被丢弃，永远不会被调用。
    ///      (Sets the stop flag, wakes all waiters, blocks until the worker
    ///      thread has fully terminated, then clears the store, queue and
    ///      free pool. Pending callbacks are dropped, never invoked.)
    ///
    /// 直接丢弃 `TimerService` 会执行同样的关闭流程。
    ///      (Dropping the `TimerService` performs the same shutdown.)
    ///
    /// # 注意 (Notes)
    /// 不得在本实例自己的工作线程上执行的处理函数中调用（自我 join 死锁）。
    ///      (Must not be called from a handler executing on this instance's
    ///      own worker thread (self-join deadlock).)
    ///
    /// # 示例 (Examples)
    /// ```
    /// use goshawk_timer::TimerService;
    /// use std::time::Duration;
    ///
    /// let timer = TimerService::with_defaults().unwrap();
    /// timer.add(Duration::from_secs(10), |_| unreachable!());
    /// timer.shutdown(); // 回调被丢弃 (the callback is dropped)
    /// ```
    pub fn shutdown(mut self) {
        self.stop_worker();
    }

    fn stop_worker(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        {
            let mut state = self.shared.state.lock();
            state.stopped = true;
        }
        self.shared.cond.notify_all();

        // The worker catches handler panics, so it only exits via the stop
        // flag; a join error would mean the thread was killed externally.
        // 工作线程会捕获处理函数的 panic，因此只会通过停止标志退出；
        // join 出错意味着线程被外部杀死。
        let _ = worker.join();

        let mut state = self.shared.state.lock();
        state.store.clear();
        state.queue.clear();
        log::trace!("timer service stopped");
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.stop_worker();
    }
}
