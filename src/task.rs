use std::sync::Arc;
use std::time::{Duration, Instant};

/// Unique identifier for scheduled timers
///
/// Ids are allocated per service instance and recycled after a timer retires,
/// so an id only denotes a single timer while that timer is valid.
///
/// 定时器唯一标识符
///
/// ID 由每个服务实例独立分配，并在定时器退役后回收复用，
/// 因此一个 ID 在其定时器有效期间只指代这一个定时器。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// 从存储槽索引构造 ID (Construct an ID from a store slot index)
    #[inline]
    pub(crate) fn from_index(index: u64) -> Self {
        TimerId(index)
    }

    /// Get the numeric value of the timer ID
    ///
    /// 获取定时器 ID 的数值
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// 对应的存储槽索引 (Corresponding store slot index)
    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Timer Callback Trait
///
/// Types implementing this trait can be used as timer handlers. The handler
/// receives the id of the firing timer and runs synchronously on the worker
/// thread, so it may call `add`/`remove` on the same service, including
/// removing its own id.
///
/// 定时器回调特性
///
/// 实现此特性的类型可以作为定时器处理函数。处理函数接收触发定时器的 ID，
/// 并在工作线程上同步执行，因此可以对同一服务调用 `add`/`remove`，
/// 包括移除自己的 ID。
///
/// # Examples (示例)
///
/// ```
/// use goshawk_timer::{TimerCallback, TimerId};
///
/// struct MyCallback;
///
/// impl TimerCallback for MyCallback {
///     fn call(&self, id: TimerId) {
///         println!("Timer {} fired!", id.as_u64());
///     }
/// }
/// ```
pub trait TimerCallback: Send + Sync + 'static {
    /// Execute the callback for the given firing timer
    ///
    /// 执行指定触发定时器的回调
    fn call(&self, id: TimerId);
}

/// Implement TimerCallback trait for closures
///
/// Supports Fn(TimerId) closures, can be called multiple times, suitable for
/// periodic timers
///
/// 为闭包实现 TimerCallback 特性，支持 Fn(TimerId) 闭包，
/// 可以多次调用，适合周期性定时器
impl<F> TimerCallback for F
where
    F: Fn(TimerId) + Send + Sync + 'static,
{
    #[inline]
    fn call(&self, id: TimerId) {
        self(id)
    }
}

/// Callback wrapper for standardized callback storage and invocation
///
/// The wrapper is cloned (cheap, one `Arc`) before every invocation so the
/// handler can run with the service lock released.
///
/// Callback 包装器，用于标准化回调存储和调用
///
/// 每次调用前克隆包装器（廉价，一个 `Arc`），
/// 这样处理函数可以在释放服务锁的情况下运行。
///
/// # Examples (示例)
///
/// ```
/// use goshawk_timer::CallbackWrapper;
///
/// let callback = CallbackWrapper::new(|id| {
///     println!("Timer {:?} fired!", id);
/// });
/// ```
#[derive(Clone)]
pub struct CallbackWrapper {
    callback: Arc<dyn TimerCallback>,
}

impl CallbackWrapper {
    /// Create a new callback wrapper
    ///
    /// 创建一个新的回调包装器
    #[inline]
    pub fn new(callback: impl TimerCallback) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Call the callback function
    ///
    /// 调用回调函数
    #[inline]
    pub(crate) fn call(&self, id: TimerId) {
        self.callback.call(id)
    }
}

/// Absolute firing instant of a timer
///
/// Convertible from an absolute `Instant`, a `Duration` relative to now, or a
/// `u64` microsecond count relative to now. Always backed by the monotonic
/// clock, never the wall clock.
///
/// 定时器的绝对触发时刻
///
/// 可由绝对 `Instant`、相对于当前时刻的 `Duration`、或相对于当前时刻的
/// `u64` 微秒数转换而来。始终基于单调时钟，从不使用挂钟时间。
///
/// # Examples (示例)
///
/// ```
/// use goshawk_timer::Deadline;
/// use std::time::{Duration, Instant};
///
/// let _at: Deadline = Instant::now().into();
/// let _after: Deadline = Duration::from_millis(100).into();
/// let _micros: Deadline = 100_000u64.into();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(Instant);

impl Deadline {
    /// 对应的绝对时刻 (The underlying absolute instant)
    #[inline]
    pub fn instant(&self) -> Instant {
        self.0
    }
}

impl From<Instant> for Deadline {
    #[inline]
    fn from(at: Instant) -> Self {
        Deadline(at)
    }
}

impl From<Duration> for Deadline {
    /// 相对延迟，在调用时刻加上当前时间
    /// (Relative delay, added to "now" at conversion time)
    #[inline]
    fn from(delay: Duration) -> Self {
        Deadline(Instant::now() + delay)
    }
}

impl From<u64> for Deadline {
    /// 相对延迟，单位微秒 (Relative delay in microseconds)
    #[inline]
    fn from(micros: u64) -> Self {
        Deadline(Instant::now() + Duration::from_micros(micros))
    }
}

/// Firing period of a timer; zero means one-shot
///
/// 定时器的触发周期；零表示一次性定时器
///
/// # Examples (示例)
///
/// ```
/// use goshawk_timer::Period;
/// use std::time::Duration;
///
/// let periodic: Period = Duration::from_millis(10).into();
/// assert!(periodic.interval().is_some());
///
/// let micros: Period = 10_000u64.into();
/// assert_eq!(micros, periodic);
///
/// assert!(Period::NONE.interval().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period(Duration);

impl Period {
    /// 一次性定时器的周期 (The period of a one-shot timer)
    pub const NONE: Period = Period(Duration::ZERO);

    /// Returns the re-arm interval, or `None` for one-shot timers
    ///
    /// 返回重新装载的间隔时间，一次性定时器返回 `None`
    #[inline]
    pub fn interval(&self) -> Option<Duration> {
        if self.0.is_zero() {
            None
        } else {
            Some(self.0)
        }
    }
}

impl From<Duration> for Period {
    #[inline]
    fn from(interval: Duration) -> Self {
        Period(interval)
    }
}

impl From<u64> for Period {
    /// 周期，单位微秒 (Period in microseconds)
    #[inline]
    fn from(micros: u64) -> Self {
        Period(Duration::from_micros(micros))
    }
}

/// Per-timer registration record held in the event store
///
/// `valid` flips true→false exactly once per registration: on explicit
/// removal, at one-shot retirement, or when a handler removes its own id
/// during its own invocation. The callback is dropped at invalidation so user
/// captures are released promptly.
///
/// 事件存储中保存的每个定时器的注册记录
///
/// `valid` 在每次注册中恰好翻转一次 true→false：显式移除时、一次性定时器
/// 退役时、或处理函数在自身调用期间移除自己的 ID 时。回调在失效时即被丢弃，
/// 以便及时释放用户捕获的资源。
pub(crate) struct TimerEvent {
    pub(crate) period: Period,
    pub(crate) callback: Option<CallbackWrapper>,
    pub(crate) valid: bool,
}

impl TimerEvent {
    #[inline]
    pub(crate) fn new(period: Period, callback: CallbackWrapper) -> Self {
        Self {
            period,
            callback: Some(callback),
            valid: true,
        }
    }

    /// 使事件失效并丢弃回调 (Invalidate the event and drop its callback)
    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
        self.callback = None;
    }
}
