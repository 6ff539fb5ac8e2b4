//! # 线程定时器服务 (Thread-Based Timer Service)
//!
//! 由专用工作线程驱动的用户态定时器服务：管理一组一次性或周期性的定时
//! 回调，在到期时刻或其后触发。
//! (User-space timer service driven by a dedicated worker thread: manages a
//! set of one-shot or periodic scheduled callbacks, fired at or after their
//! target instant)
//!
//! ## 特性 (Features)
//!
//! - **独立实例 (Independent Instances)**: 每个服务实例独享一个后台线程、
//!   一个互斥锁、一个条件变量和自己的存储/队列/空闲池；任意多个实例并存
//!   (Each service instance owns one background thread, one mutex, one
//!   condition variable and its own store/queue/free pool; arbitrarily many
//!   instances coexist)
//! - **O(1) 取消 (O(1) Cancellation)**: `remove` 只翻转有效标志；陈旧的
//!   队列条目在下次弹出时被惰性丢弃
//!   (`remove` flips a validity flag; the stale queue entry is lazily
//!   discarded on its next pop)
//! - **回调内取消 (Cancellation From Inside Callbacks)**: 处理函数在释放
//!   锁的情况下执行，可以安全地移除自己的 ID
//!   (Handlers run with the lock released and may safely remove their own
//!   id)
//! - **单调时钟 (Monotonic Clock)**: 所有等待基于 `Instant`，系统时钟
//!   调整不会造成停滞或提前触发
//!   (All waits are `Instant`-based; wall-clock adjustments cannot stall or
//!   prematurely fire timers)
//! - **线程安全 (Thread-Safe)**: 使用 parking_lot 提供高性能的锁机制
//!   (Uses parking_lot for high-performance locking mechanism)
//!
//! ## 快速开始 (Quick Start)
//!
//! ```
//! use goshawk_timer::{TimerId, TimerService};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let timer = TimerService::with_defaults()?;
//!
//!     // 一次性定时器，100ms 后触发
//!     // (One-shot timer firing after 100ms)
//!     timer.add(Duration::from_millis(100), |id: TimerId| {
//!         println!("Timer {} fired!", id.as_u64());
//!     });
//!
//!     std::thread::sleep(Duration::from_millis(200));
//!
//!     // 关闭：等待工作线程终止，丢弃未触发的回调
//!     // (Shutdown: joins the worker thread, drops pending callbacks)
//!     timer.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! ## 架构说明 (Architecture)
//!
//! - **事件存储 (Event Store)**: 以定时器 ID 为索引的可增长槽向量；回收的
//!   ID 的槽被原地覆盖
//!   (Growable slot vector indexed by timer id; a recycled id's slot is
//!   overwritten in place)
//! - **到期队列 (Expiration Queue)**: `(到期时刻, ID)` 最小堆，插入和弹出
//!   为 O(log n)，相同到期时刻的条目相互独立
//!   (Min-heap of (deadline, id), O(log n) insert/pop, entries with equal
//!   deadlines are independent)
//! - **ID 分配器 (Id Allocator)**: LIFO 空闲池 + 单调计数器；ID 仅在其
//!   队列条目被消耗后回收，复用的 ID 不可能被旧事件的残留条目触发
//!   (LIFO free pool + monotonic counter; an id is recycled only after its
//!   queue entry has been consumed, so a reused id can never be fired by a
//!   leftover entry of the old event)
//! - **工作循环 (Worker Loop)**: 空闲时无限期等待，有任务时定时等待至最早
//!   到期时刻，到期后在锁外调用处理函数并在重新加锁后再次校验
//!   (Waits indefinitely when idle, timed-waits until the soonest deadline
//!   otherwise, invokes the handler outside the lock and re-validates after
//!   relocking)
//!
//! ## 处理函数 panic (Handler Panics)
//!
//! 处理函数中的 panic 会被捕获并通过 `log::error!` 上报；工作线程继续
//! 运行，后续定时器照常触发。
//! (A panic inside a handler is caught and reported via `log::error!`; the
//! worker thread keeps running and later timers fire normally.)

mod alloc;
mod config;
mod error;
mod queue;
mod service;
mod store;
mod task;
mod worker;

#[cfg(test)]
mod tests;

// 重新导出公共 API (Re-export public API)
pub use config::{TimerConfig, TimerConfigBuilder};
pub use error::TimerError;
pub use service::TimerService;
pub use task::{CallbackWrapper, Deadline, Period, TimerCallback, TimerId};
