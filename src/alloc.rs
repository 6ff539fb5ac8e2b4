//! Timer id allocation
//!
//! Ids double as event store indices. Retired ids are preferred over fresh
//! ones (LIFO pool), so the store stays dense.
//!
//! 定时器 ID 分配
//!
//! ID 同时作为事件存储的索引。优先复用退役的 ID（LIFO 池），
//! 使存储保持紧凑。

use crate::task::TimerId;

/// Id allocator: LIFO free pool backed by a monotonically increasing counter
///
/// ID 分配器：LIFO 空闲池，由单调递增的计数器兜底
pub(crate) struct IdAllocator {
    /// 下一个全新 ID 的索引 (Index of the next fresh id)
    next_index: u64,
    /// 可复用的退役 ID (Retired ids available for reuse)
    pool: Vec<TimerId>,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self {
            next_index: 0,
            pool: Vec::new(),
        }
    }

    /// Pop a recycled id if available, otherwise hand out a fresh one
    ///
    /// 如果有可复用的 ID 则弹出，否则发放一个全新的 ID
    #[inline]
    pub(crate) fn next_id(&mut self) -> TimerId {
        if let Some(id) = self.pool.pop() {
            return id;
        }
        let id = TimerId::from_index(self.next_index);
        self.next_index += 1;
        id
    }

    /// Return an id to the pool. Only called once the corresponding event has
    /// fully retired; a merely invalidated event keeps its id until its queue
    /// entry is discarded.
    ///
    /// 将 ID 归还到池中。仅在对应事件完全退役后调用；
    /// 仅被标记失效的事件会保留其 ID，直到其队列条目被丢弃。
    #[inline]
    pub(crate) fn free(&mut self, id: TimerId) {
        self.pool.push(id);
    }

    /// Number of ids ever handed out (the ever-allocated range is
    /// `0..allocated()`)
    ///
    /// 曾经发放过的 ID 数量（已分配范围为 `0..allocated()`）
    #[inline]
    pub(crate) fn allocated(&self) -> u64 {
        self.next_index
    }

    pub(crate) fn clear(&mut self) {
        self.next_index = 0;
        self.pool.clear();
    }
}
