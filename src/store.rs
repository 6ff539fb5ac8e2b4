//! Event store
//!
//! Growable slot vector indexed directly by timer id, plus the id allocator
//! that keeps the two in sync. A recycled id's slot is overwritten in place;
//! a fresh id grows the vector by one.
//!
//! 事件存储
//!
//! 直接以定时器 ID 为索引的可增长槽向量，外加保持两者同步的 ID 分配器。
//! 被回收的 ID 的槽会被原地覆盖；全新的 ID 使向量增长一格。

use crate::alloc::IdAllocator;
use crate::task::{CallbackWrapper, Period, TimerEvent, TimerId};

/// 事件存储 (Event store)
pub(crate) struct EventStore {
    slots: Vec<TimerEvent>,
    ids: IdAllocator,
}

impl EventStore {
    pub(crate) fn with_capacity(capacity_hint: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity_hint),
            ids: IdAllocator::new(),
        }
    }

    /// Store a new valid event and return its id
    ///
    /// 存储一个新的有效事件并返回其 ID
    pub(crate) fn insert(&mut self, period: Period, callback: CallbackWrapper) -> TimerId {
        let id = self.ids.next_id();
        let event = TimerEvent::new(period, callback);
        if id.index() == self.slots.len() {
            self.slots.push(event);
        } else {
            // 回收的 ID：原地覆盖旧槽 (Recycled id: overwrite the old slot)
            self.slots[id.index()] = event;
        }
        id
    }

    /// Look up an event. `None` for ids outside the ever-allocated range.
    ///
    /// 查找事件。超出已分配范围的 ID 返回 `None`。
    #[inline]
    pub(crate) fn get(&self, id: TimerId) -> Option<&TimerEvent> {
        self.slots.get(id.index())
    }

    /// Invalidate an event and drop its callback. Returns false iff the id
    /// was never allocated; invalidating an already-invalid slot is a no-op
    /// that still returns true. The id is NOT returned to the allocator here:
    /// its queue entry may still be pending, and the id stays quarantined
    /// until that entry is discarded.
    ///
    /// 使事件失效并丢弃其回调。仅当 ID 从未被分配过时返回 false；
    /// 对已失效槽的再次失效是空操作，但仍返回 true。此处不会将 ID 归还给
    /// 分配器：其队列条目可能仍在等待，ID 将被隔离直到该条目被丢弃。
    pub(crate) fn mark_invalid(&mut self, id: TimerId) -> bool {
        match self.slots.get_mut(id.index()) {
            Some(event) => {
                event.invalidate();
                true
            }
            None => false,
        }
    }

    /// Retire an event: invalidate it and return its id to the free pool.
    /// Only the worker loop calls this, once the event's sole queue entry has
    /// been consumed.
    ///
    /// 使事件退役：将其失效并把 ID 归还到空闲池。只有工作线程在该事件
    /// 唯一的队列条目被消耗后才会调用此方法。
    pub(crate) fn release(&mut self, id: TimerId) {
        if let Some(event) = self.slots.get_mut(id.index()) {
            event.invalidate();
            self.ids.free(id);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.ids.clear();
    }

    /// 曾经分配过的 ID 数量 (Number of ids ever allocated)
    #[cfg(test)]
    pub(crate) fn allocated(&self) -> u64 {
        self.ids.allocated()
    }
}
