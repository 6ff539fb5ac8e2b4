//! Expiration priority queue
//!
//! Min-heap of `(deadline, id)` entries, soonest deadline on top. Entries with
//! equal deadlines are independent and both eventually fire; the (deadline,
//! id) total order makes the tie-break consistent without coalescing anything.
//! The queue may hold stale entries for invalidated events; the worker
//! discards those on pop.
//!
//! 到期优先队列
//!
//! 以 `(到期时刻, ID)` 为条目的最小堆，最早到期的在堆顶。到期时刻相同的
//! 条目相互独立，最终都会触发；(到期时刻, ID) 的全序使相等键的顺序保持
//! 一致，不会合并任何条目。队列中可能存在已失效事件的陈旧条目，
//! 由工作线程在弹出时丢弃。

use crate::task::TimerId;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

/// A scheduled firing: the next deadline and the id it refers to
///
/// 一次已排程的触发：下次到期时刻及其指向的 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Expiration {
    pub(crate) deadline: Instant,
    pub(crate) id: TimerId,
}

impl Ord for Expiration {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Expiration {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 到期队列 (Expiration queue)
pub(crate) struct ExpirationQueue {
    heap: BinaryHeap<Reverse<Expiration>>,
}

impl ExpirationQueue {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// 插入条目，O(log n) (Insert an entry, O(log n))
    #[inline]
    pub(crate) fn push(&mut self, entry: Expiration) {
        self.heap.push(Reverse(entry));
    }

    /// 弹出最早到期的条目 (Pop the soonest entry)
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Expiration> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    /// 查看最早到期的条目 (Peek at the soonest entry)
    #[inline]
    pub(crate) fn peek(&self) -> Option<&Expiration> {
        self.heap.peek().map(|Reverse(entry)| entry)
    }

    #[allow(dead_code)]
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[allow(dead_code)]
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }
}
