use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::merge::reducer::{ReduceFn, Reducer};

/// 合并链中的一项
#[derive(Debug, Clone)]
pub struct MergeEntry {
    /// 稳定标识，用于和注册时的快照比对
    pub id: Uuid,
    pub reducer: Reducer,
    /// 需要等待的堆叠请求数
    pub request_count: usize,
}

/// 一个成员上按注册顺序排列的合并函数
///
/// 条目以 `Arc` 保存，更新某一项时其余条目在新旧快照间共享。
#[derive(Debug, Clone, Default)]
pub struct MergeChain {
    entries: Vec<Arc<MergeEntry>>,
}

impl MergeChain {
    /// 追加合并函数
    ///
    /// 链为空时新条目覆盖最内层请求，需要吸收原始成员的返回值。
    pub fn register(&mut self, func: ReduceFn, request_count: usize) -> Uuid {
        let priming = self.entries.is_empty();
        let entry = MergeEntry {
            id: Uuid::new_v4(),
            reducer: Reducer::new(func, priming),
            request_count,
        };
        let id = entry.id;
        self.entries.push(Arc::new(entry));
        id
    }

    /// 当前可见条目的标识集合
    pub fn ids(&self) -> HashSet<Uuid> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// 第一个不在 `invisible` 中的条目，即紧贴在该层请求之上声明的合并函数
    pub fn active_for(&self, invisible: &HashSet<Uuid>) -> Option<Arc<MergeEntry>> {
        self.entries
            .iter()
            .find(|e| !invisible.contains(&e.id))
            .cloned()
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<MergeEntry>> {
        self.entries.iter().find(|e| e.id == id).cloned()
    }

    /// 给指定条目提供下一个参数
    pub fn feed(&mut self, id: Uuid, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|e| e.id == id) {
            let mut next = MergeEntry::clone(slot);
            next.reducer = slot.reducer.feed(value);
            *slot = Arc::new(next);
        }
    }

    /// 所有条目回到初始状态
    pub fn reset(&mut self) {
        for slot in self.entries.iter_mut() {
            let mut next = MergeEntry::clone(slot);
            next.reducer = slot.reducer.reset();
            *slot = Arc::new(next);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add() -> ReduceFn {
        Arc::new(|a, b| json!(a.as_i64().unwrap_or(0) + b.as_i64().unwrap_or(0)))
    }

    #[test]
    fn test_first_entry_primes() {
        let mut chain = MergeChain::default();
        let first = chain.register(add(), 2);
        let second = chain.register(add(), 3);

        assert!(chain.get(first).unwrap().reducer.is_priming());
        assert!(!chain.get(second).unwrap().reducer.is_priming());
        assert_eq!(chain.get(second).unwrap().request_count, 3);
    }

    #[test]
    fn test_active_for_skips_invisible_entries() {
        let mut chain = MergeChain::default();
        let empty_snapshot = chain.ids();
        let first = chain.register(add(), 2);
        let after_first = chain.ids();
        let second = chain.register(add(), 3);
        let after_second = chain.ids();

        assert_eq!(chain.active_for(&empty_snapshot).unwrap().id, first);
        assert_eq!(chain.active_for(&after_first).unwrap().id, second);
        assert!(chain.active_for(&after_second).is_none());
    }

    #[test]
    fn test_feed_shares_untouched_entries() {
        let mut chain = MergeChain::default();
        let first = chain.register(add(), 2);
        let second = chain.register(add(), 3);

        let before = chain.clone();
        chain.feed(second, json!(4));

        assert!(Arc::ptr_eq(
            &before.get(first).unwrap(),
            &chain.get(first).unwrap()
        ));
        assert_eq!(before.get(second).unwrap().reducer.accumulator(), None);
        assert_eq!(
            chain.get(second).unwrap().reducer.accumulator(),
            Some(&json!(4))
        );
    }

    #[test]
    fn test_reset() {
        let mut chain = MergeChain::default();
        let id = chain.register(add(), 2);
        chain.feed(id, json!(null));
        chain.feed(id, json!(1));
        chain.reset();
        assert_eq!(chain.get(id).unwrap().reducer.accumulator(), None);
        assert_eq!(chain.len(), 1);
    }
}
