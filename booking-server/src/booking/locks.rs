//! 时段锁注册表
//!
//! 并发危险场景：两个请求同时抢同一 (table, date, time)，
//! 都先观察到 "无 BOOKED 记录" 再各自插入，产生重复预约。
//! 检查-再-插入必须在该 key 的互斥区内执行。
//!
//! 锁粒度正好是一个 (table, date, time) 元组，不同时段/不同桌台
//! 的请求互不阻塞，不存在跨桌台或跨餐厅的锁。
//!
//! key 空间随日期推进无限增长，条目在最后一个持有者释放时回收
//! （见 [`SlotLockGuard`]），注册表大小只和当前在途请求成正比。

use chrono::NaiveDate;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::RecordId;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::error::LedgerError;

/// per-key 互斥锁注册表
///
/// 使用 DashMap 做无锁并发的 key → Mutex 映射。锁等待有界：
/// 热点 key 上的长时间争用以 [`LedgerError::LockBusy`]（"稍后重试"）
/// 返回，而不是无限阻塞调用者。
pub struct SlotLockRegistry {
    locks: DashMap<String, Arc<Mutex<()>>>,
    wait: Duration,
}

/// 持有中的时段锁
///
/// Drop 时先释放互斥区，再在没有其他等待者（map 里那份是最后一个
/// Arc 引用）的情况下把条目从注册表移除。clone-out 和 remove_if
/// 都经过同一个 DashMap 分片锁，引用计数判断不会和新来的等待者竞争。
pub struct SlotLockGuard<'a> {
    registry: &'a SlotLockRegistry,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SlotLockGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.registry
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl SlotLockRegistry {
    pub fn new(wait: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            wait,
        }
    }

    /// 锁 key："table_key|date|time"
    pub fn key(table: &RecordId, date: NaiveDate, time: &str) -> String {
        format!("{}|{}|{}", table, date.format("%Y-%m-%d"), time)
    }

    /// 获取 key 上的排他锁，等待超出上限返回 LockBusy
    pub async fn acquire(&self, key: &str) -> Result<SlotLockGuard<'_>, LedgerError> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        match tokio::time::timeout(self.wait, Arc::clone(&lock).lock_owned()).await {
            Ok(guard) => Ok(SlotLockGuard {
                registry: self,
                key: key.to_string(),
                guard: Some(guard),
            }),
            Err(_) => {
                // 放弃自己的 Arc 份额后再尝试回收条目，
                // 避免超时的等待者把 key 永久留在表里
                drop(lock);
                self.locks
                    .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
                tracing::warn!(key = %key, "Slot lock wait timed out");
                Err(LedgerError::LockBusy(format!(
                    "Slot {} is busy, try again later",
                    key
                )))
            }
        }
    }

    /// 注册表里当前存活的 key 数
    pub fn active_keys(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn contention_on_same_key_times_out() {
        let registry = SlotLockRegistry::new(Duration::from_millis(50));
        let key = "dining_table:t1|2025-06-01|19:00";

        let _held = registry.acquire(key).await.unwrap();
        let second = registry.acquire(key).await;
        assert!(matches!(second, Err(LedgerError::LockBusy(_))));
    }

    #[tokio::test]
    async fn different_keys_do_not_block_each_other() {
        let registry = SlotLockRegistry::new(Duration::from_millis(50));

        let _a = registry
            .acquire("dining_table:t1|2025-06-01|19:00")
            .await
            .unwrap();
        let b = registry.acquire("dining_table:t1|2025-06-01|19:30").await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn lock_is_released_with_guard() {
        let registry = SlotLockRegistry::new(Duration::from_millis(50));
        let key = "dining_table:t1|2025-06-01|19:00";

        {
            let _guard = registry.acquire(key).await.unwrap();
        }
        assert!(registry.acquire(key).await.is_ok());
    }

    #[tokio::test]
    async fn entry_is_reclaimed_after_release() {
        let registry = SlotLockRegistry::new(Duration::from_millis(50));

        {
            let _a = registry
                .acquire("dining_table:t1|2025-06-01|19:00")
                .await
                .unwrap();
            let _b = registry
                .acquire("dining_table:t1|2025-06-02|19:00")
                .await
                .unwrap();
            assert_eq!(registry.active_keys(), 2);
        }

        // 全部释放后注册表缩回空，key 空间不随历史日期累积
        assert_eq!(registry.active_keys(), 0);
    }

    #[tokio::test]
    async fn held_entry_survives_other_guard_drop() {
        let registry = SlotLockRegistry::new(Duration::from_millis(50));
        let key = "dining_table:t1|2025-06-01|19:00";

        let held = registry.acquire(key).await.unwrap();
        {
            let _other = registry
                .acquire("dining_table:t2|2025-06-01|19:00")
                .await
                .unwrap();
        }
        assert_eq!(registry.active_keys(), 1);

        drop(held);
        assert_eq!(registry.active_keys(), 0);
    }

    #[tokio::test]
    async fn timed_out_waiter_does_not_leak_entry() {
        let registry = SlotLockRegistry::new(Duration::from_millis(20));
        let key = "dining_table:t1|2025-06-01|19:00";

        let held = registry.acquire(key).await.unwrap();
        assert!(registry.acquire(key).await.is_err());
        assert_eq!(registry.active_keys(), 1);

        drop(held);
        assert_eq!(registry.active_keys(), 0);
    }
}
