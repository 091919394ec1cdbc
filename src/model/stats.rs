use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// 全部 worker 共享的抓取计数器。
///
/// 约定：每次详情请求发出前先记一次 attempt，失败后才记 failure，
/// 因此任意时刻 `failed_attempts <= total_attempts` 恒成立。
#[derive(Debug, Default)]
pub struct ScrapeStats {
    total_attempts: AtomicU64,
    failed_attempts: AtomicU64,
}

impl ScrapeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self) {
        self.total_attempts.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        self.failed_attempts.fetch_add(1, Ordering::SeqCst);
    }

    /// 读取当前计数的一致快照。
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_attempts: self.total_attempts.load(Ordering::SeqCst),
            failed_attempts: self.failed_attempts.load(Ordering::SeqCst),
        }
    }
}

/// 某一时刻的计数快照，供报告生成使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_attempts: u64,
    pub failed_attempts: u64,
}

impl StatsSnapshot {
    /// 失败率（百分比），无任何尝试时为 0。
    pub fn failure_rate(&self) -> f64 {
        if self.total_attempts == 0 {
            0.0
        } else {
            self.failed_attempts as f64 / self.total_attempts as f64 * 100.0
        }
    }
}
