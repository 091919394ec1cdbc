use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::event::EventResult;

/// 单次运行的最终报告，构建完成后不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// 报告生成时间。
    pub scrape_timestamp: DateTime<Utc>,

    /// 成功抓取到详情的活动数。
    pub total_events: usize,

    pub total_attempts: u64,
    pub failed_attempts: u64,

    /// 失败率（百分比），无任何尝试时为 0。
    pub failure_rate: f64,

    /// 各活动抓取耗时之和（秒）。
    /// 注意：沿用原有口径，按逐条耗时累加，worker 并发时会大于实际墙钟时间。
    pub total_execution_time: f64,

    /// 平均单场耗时（秒），无结果时为 0。
    pub average_time_per_event: f64,

    pub events: Vec<EventResult>,
}
