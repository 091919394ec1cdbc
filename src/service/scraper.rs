//! # scraper 模块
//!
//! 并发批量抓取的核心调度逻辑。
//!
//! 一次运行分为以下阶段：
//!
//! 1. 通过代理拉取场馆活动列表（失败则整次降级为空报告）；
//! 2. 将活动列表按 `ceil(总数 / worker 数)` 切成连续、不重叠的分片；
//! 3. 每个分片分配一个 worker 和一个固定代理，并发抓取票务详情；
//! 4. 等待全部 worker 结束，合并各自的本地结果；
//! 5. 交给 report 模块汇总统计、落盘并打印摘要。
//!
//! 共享可变状态只有三处：代理池游标（互斥锁）、抓取计数器（原子量）、
//! 合并后的结果集合（join 之后由协调器独占），任何锁都不会跨网络请求持有。
//!
//! 注意：每个 worker 在开始处理分片前一次性取定代理，整个分片复用同一出口，
//! 而不是逐请求轮换。这是沿用的既有行为，改动会影响出口负载分布。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{error, info, warn};

use crate::fetcher;
use crate::model::proxy::parse_proxy_list;
use crate::model::{Event, EventResult, ProxyEndpoint, ScrapeReport, ScrapeStats, APP_CONFIG};
use crate::service::report;
use crate::service::rotator::ProxyRotator;

/// 一次运行的全部参数，与全局配置解耦以便于测试构造。
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// 并发 worker 数量。
    pub threads: usize,
    pub list_timeout: Duration,
    pub detail_timeout: Duration,
    pub base_url: String,
    pub venue_page: String,
    pub venue_id: String,
    pub category_id: String,
    pub max_rows: u32,
    pub output_dir: PathBuf,
}

/// 默认值取自 `Config.toml`（见 [`APP_CONFIG`]）。
impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            threads: APP_CONFIG.scraper.threads,
            list_timeout: Duration::from_secs(APP_CONFIG.scraper.list_timeout),
            detail_timeout: Duration::from_secs(APP_CONFIG.scraper.detail_timeout),
            base_url: APP_CONFIG.api.base_url.clone(),
            venue_page: APP_CONFIG.api.venue_page.clone(),
            venue_id: APP_CONFIG.api.venue_id.clone(),
            category_id: APP_CONFIG.api.category_id.clone(),
            max_rows: APP_CONFIG.api.max_rows,
            output_dir: PathBuf::from(&APP_CONFIG.report.output_dir),
        }
    }
}

/// 抓取协调器：持有代理池、共享计数器与运行参数。
pub struct Scraper {
    config: ScrapeConfig,
    rotator: Arc<ProxyRotator>,
    stats: Arc<ScrapeStats>,
}

impl Scraper {
    /// # 错误
    /// 代理凭证非法或代理池为空时返回配置错误。
    pub fn new(proxy_entries: &[String], config: ScrapeConfig) -> Result<Self> {
        let endpoints = parse_proxy_list(proxy_entries)?;
        let rotator = Arc::new(ProxyRotator::new(endpoints)?);
        Ok(Self {
            config,
            rotator,
            stats: Arc::new(ScrapeStats::new()),
        })
    }

    /// 执行完整的一次抓取，返回最终报告。
    ///
    /// 报告总是会生成：列表拉取失败或无活动时为空报告。
    /// 单场详情的失败只计数不中断，落盘失败只记日志。
    pub async fn run(&self) -> Result<ScrapeReport> {
        info!("========== [活动列表抓取阶段] ==========");
        let events = match fetcher::fetch_events(&self.rotator.next(), &self.config).await {
            Ok(xs) => xs,
            Err(e) => {
                error!("❌ 活动列表拉取失败：{}", e);
                Vec::new()
            }
        };

        if events.is_empty() {
            warn!("未获取到任何活动，本次运行生成空报告");
            let report = report::build(Vec::new(), &self.stats.snapshot());
            self.export(&report);
            return Ok(report);
        }

        info!("🚀 共 {} 场活动待抓取，worker 数 {}", events.len(), self.config.threads);

        info!("========== [并发抓取阶段] ==========");
        let batches = partition(events, self.config.threads);
        let mut tasks = Vec::with_capacity(batches.len());
        for (i, batch) in batches.into_iter().enumerate() {
            // 每个分片在分发时取定一个代理，整段复用
            let proxy = self.rotator.next();
            let stats = Arc::clone(&self.stats);
            let config = self.config.clone();
            tasks.push(tokio::spawn(async move {
                process_batch(i + 1, batch, proxy, stats, config).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            results.extend(task.await?);
        }

        info!("========== [结果统计阶段] ==========");
        let report = report::build(results, &self.stats.snapshot());
        self.export(&report);
        Ok(report)
    }

    fn export(&self, report: &ScrapeReport) {
        report::print_summary(report);
        match report::save(report, &self.config.output_dir) {
            Ok(path) => info!("✅ 报告已写入 {}", path.display()),
            Err(e) => error!("❌ 报告写入失败（内存中的结果仍然有效）：{}", e),
        }
    }
}

/// 将活动列表切成连续、不重叠、保持原序的分片。
///
/// 分片大小为 `ceil(总数 / worker 数)`，最后一片可能偏短；
/// 总数不足时实际分片数会少于 worker 数。
fn partition<T: Clone>(items: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let chunk_size = items.len().div_ceil(workers.max(1)).max(1);
    items.chunks(chunk_size).map(<[T]>::to_vec).collect()
}

/// 单个 worker 的主循环：顺序处理自己的分片，返回本地结果列表。
///
/// 每场活动先记一次 attempt 再发请求；成功则记录耗时与负载，
/// 失败只累加失败计数并丢弃该活动。worker 之间互不等待。
async fn process_batch(
    worker_id: usize,
    batch: Vec<Event>,
    proxy: ProxyEndpoint,
    stats: Arc<ScrapeStats>,
    config: ScrapeConfig,
) -> Vec<EventResult> {
    info!(
        "🧵 Worker #{} 开始处理 {} 场活动，出口代理 {}",
        worker_id,
        batch.len(),
        proxy.label()
    );

    let mut results = Vec::new();
    for event in batch {
        stats.record_attempt();
        let start = Instant::now();

        match fetcher::fetch_tickets(&event, &proxy, &config).await {
            Ok(tickets) => {
                let duration = start.elapsed().as_secs_f64();
                let result = EventResult::new(event, tickets, duration);
                info!(
                    "🟢 {} (ID: {}) 抓取成功，{} 个票区，耗时 {:.2}s",
                    result.event_name,
                    result.event_id,
                    result.zone_count(),
                    duration
                );
                results.push(result);
            }
            Err(e) => {
                stats.record_failure();
                warn!(
                    "🔴 {} (ID: {}) 抓取失败：{}",
                    event.event_name, event.event_id, e
                );
            }
        }
    }

    info!(
        "🧵 Worker #{} 处理完成，成功 {} 条",
        worker_id,
        results.len()
    );
    results
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::path::Path;
    use wiremock::MockServer;

    /// 指向 wiremock 实例的运行参数。
    pub(crate) fn test_config(server_uri: &str, output_dir: &Path, threads: usize) -> ScrapeConfig {
        ScrapeConfig {
            threads,
            list_timeout: Duration::from_secs(5),
            detail_timeout: Duration::from_secs(5),
            base_url: server_uri.to_string(),
            venue_page: "test-venue/venue/1".to_string(),
            venue_id: "3708".to_string(),
            category_id: "0".to_string(),
            max_rows: 100,
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// 把 wiremock 实例本身当作代理出口使用。
    ///
    /// 明文 HTTP 走代理时 reqwest 会把完整 URL 发给代理，
    /// wiremock 按路径匹配仍然生效。
    pub(crate) fn local_proxy(server: &MockServer) -> ProxyEndpoint {
        let addr = server.address();
        ProxyEndpoint {
            host: addr.ip().to_string(),
            port: addr.port().to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
        }
    }

    pub(crate) fn proxy_entry(server: &MockServer) -> String {
        let p = local_proxy(server);
        format!("{}:{}:{}:{}", p.host, p.port, p.username, p.password)
    }
}
