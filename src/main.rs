mod common;
mod fetcher;
mod model;
mod service;

use tracing::{error, info};

use crate::common::log::init_logging;
use crate::model::APP_CONFIG;
use crate::service::scraper::{ScrapeConfig, Scraper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 必须是程序第一个调用！
    init_logging().expect("Failed to initialize logging");

    info!("========== [初始化阶段] ==========");
    let scraper = match Scraper::new(&APP_CONFIG.proxy.entries, ScrapeConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            error!("❌ 代理配置无效：{}", e);
            return Err(e);
        }
    };

    let report = scraper.run().await?;
    info!(
        "本次运行结束：成功 {} 场，尝试 {} 次，失败 {} 次",
        report.total_events, report.total_attempts, report.failed_attempts
    );
    Ok(())
}
