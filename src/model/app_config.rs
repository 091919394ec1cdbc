use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub static APP_CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().expect("Failed to load configuration"));

#[derive(Debug, Deserialize, Serialize)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub api: ApiConfig,
    pub proxy: ProxyConfig,
    pub report: ReportConfig,
    pub log: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// 并发 worker 数量，每个 worker 绑定一个代理处理一段活动列表。
    pub threads: usize,
    /// 列表接口超时（秒）。
    pub list_timeout: u64,
    /// 详情接口超时（秒）。
    pub detail_timeout: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// 场馆列表页路径（不含前后斜杠）。
    pub venue_page: String,
    pub venue_id: String,
    pub category_id: String,
    pub max_rows: u32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// 代理凭证列表，格式 `host:port:username:password`。
    pub entries: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportConfig {
    pub output_dir: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub console_levels: Vec<String>,
}

impl AppConfig {
    fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("Config"))
            .build()?;
        let config = config.try_deserialize()?;
        Ok(config)
    }
}
