pub mod app_config;
pub mod event;
pub mod proxy;
pub mod report;
pub mod stats;

pub use app_config::{AppConfig, APP_CONFIG};
pub use event::{Event, EventResult};
pub use proxy::ProxyEndpoint;
pub use report::ScrapeReport;
pub use stats::{ScrapeStats, StatsSnapshot};
