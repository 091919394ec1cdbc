use thiserror::Error;

/// 启动期配置错误，直接终止进程。
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("proxy pool is empty")]
    EmptyPool,
    #[error("malformed proxy entry: {0}")]
    MalformedProxy(String),
}

/// 单次 HTTP 抓取的失败分类。
///
/// 详情请求出错时只计入失败计数，不会中断整个批次；
/// 列表请求出错时整次运行降级为空报告。
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("unexpected HTTP status: {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[source] reqwest::Error),
}
