//! # fetcher 模块
//!
//! 负责对目标站点的两类 HTTP 请求，均通过指定代理出口发出：
//!
//! - [`fetch_events`]：拉取场馆活动列表（一次性调用）；
//! - [`fetch_tickets`]：拉取单场活动的票务详情（worker 循环调用）。
//!
//! 两个函数都不触碰共享状态，失败分类统一用 [`FetchError`] 表达，
//! 计数与降级由调用方（scraper 模块）决定。不做任何重试。

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::common::error::FetchError;
use crate::model::{Event, ProxyEndpoint};
use crate::service::scraper::ScrapeConfig;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// 列表接口的日期过滤参数，固定取全量区间
const FROM_DATE: &str = "1970-01-01T00:00:00.000Z";
const TO_DATE: &str = "9999-12-31T23:59:59.999Z";

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<Event>,
}

/// 拉取场馆的全部活动列表。
///
/// 通过 `proxy` 向 `{base_url}/{venue_page}/` 发一次 POST，
/// 解析响应体中的 `items` 数组。
///
/// # 错误
/// - 非 2xx 状态码返回 [`FetchError::HttpStatus`]；
/// - 连接失败或超时返回 [`FetchError::Network`]；
/// - 响应体不是合法 JSON 返回 [`FetchError::Decode`]。
pub async fn fetch_events(
    proxy: &ProxyEndpoint,
    config: &ScrapeConfig,
) -> Result<Vec<Event>, FetchError> {
    let base = config.base_url.trim_end_matches('/');
    let url = format!("{}/{}/", base, config.venue_page);
    let max_rows = config.max_rows.to_string();

    let client = build_client(proxy, config.list_timeout)?;
    let response = client
        .post(&url)
        .query(&[
            ("method", "TrendingEventsLocale"),
            ("categoryId", config.category_id.as_str()),
            ("maxRows", max_rows.as_str()),
            ("fromDate", FROM_DATE),
            ("toDate", TO_DATE),
            ("venueId", config.venue_id.as_str()),
        ])
        .header("accept", "*/*")
        .header("content-type", "application/json")
        .header("origin", base)
        .header("referer", &url)
        .header("user-agent", USER_AGENT)
        .send()
        .await
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status()));
    }

    let list: EventList = response.json().await.map_err(FetchError::Decode)?;
    info!("列表接口返回 {} 场活动", list.items.len());
    Ok(list.items)
}

/// 拉取单场活动的票务详情。
///
/// 通过 `proxy` 向座位图接口发一次 POST，返回不透明的 JSON 负载
/// （其中 `zones` 数组由报告层统计）。错误分类与 [`fetch_events`] 相同。
pub async fn fetch_tickets(
    event: &Event,
    proxy: &ProxyEndpoint,
    config: &ScrapeConfig,
) -> Result<Value, FetchError> {
    let base = config.base_url.trim_end_matches('/');
    let url = format!(
        "{}/Browse/VenueMap/GetVenueMapSeatingConfig/{}",
        base, event.event_id
    );
    let category_id = event.category_param();

    let client = build_client(proxy, config.detail_timeout)?;
    let response = client
        .post(&url)
        .query(&[
            ("categoryId", category_id.as_str()),
            ("withFees", "false"),
            ("withSeats", "false"),
        ])
        .header("accept", "*/*")
        .header("cache-control", "no-cache")
        .header("origin", base)
        .header("user-agent", USER_AGENT)
        .send()
        .await
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status()));
    }

    response.json().await.map_err(FetchError::Decode)
}

/// 每次请求按代理和超时新建客户端，不在请求间复用连接。
fn build_client(proxy: &ProxyEndpoint, timeout: Duration) -> Result<reqwest::Client, FetchError> {
    let proxy_obj = reqwest::Proxy::all(proxy.url()).map_err(FetchError::Network)?;
    reqwest::Client::builder()
        .proxy(proxy_obj)
        .timeout(timeout)
        .build()
        .map_err(FetchError::Network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::scraper::test_support::{local_proxy, test_config};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_event(id: i64) -> Event {
        serde_json::from_value(json!({
            "eventId": id,
            "eventName": "Test Event",
            "categoryId": 28
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_events_parses_items() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/test-venue/venue/1/"))
            .and(query_param("venueId", "3708"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "eventId": 1, "eventName": "A" },
                    { "eventId": 2, "eventName": "B" }
                ]
            })))
            .mount(&server)
            .await;

        let config = test_config(&server.uri(), std::env::temp_dir().as_path(), 1);
        let events = fetch_events(&local_proxy(&server), &config).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_name, "A");
    }

    #[tokio::test]
    async fn test_fetch_tickets_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Browse/VenueMap/GetVenueMapSeatingConfig/7"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = test_config(&server.uri(), std::env::temp_dir().as_path(), 1);
        let err = fetch_tickets(&sample_event(7), &local_proxy(&server), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus(status) if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn test_fetch_tickets_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/Browse/VenueMap/GetVenueMapSeatingConfig/7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let config = test_config(&server.uri(), std::env::temp_dir().as_path(), 1);
        let err = fetch_tickets(&sample_event(7), &local_proxy(&server), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_tickets_network_error() {
        // 绑定后立刻释放端口，得到一个必然拒绝连接的代理地址
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let proxy = ProxyEndpoint {
            host: "127.0.0.1".to_string(),
            port: port.to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
        };
        let config = test_config("http://127.0.0.1:1", std::env::temp_dir().as_path(), 1);
        let err = fetch_tickets(&sample_event(7), &proxy, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
