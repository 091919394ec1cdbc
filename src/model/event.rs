use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 列表接口返回的单场活动。
///
/// 只对构造详情请求和报告所需的字段做强类型约定，
/// 其余键值原样保留在 `extra` 中。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "eventId")]
    pub event_id: i64,

    #[serde(rename = "eventName")]
    pub event_name: String,

    /// 活动本地时间（ISO 8601 字符串），接口缺失时为空串。
    #[serde(rename = "localEventDateTime", default)]
    pub event_date: String,

    #[serde(rename = "venueName", default)]
    pub venue: String,

    /// 详情请求的 categoryId 参数，缺失时按空串传递。
    #[serde(rename = "categoryId", default)]
    pub category_id: Option<i64>,

    /// 接口返回的其余字段，保持不透明。
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Event {
    pub fn category_param(&self) -> String {
        self.category_id.map(|c| c.to_string()).unwrap_or_default()
    }
}

/// 单场活动抓取成功后的结果记录，生成后不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResult {
    pub event_id: i64,
    pub event_name: String,
    pub event_date: String,
    pub venue: String,
    pub category_id: Option<i64>,
    /// 详情接口返回的完整票务数据（含 `zones` 数组）。
    pub tickets: Value,
    /// 本次抓取耗时（秒）。
    pub scrape_duration: f64,
}

impl EventResult {
    pub fn new(event: Event, tickets: Value, scrape_duration: f64) -> Self {
        Self {
            event_id: event.event_id,
            event_name: event.event_name,
            event_date: event.event_date,
            venue: event.venue,
            category_id: event.category_id,
            tickets,
            scrape_duration,
        }
    }

    pub fn zone_count(&self) -> usize {
        zone_count(&self.tickets)
    }
}

/// 统计票务数据中 `zones` 数组的长度，字段缺失或类型不符按 0 处理。
pub fn zone_count(payload: &Value) -> usize {
    payload
        .get("zones")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}
