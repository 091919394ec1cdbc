//! 轮询代理选择器：按固定顺序循环分配代理出口。

use std::sync::Mutex;

use crate::common::error::ConfigError;
use crate::model::ProxyEndpoint;

/// 线程安全的轮询代理池。
///
/// 游标始终落在 `[0, len)`，每次取号在锁内读取并前进一格（模池长回绕），
/// 并发调用不会重复消费同一个游标值。池本身构造后不再变更。
#[derive(Debug)]
pub struct ProxyRotator {
    endpoints: Vec<ProxyEndpoint>,
    cursor: Mutex<usize>,
}

impl ProxyRotator {
    /// # 错误
    /// 代理池为空时返回 [`ConfigError::EmptyPool`]。
    pub fn new(endpoints: Vec<ProxyEndpoint>) -> Result<Self, ConfigError> {
        if endpoints.is_empty() {
            return Err(ConfigError::EmptyPool);
        }
        Ok(Self {
            endpoints,
            cursor: Mutex::new(0),
        })
    }

    /// 返回当前游标处的代理并前进一格。
    pub fn next(&self) -> ProxyEndpoint {
        let mut cursor = self.cursor.lock().unwrap();
        let endpoint = self.endpoints[*cursor].clone();
        *cursor = (*cursor + 1) % self.endpoints.len();
        endpoint
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
