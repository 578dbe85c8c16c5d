use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::error::{ClientError, ClientResult};

/// 最大次数配置为 0（不限）时实际使用的上限
pub const UNBOUNDED_ATTEMPT_CAP: u32 = 100;

/// 重试配置
///
/// 只对既非传输层、也非会话失效、也非业务错误的残余错误重试
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// 最大尝试次数（含第一次），0 表示不限（受 `UNBOUNDED_ATTEMPT_CAP` 约束）
    pub max_attempts: u32,
    /// 两次尝试之间的等待时间
    pub idle_time_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            idle_time_ms: 100,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_idle_time(mut self, idle_time: Duration) -> Self {
        self.idle_time_ms = idle_time.as_millis() as u64;
        self
    }

    pub fn idle_time(&self) -> Duration {
        Duration::from_millis(self.idle_time_ms)
    }

    /// 实际生效的最大尝试次数
    pub fn effective_max_attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            UNBOUNDED_ATTEMPT_CAP
        } else {
            self.max_attempts
        }
    }
}

/// 重连配置
///
/// 次数和总耗时两个维度任一为 0 表示该维度不限；两者都为 0 时按次数上限
/// `UNBOUNDED_ATTEMPT_CAP` 截断
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconnectConfig {
    pub max_attempts: u32,
    pub max_elapsed_ms: u64,
    pub idle_time_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_elapsed_ms: 0,
            idle_time_ms: 100,
        }
    }
}

impl ReconnectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed_ms = max_elapsed.as_millis() as u64;
        self
    }

    pub fn with_idle_time(mut self, idle_time: Duration) -> Self {
        self.idle_time_ms = idle_time.as_millis() as u64;
        self
    }

    pub fn idle_time(&self) -> Duration {
        Duration::from_millis(self.idle_time_ms)
    }

    pub fn max_elapsed(&self) -> Option<Duration> {
        (self.max_elapsed_ms != 0).then(|| Duration::from_millis(self.max_elapsed_ms))
    }

    /// 已失败 `attempts` 次、耗时 `elapsed` 后是否应放弃
    pub fn is_exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        if let Some(max_elapsed) = self.max_elapsed() {
            if elapsed >= max_elapsed {
                return true;
            }
        }
        if self.max_attempts != 0 {
            return attempts >= self.max_attempts;
        }
        self.max_elapsed_ms == 0 && attempts >= UNBOUNDED_ATTEMPT_CAP
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphdb-client".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

/// 客户端配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub retry: RetryConfig,
    pub reconnect: ReconnectConfig,
    pub log: LogConfig,
}

impl ClientConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> ClientResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("无法读取配置文件 {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ClientResult<Self> {
        toml::from_str(content).map_err(|e| ClientError::Config(e.to_string()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ClientResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))?;
        fs::write(path.as_ref(), content)
            .map_err(|e| ClientError::Config(format!("无法写入配置文件: {}", e)))
    }
}
