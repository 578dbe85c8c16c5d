//! 客户端统一错误处理
//!
//! ## 错误分类
//!
//! - `Transport` / `SessionInvalid`：连接不可用或服务端不认可会话，触发一次重连
//! - `Query`：服务端对本条语句返回的业务错误，原样返回，不重试也不重连
//! - `Protocol`：既非传输层也非会话错误的残余类，在重试预算内重试
//! - `Conversion`：参数无法转换为线上值，在远程调用之前返回
//! - `Released`：会话已释放
//! - `ReconnectExhausted`：重连预算耗尽，表示服务不可用，最后一次池错误作为 source
//!
//! 尽力而为的清理操作（登出、关闭连接）失败只记录日志，不会变成错误返回

use std::time::Duration;
use thiserror::Error;

pub mod codes;
pub mod conversion;
pub mod pool;

pub use codes::ErrorCode;
pub use conversion::ConversionError;
pub use pool::PoolError;

use crate::transport::RpcError;

/// 客户端错误
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("传输层错误: {0}")]
    Transport(String),

    #[error("协议错误: {0}")]
    Protocol(String),

    #[error("会话已失效 {code}: {message}")]
    SessionInvalid { code: ErrorCode, message: String },

    #[error("查询错误: {0}")]
    Query(String),

    #[error("参数转换错误: {0}")]
    Conversion(#[from] ConversionError),

    #[error("failed to {operation}: Session has been released")]
    Released { operation: &'static str },

    #[error("服务不可用: 重连 {attempts} 次、耗时 {elapsed:?} 后仍失败, {last_error}")]
    ReconnectExhausted {
        attempts: u32,
        elapsed: Duration,
        #[source]
        last_error: PoolError,
    },

    #[error("session ping failed, {0}")]
    PingFailed(String),

    #[error("结果解析错误: {0}")]
    Decode(String),

    #[error("配置错误: {0}")]
    Config(String),
}

/// 统一的结果类型
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// 该错误是否说明需要修复连接
    pub fn needs_reconnect(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::SessionInvalid { .. }
        )
    }

    pub fn is_released(&self) -> bool {
        matches!(self, ClientError::Released { .. })
    }

    /// 服务不可用（重连预算耗尽）
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, ClientError::ReconnectExhausted { .. })
    }
}

impl From<RpcError> for ClientError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Transport { .. } => ClientError::Transport(err.to_string()),
            RpcError::Protocol(msg) => ClientError::Protocol(msg),
            RpcError::Application(msg) => ClientError::Query(msg),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
