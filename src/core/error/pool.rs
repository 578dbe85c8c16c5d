//! 连接池 / 会话池错误类型

use thiserror::Error;

/// 外部池返回的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("没有可用的空闲连接: {0}")]
    NoIdleConnection(String),

    #[error("创建会话失败: {0}")]
    CreateSessionFailed(String),

    #[error("连接池已关闭")]
    Closed,

    #[error("会话不属于任何池，无法重连")]
    Unowned,
}
