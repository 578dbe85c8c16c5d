//! 传输层抽象
//!
//! 会话层不关心 RPC 的编码和连接细节，只通过 `Transport` 使用一条已建立的连接。

pub mod classifier;

pub use classifier::{
    classify_json, classify_response, is_error, is_query_ok, is_server_session_error, CallOutcome,
};

use std::collections::HashMap;
use thiserror::Error;

use crate::core::result::ExecutionResponse;
use crate::core::value::Value;

/// 服务端地址
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddress {
    pub host: String,
    pub port: u16,
}

impl HostAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl std::fmt::Display for HostAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// 传输层异常的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    NotOpen,
    TimedOut,
    EndOfFile,
    Io,
    Unknown,
}

/// RPC 调用错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// 连接层异常，说明连接本身已不可用
    #[error("transport exception ({kind:?}): {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// 帧编解码失败等协议层错误
    #[error("protocol error: {0}")]
    Protocol(String),

    /// 服务端在响应之外抛出的应用异常
    #[error("application error: {0}")]
    Application(String),
}

impl RpcError {
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        RpcError::Transport {
            kind,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RpcError::Transport { .. })
    }
}

/// 一条到服务端的连接
///
/// 由连接池创建并持有，同一时刻只被一个会话借出。实现只需保证单线程使用时正确，
/// 会话层保证同一连接上不会并发调用。
pub trait Transport: Send {
    fn execute_with_parameter(
        &mut self,
        session_id: i64,
        stmt: &str,
        params: &HashMap<String, Value>,
    ) -> Result<ExecutionResponse, RpcError>;

    fn execute_json_with_parameter(
        &mut self,
        session_id: i64,
        stmt: &str,
        params: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RpcError>;

    fn sign_out(&mut self, session_id: i64) -> Result<(), RpcError>;

    fn close(&mut self);

    fn server_address(&self) -> HostAddress;
}
