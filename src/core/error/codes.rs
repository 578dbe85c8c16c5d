//! 服务端错误码定义
//!
//! 服务端在 `ExecutionResponse.error_code` 中返回的错误码。
//! 客户端只关心其中少数几个（成功、会话失效、会话超时），
//! 其余错误码原样透传给调用方。

use serde::{Deserialize, Serialize};

/// 服务端错误码
///
/// 错误码一旦定义不应修改，保证与服务端协议兼容
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    Succeeded = 0,

    // ==================== 连接错误 ====================
    /// 连接已断开
    Disconnected = -1,
    /// 无法建立连接
    FailToConnect = -2,
    /// RPC 调用失败
    RpcFailure = -3,

    // ==================== 会话与执行错误 ====================
    /// 用户名或密码错误
    BadUsernamePassword = -1001,
    /// 会话无效（服务端不存在该会话）
    SessionInvalid = -1002,
    /// 会话超时
    SessionTimeout = -1003,
    /// 语法错误
    SyntaxError = -1004,
    /// 执行错误
    ExecutionError = -1005,
    /// 空语句
    StatementEmpty = -1006,
    /// 权限不足
    BadPermission = -1008,
    /// 语义错误
    SemanticError = -1009,
    /// 连接数过多
    TooManyConnections = -1010,
    /// 部分成功
    PartialSucceeded = -1011,
}

impl ErrorCode {
    /// 获取错误码的 i32 值
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// 根据 i32 值获取错误码
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ErrorCode::Succeeded),
            -1 => Some(ErrorCode::Disconnected),
            -2 => Some(ErrorCode::FailToConnect),
            -3 => Some(ErrorCode::RpcFailure),
            -1001 => Some(ErrorCode::BadUsernamePassword),
            -1002 => Some(ErrorCode::SessionInvalid),
            -1003 => Some(ErrorCode::SessionTimeout),
            -1004 => Some(ErrorCode::SyntaxError),
            -1005 => Some(ErrorCode::ExecutionError),
            -1006 => Some(ErrorCode::StatementEmpty),
            -1008 => Some(ErrorCode::BadPermission),
            -1009 => Some(ErrorCode::SemanticError),
            -1010 => Some(ErrorCode::TooManyConnections),
            -1011 => Some(ErrorCode::PartialSucceeded),
            _ => None,
        }
    }

    /// 会话失效和会话超时都说明服务端已不认可当前会话
    pub fn is_session_error(&self) -> bool {
        matches!(self, ErrorCode::SessionInvalid | ErrorCode::SessionTimeout)
    }

    /// 判断 i32 错误码是否为会话错误
    pub fn is_session_error_code(code: i32) -> bool {
        Self::from_i32(code).is_some_and(|c| c.is_session_error())
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::Succeeded => "SUCCEEDED",
            ErrorCode::Disconnected => "E_DISCONNECTED",
            ErrorCode::FailToConnect => "E_FAIL_TO_CONNECT",
            ErrorCode::RpcFailure => "E_RPC_FAILURE",
            ErrorCode::BadUsernamePassword => "E_BAD_USERNAME_PASSWORD",
            ErrorCode::SessionInvalid => "E_SESSION_INVALID",
            ErrorCode::SessionTimeout => "E_SESSION_TIMEOUT",
            ErrorCode::SyntaxError => "E_SYNTAX_ERROR",
            ErrorCode::ExecutionError => "E_EXECUTION_ERROR",
            ErrorCode::StatementEmpty => "E_STATEMENT_EMPTY",
            ErrorCode::BadPermission => "E_BAD_PERMISSION",
            ErrorCode::SemanticError => "E_SEMANTIC_ERROR",
            ErrorCode::TooManyConnections => "E_TOO_MANY_CONNECTIONS",
            ErrorCode::PartialSucceeded => "E_PARTIAL_SUCCEEDED",
        };
        write!(f, "{}({})", name, self.as_i32())
    }
}
