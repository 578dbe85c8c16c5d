//! 调用结果分类
//!
//! 把一次远程调用的 (错误, 响应) 归为一类，重试和重连逻辑只依据分类结果做决定。

use crate::core::error::ErrorCode;
use crate::core::result::{parse_json_response, ExecutionResponse};
use crate::transport::RpcError;

/// 一次远程调用的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallOutcome {
    /// 调用完成且会话有效。响应里的业务错误码作为数据交给调用方
    Success,
    /// 连接层失败，连接已不可用
    TransportFailure,
    /// 服务端报告会话不存在或已超时
    SessionInvalid,
    /// 服务端在响应之外报告的业务错误，连接仍可用
    QueryError,
    /// 以上都不是的残余类（如协议帧解码失败），重试循环只对它重试
    Transient,
}

impl CallOutcome {
    /// 需要重连而不是重试
    pub fn needs_reconnect(&self) -> bool {
        matches!(self, CallOutcome::TransportFailure | CallOutcome::SessionInvalid)
    }

    /// 重试循环是否应该再试一次
    pub fn is_retryable(&self) -> bool {
        matches!(self, CallOutcome::Transient)
    }
}

fn classify_error(err: &RpcError) -> CallOutcome {
    match err {
        RpcError::Transport { .. } => CallOutcome::TransportFailure,
        RpcError::Application(_) => CallOutcome::QueryError,
        RpcError::Protocol(_) => CallOutcome::Transient,
    }
}

/// 对 `execute_with_parameter` 的结果分类
pub fn classify_response(result: &Result<ExecutionResponse, RpcError>) -> CallOutcome {
    match result {
        Err(err) => classify_error(err),
        Ok(resp) if is_server_session_error(resp) => CallOutcome::SessionInvalid,
        Ok(_) => CallOutcome::Success,
    }
}

/// 对 `execute_json_with_parameter` 的结果分类
///
/// JSON 无法解析时按成功处理，字节原样交给调用方
pub fn classify_json(result: &Result<Vec<u8>, RpcError>) -> CallOutcome {
    match result {
        Err(err) => classify_error(err),
        Ok(bytes) => match parse_json_response(bytes) {
            Ok(resp) if resp.has_session_error() => CallOutcome::SessionInvalid,
            _ => CallOutcome::Success,
        },
    }
}

/// 响应是否携带非成功错误码
pub fn is_error(resp: &ExecutionResponse) -> bool {
    resp.error_code != ErrorCode::Succeeded.as_i32()
}

/// 服务端是否报告会话失效或超时
pub fn is_server_session_error(resp: &ExecutionResponse) -> bool {
    ErrorCode::is_session_error_code(resp.error_code)
}

/// 调用成功且会话有效
pub fn is_query_ok(result: &Result<ExecutionResponse, RpcError>) -> bool {
    classify_response(result) == CallOutcome::Success
}
