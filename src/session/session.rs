//! 客户端会话
//!
//! 会话绑定服务端的一个执行上下文（会话标识）和至多一条连接，
//! 所有状态变更都在会话锁内完成，因此同一会话上同一时刻至多有一个远程调用。

use log::{info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::SystemTime;

use crate::config::{ClientConfig, ReconnectConfig, RetryConfig};
use crate::core::error::{ClientError, ClientResult, ErrorCode};
use crate::core::result::{parse_json_response, ExecutionResponse, ResultSet, TimezoneInfo};
use crate::core::value::{convert_params, HostValue};
use crate::pool::Owner;
use crate::session::reconnect::{repair_connection, Reconnector};
use crate::transport::{
    classify_json, classify_response, CallOutcome, RpcError, Transport, TransportErrorKind,
};
use crate::utils::retry::run_with_retry;

/// `ping` 发送的空操作语句
pub const PING_STATEMENT: &str = r#"RETURN "GRAPHDB CLIENT PING""#;

/// 锁内可变状态
pub(crate) struct SessionState {
    /// 释放后为 None
    pub(crate) connection: Option<Box<dyn Transport>>,
    /// 会话创建或归还池的时间
    pub(crate) returned_at: SystemTime,
}

impl SessionState {
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self {
            connection: None,
            returned_at: SystemTime::now(),
        }
    }
}

/// 客户端会话
///
/// 由连接池或会话池创建，可在多个线程间共享（`Arc<Session>`），
/// 并发调用在会话锁上排队。
///
/// # 示例
///
/// ```rust,ignore
/// let session = Session::new(session_id, connection, Owner::ConnectionPool(pool))
///     .with_timezone(TimezoneInfo::new(8 * 3600, "Asia/Shanghai"));
///
/// let result = session.execute("RETURN 1")?;
/// assert!(result.is_succeed());
///
/// session.release();
/// ```
pub struct Session {
    /// 只在持有 `state` 锁时改写，读取不加锁
    session_id: AtomicI64,
    state: Mutex<SessionState>,
    owner: Owner,
    timezone: TimezoneInfo,
    retry: RetryConfig,
    reconnect: ReconnectConfig,
}

impl Session {
    pub fn new(session_id: i64, connection: Box<dyn Transport>, owner: Owner) -> Self {
        Self {
            session_id: AtomicI64::new(session_id),
            state: Mutex::new(SessionState {
                connection: Some(connection),
                returned_at: SystemTime::now(),
            }),
            owner,
            timezone: TimezoneInfo::default(),
            retry: RetryConfig::default(),
            reconnect: ReconnectConfig::default(),
        }
    }

    pub fn with_timezone(mut self, timezone: TimezoneInfo) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_reconnect_config(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// 使用客户端配置中的重试与重连策略
    pub fn with_config(self, config: &ClientConfig) -> Self {
        self.with_retry_config(config.retry.clone())
            .with_reconnect_config(config.reconnect.clone())
    }

    /// 服务端分配的会话标识，会话池会话重连后会改变
    pub fn session_id(&self) -> i64 {
        self.session_id.load(Ordering::SeqCst)
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn timezone(&self) -> &TimezoneInfo {
        &self.timezone
    }

    pub fn returned_at(&self) -> SystemTime {
        self.state.lock().returned_at
    }

    /// 池回收会话时记录归还时间
    pub fn mark_returned(&self) {
        self.state.lock().returned_at = SystemTime::now();
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().connection.is_none()
    }

    /// 执行语句
    pub fn execute(&self, stmt: &str) -> ClientResult<ResultSet> {
        self.execute_with_parameter(stmt, &HashMap::new())
    }

    /// 执行带参数的语句
    ///
    /// 语句本身的业务错误（语法、语义等）通过 `ResultSet::is_succeed` 返回；
    /// 传输失败或会话失效时按策略重连一次并重新执行一次
    pub fn execute_with_parameter(
        &self,
        stmt: &str,
        params: &HashMap<String, HostValue>,
    ) -> ClientResult<ResultSet> {
        let mut state = self.state.lock();
        if state.connection.is_none() {
            return Err(ClientError::Released {
                operation: "execute",
            });
        }
        let params = convert_params(params)?;

        let (result, outcome) = self.execute_with_resilience(
            &mut state,
            |conn, session_id| conn.execute_with_parameter(session_id, stmt, &params),
            classify_response,
        )?;

        let resp = result?;
        if outcome == CallOutcome::SessionInvalid {
            return Err(session_invalid(&resp));
        }
        Ok(ResultSet::new(resp, self.timezone.clone()))
    }

    /// 执行语句并返回 JSON 字节，Date 和 DateTime 以 UTC 返回
    ///
    /// JSON 结构见 [`crate::core::result::json`]
    pub fn execute_json(&self, stmt: &str) -> ClientResult<Vec<u8>> {
        self.execute_json_with_parameter(stmt, &HashMap::new())
    }

    pub fn execute_json_with_parameter(
        &self,
        stmt: &str,
        params: &HashMap<String, HostValue>,
    ) -> ClientResult<Vec<u8>> {
        let mut state = self.state.lock();
        if state.connection.is_none() {
            return Err(ClientError::Released {
                operation: "execute json",
            });
        }
        let params = convert_params(params)?;

        let (result, outcome) = self.execute_with_resilience(
            &mut state,
            |conn, session_id| conn.execute_json_with_parameter(session_id, stmt, &params),
            classify_json,
        )?;

        let bytes = result?;
        if outcome == CallOutcome::SessionInvalid {
            let resp = parse_json_response(&bytes)?;
            if let Some(err) = resp.session_error() {
                return Err(ClientError::SessionInvalid {
                    code: ErrorCode::from_i32(err.code).unwrap_or(ErrorCode::SessionInvalid),
                    message: err.message.clone().unwrap_or_default(),
                });
            }
        }
        Ok(bytes)
    }

    /// 登出并释放连接
    ///
    /// 幂等：已释放的会话只记录警告。连接池会话的连接归还连接池，
    /// 其它会话的连接直接关闭
    pub fn release(&self) {
        let mut state = self.state.lock();
        let Some(mut connection) = state.connection.take() else {
            warn!("Session has been released");
            return;
        };

        if let Err(e) = connection.sign_out(self.session_id()) {
            warn!("Sign out failed, {}", e);
        }

        match &self.owner {
            Owner::ConnectionPool(pool) => pool.release(connection),
            Owner::SessionPool(_) | Owner::Standalone => connection.close(),
        }
    }

    /// 检查会话是否可用
    pub fn ping(&self) -> ClientResult<()> {
        let result = match self.execute(PING_STATEMENT) {
            Ok(result) => result,
            Err(ClientError::Released { .. }) => {
                return Err(ClientError::Released { operation: "ping" })
            }
            Err(e) => return Err(ClientError::PingFailed(e.to_string())),
        };
        if !result.is_succeed() {
            return Err(ClientError::PingFailed(result.error_msg()));
        }
        Ok(())
    }

    /// 重试一轮；需要重连时按归属修复连接，成功后在新连接上再执行一次
    fn execute_with_resilience<T, F, C>(
        &self,
        state: &mut SessionState,
        mut call: F,
        classify: C,
    ) -> ClientResult<(Result<T, RpcError>, CallOutcome)>
    where
        F: FnMut(&mut Box<dyn Transport>, i64) -> Result<T, RpcError>,
        C: Fn(&Result<T, RpcError>) -> CallOutcome,
    {
        let report = run_with_retry(&self.retry, || self.call_once(state, &mut call), &classify);
        if !report.outcome.needs_reconnect() || !self.owner.can_reconnect() {
            return Ok((report.result, report.outcome));
        }

        if let Err(e) = &report.result {
            warn!("session {} needs reconnect, {}", self.session_id(), e);
        } else {
            warn!("session {} was rejected by the server, reconnecting", self.session_id());
        }

        let mut reconnector = Reconnector::new(&self.reconnect);
        reconnector.run(|| repair_connection(&self.owner, &self.session_id, state))?;
        if let Some(conn) = state.connection.as_ref() {
            info!(
                "Successfully reconnect to host: {}, session: {}",
                conn.server_address(),
                self.session_id()
            );
        }

        let result = self.call_once(state, &mut call);
        let outcome = classify(&result);
        Ok((result, outcome))
    }

    fn call_once<T, F>(&self, state: &mut SessionState, call: &mut F) -> Result<T, RpcError>
    where
        F: FnMut(&mut Box<dyn Transport>, i64) -> Result<T, RpcError>,
    {
        let session_id = self.session_id();
        match state.connection.as_mut() {
            Some(conn) => call(conn, session_id),
            None => Err(RpcError::transport(
                TransportErrorKind::NotOpen,
                "session holds no connection",
            )),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id())
            .field("owner", &self.owner)
            .field("timezone", &self.timezone)
            .field("retry", &self.retry)
            .field("reconnect", &self.reconnect)
            .finish()
    }
}

fn session_invalid(resp: &ExecutionResponse) -> ClientError {
    ClientError::SessionInvalid {
        code: resp.code().unwrap_or(ErrorCode::SessionInvalid),
        message: resp.error_msg_lossy(),
    }
}
