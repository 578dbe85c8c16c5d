//! 集成测试共享工具模块
//!
//! 提供脚本化的传输层、连接池和会话池替身，供所有集成测试使用

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use graphdb_client::core::error::PoolError;
use graphdb_client::core::result::{DataSet, ExecutionResponse, Row};
use graphdb_client::core::value::Value;
use graphdb_client::pool::{ConnectionProvider, NewSession, SessionProvider};
use graphdb_client::transport::{HostAddress, RpcError, Transport, TransportErrorKind};

/// 传输层调用计数，多个连接可共享同一个计数器
#[derive(Debug, Default)]
pub struct Tally {
    pub calls: AtomicUsize,
    pub sign_outs: AtomicUsize,
    pub closes: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    /// 每次调用携带的会话标识
    pub session_ids: Mutex<Vec<i64>>,
    /// 最后一次调用的参数
    pub last_params: Mutex<HashMap<String, Value>>,
}

impl Tally {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_session_id(&self) -> Option<i64> {
        self.session_ids.lock().last().copied()
    }
}

/// 按脚本返回结果的连接，脚本耗尽后回显语句
pub struct MockTransport {
    port: u16,
    script: VecDeque<Result<ExecutionResponse, RpcError>>,
    json_script: VecDeque<Result<Vec<u8>, RpcError>>,
    delay: Duration,
    sign_out_error: Option<RpcError>,
    tally: Arc<Tally>,
}

impl MockTransport {
    pub fn new(port: u16, tally: Arc<Tally>) -> Self {
        Self {
            port,
            script: VecDeque::new(),
            json_script: VecDeque::new(),
            delay: Duration::ZERO,
            sign_out_error: None,
            tally,
        }
    }

    pub fn then(mut self, result: Result<ExecutionResponse, RpcError>) -> Self {
        self.script.push_back(result);
        self
    }

    pub fn then_json(mut self, result: Result<Vec<u8>, RpcError>) -> Self {
        self.json_script.push_back(result);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 登出时返回指定错误
    pub fn failing_sign_out(mut self, err: RpcError) -> Self {
        self.sign_out_error = Some(err);
        self
    }

    pub fn boxed(self) -> Box<dyn Transport> {
        Box::new(self)
    }

    fn enter(&self, session_id: i64, params: &HashMap<String, Value>) {
        self.tally.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.tally.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.tally.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.tally.session_ids.lock().push(session_id);
        *self.tally.last_params.lock() = params.clone();
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    fn leave(&self) {
        self.tally.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Transport for MockTransport {
    fn execute_with_parameter(
        &mut self,
        session_id: i64,
        stmt: &str,
        params: &HashMap<String, Value>,
    ) -> Result<ExecutionResponse, RpcError> {
        self.enter(session_id, params);
        let result = self
            .script
            .pop_front()
            .unwrap_or_else(|| Ok(echo_response(stmt)));
        self.leave();
        result
    }

    fn execute_json_with_parameter(
        &mut self,
        session_id: i64,
        stmt: &str,
        params: &HashMap<String, Value>,
    ) -> Result<Vec<u8>, RpcError> {
        self.enter(session_id, params);
        let result = self
            .json_script
            .pop_front()
            .unwrap_or_else(|| Ok(echo_json(stmt)));
        self.leave();
        result
    }

    fn sign_out(&mut self, _session_id: i64) -> Result<(), RpcError> {
        self.tally.sign_outs.fetch_add(1, Ordering::SeqCst);
        match &self.sign_out_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn close(&mut self) {
        self.tally.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn server_address(&self) -> HostAddress {
        HostAddress::new("127.0.0.1", self.port)
    }
}

/// 单列 `stmt` 的成功响应，内容为语句本身
pub fn echo_response(stmt: &str) -> ExecutionResponse {
    ExecutionResponse::succeeded(DataSet {
        column_names: vec![b"stmt".to_vec()],
        rows: vec![Row::new(vec![Value::string(stmt)])],
    })
}

pub fn echo_json(stmt: &str) -> Vec<u8> {
    serde_json::json!({
        "results": [{
            "columns": ["stmt"],
            "data": [{"row": [stmt], "meta": [null]}],
            "latencyInUs": 10,
            "spaceName": "",
        }],
        "errors": [{"code": 0}]
    })
    .to_string()
    .into_bytes()
}

pub fn transport_error() -> RpcError {
    RpcError::transport(TransportErrorKind::EndOfFile, "connection reset by peer")
}

/// 连接池替身，按队列借出连接，队列为空时返回没有空闲连接
#[derive(Default)]
pub struct MockConnectionPool {
    idle: Mutex<VecDeque<Box<dyn Transport>>>,
    pub acquires: AtomicUsize,
    /// 被归还连接的端口
    pub released: Mutex<Vec<u16>>,
}

impl MockConnectionPool {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_idle(connections: Vec<Box<dyn Transport>>) -> Arc<Self> {
        Arc::new(Self {
            idle: Mutex::new(connections.into_iter().collect()),
            ..Default::default()
        })
    }

    pub fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    pub fn released_ports(&self) -> Vec<u16> {
        self.released.lock().clone()
    }
}

impl ConnectionProvider for MockConnectionPool {
    fn acquire_idle_connection(&self) -> Result<Box<dyn Transport>, PoolError> {
        self.acquires.fetch_add(1, Ordering::SeqCst);
        self.idle
            .lock()
            .pop_front()
            .ok_or_else(|| PoolError::NoIdleConnection("no idle connection".to_string()))
    }

    fn release(&self, connection: Box<dyn Transport>) {
        self.released.lock().push(connection.server_address().port);
    }
}

/// 会话池替身，每次创建分配递增的会话标识
pub struct MockSessionPool {
    next_id: AtomicI64,
    failures_left: AtomicUsize,
    pub created: AtomicUsize,
    tally: Arc<Tally>,
}

impl MockSessionPool {
    pub fn new(first_id: i64, tally: Arc<Tally>) -> Arc<Self> {
        Self::failing(first_id, 0, tally)
    }

    /// 前 `failures` 次创建失败
    pub fn failing(first_id: i64, failures: usize, tally: Arc<Tally>) -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI64::new(first_id),
            failures_left: AtomicUsize::new(failures),
            created: AtomicUsize::new(0),
            tally,
        })
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl SessionProvider for MockSessionPool {
    fn create_session(&self) -> Result<NewSession, PoolError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(PoolError::CreateSessionFailed(
                "authentication refused".to_string(),
            ));
        }

        self.created.fetch_add(1, Ordering::SeqCst);
        let session_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(NewSession {
            session_id,
            connection: MockTransport::new(9669, self.tally.clone()).boxed(),
            returned_at: SystemTime::now(),
        })
    }
}
