//! 重连状态机
//!
//! `Connected -> Reconnecting -> {Connected, Failed}`
//!
//! 只在调用结果为传输失败或会话失效时进入。每次修复失败记录日志，
//! 直到修复成功或者重连预算（次数 / 总耗时）耗尽。

use log::{error, warn};
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::ReconnectConfig;
use crate::core::error::{ClientError, ClientResult, PoolError};
use crate::pool::Owner;
use crate::session::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectState {
    Connected,
    Reconnecting { attempt: u32 },
    Failed { attempts: u32, elapsed: Duration },
}

/// 单次重连过程
#[derive(Debug)]
pub struct Reconnector<'a> {
    config: &'a ReconnectConfig,
    state: ReconnectState,
}

impl<'a> Reconnector<'a> {
    pub fn new(config: &'a ReconnectConfig) -> Self {
        Self {
            config,
            state: ReconnectState::Connected,
        }
    }

    pub fn state(&self) -> ReconnectState {
        self.state
    }

    /// 反复调用 `repair` 直到成功，返回成功前失败的次数
    ///
    /// 预算耗尽时进入 `Failed` 并返回 `ClientError::ReconnectExhausted`
    pub fn run<F>(&mut self, mut repair: F) -> ClientResult<u32>
    where
        F: FnMut() -> Result<(), PoolError>,
    {
        let started = Instant::now();
        let mut failures = 0;

        loop {
            self.state = ReconnectState::Reconnecting {
                attempt: failures + 1,
            };

            match repair() {
                Ok(()) => {
                    self.state = ReconnectState::Connected;
                    return Ok(failures);
                }
                Err(e) => {
                    failures += 1;
                    error!("failed to reconnect ({}), {}", failures, e);

                    let elapsed = started.elapsed();
                    if self.config.is_exhausted(failures, elapsed) {
                        self.state = ReconnectState::Failed {
                            attempts: failures,
                            elapsed,
                        };
                        error!(
                            "reconnect budget exhausted after {} attempts in {:?}",
                            failures, elapsed
                        );
                        return Err(ClientError::ReconnectExhausted {
                            attempts: failures,
                            elapsed,
                            last_error: e,
                        });
                    }

                    thread::sleep(self.config.idle_time());
                }
            }
        }
    }
}

/// 按会话归属修复连接
///
/// 调用方必须持有会话锁，`session_id` 只在这里被改写
pub(crate) fn repair_connection(
    owner: &Owner,
    session_id: &AtomicI64,
    state: &mut SessionState,
) -> Result<(), PoolError> {
    match owner {
        Owner::ConnectionPool(pool) => {
            let connection = pool.acquire_idle_connection()?;
            // 旧连接交还给池，由池决定检查还是淘汰
            if let Some(old) = state.connection.replace(connection) {
                pool.release(old);
            }
            Ok(())
        }
        Owner::SessionPool(pool) => {
            let new_session = pool.create_session()?;
            if let Some(mut old) = state.connection.take() {
                let old_id = session_id.load(Ordering::SeqCst);
                warn!(
                    "replace session {} on {} with session {}",
                    old_id,
                    old.server_address(),
                    new_session.session_id
                );
                if let Err(e) = old.sign_out(old_id) {
                    warn!("Sign out failed, {}", e);
                }
                old.close();
            }
            session_id.store(new_session.session_id, Ordering::SeqCst);
            state.connection = Some(new_session.connection);
            state.returned_at = new_session.returned_at;
            Ok(())
        }
        Owner::Standalone => Err(PoolError::Unowned),
    }
}
