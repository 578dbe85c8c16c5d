//! 重试机制
//!
//! 在同一连接上对一次远程调用做有限次重试。只有分类为 `Transient` 的结果会被重试，
//! 传输失败和会话失效需要重连而不是重试，业务错误直接返回。

use log::error;
use std::thread;

use crate::config::RetryConfig;
use crate::transport::{CallOutcome, RpcError};

/// 一次重试循环的结果
#[derive(Debug)]
pub struct RetryReport<T> {
    /// 最后一次调用的结果
    pub result: Result<T, RpcError>,
    /// 最后一次调用的分类
    pub outcome: CallOutcome,
    /// 实际调用次数
    pub attempts: u32,
}

/// 执行 `call` 直到分类结果不再是 `Transient` 或次数耗尽
///
/// 超过次数上限时返回最后一次的错误
pub fn run_with_retry<T, F, C>(config: &RetryConfig, mut call: F, classify: C) -> RetryReport<T>
where
    F: FnMut() -> Result<T, RpcError>,
    C: Fn(&Result<T, RpcError>) -> CallOutcome,
{
    let max_attempts = config.effective_max_attempts();
    let mut attempts = 0;

    loop {
        let result = call();
        attempts += 1;
        let outcome = classify(&result);

        if !outcome.is_retryable() || attempts >= max_attempts {
            return RetryReport {
                result,
                outcome,
                attempts,
            };
        }

        if let Err(e) = &result {
            error!("start retry ({}/{}), {}", attempts, max_attempts, e);
        }
        thread::sleep(config.idle_time());
    }
}
