//! 外部连接池 / 会话池接口
//!
//! 会话不拥有池，只在重连和释放时通过这里的接口借还连接。
//! 池的实现需要自行保证并发安全，会话层不会为它们额外加锁。

use std::sync::Arc;
use std::time::SystemTime;

use crate::core::error::PoolError;
use crate::transport::Transport;

/// 连接池
pub trait ConnectionProvider: Send + Sync {
    /// 借出一条空闲连接
    fn acquire_idle_connection(&self) -> Result<Box<dyn Transport>, PoolError>;

    /// 归还连接，由池自行做健康检查或淘汰
    fn release(&self, connection: Box<dyn Transport>);
}

/// 会话池重建会话时返回的新会话
pub struct NewSession {
    pub session_id: i64,
    pub connection: Box<dyn Transport>,
    pub returned_at: SystemTime,
}

impl std::fmt::Debug for NewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewSession")
            .field("session_id", &self.session_id)
            .field("server", &self.connection.server_address())
            .field("returned_at", &self.returned_at)
            .finish()
    }
}

/// 会话池
pub trait SessionProvider: Send + Sync {
    /// 新建连接并完成认证，得到新的会话标识
    fn create_session(&self) -> Result<NewSession, PoolError>;
}

/// 会话的归属
///
/// 决定连接坏掉之后如何修复：连接池会话换一条连接、保留会话标识；
/// 会话池会话整体换成一个新会话
#[derive(Clone)]
pub enum Owner {
    ConnectionPool(Arc<dyn ConnectionProvider>),
    SessionPool(Arc<dyn SessionProvider>),
    /// 不属于任何池，无法重连
    Standalone,
}

impl Owner {
    pub fn kind(&self) -> &'static str {
        match self {
            Owner::ConnectionPool(_) => "connection-pool",
            Owner::SessionPool(_) => "session-pool",
            Owner::Standalone => "standalone",
        }
    }

    pub fn can_reconnect(&self) -> bool {
        !matches!(self, Owner::Standalone)
    }
}

impl std::fmt::Debug for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Owner({})", self.kind())
    }
}
