//! 会话层
//!
//! - 会话与执行入口 (`session.rs`)
//! - 重连状态机与按归属修复连接 (`reconnect.rs`)

pub mod reconnect;
#[allow(clippy::module_inception)]
pub mod session;

pub use reconnect::{ReconnectState, Reconnector};
pub use session::{Session, PING_STATEMENT};
