//! Value 模块 - 线上值类型系统
//!
//! - 核心类型定义 (`types.rs`)
//! - 日期时间类型 (`date_time.rs`)
//! - 地理空间类型 (`geography.rs`)
//! - 宿主值转换 (`conversion.rs`)

pub mod conversion;
pub mod date_time;
pub mod geography;
pub mod types;

pub use conversion::{convert, convert_params, HostValue};
pub use date_time::*;
pub use geography::*;
pub use types::*;
