pub mod error;
pub mod result;
pub mod value;

// 错误和结果类型
pub use error::{ClientError, ClientResult, ConversionError, ErrorCode, PoolError};

// 执行结果
pub use result::{ExecutionResponse, ResultSet, TimezoneInfo};

// 线上值类型
pub use value::*;
