//! 执行结果
//!
//! - 服务端响应结构 (`response.rs`)
//! - 带时区上下文的结果集 (`result_set.rs`)
//! - JSON 结果结构 (`json.rs`)

pub mod json;
pub mod response;
pub mod result_set;

pub use json::{parse_json_response, JsonResponse};
pub use response::{
    DataSet, ExecutionResponse, Pair, PlanDescription, PlanNodeBranchInfo, PlanNodeDescription,
    ProfilingStats, Row,
};
pub use result_set::{ResultSet, TimezoneInfo};
