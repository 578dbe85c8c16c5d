//! 服务端执行响应
//!
//! 传输层解码后交给会话层的响应结构，字段与服务端协议一一对应。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::error::ErrorCode;
use crate::core::value::Value;

/// 行列数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    pub column_names: Vec<Vec<u8>>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilingStats {
    pub rows: i64,
    pub exec_duration_in_us: i64,
    pub total_duration_in_us: i64,
    pub other_stats: Option<HashMap<Vec<u8>, Vec<u8>>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNodeBranchInfo {
    pub is_do_branch: bool,
    pub condition_node_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanNodeDescription {
    pub name: Vec<u8>,
    pub id: i64,
    pub output_var: Vec<u8>,
    pub description: Option<Vec<Pair>>,
    pub profiles: Option<Vec<ProfilingStats>>,
    pub branch_info: Option<PlanNodeBranchInfo>,
    pub dependencies: Option<Vec<i64>>,
}

/// 执行计划描述（PROFILE / EXPLAIN 时返回）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDescription {
    pub plan_node_descs: Vec<PlanNodeDescription>,
    /// 计划节点 id -> plan_node_descs 下标
    pub node_index_map: HashMap<i64, i64>,
    pub format: Vec<u8>,
    pub optimize_time_in_us: i32,
}

/// 单条语句的执行响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub error_code: i32,
    pub latency_in_us: i64,
    pub data: Option<DataSet>,
    pub space_name: Option<Vec<u8>>,
    pub error_msg: Option<Vec<u8>>,
    pub plan_desc: Option<PlanDescription>,
    pub comment: Option<Vec<u8>>,
}

impl ExecutionResponse {
    /// 成功响应
    pub fn succeeded(data: DataSet) -> Self {
        Self {
            error_code: ErrorCode::Succeeded.as_i32(),
            data: Some(data),
            ..Default::default()
        }
    }

    /// 失败响应
    pub fn failed(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            error_code: code.as_i32(),
            error_msg: Some(msg.into().into_bytes()),
            ..Default::default()
        }
    }

    /// 已知错误码，未知错误码返回 None
    pub fn code(&self) -> Option<ErrorCode> {
        ErrorCode::from_i32(self.error_code)
    }

    pub fn error_msg_lossy(&self) -> String {
        self.error_msg
            .as_deref()
            .map(|m| String::from_utf8_lossy(m).into_owned())
            .unwrap_or_default()
    }
}
