//! JSON 格式的执行结果
//!
//! `execute_json` 返回服务端生成的 JSON 字节，结构固定如下（字段名必须保持不变）：
//!
//! ```text
//! {
//!     "results": [{
//!         "columns": [],
//!         "data": [{ "row": ["row-data"], "meta": ["metadata"] }],
//!         "latencyInUs": 0,
//!         "spaceName": "",
//!         "planDesc": {
//!             "planNodeDescs": [{
//!                 "name": "", "id": 0, "outputVar": "",
//!                 "description": { "key": "" },
//!                 "profiles": [{ "rows": 1, "execDurationInUs": 0, "totalDurationInUs": 0, "otherStats": {} }],
//!                 "branchInfo": { "isDoBranch": false, "conditionNodeId": -1 },
//!                 "dependencies": []
//!             }],
//!             "nodeIndexMap": {},
//!             "format": "",
//!             "optimize_time_in_us": 0
//!         },
//!         "comment": ""
//!     }],
//!     "errors": [{ "code": 0, "message": "" }]
//! }
//! ```
//!
//! Date 和 DateTime 在 JSON 中以 UTC 返回。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::error::{ClientResult, ErrorCode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse {
    #[serde(default)]
    pub results: Vec<JsonResult>,
    #[serde(default)]
    pub errors: Vec<JsonError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<JsonRow>,
    #[serde(default)]
    pub latency_in_us: i64,
    #[serde(default)]
    pub space_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_desc: Option<JsonPlanDesc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonRow {
    #[serde(default)]
    pub row: Vec<serde_json::Value>,
    #[serde(default)]
    pub meta: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlanDesc {
    #[serde(default)]
    pub plan_node_descs: Vec<JsonPlanNode>,
    #[serde(default)]
    pub node_index_map: HashMap<String, i64>,
    #[serde(default)]
    pub format: String,
    #[serde(default, rename = "optimize_time_in_us")]
    pub optimize_time_in_us: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPlanNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub output_var: String,
    #[serde(default)]
    pub description: HashMap<String, String>,
    #[serde(default)]
    pub profiles: Vec<JsonProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_info: Option<JsonBranchInfo>,
    #[serde(default)]
    pub dependencies: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonProfile {
    #[serde(default)]
    pub rows: i64,
    #[serde(default)]
    pub exec_duration_in_us: i64,
    #[serde(default)]
    pub total_duration_in_us: i64,
    #[serde(default)]
    pub other_stats: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonBranchInfo {
    pub is_do_branch: bool,
    pub condition_node_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonError {
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JsonResponse {
    /// 第一个会话失效 / 会话超时错误
    pub fn session_error(&self) -> Option<&JsonError> {
        self.errors
            .iter()
            .find(|e| ErrorCode::is_session_error_code(e.code))
    }

    pub fn has_session_error(&self) -> bool {
        self.session_error().is_some()
    }

    /// 所有语句都成功
    pub fn is_succeed(&self) -> bool {
        self.errors
            .iter()
            .all(|e| e.code == ErrorCode::Succeeded.as_i32())
    }
}

/// 解析 `execute_json` 返回的字节
pub fn parse_json_response(bytes: &[u8]) -> ClientResult<JsonResponse> {
    Ok(serde_json::from_slice(bytes)?)
}
